//! OS キーリングによるセッション永続化。
//!
//! トークンの組を JSON ひとつのエントリに保存する。平文ファイルには
//! 決して書かない。

use crate::application::ports::session_store::{SessionStore, SessionTokens};
use crate::shared::AppError;
use async_trait::async_trait;
use tracing::debug;

const ACCOUNT: &str = "session";

pub struct KeyringSessionStore {
    service_name: String,
}

impl KeyringSessionStore {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, AppError> {
        keyring::Entry::new(&self.service_name, ACCOUNT)
            .map_err(|e| AppError::storage(format!("キーリングを開けません: {e}")))
    }
}

#[async_trait]
impl SessionStore for KeyringSessionStore {
    async fn save(&self, tokens: &SessionTokens) -> Result<(), AppError> {
        let payload = serde_json::to_string(tokens)?;
        self.entry()?
            .set_password(&payload)
            .map_err(|e| AppError::storage(format!("セッションの保存に失敗: {e}")))?;
        debug!("session tokens saved to keyring");
        Ok(())
    }

    async fn load(&self) -> Result<Option<SessionTokens>, AppError> {
        match self.entry()?.get_password() {
            Ok(payload) => {
                let tokens = serde_json::from_str(&payload)?;
                Ok(Some(tokens))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::storage(format!("セッションの読み出しに失敗: {e}"))),
        }
    }

    async fn clear(&self) -> Result<(), AppError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::storage(format!("セッションの破棄に失敗: {e}"))),
        }
    }
}
