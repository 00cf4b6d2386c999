use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// アクセス / リフレッシュトークンの組。プロセスをまたいで永続化される
/// 唯一のクライアント状態。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

/// セッションの永続化ポート。実装は `infrastructure::storage`。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, tokens: &SessionTokens) -> Result<(), AppError>;
    async fn load(&self) -> Result<Option<SessionTokens>, AppError>;
    async fn clear(&self) -> Result<(), AppError>;
}

/// HTTP ゲートウェイと認証サービスが共有するメモリ上のセッション。
///
/// ゲートウェイはリクエストごとにアクセストークンを読み、リフレッシュ
/// 成功時はここを書き換える。認証サービスはログイン・ログアウトで
/// 全体を差し替える。
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<SessionTokens>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, tokens: Option<SessionTokens>) {
        *self.inner.write().await = tokens;
    }

    /// リフレッシュ成功後にアクセストークンのみ差し替える。
    pub async fn update_access(&self, access: String) {
        if let Some(tokens) = self.inner.write().await.as_mut() {
            tokens.access = access;
        }
    }

    pub async fn tokens(&self) -> Option<SessionTokens> {
        self.inner.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.access.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.refresh.clone())
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
