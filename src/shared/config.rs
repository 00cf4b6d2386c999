use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_KEYRING_SERVICE: &str = "sazanami";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// バックエンドのベース URL（末尾スラッシュなし）。
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// キーリングに登録するサービス名。
    pub service_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            session: SessionConfig {
                service_name: DEFAULT_KEYRING_SERVICE.to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 環境変数からの上書きを反映した設定を返す。
    ///
    /// `SAZANAMI_API_URL` / `SAZANAMI_API_TIMEOUT_SECS` / `SAZANAMI_KEYRING_SERVICE`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("SAZANAMI_API_URL") {
            if !url.trim().is_empty() {
                config.api.base_url = url.trim_end_matches('/').to_string();
            }
        }
        if let Ok(timeout) = std::env::var("SAZANAMI_API_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.api.timeout_secs = secs;
            }
        }
        if let Ok(service) = std::env::var("SAZANAMI_KEYRING_SERVICE") {
            if !service.trim().is_empty() {
                config.session.service_name = service;
            }
        }
        config
    }
}
