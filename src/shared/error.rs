use crate::shared::validation::ValidationFailureKind;
use thiserror::Error;

/// クレート全体で使用するエラー型。
///
/// ゲートウェイ（リモート API）の失敗分類をそのまま持ち、
/// サービス層で握りつぶさずにスライスの `last_error` と通知へ流す。
#[derive(Debug, Error)]
pub enum AppError {
    /// 認証エラー（未認証・リフレッシュ失敗後の 401）。
    #[error("Auth error: {0}")]
    Auth(String),
    /// 入力バリデーションエラー（サーバー側 400 を含む）。
    #[error("Validation error ({kind}): {message}")]
    Validation {
        kind: ValidationFailureKind,
        message: String,
    },
    /// 権限エラー（ロール・所有者チェックの失敗）。
    #[error("Permission denied: {0}")]
    Permission(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// トランスポート障害。サーバー側の状態は不明。
    #[error("Network error: {0}")]
    Network(String),
    /// キーリング等ローカルストレージのエラー。
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn auth(message: impl Into<String>) -> Self {
        AppError::Auth(message.into())
    }

    pub fn validation(kind: ValidationFailureKind, message: impl Into<String>) -> Self {
        AppError::Validation {
            kind,
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        AppError::Permission(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        AppError::Network(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AppError::Storage(message.into())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// ユーザー向け通知に使う短いメッセージ。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
