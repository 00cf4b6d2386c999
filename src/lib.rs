//! sazanami: ソーシャルアプリのクライアント側状態同期コア。
//!
//! REST バックエンドとの通信（`infrastructure::api`）、確定結果の
//! 各ビューへの伝播（`store`）、それらを束ねるサービス層
//! （`application::services`）から成る。

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;
pub mod store;

pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;

/// ログ設定の初期化。`RUST_LOG` が無ければ既定フィルタを使う。
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sazanami=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
