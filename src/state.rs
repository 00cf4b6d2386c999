use crate::application::ports::notifier::Notifier;
use crate::application::ports::session_store::SessionHandle;
use crate::application::{AuthService, NotificationService, PostService, UserService};
use crate::infrastructure::api::HttpApiGateway;
use crate::infrastructure::notify::TracingNotifier;
use crate::infrastructure::storage::KeyringSessionStore;
use crate::shared::{AppConfig, AppError};
use crate::store::Store;
use std::sync::Arc;

/// アプリケーション全体の状態。
///
/// ひとつの `HttpApiGateway` を全サービスで共有し、セッションハンドルを
/// 介してトークンのリフレッシュを認証サービスと同期する。
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<Store>,
    pub session: SessionHandle,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// 通知をログへ流す既定の構成で初期化する。
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        Self::with_notifier(config, Arc::new(TracingNotifier))
    }

    pub fn with_notifier(
        config: AppConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let store = Arc::new(Store::new());
        let session = SessionHandle::new();
        let session_store = Arc::new(KeyringSessionStore::new(
            config.session.service_name.clone(),
        ));
        let gateway = Arc::new(HttpApiGateway::new(
            &config.api,
            session.clone(),
            session_store.clone(),
        )?);

        let auth_service = Arc::new(AuthService::new(
            gateway.clone(),
            session_store,
            session.clone(),
            store.clone(),
            notifier.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            gateway.clone(),
            gateway.clone(),
            store.clone(),
            notifier.clone(),
        ));
        let post_service = Arc::new(PostService::new(
            gateway.clone(),
            store.clone(),
            notifier.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            gateway,
            store.clone(),
            notifier,
        ));

        Ok(Self {
            config,
            store,
            session,
            auth_service,
            user_service,
            post_service,
            notification_service,
        })
    }
}
