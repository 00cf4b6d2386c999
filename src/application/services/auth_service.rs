use crate::application::ports::gateway::{AuthGateway, Credentials, RegisterRequest};
use crate::application::ports::notifier::Notifier;
use crate::application::ports::session_store::{SessionHandle, SessionStore, SessionTokens};
use crate::domain::entities::User;
use crate::shared::AppError;
use crate::store::Store;
use std::sync::Arc;
use tracing::{info, warn};

/// 認証ライフサイクルを扱うサービス。
///
/// トークンは `SessionHandle`（メモリ）と `SessionStore`（永続）の
/// 二層で持つ。永続層への書き込み失敗はセッション自体を壊さない
/// （ログに残して続行する）。
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    session_store: Arc<dyn SessionStore>,
    session: SessionHandle,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        session_store: Arc<dyn SessionStore>,
        session: SessionHandle,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            session_store,
            session,
            store,
            notifier,
        }
    }

    async fn report_failure(&self, err: &AppError) {
        let message = err.user_message();
        self.store.auth.fail(message.clone()).await;
        self.notifier.error(&message);
    }

    /// 新規登録。成功してもセッションは張らない（ログインへ誘導する）。
    pub async fn register(&self, request: RegisterRequest) -> Result<(), AppError> {
        match self.gateway.register(&request).await {
            Ok(()) => {
                self.notifier
                    .success("登録が完了しました。ログインしてください");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, AppError> {
        self.store.auth.begin().await;
        match self.gateway.login(&credentials).await {
            Ok(session) => {
                let tokens = SessionTokens {
                    access: session.access_token,
                    refresh: session.refresh_token,
                };
                self.session.replace(Some(tokens.clone())).await;
                if let Err(err) = self.session_store.save(&tokens).await {
                    warn!("failed to persist session tokens: {err}");
                }
                self.store.auth.establish(session.user.clone()).await;
                info!(user_id = session.user.id, "login succeeded");
                Ok(session.user)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// ログアウト。サーバー側の失効に失敗してもローカルは必ず破棄する。
    pub async fn logout(&self) -> Result<(), AppError> {
        if let Some(refresh) = self.session.refresh_token().await {
            if let Err(err) = self.gateway.logout(&refresh).await {
                warn!("server-side token revocation failed: {err}");
            }
        }
        self.session.clear().await;
        if let Err(err) = self.session_store.clear().await {
            warn!("failed to clear persisted session: {err}");
        }
        self.store.clear_session_data().await;
        self.notifier.success("ログアウトしました");
        Ok(())
    }

    /// 起動時の復元。`Ok(true)` で認証済み、`Ok(false)` は保存済み
    /// セッションなし。認証エラーは永続セッションごと破棄し、
    /// ネットワークエラーは永続セッションを残して次回に再試行させる。
    pub async fn rehydrate(&self) -> Result<bool, AppError> {
        let Some(tokens) = self.session_store.load().await? else {
            return Ok(false);
        };
        self.session.replace(Some(tokens)).await;
        self.store.auth.begin().await;
        match self.gateway.current_user().await {
            Ok(user) => {
                info!(user_id = user.id, "session restored");
                self.store.auth.establish(user).await;
                Ok(true)
            }
            Err(err) => {
                self.session.clear().await;
                if err.is_auth() {
                    if let Err(clear_err) = self.session_store.clear().await {
                        warn!("failed to discard stale session: {clear_err}");
                    }
                }
                self.store.auth.clear().await;
                Err(err)
            }
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.store.auth.current_user().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.store.auth.is_authenticated().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::gateway::AuthSession;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Gateway {}

        #[async_trait]
        impl AuthGateway for Gateway {
            async fn register(&self, request: &RegisterRequest) -> Result<(), AppError>;
            async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AppError>;
            async fn logout(&self, refresh_token: &str) -> Result<(), AppError>;
            async fn current_user(&self) -> Result<User, AppError>;
        }
    }

    mock! {
        pub Sessions {}

        #[async_trait]
        impl SessionStore for Sessions {
            async fn save(&self, tokens: &SessionTokens) -> Result<(), AppError>;
            async fn load(&self) -> Result<Option<SessionTokens>, AppError>;
            async fn clear(&self) -> Result<(), AppError>;
        }
    }

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn success(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    fn credentials() -> Credentials {
        Credentials {
            username_or_email: "alice".into(),
            password: "secret".into(),
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            user: User::new(1, "alice".into()),
        }
    }

    fn tokens() -> SessionTokens {
        SessionTokens {
            access: "access-1".into(),
            refresh: "refresh-1".into(),
        }
    }

    fn service_with(
        gateway: MockGateway,
        sessions: MockSessions,
    ) -> (AuthService, Arc<Store>, SessionHandle) {
        let store = Arc::new(Store::new());
        let handle = SessionHandle::new();
        let service = AuthService::new(
            Arc::new(gateway),
            Arc::new(sessions),
            handle.clone(),
            Arc::clone(&store),
            Arc::new(SilentNotifier),
        );
        (service, store, handle)
    }

    #[tokio::test]
    async fn login_establishes_session_and_persists_tokens() {
        let mut gateway = MockGateway::new();
        gateway.expect_login().times(1).returning(|_| Ok(session()));
        let mut sessions = MockSessions::new();
        sessions.expect_save().times(1).returning(|_| Ok(()));

        let (service, store, handle) = service_with(gateway, sessions);
        let user = service.login(credentials()).await.unwrap();

        assert_eq!(user.id, 1);
        assert!(store.auth.is_authenticated().await);
        assert_eq!(handle.tokens().await.unwrap(), tokens());
    }

    #[tokio::test]
    async fn login_survives_persistence_failure() {
        let mut gateway = MockGateway::new();
        gateway.expect_login().times(1).returning(|_| Ok(session()));
        let mut sessions = MockSessions::new();
        sessions
            .expect_save()
            .times(1)
            .returning(|_| Err(AppError::storage("keyring unavailable")));

        let (service, store, handle) = service_with(gateway, sessions);
        service.login(credentials()).await.unwrap();

        assert!(store.auth.is_authenticated().await);
        assert!(handle.tokens().await.is_some());
    }

    #[tokio::test]
    async fn logout_clears_local_state_even_when_revocation_fails() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_logout()
            .times(1)
            .returning(|_| Err(AppError::network("connection reset")));
        let mut sessions = MockSessions::new();
        sessions.expect_clear().times(1).returning(|| Ok(()));

        let (service, store, handle) = service_with(gateway, sessions);
        handle.replace(Some(tokens())).await;
        store.auth.establish(User::new(1, "alice".into())).await;

        service.logout().await.unwrap();

        assert!(!store.auth.is_authenticated().await);
        assert!(handle.tokens().await.is_none());
    }

    #[tokio::test]
    async fn rehydrate_without_stored_session_is_quiet() {
        let gateway = MockGateway::new();
        let mut sessions = MockSessions::new();
        sessions.expect_load().times(1).returning(|| Ok(None));

        let (service, store, _handle) = service_with(gateway, sessions);
        assert!(!service.rehydrate().await.unwrap());
        assert!(!store.auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn rehydrate_discards_session_rejected_by_server() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_current_user()
            .times(1)
            .returning(|| Err(AppError::auth("token expired")));
        let mut sessions = MockSessions::new();
        sessions.expect_load().times(1).returning(|| Ok(Some(tokens())));
        sessions.expect_clear().times(1).returning(|| Ok(()));

        let (service, store, handle) = service_with(gateway, sessions);
        assert!(service.rehydrate().await.is_err());
        assert!(!store.auth.is_authenticated().await);
        assert!(handle.tokens().await.is_none());
    }

    #[tokio::test]
    async fn rehydrate_keeps_persisted_session_on_network_failure() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_current_user()
            .times(1)
            .returning(|| Err(AppError::network("timeout")));
        let mut sessions = MockSessions::new();
        sessions.expect_load().times(1).returning(|| Ok(Some(tokens())));
        // expect_clear は登録しない: 呼ばれたらテストが落ちる

        let (service, store, _handle) = service_with(gateway, sessions);
        assert!(service.rehydrate().await.is_err());
        assert!(!store.auth.is_authenticated().await);
    }
}
