use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct AuthInner {
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
    last_error: Option<String>,
}

/// 認証スライス。トークン自体は `SessionHandle` が持ち、
/// ここには閲覧者のユーザーレコードと認証状態だけを置く。
#[derive(Default)]
pub struct AuthState {
    inner: RwLock<AuthInner>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self) {
        let mut inner = self.inner.write().await;
        inner.is_loading = true;
        inner.last_error = None;
    }

    pub async fn fail(&self, message: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.last_error = Some(message.into());
    }

    /// ログイン・再水和の成功。
    pub async fn establish(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.user = Some(user);
        inner.is_authenticated = true;
        inner.is_loading = false;
        inner.last_error = None;
    }

    /// 未認証状態へ戻す。
    pub async fn clear(&self) {
        *self.inner.write().await = AuthInner::default();
    }

    /// プロフィール更新の反映。
    pub async fn set_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.user = Some(user);
    }

    /// 閲覧者レコードへの伝播（フォロー時の `following_count` など）。
    pub async fn mutate_user<F>(&self, transform: F)
    where
        F: Fn(&mut User),
    {
        if let Some(user) = self.inner.write().await.user.as_mut() {
            transform(user);
        }
    }

    // --- スナップショット ---

    pub async fn current_user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    pub async fn viewer_id(&self) -> Option<UserId> {
        self.inner.read().await.user.as_ref().map(|u| u.id)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }
}
