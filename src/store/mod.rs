//! エンティティスライス群。
//!
//! 各スライスは自分のモジュールが排他的に所有し、外部からは
//! スナップショット読み取りとミューテーション用メソッドだけを公開する。

pub mod auth;
pub mod notifications;
pub mod posts;
pub mod sync;
pub mod users;

pub use auth::AuthState;
pub use notifications::NotificationsState;
pub use posts::PostsState;
pub use users::UsersState;

/// 全スライスをまとめたストア。
#[derive(Default)]
pub struct Store {
    pub auth: AuthState,
    pub posts: PostsState,
    pub users: UsersState,
    pub notifications: NotificationsState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// ログアウト時にセッション由来の状態をすべて破棄する。
    pub async fn clear_session_data(&self) {
        self.auth.clear().await;
        self.posts.clear().await;
        self.users.clear().await;
        self.notifications.clear().await;
    }
}
