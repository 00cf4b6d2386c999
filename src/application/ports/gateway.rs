//! バックエンド REST API への型付きポート。
//!
//! 実装は `infrastructure::api`。失敗は `AppError` の分類
//! （Auth / Validation / Permission / NotFound / Network）で返す。

use crate::domain::entities::{
    Comment, FollowLink, NewPost, Notification, Post, PostPatch, User, UserPatch, UserStats,
};
use crate::domain::value_objects::{CommentId, NotificationId, PageRequest, PostId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 新規登録の入力。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username_or_email: String,
    pub password: String,
}

/// ログイン成功時にサーバーが返すセッション一式。
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// ユーザー一覧 API のページ付き応答。
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<(), AppError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AppError>;
    /// リフレッシュトークンを失効させる。
    async fn logout(&self, refresh_token: &str) -> Result<(), AppError>;
    async fn current_user(&self) -> Result<User, AppError>;
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn list_users(&self, request: PageRequest) -> Result<UserPage, AppError>;
    async fn search_users(&self, query: &str) -> Result<UserPage, AppError>;
    async fn get_user(&self, id: UserId) -> Result<User, AppError>;
    async fn get_user_posts(&self, id: UserId) -> Result<Vec<Post>, AppError>;
    async fn update_me(&self, patch: &UserPatch) -> Result<User, AppError>;
    /// 管理者によるユーザー編集。
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<User, AppError>;
    /// 管理者によるユーザー削除。
    async fn delete_user(&self, id: UserId) -> Result<(), AppError>;
    /// 管理画面向けの集計値。
    async fn user_stats(&self) -> Result<UserStats, AppError>;
}

#[async_trait]
pub trait PostGateway: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;
    async fn feed(&self) -> Result<Vec<Post>, AppError>;
    async fn get_post(&self, id: PostId) -> Result<Post, AppError>;
    async fn create_post(&self, post: &NewPost) -> Result<Post, AppError>;
    async fn update_post(&self, id: PostId, patch: &PostPatch) -> Result<Post, AppError>;
    async fn delete_post(&self, id: PostId) -> Result<(), AppError>;
    async fn like_post(&self, id: PostId) -> Result<(), AppError>;
    async fn unlike_post(&self, id: PostId) -> Result<(), AppError>;
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, AppError>;
    async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment, AppError>;
    async fn delete_comment(&self, id: CommentId) -> Result<(), AppError>;
}

#[async_trait]
pub trait SocialGateway: Send + Sync {
    async fn follow(&self, user_id: UserId) -> Result<(), AppError>;
    async fn unfollow(&self, user_id: UserId) -> Result<(), AppError>;
    async fn followers(&self, user_id: UserId) -> Result<Vec<FollowLink>, AppError>;
    async fn following(&self, user_id: UserId) -> Result<Vec<FollowLink>, AppError>;
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError>;
    async fn mark_read(&self, id: NotificationId) -> Result<(), AppError>;
    async fn mark_all_read(&self) -> Result<(), AppError>;
}
