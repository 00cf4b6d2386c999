use super::post::Post;
use super::user::User;
use crate::domain::value_objects::{NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
}

/// サーバーが生成する通知。クライアント側では未読管理のみ行う。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub sender: User,
    #[serde(rename = "notification_type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub post: Option<Post>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
