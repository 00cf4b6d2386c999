//! サーバーが採番するエンティティ ID。

pub type UserId = u64;
pub type PostId = u64;
pub type CommentId = u64;
pub type NotificationId = u64;
