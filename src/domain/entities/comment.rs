use super::user::User;
use crate::domain::value_objects::{CommentId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    #[serde(default)]
    pub post_id: PostId,
    pub content: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}
