use super::user::User;
use crate::domain::value_objects::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// フォロー関係。(follower, following) の組以外に独立した同一性を持たない。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FollowEdge {
    pub follower: UserId,
    pub following: UserId,
}

impl FollowEdge {
    pub fn new(follower: UserId, following: UserId) -> Self {
        Self {
            follower,
            following,
        }
    }
}

/// フォロワー・フォロー中一覧 API が返す、ユーザー埋め込みの関係。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowLink {
    pub id: u64,
    pub follower: User,
    pub following: User,
    pub created_at: DateTime<Utc>,
}

impl FollowLink {
    pub fn edge(&self) -> FollowEdge {
        FollowEdge::new(self.follower.id, self.following.id)
    }
}
