use crate::domain::value_objects::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// ユーザーのプロフィールとカウンター。
///
/// `followers_count` / `following_count` / `posts_count` はサーバー側の
/// 非正規化カウンター。`is_following` は閲覧者から見たフラグで、
/// ユーザー自身の属性ではない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_following: bool,
}

fn default_is_active() -> bool {
    true
}

impl User {
    pub fn new(id: UserId, username: String) -> Self {
        Self {
            id,
            username,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            avatar_url: None,
            website: None,
            location: None,
            followers_count: 0,
            following_count: 0,
            posts_count: 0,
            role: UserRole::User,
            is_active: true,
            date_joined: None,
            last_login: None,
            is_following: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// 閲覧者がこのユーザーをフォローした際のカウンター遷移。
    pub fn mark_followed(&mut self) {
        self.followers_count += 1;
        self.is_following = true;
    }

    /// `mark_followed` の逆遷移。
    pub fn mark_unfollowed(&mut self) {
        self.followers_count = self.followers_count.saturating_sub(1);
        self.is_following = false;
    }

    pub fn apply_patch(&mut self, patch: &UserPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(bio) = &patch.bio {
            self.bio = bio.clone();
        }
        if let Some(website) = &patch.website {
            self.website = Some(website.clone());
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(avatar_url) = &patch.avatar_url {
            self.avatar_url = Some(avatar_url.clone());
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
    }
}

/// プロフィール更新・管理者編集で送る部分更新。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 管理者のみ変更可能。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// 管理者のみ変更可能。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// 管理画面向けの集計値。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: u64,
    pub total_active_users: u64,
    pub admin_users: u64,
    pub regular_users: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_round_trip_restores_counters() {
        let mut user = User::new(2, "bob".into());
        user.followers_count = 5;

        user.mark_followed();
        assert_eq!(user.followers_count, 6);
        assert!(user.is_following);

        user.mark_unfollowed();
        assert_eq!(user.followers_count, 5);
        assert!(!user.is_following);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user = User::new(1, "alice".into());
        assert_eq!(user.display_name(), "alice");

        user.first_name = "Alice".into();
        user.last_name = "Aoyama".into();
        assert_eq!(user.display_name(), "Alice Aoyama");
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut user = User::new(1, "alice".into());
        user.bio = "old".into();

        user.apply_patch(&UserPatch {
            bio: Some("new".into()),
            ..UserPatch::default()
        });
        assert_eq!(user.bio, "new");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
    }
}
