use super::user::User;
use crate::domain::constants::MAX_POST_CONTENT_CHARS;
use crate::domain::value_objects::PostId;
use crate::shared::{AppError, ValidationFailureKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    #[default]
    General,
    Announcement,
    Question,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::General => "general",
            PostCategory::Announcement => "announcement",
            PostCategory::Question => "question",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 投稿。`like_count` と `is_liked` は必ず同時に遷移させる。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

fn default_is_active() -> bool {
    true
}

impl Post {
    /// いいね確定時の遷移。フラグとカウンターを一緒に動かす。
    pub fn mark_liked(&mut self) {
        self.is_liked = true;
        self.like_count += 1;
    }

    /// `mark_liked` の逆遷移。
    pub fn mark_unliked(&mut self) {
        self.is_liked = false;
        self.like_count = self.like_count.saturating_sub(1);
    }

    /// コメント作成確定時のカウンター加算。
    pub fn count_new_comment(&mut self) {
        self.comment_count += 1;
    }
}

/// 新規投稿の入力。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            category: PostCategory::General,
            image_url: None,
        }
    }

    pub fn with_category(mut self, category: PostCategory) -> Self {
        self.category = category;
        self
    }

    /// 本文を検証する。空・280 文字超過を弾く。
    pub fn validate(&self) -> Result<(), AppError> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation(
                ValidationFailureKind::ContentEmpty,
                "投稿内容を入力してください",
            ));
        }
        if self.content.chars().count() > MAX_POST_CONTENT_CHARS {
            return Err(AppError::validation(
                ValidationFailureKind::ContentTooLarge,
                format!("投稿は{MAX_POST_CONTENT_CHARS}文字以内で入力してください"),
            ));
        }
        Ok(())
    }
}

/// 投稿の部分更新（作者または管理者のみ）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PostCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remove_image: bool,
}
