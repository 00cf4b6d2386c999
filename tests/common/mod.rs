//! 結合テスト共通のフィクスチャ。
#![allow(dead_code)]

use async_trait::async_trait;
use sazanami::application::ports::session_store::{SessionStore, SessionTokens};
use sazanami::shared::config::ApiConfig;
use sazanami::shared::AppError;
use serde_json::{json, Value};
use std::sync::Mutex;

/// キーリングの代わりに使うメモリ上のセッション永続化。
#[derive(Default)]
pub struct MemorySessionStore {
    tokens: Mutex<Option<SessionTokens>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Option<SessionTokens> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, tokens: &SessionTokens) -> Result<(), AppError> {
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<SessionTokens>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "first_name": "",
        "last_name": "",
        "followers_count": 0,
        "following_count": 0,
        "posts_count": 0,
        "role": "user",
        "is_active": true,
        "is_following": false,
    })
}

pub fn post_json(id: u64, like_count: u32, is_liked: bool) -> Value {
    json!({
        "id": id,
        "content": "hello world",
        "author": user_json(1, "alice"),
        "created_at": "2026-08-01T12:00:00Z",
        "updated_at": "2026-08-01T12:00:00Z",
        "category": "general",
        "is_active": true,
        "like_count": like_count,
        "comment_count": 0,
        "is_liked": is_liked,
    })
}

pub fn comment_json(id: u64, post_id: u64, content: &str) -> Value {
    json!({
        "id": id,
        "post_id": post_id,
        "content": content,
        "author": user_json(2, "bob"),
        "created_at": "2026-08-01T12:30:00Z",
        "is_active": true,
    })
}

pub fn paginated(count: u64, next: Option<&str>, results: Vec<Value>) -> Value {
    json!({
        "count": count,
        "next": next,
        "previous": Value::Null,
        "results": results,
    })
}
