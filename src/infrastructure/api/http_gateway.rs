//! reqwest ベースのゲートウェイ実装。
//!
//! 全リクエストに共通して、アクセストークンの付与と 401 応答時の
//! サイレントリフレッシュ（一度だけ）を行う。リフレッシュ後の再送も
//! 401 なら認証エラーとして呼び出し側へ返す。

use super::dto::{ErrorBody, ListResponse, LoginResponse, Paginated, RefreshResponse};
use crate::application::ports::gateway::{
    AuthGateway, AuthSession, Credentials, NotificationGateway, PostGateway, RegisterRequest,
    SocialGateway, UserGateway, UserPage,
};
use crate::application::ports::session_store::{SessionHandle, SessionStore};
use crate::domain::entities::{
    Comment, FollowLink, NewPost, Notification, Post, PostPatch, User, UserPatch, UserStats,
};
use crate::domain::value_objects::{CommentId, NotificationId, PageRequest, PostId, UserId};
use crate::shared::config::ApiConfig;
use crate::shared::{AppError, ValidationFailureKind};
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpApiGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    session_store: Arc<dyn SessionStore>,
}

impl HttpApiGateway {
    pub fn new(
        config: &ApiConfig,
        session: SessionHandle,
        session_store: Arc<dyn SessionStore>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("HTTP クライアントの構築に失敗: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            session_store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// アクセストークンを付けて一度送り、401 ならリフレッシュして
    /// 同じリクエストをもう一度だけ送る。
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, AppError> {
        let response = self.send_once(method.clone(), path, query, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        // 認証エンドポイント自身の 401 はリフレッシュ対象にしない
        if path.starts_with("/auth/") {
            return Ok(response);
        }
        if !self.try_refresh().await {
            return Ok(response);
        }
        debug!(path, "access token refreshed, retrying request");
        self.send_once(method, path, query, body).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, AppError> {
        let mut request = self.client.request(method, self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.access_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// リフレッシュトークンで新しいアクセストークンを取得する。
    /// 成功時はメモリと永続層の両方を更新する。失敗は呼び出し元で
    /// 元の 401 として扱わせるため bool で返す。
    async fn try_refresh(&self) -> bool {
        let Some(refresh) = self.session.refresh_token().await else {
            return false;
        };
        let result = self
            .client
            .post(self.url("/token/refresh/"))
            .json(&json!({ "refresh": refresh }))
            .send()
            .await;
        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "token refresh rejected");
                return false;
            }
            Err(err) => {
                warn!("token refresh request failed: {err}");
                return false;
            }
        };
        let Ok(refreshed) = response.json::<RefreshResponse>().await else {
            return false;
        };
        self.session.update_access(refreshed.access).await;
        if let Some(tokens) = self.session.tokens().await {
            if let Err(err) = self.session_store.save(&tokens).await {
                warn!("failed to persist refreshed tokens: {err}");
            }
        }
        true
    }

    /// 非 2xx 応答を `AppError` の失敗分類へ写像する。
    async fn into_error(response: Response) -> AppError {
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::validation(ValidationFailureKind::Generic, message)
            }
            StatusCode::UNAUTHORIZED => AppError::auth(message),
            StatusCode::FORBIDDEN => AppError::Permission(message),
            StatusCode::NOT_FOUND => AppError::not_found(message),
            _ => AppError::network(format!("サーバーエラー ({status}): {message}")),
        }
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, AppError> {
        let response = self.send(method, path, query, body).await?;
        if !response.status().is_success() {
            return Err(Self::into_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), AppError> {
        let response = self.send(method, path, &[], body).await?;
        if !response.status().is_success() {
            return Err(Self::into_error(response).await);
        }
        Ok(())
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AppError> {
        let list: ListResponse<T> = self.request_json(Method::GET, path, &[], None).await?;
        Ok(list.into_results())
    }

    fn user_page(page: Paginated<User>) -> UserPage {
        UserPage {
            users: page.results,
            total_count: page.count,
            has_next: page.next.is_some(),
            has_previous: page.previous.is_some(),
        }
    }
}

#[async_trait]
impl AuthGateway for HttpApiGateway {
    async fn register(&self, request: &RegisterRequest) -> Result<(), AppError> {
        let body = serde_json::to_value(request)?;
        self.request_unit(Method::POST, "/auth/register/", Some(&body))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AppError> {
        let body = json!({
            "username_or_email": credentials.username_or_email,
            "password": credentials.password,
        });
        let response: LoginResponse = self
            .request_json(Method::POST, "/auth/login/", &[], Some(&body))
            .await?;
        Ok(AuthSession {
            access_token: response.token,
            refresh_token: response.refresh,
            user: response.user,
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let body = json!({ "refresh": refresh_token });
        self.request_unit(Method::POST, "/auth/logout/", Some(&body))
            .await
    }

    async fn current_user(&self) -> Result<User, AppError> {
        self.request_json(Method::GET, "/users/me/", &[], None).await
    }
}

#[async_trait]
impl UserGateway for HttpApiGateway {
    async fn list_users(&self, request: PageRequest) -> Result<UserPage, AppError> {
        let query = [
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];
        let page: Paginated<User> = self
            .request_json(Method::GET, "/users/", &query, None)
            .await?;
        Ok(Self::user_page(page))
    }

    async fn search_users(&self, query: &str) -> Result<UserPage, AppError> {
        let query = [("q", query.to_string())];
        let page: Paginated<User> = self
            .request_json(Method::GET, "/users/search/", &query, None)
            .await?;
        Ok(Self::user_page(page))
    }

    async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        self.request_json(Method::GET, &format!("/userdetails/{id}/"), &[], None)
            .await
    }

    async fn get_user_posts(&self, id: UserId) -> Result<Vec<Post>, AppError> {
        self.get_list(&format!("/userdetails/{id}/post/")).await
    }

    async fn update_me(&self, patch: &UserPatch) -> Result<User, AppError> {
        let body = serde_json::to_value(patch)?;
        self.request_json(Method::PATCH, "/users/me/", &[], Some(&body))
            .await
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<User, AppError> {
        let body = serde_json::to_value(patch)?;
        self.request_json(Method::PATCH, &format!("/users/{id}/admin/"), &[], Some(&body))
            .await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), AppError> {
        self.request_unit(Method::DELETE, &format!("/users/{id}/admin/"), None)
            .await
    }

    async fn user_stats(&self) -> Result<UserStats, AppError> {
        self.request_json(Method::GET, "/users/details/", &[], None)
            .await
    }
}

#[async_trait]
impl PostGateway for HttpApiGateway {
    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        self.get_list("/posts/").await
    }

    async fn feed(&self) -> Result<Vec<Post>, AppError> {
        self.get_list("/feed/").await
    }

    async fn get_post(&self, id: PostId) -> Result<Post, AppError> {
        self.request_json(Method::GET, &format!("/posts/{id}/"), &[], None)
            .await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, AppError> {
        let body = serde_json::to_value(post)?;
        self.request_json(Method::POST, "/posts/", &[], Some(&body))
            .await
    }

    async fn update_post(&self, id: PostId, patch: &PostPatch) -> Result<Post, AppError> {
        let body = serde_json::to_value(patch)?;
        self.request_json(Method::PATCH, &format!("/posts/{id}/"), &[], Some(&body))
            .await
    }

    async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        self.request_unit(Method::DELETE, &format!("/posts/{id}/"), None)
            .await
    }

    async fn like_post(&self, id: PostId) -> Result<(), AppError> {
        self.request_unit(Method::POST, &format!("/posts/{id}/like/"), None)
            .await
    }

    async fn unlike_post(&self, id: PostId) -> Result<(), AppError> {
        self.request_unit(Method::DELETE, &format!("/posts/{id}/unlike/"), None)
            .await
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>, AppError> {
        self.get_list(&format!("/posts/{post_id}/comments/")).await
    }

    async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment, AppError> {
        let body = json!({ "content": content });
        self.request_json(
            Method::POST,
            &format!("/posts/{post_id}/comments/"),
            &[],
            Some(&body),
        )
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), AppError> {
        self.request_unit(Method::DELETE, &format!("/comments/{id}/"), None)
            .await
    }
}

#[async_trait]
impl SocialGateway for HttpApiGateway {
    async fn follow(&self, user_id: UserId) -> Result<(), AppError> {
        self.request_unit(Method::POST, &format!("/users/{user_id}/follow/"), None)
            .await
    }

    async fn unfollow(&self, user_id: UserId) -> Result<(), AppError> {
        self.request_unit(Method::DELETE, &format!("/users/{user_id}/unfollow/"), None)
            .await
    }

    async fn followers(&self, user_id: UserId) -> Result<Vec<FollowLink>, AppError> {
        self.get_list(&format!("/userdetails/{user_id}/followers/"))
            .await
    }

    async fn following(&self, user_id: UserId) -> Result<Vec<FollowLink>, AppError> {
        self.get_list(&format!("/userdetails/{user_id}/following/"))
            .await
    }
}

#[async_trait]
impl NotificationGateway for HttpApiGateway {
    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.get_list("/notifications/").await
    }

    async fn mark_read(&self, id: NotificationId) -> Result<(), AppError> {
        self.request_unit(Method::POST, &format!("/notifications/{id}/read/"), None)
            .await
    }

    async fn mark_all_read(&self) -> Result<(), AppError> {
        self.request_unit(Method::POST, "/notifications/mark-all-read/", None)
            .await
    }
}
