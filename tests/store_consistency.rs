//! サービス層から実ゲートウェイまで通した、ビュー間整合性の結合テスト。
//! ひとつのミューテーション確定が全キャッシュコピーへ同時に反映される
//! ことを確認する。

mod common;

use common::{api_config, comment_json, paginated, post_json, user_json, MemorySessionStore};
use sazanami::application::ports::notifier::Notifier;
use sazanami::application::ports::session_store::SessionHandle;
use sazanami::application::{NotificationService, PostService, UserService};
use sazanami::domain::entities::User;
use sazanami::domain::value_objects::PageInfo;
use sazanami::infrastructure::api::HttpApiGateway;
use sazanami::store::Store;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

async fn gateway(server: &MockServer) -> Arc<HttpApiGateway> {
    Arc::new(
        HttpApiGateway::new(
            &api_config(&server.uri()),
            SessionHandle::new(),
            Arc::new(MemorySessionStore::new()),
        )
        .expect("gateway"),
    )
}

fn post_from(value: Value) -> sazanami::domain::entities::Post {
    serde_json::from_value(value).expect("post fixture")
}

fn user_from(value: Value) -> User {
    serde_json::from_value(value).expect("user fixture")
}

#[tokio::test]
async fn confirmed_like_reaches_every_view_at_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/42/like/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "liked" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let service = PostService::new(gateway(&server).await, store.clone(), Arc::new(SilentNotifier));

    let cached = post_from(post_json(42, 10, false));
    store.posts.set_posts(vec![cached.clone()]).await;
    store.posts.set_feed(vec![cached.clone()]).await;
    store.users.set_selected_posts(vec![cached]).await;

    service.like_post(42).await.unwrap();

    for view in [
        store.posts.posts().await,
        store.posts.feed().await,
        store.users.selected_posts().await,
    ] {
        assert_eq!(view[0].like_count, 11);
        assert!(view[0].is_liked);
    }
}

#[tokio::test]
async fn confirmed_follow_updates_view_edges_and_viewer_counter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/5/follow/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "followed" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let gw = gateway(&server).await;
    let service = UserService::new(gw.clone(), gw, store.clone(), Arc::new(SilentNotifier));

    let mut viewer = user_from(user_json(1, "alice"));
    viewer.following_count = 3;
    store.auth.establish(viewer).await;

    let mut target = user_from(user_json(5, "carol"));
    target.followers_count = 5;
    store
        .users
        .set_users(vec![target.clone()], PageInfo::single_page(1))
        .await;
    store.users.set_selected_user(Some(target)).await;

    service.follow(5).await.unwrap();

    let listed = &store.users.users().await[0];
    assert_eq!(listed.followers_count, 6);
    assert!(listed.is_following);
    assert_eq!(
        store.users.selected_user().await.unwrap().followers_count,
        6
    );
    assert_eq!(store.auth.current_user().await.unwrap().following_count, 4);
    assert!(store.users.has_follow_edge(1, 5).await);
}

#[tokio::test]
async fn confirmed_comment_bumps_parent_count_everywhere() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/42/comments/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(comment_json(7, 42, "nice")))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let service = PostService::new(gateway(&server).await, store.clone(), Arc::new(SilentNotifier));

    let cached = post_from(post_json(42, 0, false));
    store.posts.set_posts(vec![cached.clone()]).await;
    store.posts.set_feed(vec![cached]).await;

    service.create_comment(42, "nice").await.unwrap();

    assert_eq!(store.posts.posts().await[0].comment_count, 1);
    assert_eq!(store.posts.feed().await[0].comment_count, 1);
    assert_eq!(store.posts.comments().await[0].content, "nice");
}

#[tokio::test]
async fn failed_like_leaves_all_views_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts/42/like/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let service = PostService::new(gateway(&server).await, store.clone(), Arc::new(SilentNotifier));

    let cached = post_from(post_json(42, 10, false));
    store.posts.set_posts(vec![cached.clone()]).await;
    store.posts.set_feed(vec![cached]).await;

    assert!(service.like_post(42).await.is_err());

    for view in [store.posts.posts().await, store.posts.feed().await] {
        assert_eq!(view[0].like_count, 10);
        assert!(!view[0].is_liked);
    }
    assert!(store.posts.last_error().await.is_some());
}

#[tokio::test]
async fn short_search_query_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paginated(0, None, vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let gw = gateway(&server).await;
    let service = UserService::new(gw.clone(), gw, store.clone(), Arc::new(SilentNotifier));

    assert!(service.search_users("a").await.is_err());
}

#[tokio::test]
async fn notification_fetch_is_throttled_between_polls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notifications/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "recipient": 1,
            "sender": user_json(2, "bob"),
            "notification_type": "like",
            "message": "bob liked your post",
            "is_read": false,
            "created_at": "2026-08-01T13:00:00Z",
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(Store::new());
    let service = NotificationService::new(
        gateway(&server).await,
        store.clone(),
        Arc::new(SilentNotifier),
    );

    service.fetch_notifications().await.unwrap();
    // 取得間隔内の再取得はサーバーへ到達しない
    let cached = service.fetch_notifications().await.unwrap();

    assert_eq!(cached.len(), 1);
    assert_eq!(store.notifications.unread_count().await, 1);
}
