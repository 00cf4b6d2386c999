use super::sync::{apply_to_view, prepend_to_view, remove_from_view};
use crate::domain::entities::{Comment, Post};
use crate::domain::value_objects::{CommentId, PostId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct PostsInner {
    /// 自分のタイムライン相当の一覧。
    posts: Vec<Post>,
    /// フォロー中ユーザーのフィード。
    feed: Vec<Post>,
    current_post: Option<Post>,
    /// 現在開いている投稿のコメント一覧。
    comments: Vec<Comment>,
    is_loading: bool,
    is_creating: bool,
    last_error: Option<String>,
}

/// 投稿スライス。`posts` と `feed` は同じ投稿の非正規化コピーを持ち、
/// ミューテーション確定時に必ず一括で更新される。
#[derive(Default)]
pub struct PostsState {
    inner: RwLock<PostsInner>,
}

impl PostsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin_load(&self) {
        let mut inner = self.inner.write().await;
        inner.is_loading = true;
        inner.last_error = None;
    }

    /// 読み込み失敗。ビューは以前の内容を保持する。
    pub async fn fail(&self, message: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.is_creating = false;
        inner.last_error = Some(message.into());
    }

    pub async fn set_posts(&self, posts: Vec<Post>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.posts = posts;
    }

    pub async fn set_feed(&self, feed: Vec<Post>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.feed = feed;
    }

    pub async fn begin_create(&self) {
        let mut inner = self.inner.write().await;
        inner.is_creating = true;
        inner.last_error = None;
    }

    /// 新規投稿を両ビューの先頭へ置く。
    pub async fn insert_post(&self, post: Post) {
        let mut inner = self.inner.write().await;
        inner.is_creating = false;
        prepend_to_view(&mut inner.posts, post.clone());
        prepend_to_view(&mut inner.feed, post);
    }

    /// 確定したミューテーションを、投稿のコピーを持つ全ビューへ伝播する。
    pub async fn apply_post<F>(&self, id: PostId, transform: F)
    where
        F: Fn(&mut Post),
    {
        let mut inner = self.inner.write().await;
        apply_to_view(&mut inner.posts, id, &transform);
        apply_to_view(&mut inner.feed, id, &transform);
        if let Some(current) = inner.current_post.as_mut() {
            if current.id == id {
                transform(current);
            }
        }
    }

    /// サーバーが返した正準コピーで置き換える（投稿更新時）。
    pub async fn replace_post(&self, post: &Post) {
        self.apply_post(post.id, |entry| *entry = post.clone()).await;
    }

    pub async fn remove_post(&self, id: PostId) {
        let mut inner = self.inner.write().await;
        remove_from_view(&mut inner.posts, id);
        remove_from_view(&mut inner.feed, id);
        if inner.current_post.as_ref().is_some_and(|p| p.id == id) {
            inner.current_post = None;
        }
    }

    pub async fn set_current_post(&self, post: Option<Post>) {
        self.inner.write().await.current_post = post;
    }

    pub async fn set_comments(&self, comments: Vec<Comment>) {
        self.inner.write().await.comments = comments;
    }

    pub async fn prepend_comment(&self, comment: Comment) {
        let mut inner = self.inner.write().await;
        prepend_to_view(&mut inner.comments, comment);
    }

    /// コメントを一覧から外す。親投稿の `comment_count` は既存仕様どおり
    /// 減算しない（DESIGN.md の未解決事項）。
    pub async fn remove_comment(&self, id: CommentId) {
        let mut inner = self.inner.write().await;
        remove_from_view(&mut inner.comments, id);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = PostsInner::default();
    }

    // --- スナップショット ---

    pub async fn posts(&self) -> Vec<Post> {
        self.inner.read().await.posts.clone()
    }

    pub async fn feed(&self) -> Vec<Post> {
        self.inner.read().await.feed.clone()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.inner.read().await.comments.clone()
    }

    pub async fn current_post(&self) -> Option<Post> {
        self.inner.read().await.current_post.clone()
    }

    /// 投稿のコピーを持つどのビューからでも探す（伝播の前提条件チェック用）。
    pub async fn find_post(&self, id: PostId) -> Option<Post> {
        let inner = self.inner.read().await;
        inner
            .posts
            .iter()
            .chain(inner.feed.iter())
            .chain(inner.current_post.iter())
            .find(|post| post.id == id)
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn is_creating(&self) -> bool {
        self.inner.read().await.is_creating
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }
}
