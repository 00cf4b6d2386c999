use crate::application::ports::gateway::PostGateway;
use crate::application::ports::notifier::Notifier;
use crate::application::shared::in_flight::{InFlightGuard, MutationKind};
use crate::domain::entities::{Comment, NewPost, Post, PostPatch};
use crate::domain::value_objects::{CommentId, PostId};
use crate::shared::{AppError, ValidationFailureKind};
use crate::store::Store;
use std::sync::Arc;
use tracing::debug;

/// 投稿とコメントのインテントを受け付け、確定した結果だけを
/// 各ビューへ伝播するサービス。
///
/// 伝播はゲートウェイ成功の応答処理内でのみ行う。失敗時は
/// ローカル状態へ一切手を付けない（楽観更新はしない）。
pub struct PostService {
    gateway: Arc<dyn PostGateway>,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlightGuard,
}

impl PostService {
    pub fn new(gateway: Arc<dyn PostGateway>, store: Arc<Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            store,
            notifier,
            in_flight: InFlightGuard::new(),
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> &InFlightGuard {
        &self.in_flight
    }

    async fn report_failure(&self, err: &AppError) {
        let message = err.user_message();
        self.store.posts.fail(message.clone()).await;
        self.notifier.error(&message);
    }

    /// いいね前提条件の判定に使う、投稿のコピーを持つ全ビュー横断の検索。
    async fn find_cached_post(&self, id: PostId) -> Option<Post> {
        match self.store.posts.find_post(id).await {
            Some(post) => Some(post),
            None => self.store.users.find_selected_post(id).await,
        }
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>, AppError> {
        self.store.posts.begin_load().await;
        match self.gateway.list_posts().await {
            Ok(posts) => {
                self.store.posts.set_posts(posts.clone()).await;
                Ok(posts)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_feed(&self) -> Result<Vec<Post>, AppError> {
        self.store.posts.begin_load().await;
        match self.gateway.feed().await {
            Ok(feed) => {
                self.store.posts.set_feed(feed.clone()).await;
                Ok(feed)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// 投稿詳細の取得。取得したコピーも以後の伝播対象になる。
    pub async fn fetch_post(&self, id: PostId) -> Result<Post, AppError> {
        match self.gateway.get_post(id).await {
            Ok(post) => {
                self.store.posts.set_current_post(Some(post.clone())).await;
                Ok(post)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        if let Err(err) = new_post.validate() {
            self.report_failure(&err).await;
            return Err(err);
        }
        self.store.posts.begin_create().await;
        match self.gateway.create_post(&new_post).await {
            Ok(post) => {
                self.store.posts.insert_post(post.clone()).await;
                self.notifier.success("投稿を作成しました");
                Ok(post)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// 投稿更新。サーバーが返した正準コピーで全ビューを置き換える。
    pub async fn update_post(&self, id: PostId, patch: PostPatch) -> Result<Post, AppError> {
        match self.gateway.update_post(id, &patch).await {
            Ok(post) => {
                self.store.posts.replace_post(&post).await;
                self.store
                    .users
                    .apply_selected_post(id, |entry| *entry = post.clone())
                    .await;
                self.notifier.success("投稿を更新しました");
                Ok(post)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn delete_post(&self, id: PostId) -> Result<(), AppError> {
        match self.gateway.delete_post(id).await {
            Ok(()) => {
                self.store.posts.remove_post(id).await;
                self.store.users.remove_selected_post(id).await;
                self.notifier.success("投稿を削除しました");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// いいね。在途中の同一インテントと、既にいいね済みの投稿は no-op。
    pub async fn like_post(&self, id: PostId) -> Result<(), AppError> {
        let Some(_token) = self.in_flight.try_begin(MutationKind::Like, id) else {
            debug!(post_id = id, "like intent already in flight, suppressed");
            return Ok(());
        };
        if let Some(post) = self.find_cached_post(id).await {
            if post.is_liked {
                return Ok(());
            }
        }
        match self.gateway.like_post(id).await {
            Ok(()) => {
                self.store.posts.apply_post(id, Post::mark_liked).await;
                self.store
                    .users
                    .apply_selected_post(id, Post::mark_liked)
                    .await;
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// いいね解除。`like_post` の正確な逆遷移。
    pub async fn unlike_post(&self, id: PostId) -> Result<(), AppError> {
        let Some(_token) = self.in_flight.try_begin(MutationKind::Unlike, id) else {
            debug!(post_id = id, "unlike intent already in flight, suppressed");
            return Ok(());
        };
        if let Some(post) = self.find_cached_post(id).await {
            if !post.is_liked {
                return Ok(());
            }
        }
        match self.gateway.unlike_post(id).await {
            Ok(()) => {
                self.store.posts.apply_post(id, Post::mark_unliked).await;
                self.store
                    .users
                    .apply_selected_post(id, Post::mark_unliked)
                    .await;
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>, AppError> {
        match self.gateway.list_comments(post_id).await {
            Ok(comments) => {
                self.store.posts.set_comments(comments.clone()).await;
                Ok(comments)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// コメント作成。コメント一覧への先頭挿入と、親投稿の
    /// `comment_count` 加算を全ビューへ伝播する。
    pub async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment, AppError> {
        if content.trim().is_empty() {
            let err = AppError::validation(
                ValidationFailureKind::ContentEmpty,
                "コメントを入力してください",
            );
            self.report_failure(&err).await;
            return Err(err);
        }
        match self.gateway.create_comment(post_id, content).await {
            Ok(comment) => {
                self.store.posts.prepend_comment(comment.clone()).await;
                self.store
                    .posts
                    .apply_post(post_id, Post::count_new_comment)
                    .await;
                self.store
                    .users
                    .apply_selected_post(post_id, Post::count_new_comment)
                    .await;
                self.notifier.success("コメントを追加しました");
                Ok(comment)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// コメント削除。一覧から外すのみで `comment_count` は変更しない
    /// （既存仕様、DESIGN.md 参照）。
    pub async fn delete_comment(&self, id: CommentId) -> Result<(), AppError> {
        match self.gateway.delete_comment(id).await {
            Ok(()) => {
                self.store.posts.remove_comment(id).await;
                self.notifier.success("コメントを削除しました");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }
}
