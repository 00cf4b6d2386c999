use crate::application::ports::gateway::{SocialGateway, UserGateway, UserPage};
use crate::application::ports::notifier::Notifier;
use crate::application::shared::in_flight::{InFlightGuard, MutationKind};
use crate::domain::constants::MIN_SEARCH_QUERY_CHARS;
use crate::domain::entities::{FollowEdge, FollowLink, Post, User, UserPatch, UserStats};
use crate::domain::value_objects::{PageInfo, PageRequest, UserId};
use crate::shared::{AppError, ValidationFailureKind};
use crate::store::Store;
use std::sync::Arc;
use tracing::debug;

/// ユーザー一覧・検索・フォロー関係を扱うサービス。
///
/// フォロー/アンフォローの確定結果は users ビュー、選択中ユーザー、
/// フォローエッジ集合、閲覧者自身の `following_count` の四箇所へ
/// 同時に伝播する。
pub struct UserService {
    gateway: Arc<dyn UserGateway>,
    social: Arc<dyn SocialGateway>,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlightGuard,
}

impl UserService {
    pub fn new(
        gateway: Arc<dyn UserGateway>,
        social: Arc<dyn SocialGateway>,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            social,
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
        self.store.users.fail(message.clone()).await;
        self.notifier.error(&message);
    }

    pub async fn fetch_users(&self, request: PageRequest) -> Result<Vec<User>, AppError> {
        self.store.users.begin_load().await;
        match self.gateway.list_users(request).await {
            Ok(page) => {
                let pagination =
                    PageInfo::from_count(request, page.total_count, page.has_next, page.has_previous);
                self.store.users.set_users(page.users.clone(), pagination).await;
                Ok(page.users)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// ユーザー検索。2 文字未満の語は API 呼び出し自体を行わない。
    /// 古い応答は発行順シーケンスで破棄される。
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, AppError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
            return Err(AppError::validation(
                ValidationFailureKind::QueryTooShort,
                "検索キーワードは2文字以上で入力してください",
            ));
        }
        let seq = self.store.users.begin_search().await;
        match self.gateway.search_users(query).await {
            Ok(page) => {
                let pagination = PageInfo::single_page(page.total_count);
                let committed = self
                    .store
                    .users
                    .commit_search(seq, page.users.clone(), pagination)
                    .await;
                if !committed {
                    debug!(seq, "stale search response discarded");
                }
                Ok(page.users)
            }
            Err(err) => {
                // 追い越された検索の失敗が新しい検索の状態を汚さないようにする
                let message = err.user_message();
                if self.store.users.fail_search(seq, message.clone()).await {
                    self.notifier.error(&message);
                } else {
                    debug!(seq, "stale search failure discarded");
                }
                Err(err)
            }
        }
    }

    pub async fn fetch_user(&self, id: UserId) -> Result<User, AppError> {
        self.store.users.begin_load().await;
        match self.gateway.get_user(id).await {
            Ok(user) => {
                self.store.users.set_selected_user(Some(user.clone())).await;
                Ok(user)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_user_posts(&self, id: UserId) -> Result<Vec<Post>, AppError> {
        match self.gateway.get_user_posts(id).await {
            Ok(posts) => {
                self.store.users.set_selected_posts(posts.clone()).await;
                Ok(posts)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_followers(&self, id: UserId) -> Result<Vec<FollowLink>, AppError> {
        match self.social.followers(id).await {
            Ok(links) => {
                self.store.users.set_followers(links.clone()).await;
                Ok(links)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_following(&self, id: UserId) -> Result<Vec<FollowLink>, AppError> {
        match self.social.following(id).await {
            Ok(links) => {
                self.store.users.set_following(links.clone()).await;
                Ok(links)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// フォロー。既にエッジがある場合は検証エラー、在途中なら no-op。
    pub async fn follow(&self, target: UserId) -> Result<(), AppError> {
        let Some(viewer) = self.store.auth.viewer_id().await else {
            return Err(AppError::auth("ログインが必要です"));
        };
        if self.store.users.has_follow_edge(viewer, target).await {
            let err = AppError::validation(
                ValidationFailureKind::DuplicateFollow,
                "既にフォローしています",
            );
            self.report_failure(&err).await;
            return Err(err);
        }
        let Some(_token) = self.in_flight.try_begin(MutationKind::Follow, target) else {
            debug!(user_id = target, "follow intent already in flight, suppressed");
            return Ok(());
        };
        match self.social.follow(target).await {
            Ok(()) => {
                self.store.users.apply_user(target, User::mark_followed).await;
                self.store
                    .auth
                    .mutate_user(|user| user.following_count += 1)
                    .await;
                self.store
                    .users
                    .push_follow_edge(FollowEdge::new(viewer, target))
                    .await;
                self.notifier.success("フォローしました");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// アンフォロー。`follow` の逆遷移を同じ四箇所へ適用する。
    pub async fn unfollow(&self, target: UserId) -> Result<(), AppError> {
        let Some(viewer) = self.store.auth.viewer_id().await else {
            return Err(AppError::auth("ログインが必要です"));
        };
        let Some(_token) = self.in_flight.try_begin(MutationKind::Unfollow, target) else {
            debug!(user_id = target, "unfollow intent already in flight, suppressed");
            return Ok(());
        };
        match self.social.unfollow(target).await {
            Ok(()) => {
                self.store
                    .users
                    .apply_user(target, User::mark_unfollowed)
                    .await;
                self.store
                    .auth
                    .mutate_user(|user| user.following_count = user.following_count.saturating_sub(1))
                    .await;
                self.store.users.remove_follow_edge(viewer, target).await;
                self.notifier.success("フォローを解除しました");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// 自分のプロフィール更新。結果は auth スライスへ反映する。
    pub async fn update_profile(&self, patch: UserPatch) -> Result<User, AppError> {
        match self.gateway.update_me(&patch).await {
            Ok(user) => {
                self.store.auth.set_user(user.clone()).await;
                self.notifier.success("プロフィールを更新しました");
                Ok(user)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn fetch_user_stats(&self) -> Result<UserStats, AppError> {
        match self.gateway.user_stats().await {
            Ok(stats) => {
                self.store.users.set_user_stats(stats.clone()).await;
                Ok(stats)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// 管理者によるユーザー編集。一覧と選択中ユーザーを正準コピーで置き換える。
    pub async fn admin_update_user(&self, id: UserId, patch: UserPatch) -> Result<User, AppError> {
        match self.gateway.update_user(id, &patch).await {
            Ok(user) => {
                self.store
                    .users
                    .apply_user(id, |entry| *entry = user.clone())
                    .await;
                self.notifier.success("ユーザー情報を更新しました");
                Ok(user)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn admin_delete_user(&self, id: UserId) -> Result<(), AppError> {
        match self.gateway.delete_user(id).await {
            Ok(()) => {
                self.store.users.remove_user(id).await;
                self.notifier.success("ユーザーを削除しました");
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }
}
