use super::sync::{apply_to_view, remove_from_view};
use crate::domain::entities::{FollowEdge, FollowLink, Post, User, UserStats};
use crate::domain::value_objects::{PageInfo, PostId, UserId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct UsersInner {
    /// 検索・一覧結果（ページング付き）。
    users: Vec<User>,
    /// 他ユーザーのプロフィール画面で選択中のユーザー。
    selected_user: Option<User>,
    /// 選択中ユーザーの投稿一覧。投稿のコピーを持つビューのひとつ。
    selected_posts: Vec<Post>,
    followers: Vec<FollowLink>,
    /// 閲覧者のフォロー辺。フォロー前の重複チェックにも使う。
    following: Vec<FollowEdge>,
    pagination: PageInfo,
    user_stats: Option<UserStats>,
    is_loading: bool,
    last_error: Option<String>,
    /// 検索の世代番号。古い応答の取り込みを防ぐ。
    search_seq: u64,
}

/// ユーザースライス。
#[derive(Default)]
pub struct UsersState {
    inner: RwLock<UsersInner>,
}

impl UsersState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin_load(&self) {
        let mut inner = self.inner.write().await;
        inner.is_loading = true;
        inner.last_error = None;
    }

    pub async fn fail(&self, message: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.last_error = Some(message.into());
    }

    pub async fn set_users(&self, users: Vec<User>, pagination: PageInfo) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.users = users;
        inner.pagination = pagination;
    }

    /// 新しい検索の世代番号を発行する。
    pub async fn begin_search(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.search_seq += 1;
        inner.is_loading = true;
        inner.last_error = None;
        inner.search_seq
    }

    /// 世代番号が最新の場合のみ検索結果を取り込む。
    /// 追い越された応答は破棄して `false` を返す。
    pub async fn commit_search(&self, seq: u64, users: Vec<User>, pagination: PageInfo) -> bool {
        let mut inner = self.inner.write().await;
        if seq != inner.search_seq {
            return false;
        }
        inner.is_loading = false;
        inner.users = users;
        inner.pagination = pagination;
        true
    }

    /// 検索失敗の記録。取り込みと同じく、追い越された世代の失敗は
    /// 無視して `false` を返す。
    pub async fn fail_search(&self, seq: u64, message: impl Into<String>) -> bool {
        let mut inner = self.inner.write().await;
        if seq != inner.search_seq {
            return false;
        }
        inner.is_loading = false;
        inner.last_error = Some(message.into());
        true
    }

    pub async fn set_selected_user(&self, user: Option<User>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.selected_user = user;
    }

    pub async fn set_selected_posts(&self, posts: Vec<Post>) {
        self.inner.write().await.selected_posts = posts;
    }

    pub async fn set_followers(&self, followers: Vec<FollowLink>) {
        self.inner.write().await.followers = followers;
    }

    pub async fn set_following(&self, following: Vec<FollowLink>) {
        self.inner.write().await.following = following.iter().map(FollowLink::edge).collect();
    }

    pub async fn set_user_stats(&self, stats: UserStats) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.user_stats = Some(stats);
    }

    /// ローカルキャッシュ上にフォロー辺があるか。
    pub async fn has_follow_edge(&self, follower: UserId, following: UserId) -> bool {
        self.inner
            .read()
            .await
            .following
            .contains(&FollowEdge::new(follower, following))
    }

    pub async fn push_follow_edge(&self, edge: FollowEdge) {
        self.inner.write().await.following.push(edge);
    }

    pub async fn remove_follow_edge(&self, follower: UserId, following: UserId) {
        self.inner
            .write()
            .await
            .following
            .retain(|edge| *edge != FollowEdge::new(follower, following));
    }

    /// 確定したユーザー変更を `users` ビューと `selected_user` へ伝播する。
    pub async fn apply_user<F>(&self, id: UserId, transform: F)
    where
        F: Fn(&mut User),
    {
        let mut inner = self.inner.write().await;
        apply_to_view(&mut inner.users, id, &transform);
        if let Some(selected) = inner.selected_user.as_mut() {
            if selected.id == id {
                transform(selected);
            }
        }
    }

    /// 投稿系の伝播のうち `selected_posts` ビューが担う分。
    pub async fn apply_selected_post<F>(&self, id: PostId, transform: F)
    where
        F: Fn(&mut Post),
    {
        let mut inner = self.inner.write().await;
        apply_to_view(&mut inner.selected_posts, id, &transform);
    }

    pub async fn find_selected_post(&self, id: PostId) -> Option<Post> {
        self.inner
            .read()
            .await
            .selected_posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
    }

    pub async fn remove_selected_post(&self, id: PostId) {
        let mut inner = self.inner.write().await;
        remove_from_view(&mut inner.selected_posts, id);
    }

    /// 管理者削除の反映。
    pub async fn remove_user(&self, id: UserId) {
        let mut inner = self.inner.write().await;
        remove_from_view(&mut inner.users, id);
        if inner.selected_user.as_ref().is_some_and(|u| u.id == id) {
            inner.selected_user = None;
        }
    }

    pub async fn clear(&self) {
        *self.inner.write().await = UsersInner::default();
    }

    // --- スナップショット ---

    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    pub async fn selected_user(&self) -> Option<User> {
        self.inner.read().await.selected_user.clone()
    }

    pub async fn selected_posts(&self) -> Vec<Post> {
        self.inner.read().await.selected_posts.clone()
    }

    pub async fn followers(&self) -> Vec<FollowLink> {
        self.inner.read().await.followers.clone()
    }

    pub async fn following(&self) -> Vec<FollowEdge> {
        self.inner.read().await.following.clone()
    }

    pub async fn pagination(&self) -> PageInfo {
        self.inner.read().await.pagination.clone()
    }

    pub async fn user_stats(&self) -> Option<UserStats> {
        self.inner.read().await.user_stats.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_edge_equality_is_pairwise() {
        assert_eq!(FollowEdge::new(1, 2), FollowEdge::new(1, 2));
        assert_ne!(FollowEdge::new(1, 2), FollowEdge::new(2, 1));
    }

    #[tokio::test]
    async fn stale_search_result_is_discarded() {
        let state = UsersState::new();
        let first = state.begin_search().await;
        let second = state.begin_search().await;

        // 先に発行した検索が後から解決する
        let committed_second = state
            .commit_search(second, vec![User::new(2, "bravo".into())], PageInfo::single_page(1))
            .await;
        let committed_first = state
            .commit_search(first, vec![User::new(1, "alpha".into())], PageInfo::single_page(1))
            .await;

        assert!(committed_second);
        assert!(!committed_first);
        let users = state.users().await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "bravo");
    }

    #[tokio::test]
    async fn stale_search_failure_is_discarded() {
        let state = UsersState::new();
        let first = state.begin_search().await;
        let second = state.begin_search().await;

        // 追い越された検索の失敗は新しい検索の状態に触れない
        assert!(!state.fail_search(first, "timeout").await);
        assert!(state.last_error().await.is_none());
        assert!(state.is_loading().await);

        assert!(state.fail_search(second, "timeout").await);
        assert_eq!(state.last_error().await.unwrap(), "timeout");
        assert!(!state.is_loading().await);
    }

    #[tokio::test]
    async fn apply_user_covers_listing_and_selected_user() {
        let state = UsersState::new();
        let mut target = User::new(2, "bob".into());
        target.followers_count = 5;
        state
            .set_users(vec![target.clone()], PageInfo::single_page(1))
            .await;
        state.set_selected_user(Some(target)).await;

        state.apply_user(2, |user| user.mark_followed()).await;

        assert_eq!(state.users().await[0].followers_count, 6);
        assert!(state.users().await[0].is_following);
        let selected = state.selected_user().await.unwrap();
        assert_eq!(selected.followers_count, 6);
        assert!(selected.is_following);
    }

    #[tokio::test]
    async fn remove_user_clears_matching_selection() {
        let state = UsersState::new();
        state
            .set_users(vec![User::new(2, "bob".into())], PageInfo::single_page(1))
            .await;
        state.set_selected_user(Some(User::new(2, "bob".into()))).await;

        state.remove_user(2).await;

        assert!(state.users().await.is_empty());
        assert!(state.selected_user().await.is_none());
    }
}
