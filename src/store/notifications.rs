use crate::domain::constants::NOTIFICATION_FETCH_INTERVAL;
use crate::domain::entities::Notification;
use crate::domain::value_objects::NotificationId;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct NotificationsInner {
    notifications: Vec<Notification>,
    unread_count: u32,
    last_fetched: Option<Instant>,
    is_loading: bool,
    last_error: Option<String>,
}

/// 通知スライス。`unread_count` は一覧から導出される値で、
/// 既読操作のたびに同期して更新する。
#[derive(Default)]
pub struct NotificationsState {
    inner: RwLock<NotificationsInner>,
}

impl NotificationsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直近の取得から間隔が空いていなければ再取得を抑制する。
    pub async fn should_fetch(&self) -> bool {
        let inner = self.inner.read().await;
        match inner.last_fetched {
            Some(at) => at.elapsed() >= NOTIFICATION_FETCH_INTERVAL,
            None => true,
        }
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

    pub async fn set_notifications(&self, notifications: Vec<Notification>) {
        let mut inner = self.inner.write().await;
        inner.is_loading = false;
        inner.unread_count = count_unread(&notifications);
        inner.notifications = notifications;
        inner.last_fetched = Some(Instant::now());
    }

    /// ポーリングで届いた通知を重複なしで先頭へ挿入する。
    pub async fn insert(&self, notification: Notification) {
        let mut inner = self.inner.write().await;
        if inner.notifications.iter().any(|n| n.id == notification.id) {
            return;
        }
        if !notification.is_read {
            inner.unread_count += 1;
        }
        inner.notifications.insert(0, notification);
    }

    pub async fn mark_read(&self, id: NotificationId) {
        let mut inner = self.inner.write().await;
        if let Some(notification) = inner.notifications.iter_mut().find(|n| n.id == id) {
            if !notification.is_read {
                notification.is_read = true;
                inner.unread_count = inner.unread_count.saturating_sub(1);
            }
        }
    }

    pub async fn mark_all_read(&self) {
        let mut inner = self.inner.write().await;
        for notification in &mut inner.notifications {
            notification.is_read = true;
        }
        inner.unread_count = 0;
    }

    pub async fn clear(&self) {
        *self.inner.write().await = NotificationsInner::default();
    }

    // --- スナップショット ---

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.read().await.notifications.clone()
    }

    pub async fn unread_count(&self) -> u32 {
        self.inner.read().await.unread_count
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.is_loading
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }
}

fn count_unread(notifications: &[Notification]) -> u32 {
    u32::try_from(notifications.iter().filter(|n| !n.is_read).count()).unwrap_or(u32::MAX)
}
