use crate::application::ports::gateway::NotificationGateway;
use crate::application::ports::notifier::Notifier;
use crate::domain::entities::Notification;
use crate::domain::value_objects::NotificationId;
use crate::shared::AppError;
use crate::store::Store;
use std::sync::Arc;
use tracing::debug;

/// 通知の取得と既読管理。取得はスライス側のインターバルで間引かれる。
pub struct NotificationService {
    gateway: Arc<dyn NotificationGateway>,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationService {
    pub fn new(
        gateway: Arc<dyn NotificationGateway>,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            store,
            notifier,
        }
    }

    async fn report_failure(&self, err: &AppError) {
        let message = err.user_message();
        self.store.notifications.fail(message.clone()).await;
        self.notifier.error(&message);
    }

    /// 通知一覧の取得。前回取得から間隔が空いていなければキャッシュを返す。
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, AppError> {
        if !self.store.notifications.should_fetch().await {
            debug!("notification fetch throttled, serving cached list");
            return Ok(self.store.notifications.notifications().await);
        }
        self.store.notifications.begin_load().await;
        match self.gateway.list_notifications().await {
            Ok(notifications) => {
                self.store
                    .notifications
                    .set_notifications(notifications.clone())
                    .await;
                Ok(notifications)
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    /// サーバープッシュ等で届いた単発の通知を一覧へ取り込む。
    /// 既知の id は無視される。
    pub async fn push(&self, notification: Notification) {
        self.store.notifications.insert(notification).await;
    }

    pub async fn mark_read(&self, id: NotificationId) -> Result<(), AppError> {
        match self.gateway.mark_read(id).await {
            Ok(()) => {
                self.store.notifications.mark_read(id).await;
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    pub async fn mark_all_read(&self) -> Result<(), AppError> {
        match self.gateway.mark_all_read().await {
            Ok(()) => {
                self.store.notifications.mark_all_read().await;
                Ok(())
            }
            Err(err) => {
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NotificationKind, User};
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Gateway {}

        #[async_trait]
        impl NotificationGateway for Gateway {
            async fn list_notifications(&self) -> Result<Vec<Notification>, AppError>;
            async fn mark_read(&self, id: NotificationId) -> Result<(), AppError>;
            async fn mark_all_read(&self) -> Result<(), AppError>;
        }
    }

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn success(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    fn sample_notification(id: u64, is_read: bool) -> Notification {
        Notification {
            id,
            recipient: 1,
            sender: User::new(2, "bob".into()),
            kind: NotificationKind::Like,
            post: None,
            message: "bob liked your post".into(),
            is_read,
            created_at: Utc::now(),
        }
    }

    fn service_with(gateway: MockGateway) -> (NotificationService, Arc<Store>) {
        let store = Arc::new(Store::new());
        let service = NotificationService::new(
            Arc::new(gateway),
            Arc::clone(&store),
            Arc::new(SilentNotifier),
        );
        (service, store)
    }

    #[tokio::test]
    async fn second_fetch_within_interval_serves_cache() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list_notifications()
            .times(1)
            .returning(|| Ok(vec![sample_notification(1, false)]));
        let (service, store) = service_with(gateway);

        service.fetch_notifications().await.unwrap();
        let cached = service.fetch_notifications().await.unwrap();

        assert_eq!(cached.len(), 1);
        assert_eq!(store.notifications.unread_count().await, 1);
    }

    #[tokio::test]
    async fn pushed_notification_is_deduplicated_by_id() {
        let (service, store) = service_with(MockGateway::new());

        service.push(sample_notification(1, false)).await;
        service.push(sample_notification(1, false)).await;
        service.push(sample_notification(2, false)).await;

        assert_eq!(store.notifications.notifications().await.len(), 2);
        assert_eq!(store.notifications.unread_count().await, 2);
        // 新着が先頭に来る
        assert_eq!(store.notifications.notifications().await[0].id, 2);
    }

    #[tokio::test]
    async fn mark_read_decrements_unread_count() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list_notifications()
            .times(1)
            .returning(|| Ok(vec![sample_notification(1, false), sample_notification(2, false)]));
        gateway
            .expect_mark_read()
            .with(eq(1u64))
            .times(1)
            .returning(|_| Ok(()));
        let (service, store) = service_with(gateway);

        service.fetch_notifications().await.unwrap();
        service.mark_read(1).await.unwrap();

        assert_eq!(store.notifications.unread_count().await, 1);
    }

    #[tokio::test]
    async fn mark_all_read_zeroes_unread_count() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list_notifications()
            .times(1)
            .returning(|| Ok(vec![sample_notification(1, false), sample_notification(2, false)]));
        gateway.expect_mark_all_read().times(1).returning(|| Ok(()));
        let (service, store) = service_with(gateway);

        service.fetch_notifications().await.unwrap();
        service.mark_all_read().await.unwrap();

        assert_eq!(store.notifications.unread_count().await, 0);
        assert!(store
            .notifications
            .notifications()
            .await
            .iter()
            .all(|n| n.is_read));
    }
}
