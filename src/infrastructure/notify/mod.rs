//! トースト通知の具象実装。
//!
//! UI を持たない構成ではログへ流す `TracingNotifier` を、フロント
//! エンドへ届ける構成ではチャネル越しの `ChannelNotifier` を使う。

use crate::application::ports::notifier::{Notifier, Toast};
use tokio::sync::mpsc;
use tracing::{error, info};

/// 通知をログとして記録する実装。テストや CLI 用。
#[derive(Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(toast = message, "notification");
    }

    fn error(&self, message: &str) {
        error!(toast = message, "notification");
    }
}

/// 通知を購読側へ転送する実装。受信側が落ちていても送信側は失敗しない。
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Toast>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        let _ = self.sender.send(Toast::success(message));
    }

    fn error(&self, message: &str) {
        let _ = self.sender.send(Toast::error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::notifier::ToastLevel;

    #[tokio::test]
    async fn channel_notifier_delivers_toasts_in_order() {
        let (notifier, mut receiver) = ChannelNotifier::new();
        notifier.success("saved");
        notifier.error("failed");

        let first = receiver.recv().await.unwrap();
        assert_eq!(first.level, ToastLevel::Success);
        assert_eq!(first.message, "saved");
        let second = receiver.recv().await.unwrap();
        assert_eq!(second.level, ToastLevel::Error);
    }

    #[test]
    fn dropped_receiver_does_not_poison_sender() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);
        notifier.success("nobody listening");
    }
}
