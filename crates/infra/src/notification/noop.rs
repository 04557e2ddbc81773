//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル検証や通知無効化時に使用する。

use apptnotify_domain::notification::{EmailMessage, NotificationError, mask_email};
use async_trait::async_trait;

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %mask_email(&email.to),
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "noop"
    }
}
