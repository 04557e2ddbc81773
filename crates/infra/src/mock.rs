//! テスト用の通知送信モック
//!
//! 実際には送信せず、送信内容を記録する。
//! `test-utils` feature で他クレートのテストにも公開する。

use std::sync::{Arc, Mutex};

use apptnotify_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;

use crate::notification::NotificationSender;

/// 送信したメールを記録するモック
#[derive(Debug, Clone, Default)]
pub struct MockNotificationSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに送信されたメールを返す
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

/// 常に送信失敗を返すモック
///
/// プロバイダ拒否（`Rejected`）を返し、呼び出し回数を記録する。
#[derive(Debug, Clone, Default)]
pub struct FailingNotificationSender {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送信が試みられた回数
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationSender for FailingNotificationSender {
    async fn send_email(&self, _email: &EmailMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        Err(NotificationError::Rejected {
            status: 503,
            body:   "service unavailable".to_string(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "failing-mock"
    }
}
