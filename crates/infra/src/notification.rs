//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SendGrid（本番）、SMTP（Mailpit 開発用）、Noop（送信無効化）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **失敗は返す**: 送信結果は `Result` で返し、リトライは呼び出し元の配信基盤に任せる

mod noop;
mod sendgrid;
mod smtp;

use apptnotify_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use sendgrid::{DEFAULT_BASE_URL as SENDGRID_DEFAULT_BASE_URL, SendGridNotificationSender};
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
/// 1 回の呼び出しで 1 通を送信し、完了（または失敗）まで待つ。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    /// ログ出力用のバックエンド名
    fn backend_name(&self) -> &'static str;
}
