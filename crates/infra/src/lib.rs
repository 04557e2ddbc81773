//! # 予約通知インフラ層
//!
//! 外部のメール配信サービスとの通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! ドメイン層で定義されたメールメッセージを、具体的な送信手段で配信する。
//! 外部サービスの詳細（HTTP API、SMTP）はこのクレートにカプセル化する。
//!
//! ## 依存関係
//!
//! ```text
//! notifier → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - `NotificationSender` trait と SendGrid / SMTP / Noop 実装
//! - `mock` - テスト用モック（`test-utils` feature）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;

pub use notification::{
    NoopNotificationSender,
    NotificationSender,
    SendGridNotificationSender,
    SmtpNotificationSender,
};
