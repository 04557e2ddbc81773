//! # 予約通知ドメイン層
//!
//! 予約レコードの遷移判定と、確定通知メールのドメインモデルを提供する。
//!
//! ## 設計方針
//!
//! - I/O を持たない純粋なモデルと判定ロジックのみを配置
//! - 送信手段（SendGrid / SMTP）は infra 層、テンプレートは notifier が担当
//!
//! ## モジュール構成
//!
//! - [`appointment`] - 予約スナップショットと確定遷移の判定
//! - [`notification`] - メールメッセージと通知エラー

pub mod appointment;
pub mod notification;
