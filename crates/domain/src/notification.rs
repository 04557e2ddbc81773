//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`NotificationEventType`] | 通知イベント種別 | 現状は予約確定のみ |
//! | [`EmailMessage`] | メールメッセージ | 送信バックエンドに渡す完成済みのメール |
//! | [`NotificationError`] | 通知エラー | 送信・レンダリング・入力検証の失敗 |
//!
//! ## 設計方針
//!
//! - **失敗は呼び出し元へ**: 送信失敗は握りつぶさず、呼び出し元（イベントの配信元）に返す
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は notifier）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗（接続不可、タイムアウト、メッセージ構築失敗など）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// 送信プロバイダがリクエストを拒否した（2xx 以外）
    #[error("メール送信がプロバイダに拒否されました（status: {status}）: {body}")]
    Rejected { status: u16, body: String },

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 予約データが通知に必要な条件を満たさない
    #[error("予約データが不正: {0}")]
    InvalidAppointment(String),
}

/// 通知イベント種別
///
/// テンプレート名とログの `notification.event_type` に使われる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationEventType {
    /// 予約確定: ステータスが confirmed に遷移したとき → 患者に送信
    AppointmentConfirmed,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 送信元メールアドレス
    pub from:      String,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// ログ出力用にメールアドレスをマスクする
///
/// ローカル部の先頭 1 文字のみ残す（`alice@example.com` → `a***@example.com`）。
pub fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}
