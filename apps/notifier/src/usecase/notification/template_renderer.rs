//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで確定通知メールのプレーンテキスト本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名は固定**: `Appointment Confirmed`
//! - **自動エスケープなし**: `.txt` テンプレートのため HTML エスケープは行われない

use apptnotify_domain::{
    appointment::AppointmentConfirmation,
    notification::{EmailMessage, NotificationError, NotificationEventType},
};
use tera::{Context, Tera};

/// 確定通知メールの件名
pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmed";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`AppointmentConfirmation` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine:       Tera,
    from_address: String,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// # 引数
    ///
    /// - `from_address`: 送信元メールアドレス
    pub fn new(from_address: impl Into<String>) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_template(
                &template_name(NotificationEventType::AppointmentConfirmed),
                include_str!("../../../templates/notifications/appointment_confirmed.txt"),
            )
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self {
            engine,
            from_address: from_address.into(),
        })
    }

    /// 予約確定からメールメッセージを生成する
    pub fn render(
        &self,
        confirmation: &AppointmentConfirmation,
    ) -> Result<EmailMessage, NotificationError> {
        let mut context = Context::new();
        context.insert("patient_name", &confirmation.patient_name);
        context.insert("doctor_name", &confirmation.doctor_name);
        context.insert("date", &confirmation.date);
        context.insert("time", &confirmation.time);

        let text_body = self
            .engine
            .render(
                &template_name(NotificationEventType::AppointmentConfirmed),
                &context,
            )
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: confirmation.patient_email.clone(),
            from: self.from_address.clone(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            // テンプレートファイル末尾の改行は本文に含めない
            text_body: text_body.trim_end().to_string(),
        })
    }
}

fn template_name(event_type: NotificationEventType) -> String {
    format!("{event_type}.txt")
}
