//! # 確定通知サービス
//!
//! 予約の更新イベントを受け取り、確定への遷移であれば
//! テンプレートレンダリング → メール送信を行う。
//!
//! ## 設計方針
//!
//! - **判定はドメインに委譲**: 遷移の判定は `AppointmentChange::confirmation` が行う
//! - **送信失敗は返す**: 送信失敗は `Err` として呼び出し元へ返す。リトライや重複排除は行わない
//! - **依存性注入**: `NotificationSender` は trait で抽象化し、起動時に 1 度だけ構築する

use std::sync::Arc;

use apptnotify_domain::{
    appointment::{AppointmentChange, AppointmentId},
    notification::{NotificationError, NotificationEventType, mask_email},
};
use apptnotify_infra::NotificationSender;
use apptnotify_shared::{event_log::event, log_business_event};
use serde::Serialize;

use super::TemplateRenderer;

/// 1 回の更新イベントに対する処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyOutcome {
    /// 確定通知を送信した
    Sent,
    /// 確定への遷移ではないため何もしなかった
    Skipped,
}

/// 確定通知サービス
pub struct ConfirmationNotifier {
    sender:            Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
}

impl ConfirmationNotifier {
    pub fn new(sender: Arc<dyn NotificationSender>, template_renderer: TemplateRenderer) -> Self {
        Self {
            sender,
            template_renderer,
        }
    }

    /// 予約の更新イベントを処理する
    ///
    /// 確定への遷移であれば 1 通だけメールを送信し、送信完了まで待つ。
    /// 同じ遷移のイベントが重複して届いた場合は、その回数だけ送信される。
    pub async fn on_update(
        &self,
        appointment_id: &AppointmentId,
        change: &AppointmentChange,
    ) -> Result<NotifyOutcome, NotificationError> {
        let event_type: &str = NotificationEventType::AppointmentConfirmed.into();

        let Some(confirmation) = change.confirmation(appointment_id)? else {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SKIPPED,
                event.entity_type = event::entity_type::APPOINTMENT,
                event.entity_id = %appointment_id,
                event.result = event::result::SKIPPED,
                "確定への遷移ではないため通知をスキップ"
            );
            return Ok(NotifyOutcome::Skipped);
        };

        let email = self.template_renderer.render(&confirmation)?;
        let recipient = mask_email(&email.to);

        match self.sender.send_email(&email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::APPOINTMENT,
                    event.entity_id = %appointment_id,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type,
                    notification.recipient = %recipient,
                    notification.backend = self.sender.backend_name(),
                    "確定通知メール送信成功"
                );
                Ok(NotifyOutcome::Sent)
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::APPOINTMENT,
                    event.entity_id = %appointment_id,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type,
                    notification.recipient = %recipient,
                    notification.backend = self.sender.backend_name(),
                    error = %e,
                    "確定通知メール送信失敗"
                );
                Err(e)
            }
        }
    }
}
