//! # 予約更新イベントハンドラ
//!
//! ホスティング基盤から push される予約ドキュメントの更新イベントを受け付ける。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /events/appointments/{appointment_id}/updated
//! ```
//!
//! ## リクエスト例
//!
//! ```json
//! {
//!   "before": { "status": "pending" },
//!   "after": {
//!     "status": "confirmed",
//!     "patientEmail": "a@x.com",
//!     "patientName": "Alice",
//!     "doctorName": "Lee",
//!     "date": "2024-01-01",
//!     "time": "10:00"
//!   }
//! }
//! ```

use std::sync::Arc;

use apptnotify_domain::appointment::{AppointmentChange, AppointmentId};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Serialize;

use crate::{
    error::NotifierError,
    usecase::{ConfirmationNotifier, NotifyOutcome},
};

/// 予約更新イベントハンドラの State
pub struct AppointmentEventState {
    pub notifier: ConfirmationNotifier,
}

/// 予約更新イベントのレスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentEventResponse {
    pub appointment_id: String,
    pub outcome:        NotifyOutcome,
}

/// 予約更新イベントを処理する
///
/// 送信が完了するまでレスポンスを返さない。
/// 送信に失敗した場合は 502 を返し、再配信は配信元に任せる。
pub async fn handle_appointment_updated(
    State(state): State<Arc<AppointmentEventState>>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<AppointmentChange>, JsonRejection>,
) -> Result<Json<AppointmentEventResponse>, NotifierError> {
    let Json(change) = payload.map_err(|e| NotifierError::BadRequest(e.body_text()))?;
    let appointment_id = AppointmentId::new(appointment_id)?;

    let outcome = state.notifier.on_update(&appointment_id, &change).await?;

    Ok(Json(AppointmentEventResponse {
        appointment_id: appointment_id.to_string(),
        outcome,
    }))
}

#[cfg(test)]
mod tests {
    use apptnotify_infra::{
        NotificationSender,
        mock::{FailingNotificationSender, MockNotificationSender},
    };
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::post,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::usecase::TemplateRenderer;

    fn make_app(sender: Arc<dyn NotificationSender>) -> Router {
        let renderer = TemplateRenderer::new("noreply@clinic.example.com").unwrap();
        let state = Arc::new(AppointmentEventState {
            notifier: ConfirmationNotifier::new(sender, renderer),
        });
        Router::new()
            .route(
                "/events/appointments/{appointment_id}/updated",
                post(handle_appointment_updated),
            )
            .with_state(state)
    }

    fn confirmed_body() -> Value {
        json!({
            "before": { "status": "pending" },
            "after": {
                "status": "confirmed",
                "patientEmail": "a@x.com",
                "patientName": "Alice",
                "doctorName": "Lee",
                "date": "2024-01-01",
                "time": "10:00"
            }
        })
    }

    async fn post_event(app: Router, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/events/appointments/appt-001/updated")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn 確定遷移で送信しsentを返す() {
        let sender = MockNotificationSender::new();
        let app = make_app(Arc::new(sender.clone()));

        let (status, body) = post_event(app, confirmed_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "appointmentId": "appt-001", "outcome": "sent" })
        );
        assert_eq!(sender.sent_emails().len(), 1);
        assert_eq!(sender.sent_emails()[0].to, "a@x.com");
    }

    #[tokio::test]
    async fn 確定遷移でなければskippedを返す() {
        let sender = MockNotificationSender::new();
        let app = make_app(Arc::new(sender.clone()));
        let body = json!({
            "before": { "status": "pending" },
            "after": { "status": "cancelled" }
        });

        let (status, body) = post_event(app, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "skipped");
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn 送信失敗で502を返す() {
        let app = make_app(Arc::new(FailingNotificationSender::new()));

        let (status, body) = post_event(app, confirmed_body().to_string()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], 502);
    }

    #[tokio::test]
    async fn 不正なjsonで400を返す() {
        let sender = MockNotificationSender::new();
        let app = make_app(Arc::new(sender.clone()));

        let (status, body) = post_event(app, "{ not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], "Bad Request");
        assert!(sender.sent_emails().is_empty());
    }

    #[tokio::test]
    async fn 必須項目が欠けた確定遷移で400を返す() {
        let app = make_app(Arc::new(MockNotificationSender::new()));
        let mut body = confirmed_body();
        body["after"]
            .as_object_mut()
            .unwrap()
            .remove("patientEmail");

        let (status, body) = post_event(app, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], "Invalid Appointment");
    }
}
