//! # Notifier エラー定義
//!
//! Notifier 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! イベントの配信元は 5xx を「呼び出し失敗」として扱い、自身のポリシーで再配信する。
//! 再配信しても結果が変わらない入力不備は 4xx で返す。

use apptnotify_domain::notification::NotificationError;
use apptnotify_shared::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Notifier で発生するエラー
#[derive(Debug, Error)]
pub enum NotifierError {
    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 通知処理の失敗
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let body = match &self {
            NotifierError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            NotifierError::Notification(NotificationError::InvalidAppointment(msg)) => {
                ErrorResponse::new("invalid-appointment", "Invalid Appointment", 400, msg.clone())
            }
            NotifierError::Notification(e @ NotificationError::SendFailed(_)) => {
                ErrorResponse::bad_gateway(e.to_string())
            }
            // プロバイダの応答本文はログにのみ残し、呼び出し元にはステータスだけを返す
            NotifierError::Notification(NotificationError::Rejected {
                status,
                body: provider_body,
            }) => {
                tracing::warn!(
                    provider.status = *status,
                    provider.body = %provider_body,
                    "送信サービスが拒否しました"
                );
                ErrorResponse::bad_gateway(format!(
                    "メール送信サービスが拒否しました (status: {status})"
                ))
            }
            NotifierError::Notification(e @ NotificationError::TemplateFailed(_)) => {
                tracing::error!(error = %e, "内部エラー");
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
