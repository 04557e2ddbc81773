//! # Notifier アプリケーション構築
//!
//! 送信バックエンドの選択、DI（State）の初期化とルーター構築を担当する。
//! `main.rs` はトレーシング初期化とサーバー起動に集中する。

use std::sync::Arc;

use apptnotify_infra::{
    NoopNotificationSender,
    NotificationSender,
    SendGridNotificationSender,
    SmtpNotificationSender,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::{ConfigError, NotificationBackend, NotificationConfig},
    handler::{AppointmentEventState, handle_appointment_updated, health_check},
    usecase::{ConfirmationNotifier, TemplateRenderer},
};

/// アプリケーション構築エラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Notification(#[from] apptnotify_domain::notification::NotificationError),
}

/// 設定に応じた送信バックエンドを構築する
pub fn build_sender(config: &NotificationConfig) -> Result<Arc<dyn NotificationSender>, BuildError> {
    let sender: Arc<dyn NotificationSender> = match config.backend {
        NotificationBackend::SendGrid => {
            let api_key = config
                .sendgrid_api_key
                .as_ref()
                .ok_or(ConfigError::Missing("SENDGRID_API_KEY"))?;
            Arc::new(SendGridNotificationSender::new(
                &config.sendgrid_base_url,
                api_key.expose().to_string(),
                config.sendgrid_timeout,
            )?)
        }
        NotificationBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            &config.smtp_host,
            config.smtp_port,
        )),
        NotificationBackend::Noop => Arc::new(NoopNotificationSender),
    };

    tracing::info!(backend = sender.backend_name(), "通知バックエンドを初期化しました");
    Ok(sender)
}

/// 確定通知サービスを構築する
pub fn build_notifier(
    config: &NotificationConfig,
    sender: Arc<dyn NotificationSender>,
) -> Result<ConfirmationNotifier, BuildError> {
    let renderer = TemplateRenderer::new(config.from_address.clone())?;
    Ok(ConfirmationNotifier::new(sender, renderer))
}

/// ルーターを構築する
pub fn build_app(notifier: ConfirmationNotifier) -> Router {
    let event_state = Arc::new(AppointmentEventState { notifier });

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/events/appointments/{appointment_id}/updated",
            post(handle_appointment_updated),
        )
        .with_state(event_state)
        .layer(TraceLayer::new_for_http())
}
