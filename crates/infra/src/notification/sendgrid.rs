//! SendGrid 通知送信実装
//!
//! SendGrid v3 Mail Send API（`POST /v3/mail/send`）を reqwest で呼び出す。
//! 本番環境で使用する。
//!
//! ## リクエスト形式
//!
//! ```json
//! {
//!   "personalizations": [{ "to": [{ "email": "a@x.com" }] }],
//!   "from": { "email": "noreply@clinic.example.com" },
//!   "subject": "Appointment Confirmed",
//!   "content": [{ "type": "text/plain", "value": "Dear ..." }]
//! }
//! ```
//!
//! 2xx 以外のレスポンスは [`NotificationError::Rejected`] として返す。
//! リトライは行わない。

use std::{fmt, time::Duration};

use apptnotify_domain::notification::{EmailMessage, NotificationError};
use async_trait::async_trait;
use serde::Serialize;

use super::NotificationSender;

/// SendGrid API のデフォルトベース URL
pub const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from:             Address<'a>,
    subject:          &'a str,
    content:          [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value:        &'a str,
}

impl<'a> From<&'a EmailMessage> for MailSendRequest<'a> {
    fn from(email: &'a EmailMessage) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address { email: &email.to }],
            }],
            from:             Address { email: &email.from },
            subject:          &email.subject,
            content:          [Content {
                content_type: "text/plain",
                value:        &email.text_body,
            }],
        }
    }
}

/// SendGrid 通知送信
///
/// `reqwest::Client` と API キーを保持する。プロセス起動時に 1 度だけ作成し、
/// 以降は読み取り専用で共有する。
pub struct SendGridNotificationSender {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
}

impl SendGridNotificationSender {
    /// 新しい SendGrid 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `base_url`: API のベース URL（通常は [`DEFAULT_BASE_URL`]）
    /// - `api_key`: SendGrid の API キー
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    pub fn new(
        base_url: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("HTTP クライアント構築失敗: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

// API キーをログに出さない
impl fmt::Debug for SendGridNotificationSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridNotificationSender")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationSender for SendGridNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let url = format!("{}/v3/mail/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&MailSendRequest::from(email))
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SendGrid 送信失敗: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn backend_name(&self) -> &'static str {
        "sendgrid"
    }
}
