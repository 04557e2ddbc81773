//! # Notifier 設定
//!
//! 環境変数から Notifier サーバーの設定を読み込む。
//! プロセス起動時に 1 度だけ構築し、以降は読み取り専用で各コンポーネントに渡す。

use std::{env, fmt, str::FromStr, time::Duration};

use apptnotify_infra::notification::SENDGRID_DEFAULT_BASE_URL;
use thiserror::Error;

/// 送信元アドレスのデフォルト
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@clinic.example.com";

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値が不正
    #[error("{key} の値が不正です: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Notifier サーバーの設定
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    /// SendGrid v3 API 経由で送信（本番）
    SendGrid,
    /// SMTP サーバー経由で送信（Mailpit 開発用）
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

impl FromStr for NotificationBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sendgrid" => Ok(Self::SendGrid),
            "smtp" => Ok(Self::Smtp),
            "noop" => Ok(Self::Noop),
            other => Err(ConfigError::Invalid {
                key:   "NOTIFICATION_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// SendGrid API キー
///
/// `Debug` ではマスクした値を出力する。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `sendgrid`: SendGrid 経由で送信（デフォルト、`SENDGRID_API_KEY` 必須）
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:           NotificationBackend,
    /// backend=sendgrid の場合のみ必須
    pub sendgrid_api_key:  Option<ApiKey>,
    pub sendgrid_base_url: String,
    pub sendgrid_timeout:  Duration,
    pub smtp_host:         String,
    pub smtp_port:         u16,
    /// 送信元メールアドレス（プロバイダで検証済みであること）
    pub from_address:      String,
}

impl NotifierConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー検索関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host:         lookup("NOTIFIER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:         parse_or(&lookup, "NOTIFIER_PORT", 8080)?,
            notification: NotificationConfig::from_lookup(&lookup)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("NOTIFICATION_BACKEND") {
            Some(value) => value.parse()?,
            None => NotificationBackend::SendGrid,
        };

        let sendgrid_api_key = lookup("SENDGRID_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(ApiKey::new);
        if backend == NotificationBackend::SendGrid && sendgrid_api_key.is_none() {
            return Err(ConfigError::Missing("SENDGRID_API_KEY"));
        }

        let timeout_secs: u64 = parse_or(lookup, "SENDGRID_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key:   "SENDGRID_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
            });
        }

        Ok(Self {
            backend,
            sendgrid_api_key,
            sendgrid_base_url: lookup("SENDGRID_BASE_URL")
                .unwrap_or_else(|| SENDGRID_DEFAULT_BASE_URL.to_string()),
            sendgrid_timeout: Duration::from_secs(timeout_secs),
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
            smtp_port: parse_or(lookup, "SMTP_PORT", 1025)?,
            from_address: lookup("NOTIFICATION_FROM_ADDRESS")
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<NotifierConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        NotifierConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn apiキーのみでデフォルト設定が読み込まれる() {
        let config = load(&[("SENDGRID_API_KEY", "SG.key")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.notification.backend, NotificationBackend::SendGrid);
        assert_eq!(
            config.notification.sendgrid_api_key,
            Some(ApiKey::new("SG.key"))
        );
        assert_eq!(config.notification.sendgrid_base_url, "https://api.sendgrid.com");
        assert_eq!(config.notification.sendgrid_timeout, Duration::from_secs(10));
        assert_eq!(config.notification.from_address, DEFAULT_FROM_ADDRESS);
    }

    #[test]
    fn sendgridバックエンドでapiキーがなければエラー() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SENDGRID_API_KEY")));

        let err = load(&[("SENDGRID_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SENDGRID_API_KEY")));
    }

    #[test]
    fn noopバックエンドではapiキーは不要() {
        let config = load(&[("NOTIFICATION_BACKEND", "noop")]).unwrap();

        assert_eq!(config.notification.backend, NotificationBackend::Noop);
        assert!(config.notification.sendgrid_api_key.is_none());
    }

    #[test]
    fn smtpバックエンドの設定が読み込まれる() {
        let config = load(&[
            ("NOTIFICATION_BACKEND", "smtp"),
            ("SMTP_HOST", "mailpit"),
            ("SMTP_PORT", "2525"),
            ("NOTIFICATION_FROM_ADDRESS", "clinic@example.com"),
            ("NOTIFIER_PORT", "3000"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.notification.backend, NotificationBackend::Smtp);
        assert_eq!(config.notification.smtp_host, "mailpit");
        assert_eq!(config.notification.smtp_port, 2525);
        assert_eq!(config.notification.from_address, "clinic@example.com");
    }

    #[test]
    fn 不正な値はエラーになる() {
        let err = load(&[("NOTIFICATION_BACKEND", "ses")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "NOTIFICATION_BACKEND",
                ..
            }
        ));

        let err = load(&[("SENDGRID_API_KEY", "SG.key"), ("NOTIFIER_PORT", "http")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "NOTIFIER_PORT",
                ..
            }
        ));

        let err = load(&[
            ("SENDGRID_API_KEY", "SG.key"),
            ("SENDGRID_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "SENDGRID_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn debug出力にapiキーを含めない() {
        let config = load(&[("SENDGRID_API_KEY", "SG.secret")]).unwrap();

        assert!(!format!("{config:?}").contains("SG.secret"));
    }
}
