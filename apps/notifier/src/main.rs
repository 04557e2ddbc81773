//! # Notifier サーバー
//!
//! 予約ドキュメントの更新イベントを受け取り、ステータスが `confirmed` に
//! 遷移したときに患者へ確定通知メールを送信する。
//!
//! ```text
//! ┌──────────────┐  update event   ┌──────────────┐  POST /v3/mail/send  ┌──────────────┐
//! │ DocumentStore│────────────────▶│   Notifier   │─────────────────────▶│   SendGrid   │
//! └──────────────┘  (before/after) └──────────────┘                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `NOTIFIER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `NOTIFIER_PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `NOTIFICATION_BACKEND` | No | `sendgrid` / `smtp` / `noop`（デフォルト: `sendgrid`） |
//! | `SENDGRID_API_KEY` | backend=sendgrid | SendGrid API キー |
//! | `NOTIFICATION_FROM_ADDRESS` | No | 送信元アドレス |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit）
//! NOTIFICATION_BACKEND=smtp cargo run -p apptnotify-notifier
//!
//! # 本番環境
//! SENDGRID_API_KEY=SG.xxx LOG_FORMAT=json cargo run -p apptnotify-notifier --release
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use apptnotify_notifier::{
    app_builder::{build_app, build_notifier, build_sender},
    config::NotifierConfig,
};
use apptnotify_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tracing::Instrument as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let span = init_tracing(&TracingConfig::from_env("notifier"));

    run().instrument(span).await
}

async fn run() -> anyhow::Result<()> {
    let config = NotifierConfig::from_env().context("設定の読み込みに失敗しました")?;

    let sender =
        build_sender(&config.notification).context("送信バックエンドの初期化に失敗しました")?;
    let notifier = build_notifier(&config.notification, sender)
        .context("通知サービスの初期化に失敗しました")?;
    let app = build_app(notifier);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notifier サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
