//! 確定通知フロー統合テスト
//!
//! 環境変数相当の設定から SendGrid バックエンドを構築し、ローカルに起動した
//! SendGrid スタブに対して更新イベント → メール送信の一連の流れをテストする。
//!
//! ## 実行方法
//!
//! ```bash
//! cargo test -p apptnotify-notifier --test confirmation_flow_test
//! ```
//!
//! ## テストケース
//!
//! - pending → confirmed で SendGrid に 1 回だけリクエストが届く
//! - confirmed → confirmed では SendGrid を呼ばない
//! - SendGrid が拒否した場合は 502 を返す

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use apptnotify_notifier::{
    app_builder::{build_app, build_notifier, build_sender},
    config::NotifierConfig,
};
use axum::{
    Json,
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    routing::post,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

// --- SendGrid スタブ ---

#[derive(Clone)]
struct SendGridStub {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    status:   StatusCode,
}

async fn mail_send(
    State(stub): State<SendGridStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    stub.requests.lock().unwrap().push((headers, body));
    stub.status
}

/// SendGrid スタブを起動し、ベース URL とスタブを返す
async fn spawn_sendgrid(status: StatusCode) -> (String, SendGridStub) {
    let stub = SendGridStub {
        requests: Arc::new(Mutex::new(Vec::new())),
        status,
    };
    let app = Router::new()
        .route("/v3/mail/send", post(mail_send))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), stub)
}

/// SendGrid スタブを向いた Notifier のルーターを構築する
fn notifier_app(sendgrid_base_url: &str) -> Router {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SENDGRID_API_KEY", "SG.integration".to_string()),
        ("SENDGRID_BASE_URL", sendgrid_base_url.to_string()),
        ("NOTIFICATION_FROM_ADDRESS", "clinic@example.com".to_string()),
    ]);
    let config = NotifierConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let sender = build_sender(&config.notification).unwrap();
    let notifier = build_notifier(&config.notification, sender).unwrap();
    build_app(notifier)
}

async fn post_event(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/events/appointments/appt-042/updated")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn alice_confirmed() -> Value {
    json!({
        "status": "confirmed",
        "patientEmail": "a@x.com",
        "patientName": "Alice",
        "doctorName": "Lee",
        "date": "2024-01-01",
        "time": "10:00"
    })
}

#[tokio::test]
async fn pendingからconfirmedでsendgridに確定通知が1回届く() {
    let (base_url, stub) = spawn_sendgrid(StatusCode::ACCEPTED).await;
    let app = notifier_app(&base_url);

    let (status, body) = post_event(
        app,
        json!({ "before": { "status": "pending" }, "after": alice_confirmed() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "appointmentId": "appt-042", "outcome": "sent" }));

    let requests = stub.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, payload) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer SG.integration");
    assert_eq!(
        payload,
        &json!({
            "personalizations": [{ "to": [{ "email": "a@x.com" }] }],
            "from": { "email": "clinic@example.com" },
            "subject": "Appointment Confirmed",
            "content": [{
                "type": "text/plain",
                "value": "Dear Alice, your appointment with Dr. Lee on 2024-01-01 at 10:00 has been confirmed. Thank you for booking with us!"
            }]
        })
    );
}

#[tokio::test]
async fn confirmedからconfirmedではsendgridを呼ばない() {
    let (base_url, stub) = spawn_sendgrid(StatusCode::ACCEPTED).await;
    let app = notifier_app(&base_url);

    let (status, body) = post_event(
        app,
        json!({ "before": alice_confirmed(), "after": alice_confirmed() }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "skipped");
    assert!(stub.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sendgridが拒否した場合は502を返す() {
    let (base_url, stub) = spawn_sendgrid(StatusCode::FORBIDDEN).await;
    let app = notifier_app(&base_url);

    let (status, body) = post_event(
        app,
        json!({ "before": { "status": "pending" }, "after": alice_confirmed() }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("403"));
    assert_eq!(stub.requests.lock().unwrap().len(), 1);
}
