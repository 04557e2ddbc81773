//! # ヘルスチェックハンドラ
//!
//! ホスティング基盤の liveness probe 用エンドポイント。
//!
//! ```text
//! GET /health
//! ```

use apptnotify_shared::HealthResponse;
use axum::Json;

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
