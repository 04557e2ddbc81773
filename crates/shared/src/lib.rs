//! # 予約通知 共有ユーティリティ
//!
//! ビジネスロジックを含まない共通ユーティリティ（ログ初期化、イベントログ、
//! レスポンス型）を提供する。

pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
