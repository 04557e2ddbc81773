//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//! ハンドラは薄く保ち、判定と送信はユースケース層に委譲する。

pub mod appointment_event;
pub mod health;

pub use appointment_event::{
    AppointmentEventResponse,
    AppointmentEventState,
    handle_appointment_updated,
};
pub use health::health_check;
