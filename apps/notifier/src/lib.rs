//! # Notifier ライブラリ
//!
//! 予約確定通知サービスの設定・ユースケース・ハンドラを公開する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
