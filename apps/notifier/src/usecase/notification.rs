//! # 通知ユースケース
//!
//! 予約の更新イベントに伴う確定通知メールの生成・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール生成
//! - [`notifier`] - 遷移判定 + テンプレートレンダリング + 送信の統合サービス

pub mod notifier;
pub mod template_renderer;

pub use notifier::{ConfirmationNotifier, NotifyOutcome};
pub use template_renderer::TemplateRenderer;
