//! # ユースケース層

pub mod notification;

pub use notification::{ConfirmationNotifier, NotifyOutcome, TemplateRenderer};
