//! # 予約
//!
//! ドキュメントストアの `appointments/{appointmentId}` に保存される予約レコードと、
//! その更新イベント（更新前後のスナップショット）を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`AppointmentId`] | 予約 ID | ドキュメントキー |
//! | [`AppointmentStatus`] | 予約ステータス | `"confirmed"` など任意の文字列 |
//! | [`AppointmentSnapshot`] | 予約スナップショット | ある時点のレコード内容 |
//! | [`AppointmentChange`] | 予約の遷移 | 1 回の更新における前後のスナップショット |
//! | [`AppointmentConfirmation`] | 予約確定 | 確定通知の送信に必要な項目 |
//!
//! ## 設計方針
//!
//! - **レコードは外部所有**: このクレートはレコードを読むだけで、永続化しない
//! - **寛容なデシリアライズ**: 未知のフィールドは無視し、欠落したフィールドは `None`
//! - **必須項目の検証は確定時のみ**: 通知を送らない遷移では欠落を問題にしない

use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};

use crate::notification::NotificationError;

/// 予約 ID
///
/// ドキュメントストア上のキー。空文字は許容しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    /// 文字列から予約 ID を作成する
    pub fn new(value: impl Into<String>) -> Result<Self, NotificationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(NotificationError::InvalidAppointment(
                "予約 ID が空です".to_string(),
            ));
        }
        Ok(Self(value))
    }
}

/// 予約ステータス
///
/// ドキュメントストア側の列挙値をそのまま保持する。
/// 通知の判定で意味を持つのは `"confirmed"` のみ。
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentStatus(String);

impl AppointmentStatus {
    /// 確定済みを表すステータス値
    pub const CONFIRMED: &'static str = "confirmed";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn confirmed() -> Self {
        Self::new(Self::CONFIRMED)
    }

    /// 確定済みかどうか（大文字小文字を区別する完全一致）
    pub fn is_confirmed(&self) -> bool {
        self.0 == Self::CONFIRMED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppointmentStatus {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 予約スナップショット
///
/// 更新イベントで受け取る、ある時点の予約レコード。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status:        Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name:   Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date:          Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time:          Option<String>,
}

impl AppointmentSnapshot {
    /// ステータスが `"confirmed"` かどうか
    ///
    /// ステータスが欠落している場合は確定済みではないとみなす。
    pub fn is_confirmed(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(AppointmentStatus::is_confirmed)
    }
}

/// 予約の遷移（1 回の更新イベント）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentChange {
    /// 更新直前の状態
    pub before: AppointmentSnapshot,
    /// 更新直後の状態
    pub after:  AppointmentSnapshot,
}

impl AppointmentChange {
    pub fn new(before: AppointmentSnapshot, after: AppointmentSnapshot) -> Self {
        Self { before, after }
    }

    /// 確定への遷移かどうか
    ///
    /// 更新前が確定済みでなく、更新後が確定済みである場合のみ `true`。
    /// confirmed → confirmed の再通知は行わない。
    pub fn is_confirmation(&self) -> bool {
        !self.before.is_confirmed() && self.after.is_confirmed()
    }

    /// 確定への遷移であれば、通知に必要な項目を取り出す
    ///
    /// 確定への遷移でなければ `Ok(None)`。
    /// 確定への遷移で必須項目が欠けていれば `InvalidAppointment` を返す。
    pub fn confirmation(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Option<AppointmentConfirmation>, NotificationError> {
        if !self.is_confirmation() {
            return Ok(None);
        }
        AppointmentConfirmation::from_snapshot(appointment_id.clone(), &self.after).map(Some)
    }
}

/// 予約確定
///
/// 確定通知メールの生成に必要な項目を、すべて揃った状態で保持する。
/// 値はレコードのものをそのまま保持し、空白の除去などは行わない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentConfirmation {
    pub appointment_id: AppointmentId,
    pub patient_email:  String,
    pub patient_name:   String,
    pub doctor_name:    String,
    pub date:           String,
    pub time:           String,
}

impl AppointmentConfirmation {
    /// 更新後スナップショットから確定通知の項目を組み立てる
    pub fn from_snapshot(
        appointment_id: AppointmentId,
        snapshot: &AppointmentSnapshot,
    ) -> Result<Self, NotificationError> {
        Ok(Self {
            patient_email: recipient(&snapshot.patient_email)?,
            patient_name: required("patientName", &snapshot.patient_name)?,
            doctor_name: required("doctorName", &snapshot.doctor_name)?,
            date: required("date", &snapshot.date)?,
            time: required("time", &snapshot.time)?,
            appointment_id,
        })
    }
}

fn required(field: &str, value: &Option<String>) -> Result<String, NotificationError> {
    value.clone().ok_or_else(|| {
        NotificationError::InvalidAppointment(format!("{field} が設定されていません"))
    })
}

// 空白のみの宛先は欠落と同じく拒否する
fn recipient(value: &Option<String>) -> Result<String, NotificationError> {
    let email = required("patientEmail", value)?;
    if email.trim().is_empty() {
        return Err(NotificationError::InvalidAppointment(
            "patientEmail が空です".to_string(),
        ));
    }
    Ok(email)
}
