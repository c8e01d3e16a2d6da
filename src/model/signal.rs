use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{SignalResult, UserTier};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A tip as shown to a given viewer.
///
/// For VIP signals seen by a non-VIP viewer the betting details are `None`
/// and `locked` is set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SignalDto {
    pub id: i32,
    pub title: String,
    pub competition: String,
    pub event_name: String,
    pub market: String,
    pub pick: Option<String>,
    pub odds: Option<f64>,
    pub stake_units: Option<f64>,
    pub analysis: Option<String>,
    #[schema(value_type = String, example = "vip")]
    pub tier: UserTier,
    #[schema(value_type = String, example = "pending")]
    pub result: SignalResult,
    pub locked: bool,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of both signal creation and full signal updates.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateSignalDto {
    pub title: String,
    pub competition: String,
    pub event_name: String,
    pub market: String,
    pub pick: String,
    pub odds: f64,
    pub stake_units: Option<f64>,
    pub analysis: Option<String>,
    #[schema(value_type = String, example = "free")]
    pub tier: UserTier,
    pub starts_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SettleSignalDto {
    #[schema(value_type = String, example = "won")]
    pub result: SignalResult,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalEventKind {
    Created,
    Updated,
    Settled,
    Deleted,
}

/// Body of a STOMP `MESSAGE` frame on the signal topics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
pub struct SignalEventDto {
    pub kind: SignalEventKind,
    pub signal: SignalDto,
}
