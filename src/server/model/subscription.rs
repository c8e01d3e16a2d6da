use chrono::{DateTime, Duration, Utc};
use entity::sea_orm_active_enums::SubscriptionStatus;

use crate::model::subscription::SubscriptionDto;

/// A user's VIP window. Each user has at most one row that is reused across renewals.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub plan_id: Option<i32>,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Subscription {
    /// Active status and an unexpired window.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }

    pub fn into_dto(self, now: DateTime<Utc>) -> SubscriptionDto {
        let active = self.is_active(now);
        SubscriptionDto {
            user_id: self.user_id,
            plan_id: self.plan_id,
            status: self.status,
            started_at: self.started_at,
            expires_at: self.expires_at,
            active,
        }
    }

    pub fn from_entity(entity: entity::subscription::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            status: entity.status,
            started_at: entity.started_at,
            expires_at: entity.expires_at,
        }
    }
}

/// Upper bound for the days of one plan or manual grant.
pub const MAX_VIP_DAYS: i32 = 3650;

/// Computes the window produced by adding `duration` of VIP access at `now`.
///
/// A still-running window is extended from its current end; anything else starts a
/// fresh window at `now`. Returns `(started_at, expires_at)`, or `None` when the end
/// falls outside the representable date range.
pub fn extend_window(
    current: Option<&Subscription>,
    duration: Duration,
    now: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match current {
        Some(subscription) if subscription.is_active(now) => Some((
            subscription.started_at,
            subscription.expires_at.checked_add_signed(duration)?,
        )),
        _ => Some((now, now.checked_add_signed(duration)?)),
    }
}

/// Parameters for writing a user's subscription row.
#[derive(Debug, Clone)]
pub struct UpsertSubscriptionParam {
    pub user_id: i32,
    pub plan_id: Option<i32>,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
