//! Signal factory for creating test tips.

use crate::factory::helpers::next_id;
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{SignalResult, UserTier};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating signals authored by a given user.
pub struct SignalFactory<'a> {
    db: &'a DatabaseConnection,
    author_id: i32,
    title: String,
    pick: String,
    odds: f64,
    tier: UserTier,
    result: SignalResult,
}

impl<'a> SignalFactory<'a> {
    /// Creates a new SignalFactory.
    ///
    /// Defaults:
    /// - title: `"Signal {id}"`
    /// - pick: `"Home win"` at odds `1.85`
    /// - tier: `UserTier::Free`
    /// - result: `SignalResult::Pending`
    pub fn new(db: &'a DatabaseConnection, author_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            author_id,
            title: format!("Signal {}", id),
            pick: "Home win".to_string(),
            odds: 1.85,
            tier: UserTier::Free,
            result: SignalResult::Pending,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn tier(mut self, tier: UserTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn result(mut self, result: SignalResult) -> Self {
        self.result = result;
        self
    }

    /// Builds and inserts the signal entity into the database.
    pub async fn build(self) -> Result<entity::signal::Model, DbErr> {
        let now = Utc::now();
        entity::signal::ActiveModel {
            author_id: ActiveValue::Set(self.author_id),
            title: ActiveValue::Set(self.title),
            competition: ActiveValue::Set("Brasileirão".to_string()),
            event_name: ActiveValue::Set("Flamengo x Palmeiras".to_string()),
            market: ActiveValue::Set("1X2".to_string()),
            pick: ActiveValue::Set(self.pick),
            odds: ActiveValue::Set(self.odds),
            stake_units: ActiveValue::Set(Some(1.0)),
            analysis: ActiveValue::Set(Some("Strong home form".to_string())),
            tier: ActiveValue::Set(self.tier),
            result: ActiveValue::Set(self.result),
            starts_at: ActiveValue::Set(now + Duration::hours(3)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a free pending signal authored by the given user.
pub async fn create_signal(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<entity::signal::Model, DbErr> {
    SignalFactory::new(db, author_id).build().await
}
