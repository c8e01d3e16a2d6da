//! Signal publishing and feed reads.
//!
//! Every write is pushed to the `SignalHub` after it is stored, so WebSocket clients
//! see the same state as the REST API.

use entity::sea_orm_active_enums::{SignalResult, UserTier};
use sea_orm::DatabaseConnection;

use crate::{
    model::signal::SignalEventKind,
    server::{
        data::signal::SignalRepository,
        error::AppError,
        model::{
            pagination::{PageParam, Paginated},
            signal::{Signal, SignalParam},
            user::User,
        },
        ws::hub::SignalHub,
    },
};

pub struct SignalService<'a> {
    db: &'a DatabaseConnection,
    hub: &'a SignalHub,
}

impl<'a> SignalService<'a> {
    pub fn new(db: &'a DatabaseConnection, hub: &'a SignalHub) -> Self {
        Self { db, hub }
    }

    /// Publishes a new signal.
    ///
    /// # Arguments
    /// - `author` - Manager publishing the tip
    /// - `param` - Signal contents
    ///
    /// # Returns
    /// - `Ok(Signal)` - The stored signal with result `pending`
    /// - `Err(AppError::BadRequest)` - Missing text fields or impossible odds/stake
    pub async fn create(&self, author: &User, param: SignalParam) -> Result<Signal, AppError> {
        validate(&param)?;

        let signal = SignalRepository::new(self.db)
            .create(author.id, param)
            .await?;

        tracing::info!(signal_id = signal.id, tier = ?signal.tier, "Signal published");
        self.hub.publish(SignalEventKind::Created, signal.clone());

        Ok(signal)
    }

    /// Replaces the editable fields of a signal. The result is kept.
    pub async fn update(&self, id: i32, param: SignalParam) -> Result<Signal, AppError> {
        validate(&param)?;

        let signal = SignalRepository::new(self.db)
            .update(id, param)
            .await?
            .ok_or_else(not_found)?;

        self.hub.publish(SignalEventKind::Updated, signal.clone());

        Ok(signal)
    }

    /// Records the outcome of a signal.
    ///
    /// # Returns
    /// - `Ok(Signal)` - The settled signal
    /// - `Err(AppError::BadRequest)` - `result` is `pending`
    /// - `Err(AppError::NotFound)` - Unknown signal
    pub async fn settle(&self, id: i32, result: SignalResult) -> Result<Signal, AppError> {
        if result == SignalResult::Pending {
            return Err(AppError::BadRequest(
                "A signal can only be settled as won, lost or void".to_string(),
            ));
        }

        let signal = SignalRepository::new(self.db)
            .set_result(id, result)
            .await?
            .ok_or_else(not_found)?;

        tracing::info!(signal_id = signal.id, result = ?signal.result, "Signal settled");
        self.hub.publish(SignalEventKind::Settled, signal.clone());

        Ok(signal)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let repo = SignalRepository::new(self.db);

        let signal = repo.find_by_id(id).await?.ok_or_else(not_found)?;
        if !repo.delete(id).await? {
            return Err(not_found());
        }

        self.hub.publish(SignalEventKind::Deleted, signal);

        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<Signal, AppError> {
        SignalRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    /// Newest signals first, optionally of one tier only.
    ///
    /// VIP signals are returned to everyone; callers redact them per viewer.
    pub async fn list(
        &self,
        tier: Option<UserTier>,
        page: PageParam,
    ) -> Result<Paginated<Signal>, AppError> {
        Ok(SignalRepository::new(self.db)
            .get_paginated(tier, page)
            .await?)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Signal not found".to_string())
}

fn validate(param: &SignalParam) -> Result<(), AppError> {
    let required = [
        ("title", &param.title),
        ("competition", &param.competition),
        ("event_name", &param.event_name),
        ("market", &param.market),
        ("pick", &param.pick),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }

    if !param.odds.is_finite() || param.odds <= 1.0 {
        return Err(AppError::BadRequest(
            "Odds must be greater than 1.0".to_string(),
        ));
    }

    if let Some(stake) = param.stake_units {
        if !stake.is_finite() || stake <= 0.0 {
            return Err(AppError::BadRequest(
                "Stake must be positive".to_string(),
            ));
        }
    }

    Ok(())
}
