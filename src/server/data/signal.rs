use chrono::Utc;
use entity::sea_orm_active_enums::{SignalResult, UserTier};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::{
    pagination::{PageParam, Paginated},
    signal::{Signal, SignalParam},
};

pub struct SignalRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SignalRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new pending signal.
    pub async fn create(&self, author_id: i32, param: SignalParam) -> Result<Signal, DbErr> {
        let now = Utc::now();
        let entity = entity::signal::ActiveModel {
            author_id: ActiveValue::Set(author_id),
            title: ActiveValue::Set(param.title),
            competition: ActiveValue::Set(param.competition),
            event_name: ActiveValue::Set(param.event_name),
            market: ActiveValue::Set(param.market),
            pick: ActiveValue::Set(param.pick),
            odds: ActiveValue::Set(param.odds),
            stake_units: ActiveValue::Set(param.stake_units),
            analysis: ActiveValue::Set(param.analysis),
            tier: ActiveValue::Set(param.tier),
            result: ActiveValue::Set(SignalResult::Pending),
            starts_at: ActiveValue::Set(param.starts_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Signal::from_entity(entity))
    }

    pub async fn find_by_id(&self, signal_id: i32) -> Result<Option<Signal>, DbErr> {
        let entity = entity::prelude::Signal::find_by_id(signal_id)
            .one(self.db)
            .await?;

        Ok(entity.map(Signal::from_entity))
    }

    /// Replaces the editable fields of a signal. The result is left untouched.
    ///
    /// # Returns
    /// - `Ok(Some(Signal))` - The updated signal
    /// - `Ok(None)` - No signal with that id
    pub async fn update(
        &self,
        signal_id: i32,
        param: SignalParam,
    ) -> Result<Option<Signal>, DbErr> {
        let Some(existing) = entity::prelude::Signal::find_by_id(signal_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::signal::ActiveModel = existing.into();
        active_model.title = ActiveValue::Set(param.title);
        active_model.competition = ActiveValue::Set(param.competition);
        active_model.event_name = ActiveValue::Set(param.event_name);
        active_model.market = ActiveValue::Set(param.market);
        active_model.pick = ActiveValue::Set(param.pick);
        active_model.odds = ActiveValue::Set(param.odds);
        active_model.stake_units = ActiveValue::Set(param.stake_units);
        active_model.analysis = ActiveValue::Set(param.analysis);
        active_model.tier = ActiveValue::Set(param.tier);
        active_model.starts_at = ActiveValue::Set(param.starts_at);
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let entity = active_model.update(self.db).await?;

        Ok(Some(Signal::from_entity(entity)))
    }

    /// Records the outcome of a signal.
    pub async fn set_result(
        &self,
        signal_id: i32,
        result: SignalResult,
    ) -> Result<Option<Signal>, DbErr> {
        let Some(existing) = entity::prelude::Signal::find_by_id(signal_id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active_model: entity::signal::ActiveModel = existing.into();
        active_model.result = ActiveValue::Set(result);
        active_model.updated_at = ActiveValue::Set(Utc::now());

        let entity = active_model.update(self.db).await?;

        Ok(Some(Signal::from_entity(entity)))
    }

    /// Deletes a signal.
    ///
    /// # Returns
    /// - `Ok(true)` - The signal existed and was deleted
    /// - `Ok(false)` - No signal with that id
    pub async fn delete(&self, signal_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Signal::delete_by_id(signal_id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets signals newest first, optionally restricted to one tier.
    pub async fn get_paginated(
        &self,
        tier: Option<UserTier>,
        page: PageParam,
    ) -> Result<Paginated<Signal>, DbErr> {
        let mut query = entity::prelude::Signal::find();
        if let Some(tier) = tier {
            query = query.filter(entity::signal::Column::Tier.eq(tier));
        }

        let paginator = query
            .order_by_desc(entity::signal::Column::CreatedAt)
            .order_by_desc(entity::signal::Column::Id)
            .paginate(self.db, page.per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.page).await?;
        let signals = entities.into_iter().map(Signal::from_entity).collect();

        Ok(Paginated::new(signals, total, page))
    }
}
