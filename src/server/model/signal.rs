use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{SignalResult, UserTier};

use crate::model::signal::{CreateSignalDto, SignalDto};

/// A published tip.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub competition: String,
    pub event_name: String,
    pub market: String,
    pub pick: String,
    pub odds: f64,
    pub stake_units: Option<f64>,
    pub analysis: Option<String>,
    pub tier: UserTier,
    pub result: SignalResult,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Signal {
    /// Converts to a DTO as seen by a viewer.
    ///
    /// VIP signals lose their betting details unless `can_view_vip` is set.
    pub fn into_dto(self, can_view_vip: bool) -> SignalDto {
        let locked = self.tier == UserTier::Vip && !can_view_vip;

        SignalDto {
            id: self.id,
            title: self.title,
            competition: self.competition,
            event_name: self.event_name,
            market: self.market,
            pick: (!locked).then_some(self.pick),
            odds: (!locked).then_some(self.odds),
            stake_units: if locked { None } else { self.stake_units },
            analysis: if locked { None } else { self.analysis },
            tier: self.tier,
            result: self.result,
            locked,
            starts_at: self.starts_at,
            created_at: self.created_at,
        }
    }

    pub fn from_entity(entity: entity::signal::Model) -> Self {
        Self {
            id: entity.id,
            author_id: entity.author_id,
            title: entity.title,
            competition: entity.competition,
            event_name: entity.event_name,
            market: entity.market,
            pick: entity.pick,
            odds: entity.odds,
            stake_units: entity.stake_units,
            analysis: entity.analysis,
            tier: entity.tier,
            result: entity.result,
            starts_at: entity.starts_at,
            created_at: entity.created_at,
        }
    }
}

/// Editable signal fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct SignalParam {
    pub title: String,
    pub competition: String,
    pub event_name: String,
    pub market: String,
    pub pick: String,
    pub odds: f64,
    pub stake_units: Option<f64>,
    pub analysis: Option<String>,
    pub tier: UserTier,
    pub starts_at: DateTime<Utc>,
}

impl SignalParam {
    pub fn from_dto(dto: CreateSignalDto) -> Self {
        Self {
            title: dto.title.trim().to_string(),
            competition: dto.competition.trim().to_string(),
            event_name: dto.event_name.trim().to_string(),
            market: dto.market.trim().to_string(),
            pick: dto.pick.trim().to_string(),
            odds: dto.odds,
            stake_units: dto.stake_units,
            analysis: dto.analysis,
            tier: dto.tier,
            starts_at: dto.starts_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(tier: UserTier) -> Signal {
        let now = Utc::now();
        Signal {
            id: 7,
            author_id: 1,
            title: "Derby".to_string(),
            competition: "Série A".to_string(),
            event_name: "Grêmio x Inter".to_string(),
            market: "Over/Under".to_string(),
            pick: "Over 2.5".to_string(),
            odds: 2.1,
            stake_units: Some(2.0),
            analysis: Some("Both sides score freely".to_string()),
            tier,
            result: SignalResult::Pending,
            starts_at: now,
            created_at: now,
        }
    }

    #[test]
    fn free_signal_is_never_locked() {
        let dto = signal(UserTier::Free).into_dto(false);
        assert!(!dto.locked);
        assert_eq!(dto.pick.as_deref(), Some("Over 2.5"));
        assert_eq!(dto.odds, Some(2.1));
    }

    #[test]
    fn vip_signal_is_redacted_for_free_viewers() {
        let dto = signal(UserTier::Vip).into_dto(false);
        assert!(dto.locked);
        assert_eq!(dto.pick, None);
        assert_eq!(dto.odds, None);
        assert_eq!(dto.stake_units, None);
        assert_eq!(dto.analysis, None);
        assert_eq!(dto.title, "Derby");
    }

    #[test]
    fn vip_signal_is_complete_for_vip_viewers() {
        let dto = signal(UserTier::Vip).into_dto(true);
        assert!(!dto.locked);
        assert_eq!(dto.stake_units, Some(2.0));
    }
}
