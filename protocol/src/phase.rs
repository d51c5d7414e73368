use crate::game::GameId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque identifier for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhaseId(pub Uuid);

impl PhaseId {
    pub fn new() -> Self {
        PhaseId(Uuid::new_v4())
    }
}

impl Default for PhaseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spring or fall. Ranked so `(year, season, type)` totally orders the
/// phases of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    fn rank(self) -> u8 {
        match self {
            Season::Spring => 0,
            Season::Fall => 1,
        }
    }
}

/// Movement, retreat, or build. Ranked within a season so that, e.g.,
/// `spring-movement < spring-retreat < fall-movement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Movement,
    Retreat,
    Build,
}

impl PhaseType {
    fn rank(self) -> u8 {
        match self {
            PhaseType::Movement => 0,
            PhaseType::Retreat => 1,
            PhaseType::Build => 2,
        }
    }
}

/// A phase. `state_before`/`state_after` are
/// opaque structured documents produced by the adjudicator;
/// the controller never inspects them except through the accessors the
/// adjudicator publishes (here modeled simply as `serde_json::Value`,
/// since the real board-state schema is the adjudicator's to define).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub game: GameId,
    pub year: u16,
    pub season: Season,
    pub phase_type: PhaseType,
    pub state_before: Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state_after: Option<Value>,
    pub deadline: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved_at: Option<u64>,
}

impl Phase {
    /// The unique total order key for a game's phases: `(year, season
    /// rank, phase-type rank)`.
    pub fn order_key(&self) -> (u16, u8, u8) {
        (self.year, self.season.rank(), self.phase_type.rank())
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// Unix-epoch seconds, used for `deadline`/`resolved_at` so the protocol
/// crate stays free of a wall-clock dependency beyond `std`.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_spring_before_fall() {
        let a = (1901u16, Season::Spring.rank(), PhaseType::Movement.rank());
        let b = (1901u16, Season::Fall.rank(), PhaseType::Movement.rank());
        assert!(a < b);
    }

    #[test]
    fn orders_movement_before_retreat_before_build() {
        assert!(PhaseType::Movement.rank() < PhaseType::Retreat.rank());
        assert!(PhaseType::Retreat.rank() < PhaseType::Build.rank());
    }
}
