use crate::power::Power;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Opaque identifier for a game. Newtype over [`Uuid`] so the durable log
/// and the cache can't accidentally mix up a game id with a phase id at
/// the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        GameId(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a [`Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Active,
    Finished,
}

/// How the seven powers get handed out at start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerAssignmentMode {
    Random,
    Manual,
}

/// A game. `turn_duration`/`retreat_duration`/
/// `build_duration` are the per-phase-type deadline lengths used to arm C3
/// when a new phase is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub creator: String,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub winner: Option<Power>,
    #[serde(with = "duration_secs")]
    pub turn_duration: Duration,
    #[serde(with = "duration_secs")]
    pub retreat_duration: Duration,
    #[serde(with = "duration_secs")]
    pub build_duration: Duration,
    pub power_assignment_mode: PowerAssignmentMode,
    pub max_year: u16,
}

/// A single seat at the table. One per power once a game is active; up to
/// seven pending seats while `status = waiting`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub game: GameId,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub power: Option<Power>,
    pub is_bot: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bot_difficulty: Option<String>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
