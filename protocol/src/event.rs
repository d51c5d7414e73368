use crate::game::GameId;
use crate::phase::PhaseId;
use crate::power::Power;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event on the hub (C4): `{type, game, data}`, where
/// `data` is always enough for a thin client to re-fetch authoritative
/// state. Modeled as a serde-internally-tagged enum — never a bare struct
/// with a string `tag` field the caller matches by hand — so an unknown or
/// malformed tag is a deserialization error, not a silently-ignored field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PhaseChanged {
        phase_id: PhaseId,
    },
    PhaseResolved {
        phase_id: PhaseId,
        phase_type: crate::phase::PhaseType,
        results_summary: Value,
    },
    PlayerReady {
        power: Power,
        ready_count: usize,
        total: usize,
    },
    DrawVote {
        power: Power,
        votes: usize,
        surviving: usize,
    },
    Message {
        sender: Power,
    },
    GameStarted,
    GameEnded {
        winner: Option<Power>,
    },
    PowerChanged {
        power: Power,
        user: String,
    },
}

/// An event as broadcast to subscribers of one game's topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub game: GameId,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(game: GameId, kind: EventKind) -> Self {
        Event { game, kind }
    }
}
