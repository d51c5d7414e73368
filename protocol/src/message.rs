use crate::game::GameId;
use crate::phase::PhaseId;
use crate::power::Power;
use serde::{Deserialize, Serialize};

/// A press message between powers, or a broadcast to the whole table
/// (`recipients` empty). Durable and append-only; never revised after
/// `post_message` returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub game: GameId,
    pub phase: PhaseId,
    pub sender: Power,
    pub recipients: Vec<Power>,
    pub body: String,
    pub sent_at: u64,
}
