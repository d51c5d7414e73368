//! Bot strategies (C6). Five difficulty tiers share one
//! seam — [`Strategy`] — so the controller and the dispatch layer never
//! know which tier (or an engine-backed one, via `diplomacy-engine-client`)
//! produced a set of orders.
//!
//! The 75-province adjacency table is explicitly out of scope, so these
//! strategies reason only over what [`BoardState`]
//! exposes: which provinces a power currently holds, its home centers, and
//! its adjustment. None of them invent a destination province a real
//! engine would compute from the map — see each module's doc comment for
//! exactly how it approximates its tier under that constraint.

mod easy;
mod hard;
mod medium;
mod random;

pub use easy::EasyStrategy;
pub use hard::HardStrategy;
pub use medium::MediumStrategy;
pub use random::RandomStrategy;

use crate::adjudicate::BoardState;
use diplomacy_protocol::{Order, PhaseType, Power};

/// A pluggable source of orders for one power's turn.
/// Implementations must be deterministic enough to test but are not
/// required to be pure — [`HardStrategy`] and an engine-backed
/// implementation both carry internal state across calls.
#[async_trait::async_trait]
pub trait Strategy: Send + Sync {
    /// Produces a full order set for `power` given the board as it stood
    /// entering `phase_type` of `year`. Never returns fewer orders than
    /// `power` has units that need one — any unit this strategy has no
    /// opinion about must get an explicit default (the controller's own
    /// resolution-time fallback still applies on top of this as a safety
    /// net, not a substitute).
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, year: u16) -> Vec<Order>;

    /// The tier name used in [`Seat::bot_difficulty`] and in logs.
    fn name(&self) -> &'static str;
}

/// Resolves a difficulty string (as stored on a [`diplomacy_protocol::Seat`])
/// to a strategy, or `None` for an unrecognized tier (validation rejects
/// seating a bot with one).
pub fn by_name(name: &str) -> Option<Box<dyn Strategy>> {
    match name {
        "random" => Some(Box::new(RandomStrategy::default())),
        "easy" => Some(Box::new(EasyStrategy)),
        "medium" => Some(Box::new(MediumStrategy)),
        "hard" => Some(Box::new(HardStrategy::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(by_name("impossible").is_none());
    }

    #[test]
    fn every_known_tier_resolves() {
        for tier in ["random", "easy", "medium", "hard"] {
            assert!(by_name(tier).is_some(), "{tier} should resolve");
        }
    }
}
