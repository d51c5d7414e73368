//! The working-set cache (C2): a fast, in-memory view of each active
//! game's current phase and pending orders. The
//! durable log (C1) remains the source of truth; the cache exists so the
//! hot path (submit an order, check readiness) never touches it.

use crate::error::{Error, Result};
use async_trait::async_trait;
use diplomacy_protocol::{GameId, Order, Phase, PhaseId, Power};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The working set for one game's current phase: the phase itself plus
/// whatever orders have been submitted for it so far, keyed by power.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub phase: Phase,
    pub orders: HashMap<Power, Vec<Order>>,
    pub ready: std::collections::HashSet<Power>,
    pub draw_votes: std::collections::HashSet<Power>,
}

impl WorkingSet {
    pub fn new(phase: Phase) -> Self {
        WorkingSet {
            phase,
            orders: HashMap::new(),
            ready: std::collections::HashSet::new(),
            draw_votes: std::collections::HashSet::new(),
        }
    }

    /// Every power that has neither submitted orders nor marked itself
    /// ready — these get phase-type defaults at resolution.
    pub fn missing(&self, all_powers: &[Power]) -> Vec<Power> {
        all_powers.iter().copied().filter(|p| !self.ready.contains(p) && !self.orders.contains_key(p)).collect()
    }

    pub fn all_ready(&self, seated_powers: &[Power]) -> bool {
        seated_powers.iter().all(|p| self.ready.contains(p) || self.orders.contains_key(p))
    }
}

/// The cache contract. Implementations need not be
/// durable — [`Cache::evict`] drops a game's working set unconditionally,
/// and C8 recovery rebuilds it from the log on restart.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Installs a freshly created phase as a game's working set, replacing
    /// anything already cached for that game.
    async fn install(&self, phase: Phase);

    /// The current working set for a game, if cached.
    async fn get(&self, game: GameId) -> Option<WorkingSet>;

    /// Replaces a power's pending orders for the game's current phase.
    /// Returns an error if the cached phase id doesn't match `phase`
    /// (stale submission against an already-resolved phase).
    async fn submit_orders(&self, game: GameId, phase: PhaseId, power: Power, orders: Vec<Order>) -> Result<()>;

    async fn mark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()>;
    async fn unmark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()>;

    async fn vote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()>;
    async fn unvote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()>;

    async fn evict(&self, game: GameId);

    /// Every game currently cached, for the periodic sweep (C3/C7).
    async fn cached_games(&self) -> Vec<GameId>;
}

/// An in-memory [`Cache`]. A Redis-backed implementation would satisfy the
/// same trait; see DESIGN.md.
#[derive(Default)]
pub struct InMemoryCache {
    games: RwLock<HashMap<GameId, WorkingSet>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    async fn with_set<F>(&self, game: GameId, phase: PhaseId, f: F) -> Result<()>
    where
        F: FnOnce(&mut WorkingSet),
    {
        let mut games = self.games.write().await;
        let set = games.get_mut(&game).ok_or(Error::NoCurrentPhase(game))?;
        if set.phase.id != phase {
            return Err(Error::Validation(format!("stale phase {phase}, current is {}", set.phase.id)));
        }
        f(set);
        Ok(())
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn install(&self, phase: Phase) {
        let mut games = self.games.write().await;
        games.insert(phase.game, WorkingSet::new(phase));
    }

    async fn get(&self, game: GameId) -> Option<WorkingSet> {
        self.games.read().await.get(&game).cloned()
    }

    async fn submit_orders(&self, game: GameId, phase: PhaseId, power: Power, orders: Vec<Order>) -> Result<()> {
        self.with_set(game, phase, |set| {
            set.orders.insert(power, orders);
        })
        .await
    }

    async fn mark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.with_set(game, phase, |set| {
            set.ready.insert(power);
        })
        .await
    }

    async fn unmark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.with_set(game, phase, |set| {
            set.ready.remove(&power);
        })
        .await
    }

    async fn vote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.with_set(game, phase, |set| {
            set.draw_votes.insert(power);
        })
        .await
    }

    async fn unvote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.with_set(game, phase, |set| {
            set.draw_votes.remove(&power);
        })
        .await
    }

    async fn evict(&self, game: GameId) {
        self.games.write().await.remove(&game);
    }

    async fn cached_games(&self) -> Vec<GameId> {
        self.games.read().await.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diplomacy_protocol::{now_unix, PhaseType, Season};

    fn phase(game: GameId) -> Phase {
        Phase {
            id: PhaseId::new(),
            game,
            year: 1901,
            season: Season::Spring,
            phase_type: PhaseType::Movement,
            state_before: serde_json::json!({}),
            state_after: None,
            deadline: now_unix() + 86400,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn submit_orders_against_stale_phase_is_rejected() {
        let cache = InMemoryCache::new();
        let game = GameId::new();
        let p1 = phase(game);
        let p1_id = p1.id;
        cache.install(p1).await;

        let p2 = phase(game);
        cache.install(p2).await;

        let err = cache.submit_orders(game, p1_id, Power::England, vec![]).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn all_ready_accounts_for_both_ready_and_submitted_orders() {
        let cache = InMemoryCache::new();
        let game = GameId::new();
        let p = phase(game);
        let pid = p.id;
        cache.install(p).await;

        let seated = [Power::England, Power::France];
        cache.mark_ready(game, pid, Power::England).await.unwrap();
        cache.submit_orders(game, pid, Power::France, vec![]).await.unwrap();

        let set = cache.get(game).await.unwrap();
        assert!(set.all_ready(&seated));
    }
}
