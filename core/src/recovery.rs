//! Crash recovery (C8): on startup, rehydrate the cache
//! from the durable log for every active game, and re-arm each one's
//! timer against its stored deadline — including deadlines already in
//! the past, which the controller's first sweep then resolves exactly as
//! it would any other expiry.

use crate::cache::Cache;
use crate::controller::PhaseController;
use crate::error::Result;
use crate::log::GameLog;
use crate::timer::Timer;
use diplomacy_protocol::now_unix;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

/// Walks every active game in the log and restores its working set and
/// timer. Call once at process startup before accepting any external
/// trigger; the controller is otherwise unaware this ever happened.
pub async fn recover(log: &Arc<dyn GameLog>, cache: &Arc<dyn Cache>, timer: &Arc<dyn Timer>) -> Result<usize> {
    let games = log.active_games().await?;
    let mut recovered = 0;
    let now = now_unix();

    for game in games {
        let Some(phase) = log.current_phase(game).await? else {
            warn!(%game, "active game has no current phase during recovery, skipping");
            continue;
        };
        cache.install(phase.clone()).await;

        // A deadline already past is armed for "now" rather than computed
        // as a negative duration; the controller's periodic sweep picks
        // it up on its very first tick regardless.
        let remaining = phase.deadline.saturating_sub(now);
        timer.arm(game, phase.id, Instant::now() + Duration::from_secs(remaining)).await;
        recovered += 1;
    }

    info!(recovered, "recovered active games from durable log");
    Ok(recovered)
}

/// Convenience wrapper that also runs an immediate sweep after recovery,
/// so any phase whose deadline had already elapsed before the crash
/// resolves right away instead of waiting for the first sweep tick.
pub async fn recover_and_sweep(controller: &Arc<PhaseController>, log: &Arc<dyn GameLog>, cache: &Arc<dyn Cache>, timer: &Arc<dyn Timer>) -> Result<usize> {
    let recovered = recover(log, cache, timer).await?;
    controller.sweep().await?;
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudicate::BoardState;
    use crate::cache::InMemoryCache;
    use crate::hub::BroadcastHub;
    use crate::log::InMemoryLog;
    use crate::timer::TokioTimer;
    use diplomacy_protocol::{Game, GameId, GameStatus, Phase, PhaseId, PhaseType, PowerAssignmentMode, Season};
    use std::time::Duration as StdDuration;

    fn sample_game(id: GameId) -> Game {
        Game {
            id,
            name: "t".into(),
            creator: "alice".into(),
            status: GameStatus::Waiting,
            winner: None,
            turn_duration: StdDuration::from_secs(86400),
            retreat_duration: StdDuration::from_secs(3600),
            build_duration: StdDuration::from_secs(3600),
            power_assignment_mode: PowerAssignmentMode::Manual,
            max_year: 1920,
        }
    }

    #[tokio::test]
    async fn recovery_reinstalls_every_active_games_current_phase() {
        let log: Arc<dyn GameLog> = Arc::new(InMemoryLog::new());
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let (timer_impl, _rx) = TokioTimer::new();
        let timer: Arc<dyn Timer> = Arc::new(timer_impl);

        let game_id = GameId::new();
        log.create_game(sample_game(game_id)).await.unwrap();
        let phase = Phase {
            id: PhaseId::new(),
            game: game_id,
            year: 1901,
            season: Season::Spring,
            phase_type: PhaseType::Movement,
            state_before: serde_json::to_value(BoardState::standard_opening()).unwrap(),
            state_after: None,
            deadline: now_unix() + 1000,
            resolved_at: None,
        };
        log.activate(game_id, phase.clone()).await.unwrap();

        assert!(cache.get(game_id).await.is_none());
        let recovered = recover(&log, &cache, &timer).await.unwrap();
        assert_eq!(recovered, 1);
        assert!(cache.get(game_id).await.is_some());
    }

    #[tokio::test]
    async fn recovery_skips_games_that_are_not_active() {
        let log: Arc<dyn GameLog> = Arc::new(InMemoryLog::new());
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let (timer_impl, _rx) = TokioTimer::new();
        let timer: Arc<dyn Timer> = Arc::new(timer_impl);

        log.create_game(sample_game(GameId::new())).await.unwrap();
        let recovered = recover(&log, &cache, &timer).await.unwrap();
        assert_eq!(recovered, 0);
    }
}
