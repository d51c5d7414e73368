//! The phase controller (C7) — the heart of the service.
//! One call, [`PhaseController::resolve_phase`], carries out the whole
//! transition algorithm: fill in defaults for silent powers, call the
//! adjudicator, persist atomically, arm the next deadline, fan out
//! events, and dispatch bot orders for the phase that just opened.
//!
//! Four independent triggers call into it:
//! an explicit action that completes readiness ([`PhaseController::mark_ready`]
//! et al.), a deadline elapsing ([`PhaseController::run`]'s timer branch),
//! the periodic sweep (same loop, the interval branch), and startup
//! recovery ([`crate::recovery`]).

use crate::adjudicate::{Adjudicator, BoardState};
use crate::bots::Strategy;
use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::hub::EventHub;
use crate::log::{GameLog, Transition};
use crate::timer::Timer;
use diplomacy_protocol::{
    now_unix, Event, EventKind, Game, GameId, GameStatus, Order, OrderType, Phase, PhaseId, PhaseType, Power, Season,
    Seat,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, instrument, warn};

/// Resolves a seat's `bot_difficulty` string to a [`Strategy`]. Defaults to
/// [`crate::bots::by_name`]; a server that also offers engine-backed play
/// supplies one that additionally recognizes its own difficulty names
/// (e.g. `"engine"`) before falling back to the built-in tiers.
pub type StrategyResolver = Arc<dyn Fn(&str) -> Option<Box<dyn Strategy>> + Send + Sync>;

/// Everything [`PhaseController`] needs that isn't itself: the four
/// backing stores (C1/C2/C3/C4), the adjudicator seam, and a lookup from
/// bot difficulty name to [`Strategy`].
pub struct PhaseController {
    log: Arc<dyn GameLog>,
    cache: Arc<dyn Cache>,
    hub: Arc<dyn EventHub>,
    timer: Arc<dyn Timer>,
    adjudicator: Arc<dyn Adjudicator>,
    strategy_resolver: StrategyResolver,
}

impl PhaseController {
    pub fn new(
        log: Arc<dyn GameLog>,
        cache: Arc<dyn Cache>,
        hub: Arc<dyn EventHub>,
        timer: Arc<dyn Timer>,
        adjudicator: Arc<dyn Adjudicator>,
    ) -> Self {
        Self::with_strategy_resolver(log, cache, hub, timer, adjudicator, Arc::new(crate::bots::by_name))
    }

    /// Like [`Self::new`], but with a custom difficulty-name resolver —
    /// used by a server that wants `bot_difficulty = "engine"` to reach an
    /// engine-backed strategy instead of (or in addition to) the built-in
    /// tiers.
    pub fn with_strategy_resolver(
        log: Arc<dyn GameLog>,
        cache: Arc<dyn Cache>,
        hub: Arc<dyn EventHub>,
        timer: Arc<dyn Timer>,
        adjudicator: Arc<dyn Adjudicator>,
        strategy_resolver: StrategyResolver,
    ) -> Self {
        PhaseController { log, cache, hub, timer, adjudicator, strategy_resolver }
    }

    pub async fn create_game(&self, game: Game) -> Result<()> {
        self.log.create_game(game).await
    }

    pub async fn seat_player(&self, seat: Seat) -> Result<()> {
        self.log.seat_player(seat).await
    }

    /// Activates a waiting game: creates the spring-1901 movement phase,
    /// installs it in the cache, arms its deadline, and dispatches any
    /// bot seats' opening orders. Creator-only.
    #[instrument(skip(self))]
    pub async fn start_game(&self, game_id: GameId, requester: String) -> Result<()> {
        let game = self.log.get_game(game_id).await?;
        if game.creator != requester {
            return Err(Error::Authorization(format!("{requester} is not the creator of game {game_id}")));
        }
        if game.status != GameStatus::Waiting {
            return Err(Error::Validation(format!("game {game_id} is not waiting")));
        }
        let board = BoardState::standard_opening();
        let phase = Phase {
            id: PhaseId::new(),
            game: game_id,
            year: 1901,
            season: Season::Spring,
            phase_type: PhaseType::Movement,
            state_before: serde_json::to_value(&board).unwrap_or_default(),
            state_after: None,
            deadline: now_unix() + game.turn_duration.as_secs(),
            resolved_at: None,
        };
        self.log.activate(game_id, phase.clone()).await?;
        self.cache.install(phase.clone()).await;
        self.timer.arm(game_id, phase.id, Instant::now() + game.turn_duration).await;
        self.hub.publish(Event::new(game_id, EventKind::GameStarted)).await;
        self.dispatch_bot_orders(game_id, &phase, &board).await;
        self.maybe_resolve_on_readiness(game_id).await
    }

    pub async fn submit_orders(&self, game: GameId, phase: PhaseId, power: Power, orders: Vec<Order>) -> Result<()> {
        self.reject_if_eliminated(game, power).await?;
        self.cache.submit_orders(game, phase, power, orders).await?;
        self.maybe_resolve_on_readiness(game).await
    }

    pub async fn mark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.reject_if_eliminated(game, power).await?;
        self.cache.mark_ready(game, phase, power).await?;
        self.publish_readiness(game, power).await?;
        self.maybe_resolve_on_readiness(game).await
    }

    pub async fn unmark_ready(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.cache.unmark_ready(game, phase, power).await
    }

    pub async fn vote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.reject_if_eliminated(game, power).await?;
        self.cache.vote_draw(game, phase, power).await?;
        self.publish_draw_vote(game, power).await?;
        self.maybe_resolve_on_draw(game).await
    }

    pub async fn unvote_draw(&self, game: GameId, phase: PhaseId, power: Power) -> Result<()> {
        self.cache.unvote_draw(game, phase, power).await
    }

    /// Force-ends an active game with no winner, outside the normal
    /// solo-victory/year-cap/unanimous-draw paths (e.g. a table that
    /// agrees to abandon the game). Creator-only. Idempotent against a
    /// game that's already finished.
    pub async fn stop_game(&self, game: GameId, requester: String) -> Result<()> {
        let current = self.log.get_game(game).await?;
        if current.creator != requester {
            return Err(Error::Authorization(format!("{requester} is not the creator of game {game}")));
        }
        if current.status == GameStatus::Finished {
            return Ok(());
        }
        self.log.set_finished(game, None).await?;
        self.timer.cancel(game).await;
        self.cache.evict(game).await;
        self.hub.publish(Event::new(game, EventKind::GameEnded { winner: None })).await;
        self.hub.retire(game).await;
        Ok(())
    }

    async fn publish_readiness(&self, game: GameId, power: Power) -> Result<()> {
        let Some(set) = self.cache.get(game).await else { return Ok(()) };
        let surviving = self.surviving_powers(game).await?;
        self.hub
            .publish(Event::new(
                game,
                EventKind::PlayerReady { power, ready_count: set.ready.len(), total: surviving.len() },
            ))
            .await;
        Ok(())
    }

    async fn publish_draw_vote(&self, game: GameId, power: Power) -> Result<()> {
        let Some(set) = self.cache.get(game).await else { return Ok(()) };
        let surviving = self.surviving_powers(game).await?;
        self.hub
            .publish(Event::new(game, EventKind::DrawVote { power, votes: set.draw_votes.len(), surviving: surviving.len() }))
            .await;
        Ok(())
    }

    async fn seated_powers(&self, game: GameId) -> Result<Vec<Power>> {
        let seats = self.log.seats(game).await?;
        Ok(seats.iter().filter_map(|s| s.power).collect())
    }

    /// Seated powers with the current phase's board state applied, minus
    /// any already eliminated — an eliminated power neither counts toward
    /// nor can satisfy an all-ready/all-voted check.
    async fn surviving_powers(&self, game: GameId) -> Result<Vec<Power>> {
        let seated = self.seated_powers(game).await?;
        let Some(set) = self.cache.get(game).await else {
            return Ok(seated);
        };
        let board: BoardState = serde_json::from_value(set.phase.state_before.clone()).unwrap_or_default();
        Ok(seated.into_iter().filter(|p| !board.is_eliminated(*p)).collect())
    }

    /// Rejects an action from a power the current phase's board state
    /// already counts as eliminated. A game with no installed phase (not
    /// yet started, or already finished) has nothing to check against.
    async fn reject_if_eliminated(&self, game: GameId, power: Power) -> Result<()> {
        let Some(set) = self.cache.get(game).await else { return Ok(()) };
        let board: BoardState = serde_json::from_value(set.phase.state_before.clone()).unwrap_or_default();
        if board.is_eliminated(power) {
            return Err(Error::Validation(format!("{power} is eliminated and cannot act this phase")));
        }
        Ok(())
    }

    async fn is_fully_ready(&self, game: GameId) -> Result<bool> {
        let Some(set) = self.cache.get(game).await else {
            return Ok(false);
        };
        let seated = self.surviving_powers(game).await?;
        // An unseated game has nobody to wait on but also nobody ready to
        // act; treat it as not ready rather than vacuously true.
        Ok(!seated.is_empty() && set.all_ready(&seated))
    }

    /// Resolves the game's current phase if every seated power is now
    /// accounted for, then keeps resolving for as long as bot dispatch
    /// alone satisfies each freshly opened phase (an all-bot table runs
    /// to completion without any external trigger).
    async fn maybe_resolve_on_readiness(&self, game: GameId) -> Result<()> {
        while self.is_fully_ready(game).await? {
            self.resolve_phase(game).await?;
        }
        Ok(())
    }

    async fn maybe_resolve_on_draw(&self, game: GameId) -> Result<()> {
        let Some(set) = self.cache.get(game).await else {
            return Ok(());
        };
        let surviving = self.surviving_powers(game).await?;
        if !surviving.is_empty() && surviving.iter().all(|p| set.draw_votes.contains(p)) {
            self.log.set_finished(game, None).await?;
            self.timer.cancel(game).await;
            self.cache.evict(game).await;
            self.hub.retire(game).await;
            self.hub.publish(Event::new(game, EventKind::GameEnded { winner: None })).await;
        }
        Ok(())
    }

    /// Scans every cached game's deadline against `now` — the periodic
    /// sweep, an independent safety net alongside the precise per-phase
    /// timer wakeups.
    pub async fn sweep(&self) -> Result<()> {
        let now = now_unix();
        for (game, phase) in self.log.list_expired(now).await? {
            if let Err(err) = self.resolve_due_to_expiry(game, phase).await {
                warn!(%game, %phase, ?err, "sweep failed to resolve expired phase");
            }
        }
        Ok(())
    }

    async fn resolve_due_to_expiry(&self, game: GameId, phase: PhaseId) -> Result<()> {
        let current = self.log.current_phase(game).await?;
        if current.map(|p| p.id) != Some(phase) {
            return Ok(()); // already resolved by another trigger
        }
        self.resolve_phase(game).await?;
        self.maybe_resolve_on_readiness(game).await
    }

    /// Drives the timer's expiry channel in a loop, resolving phases as
    /// their deadline fires, falling back to [`Self::sweep`] on an
    /// interval. Intended to be spawned once at server startup.
    pub async fn run(self: Arc<Self>, mut expiry: tokio::sync::mpsc::UnboundedReceiver<crate::timer::Expiry>) {
        let mut sweep_interval = tokio::time::interval(crate::timer::TokioTimer::sweep_interval());
        loop {
            tokio::select! {
                Some(expiry) = expiry.recv() => {
                    if let Err(err) = self.resolve_due_to_expiry(expiry.game, expiry.phase).await {
                        warn!(game = %expiry.game, phase = %expiry.phase, ?err, "deadline-triggered resolution failed");
                    }
                }
                _ = sweep_interval.tick() => {
                    if let Err(err) = self.sweep().await {
                        warn!(?err, "periodic sweep failed");
                    }
                }
                else => break,
            }
        }
    }

    /// The transition algorithm itself.
    #[instrument(skip(self))]
    pub async fn resolve_phase(&self, game_id: GameId) -> Result<()> {
        let Some(set) = self.cache.get(game_id).await else {
            return Err(Error::NoCurrentPhase(game_id));
        };
        let game = self.log.get_game(game_id).await?;
        let seated = self.seated_powers(game_id).await?;
        let phase = set.phase.clone();

        let board: BoardState = serde_json::from_value(phase.state_before.clone())
            .map_err(|e| Error::Validation(format!("corrupt board state: {e}")))?;

        // Step 1-2: fill defaults for every seated power that never acted.
        let mut orders = Vec::new();
        for power in &seated {
            let submitted = set.orders.get(power).cloned().unwrap_or_default();
            orders.extend(fill_defaults(*power, &board, phase.phase_type, submitted));
        }

        // Step 3: adjudicate.
        let (state_after, resolved_orders, summary) = self.adjudicator.resolve(&board, &orders, phase.phase_type);

        // Step 4: determine the next phase, or end the game. The year cap
        // is checked against whichever phase would come next, not just a
        // resolving build, since a year with no build/disband imbalance
        // skips straight from fall to next year's spring.
        let winner = state_after.solo_victor();
        let (next_phase, finished_winner) = if winner.is_some() {
            (None, Some(winner))
        } else {
            let next = next_phase_for(&game, &phase, &state_after);
            if phase.year >= game.max_year && next.year > phase.year {
                (None, Some(None)) // reached the year cap with no solo: a draw among survivors
            } else {
                (Some(next), None)
            }
        };

        // Step 5: persist atomically. A transient storage error here gets a
        // few bounded retries before giving up — this step must not leave a
        // phase half-committed, so it's worth a short wait rather than
        // failing the whole resolution on one flaky write.
        let transition = Transition {
            resolved_phase: phase.id,
            resolved_orders: resolved_orders.clone(),
            state_after: serde_json::to_value(&state_after).unwrap_or_default(),
            next_phase: next_phase.clone(),
            winner: finished_winner,
        };
        crate::retry::with_retry(|| self.log.apply_transition(game_id, transition.clone())).await?;

        // Step 6: re-arm the timer (or cancel it if the game just ended).
        match &next_phase {
            Some(next) => self.timer.arm(game_id, next.id, Instant::now() + duration_for(&game, next.phase_type)).await,
            None => self.timer.cancel(game_id).await,
        }

        // Step 7: swap the cache's working set.
        match &next_phase {
            Some(next) => self.cache.install(next.clone()).await,
            None => self.cache.evict(game_id).await,
        }

        // Step 8: publish events. No collapsing: resolution and the phase
        // change it causes are always two events, even back-to-back.
        self.hub
            .publish(Event::new(
                game_id,
                EventKind::PhaseResolved {
                    phase_id: phase.id,
                    phase_type: phase.phase_type,
                    results_summary: serde_json::to_value(&summary).unwrap_or_default(),
                },
            ))
            .await;
        if let Some(next) = &next_phase {
            self.hub.publish(Event::new(game_id, EventKind::PhaseChanged { phase_id: next.id })).await;
        }
        if let Some(w) = finished_winner {
            self.hub.publish(Event::new(game_id, EventKind::GameEnded { winner: w })).await;
            self.hub.retire(game_id).await;
        }

        // Step 9: dispatch bot orders for whichever phase just opened.
        if let Some(next) = &next_phase {
            self.dispatch_bot_orders(game_id, next, &state_after).await;
        }

        info!(%game_id, phase = %phase.id, moved = summary.moved, bounced = summary.bounced, "phase resolved");
        Ok(())
    }

    /// Auto-submits orders for every bot seat immediately on a new phase,
    /// so a table of bots never waits out its own deadline.
    async fn dispatch_bot_orders(&self, game: GameId, phase: &Phase, board: &BoardState) {
        let Ok(seats) = self.log.seats(game).await else { return };
        for seat in seats {
            let (Some(power), true) = (seat.power, seat.is_bot) else { continue };
            let Some(difficulty) = &seat.bot_difficulty else { continue };
            let Some(strategy) = (self.strategy_resolver)(difficulty) else { continue };
            let orders = strategy.choose_orders(power, board, phase.phase_type, phase.year).await;
            if let Err(err) = self.cache.submit_orders(game, phase.id, power, orders).await {
                warn!(%game, %power, ?err, "bot order dispatch failed");
            }
        }
    }
}

fn duration_for(game: &Game, phase_type: PhaseType) -> std::time::Duration {
    match phase_type {
        PhaseType::Movement => game.turn_duration,
        PhaseType::Retreat => game.retreat_duration,
        PhaseType::Build => game.build_duration,
    }
}

/// Builds the successive phase after `resolved`, per the standard
/// movement -> retreat (if any dislodgements) -> movement -> ... -> build
/// (after fall movement, if any power owes a build or disband) cadence.
/// Empty retreat/build phases are skipped outright rather than opened and
/// immediately auto-resolved.
fn next_phase_for(game: &Game, resolved: &Phase, state_after: &BoardState) -> Phase {
    let (year, season, phase_type) = match resolved.phase_type {
        PhaseType::Movement if !state_after.dislodged.is_empty() => (resolved.year, resolved.season, PhaseType::Retreat),
        PhaseType::Movement | PhaseType::Retreat if resolved.season == Season::Fall => {
            if Power::ALL.into_iter().any(|p| state_after.adjustment(p) != 0) {
                (resolved.year, resolved.season, PhaseType::Build)
            } else {
                (resolved.year + 1, Season::Spring, PhaseType::Movement)
            }
        }
        PhaseType::Movement | PhaseType::Retreat => (resolved.year, Season::Fall, PhaseType::Movement),
        PhaseType::Build => (resolved.year + 1, Season::Spring, PhaseType::Movement),
    };
    Phase {
        id: PhaseId::new(),
        game: resolved.game,
        year,
        season,
        phase_type,
        state_before: serde_json::to_value(state_after).unwrap_or_default(),
        state_after: None,
        deadline: now_unix() + duration_for(game, phase_type).as_secs(),
        resolved_at: None,
    }
}

/// Phase-type defaults for every unit/power that never submitted an
/// order: movement holds in place, retreats
/// disband, and builds waive. A negative build adjustment (disbands
/// owed) that the power didn't fully cover is completed here in a stable
/// order — sorted by province code — rather than left to the adjudicator
/// to guess at.
fn fill_defaults(power: Power, board: &BoardState, phase_type: PhaseType, submitted: Vec<Order>) -> Vec<Order> {
    match phase_type {
        PhaseType::Movement => {
            let ordered: HashMap<&str, ()> = submitted.iter().map(|o| (o.location.as_str(), ())).collect();
            let mut orders = submitted;
            for (loc, unit) in board.units_of(power) {
                if !ordered.contains_key(loc.as_str()) {
                    orders.push(Order::hold(power, unit.unit_type, loc.clone()));
                }
            }
            orders
        }
        PhaseType::Retreat => {
            let ordered: HashMap<&str, ()> = submitted.iter().map(|o| (o.location.as_str(), ())).collect();
            let mut orders = submitted;
            for (loc, unit) in board.dislodged_of(power) {
                if !ordered.contains_key(loc.as_str()) {
                    orders.push(Order::disband(power, unit.unit_type, loc.clone()));
                }
            }
            orders
        }
        PhaseType::Build => {
            let adjustment = board.adjustment(power);
            let mut orders = submitted;
            if adjustment > 0 {
                let used = orders.iter().filter(|o| o.order_type == OrderType::Build).count() as i32;
                for _ in used..adjustment {
                    orders.push(Order::waive(power));
                }
            } else if adjustment < 0 {
                let already_disbanding: std::collections::HashSet<&str> = orders
                    .iter()
                    .filter(|o| o.order_type == OrderType::RetreatDisband)
                    .map(|o| o.location.as_str())
                    .collect();
                let still_owed = (-adjustment) as usize - already_disbanding.len().min((-adjustment) as usize);
                let mut candidates: Vec<&String> =
                    board.units_of(power).map(|(loc, _)| loc).filter(|loc| !already_disbanding.contains(loc.as_str())).collect();
                candidates.sort();
                for loc in candidates.into_iter().take(still_owed) {
                    let unit_type = board.units[loc].unit_type;
                    orders.push(Order::disband(power, unit_type, loc.clone()));
                }
            }
            orders
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudicate::ReferenceAdjudicator;
    use crate::cache::InMemoryCache;
    use crate::hub::BroadcastHub;
    use crate::log::InMemoryLog;
    use crate::timer::TokioTimer;
    use diplomacy_protocol::{GameStatus, PowerAssignmentMode};
    use std::time::Duration;

    fn controller() -> (Arc<PhaseController>, Arc<InMemoryLog>) {
        let log = Arc::new(InMemoryLog::new());
        let cache = Arc::new(InMemoryCache::new());
        let hub = Arc::new(BroadcastHub::new());
        let (timer, _rx) = TokioTimer::new();
        let adjudicator = Arc::new(ReferenceAdjudicator);
        (
            Arc::new(PhaseController::new(log.clone(), cache, hub, Arc::new(timer), adjudicator)),
            log,
        )
    }

    fn sample_game() -> Game {
        Game {
            id: GameId::new(),
            name: "t".into(),
            creator: "alice".into(),
            status: GameStatus::Waiting,
            winner: None,
            turn_duration: Duration::from_secs(86400),
            retreat_duration: Duration::from_secs(3600),
            build_duration: Duration::from_secs(3600),
            power_assignment_mode: PowerAssignmentMode::Manual,
            max_year: 1920,
        }
    }

    #[tokio::test]
    async fn starting_a_game_installs_spring_1901_movement() {
        let (controller, log) = controller();
        let game = sample_game();
        let gid = game.id;
        controller.create_game(game).await.unwrap();
        controller.start_game(gid, "alice".to_string()).await.unwrap();

        let phase = log.current_phase(gid).await.unwrap().unwrap();
        assert_eq!(phase.year, 1901);
        assert_eq!(phase.season, Season::Spring);
        assert_eq!(phase.phase_type, PhaseType::Movement);
    }

    #[tokio::test]
    async fn all_ready_triggers_resolution_and_advances_to_fall() {
        let (controller, log) = controller();
        let mut game = sample_game();
        game.id = GameId::new();
        let gid = game.id;
        controller.create_game(game).await.unwrap();
        for power in Power::ALL {
            controller
                .seat_player(Seat { game: gid, user: power.name().to_string(), power: Some(power), is_bot: false, bot_difficulty: None })
                .await
                .unwrap();
        }
        controller.start_game(gid, "alice".to_string()).await.unwrap();
        let phase = log.current_phase(gid).await.unwrap().unwrap();

        for power in Power::ALL {
            controller.mark_ready(gid, phase.id, power).await.unwrap();
        }

        let next = log.current_phase(gid).await.unwrap().unwrap();
        assert_ne!(next.id, phase.id);
        assert_eq!(next.season, Season::Fall);
        assert_eq!(next.phase_type, PhaseType::Movement);
    }

    #[tokio::test]
    async fn unanimous_draw_vote_finishes_the_game_without_a_winner() {
        let (controller, log) = controller();
        let mut game = sample_game();
        game.id = GameId::new();
        let gid = game.id;
        controller.create_game(game).await.unwrap();
        for power in Power::ALL {
            controller
                .seat_player(Seat { game: gid, user: power.name().to_string(), power: Some(power), is_bot: false, bot_difficulty: None })
                .await
                .unwrap();
        }
        controller.start_game(gid, "alice".to_string()).await.unwrap();
        let phase = log.current_phase(gid).await.unwrap().unwrap();

        for power in Power::ALL {
            controller.vote_draw(gid, phase.id, power).await.unwrap();
        }

        let game_after = log.get_game(gid).await.unwrap();
        assert_eq!(game_after.status, GameStatus::Finished);
        assert_eq!(game_after.winner, None);
    }

    #[tokio::test]
    async fn stopping_a_game_twice_is_idempotent() {
        let (controller, log) = controller();
        let game = sample_game();
        let gid = game.id;
        controller.create_game(game).await.unwrap();
        controller.start_game(gid, "alice".to_string()).await.unwrap();

        controller.stop_game(gid, "alice".to_string()).await.unwrap();
        controller.stop_game(gid, "alice".to_string()).await.unwrap();

        let game_after = log.get_game(gid).await.unwrap();
        assert_eq!(game_after.status, GameStatus::Finished);
        assert_eq!(game_after.winner, None);
    }

    #[tokio::test]
    async fn non_creator_cannot_start_or_stop_a_game() {
        let (controller, _log) = controller();
        let game = sample_game();
        let gid = game.id;
        controller.create_game(game).await.unwrap();

        let start_err = controller.start_game(gid, "mallory".to_string()).await.unwrap_err();
        assert!(matches!(start_err, Error::Authorization(_)));

        controller.start_game(gid, "alice".to_string()).await.unwrap();
        let stop_err = controller.stop_game(gid, "mallory".to_string()).await.unwrap_err();
        assert!(matches!(stop_err, Error::Authorization(_)));
    }
}
