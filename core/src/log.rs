//! The durable log (C1): an append-only record of games, phases, orders,
//! and player assignments.

use crate::error::{Error, Result};
use async_trait::async_trait;
use diplomacy_protocol::{Game, GameId, GameStatus, Message, Order, Phase, PhaseId, Power, Seat};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The set of durable mutations one resolved transition makes, applied
/// atomically by [`GameLog::apply_transition`] (the transaction boundary
/// around `save_orders + resolve_phase + create_phase`).
#[derive(Clone)]
pub struct Transition {
    pub resolved_phase: PhaseId,
    pub resolved_orders: Vec<Order>,
    pub state_after: Value,
    /// `Some` unless the game just finished.
    pub next_phase: Option<Phase>,
    /// `Some` if this transition ends the game.
    pub winner: Option<Option<Power>>,
}

/// The durable-log contract. Point-in-time consistent
/// per game: a reader never observes a resolved phase without either a
/// successor phase or a finished game (see [`GameLog::apply_transition`]).
#[async_trait]
pub trait GameLog: Send + Sync {
    async fn create_game(&self, game: Game) -> Result<()>;
    async fn seat_player(&self, seat: Seat) -> Result<()>;
    async fn reassign_power(&self, game: GameId, user: &str, power: Power) -> Result<()>;
    async fn seats(&self, game: GameId) -> Result<Vec<Seat>>;
    async fn get_game(&self, game: GameId) -> Result<Game>;

    /// Transitions `waiting -> active`, creating the spring-1901 movement
    /// phase with the given deadline.
    async fn activate(&self, game: GameId, first_phase: Phase) -> Result<()>;

    /// Creates a brand-new current phase for a game, returning its id.
    async fn create_phase(&self, phase: Phase) -> Result<PhaseId>;

    /// Saves orders for a phase ahead of resolution (used for audit even
    /// when a transition later fails before the transition commits).
    async fn save_orders(&self, phase: PhaseId, orders: &[Order]) -> Result<()>;

    /// Applies the whole durable side of one phase transition atomically:
    /// persists the resolved orders, marks `resolved_phase` resolved with
    /// `state_after`, and creates `next_phase` (or finishes the game) in
    /// one indivisible step. Idempotent: if `resolved_phase` is already
    /// resolved, this is a no-op.
    async fn apply_transition(&self, game: GameId, transition: Transition) -> Result<()>;

    /// The orders on record for a phase: the default-filled final set if
    /// it has resolved, otherwise whatever was last passed to
    /// [`GameLog::save_orders`]. Empty if nothing has been saved yet.
    async fn orders_for_phase(&self, phase: PhaseId) -> Result<Vec<Order>>;

    async fn set_finished(&self, game: GameId, winner: Option<Power>) -> Result<()>;

    /// The unique unresolved phase for a game, if it is active.
    async fn current_phase(&self, game: GameId) -> Result<Option<Phase>>;

    /// The latest unresolved phase per active game whose deadline is in
    /// the past (older unresolved phases for the same game are ignored
    /// here).
    async fn list_expired(&self, now: u64) -> Result<Vec<(GameId, PhaseId)>>;

    async fn post_message(&self, message: Message) -> Result<()>;
    async fn list_messages(&self, game: GameId, phase: PhaseId) -> Result<Vec<Message>>;

    /// Every game with `status = active`, for recovery (C8).
    async fn active_games(&self) -> Result<Vec<GameId>>;
}

#[derive(Default)]
struct GameRecord {
    game: Game,
    seats: Vec<Seat>,
    phases: Vec<Phase>,
    messages: Vec<Message>,
    orders: HashMap<PhaseId, Vec<Order>>,
}

/// An in-memory [`GameLog`], used by the server's default profile and by
/// every test in this crate. A `sqlx`-backed implementation is a drop-in
/// replacement — see DESIGN.md.
#[derive(Default)]
pub struct InMemoryLog {
    games: RwLock<HashMap<GameId, GameRecord>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameLog for InMemoryLog {
    async fn create_game(&self, game: Game) -> Result<()> {
        let mut games = self.games.write().await;
        games.insert(
            game.id,
            GameRecord { game, seats: Vec::new(), phases: Vec::new(), messages: Vec::new(), orders: HashMap::new() },
        );
        Ok(())
    }

    async fn seat_player(&self, seat: Seat) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&seat.game).ok_or(Error::NoSuchGame(seat.game))?;
        record.seats.retain(|s| s.user != seat.user);
        record.seats.push(seat);
        Ok(())
    }

    async fn reassign_power(&self, game: GameId, user: &str, power: Power) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&game).ok_or(Error::NoSuchGame(game))?;
        let seat = record
            .seats
            .iter_mut()
            .find(|s| s.user == user)
            .ok_or_else(|| Error::Validation(format!("no such seat for {user}")))?;
        seat.power = Some(power);
        Ok(())
    }

    async fn seats(&self, game: GameId) -> Result<Vec<Seat>> {
        let games = self.games.read().await;
        let record = games.get(&game).ok_or(Error::NoSuchGame(game))?;
        Ok(record.seats.clone())
    }

    async fn get_game(&self, game: GameId) -> Result<Game> {
        let games = self.games.read().await;
        games.get(&game).map(|r| r.game.clone()).ok_or(Error::NoSuchGame(game))
    }

    async fn activate(&self, game: GameId, first_phase: Phase) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&game).ok_or(Error::NoSuchGame(game))?;
        record.game.status = GameStatus::Active;
        record.phases.push(first_phase);
        Ok(())
    }

    async fn create_phase(&self, phase: Phase) -> Result<PhaseId> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&phase.game).ok_or(Error::NoSuchGame(phase.game))?;
        let id = phase.id;
        record.phases.push(phase);
        Ok(id)
    }

    async fn save_orders(&self, phase: PhaseId, orders: &[Order]) -> Result<()> {
        let mut games = self.games.write().await;
        for record in games.values_mut() {
            if record.phases.iter().any(|p| p.id == phase) {
                record.orders.insert(phase, orders.to_vec());
                return Ok(());
            }
        }
        Err(Error::Validation(format!("no such phase {phase}")))
    }

    async fn apply_transition(&self, game: GameId, transition: Transition) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&game).ok_or(Error::NoSuchGame(game))?;

        let Some(resolved) = record.phases.iter_mut().find(|p| p.id == transition.resolved_phase)
        else {
            return Err(Error::Validation(format!("no such phase {}", transition.resolved_phase)));
        };
        if resolved.is_resolved() {
            // Idempotency boundary: a duplicate trigger observes this and returns.
            return Ok(());
        }
        resolved.state_after = Some(transition.state_after);
        resolved.resolved_at = Some(diplomacy_protocol::now_unix());
        record.orders.insert(transition.resolved_phase, transition.resolved_orders);

        if let Some(next_phase) = transition.next_phase {
            record.phases.push(next_phase);
        }
        if let Some(winner) = transition.winner {
            record.game.status = GameStatus::Finished;
            record.game.winner = winner;
        }
        Ok(())
    }

    async fn orders_for_phase(&self, phase: PhaseId) -> Result<Vec<Order>> {
        let games = self.games.read().await;
        for record in games.values() {
            if record.phases.iter().any(|p| p.id == phase) {
                return Ok(record.orders.get(&phase).cloned().unwrap_or_default());
            }
        }
        Err(Error::Validation(format!("no such phase {phase}")))
    }

    async fn set_finished(&self, game: GameId, winner: Option<Power>) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&game).ok_or(Error::NoSuchGame(game))?;
        record.game.status = GameStatus::Finished;
        record.game.winner = winner;
        Ok(())
    }

    async fn current_phase(&self, game: GameId) -> Result<Option<Phase>> {
        let games = self.games.read().await;
        let record = games.get(&game).ok_or(Error::NoSuchGame(game))?;
        Ok(record.phases.iter().rev().find(|p| !p.is_resolved()).cloned())
    }

    async fn list_expired(&self, now: u64) -> Result<Vec<(GameId, PhaseId)>> {
        let games = self.games.read().await;
        let mut expired = Vec::new();
        for record in games.values() {
            if record.game.status != GameStatus::Active {
                continue;
            }
            if let Some(current) = record.phases.iter().rev().find(|p| !p.is_resolved()) {
                if current.deadline <= now {
                    expired.push((record.game.id, current.id));
                }
            }
        }
        Ok(expired)
    }

    async fn post_message(&self, message: Message) -> Result<()> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&message.game).ok_or(Error::NoSuchGame(message.game))?;
        record.messages.push(message);
        Ok(())
    }

    async fn list_messages(&self, game: GameId, phase: PhaseId) -> Result<Vec<Message>> {
        let games = self.games.read().await;
        let record = games.get(&game).ok_or(Error::NoSuchGame(game))?;
        Ok(record.messages.iter().filter(|m| m.phase == phase).cloned().collect())
    }

    async fn active_games(&self) -> Result<Vec<GameId>> {
        let games = self.games.read().await;
        Ok(games
            .values()
            .filter(|r| r.game.status == GameStatus::Active)
            .map(|r| r.game.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diplomacy_protocol::{PhaseType, Season};
    use std::time::Duration;

    fn sample_game() -> Game {
        Game {
            id: GameId::new(),
            name: "test".into(),
            creator: "alice".into(),
            status: GameStatus::Waiting,
            winner: None,
            turn_duration: Duration::from_secs(86400),
            retreat_duration: Duration::from_secs(3600),
            build_duration: Duration::from_secs(3600),
            power_assignment_mode: diplomacy_protocol::PowerAssignmentMode::Random,
            max_year: 1920,
        }
    }

    fn sample_phase(game: GameId) -> Phase {
        Phase {
            id: PhaseId::new(),
            game,
            year: 1901,
            season: Season::Spring,
            phase_type: PhaseType::Movement,
            state_before: serde_json::json!({}),
            state_after: None,
            deadline: 0,
            resolved_at: None,
        }
    }

    #[tokio::test]
    async fn current_phase_is_the_unique_unresolved_one() {
        let log = InMemoryLog::new();
        let game = sample_game();
        let gid = game.id;
        log.create_game(game).await.unwrap();
        let phase = sample_phase(gid);
        let pid = phase.id;
        log.activate(gid, phase).await.unwrap();

        let current = log.current_phase(gid).await.unwrap().unwrap();
        assert_eq!(current.id, pid);
        assert!(!current.is_resolved());
    }

    #[tokio::test]
    async fn apply_transition_is_idempotent() {
        let log = InMemoryLog::new();
        let game = sample_game();
        let gid = game.id;
        log.create_game(game).await.unwrap();
        let phase = sample_phase(gid);
        let pid = phase.id;
        log.activate(gid, phase).await.unwrap();

        let next = sample_phase(gid);
        let next_id = next.id;
        let transition = Transition {
            resolved_phase: pid,
            resolved_orders: vec![],
            state_after: serde_json::json!({"done": true}),
            next_phase: Some(next),
            winner: None,
        };
        log.apply_transition(gid, transition).await.unwrap();

        let current = log.current_phase(gid).await.unwrap().unwrap();
        assert_eq!(current.id, next_id);

        // A duplicate trigger replays the same transition and must be a no-op.
        let duplicate = Transition {
            resolved_phase: pid,
            resolved_orders: vec![],
            state_after: serde_json::json!({"done": true}),
            next_phase: Some(sample_phase(gid)),
            winner: None,
        };
        log.apply_transition(gid, duplicate).await.unwrap();
        let current_after = log.current_phase(gid).await.unwrap().unwrap();
        assert_eq!(current_after.id, next_id, "duplicate transition must not create a second successor");
    }

    #[tokio::test]
    async fn list_expired_only_returns_active_games_past_deadline() {
        let log = InMemoryLog::new();
        let mut game = sample_game();
        game.status = GameStatus::Waiting;
        let gid = game.id;
        log.create_game(game).await.unwrap();
        let mut phase = sample_phase(gid);
        phase.deadline = 100;
        log.activate(gid, phase).await.unwrap();

        // Still "waiting" in our local copy of game.status -- GameLog::activate flips it to active.
        let expired = log.list_expired(200).await.unwrap();
        assert_eq!(expired, vec![(gid, log.current_phase(gid).await.unwrap().unwrap().id)]);

        let not_yet = log.list_expired(50).await.unwrap();
        assert!(not_yet.is_empty());
    }
}
