//! The timer substrate (C3): arms a precise wakeup for each phase's
//! deadline and emits it on a channel the controller (C7) drains.
//! A coarse periodic sweep is kept as a safety net — see
//! [`Timer::sweep_interval`] — since a process restart loses every armed
//! wakeup (recovery, C8, re-arms from the log on startup).

use diplomacy_protocol::{GameId, PhaseId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{Duration, Instant};
use tracing::{debug, trace};

/// One phase's deadline having elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub game: GameId,
    pub phase: PhaseId,
}

/// The timer contract. `arm` replaces any existing
/// wakeup for the game (a resolved phase's successor re-arms with a new
/// deadline); `cancel` is used when a game finishes early (all-ready or a
/// carried draw).
#[async_trait::async_trait]
pub trait Timer: Send + Sync {
    async fn arm(&self, game: GameId, phase: PhaseId, deadline: Instant);
    async fn cancel(&self, game: GameId);
}

struct Armed {
    phase: PhaseId,
    deadline: Instant,
    generation: u64,
}

/// A [`Timer`] backed by one `tokio::spawn`ed task per armed deadline,
/// plus a channel the controller drains for [`Expiry`] notifications.
pub struct TokioTimer {
    armed: Arc<Mutex<HashMap<GameId, Armed>>>,
    tx: mpsc::UnboundedSender<Expiry>,
}

impl TokioTimer {
    /// Builds a timer and the receiver the controller should drain in its
    /// select loop.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { armed: Arc::new(Mutex::new(HashMap::new())), tx }, rx)
    }

    /// How often [`crate::controller::PhaseController`] should fall back
    /// to scanning the log for expired phases, independent of any armed
    /// wakeup (the controller's "periodic sweep" trigger).
    pub fn sweep_interval() -> Duration {
        Duration::from_secs(30)
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new().0
    }
}

#[async_trait::async_trait]
impl Timer for TokioTimer {
    async fn arm(&self, game: GameId, phase: PhaseId, deadline: Instant) {
        let generation = {
            let mut armed = self.armed.lock().await;
            let generation = armed.get(&game).map_or(0, |a| a.generation + 1);
            armed.insert(game, Armed { phase, deadline, generation });
            generation
        };
        trace!(%game, %phase, generation, "armed deadline");

        let armed = Arc::clone(&self.armed);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut guard = armed.lock().await;
            let Some(current) = guard.get(&game) else { return };
            // Only fire if nothing re-armed or cancelled this game since.
            if current.generation != generation {
                return;
            }
            guard.remove(&game);
            drop(guard);
            debug!(%game, %phase, "deadline elapsed");
            let _ = tx.send(Expiry { game, phase });
        });
    }

    async fn cancel(&self, game: GameId) {
        self.armed.lock().await.remove(&game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_exactly_once_at_deadline() {
        let (timer, mut rx) = TokioTimer::new();
        let game = GameId::new();
        let phase = PhaseId::new();
        let deadline = Instant::now() + Duration::from_secs(10);
        timer.arm(game, phase, deadline).await;

        tokio::time::advance(Duration::from_secs(11)).await;
        let expiry = rx.recv().await.unwrap();
        assert_eq!(expiry, Expiry { game, phase });
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_the_earlier_wakeup() {
        let (timer, mut rx) = TokioTimer::new();
        let game = GameId::new();
        let first_phase = PhaseId::new();
        let second_phase = PhaseId::new();

        timer.arm(game, first_phase, Instant::now() + Duration::from_secs(5)).await;
        timer.arm(game, second_phase, Instant::now() + Duration::from_secs(20)).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        // The first wakeup fired its sleep but must see a stale generation and stay silent.
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(20)).await;
        let expiry = rx.recv().await.unwrap();
        assert_eq!(expiry.phase, second_phase);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_the_wakeup() {
        let (timer, mut rx) = TokioTimer::new();
        let game = GameId::new();
        let phase = PhaseId::new();
        timer.arm(game, phase, Instant::now() + Duration::from_secs(5)).await;
        timer.cancel(game).await;

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(rx.try_recv().is_err());
    }
}
