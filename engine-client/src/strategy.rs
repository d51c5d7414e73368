//! Adapts a running engine subprocess into a [`diplomacy_core::bots::Strategy`],
//! so the phase controller's bot-dispatch path can treat
//! an external engine exactly like `HardStrategy` — same trait, same call
//! site, no special-casing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use diplomacy_core::adjudicate::BoardState;
use diplomacy_core::bots::Strategy;
use diplomacy_protocol::{Order, PhaseType, Power, Season};
use tokio::sync::Mutex;
use tracing::warn;

use crate::dui::command::GoParams;
use crate::dui::{dfen, dson, Command};
use crate::process::EngineProcess;

/// Wraps one [`EngineProcess`] as a bot strategy. Calls are serialized
/// through an internal lock — `position`/`setpower`/`go` is a sequence the
/// engine expects uninterrupted, and a given process only ever plays one
/// seat at a time in practice, but nothing stops two games from sharing a
/// pooled process concurrently without this.
pub struct EngineBackedStrategy {
    process: Arc<EngineProcess>,
    movetime: Duration,
    fallback: Box<dyn Strategy>,
    sequence: Mutex<()>,
}

impl EngineBackedStrategy {
    pub fn new(process: Arc<EngineProcess>, movetime: Duration, fallback: Box<dyn Strategy>) -> Self {
        EngineBackedStrategy { process, movetime, fallback, sequence: Mutex::new(()) }
    }

    async fn try_engine_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, year: u16) -> crate::error::Result<Vec<Order>> {
        let _guard = self.sequence.lock().await;
        // The season isn't visible at this seam (the calendar `BoardState`
        // exposes stops at the year); Spring is a stable placeholder the
        // engine only uses to label its own log output.
        let dfen_line = dfen::encode_dfen(board, year, Season::Spring, phase_type);
        self.process.send(Command::Position { dfen: dfen_line }).await?;
        self.process.send(Command::SetPower { power }).await?;
        let go = Command::Go(GoParams { movetime_ms: Some(self.movetime.as_millis() as u64), depth: None });
        let reply = self.process.go(go, self.movetime + Duration::from_secs(2)).await?;
        dson::parse_orders(&reply, power).map_err(|e| crate::error::EngineError::BadOrders(e.to_string()))
    }
}

#[async_trait]
impl Strategy for EngineBackedStrategy {
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, year: u16) -> Vec<Order> {
        match self.try_engine_orders(power, board, phase_type, year).await {
            Ok(orders) if !orders.is_empty() || board.units_of(power).next().is_none() => orders,
            Ok(_) => {
                warn!(%power, "engine returned an empty order list for a power with units, falling back");
                self.fallback.choose_orders(power, board, phase_type, year).await
            }
            Err(error) => {
                warn!(%power, %error, "engine call failed, falling back to reference strategy");
                self.fallback.choose_orders(power, board, phase_type, year).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "engine"
    }
}

// Exercised end-to-end in tests/mock_engine.rs against the fixture binary —
// constructing a real engine process needs a subprocess, which a unit test
// here can't provide.
