//! The phase-lifecycle core: the durable log (C1), working-set cache
//! (C2), timer substrate (C3), event hub (C4), bot strategies (C6), the
//! phase controller (C7), and crash recovery (C8) that together drive a
//! Diplomacy game from `waiting` through to `finished`.
//!
//! The adjudicator (`resolve(state, orders, phase_type) -> state'`) is
//! treated as an external collaborator this crate depends on through the
//! [`adjudicate::Adjudicator`] trait; [`adjudicate::ReferenceAdjudicator`]
//! is a reduced-rule-set implementation good enough to exercise every
//! scenario this crate itself is responsible for.

pub mod adjudicate;
pub mod bots;
pub mod cache;
pub mod controller;
pub mod error;
pub mod hub;
pub mod log;
pub mod recovery;
mod retry;
pub mod timer;

pub use adjudicate::{Adjudicator, BoardState, ReferenceAdjudicator};
pub use cache::{Cache, InMemoryCache, WorkingSet};
pub use controller::PhaseController;
pub use error::{Error, Result};
pub use hub::{BroadcastHub, EventHub};
pub use log::{GameLog, InMemoryLog, Transition};
pub use timer::{Expiry, Timer, TokioTimer};
