//! Domain and wire data model shared by every crate in the workspace.
//!
//! This crate owns no behavior — it is the vocabulary the durable log (C1),
//! the working-set cache (C2), the phase controller (C7), and the server's
//! JSON/WebSocket surface all speak. Types here are deliberately dumb:
//! plain structs and enums with explicit `serde` contracts (tagged enums
//! everywhere two shapes could otherwise be confused on the wire), never
//! field ordering or implicit coercion.

mod event;
mod game;
mod message;
mod order;
mod phase;
mod power;

pub use event::{Event, EventKind};
pub use game::{Game, GameId, GameStatus, PowerAssignmentMode, Seat};
pub use message::Message;
pub use order::{Order, OrderResult, OrderType, UnitType};
pub use phase::{Phase, PhaseId, PhaseType, Season};
pub use power::Power;
