//! The engine-client boundary (C5): drives an external
//! engine subprocess over the DUI line protocol and adapts it to
//! [`diplomacy_core::bots::Strategy`] so the phase controller never needs
//! to know whether a seat's orders came from a built-in tier or a real
//! engine.

pub mod dui;
pub mod error;
pub mod pool;
pub mod process;
pub mod strategy;

pub use error::{EngineError, Result};
pub use pool::{EnginePool, EngineSpec};
pub use process::{EngineProcess, ProcessState};
pub use strategy::EngineBackedStrategy;
