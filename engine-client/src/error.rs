use thiserror::Error;

/// Errors owned by the engine-client boundary: engine
/// crash/timeout is this crate's concern, not the phase-lifecycle core's.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn engine process: {0}")]
    Spawn(String),

    #[error("engine I/O error: {0}")]
    Io(String),

    #[error("engine protocol violation: {0}")]
    Protocol(String),

    #[error("engine did not respond in time")]
    Timeout,

    #[error("engine returned an unparseable order list: {0}")]
    BadOrders(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
