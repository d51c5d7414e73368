use diplomacy_protocol::GameId;
use thiserror::Error;

/// The error taxonomy for the phase-lifecycle core, covering these
/// kinds: transient I/O, engine crash/timeout (owned by `diplomacy-engine-client`),
/// protocol violation, validation, authorization, and fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// A cache or log operation timed out or hit a transient backend error.
    /// Policy: retry within a bounded budget, then log and defer — the
    /// periodic sweep will retry. Never surfaced mid-transition.
    #[error("transient I/O error in {component}: {message}")]
    Transient { component: &'static str, message: String },

    /// A durable-log operation failed in a way that must not be retried
    /// silently (e.g. the store is unreachable). The transition that hit
    /// this must leave the phase current — the next trigger retries.
    #[error("durable log unavailable for game {game}: {message}")]
    LogUnavailable { game: GameId, message: String },

    /// Rejected at ingress: illegal order, wrong phase, non-seat power.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Rejected at ingress: caller is not authorized for the operation.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// The referenced game does not exist.
    #[error("no such game: {0}")]
    NoSuchGame(GameId),

    /// The referenced game has no current (unresolved) phase — it is not
    /// active, or it just finished.
    #[error("game {0} has no current phase")]
    NoCurrentPhase(GameId),
}

pub type Result<T> = std::result::Result<T, Error>;
