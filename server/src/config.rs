//! Server configuration, read from environment variables rather than the
//! teacher's `GameConfig.json` hot-reload file — this service has no
//! per-deployment game roster to reload, just a handful of knobs that are
//! fixed for a process's lifetime.

use std::time::Duration;

/// All the tunables this binary needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub max_year: u16,
    pub turn_duration: Duration,
    pub retreat_duration: Duration,
    pub build_duration: Duration,
    pub sweep_interval: Duration,
    /// Path to an engine binary implementing the DUI protocol. `None`
    /// leaves `bot_difficulty = "engine"` seats unresolvable, which the
    /// controller's dispatch loop simply skips.
    pub engine_binary: Option<String>,
    pub engine_pool_capacity: usize,
}

impl Config {
    /// Reads every setting from its environment variable, falling back to
    /// a sensible default for a local/dev run.
    pub fn from_env() -> Self {
        Config {
            bind_addr: env_string("DIPLOMACY_BIND_ADDR", "127.0.0.1:8080"),
            max_year: env_parse("DIPLOMACY_MAX_YEAR", 1920),
            turn_duration: Duration::from_secs(env_parse("DIPLOMACY_TURN_SECS", 86_400)),
            retreat_duration: Duration::from_secs(env_parse("DIPLOMACY_RETREAT_SECS", 3_600)),
            build_duration: Duration::from_secs(env_parse("DIPLOMACY_BUILD_SECS", 3_600)),
            sweep_interval: Duration::from_secs(env_parse("DIPLOMACY_SWEEP_SECS", 30)),
            engine_binary: std::env::var("DIPLOMACY_ENGINE_BINARY").ok(),
            engine_pool_capacity: env_parse("DIPLOMACY_ENGINE_POOL_CAPACITY", 2),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        // Reads whatever the process environment happens to have; assert
        // only on the shape, not exact values, since tests may run
        // alongside others that do set these variables.
        let config = Config::from_env();
        assert!(config.sweep_interval.as_secs() > 0);
        assert!(config.engine_pool_capacity > 0);
    }
}
