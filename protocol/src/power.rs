use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven permanent factions. Fixed by the rules of the game;
/// the exact map topology those powers play on is not modeled here —
/// only the identity of the power matters to the phase-lifecycle core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

impl Power {
    /// All seven powers, in the canonical order used for deterministic
    /// iteration (e.g. stable tie-breaks, permutation assignment).
    pub const ALL: [Power; 7] = [
        Power::Austria,
        Power::England,
        Power::France,
        Power::Germany,
        Power::Italy,
        Power::Russia,
        Power::Turkey,
    ];

    /// Parses a power from its lowercase name, as used on the DUI wire
    /// protocol's `setpower` command.
    pub fn from_name(name: &str) -> Option<Power> {
        Power::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The lowercase name used on the wire and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Power::Austria => "austria",
            Power::England => "england",
            Power::France => "france",
            Power::Germany => "germany",
            Power::Italy => "italy",
            Power::Russia => "russia",
            Power::Turkey => "turkey",
        }
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_power_name() {
        for power in Power::ALL {
            assert_eq!(Power::from_name(power.name()), Some(power));
        }
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(Power::from_name("narnia"), None);
    }
}
