use crate::power::Power;
use serde::{Deserialize, Serialize};

/// The two unit types a power can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

/// The kind of order an [`Order`] carries. Mirrors the DSON grammar
/// one-to-one so engine output translates without a lossy
/// intermediate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Hold,
    Move,
    Support,
    Convoy,
    RetreatMove,
    RetreatDisband,
    Build,
    Waive,
}

/// The outcome of an order after adjudication. `None` before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderResult {
    Succeeded,
    Bounced,
    Dislodged,
    Failed,
    Invalid,
}

/// A single order: `location` is the province
/// the ordered unit currently occupies; `target`/`aux_loc`/`aux_target` are
/// populated according to `order_type` (a move's destination, a support's
/// supported unit and its destination, a convoy's endpoints). Locations are
/// opaque province identifiers — the 75-province adjacency table itself is
/// an external collaborator this crate does not model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub power: Power,
    pub unit_type: UnitType,
    pub location: String,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aux_loc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aux_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aux_unit_type: Option<UnitType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<OrderResult>,
}

impl Order {
    /// Builds a hold order for `power`'s unit at `location` — the
    /// phase-type default used whenever a power has no pending orders.
    pub fn hold(power: Power, unit_type: UnitType, location: impl Into<String>) -> Self {
        Order {
            power,
            unit_type,
            location: location.into(),
            order_type: OrderType::Hold,
            target: None,
            aux_loc: None,
            aux_target: None,
            aux_unit_type: None,
            result: None,
        }
    }

    /// Builds the retreat-phase default: disband in place.
    pub fn disband(power: Power, unit_type: UnitType, location: impl Into<String>) -> Self {
        Order {
            power,
            unit_type,
            location: location.into(),
            order_type: OrderType::RetreatDisband,
            target: None,
            aux_loc: None,
            aux_target: None,
            aux_unit_type: None,
            result: None,
        }
    }

    /// Builds the build-phase default: waive the available build.
    pub fn waive(power: Power) -> Self {
        Order {
            power,
            unit_type: UnitType::Army,
            location: String::new(),
            order_type: OrderType::Waive,
            target: None,
            aux_loc: None,
            aux_target: None,
            aux_unit_type: None,
            result: None,
        }
    }
}
