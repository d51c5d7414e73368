//! DSON order-list encoding: a single `;`-separated line the engine
//! returns from `go` as `bestorders <dson>`, and that this crate can also
//! send back via `position`/replay tooling. Adapted from the usual
//! coast-aware grammar to this crate's opaque province identifiers — no
//! coast letter, since the map is out of scope here.
//!
//! Grammar, one order per `;`-separated entry:
//!   `<unit> <loc> H`                 hold
//!   `<unit> <loc> - <dest>`          move
//!   `<unit> <loc> S <unit> <aux>`    support hold
//!   `<unit> <loc> S <unit> <aux> - <dest>`  support move
//!   `<unit> <loc> C <unit> <aux> - <dest>`  convoy
//!   `<unit> <loc> R <dest>`          retreat move
//!   `<unit> <loc> D`                 retreat disband
//!   `<unit> <loc> B`                 build
//!   `W`                               waive

use diplomacy_protocol::{Order, OrderType, Power, UnitType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DsonError {
    #[error("empty order entry")]
    Empty,
    #[error("invalid unit character: '{0}'")]
    InvalidUnitType(char),
    #[error("unrecognized operator: '{0}'")]
    UnrecognizedOperator(String),
    #[error("order is missing a required field: '{0}'")]
    MissingField(String),
}

fn unit_char(unit_type: UnitType) -> char {
    match unit_type {
        UnitType::Army => 'A',
        UnitType::Fleet => 'F',
    }
}

fn unit_from_char(c: char) -> Result<UnitType, DsonError> {
    match c {
        'A' => Ok(UnitType::Army),
        'F' => Ok(UnitType::Fleet),
        other => Err(DsonError::InvalidUnitType(other)),
    }
}

/// Renders one order as its DSON entry.
pub fn format_order(order: &Order) -> String {
    match order.order_type {
        OrderType::Hold => format!("{} {} H", unit_char(order.unit_type), order.location),
        OrderType::Move => format!(
            "{} {} - {}",
            unit_char(order.unit_type),
            order.location,
            order.target.as_deref().unwrap_or_default()
        ),
        OrderType::Support => {
            let aux_unit = order.aux_unit_type.unwrap_or(UnitType::Army);
            match &order.aux_target {
                Some(target) => format!(
                    "{} {} S {} {} - {}",
                    unit_char(order.unit_type),
                    order.location,
                    unit_char(aux_unit),
                    order.aux_loc.as_deref().unwrap_or_default(),
                    target
                ),
                None => format!(
                    "{} {} S {} {}",
                    unit_char(order.unit_type),
                    order.location,
                    unit_char(aux_unit),
                    order.aux_loc.as_deref().unwrap_or_default()
                ),
            }
        }
        OrderType::Convoy => {
            let aux_unit = order.aux_unit_type.unwrap_or(UnitType::Army);
            format!(
                "{} {} C {} {} - {}",
                unit_char(order.unit_type),
                order.location,
                unit_char(aux_unit),
                order.aux_loc.as_deref().unwrap_or_default(),
                order.aux_target.as_deref().unwrap_or_default()
            )
        }
        OrderType::RetreatMove => format!(
            "{} {} R {}",
            unit_char(order.unit_type),
            order.location,
            order.target.as_deref().unwrap_or_default()
        ),
        OrderType::RetreatDisband => format!("{} {} D", unit_char(order.unit_type), order.location),
        OrderType::Build => format!("{} {} B", unit_char(order.unit_type), order.location),
        OrderType::Waive => "W".to_string(),
    }
}

/// Renders an order list as the `;`-separated line sent after `bestorders`.
pub fn format_orders(orders: &[Order]) -> String {
    orders.iter().map(format_order).collect::<Vec<_>>().join(" ; ")
}

/// Parses one DSON entry. `power` is supplied by the caller since DSON
/// entries don't carry a power field — a `bestorders` reply is always
/// scoped to the power the preceding `setpower` selected.
pub fn parse_order(entry: &str, power: Power) -> Result<Order, DsonError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(DsonError::Empty);
    }
    if entry == "W" {
        return Ok(Order::waive(power));
    }

    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let unit_type = unit_from_char(tokens[0].chars().next().ok_or(DsonError::Empty)?)?;
    let location = tokens.get(1).ok_or_else(|| DsonError::MissingField("location".into()))?.to_string();
    let op = tokens.get(2).ok_or_else(|| DsonError::MissingField("operator".into()))?;

    let mut order = Order {
        power,
        unit_type,
        location,
        order_type: OrderType::Hold,
        target: None,
        aux_loc: None,
        aux_target: None,
        aux_unit_type: None,
        result: None,
    };

    match *op {
        "H" => order.order_type = OrderType::Hold,
        "-" => {
            order.order_type = OrderType::Move;
            order.target = Some(tokens.get(3).ok_or_else(|| DsonError::MissingField("destination".into()))?.to_string());
        }
        "D" => order.order_type = OrderType::RetreatDisband,
        "R" => {
            order.order_type = OrderType::RetreatMove;
            order.target = Some(tokens.get(3).ok_or_else(|| DsonError::MissingField("destination".into()))?.to_string());
        }
        "B" => order.order_type = OrderType::Build,
        "S" | "C" => {
            order.order_type = if *op == "S" { OrderType::Support } else { OrderType::Convoy };
            order.aux_unit_type = Some(unit_from_char(
                tokens.get(3).and_then(|t| t.chars().next()).ok_or_else(|| DsonError::MissingField("aux unit".into()))?,
            )?);
            order.aux_loc = Some(tokens.get(4).ok_or_else(|| DsonError::MissingField("aux location".into()))?.to_string());
            if tokens.get(5) == Some(&"-") {
                order.aux_target = Some(tokens.get(6).ok_or_else(|| DsonError::MissingField("aux destination".into()))?.to_string());
            }
        }
        other => return Err(DsonError::UnrecognizedOperator(other.to_string())),
    }

    Ok(order)
}

/// Parses a full `;`-separated DSON line, as received after `bestorders`.
pub fn parse_orders(dson: &str, power: Power) -> Result<Vec<Order>, DsonError> {
    dson.split(';').map(str::trim).filter(|s| !s.is_empty()).map(|entry| parse_order(entry, power)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_order_round_trips() {
        let order = Order {
            power: Power::France,
            unit_type: UnitType::Army,
            location: "paris".into(),
            order_type: OrderType::Move,
            target: Some("burgundy".into()),
            aux_loc: None,
            aux_target: None,
            aux_unit_type: None,
            result: None,
        };
        let rendered = format_order(&order);
        assert_eq!(rendered, "A paris - burgundy");
        assert_eq!(parse_order(&rendered, Power::France).unwrap(), order);
    }

    #[test]
    fn support_move_round_trips() {
        let order = Order {
            power: Power::Germany,
            unit_type: UnitType::Army,
            location: "munich".into(),
            order_type: OrderType::Support,
            target: None,
            aux_loc: Some("berlin".into()),
            aux_target: Some("silesia".into()),
            aux_unit_type: Some(UnitType::Army),
            result: None,
        };
        let rendered = format_order(&order);
        assert_eq!(rendered, "A munich S A berlin - silesia");
        assert_eq!(parse_order(&rendered, Power::Germany).unwrap(), order);
    }

    #[test]
    fn waive_has_no_unit_fields() {
        let order = Order::waive(Power::Italy);
        assert_eq!(format_order(&order), "W");
        assert_eq!(parse_order("W", Power::Italy).unwrap(), order);
    }

    #[test]
    fn full_order_list_round_trips() {
        let orders = vec![
            Order::hold(Power::Austria, UnitType::Army, "vienna"),
            Order::waive(Power::Austria),
        ];
        let dson = format_orders(&orders);
        assert_eq!(dson, "A vienna H ; W");
        assert_eq!(parse_orders(&dson, Power::Austria).unwrap(), orders);
    }

    #[test]
    fn unrecognized_operator_is_rejected() {
        assert_eq!(parse_order("A vienna Z", Power::Austria), Err(DsonError::UnrecognizedOperator("Z".to_string())));
    }
}
