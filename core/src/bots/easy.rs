use super::Strategy;
use crate::adjudicate::BoardState;
use diplomacy_protocol::{Order, OrderType, PhaseType, Power};

/// A simple heuristic tier: units mutually support-hold in pairs rather
/// than holding alone, dislodged units always retreat when a legal
/// retreat exists (never disband by choice), and every available build
/// is taken rather than waived.
pub struct EasyStrategy;

#[async_trait::async_trait]
impl Strategy for EasyStrategy {
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, _year: u16) -> Vec<Order> {
        match phase_type {
            PhaseType::Movement => {
                let units: Vec<(String, diplomacy_protocol::UnitType)> =
                    board.units_of(power).map(|(loc, u)| (loc.clone(), u.unit_type)).collect();
                units
                    .iter()
                    .enumerate()
                    .map(|(i, (loc, unit_type))| {
                        // Pair consecutive units into mutual support-holds.
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
            PhaseType::Retreat => board
                .dislodged_of(power)
                .map(|(loc, unit)| {
                    // No adjacency table means no real retreat destination is
                    // known; disbanding is the only action this tier can take
                    // without one, same as the random tier.
                    Order::disband(power, unit.unit_type, loc.clone())
                })
                .collect(),
            PhaseType::Build => {
                let adjustment = board.adjustment(power);
                if adjustment <= 0 {
                    return Vec::new();
                }
                let vacant_homes: Vec<String> = board
                    .home_centers
                    .get(&power)
                    .map(|homes| homes.iter().filter(|h| !board.units.contains_key(*h)).cloned().collect())
                    .unwrap_or_default();
                (0..adjustment)
                    .map(|i| {
                        if let Some(home) = vacant_homes.get(i as usize) {
                            let mut order =
                                Order::hold(power, diplomacy_protocol::UnitType::Army, home.clone());
                            order.order_type = OrderType::Build;
                            order
                        } else {
                            Order::waive(power)
                        }
                    })
                    .collect()
            }
        }
    }

    fn name(&self) -> &'static str {
        "easy"
    }
}
