use super::Strategy;
use crate::adjudicate::BoardState;
use diplomacy_protocol::{Order, OrderType, PhaseType, Power};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

/// The weakest tier: every order is picked uniformly at random from the
/// legal-without-a-map action set for the unit's situation. Movement
/// orders are always `Hold` since choosing a destination province
/// requires the adjacency table this crate does not model; the
/// randomness instead lands on retreat/build choices, where it is
/// meaningful without the map.
pub struct RandomStrategy {
    rng: Mutex<SmallRng>,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        RandomStrategy { rng: Mutex::new(SmallRng::from_entropy()) }
    }
}

#[async_trait::async_trait]
impl Strategy for RandomStrategy {
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, _year: u16) -> Vec<Order> {
        match phase_type {
            PhaseType::Movement => {
                board.units_of(power).map(|(loc, unit)| Order::hold(power, unit.unit_type, loc.clone())).collect()
            }
            PhaseType::Retreat => board
                .dislodged_of(power)
                .map(|(loc, unit)| Order::disband(power, unit.unit_type, loc.clone()))
                .collect(),
            PhaseType::Build => {
                let adjustment = board.adjustment(power);
                if adjustment <= 0 {
                    return Vec::new();
                }
                let mut rng = self.rng.lock().await;
                let mut vacant_homes: Vec<String> = board
                    .home_centers
                    .get(&power)
                    .map(|homes| homes.iter().filter(|h| !board.units.contains_key(*h)).cloned().collect())
                    .unwrap_or_default();

                (0..adjustment)
                    .map(|_| {
                        if vacant_homes.is_empty() || rng.gen_bool(0.2) {
                            Order::waive(power)
                        } else {
                            let index = rng.gen_range(0..vacant_homes.len());
                            let home = vacant_homes.remove(index);
                            let mut order = Order::hold(power, diplomacy_protocol::UnitType::Army, home);
                            order.order_type = OrderType::Build;
                            order
                        }
                    })
                    .collect()
            }
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
