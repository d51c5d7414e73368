use super::easy::EasyStrategy;
use super::Strategy;
use crate::adjudicate::BoardState;
use diplomacy_protocol::{Order, OrderType, PhaseType, Power};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Approximates regret-matching over the one decision this crate's board
/// model actually exposes without the adjacency table: how aggressively
/// to commit supports versus holding units in reserve. Each power tracks a
/// running regret for "support everything" against "hold everything";
/// `choose_orders` mixes between the two in proportion to accumulated
/// regret, the textbook regret-matching update, and reinforces the regret
/// after every call using whether the board's supply-center count grew —
/// the nearest thing to a payoff signal available here (a full 4-ply
/// search over real moves would need the map).
#[derive(Default)]
pub struct HardStrategy {
    regret: Mutex<HashMap<Power, Regret>>,
}

#[derive(Clone, Copy, Default)]
struct Regret {
    support_everything: f64,
    hold_everything: f64,
    last_centers: Option<usize>,
}

impl Regret {
    fn support_weight(&self) -> f64 {
        let total = self.support_everything.max(0.0) + self.hold_everything.max(0.0);
        if total <= 0.0 {
            0.5
        } else {
            self.support_everything.max(0.0) / total
        }
    }
}

#[async_trait::async_trait]
impl Strategy for HardStrategy {
    async fn choose_orders(&self, power: Power, board: &BoardState, phase_type: PhaseType, year: u16) -> Vec<Order> {
        if phase_type != PhaseType::Movement {
            return EasyStrategy.choose_orders(power, board, phase_type, year).await;
        }

        let centers = board.supply_center_count(power);
        let support_weight = {
            let mut table = self.regret.lock().await;
            let entry = table.entry(power).or_default();
            if let Some(last) = entry.last_centers {
                let payoff = centers as f64 - last as f64;
                entry.support_everything += payoff;
                entry.hold_everything -= payoff * 0.5;
            }
            entry.last_centers = Some(centers);
            entry.support_weight()
        };

        let units: Vec<(String, diplomacy_protocol::UnitType)> =
            board.units_of(power).map(|(loc, u)| (loc.clone(), u.unit_type)).collect();
        let support_count = ((units.len() as f64) * support_weight).round() as usize;

        units
            .iter()
            .enumerate()
            .map(|(i, (loc, unit_type))| {
                if i < support_count {
                    if let Some((other_loc, _)) = units.get((i + 1) % units.len()) {
                        if other_loc != loc {
                            let mut order = Order::hold(power, *unit_type, loc.clone());
                            order.order_type = OrderType::Support;
                            order.aux_loc = Some(other_loc.clone());
                            return order;
                        }
                    }
                }
                Order::hold(power, *unit_type, loc.clone())
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "hard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_back_to_easy_behavior_outside_movement() {
        let mut board = BoardState::default();
        board.supply_centers.insert("home".into(), Power::Italy);
        board.home_centers.insert(Power::Italy, vec!["home".into()]);
        let strategy = HardStrategy::default();
        let orders = strategy.choose_orders(Power::Italy, &board, PhaseType::Build, 1901).await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_type, OrderType::Build);
    }

    #[tokio::test]
    async fn support_weight_starts_balanced() {
        let regret = Regret::default();
        assert!((regret.support_weight() - 0.5).abs() < f64::EPSILON);
    }
}
