//! Exercises the full DUI handshake and `go` cycle against the
//! `mock-engine` fixture binary, and the [`EngineBackedStrategy`] adapter
//! built on top of it.

use std::sync::Arc;
use std::time::Duration;

use diplomacy_core::adjudicate::BoardState;
use diplomacy_core::bots::{EasyStrategy, Strategy};
use diplomacy_engine_client::dui::command::GoParams;
use diplomacy_engine_client::dui::Command;
use diplomacy_engine_client::{EngineBackedStrategy, EngineError, EngineProcess, ProcessState};
use diplomacy_protocol::{PhaseType, Power};

fn mock_engine_path() -> String {
    env!("CARGO_BIN_EXE_mock-engine").to_string()
}

#[tokio::test]
async fn handshake_completes_and_reports_ready() {
    let process = EngineProcess::spawn(&mock_engine_path(), &[]).await.expect("spawn mock engine");
    assert_eq!(process.state().await, ProcessState::Ready);
    process.wait_ready(Duration::from_secs(5)).await.expect("isready/readyok");
    process.quit().await.expect("quit");
    assert_eq!(process.state().await, ProcessState::Closed);
}

#[tokio::test]
async fn engine_backed_strategy_orders_every_unit_to_hold() {
    let process = Arc::new(EngineProcess::spawn(&mock_engine_path(), &[]).await.expect("spawn mock engine"));
    let strategy = EngineBackedStrategy::new(process, Duration::from_millis(200), Box::new(EasyStrategy));

    let board = BoardState::standard_opening();
    let orders = strategy.choose_orders(Power::France, &board, PhaseType::Movement, 1901).await;

    let expected_units = board.units_of(Power::France).count();
    assert_eq!(orders.len(), expected_units);
    assert!(orders.iter().all(|o| o.order_type == diplomacy_protocol::OrderType::Hold));
}

#[tokio::test]
async fn a_wedged_engine_is_killed_and_marked_crashed_after_its_deadline() {
    let process = EngineProcess::spawn(&mock_engine_path(), &[]).await.expect("spawn mock engine");
    process.send(Command::Position { dfen: "hang".into() }).await.unwrap();
    process.send(Command::SetPower { power: Power::France }).await.unwrap();

    let go = Command::Go(GoParams { movetime_ms: Some(50), depth: None });
    let result = process.go(go, Duration::from_millis(100)).await;

    assert!(matches!(result, Err(EngineError::Timeout)));
    assert_eq!(process.state().await, ProcessState::Crashed);
    assert!(process.has_exited().await);
}
