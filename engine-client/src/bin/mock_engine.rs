//! A minimal DUI-speaking engine, used only as a fixture for
//! `diplomacy-engine-client`'s own integration tests. Always orders every
//! unit of the active power to hold.

use std::io::{self, BufRead, Write};

use diplomacy_engine_client::dui::{dfen, dson};
use diplomacy_protocol::{Order, Power};

fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut position: Option<String> = None;
    let mut active_power: Option<Power> = None;

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "dui" {
            writeln!(out, "id name mock-engine").unwrap();
            writeln!(out, "id author fixture").unwrap();
            writeln!(out, "duiok").unwrap();
        } else if line == "isready" {
            writeln!(out, "readyok").unwrap();
        } else if line == "newgame" {
            position = None;
            active_power = None;
        } else if let Some(dfen_line) = line.strip_prefix("position ") {
            position = Some(dfen_line.to_string());
        } else if let Some(power_name) = line.strip_prefix("setpower ") {
            active_power = Power::from_name(power_name.trim());
        } else if line.starts_with("go") {
            if position.as_deref() == Some("hang") {
                // Test fixture only: simulates a wedged engine that never
                // answers `go`, even after `stop`, to exercise the client's
                // timeout/crash path.
                continue;
            }
            let orders = match (&position, active_power) {
                (Some(dfen_line), Some(power)) => match dfen::parse_dfen(dfen_line) {
                    Ok((board, _)) => board.units_of(power).map(|(loc, unit)| Order::hold(power, unit.unit_type, loc.clone())).collect(),
                    Err(_) => Vec::new(),
                },
                _ => Vec::new(),
            };
            writeln!(out, "bestorders {}", dson::format_orders(&orders)).unwrap();
        } else if line == "stop" || line.starts_with("setoption") {
            // No search to interrupt, no options to honor.
        } else if line == "quit" {
            break;
        }
        out.flush().unwrap();
    }
}
