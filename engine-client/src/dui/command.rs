//! Server-to-engine commands. One line each, terminated
//! with `\n` by [`crate::process::EngineProcess`] before it writes.

use diplomacy_protocol::Power;

/// Search constraints passed with `go`. `movetime` is the only one this
/// crate arms automatically (from the seat's remaining deadline); the
/// others exist so a stronger engine's options are still reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoParams {
    pub movetime_ms: Option<u64>,
    pub depth: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Dui,
    IsReady,
    SetOption { name: String, value: Option<String> },
    NewGame,
    Position { dfen: String },
    SetPower { power: Power },
    Go(GoParams),
    Stop,
    Quit,
}

impl Command {
    /// Renders the command as the single line written to the engine's
    /// stdin (without a trailing newline — the caller appends one).
    pub fn to_line(&self) -> String {
        match self {
            Command::Dui => "dui".to_string(),
            Command::IsReady => "isready".to_string(),
            Command::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {name} value {v}"),
                None => format!("setoption name {name}"),
            },
            Command::NewGame => "newgame".to_string(),
            Command::Position { dfen } => format!("position {dfen}"),
            Command::SetPower { power } => format!("setpower {}", power.name()),
            Command::Go(params) => {
                let mut line = "go".to_string();
                if let Some(ms) = params.movetime_ms {
                    line.push_str(&format!(" movetime {ms}"));
                }
                if let Some(depth) = params.depth {
                    line.push_str(&format!(" depth {depth}"));
                }
                line
            }
            Command::Stop => "stop".to_string(),
            Command::Quit => "quit".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_with_movetime_renders_the_parameter() {
        let cmd = Command::Go(GoParams { movetime_ms: Some(5000), depth: None });
        assert_eq!(cmd.to_line(), "go movetime 5000");
    }

    #[test]
    fn setoption_without_value_omits_the_keyword() {
        let cmd = Command::SetOption { name: "ClearHash".into(), value: None };
        assert_eq!(cmd.to_line(), "setoption name ClearHash");
    }

    #[test]
    fn setpower_uses_the_lowercase_name() {
        let cmd = Command::SetPower { power: Power::Austria };
        assert_eq!(cmd.to_line(), "setpower austria");
    }
}
