//! Parses lines the engine subprocess writes to stdout.

use diplomacy_protocol::Power;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `id name <value>` / `id author <value>`, sent during the `dui` handshake.
    Id { field: String, value: String },
    /// `option name <name> [type <t> [default <d>] [min <lo> max <hi>]]`.
    Option { name: String, rest: String },
    /// `protocol_version <n>`.
    ProtocolVersion(u32),
    /// Handshake terminator for `dui`.
    DuiOk,
    /// Handshake terminator for `isready`.
    ReadyOk,
    /// `bestorders <dson>`, the answer to `go`.
    BestOrders(String),
    /// `info <free text>`, informational/logging chatter the caller may ignore.
    Info(String),
    /// Anything that doesn't match a known shape. Tolerated, not fatal —
    /// an engine may emit chatter this crate doesn't need to understand.
    Unknown(String),
}

impl Reply {
    /// Parses one line of engine stdout (without its trailing newline).
    pub fn parse(line: &str) -> Reply {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("id ") {
            if let Some((field, value)) = rest.split_once(' ') {
                return Reply::Id { field: field.to_string(), value: value.to_string() };
            }
        }
        if let Some(rest) = line.strip_prefix("option name ") {
            return Reply::Option { name: rest.split_whitespace().next().unwrap_or_default().to_string(), rest: rest.to_string() };
        }
        if let Some(rest) = line.strip_prefix("protocol_version ") {
            if let Ok(n) = rest.trim().parse() {
                return Reply::ProtocolVersion(n);
            }
        }
        if line == "duiok" {
            return Reply::DuiOk;
        }
        if line == "readyok" {
            return Reply::ReadyOk;
        }
        if let Some(rest) = line.strip_prefix("bestorders ") {
            return Reply::BestOrders(rest.to_string());
        }
        if line == "bestorders" {
            return Reply::BestOrders(String::new());
        }
        if let Some(rest) = line.strip_prefix("info ") {
            return Reply::Info(rest.to_string());
        }
        Reply::Unknown(line.to_string())
    }
}

/// Extracts the engine's declared display name from its handshake `id`
/// lines, if present.
pub fn engine_name(replies: &[Reply]) -> Option<&str> {
    replies.iter().find_map(|r| match r {
        Reply::Id { field, value } if field == "name" => Some(value.as_str()),
        _ => None,
    })
}

/// Whether the engine's handshake declared support for `setpower`'s
/// argument — a no-op validator for now, since this crate trusts any
/// engine that completed the `dui`/`duiok` handshake to accept the seven
/// canonical powers.
pub fn accepts_power(_replies: &[Reply], _power: Power) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_id_name() {
        assert_eq!(Reply::parse("id name ReferenceBot"), Reply::Id { field: "name".into(), value: "ReferenceBot".into() });
    }

    #[test]
    fn parses_bestorders_with_payload() {
        assert_eq!(Reply::parse("bestorders A vienna H ; W"), Reply::BestOrders("A vienna H ; W".into()));
    }

    #[test]
    fn parses_bare_duiok_and_readyok() {
        assert_eq!(Reply::parse("duiok"), Reply::DuiOk);
        assert_eq!(Reply::parse("readyok"), Reply::ReadyOk);
    }

    #[test]
    fn unmatched_line_is_unknown() {
        assert_eq!(Reply::parse("some chatter"), Reply::Unknown("some chatter".into()));
    }

    #[test]
    fn engine_name_extracts_from_handshake_replies() {
        let replies = vec![Reply::parse("id name ReferenceBot"), Reply::parse("id author nobody")];
        assert_eq!(engine_name(&replies), Some("ReferenceBot"));
    }
}
