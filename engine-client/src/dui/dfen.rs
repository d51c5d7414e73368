//! DFEN position encoding, adapted from the DUI protocol's usual
//! `<phase>/<units>/<centers>/<dislodged>` shape to this crate's opaque,
//! variable-length province identifiers (no fixed 3-letter codes, no
//! coast grammar — the real map is out of scope here).
//! Each power is still keyed by its unique first letter (A/E/F/G/I/R/T),
//! same as the original notation's single-character power field.

use diplomacy_core::adjudicate::{BoardState, DislodgedUnit, UnitOnBoard};
use diplomacy_protocol::{PhaseType, Power, Season, UnitType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfenError {
    #[error("expected 4 '/'-separated sections, got {0}")]
    WrongSectionCount(usize),
    #[error("phase info too short: '{0}'")]
    PhaseInfoTooShort(String),
    #[error("invalid year: '{0}'")]
    InvalidYear(String),
    #[error("invalid season character: '{0}'")]
    InvalidSeason(char),
    #[error("invalid phase character: '{0}'")]
    InvalidPhase(char),
    #[error("invalid power character: '{0}'")]
    InvalidPower(char),
    #[error("invalid unit character: '{0}'")]
    InvalidUnitType(char),
    #[error("malformed entry: '{0}'")]
    MalformedEntry(String),
}

fn power_char(power: Power) -> char {
    power.name().chars().next().expect("power names are non-empty").to_ascii_uppercase()
}

fn power_from_char(c: char) -> Result<Power, DfenError> {
    Power::ALL.into_iter().find(|p| power_char(*p) == c).ok_or(DfenError::InvalidPower(c))
}

fn unit_char(unit_type: UnitType) -> char {
    match unit_type {
        UnitType::Army => 'A',
        UnitType::Fleet => 'F',
    }
}

fn unit_from_char(c: char) -> Result<UnitType, DfenError> {
    match c {
        'A' => Ok(UnitType::Army),
        'F' => Ok(UnitType::Fleet),
        other => Err(DfenError::InvalidUnitType(other)),
    }
}

fn season_char(season: Season) -> char {
    match season {
        Season::Spring => 's',
        Season::Fall => 'f',
    }
}

fn phase_char(phase_type: PhaseType) -> char {
    match phase_type {
        PhaseType::Movement => 'm',
        PhaseType::Retreat => 'r',
        PhaseType::Build => 'b',
    }
}

/// Encodes a position as `<year><season><phase>/<units>/<centers>/<dislodged>`.
pub fn encode_dfen(board: &BoardState, year: u16, season: Season, phase_type: PhaseType) -> String {
    let mut units: Vec<(&String, &UnitOnBoard)> = board.units.iter().collect();
    units.sort_by_key(|(loc, _)| loc.as_str());
    let units_section = if units.is_empty() {
        "-".to_string()
    } else {
        units
            .iter()
            .map(|(loc, u)| format!("{}{}:{}", power_char(u.power), unit_char(u.unit_type), loc))
            .collect::<Vec<_>>()
            .join(",")
    };

    let mut centers: Vec<(&String, &Power)> = board.supply_centers.iter().collect();
    centers.sort_by_key(|(loc, _)| loc.as_str());
    let centers_section = if centers.is_empty() {
        "-".to_string()
    } else {
        centers.iter().map(|(loc, p)| format!("{}:{}", loc, power_char(**p))).collect::<Vec<_>>().join(",")
    };

    let mut dislodged: Vec<(&String, &DislodgedUnit)> = board.dislodged.iter().collect();
    dislodged.sort_by_key(|(loc, _)| loc.as_str());
    let dislodged_section = if dislodged.is_empty() {
        "-".to_string()
    } else {
        dislodged
            .iter()
            .map(|(loc, d)| {
                let forbidden: Vec<&str> = {
                    let mut f: Vec<&str> = d.forbidden.iter().map(String::as_str).collect();
                    f.sort_unstable();
                    f
                };
                format!("{}{}:{}:{}", power_char(d.power), unit_char(d.unit_type), loc, forbidden.join("|"))
            })
            .collect::<Vec<_>>()
            .join(",")
    };

    format!("{year}{}{}/{units_section}/{centers_section}/{dislodged_section}", season_char(season), phase_char(phase_type))
}

/// The parsed phase header: `(year, season, phase_type)`.
pub type PhaseInfo = (u16, Season, PhaseType);

/// Decodes a DFEN string back into a board and its phase header.
pub fn parse_dfen(s: &str) -> Result<(BoardState, PhaseInfo), DfenError> {
    let sections: Vec<&str> = s.split('/').collect();
    if sections.len() != 4 {
        return Err(DfenError::WrongSectionCount(sections.len()));
    }

    let phase_info = sections[0];
    if phase_info.len() < 3 {
        return Err(DfenError::PhaseInfoTooShort(phase_info.to_string()));
    }
    let phase_c = phase_info.chars().last().unwrap();
    let season_c = phase_info.chars().nth(phase_info.len() - 2).unwrap();
    let year_str = &phase_info[..phase_info.len() - 2];
    let year: u16 = year_str.parse().map_err(|_| DfenError::InvalidYear(year_str.to_string()))?;
    let season = match season_c {
        's' => Season::Spring,
        'f' => Season::Fall,
        other => return Err(DfenError::InvalidSeason(other)),
    };
    let phase_type = match phase_c {
        'm' => PhaseType::Movement,
        'r' => PhaseType::Retreat,
        'b' => PhaseType::Build,
        other => return Err(DfenError::InvalidPhase(other)),
    };

    let mut board = BoardState::default();

    if sections[1] != "-" {
        for entry in sections[1].split(',') {
            let (header, loc) = entry.split_once(':').ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?;
            let mut chars = header.chars();
            let power = power_from_char(chars.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?)?;
            let unit_type = unit_from_char(chars.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?)?;
            board.units.insert(loc.to_string(), UnitOnBoard { power, unit_type });
        }
    }

    if sections[2] != "-" {
        for entry in sections[2].split(',') {
            let (loc, p) = entry.split_once(':').ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?;
            let power = power_from_char(p.chars().next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?)?;
            board.supply_centers.insert(loc.to_string(), power);
        }
    }

    if sections[3] != "-" {
        for entry in sections[3].split(',') {
            let mut parts = entry.splitn(3, ':');
            let header = parts.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?;
            let loc = parts.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?;
            let forbidden_raw = parts.next().unwrap_or("");
            let mut chars = header.chars();
            let power = power_from_char(chars.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?)?;
            let unit_type = unit_from_char(chars.next().ok_or_else(|| DfenError::MalformedEntry(entry.to_string()))?)?;
            let forbidden = if forbidden_raw.is_empty() {
                Default::default()
            } else {
                forbidden_raw.split('|').map(String::from).collect()
            };
            board.dislodged.insert(loc.to_string(), DislodgedUnit { power, unit_type, forbidden });
        }
    }

    for power in Power::ALL {
        let homes: Vec<String> = board.supply_centers.iter().filter(|(_, p)| **p == power).map(|(l, _)| l.clone()).collect();
        if !homes.is_empty() {
            board.home_centers.entry(power).or_insert(homes);
        }
    }

    Ok((board, (year, season, phase_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_standard_opening() {
        let board = BoardState::standard_opening();
        let dfen = encode_dfen(&board, 1901, Season::Spring, PhaseType::Movement);
        let (decoded, (year, season, phase_type)) = parse_dfen(&dfen).unwrap();
        assert_eq!(year, 1901);
        assert_eq!(season, Season::Spring);
        assert_eq!(phase_type, PhaseType::Movement);
        assert_eq!(decoded.units.len(), board.units.len());
        assert_eq!(decoded.supply_centers.len(), board.supply_centers.len());
    }

    #[test]
    fn empty_board_encodes_with_dashes() {
        let board = BoardState::default();
        let dfen = encode_dfen(&board, 1901, Season::Spring, PhaseType::Movement);
        assert_eq!(dfen, "1901sm/-/-/-");
    }

    #[test]
    fn rejects_wrong_section_count() {
        assert_eq!(parse_dfen("1901sm/-/-"), Err(DfenError::WrongSectionCount(3)));
    }

    #[test]
    fn dislodged_forbidden_set_round_trips() {
        let mut board = BoardState::default();
        let mut forbidden = std::collections::HashSet::new();
        forbidden.insert("origin".to_string());
        board.dislodged.insert(
            "province".to_string(),
            DislodgedUnit { power: Power::Russia, unit_type: UnitType::Army, forbidden },
        );
        let dfen = encode_dfen(&board, 1901, Season::Fall, PhaseType::Retreat);
        let (decoded, _) = parse_dfen(&dfen).unwrap();
        assert!(decoded.dislodged["province"].forbidden.contains("origin"));
    }
}
