//! Orientation conventions and cross-checking of East/South/West anchors
//!
//! North is pinned to 0° by the rotation offset and cardinals are always a
//! quarter turn apart. A convention only decides which label each quarter gets.
//!
//! A symbol lists the cardinals in the order they are passed when the wheel is
//! read against increasing sequence index. Following the index meets them in
//! reverse: under `NWSE` the index runs North, East, South, West, so East sits
//! one quarter (90°) after North; under `NESW` it is West that sits at 90°.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{angles_match, Cardinal, GATE_COUNT, LINES_PER_GATE, QUANTUM};
use crate::wheel::position::PositionSpec;
use crate::wheel::rotation::{RotationOffset, RotationSolver};
use crate::wheel::sequence::{value_kind, Sequence};

/// Degrees between neighbouring cardinals
pub const QUARTER_TURN: f64 = 90.0;

/// One of the 8 orientation conventions, named by its 4-letter symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progression {
    Nesw,
    Nwse,
    Eswn,
    Enws,
    Swne,
    Senw,
    Wnes,
    Wsen,
}

/// Direction in which a symbol's letters go around the compass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    /// N → E → S → W
    Clockwise,
    /// N → W → S → E
    Counterclockwise,
}

impl Progression {
    pub const ALL: [Progression; 8] = [
        Progression::Nesw,
        Progression::Nwse,
        Progression::Eswn,
        Progression::Enws,
        Progression::Swne,
        Progression::Senw,
        Progression::Wnes,
        Progression::Wsen,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Progression::Nesw => "NESW",
            Progression::Nwse => "NWSE",
            Progression::Eswn => "ESWN",
            Progression::Enws => "ENWS",
            Progression::Swne => "SWNE",
            Progression::Senw => "SENW",
            Progression::Wnes => "WNES",
            Progression::Wsen => "WSEN",
        }
    }

    pub fn handedness(self) -> Handedness {
        match self {
            Progression::Nesw | Progression::Eswn | Progression::Swne | Progression::Wnes => {
                Handedness::Clockwise
            }
            Progression::Nwse | Progression::Enws | Progression::Senw | Progression::Wsen => {
                Handedness::Counterclockwise
            }
        }
    }

    /// Cardinals in symbol order
    pub fn order(self) -> [Cardinal; 4] {
        use Cardinal::*;
        match self {
            Progression::Nesw => [North, East, South, West],
            Progression::Nwse => [North, West, South, East],
            Progression::Eswn => [East, South, West, North],
            Progression::Enws => [East, North, West, South],
            Progression::Swne => [South, West, North, East],
            Progression::Senw => [South, East, North, West],
            Progression::Wnes => [West, North, East, South],
            Progression::Wsen => [West, South, East, North],
        }
    }

    pub fn start(self) -> Cardinal {
        self.order()[0]
    }

    /// Quarter turns from North to `cardinal`, counted along increasing index
    pub fn quarter_steps(self, cardinal: Cardinal) -> u8 {
        match (self.handedness(), cardinal) {
            (_, Cardinal::North) => 0,
            (_, Cardinal::South) => 2,
            (Handedness::Counterclockwise, Cardinal::East) => 1,
            (Handedness::Counterclockwise, Cardinal::West) => 3,
            (Handedness::Clockwise, Cardinal::West) => 1,
            (Handedness::Clockwise, Cardinal::East) => 3,
        }
    }

    /// Visual angle this convention assigns to `cardinal`
    pub fn expected_angle(self, cardinal: Cardinal) -> f64 {
        self.quarter_steps(cardinal) as f64 * QUARTER_TURN
    }

    /// Read a symbol taken straight from a configuration document
    pub fn from_value(value: &Value) -> Result<Self, ProgressionError> {
        match value {
            Value::String(symbol) => symbol.parse(),
            other => Err(ProgressionError::NotAString {
                found: value_kind(other),
            }),
        }
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Progression {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Progression::ALL
            .into_iter()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| ProgressionError::UnknownProgression {
                value: s.to_string(),
            })
    }
}

impl Serialize for Progression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("expected an orientation symbol string, found {found}")]
    NotAString { found: &'static str },

    #[error(
        "unknown orientation {value:?}, expected one of NESW, NWSE, ESWN, ENWS, SWNE, SENW, WNES, WSEN"
    )]
    UnknownProgression { value: String },
}

/// A supplied East/South/West position that disagrees with North + convention
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "{cardinal} at {supplied} lands on {actual}° but {progression} places {cardinal} at {expected}°{}",
    describe_suggestion(.suggestion)
)]
pub struct CardinalInconsistency {
    pub cardinal: Cardinal,
    pub progression: Progression,
    pub supplied: PositionSpec,
    pub expected: f64,
    pub actual: f64,
    /// Position that would have satisfied the expectation
    pub suggestion: Option<PositionSpec>,
}

fn describe_suggestion(suggestion: &Option<PositionSpec>) -> String {
    match suggestion {
        Some(spec) => format!(" (\"{}\" would sit there)", spec),
        None => String::new(),
    }
}

/// Expected visual angle of every cardinal under one convention
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardinalLayout {
    pub progression: Progression,
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl CardinalLayout {
    pub fn for_progression(progression: Progression) -> Self {
        Self {
            progression,
            north: progression.expected_angle(Cardinal::North),
            east: progression.expected_angle(Cardinal::East),
            south: progression.expected_angle(Cardinal::South),
            west: progression.expected_angle(Cardinal::West),
        }
    }

    pub fn angle(&self, cardinal: Cardinal) -> f64 {
        match cardinal {
            Cardinal::North => self.north,
            Cardinal::East => self.east,
            Cardinal::South => self.south,
            Cardinal::West => self.west,
        }
    }

    /// Cardinals in the convention's own order, starting at its first letter
    pub fn walk(&self) -> Vec<(Cardinal, f64)> {
        self.progression
            .order()
            .into_iter()
            .map(|cardinal| (cardinal, self.angle(cardinal)))
            .collect()
    }
}

pub struct ProgressionResolver;

impl ProgressionResolver {
    /// Expected angles for `progression`, checked against any supplied anchors
    ///
    /// North entries in `supplied` are skipped: North defines the frame.
    pub fn resolve(
        sequence: &Sequence,
        progression: Progression,
        offset: RotationOffset,
        supplied: &[(Cardinal, PositionSpec)],
    ) -> Result<CardinalLayout, Vec<CardinalInconsistency>> {
        let layout = CardinalLayout::for_progression(progression);

        let errors: Vec<CardinalInconsistency> = supplied
            .iter()
            .filter(|(cardinal, _)| *cardinal != Cardinal::North)
            .filter_map(|&(cardinal, spec)| {
                let expected = layout.angle(cardinal);
                let actual = offset.apply(RotationSolver::anchor_angle(sequence, &spec));
                if angles_match(expected, actual) {
                    None
                } else {
                    Some(CardinalInconsistency {
                        cardinal,
                        progression,
                        supplied: spec,
                        expected,
                        actual,
                        suggestion: Self::spec_at(sequence, offset.remove(expected)),
                    })
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(layout)
        } else {
            Err(errors)
        }
    }

    /// Position spec whose anchor falls exactly on a raw angle, if any
    pub fn spec_at(sequence: &Sequence, raw_angle: f64) -> Option<PositionSpec> {
        const TOLERANCE: f64 = 1e-6;
        let line_position = raw_angle / QUANTUM;
        let lines = LINES_PER_GATE as f64;

        let boundary = (line_position / lines).round();
        if (line_position - boundary * lines).abs() < TOLERANCE {
            let after_index = boundary as usize % GATE_COUNT;
            return Some(PositionSpec::straddled(
                sequence.gate_at(after_index + GATE_COUNT - 1),
                sequence.gate_at(after_index),
            ));
        }

        let centre = ((line_position - 2.5) / lines).round();
        if (line_position - (centre * lines + 2.5)).abs() < TOLERANCE {
            return Some(PositionSpec::centered(
                sequence.gate_at(centre as usize % GATE_COUNT),
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Gate;

    fn spec(input: &str) -> PositionSpec {
        PositionSpec::parse(input).unwrap()
    }

    fn canonical_offset() -> RotationOffset {
        RotationSolver::solve(&Sequence::canonical(), &spec("11|10"))
    }

    #[test]
    fn test_symbols_roundtrip() {
        for progression in Progression::ALL {
            assert_eq!(progression.symbol().parse(), Ok(progression));
            assert_eq!(progression.start(), progression.order()[0]);
        }
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            "NSEW".parse::<Progression>(),
            Err(ProgressionError::UnknownProgression {
                value: "NSEW".into()
            })
        );
        assert!("nwse".parse::<Progression>().is_err());
    }

    #[test]
    fn test_progression_from_document_value() {
        assert_eq!(
            Progression::from_value(&Value::from("ENWS")),
            Ok(Progression::Enws)
        );
        assert_eq!(
            Progression::from_value(&serde_json::json!(4)),
            Err(ProgressionError::NotAString { found: "a number" })
        );
        assert_eq!(
            Progression::from_value(&serde_json::json!(["N", "W", "S", "E"])),
            Err(ProgressionError::NotAString { found: "a list" })
        );
    }

    #[test]
    fn test_handedness_families() {
        assert_eq!(Progression::Nwse.handedness(), Handedness::Counterclockwise);
        assert_eq!(Progression::Senw.handedness(), Handedness::Counterclockwise);
        assert_eq!(Progression::Nesw.handedness(), Handedness::Clockwise);
        assert_eq!(Progression::Wnes.handedness(), Handedness::Clockwise);
    }

    #[test]
    fn test_nwse_places_east_one_quarter_after_north() {
        let layout = CardinalLayout::for_progression(Progression::Nwse);
        assert_eq!(layout.north, 0.0);
        assert_eq!(layout.east, 90.0);
        assert_eq!(layout.south, 180.0);
        assert_eq!(layout.west, 270.0);
    }

    #[test]
    fn test_nesw_places_west_one_quarter_after_north() {
        let layout = CardinalLayout::for_progression(Progression::Nesw);
        assert_eq!(layout.west, 90.0);
        assert_eq!(layout.south, 180.0);
        assert_eq!(layout.east, 270.0);
    }

    #[test]
    fn test_spacing_is_always_a_quarter_turn() {
        for progression in Progression::ALL {
            let mut angles: Vec<f64> = Cardinal::ALL
                .iter()
                .map(|&c| progression.expected_angle(c))
                .collect();
            angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(angles, vec![0.0, 90.0, 180.0, 270.0]);
        }
    }

    #[test]
    fn test_walk_starts_at_symbol_start() {
        let layout = CardinalLayout::for_progression(Progression::Senw);
        let walk = layout.walk();
        assert_eq!(walk[0], (Cardinal::South, 180.0));
        assert_eq!(walk[1], (Cardinal::East, 90.0));
    }

    #[test]
    fn test_consistent_anchors_pass() {
        let sequence = Sequence::canonical();
        let supplied = [
            (Cardinal::East, spec("36|25")),
            (Cardinal::South, spec("12|15")),
            (Cardinal::West, spec("6|46")),
        ];
        let layout = ProgressionResolver::resolve(
            &sequence,
            Progression::Nwse,
            canonical_offset(),
            &supplied,
        )
        .unwrap();
        assert_eq!(layout.east, 90.0);
    }

    #[test]
    fn test_inconsistent_east_is_reported_with_suggestion() {
        let sequence = Sequence::canonical();
        let supplied = [(Cardinal::East, spec("17|21"))];
        let errors = ProgressionResolver::resolve(
            &sequence,
            Progression::Nwse,
            canonical_offset(),
            &supplied,
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![CardinalInconsistency {
                cardinal: Cardinal::East,
                progression: Progression::Nwse,
                supplied: spec("17|21"),
                expected: 90.0,
                actual: 101.25,
                suggestion: Some(spec("36|25")),
            }]
        );
        assert!(errors[0].to_string().contains("\"36|25\" would sit there"));
    }

    #[test]
    fn test_every_mismatch_is_collected() {
        let sequence = Sequence::canonical();
        // correct anchors for NWSE are wrong for NESW on East and West
        let supplied = [
            (Cardinal::East, spec("36|25")),
            (Cardinal::South, spec("12|15")),
            (Cardinal::West, spec("6|46")),
        ];
        let errors = ProgressionResolver::resolve(
            &sequence,
            Progression::Nesw,
            canonical_offset(),
            &supplied,
        )
        .unwrap_err();
        let cardinals: Vec<Cardinal> = errors.iter().map(|e| e.cardinal).collect();
        assert_eq!(cardinals, vec![Cardinal::East, Cardinal::West]);
        assert_eq!(errors[0].suggestion, Some(spec("6|46")));
    }

    #[test]
    fn test_centered_suggestion() {
        let sequence = Sequence::canonical();
        // centre of gate 41 is 2.5 lines in
        assert_eq!(
            ProgressionResolver::spec_at(&sequence, 2.5 * QUANTUM),
            Some(PositionSpec::centered(Gate::new(41).unwrap()))
        );
        assert_eq!(ProgressionResolver::spec_at(&sequence, QUANTUM), None);
        assert_eq!(
            ProgressionResolver::spec_at(&sequence, 0.0),
            Some(spec("60|41"))
        );
    }
}
