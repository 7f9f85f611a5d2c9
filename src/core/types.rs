//! Core type definitions: gates, lines, addresses and cardinals

use serde::Serialize;
use std::fmt;

use crate::core::error::AddressError;

// ============================================================================
// Constants
// ============================================================================

/// Number of gates on the wheel
pub const GATE_COUNT: usize = 64;

/// Number of lines inside every gate
pub const LINES_PER_GATE: usize = 6;

/// Number of addressable (gate, line) units around the wheel
pub const LINE_COUNT: usize = GATE_COUNT * LINES_PER_GATE;

/// Angular width of one line in degrees (360 / 384 = 0.9375)
///
/// Every angle this crate produces is a multiple of half a quantum, which is
/// exactly representable in binary floating point, so angle arithmetic stays exact.
pub const QUANTUM: f64 = 360.0 / LINE_COUNT as f64;

/// Angular width of one gate in degrees
pub const GATE_WIDTH: f64 = QUANTUM * LINES_PER_GATE as f64;

/// Tolerance used when comparing two angles for equality
pub const ANGLE_EPSILON: f64 = QUANTUM / 1000.0;

/// Normalize any angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest difference `to - from`, in (-180, 180]
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// True if two angles coincide on the circle within [`ANGLE_EPSILON`]
pub fn angles_match(a: f64, b: f64) -> bool {
    signed_delta(a, b).abs() <= ANGLE_EPSILON
}

// ============================================================================
// Gate / Line
// ============================================================================

/// One of the 64 gates, numbered 1..=64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Gate(pub(crate) u8);

impl Gate {
    /// Build a gate from its number, `None` outside 1..=64
    pub fn new(number: u32) -> Option<Self> {
        if (1..=GATE_COUNT as u32).contains(&number) {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based slot for lookup tables
    pub(crate) fn slot(self) -> usize {
        self.0 as usize - 1
    }

    /// Iterate over all gates in numeric order
    pub fn all() -> impl Iterator<Item = Gate> {
        (1..=GATE_COUNT as u8).map(Gate)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Gate {
    type Error = AddressError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Gate::new(number).ok_or(AddressError::GateOutOfRange { gate: number })
    }
}

/// One of the 6 lines inside a gate, numbered 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Line(pub(crate) u8);

impl Line {
    pub const FIRST: Line = Line(1);
    pub const LAST: Line = Line(LINES_PER_GATE as u8);

    pub fn new(number: u32) -> Option<Self> {
        if (1..=LINES_PER_GATE as u32).contains(&number) {
            Some(Self(number as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based offset of this line inside its gate
    pub fn offset(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = Line> {
        (1..=LINES_PER_GATE as u8).map(Line)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Line {
    type Error = AddressError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Line::new(number).ok_or(AddressError::LineOutOfRange { line: number })
    }
}

/// A (gate, line) address, one of 384
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineAddress {
    pub gate: Gate,
    pub line: Line,
}

impl LineAddress {
    /// Checked constructor from bare numbers
    pub fn new(gate: u32, line: u32) -> Result<Self, AddressError> {
        Ok(Self {
            gate: Gate::try_from(gate)?,
            line: Line::try_from(line)?,
        })
    }

    pub fn of(gate: Gate, line: Line) -> Self {
        Self { gate, line }
    }
}

impl fmt::Display for LineAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.gate, self.line)
    }
}

// ============================================================================
// Cardinals
// ============================================================================

/// Compass direction used to anchor the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    /// Cardinals that may be supplied alongside North and cross-checked
    pub const SECONDARY: [Cardinal; 3] = [Cardinal::East, Cardinal::South, Cardinal::West];

    /// Canonical visual angle: N=0, E=90, S=180, W=270
    pub fn canonical_angle(self) -> f64 {
        match self {
            Cardinal::North => 0.0,
            Cardinal::East => 90.0,
            Cardinal::South => 180.0,
            Cardinal::West => 270.0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Cardinal::North => 'N',
            Cardinal::East => 'E',
            Cardinal::South => 'S',
            Cardinal::West => 'W',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'N' => Some(Cardinal::North),
            'E' => Some(Cardinal::East),
            'S' => Some(Cardinal::South),
            'W' => Some(Cardinal::West),
            _ => None,
        }
    }

    /// Name of the configuration field holding this cardinal's position
    pub fn position_field(self) -> &'static str {
        match self {
            Cardinal::North => "northPosition",
            Cardinal::East => "eastPosition",
            Cardinal::South => "southPosition",
            Cardinal::West => "westPosition",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cardinal::North => "North",
            Cardinal::East => "East",
            Cardinal::South => "South",
            Cardinal::West => "West",
        };
        f.pad(name)
    }
}
