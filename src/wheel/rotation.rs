//! Rotation that brings the North anchor to 0°
//!
//! Angles are first laid out by sequence index: line `l` of the gate at index `i`
//! starts at `(i * 6 + (l - 1)) * QUANTUM`. The rotation offset is added to every
//! such raw angle so the North anchor lands on 0°.

use serde::Serialize;
use std::fmt;

use crate::core::types::{normalize_degrees, LineAddress, LINES_PER_GATE, QUANTUM};
use crate::wheel::position::PositionSpec;
use crate::wheel::sequence::Sequence;

/// Line-position of a gate's midpoint, between lines 3 and 4
const GATE_MIDPOINT: f64 = 2.5;

/// Correction in [0, 360) added to every raw angle
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RotationOffset(f64);

impl RotationOffset {
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Apply to a raw, index-based angle
    pub fn apply(self, raw_angle: f64) -> f64 {
        normalize_degrees(raw_angle + self.0)
    }

    /// Undo on a visual angle, giving the raw angle in [0, 360)
    pub fn remove(self, visual_angle: f64) -> f64 {
        normalize_degrees(visual_angle - self.0)
    }
}

impl fmt::Display for RotationOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

pub struct RotationSolver;

impl RotationSolver {
    /// Raw angle of a line's start, before rotation
    pub fn base_angle(sequence: &Sequence, address: LineAddress) -> f64 {
        let line_position = sequence.position_of(address.gate) * LINES_PER_GATE
            + address.line.offset();
        line_position as f64 * QUANTUM
    }

    /// Position of an anchor in line units from the start of index 0
    ///
    /// A straddle sits where `after` begins (equivalently, where `before` ends);
    /// a centre sits half way through the gate.
    pub fn anchor_line_position(sequence: &Sequence, spec: &PositionSpec) -> f64 {
        match *spec {
            PositionSpec::Centered { gate } => {
                (sequence.position_of(gate) * LINES_PER_GATE) as f64 + GATE_MIDPOINT
            }
            PositionSpec::Straddled { after, .. } => {
                (sequence.position_of(after) * LINES_PER_GATE) as f64
            }
        }
    }

    /// Raw angle of an anchor, before rotation
    pub fn anchor_angle(sequence: &Sequence, spec: &PositionSpec) -> f64 {
        Self::anchor_line_position(sequence, spec) * QUANTUM
    }

    /// Offset placing `north` at 0°
    ///
    /// Straddled specs must already have passed the adjacency check. Only
    /// `after` is consulted, so an unchecked pair would silently resolve.
    pub fn solve(sequence: &Sequence, north: &PositionSpec) -> RotationOffset {
        let anchor = Self::anchor_angle(sequence, north);
        RotationOffset(normalize_degrees(360.0 - anchor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Gate;

    fn spec(input: &str) -> PositionSpec {
        PositionSpec::parse(input).unwrap()
    }

    #[test]
    fn test_straddled_north_offset() {
        let sequence = Sequence::canonical();
        let north = spec("11|10");
        assert_eq!(RotationSolver::anchor_line_position(&sequence, &north), 348.0);
        assert_eq!(RotationSolver::anchor_angle(&sequence, &north), 326.25);
        assert_eq!(RotationSolver::solve(&sequence, &north).degrees(), 33.75);
    }

    #[test]
    fn test_centered_north_offset() {
        let sequence = Sequence::canonical();
        // gate 41 is index 0: midpoint at 2.5 lines = 2.34375°
        let offset = RotationSolver::solve(&sequence, &spec("41"));
        assert_eq!(offset.degrees(), 360.0 - 2.34375);
    }

    #[test]
    fn test_boundary_at_index_zero_gives_zero_offset() {
        let sequence = Sequence::canonical();
        let offset = RotationSolver::solve(&sequence, &spec("60|41"));
        assert_eq!(offset.degrees(), 0.0);
    }

    #[test]
    fn test_base_angle() {
        let sequence = Sequence::canonical();
        let address = LineAddress::of(Gate::new(10).unwrap(), crate::core::types::Line::FIRST);
        assert_eq!(RotationSolver::base_angle(&sequence, address), 326.25);
    }

    #[test]
    fn test_apply_and_remove() {
        let offset = RotationSolver::solve(&Sequence::canonical(), &spec("11|10"));
        assert_eq!(offset.apply(326.25), 0.0);
        assert_eq!(offset.apply(350.0), 23.75);
        assert_eq!(offset.remove(0.0), 326.25);
    }

    #[test]
    fn test_deterministic() {
        let sequence = Sequence::canonical();
        let a = RotationSolver::solve(&sequence, &spec("12|15"));
        let b = RotationSolver::solve(&sequence.clone(), &spec("12|15"));
        assert_eq!(a, b);
    }
}
