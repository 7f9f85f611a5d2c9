//! Angle of any (gate, line) address, and the inverse lookup

use serde::Serialize;

use crate::core::types::{
    normalize_degrees, signed_delta, Gate, Line, LineAddress, GATE_WIDTH, LINES_PER_GATE,
    LINE_COUNT, QUANTUM,
};
use crate::wheel::rotation::{RotationOffset, RotationSolver};
use crate::wheel::sequence::Sequence;

/// Result of an inverse lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Located {
    pub address: LineAddress,
    /// Visual angle where `address` starts
    pub angle: f64,
    /// `target - angle`, shortest way round, in (-180, 180]
    pub distance: f64,
}

/// Visual angles over one sequence and rotation
#[derive(Debug, Clone, Copy)]
pub struct AngleCalculator<'a> {
    sequence: &'a Sequence,
    offset: RotationOffset,
}

impl<'a> AngleCalculator<'a> {
    pub fn new(sequence: &'a Sequence, offset: RotationOffset) -> Self {
        Self { sequence, offset }
    }

    /// Visual angle where a line starts, in [0, 360)
    pub fn angle_of(&self, address: LineAddress) -> f64 {
        self.offset
            .apply(RotationSolver::base_angle(self.sequence, address))
    }

    /// Start and end angles of a whole gate; `end` may be smaller than `start` across 0°
    pub fn gate_span(&self, gate: Gate) -> (f64, f64) {
        let start = self.angle_of(LineAddress::of(gate, Line::FIRST));
        (start, normalize_degrees(start + GATE_WIDTH))
    }

    /// Address whose start is closest to `target`; exact midpoints go to the later line
    ///
    /// Returns `None` for NaN or infinite targets.
    pub fn locate(&self, target: f64) -> Option<Located> {
        if !target.is_finite() {
            return None;
        }

        let raw = self.offset.remove(normalize_degrees(target));
        let index = (raw / QUANTUM).round() as usize % LINE_COUNT;
        let address = self.address_at(index);
        let angle = self.angle_of(address);

        Some(Located {
            address,
            angle,
            distance: signed_delta(angle, target),
        })
    }

    /// Address at a raw line index 0..384, counted from sequence index 0
    pub fn address_at(&self, line_index: usize) -> LineAddress {
        let line_index = line_index % LINE_COUNT;
        LineAddress::of(
            self.sequence.gate_at(line_index / LINES_PER_GATE),
            Line((line_index % LINES_PER_GATE) as u8 + 1),
        )
    }

    /// All 384 addresses in sequence order
    pub fn addresses(&self) -> impl Iterator<Item = LineAddress> + '_ {
        (0..LINE_COUNT).map(move |index| self.address_at(index))
    }

    /// Every address with its angle, in sequence order
    pub fn table(&self) -> Vec<(LineAddress, f64)> {
        self.addresses()
            .map(|address| (address, self.angle_of(address)))
            .collect()
    }
}
