//! Adjacency check for straddled positions against a validated sequence

use thiserror::Error;

use crate::core::types::{Gate, GATE_COUNT};
use crate::wheel::position::PositionSpec;
use crate::wheel::sequence::Sequence;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdjacencyError {
    #[error(
        "gates {before} (index {before_index}) and {after} (index {after_index}) are not adjacent in the sequence"
    )]
    NotAdjacent {
        before: Gate,
        after: Gate,
        before_index: usize,
        after_index: usize,
    },

    #[error("gate {after} comes immediately before gate {before} in the sequence, write \"{after}|{before}\"")]
    ReversedAdjacency { before: Gate, after: Gate },
}

pub struct AdjacencyChecker;

impl AdjacencyChecker {
    /// Confirm a position is realisable on `sequence`
    ///
    /// Centered positions always are: a validated sequence holds every gate.
    /// Straddled positions need `position(before) + 1 == position(after)` modulo 64.
    pub fn check(sequence: &Sequence, spec: &PositionSpec) -> Result<(), AdjacencyError> {
        let (before, after) = match *spec {
            PositionSpec::Centered { .. } => return Ok(()),
            PositionSpec::Straddled { before, after } => (before, after),
        };

        let before_index = sequence.position_of(before);
        let after_index = sequence.position_of(after);

        if (before_index + 1) % GATE_COUNT == after_index {
            Ok(())
        } else if (after_index + 1) % GATE_COUNT == before_index {
            Err(AdjacencyError::ReversedAdjacency { before, after })
        } else {
            Err(AdjacencyError::NotAdjacent {
                before,
                after,
                before_index,
                after_index,
            })
        }
    }
}
