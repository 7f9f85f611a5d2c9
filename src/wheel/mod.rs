//! Gate wheel positioning: sequence validation, cardinal anchoring and angles
//!
//! Components, leaves first:
//! - [`sequence`]: the 64-gate permutation
//! - [`position`]: `"a|b"` / `"a"` cardinal position strings
//! - [`adjacency`]: straddled positions against the sequence
//! - [`rotation`]: offset bringing North to 0°
//! - [`progression`]: orientation conventions and East/South/West cross-checks
//! - [`angle`]: (gate, line) ↔ angle
//! - [`validator`]: the pipeline tying them together

pub mod adjacency;
pub mod angle;
pub mod position;
pub mod progression;
pub mod rotation;
pub mod sequence;
pub mod validator;

pub use adjacency::{AdjacencyChecker, AdjacencyError};
pub use angle::{AngleCalculator, Located};
pub use position::{PositionParseError, PositionRule, PositionSpec};
pub use progression::{
    CardinalInconsistency, CardinalLayout, Handedness, Progression, ProgressionError,
    ProgressionResolver,
};
pub use rotation::{RotationOffset, RotationSolver};
pub use sequence::{Sequence, SequenceError, SequenceValidator, CANONICAL_SEQUENCE};
pub use validator::{validate, ValidatedConfiguration, ValidationStage};
