//! Configuration validation pipeline
//!
//! Stages run in order and a stage never starts after an earlier one failed:
//!
//! 1. parse: sequence, progression symbol and every position string
//! 2. adjacency of every straddled position
//! 3. rotation from the North position
//! 4. cross-check of East/South/West against North and the convention
//!
//! Inside a stage every independent error is collected before rejecting.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::core::config::RawConfig;
use crate::core::error::{ConfigError, ErrorSet, Field};
use crate::core::types::{Cardinal, Gate, Line, LineAddress};
use crate::wheel::adjacency::AdjacencyChecker;
use crate::wheel::angle::{AngleCalculator, Located};
use crate::wheel::position::PositionSpec;
use crate::wheel::progression::{CardinalLayout, Progression, ProgressionResolver};
use crate::wheel::rotation::{RotationOffset, RotationSolver};
use crate::wheel::sequence::{Sequence, SequenceValidator};

/// Last stage a configuration completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ValidationStage {
    Unvalidated,
    SequenceChecked,
    AdjacencyChecked,
    RotationResolved,
    ProgressionChecked,
    Validated,
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationStage::Unvalidated => "unvalidated",
            ValidationStage::SequenceChecked => "sequence-checked",
            ValidationStage::AdjacencyChecked => "adjacency-checked",
            ValidationStage::RotationResolved => "rotation-resolved",
            ValidationStage::ProgressionChecked => "progression-checked",
            ValidationStage::Validated => "validated",
        };
        f.write_str(name)
    }
}

/// A fully checked wheel configuration
///
/// Built only by [`validate`] and never mutated afterwards. Safe to share
/// across threads for any number of concurrent angle queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedConfiguration {
    sequence: Sequence,
    cardinal_progression: Progression,
    north_position: PositionSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    east_position: Option<PositionSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    south_position: Option<PositionSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    west_position: Option<PositionSpec>,
    rotation_offset: RotationOffset,
    cardinals: CardinalLayout,
}

impl ValidatedConfiguration {
    /// Always [`ValidationStage::Validated`]; rejected documents never get this far
    pub fn stage(&self) -> ValidationStage {
        ValidationStage::Validated
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn progression(&self) -> Progression {
        self.cardinal_progression
    }

    pub fn rotation(&self) -> RotationOffset {
        self.rotation_offset
    }

    pub fn layout(&self) -> &CardinalLayout {
        &self.cardinals
    }

    /// Position spec as supplied for a cardinal; North is always present
    pub fn position(&self, cardinal: Cardinal) -> Option<PositionSpec> {
        match cardinal {
            Cardinal::North => Some(self.north_position),
            Cardinal::East => self.east_position,
            Cardinal::South => self.south_position,
            Cardinal::West => self.west_position,
        }
    }

    pub fn calculator(&self) -> AngleCalculator<'_> {
        AngleCalculator::new(&self.sequence, self.rotation_offset)
    }

    /// Visual angle where `line` of `gate` starts, in [0, 360)
    pub fn angle_of(&self, gate: Gate, line: Line) -> f64 {
        self.calculator().angle_of(LineAddress::of(gate, line))
    }

    pub fn angle_of_address(&self, address: LineAddress) -> f64 {
        self.calculator().angle_of(address)
    }

    /// Index of a gate within the sequence
    pub fn position_of(&self, gate: Gate) -> usize {
        self.sequence.position_of(gate)
    }

    pub fn locate(&self, angle: f64) -> Option<Located> {
        self.calculator().locate(angle)
    }

    pub fn table(&self) -> Vec<(LineAddress, f64)> {
        self.calculator().table()
    }

    /// Canonical document form; validating it again yields an equal configuration
    pub fn to_raw(&self) -> RawConfig {
        let mut raw = RawConfig {
            sequence: Some(Value::from(self.sequence.to_numbers())),
            cardinal_progression: Some(Value::from(self.cardinal_progression.symbol())),
            ..RawConfig::default()
        };
        for cardinal in Cardinal::ALL {
            raw.set_position(
                cardinal,
                self.position(cardinal).map(|spec| Value::from(spec.to_string())),
            );
        }
        raw
    }
}

fn reject(stage: ValidationStage, errors: Vec<ConfigError>) -> ErrorSet {
    tracing::warn!(
        "Wheel configuration rejected after {} with {} error(s)",
        stage,
        errors.len()
    );
    ErrorSet::new(stage, errors)
}

/// Validate a raw configuration document
pub fn validate(raw: &RawConfig) -> Result<ValidatedConfiguration, ErrorSet> {
    let mut errors = Vec::new();
    let mut stage = ValidationStage::Unvalidated;

    // === PARSE ===
    let sequence = match &raw.sequence {
        None => {
            errors.push(ConfigError::MissingField {
                field: Field::Sequence,
            });
            None
        }
        Some(value) => match SequenceValidator::validate(value) {
            Ok(sequence) => {
                stage = ValidationStage::SequenceChecked;
                Some(sequence)
            }
            Err(sequence_errors) => {
                errors.extend(sequence_errors.into_iter().map(ConfigError::Sequence));
                None
            }
        },
    };

    let progression = match &raw.cardinal_progression {
        None => {
            errors.push(ConfigError::MissingField {
                field: Field::CardinalProgression,
            });
            None
        }
        Some(value) => match Progression::from_value(value) {
            Ok(progression) => Some(progression),
            Err(e) => {
                errors.push(ConfigError::Progression(e));
                None
            }
        },
    };

    let mut specs: Vec<(Cardinal, PositionSpec)> = Vec::new();
    for cardinal in Cardinal::ALL {
        match raw.position(cardinal) {
            None if cardinal == Cardinal::North => errors.push(ConfigError::MissingField {
                field: Field::Position(Cardinal::North),
            }),
            None => {}
            Some(value) => match PositionSpec::from_value(value) {
                Ok(spec) => specs.push((cardinal, spec)),
                Err(source) => errors.push(ConfigError::Position { cardinal, source }),
            },
        }
    }

    let north = specs
        .iter()
        .find(|(cardinal, _)| *cardinal == Cardinal::North)
        .map(|(_, spec)| *spec);

    let (sequence, progression, north) = match (sequence, progression, north) {
        (Some(sequence), Some(progression), Some(north)) if errors.is_empty() => {
            (sequence, progression, north)
        }
        _ => return Err(reject(stage, errors)),
    };
    tracing::debug!("Sequence and positions parsed");

    // === ADJACENCY ===
    for (cardinal, spec) in &specs {
        if let Err(source) = AdjacencyChecker::check(&sequence, spec) {
            errors.push(ConfigError::Adjacency {
                cardinal: *cardinal,
                source,
            });
        }
    }
    if !errors.is_empty() {
        return Err(reject(stage, errors));
    }
    stage = ValidationStage::AdjacencyChecked;
    tracing::debug!("All straddled positions are adjacent ({})", stage);

    // === ROTATION ===
    let rotation = RotationSolver::solve(&sequence, &north);
    stage = ValidationStage::RotationResolved;
    tracing::debug!("Rotation resolved: north {} -> offset {}", north, rotation);

    // === PROGRESSION ===
    let cardinals = match ProgressionResolver::resolve(&sequence, progression, rotation, &specs) {
        Ok(layout) => layout,
        Err(mismatches) => {
            errors.extend(
                mismatches
                    .into_iter()
                    .map(|source| ConfigError::Inconsistent { source }),
            );
            return Err(reject(stage, errors));
        }
    };
    stage = ValidationStage::ProgressionChecked;
    tracing::debug!("Cardinals consistent with {} ({})", progression, stage);

    let position_of = |wanted: Cardinal| {
        specs
            .iter()
            .find(|(cardinal, _)| *cardinal == wanted)
            .map(|(_, spec)| *spec)
    };

    Ok(ValidatedConfiguration {
        east_position: position_of(Cardinal::East),
        south_position: position_of(Cardinal::South),
        west_position: position_of(Cardinal::West),
        sequence,
        cardinal_progression: progression,
        north_position: north,
        rotation_offset: rotation,
        cardinals,
    })
}
