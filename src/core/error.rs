use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::types::Cardinal;
use crate::wheel::adjacency::AdjacencyError;
use crate::wheel::position::PositionParseError;
use crate::wheel::progression::{CardinalInconsistency, ProgressionError};
use crate::wheel::sequence::SequenceError;
use crate::wheel::validator::ValidationStage;

/// Field of the raw configuration document an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Sequence,
    CardinalProgression,
    Position(Cardinal),
}

impl Field {
    /// Document key, as written in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Field::Sequence => "sequence",
            Field::CardinalProgression => "cardinalProgression",
            Field::Position(cardinal) => cardinal.position_field(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single diagnostic produced while validating a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field}: required field is missing")]
    MissingField { field: Field },

    #[error("sequence: {0}")]
    Sequence(#[from] SequenceError),

    #[error("cardinalProgression: {0}")]
    Progression(#[from] ProgressionError),

    #[error("{}: {source}", .cardinal.position_field())]
    Position {
        cardinal: Cardinal,
        source: PositionParseError,
    },

    #[error("{}: {source}", .cardinal.position_field())]
    Adjacency {
        cardinal: Cardinal,
        source: AdjacencyError,
    },

    #[error("{}: {source}", .source.cardinal.position_field())]
    Inconsistent {
        #[from]
        source: CardinalInconsistency,
    },
}

impl ConfigError {
    /// The document field that holds the offending value
    pub fn field(&self) -> Field {
        match self {
            ConfigError::MissingField { field } => *field,
            ConfigError::Sequence(_) => Field::Sequence,
            ConfigError::Progression(_) => Field::CardinalProgression,
            ConfigError::Position { cardinal, .. } | ConfigError::Adjacency { cardinal, .. } => {
                Field::Position(*cardinal)
            }
            ConfigError::Inconsistent { source } => Field::Position(source.cardinal),
        }
    }
}

/// Every error collected before validation stopped, plus the last stage that completed
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSet {
    pub stage: ValidationStage,
    pub errors: Vec<ConfigError>,
}

impl ErrorSet {
    pub fn new(stage: ValidationStage, errors: Vec<ConfigError>) -> Self {
        Self { stage, errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigError> {
        self.errors.iter()
    }

    /// Errors reported against one document field
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ConfigError> {
        self.errors.iter().filter(move |e| e.field() == field)
    }
}

impl fmt::Display for ErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "configuration rejected after stage {} with {} error(s)",
            self.stage,
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorSet {}

/// Out-of-range bare numbers handed to a checked address constructor
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    #[error("gate {gate} is outside 1..=64")]
    GateOutOfRange { gate: u32 },

    #[error("line {line} is outside 1..=6")]
    LineOutOfRange { line: u32 },
}

/// Boundary error for loading documents and answering queries
#[derive(Error, Debug)]
pub enum WheelError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Unsupported configuration format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid angle: {0} is not a finite number of degrees")]
    InvalidAngle(f64),

    #[error("{0}")]
    Rejected(#[from] ErrorSet),
}

pub type Result<T> = std::result::Result<T, WheelError>;
