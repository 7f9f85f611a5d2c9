//! Sequence validation: the circular ordering of all 64 gates
//!
//! Shape problems (not a list, wrong length, non-integer or out-of-range entries)
//! stop validation at the first one found. Content problems (duplicates and
//! omissions) are collected exhaustively so one pass reports all of them.

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{Gate, GATE_COUNT};

/// The standard wheel ordering, index 0 through 63
pub const CANONICAL_SEQUENCE: [u8; GATE_COUNT] = [
    41, 19, 13, 49, 30, 55, 37, 63, 22, 36, 25, 17, 21, 51, 42, 3, //
    27, 24, 2, 23, 8, 20, 16, 35, 45, 12, 15, 52, 39, 53, 62, 56, //
    31, 33, 7, 4, 29, 59, 40, 64, 47, 6, 46, 18, 48, 57, 32, 50, //
    28, 44, 1, 43, 14, 34, 9, 5, 26, 11, 10, 58, 38, 54, 61, 60,
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    #[error("expected a list of 64 gate numbers, found {found}")]
    NotAList { found: &'static str },

    #[error("expected exactly 64 entries, found {found}")]
    WrongLength { found: usize },

    #[error("entry {index} is {found}, expected an integer gate number")]
    NonInteger { index: usize, found: String },

    #[error("entry {index} is {value}, expected a gate number in 1..=64")]
    OutOfRange { index: usize, value: i128 },

    #[error(
        "gate {gate} appears {} times (indices {}), each gate must appear exactly once",
        .indices.len(),
        join_indices(.indices)
    )]
    Duplicate { gate: Gate, indices: Vec<usize> },

    #[error("gate {gate} is absent, every gate 1..=64 must appear exactly once")]
    Missing { gate: Gate },
}

impl SequenceError {
    /// Shape errors abort validation; content errors are collected
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SequenceError::NotAList { .. }
                | SequenceError::WrongLength { .. }
                | SequenceError::NonInteger { .. }
                | SequenceError::OutOfRange { .. }
        )
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// A validated permutation of gates 1..=64, read circularly
///
/// The gate → index table is built once here, so every lookup afterwards is O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    gates: [Gate; GATE_COUNT],
    /// Index of each gate, addressed by `Gate::slot`
    positions: [u8; GATE_COUNT],
}

impl Sequence {
    /// Validate a list of gate numbers
    pub fn new(numbers: &[u32]) -> Result<Self, Vec<SequenceError>> {
        let values: Vec<i128> = numbers.iter().map(|&n| i128::from(n)).collect();
        SequenceValidator::check_entries(&values)
    }

    /// The standard ordering beginning 41, 19, 13, 49
    pub fn canonical() -> Self {
        Self::from_gates(std::array::from_fn(|i| Gate(CANONICAL_SEQUENCE[i])))
    }

    /// Caller guarantees `gates` is a permutation
    fn from_gates(gates: [Gate; GATE_COUNT]) -> Self {
        let mut positions = [0u8; GATE_COUNT];
        for (index, gate) in gates.iter().enumerate() {
            positions[gate.slot()] = index as u8;
        }
        Self { gates, positions }
    }

    pub fn len(&self) -> usize {
        GATE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Gate at a circular index (wraps modulo 64)
    pub fn gate_at(&self, index: usize) -> Gate {
        self.gates[index % GATE_COUNT]
    }

    /// Index of a gate, 0..64
    pub fn position_of(&self, gate: Gate) -> usize {
        self.positions[gate.slot()] as usize
    }

    /// Gate immediately after `gate`, wrapping from index 63 to 0
    pub fn successor(&self, gate: Gate) -> Gate {
        self.gate_at(self.position_of(gate) + 1)
    }

    /// Gate immediately before `gate`, wrapping from index 0 to 63
    pub fn predecessor(&self, gate: Gate) -> Gate {
        self.gate_at(self.position_of(gate) + GATE_COUNT - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = Gate> + '_ {
        self.gates.iter().copied()
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn to_numbers(&self) -> Vec<u8> {
        self.gates.iter().map(|g| g.number()).collect()
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.gates.iter())
    }
}

pub struct SequenceValidator;

impl SequenceValidator {
    /// Validate an arbitrary document value claiming to be a sequence
    pub fn validate(candidate: &Value) -> Result<Sequence, Vec<SequenceError>> {
        let entries = match candidate {
            Value::Array(entries) => entries,
            other => {
                return Err(vec![SequenceError::NotAList {
                    found: value_kind(other),
                }])
            }
        };

        if entries.len() != GATE_COUNT {
            return Err(vec![SequenceError::WrongLength {
                found: entries.len(),
            }]);
        }

        let mut values = Vec::with_capacity(GATE_COUNT);
        for (index, entry) in entries.iter().enumerate() {
            let number = entry
                .as_i64()
                .map(i128::from)
                .or_else(|| entry.as_u64().map(i128::from));
            match number {
                Some(n) => values.push(n),
                None => {
                    return Err(vec![SequenceError::NonInteger {
                        index,
                        found: entry.to_string(),
                    }])
                }
            }
        }

        Self::check_entries(&values)
    }

    fn check_entries(values: &[i128]) -> Result<Sequence, Vec<SequenceError>> {
        if values.len() != GATE_COUNT {
            return Err(vec![SequenceError::WrongLength {
                found: values.len(),
            }]);
        }

        let mut seen: Vec<Vec<usize>> = vec![Vec::new(); GATE_COUNT];
        for (index, &value) in values.iter().enumerate() {
            if !(1..=GATE_COUNT as i128).contains(&value) {
                return Err(vec![SequenceError::OutOfRange { index, value }]);
            }
            seen[value as usize - 1].push(index);
        }

        let mut errors = Vec::new();
        for (slot, indices) in seen.iter().enumerate() {
            if indices.len() > 1 {
                errors.push(SequenceError::Duplicate {
                    gate: Gate(slot as u8 + 1),
                    indices: indices.clone(),
                });
            }
        }
        for (slot, indices) in seen.iter().enumerate() {
            if indices.is_empty() {
                errors.push(SequenceError::Missing {
                    gate: Gate(slot as u8 + 1),
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Sequence::from_gates(std::array::from_fn(|i| {
            Gate(values[i] as u8)
        })))
    }
}
