//! Gate Wheel - validated angular coordinates for a 64-gate wheel
//!
//! ```no_run
//! use gate_wheel::core::{load_config, Gate, Line};
//! use gate_wheel::wheel::validate;
//!
//! # fn main() -> gate_wheel::core::Result<()> {
//! let raw = load_config(std::path::Path::new("data/wheel.toml"))?;
//! let config = validate(&raw)?;
//! let gate = Gate::new(25).expect("gate in range");
//! assert_eq!(config.angle_of(gate, Line::FIRST), 90.0);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod wheel;

pub use crate::core::{load_config, RawConfig, Result, WheelError};
pub use crate::wheel::{validate, ValidatedConfiguration};
