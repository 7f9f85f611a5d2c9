pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, RawConfig};
pub use error::{AddressError, ConfigError, ErrorSet, Field, Result, WheelError};
pub use types::{Cardinal, Gate, Line, LineAddress, QUANTUM};
