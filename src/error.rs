//! Error type for construction and configuration paths.
//!
//! The evolutionary operators themselves never fail: an unsatisfiable
//! mutation or an empty pick is a no-op. Only loading or validating a
//! configuration, and building a population from one, can return an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeatError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("failed to read configuration file: {0}")]
    ConfigRead(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
