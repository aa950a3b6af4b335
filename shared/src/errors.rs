//! Shared error types for the cluster integration harness

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid version string: '{input}'")]
    InvalidVersion { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Failed to read configuration file {path}: {message}")]
    ConfigFile { path: String, message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
