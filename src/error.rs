use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("grid size must be positive")]
    EmptyGrid,

    #[error("grid size must be at least 2, got {0}")]
    GridTooSmall(u16),

    #[error("initial length {length} does not fit a {grid_size}x{grid_size} grid (allowed 1..={max})")]
    InitialLength {
        length: usize,
        grid_size: u16,
        max: usize,
    },

    #[error("bonus probability must lie in [0, 1], got {0}")]
    BonusProbability(f64),

    #[error("tick interval must be positive")]
    ZeroTickInterval,
}

/// Raised when a consumable cannot be placed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum SpawnError {
    #[error("no free cells left on the board")]
    BoardFull,
}

/// Failures at the key-value storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("storage document is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("stored value {value:?} for key {key:?} is invalid")]
    InvalidValue { key: String, value: String },
}

/// Errors that prevent an [`Engine`](crate::engine::Engine) from being built.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("initial consumable could not be placed: {0}")]
    Spawn(#[from] SpawnError),
}
