//! Error types for everything loaded from outside the simulation

use thiserror::Error;

/// Failure to read or accept the game configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure to fetch or decode a level layout
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Level document has no `block` section")]
    MissingSection,

    #[error("Level contains no blocks")]
    NoBlocks,

    #[error("Level {0} does not exist")]
    UnknownLevel(usize),
}
