//! Error types for tsp-evolve.

use thiserror::Error;

/// Main error type for tsp-evolve operations.
///
/// Every variant is a precondition failure detected before the evolutionary
/// loop starts. Once a run is under way nothing in the core can fail.
#[derive(Debug, Error)]
pub enum TspError {
    /// Invalid GA configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The input supplied no cities.
    #[error("no cities to visit")]
    NoCities,

    /// Malformed TSPLIB input.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O failure while reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tsp-evolve operations.
pub type Result<T> = std::result::Result<T, TspError>;
