//! Error types for maze agents.
//!
//! Moves into walls or off the grid are ordinary outcomes of the environment,
//! not errors. Errors arise while building a maze or a configuration from
//! untrusted input, or when a Q-table is paired with a grid of another size.

use thiserror::Error;

/// A specialized `Result` type for maze agent operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error enum for all operations within the `maze_agents` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The grid definition is malformed (ragged rows, unknown cell codes, no goal).
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// The start position is out of bounds or not an open cell.
    #[error("Invalid start position ({row}, {col}): {reason}")]
    InvalidStart {
        row: i32,
        col: i32,
        reason: String,
    },

    /// A Q-table was paired with a grid of different dimensions.
    #[error("Q-table is {table_rows}x{table_cols} but the grid is {grid_rows}x{grid_cols}")]
    TableShape {
        table_rows: usize,
        table_cols: usize,
        grid_rows: usize,
        grid_cols: usize,
    },

    /// A learning parameter is out of its allowed range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error from the underlying I/O system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                Error::InvalidGrid("no goal cell".into()),
                "Invalid grid: no goal cell",
            ),
            (
                Error::InvalidStart {
                    row: 0,
                    col: 0,
                    reason: "cell is a wall".into(),
                },
                "Invalid start position (0, 0): cell is a wall",
            ),
            (
                Error::TableShape {
                    table_rows: 2,
                    table_cols: 2,
                    grid_rows: 5,
                    grid_cols: 5,
                },
                "Q-table is 2x2 but the grid is 5x5",
            ),
            (
                Error::Config("alpha must be in (0, 1]".into()),
                "Configuration error: alpha must be in (0, 1]",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(format!("{}", error), expected);
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{invalid}");
        let error: Error = json_result.unwrap_err().into();
        assert!(matches!(error, Error::Serialization(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().starts_with("IO error"));
    }
}
