//! FILENAME: table-engine/src/error.rs

use grid::{BinCoord, GridShape};
use thiserror::Error;

/// Failure inside a formatter. Any of these aborts the whole conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatterError {
    #[error("No inputs to format")]
    EmptyInputs,

    #[error("Expected {expected} input(s), got {found}")]
    UnexpectedInputCount { expected: usize, found: usize },

    #[error("Missing input '{0}'")]
    MissingInput(String),

    #[error("No input name contains 'nominal'")]
    MissingNominal,

    #[error("Several inputs look nominal: {0:?}")]
    AmbiguousNominal(Vec<String>),

    #[error("Systematic '{systematic}' has no {direction} variation")]
    MissingVariation {
        systematic: String,
        direction: String,
    },

    #[error("Variation input '{0}' has an empty systematic name")]
    UnnamedSystematic(String),

    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    #[error("Formatter '{formatter}' needs argument '{argument}'")]
    MissingArgument { formatter: String, argument: String },

    #[error("Formatter '{formatter}' argument '{argument}': {reason}")]
    InvalidArgument {
        formatter: String,
        argument: String,
        reason: String,
    },

    #[error("{0}")]
    Custom(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("No dependent variable input to take the binning from")]
    MissingReferenceSource,

    #[error("Dependent variable '{variable}' has no inputs")]
    NoInputs { variable: String },

    #[error("Dependent variable '{variable}' declares input '{input}' twice")]
    DuplicateInput { variable: String, input: String },

    #[error("Input '{input}' of '{variable}' has shape {found}, expected {expected}")]
    DimensionMismatch {
        variable: String,
        input: String,
        expected: GridShape,
        found: GridShape,
    },

    #[error("Input '{input}' reports unsupported dimension {dimension}")]
    UnsupportedDimension { input: String, dimension: usize },

    #[error("{declared} independent variables declared for a {dimension}D binning")]
    TooManyIndependentVariables { declared: usize, dimension: usize },

    #[error("Input '{input}' has no bin {coord}")]
    BinOutOfRange { input: String, coord: BinCoord },

    #[error("Formatting '{variable}' failed: {source}")]
    Formatter {
        variable: String,
        #[source]
        source: FormatterError,
    },
}
