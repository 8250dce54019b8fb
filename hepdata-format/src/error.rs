//! FILENAME: hepdata-format/src/error.rs

use table_engine::{ConversionError, FormatterError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HepDataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Formatter of '{variable}': {source}")]
    Formatter {
        variable: String,
        #[source]
        source: FormatterError,
    },

    #[error("Invalid source identifier '{0}' (expected file:path)")]
    InvalidIdentifier(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),
}
