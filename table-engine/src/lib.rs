//! FILENAME: table-engine/src/lib.rs
//! Binned table conversion.
//!
//! Turns declarative table definitions backed by binned grid sources into
//! formatted tables ready for publication-data export.
//!
//! Layers:
//! - `definition`: What the table IS (headers, inputs, formatters)
//! - `formatter`: How raw bin data becomes cells, plus the name registry
//! - `engine`: HOW we convert (bin enumeration, validation, formatting)
//! - `view`: WHAT comes out (aligned columns of formatted cells)
//! - `channel`: The standard data + samples table of a fit channel

pub mod channel;
pub mod definition;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod view;


pub use channel::{channel_table, ChannelSample, SystematicVariation};
pub use definition::*;
pub use engine::{convert_table, TableConverter};
pub use error::{ConversionError, FormatterError};
pub use formatter::{
    CustomFormatter, DepInfo, DependentFormatFn, DependentFormatter, ErrorConfig, FormatterArgs,
    FormatterRegistry, IndependentFormatFn, IndependentFormatter,
};
pub use view::*;
