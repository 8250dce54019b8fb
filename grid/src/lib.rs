//! FILENAME: grid/src/lib.rs
//! Binned grid sources for table conversion.
//!
//! This crate holds the shared types the table engine reads from:
//! - `axis`: Axis identifiers, bin ranges and grid shapes
//! - `source`: The `GridSource` capability, bin coordinates and per-bin statistics
//! - `histogram`: An in-memory `GridSource` for already-computed 1-3D histograms

pub mod axis;
pub mod error;
pub mod histogram;
pub mod source;

pub use axis::{Axis, BinRange, GridShape, MAX_DIMENSION};
pub use error::GridError;
pub use histogram::{Histogram, HistogramErrors};
pub use source::{BinCoord, BinStats, GridSource};
