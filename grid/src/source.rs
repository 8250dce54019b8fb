//! FILENAME: grid/src/source.rs
//! The read-only capability a binned grid offers to table conversion.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::axis::{Axis, BinRange, GridShape, MAX_DIMENSION};

// ============================================================================
// BIN COORDINATE
// ============================================================================

/// 1-based bin indices along the meaningful axes of a grid, in axis order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinCoord(SmallVec<[usize; MAX_DIMENSION]>);

impl BinCoord {
    pub fn new(indices: &[usize]) -> Self {
        BinCoord(SmallVec::from_slice(indices))
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Index along `axis`; axes the coordinate does not cover are pinned to bin 1.
    pub fn get(&self, axis: Axis) -> usize {
        self.0.get(axis.index()).copied().unwrap_or(1)
    }

    /// The coordinate restricted to the first `dimension` axes.
    pub fn truncated(&self, dimension: usize) -> BinCoord {
        let end = dimension.min(self.0.len());
        BinCoord(SmallVec::from_slice(&self.0[..end]))
    }
}

impl fmt::Display for BinCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// BIN STATISTICS
// ============================================================================

/// Content and asymmetric uncertainties of one bin of one source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinStats {
    pub value: f64,
    pub error_plus: f64,
    pub error_minus: f64,
}

impl BinStats {
    pub fn new(value: f64, error_plus: f64, error_minus: f64) -> Self {
        BinStats {
            value,
            error_plus,
            error_minus,
        }
    }

    /// Stats for a bin without uncertainties.
    pub fn exact(value: f64) -> Self {
        BinStats::new(value, 0.0, 0.0)
    }
}

// ============================================================================
// GRID SOURCE
// ============================================================================

/// A regularly binned grid with 1 to 3 axes.
///
/// Bin coordinates passed to the per-bin accessors carry exactly
/// `dimension()` indices. Lookups outside the grid return `None`.
pub trait GridSource: fmt::Debug + Send + Sync {
    /// Number of meaningful axes (1, 2 or 3).
    fn dimension(&self) -> usize;

    /// Number of bins along `axis`. Axes beyond the dimension report 1.
    fn bin_count(&self, axis: Axis) -> usize;

    /// Low edge and width of bin `bin` (1-based) along `axis`.
    fn bin_range(&self, axis: Axis, bin: usize) -> Option<BinRange>;

    fn bin_content(&self, coord: &BinCoord) -> Option<f64>;

    fn bin_error_up(&self, coord: &BinCoord) -> Option<f64>;

    fn bin_error_low(&self, coord: &BinCoord) -> Option<f64>;

    fn shape(&self) -> GridShape {
        let bins: SmallVec<[usize; MAX_DIMENSION]> = Axis::ALL
            .iter()
            .take(self.dimension())
            .map(|axis| self.bin_count(*axis))
            .collect();
        GridShape::new(&bins)
    }

    fn bin_stats(&self, coord: &BinCoord) -> Option<BinStats> {
        Some(BinStats {
            value: self.bin_content(coord)?,
            error_plus: self.bin_error_up(coord)?,
            error_minus: self.bin_error_low(coord)?,
        })
    }
}
