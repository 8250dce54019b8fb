//! FILENAME: grid/src/axis.rs
//! PURPOSE: Axis identifiers and the per-axis descriptors of a binned grid.
//! CONTEXT: Bins are addressed 1-based along each axis, matching the
//! convention of the histogramming libraries the grids come from.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Highest number of axes a grid may have.
pub const MAX_DIMENSION: usize = 3;

// ============================================================================
// AXIS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; MAX_DIMENSION] = [Axis::X, Axis::Y, Axis::Z];

    /// 0-based position of the axis (x = 0, y = 1, z = 2).
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

// ============================================================================
// BIN RANGE
// ============================================================================

/// Extent of a single bin along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinRange {
    pub low: f64,
    pub width: f64,
}

impl BinRange {
    pub fn new(low: f64, width: f64) -> Self {
        BinRange { low, width }
    }

    pub fn high(&self) -> f64 {
        self.low + self.width
    }

    pub fn midpoint(&self) -> f64 {
        self.low + self.width / 2.0
    }
}

// ============================================================================
// GRID SHAPE
// ============================================================================

/// Dimension and per-axis bin counts of a grid. Two grids can be read
/// with the same bin coordinates only when their shapes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    bins: SmallVec<[usize; MAX_DIMENSION]>,
}

impl GridShape {
    /// Builds a shape from the bin counts of the meaningful axes, in axis order.
    pub fn new(bins: &[usize]) -> Self {
        GridShape {
            bins: SmallVec::from_slice(bins),
        }
    }

    pub fn dimension(&self) -> usize {
        self.bins.len()
    }

    /// Bin count along `axis`; axes beyond the dimension hold a single bin.
    pub fn bins(&self, axis: Axis) -> usize {
        self.bins.get(axis.index()).copied().unwrap_or(1)
    }

    pub fn total_bins(&self) -> usize {
        self.bins.iter().product()
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D [", self.dimension())?;
        for (i, n) in self.bins.iter().enumerate() {
            if i > 0 {
                f.write_str(" x ")?;
            }
            write!(f, "{}", n)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_range_edges() {
        let range = BinRange::new(0.0, 2.0);
        assert_eq!(range.high(), 2.0);
        assert_eq!(range.midpoint(), 1.0);

        let range = BinRange::new(10.0, 5.0);
        assert_eq!(range.high(), 15.0);
        assert_eq!(range.midpoint(), 12.5);
    }

    #[test]
    fn test_axis_index_matches_order() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
        assert_eq!(Axis::Z.to_string(), "z");
    }

    #[test]
    fn test_shape_pins_missing_axes() {
        let shape = GridShape::new(&[3, 4]);
        assert_eq!(shape.dimension(), 2);
        assert_eq!(shape.bins(Axis::X), 3);
        assert_eq!(shape.bins(Axis::Y), 4);
        assert_eq!(shape.bins(Axis::Z), 1);
        assert_eq!(shape.total_bins(), 12);
        assert_eq!(shape.to_string(), "2D [3 x 4]");
    }
}
