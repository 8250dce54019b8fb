//! FILENAME: grid/src/histogram.rs
//! In-memory grid source holding already-computed bin contents and errors.
//!
//! Contents are stored row-major: x is the outermost axis and the last
//! declared axis varies fastest. Nothing here fills, rebins or scales;
//! the histogram only exposes the numbers it was built from.

use serde::{Deserialize, Serialize};

use crate::axis::{Axis, BinRange, MAX_DIMENSION};
use crate::error::GridError;
use crate::source::{BinCoord, GridSource};

// ============================================================================
// ERRORS
// ============================================================================

/// Per-bin uncertainties of a histogram.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HistogramErrors {
    /// sqrt(|content|) in both directions.
    #[default]
    Poisson,
    /// The same error up and down.
    Symmetric(Vec<f64>),
    Asymmetric { up: Vec<f64>, low: Vec<f64> },
}

// ============================================================================
// HISTOGRAM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramData", into = "HistogramData")]
pub struct Histogram {
    name: String,
    edges: Vec<Vec<f64>>,
    contents: Vec<f64>,
    errors: HistogramErrors,
}

/// Unvalidated wire form of a histogram. `errors` alone means symmetric
/// errors, `errors_up` with `errors_low` asymmetric ones, none of them Poisson.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistogramData {
    #[serde(default)]
    name: String,
    edges: Vec<Vec<f64>>,
    contents: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors_up: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors_low: Option<Vec<f64>>,
}

impl TryFrom<HistogramData> for Histogram {
    type Error = GridError;

    fn try_from(data: HistogramData) -> Result<Self, Self::Error> {
        let errors = match (data.errors, data.errors_up, data.errors_low) {
            (None, None, None) => HistogramErrors::Poisson,
            (Some(values), None, None) => HistogramErrors::Symmetric(values),
            (None, Some(up), Some(low)) => HistogramErrors::Asymmetric { up, low },
            _ => return Err(GridError::ConflictingErrors),
        };
        Histogram::new(data.name, data.edges, data.contents)?.with_errors(errors)
    }
}

impl From<Histogram> for HistogramData {
    fn from(histogram: Histogram) -> Self {
        let (errors, errors_up, errors_low) = match histogram.errors {
            HistogramErrors::Poisson => (None, None, None),
            HistogramErrors::Symmetric(values) => (Some(values), None, None),
            HistogramErrors::Asymmetric { up, low } => (None, Some(up), Some(low)),
        };
        HistogramData {
            name: histogram.name,
            edges: histogram.edges,
            contents: histogram.contents,
            errors,
            errors_up,
            errors_low,
        }
    }
}

impl Histogram {
    /// Creates a histogram with Poisson errors.
    ///
    /// # Arguments
    /// * `edges` - One strictly increasing edge list per axis (1 to 3 axes).
    /// * `contents` - Row-major bin contents, x outermost.
    pub fn new(
        name: impl Into<String>,
        edges: Vec<Vec<f64>>,
        contents: Vec<f64>,
    ) -> Result<Self, GridError> {
        if edges.is_empty() || edges.len() > MAX_DIMENSION {
            return Err(GridError::UnsupportedDimension(edges.len()));
        }
        for (axis, axis_edges) in Axis::ALL.iter().zip(&edges) {
            if axis_edges.len() < 2 {
                return Err(GridError::TooFewEdges {
                    axis: *axis,
                    found: axis_edges.len(),
                });
            }
            if let Some(index) = axis_edges.windows(2).position(|w| !(w[1] > w[0])) {
                return Err(GridError::UnsortedEdges {
                    axis: *axis,
                    index: index + 1,
                });
            }
        }

        let expected: usize = edges.iter().map(|e| e.len() - 1).product();
        if contents.len() != expected {
            return Err(GridError::ContentLength {
                expected,
                found: contents.len(),
            });
        }

        Ok(Histogram {
            name: name.into(),
            edges,
            contents,
            errors: HistogramErrors::Poisson,
        })
    }

    /// Replaces the errors, checking they cover every bin.
    pub fn with_errors(mut self, errors: HistogramErrors) -> Result<Self, GridError> {
        let expected = self.contents.len();
        let check = |values: &Vec<f64>| {
            if values.len() == expected {
                Ok(())
            } else {
                Err(GridError::ErrorLength {
                    expected,
                    found: values.len(),
                })
            }
        };
        match &errors {
            HistogramErrors::Poisson => {}
            HistogramErrors::Symmetric(values) => check(values)?,
            HistogramErrors::Asymmetric { up, low } => {
                check(up)?;
                check(low)?;
            }
        }
        self.errors = errors;
        Ok(self)
    }

    /// `bins + 1` equally spaced edges between `low` and `high`.
    pub fn uniform_edges(bins: usize, low: f64, high: f64) -> Vec<f64> {
        let width = (high - low) / bins as f64;
        (0..=bins).map(|i| low + i as f64 * width).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self, axis: Axis) -> Option<&[f64]> {
        self.edges.get(axis.index()).map(Vec::as_slice)
    }

    fn flat_index(&self, coord: &BinCoord) -> Option<usize> {
        if coord.dimension() != self.edges.len() {
            return None;
        }
        let mut flat = 0;
        for (index, axis_edges) in coord.indices().iter().zip(&self.edges) {
            let n = axis_edges.len() - 1;
            if *index == 0 || *index > n {
                return None;
            }
            flat = flat * n + (index - 1);
        }
        Some(flat)
    }
}

impl GridSource for Histogram {
    fn dimension(&self) -> usize {
        self.edges.len()
    }

    fn bin_count(&self, axis: Axis) -> usize {
        self.edges
            .get(axis.index())
            .map(|e| e.len() - 1)
            .unwrap_or(1)
    }

    fn bin_range(&self, axis: Axis, bin: usize) -> Option<BinRange> {
        let axis_edges = self.edges(axis)?;
        if bin == 0 || bin >= axis_edges.len() {
            return None;
        }
        let low = axis_edges[bin - 1];
        Some(BinRange::new(low, axis_edges[bin] - low))
    }

    fn bin_content(&self, coord: &BinCoord) -> Option<f64> {
        self.flat_index(coord).map(|i| self.contents[i])
    }

    fn bin_error_up(&self, coord: &BinCoord) -> Option<f64> {
        let i = self.flat_index(coord)?;
        Some(match &self.errors {
            HistogramErrors::Poisson => self.contents[i].abs().sqrt(),
            HistogramErrors::Symmetric(values) => values[i],
            HistogramErrors::Asymmetric { up, .. } => up[i],
        })
    }

    fn bin_error_low(&self, coord: &BinCoord) -> Option<f64> {
        let i = self.flat_index(coord)?;
        Some(match &self.errors {
            HistogramErrors::Poisson => self.contents[i].abs().sqrt(),
            HistogramErrors::Symmetric(values) => values[i],
            HistogramErrors::Asymmetric { low, .. } => low[i],
        })
    }
}
