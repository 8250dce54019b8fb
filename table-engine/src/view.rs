//! FILENAME: table-engine/src/view.rs
//! Converted table - the formatted output of a conversion.
//!
//! Every column holds one cell per bin coordinate and all columns are
//! positionally aligned. The serialized form is the HepData table schema.

use serde::{Deserialize, Serialize};

use crate::definition::{Header, Qualifier};

// ============================================================================
// CELLS
// ============================================================================

/// Formatted bin range of an independent variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndependentCell {
    Range { low: f64, high: f64 },
    Value { value: f64 },
}

/// Shape of one uncertainty on a dependent value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Uncertainty {
    #[serde(rename = "symerror")]
    Symmetric(f64),
    #[serde(rename = "asymerror")]
    Asymmetric { minus: f64, plus: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    #[serde(flatten)]
    pub uncertainty: Uncertainty,
    pub label: String,
}

impl ErrorEntry {
    pub fn symmetric(error: f64, label: impl Into<String>) -> Self {
        ErrorEntry {
            uncertainty: Uncertainty::Symmetric(error),
            label: label.into(),
        }
    }

    pub fn asymmetric(minus: f64, plus: f64, label: impl Into<String>) -> Self {
        ErrorEntry {
            uncertainty: Uncertainty::Asymmetric { minus, plus },
            label: label.into(),
        }
    }
}

/// Formatted value of a dependent variable at one bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentCell {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

impl DependentCell {
    pub fn new(value: f64) -> Self {
        DependentCell {
            value,
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: ErrorEntry) -> Self {
        self.errors.push(error);
        self
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentColumn {
    pub header: Header,
    pub values: Vec<IndependentCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentColumn {
    pub header: Header,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    pub values: Vec<DependentCell>,
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub independent_variables: Vec<IndependentColumn>,
    pub dependent_variables: Vec<DependentColumn>,
}

impl ConvertedTable {
    /// Number of bin coordinates the table covers.
    pub fn bin_count(&self) -> usize {
        self.dependent_variables
            .first()
            .map(|c| c.values.len())
            .unwrap_or(0)
    }

    pub fn dependent(&self, name: &str) -> Option<&DependentColumn> {
        self.dependent_variables.iter().find(|c| c.header.name == name)
    }

    pub fn independent(&self, name: &str) -> Option<&IndependentColumn> {
        self.independent_variables.iter().find(|c| c.header.name == name)
    }
}
