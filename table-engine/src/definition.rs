//! FILENAME: table-engine/src/definition.rs
//! Table Definition - what a converted table should contain.
//!
//! A definition names the output axes (independent variables) and output
//! columns (dependent variables). Each dependent variable reads one or more
//! named grid sources and formats their per-bin statistics into a cell.
//!
//! Definitions hold live `GridSource` handles, so unlike the converted
//! table they are not serializable; `hepdata-format` builds them from
//! YAML conversion configs.

use std::fmt;
use std::sync::Arc;

use grid::GridSource;
use serde::{Deserialize, Serialize};

use crate::formatter::{DependentFormatter, IndependentFormatter};

// ============================================================================
// HEADERS AND QUALIFIERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Header {
    pub fn new(name: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            units: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualifierValue {
    Number(f64),
    Text(String),
}

impl From<f64> for QualifierValue {
    fn from(value: f64) -> Self {
        QualifierValue::Number(value)
    }
}

impl From<&str> for QualifierValue {
    fn from(value: &str) -> Self {
        QualifierValue::Text(value.to_string())
    }
}

/// Extra metadata attached to a dependent column (e.g. `SQRT(S)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    pub value: QualifierValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

// ============================================================================
// INPUTS
// ============================================================================

/// A grid source under the name formatters see it by.
#[derive(Clone)]
pub struct NamedSource {
    pub name: String,
    pub source: Arc<dyn GridSource>,
}

impl fmt::Debug for NamedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedSource")
            .field("name", &self.name)
            .field("shape", &self.source.shape())
            .finish()
    }
}

// ============================================================================
// VARIABLE SPECS
// ============================================================================

/// An output axis. Its values come from the bin ranges of the matching
/// axis of the table's reference source.
#[derive(Debug, Clone)]
pub struct IndependentVariableSpec {
    pub header: Header,
    pub formatter: IndependentFormatter,
}

impl IndependentVariableSpec {
    pub fn new(header: Header) -> Self {
        IndependentVariableSpec {
            header,
            formatter: IndependentFormatter::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: IndependentFormatter) -> Self {
        self.formatter = formatter;
        self
    }
}

/// An output column fed by named inputs.
#[derive(Debug, Clone)]
pub struct DependentVariableSpec {
    pub header: Header,
    pub qualifiers: Vec<Qualifier>,
    /// Inputs in declaration order. The first input of the first
    /// dependent variable fixes the table's binning.
    pub inputs: Vec<NamedSource>,
    pub formatter: DependentFormatter,
}

impl DependentVariableSpec {
    pub fn new(header: Header, formatter: DependentFormatter) -> Self {
        DependentVariableSpec {
            header,
            qualifiers: Vec::new(),
            inputs: Vec::new(),
            formatter,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, source: Arc<dyn GridSource>) -> Self {
        self.inputs.push(NamedSource {
            name: name.into(),
            source,
        });
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TableDefinition {
    pub name: Option<String>,
    pub independent_variables: Vec<IndependentVariableSpec>,
    pub dependent_variables: Vec<DependentVariableSpec>,
}

impl TableDefinition {
    pub fn new() -> Self {
        TableDefinition::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        TableDefinition {
            name: Some(name.into()),
            ..TableDefinition::default()
        }
    }

    pub fn with_independent(mut self, spec: IndependentVariableSpec) -> Self {
        self.independent_variables.push(spec);
        self
    }

    pub fn with_dependent(mut self, spec: DependentVariableSpec) -> Self {
        self.dependent_variables.push(spec);
        self
    }

    /// The source whose binning drives the whole table, if any.
    pub fn reference_source(&self) -> Option<&NamedSource> {
        self.dependent_variables.first()?.inputs.first()
    }
}
