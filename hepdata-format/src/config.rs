//! FILENAME: hepdata-format/src/config.rs
//! YAML conversion configs and their resolution into table definitions.
//!
//! A config file is a list of tables. Each dependent variable names its
//! inputs as `file:path` identifiers and optionally a formatter with
//! arguments; independent variables may name a bin formatter.
//!
//! ```yaml
//! - name: Signal region
//!   independent_variables:
//!     - header: {name: m_jj, units: GeV}
//!   dependent_variables:
//!     - header: {name: Data}
//!       conversion:
//!         inputs: {histo: "hists.yaml:data_SR"}
//!         formatter: standard_format
//!         formatter_args: {error_config: symmetric, label: stat}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use table_engine::formatter::{BIN_FORMAT, STANDARD_FORMAT};
use table_engine::{
    DependentVariableSpec, FormatterArgs, FormatterRegistry, Header, IndependentVariableSpec,
    Qualifier, TableDefinition,
};

use crate::error::HepDataError;
use crate::resolver::{SourceId, SourceResolver};

// ============================================================================
// CONFIG TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub formatter: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formatter_args: FormatterArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentConfig {
    pub header: Header,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion: Option<FormatterConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentConversion {
    /// Input name -> `file:path` identifier. Inputs are attached in name
    /// order, so the alphabetically first input of the first dependent
    /// variable fixes the table's binning.
    pub inputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formatter_args: FormatterArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentConfig {
    pub header: Header,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    pub conversion: DependentConversion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub independent_variables: Vec<IndependentConfig>,
    pub dependent_variables: Vec<DependentConfig>,
}

// ============================================================================
// LOADING
// ============================================================================

pub fn parse_configs(yaml: &str) -> Result<Vec<TableConfig>, HepDataError> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_configs(path: &Path) -> Result<Vec<TableConfig>, HepDataError> {
    let text = fs::read_to_string(path)?;
    parse_configs(&text)
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves every input and formatter name of `config`.
pub fn build_definition(
    config: &TableConfig,
    resolver: &mut dyn SourceResolver,
    registry: &FormatterRegistry,
) -> Result<TableDefinition, HepDataError> {
    let mut definition = TableDefinition {
        name: config.name.clone(),
        ..TableDefinition::default()
    };

    for indep in &config.independent_variables {
        let mut spec = IndependentVariableSpec::new(indep.header.clone());
        if let Some(conversion) = &indep.conversion {
            spec.formatter = registry
                .independent(&conversion.formatter, &conversion.formatter_args)
                .map_err(|source| HepDataError::Formatter {
                    variable: indep.header.name.clone(),
                    source,
                })?;
        } else {
            log::trace!("'{}' uses {}", indep.header.name, BIN_FORMAT);
        }
        definition.independent_variables.push(spec);
    }

    for dep in &config.dependent_variables {
        let conversion = &dep.conversion;
        let formatter_name = conversion.formatter.as_deref().unwrap_or(STANDARD_FORMAT);
        let formatter = registry
            .dependent(formatter_name, &conversion.formatter_args)
            .map_err(|source| HepDataError::Formatter {
                variable: dep.header.name.clone(),
                source,
            })?;

        let mut spec = DependentVariableSpec::new(dep.header.clone(), formatter);
        spec.qualifiers = dep.qualifiers.clone();
        for (name, identifier) in &conversion.inputs {
            let id: SourceId = identifier.parse()?;
            spec = spec.with_input(name.as_str(), resolver.resolve(&id)?);
        }
        definition.dependent_variables.push(spec);
    }

    Ok(definition)
}
