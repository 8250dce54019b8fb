//! FILENAME: table-engine/src/formatter.rs
//! Formatters turn raw per-bin data into output cells.
//!
//! Dependent formatters receive the statistics of every input of a column
//! at one bin, keyed by input name. Independent formatters receive the bin
//! range of one axis. Built-in behaviours are tagged variants; anything
//! else is a registered function pointer resolved by name through the
//! `FormatterRegistry`.

use std::collections::BTreeMap;

use grid::{BinRange, BinStats};
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::FormatterError;
use crate::view::{DependentCell, ErrorEntry, IndependentCell};

/// Statistics of each input of a column at one bin, keyed by input name.
pub type DepInfo = BTreeMap<String, BinStats>;

/// Free-form options passed to registered formatters.
pub type FormatterArgs = BTreeMap<String, Value>;

pub type DependentFormatFn = fn(&DepInfo, &FormatterArgs) -> Result<DependentCell, FormatterError>;

pub type IndependentFormatFn = fn(&BinRange, &FormatterArgs) -> Result<IndependentCell, FormatterError>;

pub const STANDARD_FORMAT: &str = "standard_format";
pub const NOMINAL_WITH_VARIATIONS: &str = "nominal_with_variations_formatter";
pub const NOMINAL_WITH_ALL_SYSTS: &str = "nominal_with_all_systs";
pub const BIN_FORMAT: &str = "bin_format";

/// Substring that marks the nominal input for `nominal_with_all_systs`.
pub const NOMINAL_TAG: &str = "nominal";

// ============================================================================
// FORMATTER VARIANTS
// ============================================================================

/// How the single input of a standard column reports its uncertainty.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ErrorConfig {
    #[default]
    None,
    /// Mean of the upper and lower error.
    Symmetric { label: String },
    Asymmetric { label: String },
}

/// A registered formatter function together with its options.
#[derive(Debug, Clone)]
pub struct CustomFormatter<F> {
    pub name: String,
    pub func: F,
    pub args: FormatterArgs,
}

#[derive(Debug, Clone)]
pub enum DependentFormatter {
    /// Passes the value of the single input through.
    Standard { errors: ErrorConfig },
    /// Inputs `nominal`, `up` and `down` form one asymmetric band.
    NominalWithVariations { label: String },
    /// One nominal input plus any number of `<tag>_<name>_up/_down` pairs.
    NominalWithAllSysts,
    Custom(CustomFormatter<DependentFormatFn>),
}

impl Default for DependentFormatter {
    fn default() -> Self {
        DependentFormatter::Standard {
            errors: ErrorConfig::None,
        }
    }
}

impl DependentFormatter {
    pub fn format(&self, info: &DepInfo) -> Result<DependentCell, FormatterError> {
        match self {
            DependentFormatter::Standard { errors } => standard_format(info, errors),
            DependentFormatter::NominalWithVariations { label } => {
                nominal_with_variations(info, label)
            }
            DependentFormatter::NominalWithAllSysts => nominal_with_all_systs(info),
            DependentFormatter::Custom(custom) => (custom.func)(info, &custom.args),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DependentFormatter::Standard { .. } => STANDARD_FORMAT,
            DependentFormatter::NominalWithVariations { .. } => NOMINAL_WITH_VARIATIONS,
            DependentFormatter::NominalWithAllSysts => NOMINAL_WITH_ALL_SYSTS,
            DependentFormatter::Custom(custom) => &custom.name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum IndependentFormatter {
    /// `{low, high}` of the bin.
    #[default]
    Edges,
    /// `{value}` at the bin centre.
    Midpoint,
    Custom(CustomFormatter<IndependentFormatFn>),
}

impl IndependentFormatter {
    pub fn format(&self, range: &BinRange) -> Result<IndependentCell, FormatterError> {
        match self {
            IndependentFormatter::Edges => Ok(bin_edges(range)),
            IndependentFormatter::Midpoint => Ok(bin_midpoint(range)),
            IndependentFormatter::Custom(custom) => (custom.func)(range, &custom.args),
        }
    }
}

// ============================================================================
// BUILT-IN FORMATTERS
// ============================================================================

pub fn standard_format(info: &DepInfo, errors: &ErrorConfig) -> Result<DependentCell, FormatterError> {
    let stats = match info.len() {
        0 => return Err(FormatterError::EmptyInputs),
        1 => info.values().next().ok_or(FormatterError::EmptyInputs)?,
        found => {
            return Err(FormatterError::UnexpectedInputCount { expected: 1, found });
        }
    };

    let cell = DependentCell::new(stats.value);
    Ok(match errors {
        ErrorConfig::None => cell,
        ErrorConfig::Symmetric { label } => cell.with_error(ErrorEntry::symmetric(
            (stats.error_plus + stats.error_minus) / 2.0,
            label.as_str(),
        )),
        ErrorConfig::Asymmetric { label } => cell.with_error(ErrorEntry::asymmetric(
            -stats.error_minus,
            stats.error_plus,
            label.as_str(),
        )),
    })
}

pub fn nominal_with_variations(info: &DepInfo, label: &str) -> Result<DependentCell, FormatterError> {
    let value_of = |key: &str| {
        info.get(key)
            .map(|stats| stats.value)
            .ok_or_else(|| FormatterError::MissingInput(key.to_string()))
    };
    let nominal = value_of("nominal")?;
    let up = value_of("up")?;
    let down = value_of("down")?;

    Ok(DependentCell::new(nominal)
        .with_error(ErrorEntry::asymmetric(down - nominal, up - nominal, label)))
}

pub fn nominal_with_all_systs(info: &DepInfo) -> Result<DependentCell, FormatterError> {
    let is_nominal = |key: &&String| key.contains(NOMINAL_TAG);
    let mut nominal_keys = info.keys().filter(is_nominal);
    let nominal_key = nominal_keys.next().ok_or(FormatterError::MissingNominal)?;
    if nominal_keys.next().is_some() {
        return Err(FormatterError::AmbiguousNominal(
            info.keys().filter(is_nominal).cloned().collect(),
        ));
    }
    let nominal = info[nominal_key].value;

    // systematic name -> (up, down)
    let mut variations: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (key, stats) in info {
        if key == nominal_key {
            continue;
        }
        let Some((systematic, is_up)) = split_variation(key)? else {
            continue;
        };
        let entry = variations.entry(systematic).or_default();
        if is_up {
            entry.0 = Some(stats.value);
        } else {
            entry.1 = Some(stats.value);
        }
    }

    let mut cell = DependentCell::new(nominal);
    for (systematic, (up, down)) in variations {
        let missing = |direction: &str| FormatterError::MissingVariation {
            systematic: systematic.to_string(),
            direction: direction.to_string(),
        };
        let up = up.ok_or_else(|| missing("up"))?;
        let down = down.ok_or_else(|| missing("down"))?;
        cell = cell.with_error(ErrorEntry::asymmetric(
            down - nominal,
            up - nominal,
            systematic,
        ));
    }
    Ok(cell)
}

/// Splits `<tag>_<name>_up` / `<tag>_<name>_down` into the systematic name
/// and whether it is the up variation. The name may contain underscores
/// but must not be empty.
fn split_variation(key: &str) -> Result<Option<(&str, bool)>, FormatterError> {
    let (stem, is_up) = if let Some(stem) = key.strip_suffix("_up") {
        (stem, true)
    } else if let Some(stem) = key.strip_suffix("_down") {
        (stem, false)
    } else {
        return Ok(None);
    };
    let Some((_, systematic)) = stem.split_once('_') else {
        return Ok(None);
    };
    if systematic.is_empty() {
        return Err(FormatterError::UnnamedSystematic(key.to_string()));
    }
    Ok(Some((systematic, is_up)))
}

pub fn bin_edges(range: &BinRange) -> IndependentCell {
    IndependentCell::Range {
        low: range.low,
        high: range.high(),
    }
}

pub fn bin_midpoint(range: &BinRange) -> IndependentCell {
    IndependentCell::Value {
        value: range.midpoint(),
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

type DependentBuilder = fn(&FormatterArgs) -> Result<DependentFormatter, FormatterError>;
type IndependentBuilder = fn(&FormatterArgs) -> Result<IndependentFormatter, FormatterError>;

/// Resolves formatter names (as written in conversion configs) into
/// formatters. Built-in names are always present; custom functions can be
/// registered next to them.
pub struct FormatterRegistry {
    builtin_dependent: FxHashMap<&'static str, DependentBuilder>,
    builtin_independent: FxHashMap<&'static str, IndependentBuilder>,
    custom_dependent: FxHashMap<String, DependentFormatFn>,
    custom_independent: FxHashMap<String, IndependentFormatFn>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        let mut builtin_dependent: FxHashMap<&'static str, DependentBuilder> = FxHashMap::default();
        builtin_dependent.insert(STANDARD_FORMAT, build_standard);
        builtin_dependent.insert(NOMINAL_WITH_VARIATIONS, build_nominal_with_variations);
        builtin_dependent.insert(NOMINAL_WITH_ALL_SYSTS, |_| {
            Ok(DependentFormatter::NominalWithAllSysts)
        });

        let mut builtin_independent: FxHashMap<&'static str, IndependentBuilder> =
            FxHashMap::default();
        builtin_independent.insert(BIN_FORMAT, build_bin_format);

        FormatterRegistry {
            builtin_dependent,
            builtin_independent,
            custom_dependent: FxHashMap::default(),
            custom_independent: FxHashMap::default(),
        }
    }

    /// Registers a dependent formatter. Built-in names cannot be shadowed;
    /// returns false if `name` is taken.
    pub fn register_dependent(&mut self, name: impl Into<String>, func: DependentFormatFn) -> bool {
        let name = name.into();
        if self.has_dependent(&name) {
            return false;
        }
        self.custom_dependent.insert(name, func);
        true
    }

    pub fn register_independent(&mut self, name: impl Into<String>, func: IndependentFormatFn) -> bool {
        let name = name.into();
        if self.has_independent(&name) {
            return false;
        }
        self.custom_independent.insert(name, func);
        true
    }

    pub fn has_dependent(&self, name: &str) -> bool {
        self.builtin_dependent.contains_key(name) || self.custom_dependent.contains_key(name)
    }

    pub fn has_independent(&self, name: &str) -> bool {
        self.builtin_independent.contains_key(name) || self.custom_independent.contains_key(name)
    }

    pub fn dependent(&self, name: &str, args: &FormatterArgs) -> Result<DependentFormatter, FormatterError> {
        if let Some(build) = self.builtin_dependent.get(name) {
            return build(args);
        }
        self.custom_dependent
            .get(name)
            .map(|func| {
                DependentFormatter::Custom(CustomFormatter {
                    name: name.to_string(),
                    func: *func,
                    args: args.clone(),
                })
            })
            .ok_or_else(|| FormatterError::UnknownFormatter(name.to_string()))
    }

    pub fn independent(&self, name: &str, args: &FormatterArgs) -> Result<IndependentFormatter, FormatterError> {
        if let Some(build) = self.builtin_independent.get(name) {
            return build(args);
        }
        self.custom_independent
            .get(name)
            .map(|func| {
                IndependentFormatter::Custom(CustomFormatter {
                    name: name.to_string(),
                    func: *func,
                    args: args.clone(),
                })
            })
            .ok_or_else(|| FormatterError::UnknownFormatter(name.to_string()))
    }
}

/// Reads an optional string argument. `null` counts as absent.
fn string_arg<'a>(
    formatter: &str,
    args: &'a FormatterArgs,
    argument: &str,
) -> Result<Option<&'a str>, FormatterError> {
    match args.get(argument) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(FormatterError::InvalidArgument {
            formatter: formatter.to_string(),
            argument: argument.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn required_string_arg(
    formatter: &str,
    args: &FormatterArgs,
    argument: &str,
) -> Result<String, FormatterError> {
    string_arg(formatter, args, argument)?
        .map(str::to_string)
        .ok_or_else(|| FormatterError::MissingArgument {
            formatter: formatter.to_string(),
            argument: argument.to_string(),
        })
}

fn build_standard(args: &FormatterArgs) -> Result<DependentFormatter, FormatterError> {
    let errors = match string_arg(STANDARD_FORMAT, args, "error_config")? {
        None => ErrorConfig::None,
        Some("symmetric") => ErrorConfig::Symmetric {
            label: required_string_arg(STANDARD_FORMAT, args, "label")?,
        },
        Some("asymmetric") => ErrorConfig::Asymmetric {
            label: required_string_arg(STANDARD_FORMAT, args, "label")?,
        },
        Some(other) => {
            return Err(FormatterError::InvalidArgument {
                formatter: STANDARD_FORMAT.to_string(),
                argument: "error_config".to_string(),
                reason: format!("unknown error config '{}'", other),
            });
        }
    };
    Ok(DependentFormatter::Standard { errors })
}

fn build_nominal_with_variations(args: &FormatterArgs) -> Result<DependentFormatter, FormatterError> {
    Ok(DependentFormatter::NominalWithVariations {
        label: required_string_arg(NOMINAL_WITH_VARIATIONS, args, "label")?,
    })
}

fn build_bin_format(args: &FormatterArgs) -> Result<IndependentFormatter, FormatterError> {
    match string_arg(BIN_FORMAT, args, "style")? {
        None | Some("edges") => Ok(IndependentFormatter::Edges),
        Some("central_value") => Ok(IndependentFormatter::Midpoint),
        Some(other) => Err(FormatterError::InvalidArgument {
            formatter: BIN_FORMAT.to_string(),
            argument: "style".to_string(),
            reason: format!("unknown style '{}'", other),
        }),
    }
}
