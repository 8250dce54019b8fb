//! FILENAME: table-engine/src/engine.rs
//! Table Engine - turns a TableDefinition into a ConvertedTable.
//!
//! The binning of the whole table comes from one reference source: the
//! first input of the first dependent variable. Its bins are enumerated
//! once (x outermost, z innermost) and every column is produced by walking
//! that same enumeration, so position `i` of every column describes the
//! same bin.
//!
//! Conversion is all-or-nothing: any validation or formatter failure
//! aborts before a table is returned.

use std::fmt;

use grid::{Axis, BinCoord, BinRange, GridShape, GridSource, MAX_DIMENSION};
use log::{Level, Log, Metadata, Record};
use smallvec::SmallVec;

use crate::definition::{DependentVariableSpec, NamedSource, TableDefinition};
use crate::error::ConversionError;
use crate::formatter::DepInfo;
use crate::view::{ConvertedTable, DependentColumn, IndependentColumn};

const LOG_TARGET: &str = "table_engine";

// ============================================================================
// BIN ENUMERATION
// ============================================================================

/// The bin coordinates of a table and the bin range of each coordinate
/// along every meaningful axis, in enumeration order.
#[derive(Debug, Clone)]
struct BinGrid {
    coords: Vec<BinCoord>,
    ranges: Vec<SmallVec<[BinRange; MAX_DIMENSION]>>,
}

impl BinGrid {
    fn enumerate(reference: &NamedSource, shape: &GridShape) -> Result<Self, ConversionError> {
        let source = reference.source.as_ref();
        let dimension = shape.dimension();
        let total = shape.total_bins();

        let mut grid = BinGrid {
            coords: Vec::with_capacity(total),
            ranges: Vec::with_capacity(total),
        };

        for x in 1..=shape.bins(Axis::X) {
            for y in 1..=shape.bins(Axis::Y) {
                for z in 1..=shape.bins(Axis::Z) {
                    let coord = BinCoord::new(&[x, y, z][..dimension]);
                    let mut ranges = SmallVec::new();
                    for axis in &Axis::ALL[..dimension] {
                        let range = source.bin_range(*axis, coord.get(*axis)).ok_or_else(|| {
                            ConversionError::BinOutOfRange {
                                input: reference.name.clone(),
                                coord: coord.clone(),
                            }
                        })?;
                        ranges.push(range);
                    }
                    grid.coords.push(coord);
                    grid.ranges.push(ranges);
                }
            }
        }

        Ok(grid)
    }
}

// ============================================================================
// TABLE CONVERTER
// ============================================================================

/// Converts table definitions, reporting progress to an explicit logger.
pub struct TableConverter<'a> {
    logger: &'a dyn Log,
}

impl TableConverter<'static> {
    /// A converter that logs through whatever logger the `log` facade has
    /// installed (a no-op when there is none).
    pub fn new() -> Self {
        TableConverter {
            logger: log::logger(),
        }
    }
}

impl Default for TableConverter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TableConverter<'a> {
    pub fn with_logger(logger: &'a dyn Log) -> Self {
        TableConverter { logger }
    }

    /// Executes the full conversion and returns the formatted table.
    pub fn convert(&self, definition: &TableDefinition) -> Result<ConvertedTable, ConversionError> {
        // Step 1: Pick the reference source
        let reference = definition
            .reference_source()
            .ok_or(ConversionError::MissingReferenceSource)?;
        let dimension = reference.source.dimension();
        if dimension == 0 || dimension > MAX_DIMENSION {
            return Err(ConversionError::UnsupportedDimension {
                input: reference.name.clone(),
                dimension,
            });
        }
        let shape = reference.source.shape();

        // Step 2: Check every input agrees with it
        self.validate(definition, &shape)?;

        // Step 3: Enumerate bins
        let grid = BinGrid::enumerate(reference, &shape)?;
        self.log(
            Level::Debug,
            format_args!(
                "converting table {:?}: {} bins ({}), {} independent, {} dependent variables",
                definition.name.as_deref().unwrap_or(""),
                grid.coords.len(),
                shape,
                definition.independent_variables.len(),
                definition.dependent_variables.len(),
            ),
        );

        // Step 4: Independent variables, one axis each
        let mut independent_variables = Vec::with_capacity(definition.independent_variables.len());
        for (axis_index, spec) in definition.independent_variables.iter().enumerate() {
            let values = grid
                .ranges
                .iter()
                .map(|ranges| spec.formatter.format(&ranges[axis_index]))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| ConversionError::Formatter {
                    variable: spec.header.name.clone(),
                    source,
                })?;
            independent_variables.push(IndependentColumn {
                header: spec.header.clone(),
                values,
            });
        }

        // Step 5: Dependent variables
        let mut dependent_variables = Vec::with_capacity(definition.dependent_variables.len());
        for spec in &definition.dependent_variables {
            dependent_variables.push(self.convert_dependent(spec, &grid)?);
        }

        Ok(ConvertedTable {
            name: definition.name.clone(),
            independent_variables,
            dependent_variables,
        })
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    fn validate(&self, definition: &TableDefinition, shape: &GridShape) -> Result<(), ConversionError> {
        let declared = definition.independent_variables.len();
        if declared > shape.dimension() {
            return Err(ConversionError::TooManyIndependentVariables {
                declared,
                dimension: shape.dimension(),
            });
        }
        if declared < shape.dimension() {
            self.log(
                Level::Warn,
                format_args!(
                    "table {:?} declares {} independent variable(s) for a {} binning; remaining axes are not labelled",
                    definition.name.as_deref().unwrap_or(""),
                    declared,
                    shape,
                ),
            );
        }

        for spec in &definition.dependent_variables {
            let variable = &spec.header.name;
            if spec.inputs.is_empty() {
                return Err(ConversionError::NoInputs {
                    variable: variable.clone(),
                });
            }
            for (i, input) in spec.inputs.iter().enumerate() {
                if spec.inputs[..i].iter().any(|other| other.name == input.name) {
                    return Err(ConversionError::DuplicateInput {
                        variable: variable.clone(),
                        input: input.name.clone(),
                    });
                }
                let dimension = input.source.dimension();
                if dimension == 0 || dimension > MAX_DIMENSION {
                    return Err(ConversionError::UnsupportedDimension {
                        input: input.name.clone(),
                        dimension,
                    });
                }
                let found = input.source.shape();
                if dimension != shape.dimension() || &found != shape {
                    return Err(ConversionError::DimensionMismatch {
                        variable: variable.clone(),
                        input: input.name.clone(),
                        expected: shape.clone(),
                        found,
                    });
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // DEPENDENT COLUMNS
    // ========================================================================

    fn convert_dependent(
        &self,
        spec: &DependentVariableSpec,
        grid: &BinGrid,
    ) -> Result<DependentColumn, ConversionError> {
        let mut values = Vec::with_capacity(grid.coords.len());
        for coord in &grid.coords {
            let info = gather_bin(spec, coord)?;
            let cell = spec
                .formatter
                .format(&info)
                .map_err(|source| ConversionError::Formatter {
                    variable: spec.header.name.clone(),
                    source,
                })?;
            values.push(cell);
        }

        self.log(
            Level::Trace,
            format_args!(
                "formatted '{}' with {} from {} input(s)",
                spec.header.name,
                spec.formatter.name(),
                spec.inputs.len(),
            ),
        );

        Ok(DependentColumn {
            header: spec.header.clone(),
            qualifiers: spec.qualifiers.clone(),
            values,
        })
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(LOG_TARGET).build();
        if self.logger.enabled(&metadata) {
            self.logger.log(
                &Record::builder()
                    .metadata(metadata)
                    .args(args)
                    .module_path(Some(module_path!()))
                    .file(Some(file!()))
                    .line(Some(line!()))
                    .build(),
            );
        }
    }
}

/// Reads every input of `spec` at `coord`, truncating the coordinate to
/// each input's own dimension.
fn gather_bin(spec: &DependentVariableSpec, coord: &BinCoord) -> Result<DepInfo, ConversionError> {
    spec.inputs
        .iter()
        .map(|input| {
            let source: &dyn GridSource = input.source.as_ref();
            let local = coord.truncated(source.dimension());
            source
                .bin_stats(&local)
                .map(|stats| (input.name.clone(), stats))
                .ok_or_else(|| ConversionError::BinOutOfRange {
                    input: input.name.clone(),
                    coord: local,
                })
        })
        .collect()
}

/// Converts a table with the default converter.
pub fn convert_table(definition: &TableDefinition) -> Result<ConvertedTable, ConversionError> {
    TableConverter::new().convert(definition)
}
