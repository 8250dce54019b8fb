//! FILENAME: table-engine/src/channel.rs
//! Builds the standard publication table of one fit channel: observed
//! data next to every sample's nominal prediction with its systematic
//! variations.

use std::sync::Arc;

use grid::GridSource;

use crate::definition::{DependentVariableSpec, Header, IndependentVariableSpec, TableDefinition};
use crate::formatter::{DependentFormatter, ErrorConfig};

/// Input name of the data column.
pub const DATA_INPUT: &str = "histo";

pub const DATA_COLUMN: &str = "Data";

/// One systematic of a sample, evaluated at +1 and -1 sigma.
#[derive(Debug, Clone)]
pub struct SystematicVariation {
    pub name: String,
    pub up: Arc<dyn GridSource>,
    pub down: Arc<dyn GridSource>,
}

#[derive(Debug, Clone)]
pub struct ChannelSample {
    pub name: String,
    pub nominal: Arc<dyn GridSource>,
    pub systematics: Vec<SystematicVariation>,
}

impl ChannelSample {
    pub fn new(name: impl Into<String>, nominal: Arc<dyn GridSource>) -> Self {
        ChannelSample {
            name: name.into(),
            nominal,
            systematics: Vec::new(),
        }
    }

    pub fn with_systematic(
        mut self,
        name: impl Into<String>,
        up: Arc<dyn GridSource>,
        down: Arc<dyn GridSource>,
    ) -> Self {
        self.systematics.push(SystematicVariation {
            name: name.into(),
            up,
            down,
        });
        self
    }
}

pub fn nominal_input_name(channel: &str) -> String {
    format!("nominal_{}", channel)
}

pub fn variation_input_name(systematic: &str, direction: &str) -> String {
    format!("systhist_{}_{}", systematic, direction)
}

/// The column of one sample, formatted with all its systematics.
pub fn sample_column(channel: &str, sample: &ChannelSample) -> DependentVariableSpec {
    log::warn!("preparing column for sample {}", sample.name);

    let mut spec = DependentVariableSpec::new(
        Header::new(sample.name.as_str()),
        DependentFormatter::NominalWithAllSysts,
    )
    .with_input(nominal_input_name(channel), Arc::clone(&sample.nominal));

    for systematic in &sample.systematics {
        spec = spec
            .with_input(
                variation_input_name(&systematic.name, "up"),
                Arc::clone(&systematic.up),
            )
            .with_input(
                variation_input_name(&systematic.name, "down"),
                Arc::clone(&systematic.down),
            );
    }
    spec
}

/// Data column first, then one column per sample in the given order.
/// The observable labels the single independent variable.
pub fn channel_table(
    channel: &str,
    observable: &str,
    data: Arc<dyn GridSource>,
    samples: &[ChannelSample],
) -> TableDefinition {
    let data_column = DependentVariableSpec::new(
        Header::new(DATA_COLUMN),
        DependentFormatter::Standard {
            errors: ErrorConfig::None,
        },
    )
    .with_input(DATA_INPUT, data);

    let mut table = TableDefinition::named(format!("Channel {}", channel))
        .with_independent(IndependentVariableSpec::new(Header::new(observable)))
        .with_dependent(data_column);

    for sample in samples {
        table = table.with_dependent(sample_column(channel, sample));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::convert_table;
    use crate::error::{ConversionError, FormatterError};
    use crate::view::{DependentCell, ErrorEntry, IndependentCell};
    use grid::Histogram;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    fn hist(contents: &[f64]) -> Arc<dyn GridSource> {
        let edges = Histogram::uniform_edges(contents.len(), 0.0, contents.len() as f64 * 10.0);
        Arc::new(Histogram::new("h", vec![edges], contents.to_vec()).unwrap())
    }

    #[test]
    fn test_channel_table_layout() {
        let samples = vec![
            ChannelSample::new("ttbar", hist(&[5.0, 6.0]))
                .with_systematic("jes", hist(&[6.0, 6.5]), hist(&[4.5, 5.0])),
            ChannelSample::new("wjets", hist(&[1.0, 2.0])),
        ];
        let table = channel_table("SR", "mjj", hist(&[7.0, 8.0]), &samples);

        assert_eq!(table.name.as_deref(), Some("Channel SR"));
        assert_eq!(table.independent_variables.len(), 1);
        assert_eq!(table.independent_variables[0].header.name, "mjj");

        let names: Vec<&str> = table
            .dependent_variables
            .iter()
            .map(|d| d.header.name.as_str())
            .collect();
        assert_eq!(names, vec!["Data", "ttbar", "wjets"]);

        let inputs: Vec<&str> = table.dependent_variables[1]
            .inputs
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(inputs, vec!["nominal_SR", "systhist_jes_up", "systhist_jes_down"]);
    }

    #[test]
    fn test_channel_table_converts() {
        let samples = vec![ChannelSample::new("ttbar", hist(&[5.0, 6.0]))
            .with_systematic("jes", hist(&[6.0, 6.5]), hist(&[4.5, 5.0]))];
        let table = convert_table(&channel_table("SR", "mjj", hist(&[7.0, 8.0]), &samples)).unwrap();

        assert_eq!(table.bin_count(), 2);
        assert_eq!(
            table.independent("mjj").unwrap().values,
            vec![
                IndependentCell::Range { low: 0.0, high: 10.0 },
                IndependentCell::Range { low: 10.0, high: 20.0 },
            ]
        );
        assert_eq!(
            table.dependent("Data").unwrap().values,
            vec![DependentCell::new(7.0), DependentCell::new(8.0)]
        );
        assert_eq!(
            table.dependent("ttbar").unwrap().values,
            vec![
                DependentCell::new(5.0).with_error(ErrorEntry::asymmetric(-0.5, 1.0, "jes")),
                DependentCell::new(6.0).with_error(ErrorEntry::asymmetric(-1.0, 0.5, "jes")),
            ]
        );
    }

    #[test]
    fn test_unnamed_systematic_fails_conversion() {
        let samples = vec![ChannelSample::new("signal", hist(&[1.0]))
            .with_systematic("", hist(&[2.0]), hist(&[0.5]))];
        let table = channel_table("SR", "mjj", hist(&[3.0]), &samples);
        assert_eq!(
            convert_table(&table).unwrap_err(),
            ConversionError::Formatter {
                variable: "signal".to_string(),
                source: FormatterError::UnnamedSystematic("systhist__down".to_string()),
            }
        );
    }

    struct SampleLog(Mutex<Vec<(Level, String)>>);

    impl Log for SampleLog {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.0.lock().unwrap().push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static SAMPLE_LOG: SampleLog = SampleLog(Mutex::new(Vec::new()));

    #[test]
    fn test_sample_column_logs_warning() {
        // the only test in this crate installing a global logger
        log::set_logger(&SAMPLE_LOG).unwrap();
        log::set_max_level(LevelFilter::Trace);

        sample_column("SR", &ChannelSample::new("zjets", hist(&[1.0])));

        let lines = SAMPLE_LOG.0.lock().unwrap();
        assert!(lines
            .iter()
            .any(|(level, line)| *level == Level::Warn && line == "preparing column for sample zjets"));
    }
}
