//! FILENAME: hepdata-format/src/lib.rs
//! HepData export boundary.
//!
//! Loads YAML conversion configs, resolves their `file:path` inputs into
//! grid sources, runs the table engine and writes one `data{i}.yaml` per
//! table.

mod error;

pub mod config;
pub mod resolver;
pub mod writer;

pub use config::{build_definition, load_configs, parse_configs, TableConfig};
pub use error::HepDataError;
pub use resolver::{HistogramFileResolver, SourceId, SourceResolver};
pub use writer::{table_file_name, to_yaml_string, write_tables};

use std::path::{Path, PathBuf};

use table_engine::{ConvertedTable, FormatterRegistry, TableConverter};

/// Builds and converts every table of a config. Stops at the first failure.
pub fn convert_configs(
    configs: &[TableConfig],
    resolver: &mut dyn SourceResolver,
    registry: &FormatterRegistry,
) -> Result<Vec<ConvertedTable>, HepDataError> {
    let converter = TableConverter::new();
    let mut tables = Vec::with_capacity(configs.len());
    for config in configs {
        let definition = build_definition(config, resolver, registry)?;
        tables.push(converter.convert(&definition)?);
    }
    Ok(tables)
}

/// Reads the config at `config_path`, resolves histogram files relative
/// to `workdir` and writes the converted tables into `outdir`.
///
/// With `workdir` set to `None`, input files are looked up next to the
/// config file, not in the process's current directory. Pass
/// `Some(Path::new("."))` to resolve against the current directory.
pub fn convert_config_file(
    config_path: &Path,
    workdir: Option<&Path>,
    outdir: &Path,
    registry: &FormatterRegistry,
) -> Result<Vec<PathBuf>, HepDataError> {
    let configs = load_configs(config_path)?;
    let workdir = match workdir {
        Some(dir) => dir.to_path_buf(),
        None => config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let mut resolver = HistogramFileResolver::new(workdir);
    let tables = convert_configs(&configs, &mut resolver, registry)?;
    write_tables(outdir, &tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use table_engine::{DependentCell, ErrorEntry, IndependentCell};

    const HISTS: &str = "
data:
  edges: [[0.0, 50.0, 100.0]]
  contents: [12.0, 7.0]
  errors: [3.0, 2.0]
sig:
  edges: [[0.0, 50.0, 100.0]]
  contents: [5.0, 4.0]
sig_up:
  edges: [[0.0, 50.0, 100.0]]
  contents: [7.0, 4.5]
sig_down:
  edges: [[0.0, 50.0, 100.0]]
  contents: [3.0, 3.0]
coarse:
  edges: [[0.0, 100.0]]
  contents: [19.0]
";

    const CONFIG: &str = r#"
- name: Channel SR
  independent_variables:
    - header: {name: m_jj, units: GeV}
  dependent_variables:
    - header: {name: Data}
      conversion:
        inputs: {histo: "hists/sr.yaml:data"}
        formatter_args: {error_config: symmetric, label: stat}
    - header: {name: Signal}
      conversion:
        inputs:
          nominal: "hists/sr.yaml:sig"
          up: "hists/sr.yaml:sig_up"
          down: "hists/sr.yaml:sig_down"
        formatter: nominal_with_variations_formatter
        formatter_args: {label: scale}
- name: Centres
  independent_variables:
    - header: {name: m_jj}
      conversion:
        formatter: bin_format
        formatter_args: {style: central_value}
  dependent_variables:
    - header: {name: Data}
      conversion:
        inputs: {histo: "hists/sr.yaml:data"}
"#;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("hists")).unwrap();
        fs::write(dir.path().join("hists/sr.yaml"), HISTS).unwrap();
        fs::write(dir.path().join("tables.yaml"), CONFIG).unwrap();
        dir
    }

    #[test]
    fn test_convert_configs() {
        let dir = workspace();
        let configs = parse_configs(CONFIG).unwrap();
        let mut resolver = HistogramFileResolver::new(dir.path());
        let tables = convert_configs(&configs, &mut resolver, &FormatterRegistry::new()).unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(resolver.files_loaded(), 1);

        let sr = &tables[0];
        assert_eq!(
            sr.independent("m_jj").unwrap().values,
            vec![
                IndependentCell::Range { low: 0.0, high: 50.0 },
                IndependentCell::Range { low: 50.0, high: 100.0 },
            ]
        );
        assert_eq!(
            sr.dependent("Data").unwrap().values,
            vec![
                DependentCell::new(12.0).with_error(ErrorEntry::symmetric(3.0, "stat")),
                DependentCell::new(7.0).with_error(ErrorEntry::symmetric(2.0, "stat")),
            ]
        );
        assert_eq!(
            sr.dependent("Signal").unwrap().values,
            vec![
                DependentCell::new(5.0).with_error(ErrorEntry::asymmetric(-2.0, 2.0, "scale")),
                DependentCell::new(4.0).with_error(ErrorEntry::asymmetric(-1.0, 0.5, "scale")),
            ]
        );

        assert_eq!(
            tables[1].independent_variables[0].values,
            vec![
                IndependentCell::Value { value: 25.0 },
                IndependentCell::Value { value: 75.0 },
            ]
        );
    }

    #[test]
    fn test_convert_config_file_writes_tables() {
        let dir = workspace();
        let outdir = dir.path().join("out");
        // inputs sit next to the config, outside the current directory
        let written = convert_config_file(
            &dir.path().join("tables.yaml"),
            None,
            &outdir,
            &FormatterRegistry::new(),
        )
        .unwrap();

        assert_eq!(written, vec![outdir.join("data0.yaml"), outdir.join("data1.yaml")]);
        let first: ConvertedTable =
            serde_yaml::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(first.name.as_deref(), Some("Channel SR"));
        assert_eq!(first.bin_count(), 2);
    }

    #[test]
    fn test_mismatched_binning_fails() {
        let dir = workspace();
        let config = r#"
- dependent_variables:
    - header: {name: Data}
      conversion:
        inputs: {histo: "hists/sr.yaml:data"}
    - header: {name: Coarse}
      conversion:
        inputs: {histo: "hists/sr.yaml:coarse"}
"#;
        let configs = parse_configs(config).unwrap();
        let mut resolver = HistogramFileResolver::new(dir.path());
        let err = convert_configs(&configs, &mut resolver, &FormatterRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            HepDataError::Conversion(table_engine::ConversionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_formatter_names_variable() {
        let dir = workspace();
        let config = r#"
- dependent_variables:
    - header: {name: Data}
      conversion:
        inputs: {histo: "hists/sr.yaml:data"}
        formatter: fancy_format
"#;
        let configs = parse_configs(config).unwrap();
        let mut resolver = HistogramFileResolver::new(dir.path());
        let err = convert_configs(&configs, &mut resolver, &FormatterRegistry::new()).unwrap_err();
        match err {
            HepDataError::Formatter { variable, source } => {
                assert_eq!(variable, "Data");
                assert_eq!(
                    source,
                    table_engine::FormatterError::UnknownFormatter("fancy_format".into())
                );
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
