//! FILENAME: hepdata-format/src/writer.rs
//! Writes converted tables as HepData YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use table_engine::ConvertedTable;

use crate::error::HepDataError;

/// File name of the `index`-th table: `data0.yaml`, `data1.yaml`, ...
pub fn table_file_name(index: usize) -> String {
    format!("data{}.yaml", index)
}

pub fn to_yaml_string(table: &ConvertedTable) -> Result<String, HepDataError> {
    Ok(serde_yaml::to_string(table)?)
}

/// Writes each table to its own file in `dir` and returns the paths in
/// table order.
pub fn write_tables(dir: &Path, tables: &[ConvertedTable]) -> Result<Vec<PathBuf>, HepDataError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(tables.len());
    for (index, table) in tables.iter().enumerate() {
        let path = dir.join(table_file_name(index));
        log::info!("writing {}", path.display());
        fs::write(&path, to_yaml_string(table)?)?;
        written.push(path);
    }
    Ok(written)
}
