//! FILENAME: hepdata-format/src/resolver.rs
//! Resolution of `file:path` identifiers into grid sources.
//!
//! `SourceResolver` is the seam for readers of other histogram file
//! formats. `HistogramFileResolver` reads YAML histogram files: each file
//! is a mapping of path -> histogram, e.g.
//!
//! ```yaml
//! data_SR:
//!   edges: [[0.0, 50.0, 100.0]]
//!   contents: [12.0, 7.0]
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use grid::{GridSource, Histogram};
use rustc_hash::FxHashMap;

use crate::error::HepDataError;

// ============================================================================
// SOURCE IDENTIFIER
// ============================================================================

/// `file:path`, split at the first colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId {
    pub file: String,
    pub path: String,
}

impl FromStr for SourceId {
    type Err = HepDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((file, path)) if !file.is_empty() && !path.is_empty() => Ok(SourceId {
                file: file.to_string(),
                path: path.to_string(),
            }),
            _ => Err(HepDataError::InvalidIdentifier(s.to_string())),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.path)
    }
}

// ============================================================================
// RESOLVERS
// ============================================================================

pub trait SourceResolver {
    fn resolve(&mut self, id: &SourceId) -> Result<Arc<dyn GridSource>, HepDataError>;
}

type HistogramFile = BTreeMap<String, Histogram>;

/// Reads YAML histogram files relative to a working directory. Each file
/// is parsed once and each identifier resolves to one shared source.
pub struct HistogramFileResolver {
    workdir: PathBuf,
    files: FxHashMap<String, HistogramFile>,
    objects: FxHashMap<SourceId, Arc<dyn GridSource>>,
}

impl HistogramFileResolver {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        HistogramFileResolver {
            workdir: workdir.into(),
            files: FxHashMap::default(),
            objects: FxHashMap::default(),
        }
    }

    /// Number of distinct files read so far.
    pub fn files_loaded(&self) -> usize {
        self.files.len()
    }

    fn load_file(&mut self, file: &str) -> Result<&HistogramFile, HepDataError> {
        if !self.files.contains_key(file) {
            let path = self.workdir.join(file);
            log::debug!("reading histograms from {}", path.display());
            let text = fs::read_to_string(&path)?;
            let parsed: HistogramFile = serde_yaml::from_str(&text)?;
            self.files.insert(file.to_string(), parsed);
        }
        self.files
            .get(file)
            .ok_or_else(|| HepDataError::SourceNotFound(file.to_string()))
    }
}

impl SourceResolver for HistogramFileResolver {
    fn resolve(&mut self, id: &SourceId) -> Result<Arc<dyn GridSource>, HepDataError> {
        if let Some(source) = self.objects.get(id) {
            return Ok(Arc::clone(source));
        }

        let histogram = self
            .load_file(&id.file)?
            .get(&id.path)
            .cloned()
            .ok_or_else(|| HepDataError::SourceNotFound(id.to_string()))?;
        log::trace!("resolved {} to histogram {:?}", id, histogram.name());
        let source: Arc<dyn GridSource> = Arc::new(histogram);
        self.objects.insert(id.clone(), Arc::clone(&source));
        Ok(source)
    }
}
