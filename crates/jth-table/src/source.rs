use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use jth_core::errors::{ErrorInfo, JthError};
use jth_core::{LookupTable, TableSource};
use tracing::debug;

use crate::container::TableContainer;
use crate::hash::fingerprint;

/// Loads histograms from container files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerFileSource;

impl TableSource for ContainerFileSource {
    fn load_table(&self, path: &Path, name: &str) -> Result<Box<dyn LookupTable>, JthError> {
        let container = TableContainer::read(path)?;
        let hist = container
            .take_histogram(name)
            .map_err(|err| err.map_info(|info| info.with_context("path", path.display().to_string())))?;
        debug!(
            path = %path.display(),
            table = name,
            dims = hist.axes().len(),
            fingerprint = %fingerprint(&hist),
            "loaded histogram"
        );
        Ok(Box::new(hist))
    }
}

/// Serves containers held in memory, keyed by the path they stand in for.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    containers: BTreeMap<PathBuf, TableContainer>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `container` under `path`, replacing any earlier one.
    pub fn insert(&mut self, path: impl Into<PathBuf>, container: TableContainer) {
        self.containers.insert(path.into(), container);
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with_container(mut self, path: impl Into<PathBuf>, container: TableContainer) -> Self {
        self.insert(path, container);
        self
    }
}

impl TableSource for MemorySource {
    fn load_table(&self, path: &Path, name: &str) -> Result<Box<dyn LookupTable>, JthError> {
        let container = self.containers.get(path).ok_or_else(|| {
            JthError::TableLoad(
                ErrorInfo::new("file-not-found", "no container registered for this path")
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let hist = container
            .histogram(name)
            .map_err(|err| err.map_info(|info| info.with_context("path", path.display().to_string())))?;
        Ok(Box::new(hist.clone()))
    }
}
