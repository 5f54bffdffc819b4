//! Contracts for the N-dimensional lookup tables consumed by inputs.
//!
//! Binning follows the ROOT convention: bin 0 is underflow, bins
//! `1..=num_bins()` are the real bins and `num_bins() + 1` is overflow.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::JthError;

/// Bin structure of one table axis.
pub trait TableAxis {
    /// Number of real bins.
    fn num_bins(&self) -> usize;

    /// Low edge of `bin` (1-based).
    fn bin_low_edge(&self, bin: usize) -> f64;

    /// Width of `bin` (1-based).
    fn bin_width(&self, bin: usize) -> f64;

    /// Bin index containing `x`, including the underflow and overflow bins.
    fn find_bin(&self, x: f64) -> usize;
}

/// A continuous-valued table with per-axis bin introspection.
pub trait LookupTable: fmt::Debug + Send + Sync {
    /// Number of axes.
    fn dimensionality(&self) -> usize;

    /// Axis at `index` (0-based), if it exists.
    fn axis(&self, index: usize) -> Option<&dyn TableAxis>;

    /// Interpolated value at `coords`; `coords.len()` must equal
    /// [`LookupTable::dimensionality`].
    fn interpolate(&self, coords: &[f64]) -> Result<f64, JthError>;
}

/// Location of a named table inside a container file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Path of the container file.
    pub file: PathBuf,
    /// Name of the table within the container.
    pub table: String,
}

impl TableRef {
    pub fn new(file: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.table)
    }
}

/// Loads tables by (file, name).
///
/// Failures are reported in the [`JthError::TableLoad`] family with the codes
/// `file-not-found`, `table-not-found` and `wrong-object-type`.
pub trait TableSource: Send + Sync {
    /// Loads the table `name` from the container at `path`.
    fn load_table(&self, path: &Path, name: &str) -> Result<Box<dyn LookupTable>, JthError>;
}
