//! Reference lookup tables for JTH: binned histograms with ROOT binning
//! conventions and the container files they are stored in.

mod axis;
mod container;
mod hash;
mod histogram;
mod source;

pub use axis::BinAxis;
pub use container::{ContainerFormat, StoredObject, TableContainer, FORMAT_VERSION};
pub use hash::fingerprint;
pub use histogram::{Histogram, MAX_AXES};
pub use source::{ContainerFileSource, MemorySource};
