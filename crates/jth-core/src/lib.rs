#![doc = "Core traits and data types for jet calibration table lookups."]

pub mod context;
pub mod errors;
pub mod jet;
pub mod scalar;
pub mod table;

pub use context::EventContext;
pub use errors::{ErrorInfo, JthError};
pub use jet::Jet;
pub use scalar::{AttributeStore, ContextValue, Scalar, ScalarType};
pub use table::{LookupTable, TableAxis, TableRef, TableSource};
