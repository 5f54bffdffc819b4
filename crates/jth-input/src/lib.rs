#![doc = "Multi-axis inputs for JTH: variable binding, axis clamping and table-backed resolution of jet calibration values."]

/// Domain clamping of coordinates into the real bins of an axis.
pub mod clamp;
/// YAML input configuration.
pub mod config;
/// The multi-axis input state machine.
pub mod input;
/// Canonical JSON and YAML helpers.
pub mod serde;
/// Collections of named inputs.
pub mod set;
/// Axis variables and the variable resolver.
pub mod variable;

pub use clamp::{clamp, clamp_with, EDGE_OFFSET};
pub use config::{load_config, AxisSpec, InputConfig, InputSpec, ScaleSpec};
pub use input::{AxisLayout, AxisSet, LifecycleState, MultiAxisInput, MAX_DIMENSIONS};
pub use set::{InputSet, RejectedInput};
pub use variable::{
    AxisVariable, Extractor, JetQuantity, ScalePreset, VariableKind, VariableResolver, GEV, MEV,
};
