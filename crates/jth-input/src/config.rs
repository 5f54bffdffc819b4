use std::fs;
use std::path::{Path, PathBuf};

use jth_core::errors::{ErrorInfo, JthError};
use jth_core::TableRef;
use serde::{Deserialize, Serialize};

use crate::input::MultiAxisInput;
use crate::serde::{from_yaml_slice, to_yaml_string};
use crate::variable::{AxisVariable, ScalePreset, VariableResolver};

fn io_error(code: &str, path: &Path, err: impl ToString) -> JthError {
    JthError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

fn default_jet() -> bool {
    true
}

/// Scale written either as a preset name or as a plain factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSpec {
    /// `gev` or `mev`.
    Preset(ScalePreset),
    Factor(f64),
}

impl ScaleSpec {
    pub fn factor(&self) -> f64 {
        match self {
            ScaleSpec::Preset(preset) => preset.factor(),
            ScaleSpec::Factor(factor) => *factor,
        }
    }
}

/// One configured axis: the (name, type, jet) triple plus an optional scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Variable name, also the context key for event level axes.
    pub name: String,
    /// Declared primitive type, `int` or `float`.
    #[serde(rename = "type", default)]
    pub declared_type: String,
    /// Whether the value is read from the jet rather than the event context.
    #[serde(default = "default_jet")]
    pub jet: bool,
    /// Multiplicative scale, 1.0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleSpec>,
}

impl AxisSpec {
    /// Binds the axis through `resolver` and applies the configured scale.
    pub fn resolve(&self, resolver: &VariableResolver) -> Result<AxisVariable, JthError> {
        let variable = resolver.create(&self.name, &self.declared_type, self.jet)?;
        Ok(match self.scale {
            Some(scale) => variable.with_scale(scale.factor()),
            None => variable,
        })
    }
}

/// One configured input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Name reported in results and logs.
    pub name: String,
    /// Container file, relative paths resolve against the config directory.
    pub file: PathBuf,
    /// Table name inside the container.
    pub table: String,
    /// One to three axes, in table axis order.
    pub axes: Vec<AxisSpec>,
}

impl InputSpec {
    /// Builds an unconfigured input with its table path resolved against
    /// `base_dir`.
    pub fn build(&self, resolver: &VariableResolver, base_dir: &Path) -> Result<MultiAxisInput, JthError> {
        let axes = self
            .axes
            .iter()
            .map(|axis| axis.resolve(resolver))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.map_info(|info| info.with_context("input", self.name.as_str())))?;
        let file = if self.file.is_absolute() {
            self.file.clone()
        } else {
            base_dir.join(&self.file)
        };
        MultiAxisInput::new(self.name.clone(), TableRef::new(file, self.table.clone()), axes)
    }
}

/// Top level YAML document listing the inputs to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InputConfig {
    /// Configured inputs in declaration order.
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
    /// Directory relative table paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl InputConfig {
    /// Parses a YAML document. Relative paths resolve against the working
    /// directory until `base_dir` is set.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, JthError> {
        let mut config: InputConfig = from_yaml_slice(data)?;
        config.base_dir = PathBuf::from(".");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, JthError> {
        to_yaml_string(self)
    }
}

/// Loads an input configuration from a YAML file on disk.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<InputConfig, JthError> {
    let config_path = path.as_ref();
    let bytes = fs::read(config_path).map_err(|err| io_error("config-read", config_path, err))?;
    let mut config = InputConfig::from_yaml_slice(&bytes)
        .map_err(|err| err.map_info(|info| info.with_context("path", config_path.display().to_string())))?;
    config.base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok(config)
}
