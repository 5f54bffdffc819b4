//! Axis variables and the factory that binds configured names to extractors.

use std::fmt;
use std::sync::Arc;

use jth_core::errors::{ErrorInfo, JthError};
use jth_core::{EventContext, Jet, ScalarType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scale for tables binned in GeV when jets carry MeV.
pub const GEV: f64 = 1.0e-3;
/// Identity scale.
pub const MEV: f64 = 1.0;

/// Named scale presets accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePreset {
    Gev,
    Mev,
}

impl ScalePreset {
    pub fn factor(self) -> f64 {
        match self {
            ScalePreset::Gev => GEV,
            ScalePreset::Mev => MEV,
        }
    }
}

/// Kinematic quantities read directly from the jet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JetQuantity {
    E,
    Et,
    Pt,
    Eta,
    AbsEta,
    Rapidity,
    AbsRapidity,
}

impl JetQuantity {
    /// All quantities, in declaration order.
    pub const ALL: [JetQuantity; 7] = [
        JetQuantity::E,
        JetQuantity::Et,
        JetQuantity::Pt,
        JetQuantity::Eta,
        JetQuantity::AbsEta,
        JetQuantity::Rapidity,
        JetQuantity::AbsRapidity,
    ];

    /// Matches a configured name, case-sensitively, including the aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let quantity = match name {
            "e" => JetQuantity::E,
            "et" => JetQuantity::Et,
            "pt" => JetQuantity::Pt,
            "eta" => JetQuantity::Eta,
            "abseta" | "|eta|" => JetQuantity::AbsEta,
            "rapidity" | "y" => JetQuantity::Rapidity,
            "absrapidity" | "|rapidity|" | "absy" | "|y|" => JetQuantity::AbsRapidity,
            _ => return None,
        };
        Some(quantity)
    }

    /// Every name that selects this quantity.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            JetQuantity::E => &["e"],
            JetQuantity::Et => &["et"],
            JetQuantity::Pt => &["pt"],
            JetQuantity::Eta => &["eta"],
            JetQuantity::AbsEta => &["abseta", "|eta|"],
            JetQuantity::Rapidity => &["rapidity", "y"],
            JetQuantity::AbsRapidity => &["absrapidity", "|rapidity|", "absy", "|y|"],
        }
    }

    pub fn value(self, jet: &Jet) -> f64 {
        match self {
            JetQuantity::E => jet.e(),
            JetQuantity::Et => jet.et(),
            JetQuantity::Pt => jet.pt(),
            JetQuantity::Eta => jet.eta(),
            JetQuantity::AbsEta => jet.abs_eta(),
            JetQuantity::Rapidity => jet.rapidity(),
            JetQuantity::AbsRapidity => jet.abs_rapidity(),
        }
    }
}

/// Caller supplied extraction function.
pub type Extractor = Arc<dyn Fn(&Jet, &EventContext) -> Result<f64, JthError> + Send + Sync>;

/// Where an axis variable reads its raw value from.
#[derive(Clone)]
pub enum VariableKind {
    /// One of the predefined jet quantities.
    Jet(JetQuantity),
    /// Auxiliary jet attribute stored under the variable name.
    JetAttribute(ScalarType),
    /// Event context value stored under the variable name.
    Context(ScalarType),
    Custom(Extractor),
}

impl VariableKind {
    /// Returns true when the value comes from the jet.
    pub fn is_jet_native(&self) -> bool {
        matches!(self, VariableKind::Jet(_) | VariableKind::JetAttribute(_))
    }
}

impl fmt::Debug for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Jet(quantity) => f.debug_tuple("Jet").field(quantity).finish(),
            VariableKind::JetAttribute(ty) => f.debug_tuple("JetAttribute").field(ty).finish(),
            VariableKind::Context(ty) => f.debug_tuple("Context").field(ty).finish(),
            VariableKind::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named, scaled extractor feeding one table axis.
///
/// The name and kind are fixed at construction. The scale may change until the
/// owning input becomes ready.
#[derive(Debug, Clone)]
pub struct AxisVariable {
    name: String,
    kind: VariableKind,
    scale: f64,
}

impl AxisVariable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scale: MEV,
        }
    }

    /// Binds a caller closure as the extractor.
    pub fn custom<F>(name: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&Jet, &EventContext) -> Result<f64, JthError> + Send + Sync + 'static,
    {
        Self::new(name, VariableKind::Custom(Arc::new(extractor)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn set_gev(&mut self) {
        self.scale = GEV;
    }

    pub fn set_mev(&mut self) {
        self.scale = MEV;
    }

    /// Builder form of [`AxisVariable::set_scale`].
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Extracted value before scaling.
    pub fn raw_value(&self, jet: &Jet, ctx: &EventContext) -> Result<f64, JthError> {
        match &self.kind {
            VariableKind::Jet(quantity) => Ok(quantity.value(jet)),
            VariableKind::JetAttribute(ty) => jet.attribute_as(&self.name, *ty),
            VariableKind::Context(ty) => ctx.get_as(&self.name, *ty),
            VariableKind::Custom(extractor) => extractor(jet, ctx),
        }
    }

    /// Extracted value times the scale.
    pub fn value(&self, jet: &Jet, ctx: &EventContext) -> Result<f64, JthError> {
        Ok(self.raw_value(jet, ctx)? * self.scale)
    }
}

fn unsupported(code: &str, message: &str, name: &str, declared_type: &str) -> JthError {
    JthError::Unsupported(
        ErrorInfo::new(code, message)
            .with_context("name", name)
            .with_context("type", declared_type),
    )
}

/// Builds axis variables from configured (name, type, jet) triples.
#[derive(Debug, Clone, Copy)]
pub struct VariableResolver {
    jet_attributes: bool,
}

impl Default for VariableResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableResolver {
    /// Resolver that accepts auxiliary jet attributes.
    pub fn new() -> Self {
        Self {
            jet_attributes: true,
        }
    }

    /// Resolver for environments where jets carry only their kinematics.
    pub fn kinematics_only() -> Self {
        Self {
            jet_attributes: false,
        }
    }

    /// Binds `name` to an extractor.
    ///
    /// Jet names matching a predefined quantity ignore `declared_type` beyond
    /// requiring it to be non-empty. Everything else needs `int` or `float`.
    pub fn create(
        &self,
        name: &str,
        declared_type: &str,
        is_jet_native: bool,
    ) -> Result<AxisVariable, JthError> {
        if name.is_empty() {
            return Err(unsupported("empty-name", "variable name is empty", name, declared_type));
        }
        if declared_type.is_empty() {
            return Err(unsupported("empty-type", "variable type is empty", name, declared_type));
        }

        let kind = if is_jet_native {
            match JetQuantity::from_name(name) {
                Some(quantity) => VariableKind::Jet(quantity),
                None => {
                    if !self.jet_attributes {
                        return Err(unsupported(
                            "unsupported-custom",
                            "jet attributes are not available in this environment",
                            name,
                            declared_type,
                        ));
                    }
                    VariableKind::JetAttribute(Self::scalar_type(name, declared_type)?)
                }
            }
        } else {
            VariableKind::Context(Self::scalar_type(name, declared_type)?)
        };

        debug!(variable = name, declared_type, kind = ?kind, "bound axis variable");
        Ok(AxisVariable::new(name, kind))
    }

    fn scalar_type(name: &str, declared_type: &str) -> Result<ScalarType, JthError> {
        ScalarType::parse(declared_type).ok_or_else(|| {
            unsupported("unsupported-type", "only int and float are supported", name, declared_type)
                .map_info(|info| info.with_hint("declare the variable as int or float"))
        })
    }
}
