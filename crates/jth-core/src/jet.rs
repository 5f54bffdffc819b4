//! Read-only jet four-vector with derived kinematic quantities.

use crate::errors::JthError;
use crate::scalar::{AttributeStore, ContextValue, ScalarType};

/// A jet described by (pt, eta, phi, m), plus optional auxiliary attributes.
///
/// Derived quantities follow the usual collider conventions: `pz = pt sinh(eta)`,
/// `p = pt cosh(eta)` and `e = sqrt(p^2 + m^2)`.
#[derive(Debug, Clone)]
pub struct Jet {
    pt: f64,
    eta: f64,
    phi: f64,
    m: f64,
    attributes: AttributeStore,
}

impl Jet {
    /// Creates a jet from transverse momentum, pseudorapidity, azimuth and mass.
    pub fn new(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        Self {
            pt,
            eta,
            phi,
            m,
            attributes: AttributeStore::new(JthError::Attribute),
        }
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Azimuthal angle.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Invariant mass.
    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn px(&self) -> f64 {
        self.pt * self.phi.cos()
    }

    pub fn py(&self) -> f64 {
        self.pt * self.phi.sin()
    }

    /// Longitudinal momentum. Zero without transverse momentum, for any eta.
    pub fn pz(&self) -> f64 {
        if self.pt == 0.0 {
            return 0.0;
        }
        self.pt * self.eta.sinh()
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        if self.pt == 0.0 {
            return 0.0;
        }
        self.pt * self.eta.cosh()
    }

    /// Energy.
    pub fn e(&self) -> f64 {
        let p = self.p();
        (p * p + self.m * self.m).sqrt()
    }

    /// Transverse energy, `e * pt / p`. Zero for a jet without transverse momentum.
    pub fn et(&self) -> f64 {
        if self.pt == 0.0 {
            return 0.0;
        }
        self.e() * self.pt / self.p()
    }

    /// Rapidity, `0.5 ln((e + pz) / (e - pz))`.
    pub fn rapidity(&self) -> f64 {
        let e = self.e();
        let pz = self.pz();
        if e - pz.abs() <= 0.0 {
            // massless limit (or a jet at rest with no mass)
            return if self.pt == 0.0 { 0.0 } else { self.eta };
        }
        0.5 * ((e + pz) / (e - pz)).ln()
    }

    pub fn abs_eta(&self) -> f64 {
        self.eta.abs()
    }

    pub fn abs_rapidity(&self) -> f64 {
        self.rapidity().abs()
    }

    /// Attaches an auxiliary attribute. Fails if the key already exists.
    pub fn set_attribute<T: ContextValue>(&mut self, key: &str, value: T) -> Result<(), JthError> {
        self.attributes.set_value(key, value)
    }

    /// Builder form of [`Jet::set_attribute`].
    pub fn with_attribute<T: ContextValue>(mut self, key: &str, value: T) -> Result<Self, JthError> {
        self.attributes.set_value(key, value)?;
        Ok(self)
    }

    /// Reads an auxiliary attribute as `T`.
    pub fn attribute<T: ContextValue>(&self, key: &str) -> Result<T, JthError> {
        self.attributes.get_value(key)
    }

    /// Reads an auxiliary attribute with a runtime type tag.
    pub fn attribute_as(&self, key: &str, scalar_type: ScalarType) -> Result<f64, JthError> {
        self.attributes.get_as(key, scalar_type)
    }

    /// All auxiliary attributes.
    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }
}
