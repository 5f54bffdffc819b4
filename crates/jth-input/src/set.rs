use std::collections::{BTreeMap, BTreeSet};

use jth_core::errors::{ErrorInfo, JthError};
use jth_core::{EventContext, Jet, TableSource};
use tracing::{info, warn};

use crate::config::InputConfig;
use crate::input::MultiAxisInput;
use crate::variable::VariableResolver;

/// A configured input that could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedInput {
    pub name: String,
    pub error: JthError,
}

/// Named collection of inputs built from one configuration.
///
/// Inputs that fail to build or initialize are kept aside and reported; they
/// never stop the others from working.
#[derive(Debug, Default)]
pub struct InputSet {
    inputs: Vec<MultiAxisInput>,
    rejected: Vec<RejectedInput>,
}

impl InputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every configured input, recording the ones that fail.
    pub fn from_config(config: &InputConfig, resolver: &VariableResolver) -> Self {
        let mut set = Self::new();
        let mut seen = BTreeSet::new();
        for spec in &config.inputs {
            let built = if seen.insert(spec.name.as_str()) {
                spec.build(resolver, &config.base_dir)
            } else {
                Err(JthError::Unsupported(
                    ErrorInfo::new("duplicate-name", "input name is already used")
                        .with_context("input", spec.name.as_str()),
                ))
            };
            match built {
                Ok(input) => set.inputs.push(input),
                Err(error) => {
                    warn!(input = %spec.name, error = %error, "skipping input");
                    set.rejected.push(RejectedInput {
                        name: spec.name.clone(),
                        error,
                    });
                }
            }
        }
        set
    }

    /// Adds an input. Fails if the name is already taken.
    pub fn push(&mut self, input: MultiAxisInput) -> Result<(), JthError> {
        if self.get(input.name()).is_some() {
            return Err(JthError::Unsupported(
                ErrorInfo::new("duplicate-name", "input name is already used")
                    .with_context("input", input.name()),
            ));
        }
        self.inputs.push(input);
        Ok(())
    }

    /// Initializes every input that is not ready yet and returns how many are
    /// ready afterwards.
    pub fn initialize_all(&mut self, source: &dyn TableSource) -> usize {
        for input in self.inputs.iter_mut().filter(|input| !input.is_ready()) {
            // failures are logged and kept on the input
            let _ = input.initialize(source);
        }
        let ready = self.ready_count();
        info!(
            ready,
            failed = self.inputs.len() - ready,
            rejected = self.rejected.len(),
            "inputs initialized"
        );
        ready
    }

    /// Resolves every built input for `jet`, keyed by input name.
    pub fn resolve_all(&self, jet: &Jet, ctx: &EventContext) -> BTreeMap<String, Result<f64, JthError>> {
        self.inputs
            .iter()
            .map(|input| (input.name().to_string(), input.resolve(jet, ctx)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&MultiAxisInput> {
        self.inputs.iter().find(|input| input.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MultiAxisInput> {
        self.inputs.iter_mut().find(|input| input.name() == name)
    }

    pub fn inputs(&self) -> &[MultiAxisInput] {
        &self.inputs
    }

    /// Configured inputs that could not be built.
    pub fn rejected(&self) -> &[RejectedInput] {
        &self.rejected
    }

    pub fn ready_count(&self) -> usize {
        self.inputs.iter().filter(|input| input.is_ready()).count()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Finalizes every input.
    pub fn finalize_all(&mut self) {
        for input in &mut self.inputs {
            input.finalize();
        }
    }
}
