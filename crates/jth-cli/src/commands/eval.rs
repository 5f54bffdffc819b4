use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use jth_core::{EventContext, Jet, JthError, Scalar, ScalarType};
use jth_input::serde::to_canonical_json_bytes;
use jth_input::{load_config, InputSet, VariableResolver};
use jth_table::ContainerFileSource;
use serde::Serialize;
use tracing::info;

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// YAML file listing the inputs to evaluate.
    #[arg(long)]
    pub config: PathBuf,
    /// Jet transverse momentum.
    #[arg(long, allow_negative_numbers = true)]
    pub pt: f64,
    /// Jet pseudorapidity.
    #[arg(long, allow_negative_numbers = true)]
    pub eta: f64,
    /// Jet azimuth.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub phi: f64,
    /// Jet mass.
    #[arg(long, default_value_t = 0.0)]
    pub m: f64,
    /// Event context value, repeatable.
    #[arg(long = "ctx", value_name = "KEY=TYPE:VALUE")]
    pub context: Vec<String>,
    /// Auxiliary jet attribute, repeatable.
    #[arg(long = "attr", value_name = "KEY=TYPE:VALUE")]
    pub attributes: Vec<String>,
    /// Reject jet variables other than the predefined kinematics.
    #[arg(long)]
    pub kinematics_only: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
    Value(f64),
    Failure { error: JthError },
}

impl From<Result<f64, JthError>> for Outcome {
    fn from(result: Result<f64, JthError>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::Failure { error },
        }
    }
}

/// Parses `key=type:value`, where type is `int` or `float`.
fn parse_entry(raw: &str) -> Result<(String, Scalar), Box<dyn Error>> {
    let (key, typed) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=TYPE:VALUE, got `{raw}`"))?;
    let (declared, value) = typed
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:VALUE after `{key}=`"))?;
    let scalar = match ScalarType::parse(declared) {
        Some(ScalarType::Int) => Scalar::Int(value.parse()?),
        Some(ScalarType::Float) => Scalar::Float(value.parse()?),
        None => return Err(format!("unsupported type `{declared}` for `{key}`").into()),
    };
    Ok((key.to_string(), scalar))
}

fn build_context(entries: &[String]) -> Result<EventContext, Box<dyn Error>> {
    let mut ctx = EventContext::new();
    for entry in entries {
        match parse_entry(entry)? {
            (key, Scalar::Int(value)) => ctx.set_value(&key, value)?,
            (key, Scalar::Float(value)) => ctx.set_value(&key, value)?,
        }
    }
    Ok(ctx)
}

fn build_jet(args: &EvalArgs) -> Result<Jet, Box<dyn Error>> {
    let mut jet = Jet::new(args.pt, args.eta, args.phi, args.m);
    for entry in &args.attributes {
        match parse_entry(entry)? {
            (key, Scalar::Int(value)) => jet.set_attribute(&key, value)?,
            (key, Scalar::Float(value)) => jet.set_attribute(&key, value)?,
        }
    }
    Ok(jet)
}

pub fn run(args: &EvalArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let resolver = if args.kinematics_only {
        VariableResolver::kinematics_only()
    } else {
        VariableResolver::new()
    };
    let mut set = InputSet::from_config(&config, &resolver);
    let ready = set.initialize_all(&ContainerFileSource);
    info!(ready, configured = config.inputs.len(), "evaluating inputs");

    let jet = build_jet(args)?;
    let ctx = build_context(&args.context)?;

    let mut outcomes: BTreeMap<String, Outcome> = set
        .resolve_all(&jet, &ctx)
        .into_iter()
        .map(|(name, result)| (name, Outcome::from(result)))
        .collect();
    for rejected in set.rejected() {
        outcomes
            .entry(rejected.name.clone())
            .or_insert_with(|| Outcome::Failure {
                error: rejected.error.clone(),
            });
    }
    set.finalize_all();

    let json = to_canonical_json_bytes(&outcomes)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_parse_by_declared_type() {
        assert_eq!(parse_entry("NPV=int:12").unwrap(), ("NPV".into(), Scalar::Int(12)));
        assert_eq!(parse_entry("mu=float:31.5").unwrap(), ("mu".into(), Scalar::Float(31.5)));
        assert!(parse_entry("mu=double:31.5").is_err());
        assert!(parse_entry("mu=31.5").is_err());
        assert!(parse_entry("NPV=int:many").is_err());
    }

    #[test]
    fn repeated_context_keys_are_rejected() {
        let entries = vec!["mu=float:1".to_string(), "mu=float:2".to_string()];
        assert!(build_context(&entries).is_err());
    }
}
