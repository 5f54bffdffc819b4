use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use jth_core::TableAxis;
use jth_input::serde::to_canonical_json_bytes;
use jth_table::{fingerprint, StoredObject, TableContainer};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container file (`.json`, or `.bin` for bincode).
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ObjectSummary {
    name: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensionality: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bins: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContainerSummary {
    file: String,
    format_version: u32,
    objects: Vec<ObjectSummary>,
}

fn summarize(name: &str, object: &StoredObject) -> ObjectSummary {
    let mut summary = ObjectSummary {
        name: name.to_string(),
        kind: object.kind(),
        dimensionality: None,
        bins: None,
        fingerprint: None,
    };
    if let StoredObject::Histogram(hist) = object {
        summary.dimensionality = Some(hist.axes().len());
        summary.bins = Some(hist.axes().iter().map(|axis| axis.num_bins()).collect());
        summary.fingerprint = Some(fingerprint(hist));
    }
    summary
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let container = TableContainer::read(&args.file)?;
    let summary = ContainerSummary {
        file: args.file.display().to_string(),
        format_version: container.format_version,
        objects: container
            .iter()
            .map(|(name, object)| summarize(name, object))
            .collect(),
    };
    let json = to_canonical_json_bytes(&summary)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
