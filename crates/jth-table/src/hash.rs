use jth_core::TableAxis;
use sha2::{Digest, Sha256};

use crate::axis::BinAxis;
use crate::histogram::Histogram;

/// Computes a stable content hash for the provided histogram.
///
/// The name is excluded so that identical tables stored under different names
/// share a fingerprint.
pub fn fingerprint(hist: &Histogram) -> String {
    let mut hasher = Sha256::new();
    hasher.update((hist.axes().len() as u64).to_le_bytes());
    for axis in hist.axes() {
        encode_axis(axis, &mut hasher);
    }
    hasher.update((hist.contents().len() as u64).to_le_bytes());
    for value in hist.contents() {
        hasher.update(value.to_bits().to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn encode_axis(axis: &BinAxis, hasher: &mut Sha256) {
    if axis.is_uniform() {
        hasher.update(b"uniform");
    } else {
        hasher.update(b"variable");
    }
    hasher.update((axis.num_bins() as u64).to_le_bytes());
    for edge in axis.edges() {
        hasher.update(edge.to_bits().to_le_bytes());
    }
}
