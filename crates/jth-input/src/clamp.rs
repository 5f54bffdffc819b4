//! Keeps extracted coordinates inside the real bins of a table axis.

use jth_core::TableAxis;

/// Fraction of the edge bin's width by which out-of-range values are pulled in.
pub const EDGE_OFFSET: f64 = 1.0e-4;

/// Maps `raw` into the real bins of an axis described by its accessors.
///
/// Underflow lands just above the low edge of bin 1, overflow just below the
/// high edge of the last bin. In-range values pass through unchanged.
pub fn clamp_with<E, W, F>(num_bins: usize, bin_edge: E, bin_width: W, find_bin: F, raw: f64) -> f64
where
    E: Fn(usize) -> f64,
    W: Fn(usize) -> f64,
    F: Fn(f64) -> usize,
{
    let bin = find_bin(raw);
    if bin < 1 {
        bin_edge(1) + EDGE_OFFSET * bin_width(1)
    } else if bin > num_bins {
        bin_edge(num_bins) + (1.0 - EDGE_OFFSET) * bin_width(num_bins)
    } else {
        raw
    }
}

/// [`clamp_with`] over a [`TableAxis`].
pub fn clamp(axis: &dyn TableAxis, raw: f64) -> f64 {
    clamp_with(
        axis.num_bins(),
        |bin| axis.bin_low_edge(bin),
        |bin| axis.bin_width(bin),
        |x| axis.find_bin(x),
        raw,
    )
}
