use jth_core::errors::{ErrorInfo, JthError};
use jth_core::TableAxis;
use serde::{Deserialize, Serialize};

/// One histogram axis described by its bin edges.
///
/// Real bins are `1..=num_bins()`, each closed on its low edge and open on its
/// high edge. Values below the first edge land in bin 0, values at or above
/// the last edge (and NaN) land in `num_bins() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AxisPayload", into = "AxisPayload")]
pub struct BinAxis {
    edges: Vec<f64>,
    uniform: bool,
}

fn axis_error(code: &str, message: impl Into<String>) -> JthError {
    JthError::Table(ErrorInfo::new(code, message))
}

impl BinAxis {
    /// Creates `bins` equal-width bins spanning `[low, high)`.
    pub fn uniform(bins: usize, low: f64, high: f64) -> Result<Self, JthError> {
        if bins == 0 {
            return Err(axis_error("invalid-axis", "an axis needs at least one bin"));
        }
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(axis_error("invalid-axis", "axis range must be finite and increasing")
                .map_info(|info| {
                    info.with_context("low", low.to_string())
                        .with_context("high", high.to_string())
                }));
        }
        let width = (high - low) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|idx| low + idx as f64 * width).collect();
        edges.push(high);
        Ok(Self {
            edges,
            uniform: true,
        })
    }

    /// Creates an axis from explicit, strictly increasing edges.
    pub fn variable(edges: Vec<f64>) -> Result<Self, JthError> {
        if edges.len() < 2 {
            return Err(axis_error("invalid-axis", "an axis needs at least two edges")
                .map_info(|info| info.with_context("edges", edges.len().to_string())));
        }
        if let Some(position) = edges.iter().position(|edge| !edge.is_finite()) {
            return Err(axis_error("invalid-axis", "axis edges must be finite")
                .map_info(|info| info.with_context("index", position.to_string())));
        }
        if let Some(position) = edges.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(axis_error("invalid-axis", "axis edges must be strictly increasing")
                .map_info(|info| info.with_context("index", (position + 1).to_string())));
        }
        Ok(Self {
            edges,
            uniform: false,
        })
    }

    /// Returns whether the axis was built with equal-width bins.
    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Lower bound of the first real bin.
    pub fn low(&self) -> f64 {
        self.edges[0]
    }

    /// Upper bound of the last real bin.
    pub fn high(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// High edge of `bin`.
    pub fn bin_up_edge(&self, bin: usize) -> f64 {
        self.edges[self.real_bin(bin)]
    }

    /// Centre of `bin`.
    pub fn bin_center(&self, bin: usize) -> f64 {
        self.bin_low_edge(bin) + 0.5 * self.bin_width(bin)
    }

    fn real_bin(&self, bin: usize) -> usize {
        bin.clamp(1, self.num_bins())
    }
}

impl TableAxis for BinAxis {
    fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Indices outside the real range read the nearest real bin.
    fn bin_low_edge(&self, bin: usize) -> f64 {
        self.edges[self.real_bin(bin) - 1]
    }

    fn bin_width(&self, bin: usize) -> f64 {
        let bin = self.real_bin(bin);
        self.edges[bin] - self.edges[bin - 1]
    }

    fn find_bin(&self, x: f64) -> usize {
        if x.is_nan() {
            return self.num_bins() + 1;
        }
        // number of edges at or below x; 0 is underflow, len() is overflow
        self.edges.partition_point(|edge| *edge <= x)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AxisPayload {
    Uniform { bins: usize, low: f64, high: f64 },
    Variable { edges: Vec<f64> },
}

impl TryFrom<AxisPayload> for BinAxis {
    type Error = JthError;

    fn try_from(value: AxisPayload) -> Result<Self, Self::Error> {
        match value {
            AxisPayload::Uniform { bins, low, high } => BinAxis::uniform(bins, low, high),
            AxisPayload::Variable { edges } => BinAxis::variable(edges),
        }
    }
}

impl From<BinAxis> for AxisPayload {
    fn from(value: BinAxis) -> Self {
        if value.uniform {
            AxisPayload::Uniform {
                bins: value.num_bins(),
                low: value.low(),
                high: value.high(),
            }
        } else {
            AxisPayload::Variable { edges: value.edges }
        }
    }
}
