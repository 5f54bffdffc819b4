use jth_core::errors::{ErrorInfo, JthError};
use jth_core::{LookupTable, TableAxis};
use serde::{Deserialize, Serialize};

use crate::axis::BinAxis;

/// Largest number of axes a histogram may carry.
pub const MAX_AXES: usize = 3;

/// Binned table with one to three axes.
///
/// Only the real bins carry content; under- and overflow are never stored.
/// Contents are laid out with the first axis varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HistogramPayload", into = "HistogramPayload")]
pub struct Histogram {
    name: String,
    axes: Vec<BinAxis>,
    contents: Vec<f64>,
}

fn table_error(code: &str, message: impl Into<String>) -> JthError {
    JthError::Table(ErrorInfo::new(code, message))
}

impl Histogram {
    /// Creates a zero-filled histogram over `axes`.
    pub fn new(name: impl Into<String>, axes: Vec<BinAxis>) -> Result<Self, JthError> {
        let size = checked_size(&axes)?;
        Ok(Self {
            name: name.into(),
            axes,
            contents: vec![0.0; size],
        })
    }

    /// Creates a histogram from explicit contents in first-axis-fastest order.
    pub fn with_contents(
        name: impl Into<String>,
        axes: Vec<BinAxis>,
        contents: Vec<f64>,
    ) -> Result<Self, JthError> {
        let size = checked_size(&axes)?;
        if contents.len() != size {
            return Err(table_error("content-size", "content length does not match the bins")
                .map_info(|info| {
                    info.with_context("expected", size.to_string())
                        .with_context("actual", contents.len().to_string())
                }));
        }
        Ok(Self {
            name: name.into(),
            axes,
            contents,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &[BinAxis] {
        &self.axes
    }

    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Content of the real bin addressed by 1-based `bins`.
    pub fn bin_content(&self, bins: &[usize]) -> Result<f64, JthError> {
        let index = self.flat_index(bins)?;
        Ok(self.contents[index])
    }

    /// Overwrites the content of the real bin addressed by 1-based `bins`.
    pub fn set_bin_content(&mut self, bins: &[usize], value: f64) -> Result<(), JthError> {
        let index = self.flat_index(bins)?;
        self.contents[index] = value;
        Ok(())
    }

    /// Sets every real bin to `f(bins)`, where `bins` holds 1-based indices.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(&[usize]) -> f64,
    {
        let mut bins = vec![1usize; self.axes.len()];
        for value in self.contents.iter_mut() {
            *value = f(&bins);
            for (axis, bin) in self.axes.iter().zip(bins.iter_mut()) {
                if *bin < axis.num_bins() {
                    *bin += 1;
                    break;
                }
                *bin = 1;
            }
        }
    }

    fn flat_index(&self, bins: &[usize]) -> Result<usize, JthError> {
        if bins.len() != self.axes.len() {
            return Err(table_error("bin-index", "wrong number of bin indices")
                .map_info(|info| {
                    info.with_context("expected", self.axes.len().to_string())
                        .with_context("actual", bins.len().to_string())
                }));
        }
        let mut index = 0;
        let mut stride = 1;
        for (position, (axis, bin)) in self.axes.iter().zip(bins).enumerate() {
            if *bin < 1 || *bin > axis.num_bins() {
                return Err(table_error("bin-index", "bin index outside the real bins")
                    .map_info(|info| {
                        info.with_context("axis", position.to_string())
                            .with_context("bin", bin.to_string())
                    }));
            }
            index += (bin - 1) * stride;
            stride *= axis.num_bins();
        }
        Ok(index)
    }

    /// Multilinear interpolation between bin centres.
    ///
    /// Along each axis the value is constant beyond the outermost centres, so
    /// any non-NaN coordinate is accepted.
    pub fn interpolate_at(&self, coords: &[f64]) -> Result<f64, JthError> {
        if coords.len() != self.axes.len() {
            return Err(JthError::Dimension(
                ErrorInfo::new("dimension-mismatch", "coordinate count differs from the axes")
                    .with_context("expected", self.axes.len().to_string())
                    .with_context("actual", coords.len().to_string()),
            ));
        }
        let mut brackets = [Bracket::default(); MAX_AXES];
        for (position, (axis, x)) in self.axes.iter().zip(coords).enumerate() {
            if x.is_nan() {
                return Err(table_error("nan-coordinate", "cannot interpolate at NaN")
                    .map_info(|info| info.with_context("axis", position.to_string())));
            }
            brackets[position] = Bracket::locate(axis, *x);
        }

        let dims = self.axes.len();
        let mut total = 0.0;
        let mut corner = [0usize; MAX_AXES];
        for mask in 0..(1usize << dims) {
            let mut weight = 1.0;
            for (position, bracket) in brackets.iter().take(dims).enumerate() {
                if mask & (1 << position) == 0 {
                    corner[position] = bracket.lower;
                    weight *= 1.0 - bracket.fraction;
                } else {
                    corner[position] = bracket.upper;
                    weight *= bracket.fraction;
                }
            }
            if weight == 0.0 {
                continue;
            }
            total += weight * self.bin_content(&corner[..dims])?;
        }
        Ok(total)
    }
}

/// Pair of neighbouring bins around a coordinate and the position between
/// their centres.
#[derive(Debug, Clone, Copy)]
struct Bracket {
    lower: usize,
    upper: usize,
    fraction: f64,
}

impl Default for Bracket {
    fn default() -> Self {
        Self {
            lower: 1,
            upper: 1,
            fraction: 0.0,
        }
    }
}

impl Bracket {
    fn locate(axis: &BinAxis, x: f64) -> Self {
        let last = axis.num_bins();
        if x <= axis.bin_center(1) {
            return Self::default();
        }
        if x >= axis.bin_center(last) {
            return Self {
                lower: last,
                upper: last,
                fraction: 0.0,
            };
        }
        let bin = axis.find_bin(x).clamp(1, last);
        let (lower, upper) = if x < axis.bin_center(bin) {
            (bin - 1, bin)
        } else {
            (bin, bin + 1)
        };
        let low_center = axis.bin_center(lower);
        let fraction = (x - low_center) / (axis.bin_center(upper) - low_center);
        Self {
            lower,
            upper,
            fraction,
        }
    }
}

fn checked_size(axes: &[BinAxis]) -> Result<usize, JthError> {
    if axes.is_empty() || axes.len() > MAX_AXES {
        return Err(JthError::Dimension(
            ErrorInfo::new(
                "unsupported-dimensionality",
                "histograms carry between one and three axes",
            )
            .with_context("axes", axes.len().to_string()),
        ));
    }
    Ok(axes.iter().map(|axis| axis.num_bins()).product())
}

impl LookupTable for Histogram {
    fn dimensionality(&self) -> usize {
        self.axes.len()
    }

    fn axis(&self, index: usize) -> Option<&dyn TableAxis> {
        self.axes.get(index).map(|axis| axis as &dyn TableAxis)
    }

    fn interpolate(&self, coords: &[f64]) -> Result<f64, JthError> {
        self.interpolate_at(coords)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistogramPayload {
    name: String,
    axes: Vec<BinAxis>,
    contents: Vec<f64>,
}

impl TryFrom<HistogramPayload> for Histogram {
    type Error = JthError;

    fn try_from(value: HistogramPayload) -> Result<Self, Self::Error> {
        Histogram::with_contents(value.name, value.axes, value.contents)
    }
}

impl From<Histogram> for HistogramPayload {
    fn from(value: Histogram) -> Self {
        Self {
            name: value.name,
            axes: value.axes,
            contents: value.contents,
        }
    }
}
