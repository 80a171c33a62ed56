//! Re-referencing.
//!
//! `data`: [T, N]
//!
//! * average: `data[t, c] -= mean(data[t, :])`
//! * channel: `data[t, c] -= data[t, ref]`
use std::str::FromStr;

use ndarray::{Array1, Array2, Axis};

use crate::error::{EegError, Result};

/// Re-referencing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reference {
    /// Common average reference.
    #[default]
    Average,
    /// Single electrode `Cz` (labelled `Cz` or `CZ`).
    Cz,
}

impl FromStr for Reference {
    type Err = EegError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "avg" | "average" => Ok(Reference::Average),
            "Cz" | "CZ" | "cz" => Ok(Reference::Cz),
            other => Err(EegError::InvalidParameter(format!("unknown reference mode {other:?}"))),
        }
    }
}

/// Subtract the per-sample channel mean; returns that mean, shape `[T]`.
pub fn average_reference_inplace(data: &mut Array2<f32>) -> Array1<f32> {
    let means = data
        .mean_axis(Axis(1))
        .unwrap_or_else(|| Array1::zeros(data.nrows()));
    for mut col in data.columns_mut() {
        col -= &means;
    }
    means
}

/// Subtract the first channel whose name is one of `candidates` from every
/// channel, itself included (which leaves it all zero).
///
/// Returns the reference column index.
pub fn channel_reference_inplace(
    data: &mut Array2<f32>,
    channels: &[String],
    candidates: &[&str],
) -> Result<usize> {
    let idx = channels
        .iter()
        .position(|c| candidates.contains(&c.as_str()))
        .ok_or_else(|| EegError::ReferenceChannelNotFound(candidates.join("/")))?;
    if idx >= data.ncols() {
        return Err(EegError::Format(format!(
            "reference channel index {idx} outside {} data columns",
            data.ncols()
        )));
    }
    let reference = data.column(idx).to_owned();
    for mut col in data.columns_mut() {
        col -= &reference;
    }
    Ok(idx)
}
