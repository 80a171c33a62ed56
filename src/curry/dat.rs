//! CURRY `.dat` samples: a flat little-endian `f32` array, sample-major.
//!
//! ```text
//! t=0: ch0 ch1 … ch(N-1) │ t=1: ch0 ch1 … │ … │ t=T-1: …
//! ```
//!
//! The whole buffer must reshape to exactly `[T, N]`; no truncation or padding
//! is tolerated.
use std::path::Path;

use ndarray::Array2;

use crate::error::{format_err, Result};

const F32_BYTES: usize = 4;

/// Reinterpret `bytes` as a `[n_samples, n_channels]` matrix.
pub fn samples_from_bytes(bytes: &[u8], n_channels: usize, n_samples: usize) -> Result<Array2<f32>> {
    if n_channels == 0 {
        return Err(format_err("dat: channel count is zero"));
    }
    let frame = n_channels * F32_BYTES;
    if bytes.len() % frame != 0 {
        return Err(format_err(format!(
            "dat: {} bytes is not a multiple of {n_channels} channels × 4 bytes",
            bytes.len()
        )));
    }
    let n_values = bytes.len() / F32_BYTES;
    let expected = n_samples
        .checked_mul(n_channels)
        .ok_or_else(|| format_err("dat: sample count overflows"))?;
    if n_values != expected {
        return Err(format_err(format!(
            "dat: {n_values} values cannot be reshaped to [{n_samples}, {n_channels}]"
        )));
    }

    let values: Vec<f32> = bytes
        .chunks_exact(F32_BYTES)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Array2::from_shape_vec((n_samples, n_channels), values)
        .map_err(|e| format_err(format!("dat: {e}")))
}

/// Read a `.dat` file in one piece and reshape it.
pub fn read_dat(path: &Path, n_channels: usize, n_samples: usize) -> Result<Array2<f32>> {
    let bytes = std::fs::read(path)?;
    let data = samples_from_bytes(&bytes, n_channels, n_samples)?;
    log::debug!("dat: {:?} samples from {}", data.dim(), path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EegError;

    fn le_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn consecutive_values_fill_one_time_sample() {
        let bytes = le_bytes(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let data = samples_from_bytes(&bytes, 3, 2).unwrap();
        assert_eq!(data.dim(), (2, 3));
        assert_eq!(data[[0, 2]], 2.0);
        assert_eq!(data[[1, 0]], 10.0);
    }

    #[test]
    fn partial_frame_is_rejected() {
        let mut bytes = le_bytes(&[1.0, 2.0, 3.0, 4.0]);
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(samples_from_bytes(&bytes, 2, 2), Err(EegError::Format(_))));
    }

    #[test]
    fn sample_count_must_match_exactly() {
        let bytes = le_bytes(&[1.0; 8]);
        assert!(samples_from_bytes(&bytes, 2, 3).is_err());
        assert!(samples_from_bytes(&bytes, 2, 5).is_err());
        assert!(samples_from_bytes(&bytes, 2, 4).is_ok());
    }

    #[test]
    fn zero_channels_is_rejected() {
        assert!(samples_from_bytes(&[], 0, 0).is_err());
    }
}
