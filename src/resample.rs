//! FFT-based rational resampling along the time axis of `[T, N]` data.
//!
//! Per channel:
//!   1. Pad with reflect-limited samples, total length the next power of 2.
//!   2. rfft(padded)  →  complex half-spectrum.
//!   3. If downsampling: double the Nyquist bin of the kept band.
//!      If upsampling:   halve  the Nyquist bin of the source band.
//!   4. Scale all bins by `new_len_padded / old_len_padded`.
//!   5. irfft(spectrum, n=new_len_padded), truncating or zero-padding the
//!      spectrum as needed.
//!   6. Strip the resampled padding edges.
//!
//! Output length is always `round(T · dst / src)`.
use ndarray::{Array1, Array2};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{EegError, Result};

/// Padding on each side: fill up to the next power of 2 above `n + min_add`.
///
/// ```text
/// min_add = min(n // 8, 100) * 2
/// total   = 2^ceil(log2(n + min_add)) - n
/// npads   = [total // 2, total - total // 2]
/// ```
pub fn auto_npad(n: usize) -> (usize, usize) {
    let min_add = (n / 8).min(100) * 2;
    let sum = n + min_add;
    let next_pow2 = 1usize << ((sum as f64).log2().ceil() as u32);
    let total = next_pow2 - n;
    (total / 2, total - total / 2)
}

/// Number of output samples for `n` input samples: `round(n · dst / src)`.
pub fn final_length(n: usize, src_sfreq: f32, dst_sfreq: f32) -> usize {
    (n as f64 * dst_sfreq as f64 / src_sfreq as f64).round() as usize
}

/// Resample `data` ([T, N]) from `src_sfreq` to `dst_sfreq`.
pub fn resample(data: &Array2<f32>, src_sfreq: f32, dst_sfreq: f32) -> Result<Array2<f32>> {
    for (what, f) in [("source", src_sfreq), ("target", dst_sfreq)] {
        if !(f.is_finite() && f > 0.0) {
            return Err(EegError::InvalidParameter(format!("{what} sampling rate {f} is not positive")));
        }
    }
    if (src_sfreq - dst_sfreq).abs() < 1e-6 {
        return Ok(data.clone());
    }
    let ratio = dst_sfreq as f64 / src_sfreq as f64;
    let (n_in, n_ch) = data.dim();
    let n_out = final_length(n_in, src_sfreq, dst_sfreq);

    let (npad_l, npad_r) = auto_npad(n_in);
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let mut out = Array2::<f32>::zeros((n_out, n_ch));
    for (col_in, mut col_out) in data.columns().into_iter().zip(out.columns_mut()) {
        let x: Vec<f32> = col_in.to_vec();
        let y = resample_1d(&mut planner, &x, ratio, npad_l, npad_r);
        col_out.iter_mut().zip(y).for_each(|(o, v)| *o = v);
    }
    log::debug!("resample: {n_in} → {n_out} samples ({src_sfreq} → {dst_sfreq} Hz)");
    Ok(out)
}

/// Odd reflection of `x` with `pad_l` / `pad_r` samples, each clamped to `len - 1`.
fn odd_pad(x: &[f32], pad_l: usize, pad_r: usize) -> (Vec<f64>, usize) {
    let n = x.len();
    let pad_l = pad_l.min(n - 1);
    let pad_r = pad_r.min(n - 1);
    let (first, last) = (x[0] as f64, x[n - 1] as f64);
    let left = (1..=pad_l).rev().map(|i| 2.0 * first - x[i] as f64);
    let right = (1..=pad_r).map(|i| 2.0 * last - x[n - 1 - i] as f64);
    let ext = left
        .chain(x.iter().map(|&v| v as f64))
        .chain(right)
        .collect();
    (ext, pad_l)
}

/// Real inverse FFT of a half-spectrum to `n` samples, truncating or
/// zero-extending the spectrum as needed.
fn irfft(planner: &mut FftPlanner<f64>, half: &[Complex<f64>], n: usize) -> Vec<f64> {
    let n_half = n / 2 + 1;
    let mut full = vec![Complex::<f64>::default(); n];
    let n_copy = half.len().min(n_half);
    full[..n_copy].copy_from_slice(&half[..n_copy]);
    for i in 1..n_half {
        if n - i >= n_half {
            full[n - i] = full[i].conj();
        }
    }
    planner.plan_fft_inverse(n).process(&mut full);
    full.iter().map(|c| c.re / n as f64).collect()
}

/// Resample a single 1-D signal with explicit (possibly asymmetric) padding.
pub fn resample_1d(
    planner: &mut FftPlanner<f64>,
    x: &[f32],
    ratio: f64,
    npad_l: usize,
    npad_r: usize,
) -> Vec<f32> {
    if x.is_empty() {
        return vec![];
    }
    let n_out = (ratio * x.len() as f64).round() as usize;
    let (ext, pad_l) = odd_pad(x, npad_l, npad_r);
    let old_len = ext.len();
    let new_len = ((ratio * old_len as f64).round() as usize).max(1);
    let shorter = new_len < old_len;

    let mut spectrum: Vec<Complex<f64>> = ext.iter().map(|&v| Complex::new(v, 0.0)).collect();
    planner.plan_fft_forward(old_len).process(&mut spectrum);
    spectrum.truncate(old_len / 2 + 1);

    // The Nyquist bin of the shorter length is shared by both halves.
    let use_len = new_len.min(old_len);
    if use_len % 2 == 0 {
        if let Some(bin) = spectrum.get_mut(use_len / 2) {
            *bin *= if shorter { 2.0 } else { 0.5 };
        }
    }
    let scale = new_len as f64 / old_len as f64;
    spectrum.iter_mut().for_each(|v| *v *= scale);

    let y = irfft(planner, &spectrum, new_len);
    let start = ((ratio * pad_l as f64).round() as usize).min(new_len);
    let end = (start + n_out).min(new_len);
    let mut out: Vec<f32> = y[start..end].iter().map(|&v| v as f32).collect();
    out.resize(n_out, 0.0);
    out
}

/// Carry an event-marker channel to a new rate without blending codes.
///
/// Output sample `i` covers source samples `[⌊i·r⌋, ⌊(i+1)·r⌋)` with
/// `r = src / dst`, and takes the value of largest magnitude in that window
/// (the first one on ties), so no marker is lost when downsampling.
pub fn resample_markers(markers: &Array1<f32>, n_out: usize, src_sfreq: f32, dst_sfreq: f32) -> Array1<f32> {
    let n_in = markers.len();
    if n_in == 0 {
        return Array1::zeros(n_out);
    }
    let r = src_sfreq as f64 / dst_sfreq as f64;
    Array1::from_shape_fn(n_out, |i| {
        let start = ((i as f64 * r).floor() as usize).min(n_in - 1);
        let end = (((i + 1) as f64 * r).floor() as usize).clamp(start + 1, n_in);
        markers
            .slice(ndarray::s![start..end])
            .iter()
            .copied()
            .fold(0.0_f32, |best, v| if v.abs() > best.abs() { v } else { best })
    })
}
