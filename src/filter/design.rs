//! Butterworth band-pass design, matching
//! `scipy.signal.butter(order, [low, high], btype='band')` with `low`/`high`
//! normalised to Nyquist.
//!
//!   • analog prototype poles `exp(iπ(2k + N + 1) / 2N)`, k = 0..N
//!   • pre-warp band edges, low-pass → band-pass transform
//!   • bilinear transform (`fs = 2`, i.e. Nyquist-normalised)
//!   • conjugate pole pairs → second-order sections; each section carries one
//!     zero at `z = 1` and one at `z = -1`
//!   • overall gain set to unity at the digital band centre
use std::f64::consts::PI;

use rustfft::num_complex::Complex;

use crate::error::{EegError, Result};

/// One second-order section, `H(z) = (b0 + b1 z⁻¹ + b2 z⁻²) / (1 + a1 z⁻¹ + a2 z⁻²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    pub b: [f64; 3],
    /// `a[0]` is always 1.
    pub a: [f64; 3],
}

impl Sos {
    fn response(&self, z_inv: Complex<f64>) -> Complex<f64> {
        let z_inv2 = z_inv * z_inv;
        let num = z_inv * self.b[1] + z_inv2 * self.b[2] + self.b[0];
        let den = z_inv * self.a[1] + z_inv2 * self.a[2] + self.a[0];
        num / den
    }
}

/// Magnitude response of a cascade at normalised frequency `w`
/// (0 = DC, 1 = Nyquist).
pub fn sos_gain(sos: &[Sos], w: f64) -> f64 {
    let z_inv = Complex::from_polar(1.0, -PI * w);
    sos.iter()
        .map(|s| s.response(z_inv))
        .fold(Complex::new(1.0, 0.0), |acc, h| acc * h)
        .norm()
}

/// Design an order-`order` Butterworth band-pass for cutoffs in Hz.
///
/// Cutoffs are normalised as `cutoff / (sfreq / 2)`. Returns `order` sections.
pub fn butter_bandpass(order: usize, l_freq: f32, h_freq: f32, sfreq: f32) -> Result<Vec<Sos>> {
    let nyq = sfreq as f64 / 2.0;
    if !(nyq.is_finite() && nyq > 0.0) {
        return Err(EegError::InvalidParameter(format!("sampling rate {sfreq} is not positive")));
    }
    if order == 0 {
        return Err(EegError::InvalidParameter("filter order must be at least 1".into()));
    }
    let low = l_freq as f64 / nyq;
    let high = h_freq as f64 / nyq;
    if !(0.0 < low && low < high && high < 1.0) {
        return Err(EegError::InvalidParameter(format!(
            "band-pass needs 0 < {l_freq} < {h_freq} < {nyq} Hz"
        )));
    }
    Ok(butter_bandpass_normalized(order, low, high))
}

/// Same as [`butter_bandpass`] with edges already in `(0, 1)`.
pub fn butter_bandpass_normalized(order: usize, low: f64, high: f64) -> Vec<Sos> {
    // Bilinear transform with fs = 2 → 2·fs = 4.
    let fs2 = 4.0;
    let warp = |w: f64| fs2 * (PI * w / 2.0).tan();
    let (wl, wh) = (warp(low), warp(high));
    let bw = wh - wl;
    let w0_sq = wl * wh;

    let to_z = |s: Complex<f64>| (Complex::new(fs2, 0.0) + s) / (Complex::new(fs2, 0.0) - s);

    let mut complex_poles = Vec::with_capacity(order);
    let mut real_poles = Vec::new();
    for k in 0..order {
        let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
        let half = Complex::from_polar(1.0, theta) * (bw / 2.0);
        let disc = (half * half - w0_sq).sqrt();
        for s in [half + disc, half - disc] {
            let p = to_z(s);
            if p.im.abs() < 1e-12 {
                real_poles.push(p.re);
            } else if p.im > 0.0 {
                complex_poles.push(p);
            }
        }
    }
    real_poles.sort_by(|a, b| a.total_cmp(b));

    let zeros_b = [1.0, 0.0, -1.0];
    let mut sections: Vec<Sos> = complex_poles
        .iter()
        .map(|p| Sos { b: zeros_b, a: [1.0, -2.0 * p.re, p.norm_sqr()] })
        .collect();
    for pair in real_poles.chunks(2) {
        let (p1, p2) = (pair[0], pair.get(1).copied().unwrap_or(0.0));
        sections.push(Sos { b: zeros_b, a: [1.0, -(p1 + p2), p1 * p2] });
    }

    // Unity gain at the band centre.
    let w_center = 2.0 * (w0_sq.sqrt() / fs2).atan() / PI;
    let g = sos_gain(&sections, w_center);
    if g > 0.0 {
        if let Some(first) = sections.first_mut() {
            first.b.iter_mut().for_each(|v| *v /= g);
        }
    }
    sections
}
