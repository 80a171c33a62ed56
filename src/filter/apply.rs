//! Zero-phase forward-backward IIR filtering, matching `scipy.signal.sosfiltfilt`.
//!
//! The signal is extended by odd reflection of `3 × (2·n_sections + 1)`
//! samples on each side (clamped to `len − 1`), filtered forward with the
//! step-response steady state scaled by the first sample as initial
//! condition, reversed, filtered again the same way, reversed and stripped.
use ndarray::Array2;

use super::design::Sos;

/// Apply [`sosfiltfilt`] to every channel of `data` (`[T, N]`) in place.
pub fn sosfiltfilt_inplace(data: &mut Array2<f32>, sos: &[Sos]) {
    for mut col in data.columns_mut() {
        let x: Vec<f64> = col.iter().map(|&v| v as f64).collect();
        let y = sosfiltfilt(sos, &x);
        col.iter_mut().zip(y).for_each(|(o, v)| *o = v as f32);
    }
}

/// Zero-phase filter a single 1-D signal. Output length equals input length.
pub fn sosfiltfilt(sos: &[Sos], x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 0 || sos.is_empty() {
        return x.to_vec();
    }

    let trivial = sos
        .iter()
        .filter(|s| s.b[2] == 0.0)
        .count()
        .min(sos.iter().filter(|s| s.a[2] == 0.0).count());
    let n_taps = 2 * sos.len() + 1 - trivial;
    let pad = (3 * n_taps).min(n - 1);

    let zi = sosfilt_zi(sos);
    let mut y = odd_ext(x, pad);

    let x0 = y[0];
    sosfilt(sos, &mut y, &zi, x0);
    y.reverse();
    let y0 = y[0];
    sosfilt(sos, &mut y, &zi, y0);
    y.reverse();

    y[pad..pad + n].to_vec()
}

/// Run the cascade over `x` in place (Direct Form II transposed), starting
/// from `zi × x0`.
pub fn sosfilt(sos: &[Sos], x: &mut [f64], zi: &[[f64; 2]], x0: f64) {
    let mut state: Vec<[f64; 2]> = zi.iter().map(|z| [z[0] * x0, z[1] * x0]).collect();
    for v in x.iter_mut() {
        let mut s = *v;
        for (sec, z) in sos.iter().zip(state.iter_mut()) {
            let y = sec.b[0] * s + z[0];
            z[0] = sec.b[1] * s - sec.a[1] * y + z[1];
            z[1] = sec.b[2] * s - sec.a[2] * y;
            s = y;
        }
        *v = s;
    }
}

/// Steady-state section states for a unit step input.
pub fn sosfilt_zi(sos: &[Sos]) -> Vec<[f64; 2]> {
    let mut scale = 1.0;
    sos.iter()
        .map(|s| {
            let [b0, b1, b2] = s.b;
            let [_, a1, a2] = s.a;
            let g = (b0 + b1 + b2) / (1.0 + a1 + a2);
            let zi = [scale * (b1 + b2 - (a1 + a2) * g), scale * (b2 - a2 * g)];
            scale *= g;
            zi
        })
        .collect()
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Odd reflection about both end points.
///
/// Left:  `pad[i] = 2*x[0] - x[n-i]`  for i in 1..=n
/// Right: `pad[i] = 2*x[-1] - x[-(i+1)]` for i in 1..=n
fn odd_ext(x: &[f64], n_pad: usize) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * n_pad);
    for i in (1..=n_pad).rev() {
        out.push(2.0 * x[0] - x[i]);
    }
    out.extend_from_slice(x);
    let last = x[n - 1];
    for i in 1..=n_pad {
        out.push(2.0 * last - x[n - 1 - i]);
    }
    out
}
