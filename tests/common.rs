/// Shared helpers that write synthetic recordings into a temp dir.
use ndarray::Array2;
use std::path::{Path, PathBuf};

#[allow(unused)]
/// Deterministic `[T, N]` test signal: distinct slow ramps per channel.
pub fn ramp_samples(n_times: usize, n_ch: usize) -> Array2<f32> {
    Array2::from_shape_fn((n_times, n_ch), |(t, c)| (c as f32 + 1.0) * 10.0 + t as f32 * 0.5)
}

#[allow(unused)]
/// `.rs3` text for the given channel labels (numbered from 1).
pub fn rs3_text(labels: &[&str]) -> String {
    rs3_text_with_others(labels, &[])
}

#[allow(unused)]
/// `.rs3` text with EEG `labels` numbered from 1 and, when `others` is not
/// empty, a second group numbered from 1 relative to the last EEG number (the
/// way Curry exports place EOG and Trigger).
pub fn rs3_text_with_others(labels: &[&str], others: &[&str]) -> String {
    let mut s = String::from("LABELS_VERSION 1\nNUMBERS START_LIST\n");
    for i in 0..labels.len() {
        s.push_str(&format!("{}\n", i + 1));
    }
    s.push_str("NUMBERS END_LIST\nLABELS START_LIST\n");
    for l in labels {
        s.push_str(l);
        s.push('\n');
    }
    s.push_str("LABELS END_LIST\n");
    if !others.is_empty() {
        s.push_str("NUMBERS_OTHERS START_LIST\n");
        for i in 0..others.len() {
            s.push_str(&format!("{}\n", i + 1));
        }
        s.push_str("NUMBERS_OTHERS END_LIST\nLABELS_OTHERS START_LIST\n");
        for l in others {
            s.push_str(l);
            s.push('\n');
        }
        s.push_str("LABELS_OTHERS END_LIST\n");
    }
    s
}

#[allow(unused)]
/// `.dap` text with the three fields the loader requires plus a free-form one.
pub fn dap_text(n_samples: usize, n_trials: usize, sfreq: f32) -> String {
    format!(
        "DataFormat = ASCII\nNumSamples = {n_samples}\nNumTrials = {n_trials}\nSampleFreqHz = {sfreq}\nDataGainAtten = 1\n"
    )
}

#[allow(unused)]
/// Raw little-endian `.dat` bytes for `[T, N]` samples.
pub fn dat_bytes(samples: &Array2<f32>) -> Vec<u8> {
    samples.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[allow(unused)]
/// Write `<dir>/<name>.{dat,rs3,dap}` and return the base path.
pub fn write_curry(dir: &Path, name: &str, samples: &Array2<f32>, labels: &[&str], sfreq: f32) -> PathBuf {
    write_curry_rs3(dir, name, samples, &rs3_text(labels), sfreq)
}

#[allow(unused)]
/// Same as [`write_curry`] with caller-supplied `.rs3` text.
pub fn write_curry_rs3(dir: &Path, name: &str, samples: &Array2<f32>, rs3: &str, sfreq: f32) -> PathBuf {
    let base = dir.join(name);
    std::fs::write(base.with_extension("dat"), dat_bytes(samples)).unwrap();
    std::fs::write(base.with_extension("rs3"), rs3).unwrap();
    std::fs::write(base.with_extension("dap"), dap_text(samples.nrows(), 1, sfreq)).unwrap();
    base
}

#[allow(unused)]
/// TUSZ feature bytes: header (C, F) then C·F records of `L + 1` floats.
///
/// Record 0's slot is the `L` header field; other slots are filled with -1.
/// Feature `l` of record `r` is `r * 100 + l`.
pub fn tusz_bytes(c: u32, f: u32, l: u32) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&c.to_le_bytes());
    b.extend_from_slice(&f.to_le_bytes());
    for r in 0..(c * f) as usize {
        if r == 0 {
            b.extend_from_slice(&l.to_le_bytes());
        } else {
            b.extend_from_slice(&(-1.0_f32).to_le_bytes());
        }
        for k in 0..l as usize {
            b.extend_from_slice(&((r * 100 + k) as f32).to_le_bytes());
        }
    }
    b
}

#[allow(unused)]
/// Sine of `freq` Hz sampled at `sfreq` for `n` samples.
pub fn sine(freq: f64, sfreq: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sfreq).sin())
        .collect()
}

#[allow(unused)]
/// Root-mean-square of a slice.
pub fn rms(x: &[f64]) -> f64 {
    (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}
