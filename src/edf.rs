//! EDF/EDF+ recordings via the `edfplus` reader.
//!
//! Only EEG signals are kept: after removing spaces, a label must start with
//! `EEG`, and the channel name is the text between that prefix and the first
//! `-` (e.g. `EEG FP1-REF` → `FP1`). The sampling rate is the `FP1` channel's
//! if there is one, otherwise the first kept channel's.
use std::path::Path;

use edfplus::{EdfReader, EDFLIB_TIME_DIMENSION};
use ndarray::Array2;

use crate::error::{format_err, EegError, Result};
use crate::recording::Recording;

const EEG_PREFIX: &str = "EEG";
const RATE_CHANNEL: &str = "FP1";

/// Core channel name for an EDF signal label, or `None` if it is not EEG.
pub fn eeg_channel_name(label: &str) -> Option<String> {
    let compact: String = label.chars().filter(|c| *c != ' ').collect();
    let rest = compact.strip_prefix(EEG_PREFIX)?;
    let core = rest.split('-').next().unwrap_or(rest);
    Some(core.to_string())
}

/// Load the EEG channels of an EDF file.
pub fn read_edf<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(EegError::MissingFile(path.to_path_buf()));
    }
    let mut reader = EdfReader::open(path)?;

    let record_secs = reader.header().datarecord_duration as f64 / EDFLIB_TIME_DIMENSION as f64;
    let selected: Vec<(usize, String, f64, usize)> = reader
        .header()
        .signals
        .iter()
        .enumerate()
        .filter_map(|(i, sig)| {
            let name = eeg_channel_name(&sig.label)?;
            let sfreq = sig.samples_per_record as f64 / record_secs;
            Some((i, name, sfreq, sig.samples_in_file.max(0) as usize))
        })
        .collect();
    if selected.is_empty() {
        return Err(format_err(format!("edf: no EEG channels in {}", path.display())));
    }

    let sfreq = selected
        .iter()
        .find(|(_, name, _, _)| name.eq_ignore_ascii_case(RATE_CHANNEL))
        .unwrap_or(&selected[0])
        .2;
    let n_times = selected[0].3;
    if let Some((_, name, _, n)) = selected.iter().find(|s| s.3 != n_times) {
        return Err(format_err(format!(
            "edf: channel {name} has {n} samples, expected {n_times} (mixed sampling rates)"
        )));
    }

    let mut samples = Array2::<f32>::zeros((n_times, selected.len()));
    for (col, (signal, _, _, _)) in selected.iter().enumerate() {
        let values = reader.read_physical_samples(*signal, n_times)?;
        if values.len() != n_times {
            return Err(format_err(format!(
                "edf: signal {signal} returned {} of {n_times} samples",
                values.len()
            )));
        }
        samples
            .column_mut(col)
            .iter_mut()
            .zip(values)
            .for_each(|(o, v)| *o = v as f32);
    }

    let channels = selected.into_iter().map(|(_, name, _, _)| name).collect();
    let rec = Recording::new(samples, sfreq as f32, channels)?;
    log::info!(
        "edf: {} × {} @ {} Hz from {}",
        rec.n_times(),
        rec.n_channels(),
        rec.sfreq,
        path.display()
    );
    Ok(rec)
}
