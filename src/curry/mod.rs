//! CURRY (Compumedics) recordings.
//!
//! A recording is three sibling files sharing one base name:
//!
//! | file   | content                                    | parser            |
//! |--------|--------------------------------------------|-------------------|
//! | `.dap` | `key = value` acquisition parameters       | [`dap::read_dap`] |
//! | `.rs3` | sensor numbers + labels                    | [`rs3::read_rs3`] |
//! | `.dat` | flat little-endian `f32` samples, `[T, N]` | [`dat::read_dat`] |
//!
//! `T = NumSamples × NumTrials` comes from the `.dap`, `N` from the `.rs3`.
//! A channel labelled exactly `Trigger` is split off into
//! [`Recording::markers`].
//!
//! # Quick start
//! ```no_run
//! use eegload::curry::read_curry;
//!
//! let rec = read_curry("data/subject01").unwrap();
//! println!("{} channels @ {} Hz", rec.n_channels(), rec.sfreq);
//! ```
pub mod dap;
pub mod dat;
pub mod rs3;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ndarray::Axis;

use crate::config::LoadOptions;
use crate::error::{EegError, Result};
use crate::recording::Recording;

pub use dap::{parse_dap, read_dap, Metadata};
pub use dat::{read_dat, samples_from_bytes};
pub use rs3::{parse_rs3, read_rs3, ChannelTable, ParseMode};

/// Label of the channel carrying event markers.
pub const TRIGGER_CHANNEL: &str = "Trigger";

const EXTENSIONS: [&str; 3] = ["dat", "rs3", "dap"];

/// The three sibling paths of one CURRY recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurryFiles {
    pub dat: PathBuf,
    pub rs3: PathBuf,
    pub dap: PathBuf,
}

impl CurryFiles {
    /// Derive sibling paths from `base`.
    ///
    /// `base` may name any one of the three files; a trailing `.dat`, `.rs3`
    /// or `.dap` is stripped first. Other dots are part of the name.
    pub fn from_base(base: &Path) -> Self {
        let stem = match base.extension().and_then(|e| e.to_str()) {
            Some(ext) if EXTENSIONS.iter().any(|c| c.eq_ignore_ascii_case(ext)) => base.with_extension(""),
            _ => base.to_path_buf(),
        };
        let sibling = |ext: &str| {
            let mut name = OsString::from(stem.as_os_str());
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        };
        Self { dat: sibling("dat"), rs3: sibling("rs3"), dap: sibling("dap") }
    }

    /// Fail with [`EegError::MissingFile`] naming the first absent sibling.
    pub fn check_exist(&self) -> Result<()> {
        for path in [&self.dat, &self.rs3, &self.dap] {
            if !path.is_file() {
                return Err(EegError::MissingFile(path.clone()));
            }
        }
        Ok(())
    }
}

/// Load a CURRY recording with default (lenient) options.
pub fn read_curry<P: AsRef<Path>>(base: P) -> Result<Recording> {
    read_curry_with(base, &LoadOptions::default())
}

/// Load a CURRY recording.
pub fn read_curry_with<P: AsRef<Path>>(base: P, opts: &LoadOptions) -> Result<Recording> {
    let files = CurryFiles::from_base(base.as_ref());
    files.check_exist()?;

    let params = read_dap(&files.dap)?;
    let n_per_trial: usize = params.parse_required(dap::NUM_SAMPLES)?;
    let n_trials: usize = params.parse_required(dap::NUM_TRIALS)?;
    let sfreq: f32 = params.parse_required(dap::SAMPLE_FREQ_HZ)?;
    let n_samples = n_per_trial
        .checked_mul(n_trials)
        .ok_or_else(|| EegError::Format("NumSamples × NumTrials overflows".into()))?;

    let mode = if opts.strict_rs3 { ParseMode::Strict } else { ParseMode::Lenient };
    let table = read_rs3(&files.rs3, mode)?;

    let mut samples = read_dat(&files.dat, table.len(), n_samples)?;
    let mut channels: Vec<String> = table.names().map(str::to_string).collect();

    let markers = match table.position(TRIGGER_CHANNEL) {
        Some(idx) => {
            let column = samples.column(idx).to_owned();
            let keep: Vec<usize> = (0..samples.ncols()).filter(|&c| c != idx).collect();
            samples = samples.select(Axis(1), &keep);
            channels.remove(idx);
            Some(column)
        }
        None => None,
    };

    let mut rec = Recording::new(samples, sfreq, channels)?;
    rec.markers = markers;
    rec.params = Some(params);
    log::info!(
        "curry: {} × {} @ {} Hz from {} (trigger: {})",
        rec.n_times(),
        rec.n_channels(),
        rec.sfreq,
        files.dat.display(),
        rec.markers.is_some()
    );
    Ok(rec)
}

/// Read a text file, falling back to Latin-1 when it is not valid UTF-8.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(EegError::MissingFile(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    })
}
