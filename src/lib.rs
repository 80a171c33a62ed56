//! # eegload: EEG recordings from vendor formats into one shape
//!
//! `eegload` reads EEG recordings stored as CURRY triplets, EDF or MATLAB
//! files into a single [`Recording`] (`[T, N]` samples, sampling rate,
//! channel names, optional trigger markers), decodes TUSZ binary feature
//! files into a `[L, C, F]` tensor, and provides the usual conditioning
//! steps on a loaded recording.
//!
//! ## Overview
//!
//! ```text
//! subject01.{dat,rs3,dap}   recording.edf   recording.mat      feats.raw
//!   │                         │               │                  │
//!   ├─ curry::read_curry()    edf::read_edf() mat::read_mat()    tusz::read_features()
//!   │    ├─ dap   key = value metadata                           │
//!   │    ├─ rs3   channel table (FSM)                            └─→ FeatureTensor
//!   │    └─ dat   f32 [T, N], Trigger → markers
//!   └──────────────┬───────────────┘
//!                  └─→ Recording
//!                        ├─ reference   average / Cz
//!                        ├─ filter      Butterworth band-pass, zero-phase
//!                        └─ resample    FFT rational resampler
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use eegload::{loadeeg, preprocess, PipelineConfig, Reference};
//!
//! let mut rec = loadeeg("data/subject01", "CURRY").unwrap();
//! println!("{} samples × {} channels @ {} Hz", rec.n_times(), rec.n_channels(), rec.sfreq);
//!
//! let cfg = PipelineConfig {
//!     reference:    Some(Reference::Average),
//!     bandpass:     Some((0.5, 40.0)),
//!     target_sfreq: Some(128.0),
//!     ..PipelineConfig::default()
//! };
//! preprocess(&mut rec, &cfg).unwrap();
//! ```
//!
//! ## Running individual steps
//!
//! ```no_run
//! use eegload::filter::{butter_bandpass, sosfiltfilt_inplace};
//! use eegload::reference::average_reference_inplace;
//! use eegload::resample::resample;
//! use ndarray::Array2;
//!
//! let mut data: Array2<f32> = Array2::zeros((5000, 32)); // [T, N]
//!
//! let avg = average_reference_inplace(&mut data);       // [T]
//! let sos = butter_bandpass(5, 1.0, 40.0, 500.0).unwrap();
//! sosfiltfilt_inplace(&mut data, &sos);
//! let data = resample(&data, 500.0, 250.0).unwrap();    // [2500, 32]
//! ```

pub mod config;
pub mod curry;
pub mod edf;
pub mod error;
pub mod filter;
pub mod format;
pub mod io;
pub mod mat;
pub mod recording;
pub mod reference;
pub mod resample;
pub mod tusz;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use config::{LoadOptions, PipelineConfig};
pub use curry::{read_curry, read_curry_with, ChannelTable, CurryFiles, Metadata, ParseMode};
pub use edf::read_edf;
pub use error::{EegError, Result};
pub use format::{load, load_with, loadeeg, Format};
pub use mat::read_mat;
pub use recording::Recording;
pub use reference::{average_reference_inplace, channel_reference_inplace, Reference};
pub use tusz::{read_features, FeatureTensor};

/// Run the enabled conditioning steps of `cfg` on `rec`, in place.
///
/// # Pipeline steps
///
/// 1. Re-reference ([`PipelineConfig::reference`]).
/// 2. Zero-phase Butterworth band-pass ([`PipelineConfig::bandpass`],
///    [`PipelineConfig::filter_order`]).
/// 3. Resample to [`PipelineConfig::target_sfreq`], skipped when the rate
///    already matches within 1 mHz.
///
/// Returns the removed average waveform (`[T]`, at the original rate) when
/// step 1 used [`Reference::Average`].
///
/// # Errors
///
/// * [`EegError::ReferenceChannelNotFound`] for `Cz` on a recording without it.
/// * [`EegError::InvalidParameter`] for out-of-range cutoffs, order or rate.
pub fn preprocess(rec: &mut Recording, cfg: &PipelineConfig) -> Result<Option<ndarray::Array1<f32>>> {
    // 1. Re-reference.
    let avg = match cfg.reference {
        Some(reference) => rec.rereference(reference)?,
        None => None,
    };

    // 2. Band-pass.
    if let Some((l_freq, h_freq)) = cfg.bandpass {
        rec.bandpass(l_freq, h_freq, cfg.filter_order)?;
    }

    // 3. Resample.
    if let Some(target) = cfg.target_sfreq {
        if (rec.sfreq - target).abs() > 1e-3 {
            rec.resample(target)?;
        }
    }

    log::debug!(
        "preprocess: {} × {} @ {} Hz",
        rec.n_times(),
        rec.n_channels(),
        rec.sfreq
    );
    Ok(avg)
}
