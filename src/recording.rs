//! The uniform in-memory shape every loader produces.
use ndarray::{Array1, Array2};

use crate::curry::Metadata;
use crate::error::{EegError, Result};
use crate::reference::{self, Reference};
use crate::{filter, resample};

/// A loaded EEG recording.
#[derive(Debug, Clone)]
pub struct Recording {
    /// `[T, N]`: one row per time sample, one column per channel.
    pub samples: Array2<f32>,
    /// Sampling rate (Hz).
    pub sfreq: f32,
    /// Channel names; position `i` names column `i` of `samples`.
    pub channels: Vec<String>,
    /// Trigger channel (CURRY only), one value per time sample.
    pub markers: Option<Array1<f32>>,
    /// Raw recording parameters (CURRY only).
    pub params: Option<Metadata>,
}

impl Recording {
    /// Build a recording, checking that names match columns and the rate is positive.
    pub fn new(samples: Array2<f32>, sfreq: f32, channels: Vec<String>) -> Result<Self> {
        if channels.len() != samples.ncols() {
            return Err(EegError::Format(format!(
                "{} channel names for {} data columns",
                channels.len(),
                samples.ncols()
            )));
        }
        if !(sfreq.is_finite() && sfreq > 0.0) {
            return Err(EegError::Format(format!("sampling rate {sfreq} is not positive")));
        }
        Ok(Self { samples, sfreq, channels, markers: None, params: None })
    }

    #[inline]
    pub fn n_times(&self) -> usize {
        self.samples.nrows()
    }

    #[inline]
    pub fn n_channels(&self) -> usize {
        self.samples.ncols()
    }

    /// Total duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.n_times() as f64 / self.sfreq as f64
    }

    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c == name)
    }

    /// Re-reference `samples` in place. The channel list is untouched.
    ///
    /// [`Reference::Average`] returns the removed per-sample mean `[T]`;
    /// [`Reference::Cz`] returns `None` and leaves the Cz column all zero.
    pub fn rereference(&mut self, reference: Reference) -> Result<Option<Array1<f32>>> {
        match reference {
            Reference::Average => Ok(Some(reference::average_reference_inplace(&mut self.samples))),
            Reference::Cz => {
                reference::channel_reference_inplace(&mut self.samples, &self.channels, &["Cz", "CZ"])?;
                Ok(None)
            }
        }
    }

    /// Zero-phase Butterworth band-pass along the time axis.
    pub fn bandpass(&mut self, l_freq: f32, h_freq: f32, order: usize) -> Result<()> {
        let sos = filter::butter_bandpass(order, l_freq, h_freq, self.sfreq)?;
        filter::sosfiltfilt_inplace(&mut self.samples, &sos);
        Ok(())
    }

    /// Resample to `dst_sfreq`, keeping markers aligned.
    pub fn resample(&mut self, dst_sfreq: f32) -> Result<()> {
        if !(dst_sfreq.is_finite() && dst_sfreq > 0.0) {
            return Err(EegError::InvalidParameter(format!(
                "target sampling rate {dst_sfreq} is not positive"
            )));
        }
        let src_sfreq = self.sfreq;
        self.samples = resample::resample(&self.samples, src_sfreq, dst_sfreq)?;
        if let Some(markers) = self.markers.take() {
            self.markers = Some(resample::resample_markers(&markers, self.samples.nrows(), src_sfreq, dst_sfreq));
        }
        self.sfreq = dst_sfreq;
        Ok(())
    }
}
