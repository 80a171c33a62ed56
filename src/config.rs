//! Loader and conditioning configuration.
//!
//! [`LoadOptions`] tunes how strictly the CURRY parsers treat malformed input.
//! [`PipelineConfig`] describes the optional conditioning chain run by
//! [`crate::preprocess`]; every step is off by default.
use crate::reference::Reference;

/// Options for the format loaders.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Fail on `.rs3` anomalies instead of logging them.
    ///
    /// When `false` the channel-table scanner drops surplus numbers or labels,
    /// lets an unterminated section run to EOF and skips stray end markers.
    /// When `true` each of these is an [`crate::EegError::Format`]. A channel
    /// number declared twice is a `Format` error either way.
    ///
    /// Default: `false`.
    pub strict_rs3: bool,
}

/// Conditioning steps applied after loading, in field order.
///
/// ```
/// use eegload::{PipelineConfig, Reference};
///
/// let cfg = PipelineConfig {
///     reference: Some(Reference::Average),
///     bandpass:  Some((0.5, 40.0)),
///     ..PipelineConfig::default()
/// };
/// assert_eq!(cfg.filter_order, 5);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Re-referencing scheme.
    ///
    /// Default: `None` (data left as recorded).
    pub reference: Option<Reference>,

    /// Band-pass cutoffs `(low, high)` in Hz.
    ///
    /// Both must lie strictly between 0 and Nyquist with `low < high`.
    ///
    /// Default: `None`.
    pub bandpass: Option<(f32, f32)>,

    /// Butterworth order of the band-pass.
    ///
    /// The forward-backward application doubles the effective order.
    ///
    /// Default: `5`.
    pub filter_order: usize,

    /// Target sampling rate in Hz.
    ///
    /// Skipped when the recording is already at this rate (within 1 mHz).
    ///
    /// Default: `None`.
    pub target_sfreq: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference: None,
            bandpass: None,
            filter_order: 5,
            target_sfreq: None,
        }
    }
}

impl PipelineConfig {
    /// `true` when no step is enabled.
    pub fn is_identity(&self) -> bool {
        self.reference.is_none() && self.bandpass.is_none() && self.target_sfreq.is_none()
    }
}
