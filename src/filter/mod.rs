//! IIR band-pass filtering.
//!
//! - [`design`]: Butterworth band-pass as second-order sections, matching
//!   `scipy.signal.butter(..., btype='band')`.
//! - [`apply`]: zero-phase forward-backward application along the time axis,
//!   matching `scipy.signal.sosfiltfilt`.

pub mod apply;
pub mod design;

pub use design::{butter_bandpass, butter_bandpass_normalized, sos_gain, Sos};
pub use apply::{sosfilt, sosfilt_zi, sosfiltfilt, sosfiltfilt_inplace};
