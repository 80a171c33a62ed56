//! Format dispatch: one entry point for every supported recording format.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::LoadOptions;
use crate::error::{EegError, Result};
use crate::recording::Recording;
use crate::{curry, edf, mat};

/// Recording formats [`load`] understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// European Data Format (`.edf`).
    #[default]
    Edf,
    /// MATLAB file with `data` / `fs` / `channels`.
    Mat,
    /// CURRY `.dat` + `.rs3` + `.dap` triplet.
    Curry,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Edf, Format::Mat, Format::Curry];

    pub fn tag(self) -> &'static str {
        match self {
            Format::Edf => "EDF",
            Format::Mat => "MAT",
            Format::Curry => "CURRY",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Format {
    type Err = EegError;

    /// Case-insensitive `EDF`, `MAT` or `CURRY`.
    fn from_str(s: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EegError::UnsupportedFormat(s.to_string()))
    }
}

/// Load `path` as the format named by `tag`.
///
/// An unknown tag fails with [`EegError::UnsupportedFormat`] before any file
/// is touched.
///
/// ```no_run
/// let rec = eegload::loadeeg("data/subject01", "CURRY").unwrap();
/// println!("{} × {}", rec.n_times(), rec.n_channels());
/// ```
pub fn loadeeg<P: AsRef<Path>>(path: P, tag: &str) -> Result<Recording> {
    let format: Format = tag.parse()?;
    load(path, format)
}

/// Load `path` as `format` with default options.
pub fn load<P: AsRef<Path>>(path: P, format: Format) -> Result<Recording> {
    load_with(path, format, &LoadOptions::default())
}

/// Load `path` as `format`.
pub fn load_with<P: AsRef<Path>>(path: P, format: Format, opts: &LoadOptions) -> Result<Recording> {
    let path = path.as_ref();
    log::debug!("loading {} as {format}", path.display());
    match format {
        Format::Edf => edf::read_edf(path),
        Format::Mat => mat::read_mat(path),
        Format::Curry => curry::read_curry_with(path, opts),
    }
}
