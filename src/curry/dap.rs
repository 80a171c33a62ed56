//! CURRY `.dap` metadata: one `key = value` pair per line.
//!
//! Lines without `=` are ignored. The line is split on its first `=` and both
//! halves are trimmed. Values stay strings; callers coerce with
//! [`Metadata::parse_required`].
//!
//! A key that appears more than once keeps its **last** value.
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{format_err, EegError, Result};

/// Keys the CURRY assembler cannot proceed without.
pub const NUM_SAMPLES: &str = "NumSamples";
pub const NUM_TRIALS: &str = "NumTrials";
pub const SAMPLE_FREQ_HZ: &str = "SampleFreqHz";

/// Flat string → string mapping parsed from a `.dap` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key`, or [`EegError::MissingField`].
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| EegError::MissingField(key.to_string()))
    }

    /// Parse the value for `key` as `T`.
    ///
    /// Absent key → `MissingField`; unparsable value → `Format`.
    pub fn parse_required<T: FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.require(key)?;
        raw.parse::<T>()
            .map_err(|_| format_err(format!("{key} = {raw:?} is not numeric")))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse `.dap` text.
pub fn parse_dap(text: &str) -> Metadata {
    let mut meta = Metadata::default();
    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        if let Some(prev) = meta.insert(key, value.trim()) {
            log::debug!("dap: duplicate key {key:?} (dropping earlier value {prev:?})");
        }
    }
    meta
}

/// Read and parse a `.dap` file.
pub fn read_dap(path: &Path) -> Result<Metadata> {
    let text = super::read_text(path)?;
    let meta = parse_dap(&text);
    log::debug!("dap: {} keys from {}", meta.len(), path.display());
    Ok(meta)
}
