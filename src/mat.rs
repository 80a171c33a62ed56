//! MATLAB `.mat` recordings via the `matfile` reader.
//!
//! Expected top-level variables:
//!
//! | name       | shape  | meaning                          |
//! |------------|--------|----------------------------------|
//! | `data`     | T × N  | samples (column-major on disk)   |
//! | `fs`       | scalar | sampling rate in Hz              |
//! | `channels` | 1 × N  | optional channel labels          |
//!
//! `matfile` only decodes numeric arrays, so `channels` is honoured when it is
//! numeric (labels become the formatted numbers). Otherwise channels are named
//! `"0"`, `"1"`, … in column order.
use std::fs::File;
use std::path::Path;

use matfile::{MatFile, NumericData};
use ndarray::{Array2, ShapeBuilder};

use crate::error::{format_err, EegError, Result};
use crate::recording::Recording;

fn numeric_values(data: &NumericData) -> Vec<f64> {
    match data {
        NumericData::Double { real, .. } => real.clone(),
        NumericData::Single { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Int8 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt8 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Int16 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt16 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Int32 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt32 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::Int64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        NumericData::UInt64 { real, .. } => real.iter().map(|&v| v as f64).collect(),
        #[allow(unreachable_patterns)]
        _ => Vec::new(),
    }
}

/// Load a `.mat` recording.
pub fn read_mat<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(EegError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let mat = MatFile::parse(file).map_err(|e| EegError::Mat(format!("{e:?}")))?;

    let data = mat
        .find_by_name("data")
        .ok_or_else(|| EegError::MissingField("data".into()))?;
    let size = data.size();
    if size.len() != 2 {
        return Err(format_err(format!("mat: `data` must be 2-D, got shape {size:?}")));
    }
    let (n_times, n_ch) = (size[0], size[1]);
    let values: Vec<f32> = numeric_values(data.data()).into_iter().map(|v| v as f32).collect();
    let samples = Array2::from_shape_vec((n_times, n_ch).f(), values)
        .map_err(|e| format_err(format!("mat: `data` {size:?}: {e}")))?;

    let fs = mat
        .find_by_name("fs")
        .ok_or_else(|| EegError::MissingField("fs".into()))?;
    let sfreq = *numeric_values(fs.data())
        .first()
        .ok_or_else(|| format_err("mat: `fs` is empty"))?;

    let channels = match mat.find_by_name("channels") {
        Some(arr) => {
            let labels = numeric_values(arr.data());
            if labels.len() != n_ch {
                return Err(format_err(format!(
                    "mat: {} channel labels for {n_ch} data columns",
                    labels.len()
                )));
            }
            labels.iter().map(|v| v.to_string()).collect()
        }
        None => (0..n_ch).map(|c| c.to_string()).collect(),
    };

    let rec = Recording::new(samples, sfreq as f32, channels)?;
    log::info!(
        "mat: {} × {} @ {} Hz from {}",
        rec.n_times(),
        rec.n_channels(),
        rec.sfreq,
        path.display()
    );
    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_mat("/nonexistent/recording.mat"),
            Err(EegError::MissingFile(_))
        ));
    }

    #[test]
    fn integer_classes_widen() {
        let data = NumericData::Int16 { real: vec![-2, 7], imag: None };
        assert_eq!(numeric_values(&data), vec![-2.0, 7.0]);
    }
}
