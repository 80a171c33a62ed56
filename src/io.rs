//! Safetensors export/import of loaded recordings and feature tensors.
//!
//! Recording layout:
//!
//! | key        | dtype | shape  |
//! |------------|-------|--------|
//! | `samples`  | F32   | [T, N] |
//! | `sfreq`    | F32   | [1]    |
//! | `markers`  | F32   | [T]    (only when present) |
//! | `ch_names` | U8    | channel names as a JSON string array |
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, Array3};
use std::collections::HashMap;
use std::path::Path;

use crate::recording::Recording;
use crate::tusz::FeatureTensor;

// ── Low-level safetensors parser (raw bytes → ndarray, no dependency on the
//    `safetensors` crate's tensor types). ──────────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into()?) as usize;
    let end = 8usize.checked_add(n).filter(|&e| e <= bytes.len())
        .context("safetensors header length exceeds file size")?;
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..end])
            .context("failed to parse safetensors header")?;
    Ok((header, end))
}

fn tensor_bytes<'a>(bytes: &'a [u8], data_start: usize, entry: &serde_json::Value) -> Result<&'a [u8]> {
    let offsets = entry["data_offsets"].as_array().context("missing data_offsets")?;
    let (s, e) = match offsets.as_slice() {
        [s, e] => (
            s.as_u64().context("bad data offset")? as usize,
            e.as_u64().context("bad data offset")? as usize,
        ),
        _ => bail!("data_offsets must have two entries"),
    };
    bytes
        .get(data_start + s..data_start + e)
        .context("tensor data out of range")
}

fn read_f32_tensor(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f32>> {
    if entry["dtype"].as_str() != Some("F32") {
        bail!("expected F32 tensor, got {}", entry["dtype"]);
    }
    Ok(tensor_bytes(bytes, data_start, entry)?
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("missing shape")?
        .iter()
        .map(|v| v.as_u64().map(|n| n as usize).context("bad shape entry"))
        .collect()
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Simple safetensors file writer for F32 and U8 tensors.
///
/// ```rust,no_run
/// use eegload::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f32("signal", &[1.0f32, 2.0, 3.0], &[1, 3]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f32_arr1(&mut self, name: &str, arr: &Array1<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.len()]);
    }

    pub fn add_f32_arr2(&mut self, name: &str, arr: &Array2<f32>) {
        // `iter()` walks logical (row-major) order whatever the memory layout.
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_f32_arr3(&mut self, name: &str, arr: &Array3<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        let (a, b, c) = arr.dim();
        self.add_f32(name, &data, &[a, b, c]);
    }

    pub fn add_u8(&mut self, name: &str, data: &[u8]) {
        self.entries.push((name.to_string(), data.to_vec(), "U8", vec![data.len()]));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

// ── Recording / feature helpers ───────────────────────────────────────────────

/// Write a recording to `path`.
pub fn write_recording(rec: &Recording, path: &Path) -> Result<()> {
    let mut w = StWriter::new();
    w.add_f32_arr2("samples", &rec.samples);
    w.add_f32("sfreq", &[rec.sfreq], &[1]);
    if let Some(markers) = &rec.markers {
        w.add_f32_arr1("markers", markers);
    }
    w.add_u8("ch_names", &serde_json::to_vec(&rec.channels)?);
    w.write(path)
}

/// Read a recording written by [`write_recording`].
///
/// `params` are not stored and come back as `None`.
pub fn read_recording(path: &Path) -> Result<Recording> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let entry = header.get("samples").context("missing 'samples' key")?;
    let shape = shape_of(entry)?;
    let [n_times, n_ch] = shape[..] else {
        bail!("'samples' must be 2-D, got {shape:?}");
    };
    let samples = Array2::from_shape_vec((n_times, n_ch), read_f32_tensor(&bytes, data_start, entry)?)?;

    let sfreq_entry = header.get("sfreq").context("missing 'sfreq' key")?;
    let sfreq = *read_f32_tensor(&bytes, data_start, sfreq_entry)?
        .first()
        .context("empty 'sfreq'")?;

    let channels: Vec<String> = match header.get("ch_names") {
        Some(e) => serde_json::from_slice(tensor_bytes(&bytes, data_start, e)?)
            .context("'ch_names' is not a JSON string array")?,
        None => (0..n_ch).map(|c| c.to_string()).collect(),
    };

    let mut rec = Recording::new(samples, sfreq, channels)?;
    if let Some(e) = header.get("markers") {
        let markers = read_f32_tensor(&bytes, data_start, e)?;
        if markers.len() != n_times {
            bail!("'markers' has {} values for {n_times} samples", markers.len());
        }
        rec.markers = Some(Array1::from(markers));
    }
    Ok(rec)
}

/// Write decoded TUSZ features: `feats` [L, C, F] plus `name` (U8).
pub fn write_features(ft: &FeatureTensor, path: &Path) -> Result<()> {
    let mut w = StWriter::new();
    w.add_f32_arr3("feats", &ft.feats);
    w.add_u8("name", ft.name.as_bytes());
    w.write(path)
}
