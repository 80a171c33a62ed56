//! TUSZ binary feature files.
//!
//! Layout (all fields little-endian, 4 bytes):
//!
//! ```text
//! ┌─────────┬─────────┬─────────┐
//! │ C : u32 │ F : u32 │ L : u32 │   channels, frames, feature length
//! └─────────┴─────────┴─────────┘
//!           ├───────────── payload, read from byte 8 ─────────────────┤
//!           │ slot: f32 │ L × f32 │ slot: f32 │ L × f32 │ …  C·F records
//! ```
//!
//! The payload starts at byte 8, so the `L` header field doubles as the slot
//! of the first record. Each record is `L + 1` floats; the leading slot is
//! discarded. Records run frame-fastest: all `F` frames of channel 0, then
//! channel 1, and so on. Bytes past `C × F × (L + 1) × 4` are ignored.
use std::path::Path;

use ndarray::Array3;

use crate::error::{format_err, Result};

const WORD: usize = 4;
/// Bytes skipped before the payload (the `C` and `F` fields).
const PAYLOAD_OFFSET: usize = 2 * WORD;

/// Decoded feature file.
#[derive(Debug, Clone)]
pub struct FeatureTensor {
    /// Source file name with its final 4-character extension removed.
    pub name: String,
    /// `[L, C, F]`: feature index, channel, frame.
    pub feats: Array3<f32>,
}

impl FeatureTensor {
    pub fn n_features(&self) -> usize {
        self.feats.dim().0
    }

    pub fn n_channels(&self) -> usize {
        self.feats.dim().1
    }

    pub fn n_frames(&self) -> usize {
        self.feats.dim().2
    }
}

fn read_u32(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

/// Decode an in-memory feature file.
pub fn decode_features(bytes: &[u8]) -> Result<Array3<f32>> {
    if bytes.len() < 3 * WORD {
        return Err(format_err(format!(
            "tusz: {} bytes is too short for the 12-byte header",
            bytes.len()
        )));
    }
    let n_ch = read_u32(bytes, 0) as usize;
    let n_frames = read_u32(bytes, 4) as usize;
    let n_feats = read_u32(bytes, 8) as usize;

    let record = (n_feats + 1) * WORD;
    let payload_len = n_ch
        .checked_mul(n_frames)
        .and_then(|n| n.checked_mul(record))
        .ok_or_else(|| format_err("tusz: header dimensions overflow"))?;

    let available = bytes.len() - PAYLOAD_OFFSET;
    let payload = &bytes[PAYLOAD_OFFSET..PAYLOAD_OFFSET + payload_len.min(available)];
    if payload.len() % record != 0 {
        return Err(format_err(format!(
            "tusz: payload of {} bytes is not a multiple of the {record}-byte record",
            payload.len()
        )));
    }
    if payload.len() < payload_len {
        return Err(format_err(format!(
            "tusz: header declares {n_ch} channels × {n_frames} frames but only {} records are present",
            payload.len() / record
        )));
    }

    let mut feats = Array3::<f32>::zeros((n_feats, n_ch, n_frames));
    for (i, rec) in payload.chunks_exact(record).enumerate() {
        let (ch, frame) = (i / n_frames, i % n_frames);
        for (l, b) in rec[WORD..].chunks_exact(WORD).enumerate() {
            feats[[l, ch, frame]] = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        }
    }
    Ok(feats)
}

/// Identifier for a feature file: its name minus the last 4 characters.
pub fn feature_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let keep = file.chars().count().saturating_sub(4);
    file.chars().take(keep).collect()
}

/// Read and decode a TUSZ feature file.
pub fn read_features<P: AsRef<Path>>(path: P) -> Result<FeatureTensor> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let feats = decode_features(&bytes)?;
    log::info!("tusz: features {:?} from {}", feats.dim(), path.display());
    Ok(FeatureTensor { name: feature_name(path), feats })
}
