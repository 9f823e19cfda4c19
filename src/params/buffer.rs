use std::{fs, path::Path};

use crate::{InferenceErr, Result};

/// Reinterprets raw bytes as native-endian IEEE-754 single precision floats.
///
/// This is the layout written by numpy's `tofile` / `tobytes` for `float32` arrays.
///
/// # Arguments
/// * `bytes` - The raw bytes, with no header.
///
/// # Returns
/// The decoded values, or `MalformedBuffer` if the length isn't a multiple of 4.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % size_of::<f32>() != 0 {
        return Err(InferenceErr::MalformedBuffer { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(size_of::<f32>())
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

/// Reads a raw `f32` file, see [`from_bytes`].
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<f32>> {
    let bytes = fs::read(path)?;
    from_bytes(&bytes)
}
