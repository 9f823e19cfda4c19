//! Flat parameter buffers and the cursor that hands them out to layers.

mod buffer;
mod cursor;

pub use buffer::{from_bytes, read_file};
pub use cursor::ParamCursor;

use ndarray::ArrayViewMutD;

use crate::{InferenceErr, Result};

/// Copies the values in `buf` starting at `offset` into `targets`, in order.
///
/// Each target is filled in row-major order before moving on to the next one, which makes the
/// on-buffer layout "weights flattened, then bias flattened" for every parameterized layer.
///
/// # Arguments
/// * `buf` - The whole parameter buffer.
/// * `offset` - Where this layer's parameters start.
/// * `targets` - The tensors to fill.
///
/// # Returns
/// The amount of values consumed, or `InsufficientBuffer` if `buf` runs out. Nothing is
/// written when that happens.
pub(crate) fn load_into(
    buf: &[f32],
    offset: usize,
    targets: &mut [ArrayViewMutD<f32>],
) -> Result<usize> {
    let required: usize = targets.iter().map(|t| t.len()).sum();
    let end = offset.saturating_add(required);
    let src = buf
        .get(offset..end)
        .ok_or(InferenceErr::InsufficientBuffer {
            required: end,
            available: buf.len(),
        })?;

    let mut src = src.iter();
    for target in targets.iter_mut() {
        for (dst, &v) in target.iter_mut().zip(&mut src) {
            *dst = v;
        }
    }

    Ok(required)
}
