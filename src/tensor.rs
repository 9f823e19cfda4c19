use ndarray::{ArrayD, ArrayView2, ArrayView4, ArrayViewD, Ix2, Ix4};

use crate::{InferenceErr, Result};

/// The dynamic-rank tensor every layer consumes and produces.
///
/// Spatial layers use the (batch, channels, height, width) layout and dense layers use
/// (batch, features).
pub type Tensor = ArrayD<f32>;

/// Views `x` as a (batch, features) matrix.
pub(crate) fn as_matrix<'a>(
    layer: &'static str,
    x: &ArrayViewD<'a, f32>,
) -> Result<ArrayView2<'a, f32>> {
    x.clone()
        .into_dimensionality::<Ix2>()
        .map_err(|_| InferenceErr::shape(layer, x.shape(), "(batch, features)"))
}

/// Views `x` as a (batch, channels, height, width) tensor.
pub(crate) fn as_spatial<'a>(
    layer: &'static str,
    x: &ArrayViewD<'a, f32>,
) -> Result<ArrayView4<'a, f32>> {
    x.clone()
        .into_dimensionality::<Ix4>()
        .map_err(|_| InferenceErr::shape(layer, x.shape(), "(batch, channels, height, width)"))
}
