use ndarray::ArrayViewD;

use crate::tensor::Tensor;

/// Elementwise `max(x, 0)`. NaN stays NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReLU;

impl ReLU {
    pub const NAME: &'static str = "relu";

    pub fn new() -> Self {
        Self
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Tensor {
        x.mapv(|v| if v > 0.0 || v.is_nan() { v } else { 0.0 })
    }
}
