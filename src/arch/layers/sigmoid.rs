use ndarray::ArrayViewD;

use crate::tensor::Tensor;

/// Elementwise logistic function `1 / (1 + e^-x)`.
///
/// There is no guard against `e^-x` overflowing for large negative inputs; in `f32` it saturates
/// to infinity and the output to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub const NAME: &'static str = "sigmoid";

    pub fn new() -> Self {
        Self
    }

    fn sigmoid(z: f32) -> f32 {
        1. / (1. + (-z).exp())
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Tensor {
        x.mapv(Self::sigmoid)
    }
}
