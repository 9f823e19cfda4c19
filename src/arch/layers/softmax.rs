use ndarray::{ArrayViewD, Axis};

use crate::{InferenceErr, Result, tensor::Tensor};

/// Normalizes along one axis with `exp(x_i - max) / Σ exp(x_j - max)`.
#[derive(Debug, Clone, Copy)]
pub struct Softmax {
    axis: isize,
}

impl Default for Softmax {
    fn default() -> Self {
        Self { axis: -1 }
    }
}

impl Softmax {
    pub const NAME: &'static str = "softmax";

    /// Creates a new `Softmax`.
    ///
    /// # Arguments
    /// * `axis` - The axis to normalize, negative values count from the last axis.
    ///
    /// # Returns
    /// A new `Softmax` instance.
    pub fn new(axis: isize) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> isize {
        self.axis
    }

    fn resolve_axis(&self, ndim: usize) -> Option<Axis> {
        let axis = if self.axis < 0 {
            ndim.checked_sub(self.axis.unsigned_abs())?
        } else {
            self.axis as usize
        };

        (axis < ndim).then_some(Axis(axis))
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        let axis = self.resolve_axis(x.ndim()).ok_or_else(|| {
            InferenceErr::shape(
                Self::NAME,
                x.shape(),
                format!("a tensor with axis {}", self.axis),
            )
        })?;

        let mut y = x.to_owned();
        for mut lane in y.lanes_mut(axis) {
            let max = lane.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            lane.mapv_inplace(|v| (v - max).exp());
            let sum = lane.sum();
            lane /= sum;
        }

        Ok(y)
    }
}
