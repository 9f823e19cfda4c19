use std::num::NonZeroUsize;

use ndarray::ArrayViewD;

use crate::{
    Result, ops,
    tensor::{Tensor, as_spatial},
};

/// Non-overlapping max pooling over square windows.
///
/// Rows and columns that don't fill a whole window are dropped.
#[derive(Debug, Clone, Copy)]
pub struct Maxpool {
    stride: NonZeroUsize,
}

impl Maxpool {
    pub const NAME: &'static str = "maxpool";

    pub fn new(stride: NonZeroUsize) -> Self {
        Self { stride }
    }

    pub fn stride(&self) -> usize {
        self.stride.get()
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        let x4 = as_spatial(Self::NAME, &x)?;
        Ok(ops::maxpool(x4, self.stride()).into_dyn())
    }
}

/// Nearest-neighbour upsampling by an integer factor.
#[derive(Debug, Clone, Copy)]
pub struct UpSample {
    factor: NonZeroUsize,
}

impl UpSample {
    pub const NAME: &'static str = "upsample";

    pub fn new(factor: NonZeroUsize) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> usize {
        self.factor.get()
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        let x4 = as_spatial(Self::NAME, &x)?;
        Ok(ops::upsample(x4, self.factor()).into_dyn())
    }
}
