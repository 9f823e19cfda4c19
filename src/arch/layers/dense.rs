use ndarray::{Array1, Array2, ArrayViewD};

use crate::{
    InferenceErr, Result,
    params::load_into,
    tensor::{Tensor, as_matrix},
};

/// A fully connected layer computing `y = x · Kᵗ + bias`.
#[derive(Debug, Clone)]
pub struct Dense {
    k: Array2<f32>,
    bias: Array1<f32>,
}

impl Dense {
    pub const NAME: &'static str = "dense";

    /// Creates a new zero-initialized `Dense`.
    ///
    /// # Arguments
    /// * `in_features` - The size of each input row.
    /// * `out_features` - The size of each output row.
    ///
    /// # Returns
    /// A new `Dense` instance.
    pub fn new(in_features: usize, out_features: usize) -> Self {
        Self {
            k: Array2::zeros((out_features, in_features)),
            bias: Array1::zeros(out_features),
        }
    }

    /// Returns the kernel's shape as (out_features, in_features).
    pub fn dim(&self) -> (usize, usize) {
        self.k.dim()
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.k.len() + self.bias.len()
    }

    pub fn kernel(&self) -> &Array2<f32> {
        &self.k
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Copies the kernel (output-feature major) and then the bias out of `buf`.
    ///
    /// # Arguments
    /// * `buf` - The model's parameter buffer.
    /// * `offset` - Where this layer's parameters start.
    ///
    /// # Returns
    /// The amount of values consumed.
    pub fn load(&mut self, buf: &[f32], offset: usize) -> Result<usize> {
        load_into(
            buf,
            offset,
            &mut [self.k.view_mut().into_dyn(), self.bias.view_mut().into_dyn()],
        )
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        let x2 = as_matrix(Self::NAME, &x)?;
        let (n, c) = self.dim();

        if x2.ncols() != c {
            return Err(InferenceErr::shape(
                Self::NAME,
                x.shape(),
                format!("(batch, {c})"),
            ));
        }

        let mut y = x2.dot(&self.k.t());
        y += &self.bias;
        debug_assert_eq!(y.ncols(), n);

        Ok(y.into_dyn())
    }
}
