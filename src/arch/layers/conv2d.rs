use std::num::NonZeroUsize;

use ndarray::{Array1, Array4, ArrayViewD, Axis};

use crate::{
    InferenceErr, Result, ops,
    params::load_into,
    tensor::{Tensor, as_spatial},
};

/// An unpadded 2D cross-correlation with a square kernel and per-channel bias.
#[derive(Debug, Clone)]
pub struct Conv2d {
    k: Array4<f32>,
    bias: Array1<f32>,
    stride: NonZeroUsize,
}

impl Conv2d {
    pub const NAME: &'static str = "conv";

    /// Creates a new zero-initialized `Conv2d`.
    ///
    /// # Arguments
    /// * `in_channels` - The amount of channels of the input.
    /// * `out_channels` - The amount of channels of the output.
    /// * `kernel_size` - The side of the square kernel.
    /// * `stride` - The step between two consecutive windows.
    ///
    /// # Returns
    /// A new `Conv2d` instance.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: NonZeroUsize,
        stride: NonZeroUsize,
    ) -> Self {
        let k = kernel_size.get();

        Self {
            k: Array4::zeros((out_channels, in_channels, k, k)),
            bias: Array1::zeros(out_channels),
            stride,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.k.dim().1
    }

    pub fn out_channels(&self) -> usize {
        self.k.dim().0
    }

    pub fn kernel_size(&self) -> usize {
        self.k.dim().2
    }

    pub fn stride(&self) -> usize {
        self.stride.get()
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.k.len() + self.bias.len()
    }

    pub fn kernel(&self) -> &Array4<f32> {
        &self.k
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Copies the kernel (output channel, input channel, kernel row, kernel column) and then
    /// the bias out of `buf`.
    pub fn load(&mut self, buf: &[f32], offset: usize) -> Result<usize> {
        load_into(
            buf,
            offset,
            &mut [self.k.view_mut().into_dyn(), self.bias.view_mut().into_dyn()],
        )
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Result<Tensor> {
        let x4 = as_spatial(Self::NAME, &x)?;
        let (c, k) = (self.in_channels(), self.kernel_size());

        if x4.dim().1 != c {
            return Err(InferenceErr::shape(
                Self::NAME,
                x.shape(),
                format!("(batch, {c}, height, width)"),
            ));
        }

        let mut y = ops::conv2d(x4, self.k.view(), self.stride()).ok_or_else(|| {
            InferenceErr::shape(
                Self::NAME,
                x.shape(),
                format!("spatial dims of at least {k}x{k}"),
            )
        })?;

        for (mut plane, &b) in y.axis_iter_mut(Axis(1)).zip(&self.bias) {
            plane += b;
        }

        Ok(y.into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array, Array4};

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn new_is_zeroed() {
        let conv = Conv2d::new(3, 8, nz(3), nz(1));

        assert_eq!(conv.kernel().dim(), (8, 3, 3, 3));
        assert_eq!(conv.bias().len(), 8);
        assert_eq!(conv.size(), 8 * 3 * 9 + 8);
        assert!(conv.kernel().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn load_order_is_out_in_row_col_then_bias() {
        let mut conv = Conv2d::new(2, 2, nz(2), nz(1));
        let buf: Vec<f32> = (0..18).map(|v| v as f32).collect();

        assert_eq!(conv.load(&buf, 0).unwrap(), 18);

        assert_eq!(conv.kernel()[[0, 0, 0, 0]], 0.0);
        assert_eq!(conv.kernel()[[0, 0, 1, 0]], 2.0);
        assert_eq!(conv.kernel()[[0, 1, 0, 1]], 5.0);
        assert_eq!(conv.kernel()[[1, 0, 0, 0]], 8.0);
        assert_eq!(conv.kernel()[[1, 1, 1, 1]], 15.0);
        assert_eq!(conv.bias().to_vec(), vec![16.0, 17.0]);
    }

    #[test]
    fn forward_adds_bias_per_output_channel() {
        let mut conv = Conv2d::new(1, 2, nz(1), nz(1));
        conv.load(&[1., -1., 10., 20.], 0).unwrap();
        let x = Array::from_shape_vec((1, 1, 1, 2), vec![1., 2.]).unwrap().into_dyn();

        let y = conv.forward(x.view()).unwrap();

        assert_eq!(y.shape(), &[1, 2, 1, 2]);
        assert_eq!(y.into_raw_vec_and_offset().0, vec![11., 12., 19., 18.]);
    }

    #[test]
    fn forward_output_shape_follows_stride() {
        let conv = Conv2d::new(3, 4, nz(3), nz(2));
        let x = Array4::<f32>::zeros((1, 3, 9, 8)).into_dyn();

        let y = conv.forward(x.view()).unwrap();

        assert_eq!(y.shape(), &[1, 4, 4, 3]);
    }

    #[test]
    fn forward_rejects_channel_mismatch() {
        let conv = Conv2d::new(3, 4, nz(3), nz(1));
        let x = Array4::<f32>::zeros((1, 2, 5, 5)).into_dyn();

        let err = conv.forward(x.view()).unwrap_err();

        assert!(matches!(err, InferenceErr::ShapeMismatch { layer: "conv", .. }));
    }

    #[test]
    fn forward_rejects_input_smaller_than_kernel() {
        let conv = Conv2d::new(1, 1, nz(3), nz(1));
        let x = Array4::<f32>::zeros((1, 1, 2, 5)).into_dyn();

        assert!(matches!(
            conv.forward(x.view()),
            Err(InferenceErr::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn forward_rejects_flat_input() {
        let conv = Conv2d::new(1, 1, nz(1), nz(1));
        let x = ndarray::Array2::<f32>::zeros((1, 4)).into_dyn();

        assert!(conv.forward(x.view()).is_err());
    }
}
