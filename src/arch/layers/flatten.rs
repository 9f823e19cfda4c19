use ndarray::{Array1, ArrayViewD, Axis};

use crate::tensor::Tensor;

/// Reshapes any input into a single (1, total_elements) row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Flatten {
    pub const NAME: &'static str = "flatten";

    pub fn new() -> Self {
        Self
    }

    pub fn forward(&self, x: ArrayViewD<f32>) -> Tensor {
        Array1::from_iter(x.iter().copied())
            .insert_axis(Axis(0))
            .into_dyn()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array, Array4};

    use super::*;

    #[test]
    fn keeps_row_major_order() {
        let x = Array::from_shape_vec((1, 2, 2, 3), (0..12).map(|v| v as f32).collect())
            .unwrap()
            .into_dyn();

        let y = Flatten.forward(x.view());

        assert_eq!(y.shape(), &[1, 12]);
        assert!(y.iter().copied().eq((0..12).map(|v| v as f32)));
    }

    #[test]
    fn follows_logical_order_of_non_contiguous_views() {
        let x = Array::from_shape_vec((2, 2), vec![1., 2., 3., 4.]).unwrap();
        let t = x.t().into_dyn();

        let y = Flatten.forward(t);

        assert_eq!(y.into_raw_vec_and_offset().0, vec![1., 3., 2., 4.]);
    }

    #[test]
    fn empty_input_gives_empty_row() {
        let x = Array4::<f32>::zeros((1, 0, 3, 3)).into_dyn();

        assert_eq!(Flatten.forward(x.view()).shape(), &[1, 0]);
    }
}
