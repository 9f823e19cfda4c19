use ndarray::{ArrayViewD, Axis};

use crate::{InferenceErr, Result, tensor::Tensor};

/// Joins several inputs along the channel axis (axis 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct Concatenate;

impl Concatenate {
    pub const NAME: &'static str = "concat";

    pub fn new() -> Self {
        Self
    }

    pub fn forward(&self, xs: &[ArrayViewD<f32>]) -> Result<Tensor> {
        let Some(first) = xs.first() else {
            return Err(InferenceErr::shape(Self::NAME, &[], "at least one input"));
        };

        if let Some(x) = xs.iter().find(|x| x.ndim() < 2) {
            return Err(InferenceErr::shape(
                Self::NAME,
                x.shape(),
                "inputs with a channel axis",
            ));
        }

        ndarray::concatenate(Axis(1), xs).map_err(|_| {
            let culprit = xs
                .iter()
                .find(|x| !agrees_outside_channels(x.shape(), first.shape()))
                .unwrap_or(first);

            InferenceErr::shape(
                Self::NAME,
                culprit.shape(),
                format!("{:?} on every axis but 1", first.shape()),
            )
        })
    }
}

fn agrees_outside_channels(a: &[usize], b: &[usize]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .enumerate()
            .all(|(axis, (x, y))| axis == 1 || x == y)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array4, s};

    use super::*;

    #[test]
    fn channel_counts_add_up() {
        let a = Array4::from_elem((1, 2, 3, 3), 1.0_f32).into_dyn();
        let b = Array4::from_elem((1, 5, 3, 3), 2.0_f32).into_dyn();

        let y = Concatenate.forward(&[a.view(), b.view()]).unwrap();

        assert_eq!(y.shape(), &[1, 7, 3, 3]);
        assert!(y.slice(s![.., ..2, .., ..]).iter().all(|&v| v == 1.0));
        assert!(y.slice(s![.., 2.., .., ..]).iter().all(|&v| v == 2.0));
    }

    #[test]
    fn flat_inputs_join_features() {
        let a = Array2::from_elem((1, 2), 1.0_f32).into_dyn();
        let b = Array2::from_elem((1, 3), 0.0_f32).into_dyn();

        let y = Concatenate.forward(&[a.view(), b.view()]).unwrap();

        assert_eq!(y.shape(), &[1, 5]);
    }

    #[test]
    fn mismatched_spatial_dims_are_rejected() {
        let a = Array4::<f32>::zeros((1, 2, 3, 3)).into_dyn();
        let b = Array4::<f32>::zeros((1, 2, 4, 3)).into_dyn();

        let err = Concatenate.forward(&[a.view(), b.view()]).unwrap_err();

        match err {
            InferenceErr::ShapeMismatch { layer, got, .. } => {
                assert_eq!(layer, "concat");
                assert_eq!(got, vec![1, 2, 4, 3]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn mismatched_ranks_are_rejected() {
        let a = Array4::<f32>::zeros((1, 2, 3, 3)).into_dyn();
        let b = Array2::<f32>::zeros((1, 2)).into_dyn();

        assert!(Concatenate.forward(&[a.view(), b.view()]).is_err());
    }

    #[test]
    fn no_inputs_is_rejected() {
        assert!(Concatenate.forward(&[]).is_err());
    }
}
