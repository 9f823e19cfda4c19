use ndarray::{Array4, ArrayView4, Zip, s};

/// Returns the length of a valid cross-correlation output along one axis.
///
/// # Arguments
/// * `input` - The input length.
/// * `kernel` - The kernel length.
/// * `stride` - The step between two consecutive windows.
///
/// # Returns
/// `floor((input - kernel) / stride) + 1`, or `None` if the kernel doesn't fit in the input.
pub fn conv_output_size(input: usize, kernel: usize, stride: usize) -> Option<usize> {
    input.checked_sub(kernel).map(|rest| rest / stride + 1)
}

/// Unpadded 2D cross-correlation.
///
/// # Arguments
/// * `x` - The input, shaped (b, c, h, w).
/// * `kernel` - The kernel, shaped (n, c, k_h, k_w).
/// * `stride` - The stride, shared by both spatial axes.
///
/// # Returns
/// The (b, n, h', w') output, or `None` if the kernel doesn't fit in the input.
pub fn conv2d(x: ArrayView4<f32>, kernel: ArrayView4<f32>, stride: usize) -> Option<Array4<f32>> {
    let (b, c, h, w) = x.dim();
    let (n, kc, kh, kw) = kernel.dim();
    debug_assert_eq!(c, kc, "input and kernel channels must agree");

    let oh = conv_output_size(h, kh, stride)?;
    let ow = conv_output_size(w, kw, stride)?;
    let mut out = Array4::zeros((b, n, oh, ow));

    for (xb, mut ob) in x.outer_iter().zip(out.outer_iter_mut()) {
        Zip::from(ob.outer_iter_mut())
            .and(kernel.outer_iter())
            .par_for_each(|mut plane, k| {
                for ((i, j), o) in plane.indexed_iter_mut() {
                    let (r, q) = (i * stride, j * stride);
                    let window = xb.slice(s![.., r..r + kh, q..q + kw]);
                    *o = Zip::from(&window)
                        .and(&k)
                        .fold(0.0, |acc, &a, &b| acc + a * b);
                }
            });
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array, Array4};

    use super::*;

    #[test]
    fn output_size_follows_floor_rule() {
        assert_eq!(conv_output_size(5, 3, 1), Some(3));
        assert_eq!(conv_output_size(5, 3, 2), Some(2));
        assert_eq!(conv_output_size(6, 3, 2), Some(2));
        assert_eq!(conv_output_size(3, 3, 4), Some(1));
        assert_eq!(conv_output_size(2, 3, 1), None);
    }

    #[test]
    fn one_by_one_kernel_scales_input() {
        let x = Array::from_shape_vec((1, 1, 2, 2), vec![1., 2., 3., 4.]).unwrap();
        let k = Array4::from_elem((1, 1, 1, 1), 2.0);

        let y = conv2d(x.view(), k.view(), 1).unwrap();

        assert_eq!(y.into_raw_vec_and_offset().0, vec![2., 4., 6., 8.]);
    }

    #[test]
    fn windows_are_cross_correlated_not_flipped() {
        // 3x3 input, 2x2 kernel picking the top-left and bottom-right corners.
        let x = Array::from_shape_vec((1, 1, 3, 3), (1..=9).map(|v| v as f32).collect()).unwrap();
        let k = Array::from_shape_vec((1, 1, 2, 2), vec![1., 0., 0., 10.]).unwrap();

        let y = conv2d(x.view(), k.view(), 1).unwrap();

        assert_eq!(y.dim(), (1, 1, 2, 2));
        assert_eq!(y.into_raw_vec_and_offset().0, vec![51., 62., 84., 95.]);
    }

    #[test]
    fn channels_are_summed_and_outputs_are_kept_apart() {
        let x = Array::from_shape_vec((1, 2, 2, 2), vec![1., 1., 1., 1., 2., 2., 2., 2.]).unwrap();
        let mut k = Array4::zeros((2, 2, 2, 2));
        k.slice_mut(s![0, .., .., ..]).fill(1.0);
        k.slice_mut(s![1, 1, .., ..]).fill(-1.0);

        let y = conv2d(x.view(), k.view(), 1).unwrap();

        assert_eq!(y.dim(), (1, 2, 1, 1));
        assert_eq!(y[[0, 0, 0, 0]], 12.0);
        assert_eq!(y[[0, 1, 0, 0]], -8.0);
    }

    #[test]
    fn stride_skips_windows() {
        let x = Array::from_shape_vec((1, 1, 4, 4), (0..16).map(|v| v as f32).collect()).unwrap();
        let k = Array4::from_elem((1, 1, 1, 1), 1.0);

        let y = conv2d(x.view(), k.view(), 2).unwrap();

        assert_eq!(y.into_raw_vec_and_offset().0, vec![0., 2., 8., 10.]);
    }

    #[test]
    fn kernel_larger_than_input_is_rejected() {
        let x = Array4::<f32>::zeros((1, 1, 2, 2));
        let k = Array4::<f32>::zeros((1, 1, 3, 3));

        assert!(conv2d(x.view(), k.view(), 1).is_none());
    }
}
