use ndarray::{Array4, ArrayView4, Zip};

/// Non-overlapping max pooling with square `stride` x `stride` windows.
///
/// Trailing rows and columns that don't fill a whole window are dropped, so the output is
/// (b, c, floor(h / stride), floor(w / stride)). A window holding NaN pools to NaN.
///
/// # Panics
/// If `stride` is zero.
pub fn maxpool(x: ArrayView4<f32>, stride: usize) -> Array4<f32> {
    let (b, c, h, w) = x.dim();
    let mut out = Array4::zeros((b, c, h / stride, w / stride));

    Zip::from(&mut out)
        .and(x.exact_chunks((1, 1, stride, stride)))
        .par_for_each(|o, window| {
            *o = window.fold(f32::NEG_INFINITY, |max, &v| {
                if max.is_nan() || v.is_nan() {
                    f32::NAN
                } else {
                    max.max(v)
                }
            });
        });

    out
}

/// Nearest-neighbour upsampling: every element becomes a `factor` x `factor` block.
///
/// # Panics
/// If `factor` is zero.
pub fn upsample(x: ArrayView4<f32>, factor: usize) -> Array4<f32> {
    let (b, c, h, w) = x.dim();
    let mut out = Array4::zeros((b, c, h * factor, w * factor));

    Zip::from(out.exact_chunks_mut((1, 1, factor, factor)))
        .and(&x)
        .par_for_each(|mut block, &v| block.fill(v));

    out
}

#[cfg(test)]
mod tests {
    use ndarray::{Array, Array4, array};

    use super::*;

    #[test]
    fn maxpool_takes_max_of_each_block() {
        let x = array![[1., 2., 5., 6.], [3., 4., 7., 8.], [9., 10., 13., 14.], [11., 12., 15., 16.]]
            .into_shape_with_order((1, 1, 4, 4))
            .unwrap();

        let y = maxpool(x.view(), 2);

        assert_eq!(y.dim(), (1, 1, 2, 2));
        assert_eq!(y.into_raw_vec_and_offset().0, vec![4., 8., 12., 16.]);
    }

    #[test]
    fn maxpool_handles_negative_values() {
        let x = Array4::from_elem((1, 1, 2, 2), -3.0);

        let y = maxpool(x.view(), 2);

        assert_eq!(y[[0, 0, 0, 0]], -3.0);
    }

    #[test]
    fn maxpool_propagates_nan() {
        let mut x = Array4::zeros((1, 1, 2, 4));
        x[[0, 0, 1, 0]] = f32::NAN;
        x[[0, 0, 0, 3]] = 2.0;

        let y = maxpool(x.view(), 2);

        assert!(y[[0, 0, 0, 0]].is_nan());
        assert_eq!(y[[0, 0, 0, 1]], 2.0);
    }

    #[test]
    fn maxpool_drops_incomplete_trailing_windows() {
        // 5x3 input: the last row and the last column never fill a 2x2 window.
        let x = Array::from_shape_vec((1, 1, 5, 3), (0..15).map(|v| v as f32).collect()).unwrap();

        let y = maxpool(x.view(), 2);

        assert_eq!(y.dim(), (1, 1, 2, 1));
        assert_eq!(y.into_raw_vec_and_offset().0, vec![4., 10.]);
    }

    #[test]
    fn maxpool_keeps_channels_apart() {
        let mut x = Array4::zeros((1, 2, 2, 2));
        x[[0, 0, 1, 1]] = 1.0;
        x[[0, 1, 0, 0]] = 7.0;

        let y = maxpool(x.view(), 2);

        assert_eq!(y.into_raw_vec_and_offset().0, vec![1., 7.]);
    }

    #[test]
    fn upsample_replicates_single_value() {
        let x = Array4::from_elem((1, 1, 1, 1), 3.5);

        let y = upsample(x.view(), 2);

        assert_eq!(y.dim(), (1, 1, 2, 2));
        assert!(y.iter().all(|&v| v == 3.5));
    }

    #[test]
    fn upsample_is_nearest_neighbour() {
        let x = Array::from_shape_vec((1, 1, 2, 2), vec![1., 2., 3., 4.]).unwrap();

        let y = upsample(x.view(), 2);

        assert_eq!(
            y.into_raw_vec_and_offset().0,
            vec![
                1., 1., 2., 2., //
                1., 1., 2., 2., //
                3., 3., 4., 4., //
                3., 3., 4., 4., //
            ]
        );
    }

    #[test]
    fn maxpool_undoes_upsample() {
        let x = Array::from_shape_vec((1, 3, 2, 2), (0..12).map(|v| v as f32).collect()).unwrap();

        let y = maxpool(upsample(x.view(), 3).view(), 3);

        assert_eq!(y, x);
    }
}
