//! Valid (unpadded) 2-D convolution.
//!
//! The result is built as a sum of shifted windows: for every non-zero kernel
//! cell `(kx, ky)` with weight `w`, the input region starting at `(kx, ky)`
//! and sized like the result is scaled by `w` and added in. Windows are views,
//! so the only allocation is the result itself plus the normalized weights.
//!
//! Int matrices are treated as 16.16 fixed point: weights become 16.16 values
//! and every product is shifted back down by 16 bits.

use crate::core::any::AnyMatrix;
use crate::core::error::{MatrixError, MatrixResult};
use crate::core::matrix::Matrix;
use crate::core::types::Element;
use log::{debug, trace};

/// Element kinds the convolution engine works on.
pub trait Convolvable: Element {
    /// A normalized kernel weight.
    type Weight: Copy + PartialEq + std::fmt::Debug;

    /// Sum of the kernel cells, accumulated in the element's own arithmetic.
    fn kernel_sum(kernel: &[Self]) -> f64;

    /// Row-major weights, divided by `sum` unless it is 0 or 1.
    fn weights(kernel: &[Self], sum: f64) -> Vec<Self::Weight>;

    fn is_zero_weight(weight: Self::Weight) -> bool;

    /// `acc += weight * value`.
    fn accumulate(acc: &mut Self, value: Self, weight: Self::Weight);

    /// Post-processing applied to the accumulated result.
    fn finish(_result: &Matrix<Self>) {}
}

fn needs_normalization(sum: f64) -> bool {
    sum != 0.0 && sum != 1.0
}

impl Convolvable for f32 {
    type Weight = f32;

    fn kernel_sum(kernel: &[f32]) -> f64 {
        kernel.iter().sum::<f32>() as f64
    }

    fn weights(kernel: &[f32], sum: f64) -> Vec<f32> {
        if needs_normalization(sum) {
            let sum = sum as f32;
            kernel.iter().map(|k| k / sum).collect()
        } else {
            kernel.to_vec()
        }
    }

    fn is_zero_weight(weight: f32) -> bool {
        weight == 0.0
    }

    fn accumulate(acc: &mut f32, value: f32, weight: f32) {
        *acc += weight * value;
    }

    /// Pixel intensities stay in `[0, 1]`.
    fn finish(result: &Matrix<f32>) {
        result.update(|v| *v = v.clamp(0.0, 1.0));
    }
}

impl Convolvable for i32 {
    /// 16.16 fixed point weight.
    type Weight = i64;

    fn kernel_sum(kernel: &[i32]) -> f64 {
        kernel.iter().map(|&k| k as i64).sum::<i64>() as f64
    }

    fn weights(kernel: &[i32], sum: f64) -> Vec<i64> {
        let divisor = if needs_normalization(sum) { sum as i64 } else { 1 };
        kernel.iter().map(|&k| ((k as i64) << 16) / divisor).collect()
    }

    fn is_zero_weight(weight: i64) -> bool {
        weight == 0
    }

    /// Unnormalized weights reach 48 bits, so the product needs 128.
    fn accumulate(acc: &mut i32, value: i32, weight: i64) {
        let product = (i128::from(weight) * i128::from(value)) >> 16;
        let sum = i128::from(*acc) + product;
        *acc = sum.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32;
    }
}

impl<T: Convolvable> Matrix<T> {
    /// Add `weight * source` to this view, cell by cell.
    ///
    /// For float matrices `weight` is a plain factor; for int matrices it is a
    /// 16.16 fixed point factor (`1 << 16` adds `source` unchanged).
    pub fn add_weighted(&self, source: &Matrix<T>, weight: T::Weight) -> MatrixResult<()> {
        self.zip_update(source, |acc, value| T::accumulate(acc, value, weight))
    }
}

/// Sum of all kernel cells.
pub fn kernel_sum<T: Convolvable>(kernel: &Matrix<T>) -> f64 {
    T::kernel_sum(&kernel.to_vec())
}

/// Normalized copy of `kernel`'s weights, row-major. The kernel itself is
/// left untouched.
pub fn normalized_weights<T: Convolvable>(kernel: &Matrix<T>) -> Vec<T::Weight> {
    let cells = kernel.to_vec();
    let sum = T::kernel_sum(&cells);
    if needs_normalization(sum) {
        trace!("Normalizing {}x{} kernel by {}", kernel.width(), kernel.height(), sum);
    }
    T::weights(&cells, sum)
}

/// Convolve `data` with `kernel`, returning a new
/// `(W - Kw + 1) x (H - Kh + 1)` matrix.
///
/// The kernel is normalized by its sum unless that sum is 0 or 1. Float
/// results are clamped to `[0, 1]`.
pub fn convolve<T: Convolvable>(data: &Matrix<T>, kernel: &Matrix<T>) -> MatrixResult<Matrix<T>> {
    let (width, height) = data.shape();
    let (kernel_width, kernel_height) = kernel.shape();
    if kernel_width > width || kernel_height > height {
        return Err(MatrixError::KernelTooLarge {
            kernel: kernel.shape(),
            data: data.shape(),
        });
    }

    let result_width = width - kernel_width + 1;
    let result_height = height - kernel_height + 1;
    debug!(
        "Convolving {} {}x{} with {}x{} kernel into {}x{}",
        T::ELEMENT_TYPE,
        width,
        height,
        kernel_width,
        kernel_height,
        result_width,
        result_height
    );

    let weights = normalized_weights(kernel);
    let result = Matrix::<T>::new(result_width, result_height)?;

    for ky in 0..kernel_height {
        for kx in 0..kernel_width {
            let weight = weights[kx + ky * kernel_width];
            if T::is_zero_weight(weight) {
                continue;
            }
            let window = data.region(kx, ky, result_width, result_height)?;
            result.add_weighted(&window, weight)?;
        }
    }

    T::finish(&result);
    Ok(result)
}

/// Convolve matrices of matching float or int element kind.
pub fn convolve_any(data: &AnyMatrix, kernel: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    match (data, kernel) {
        (AnyMatrix::Float(m), AnyMatrix::Float(k)) => convolve(m, k).map(AnyMatrix::Float),
        (AnyMatrix::Int(m), AnyMatrix::Int(k)) => convolve(m, k).map(AnyMatrix::Int),
        (AnyMatrix::Float(_), other) => Err(other.unsupported("float convolution")),
        (AnyMatrix::Int(_), other) => Err(other.unsupported("int convolution")),
        (other, _) => Err(other.unsupported("convolve")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ElementType;

    fn ramp(width: usize, height: usize) -> Matrix<f32> {
        Matrix::from_fn(width, height, |x, y| (x + y * width) as f32 / (width * height) as f32)
            .unwrap()
    }

    #[test]
    fn test_uniform_blur_on_ones() {
        let data = Matrix::from_vec(3, 3, vec![1.0f32; 9]).unwrap();
        let kernel = Matrix::from_vec(3, 3, vec![1.0f32; 9]).unwrap();
        let result = convolve(&data, &kernel).unwrap();
        assert_eq!(result.shape(), (1, 1));
        assert!((result.get(0, 0).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_output_shape() {
        let data = ramp(7, 5);
        let kernel = Matrix::from_vec(3, 2, vec![1.0f32; 6]).unwrap();
        let result = convolve(&data, &kernel).unwrap();
        assert_eq!(result.shape(), (5, 4));
    }

    #[test]
    fn test_kernel_not_mutated() {
        let kernel = Matrix::from_vec(2, 1, vec![2.0f32, 2.0]).unwrap();
        let before = kernel.to_vec();
        convolve(&ramp(4, 4), &kernel).unwrap();
        assert_eq!(kernel.to_vec(), before);
    }

    #[test]
    fn test_identity_kernel() {
        let data = ramp(4, 4);
        let kernel = Matrix::from_vec(3, 3, vec![0.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        let result = convolve(&data, &kernel).unwrap();
        assert_eq!(result, data.region(1, 1, 2, 2).unwrap());
    }

    #[test]
    fn test_sum_zero_kernel_not_normalized() {
        let kernel = Matrix::from_vec(2, 1, vec![-1.0f32, 1.0]).unwrap();
        assert_eq!(kernel_sum(&kernel), 0.0);
        assert_eq!(normalized_weights(&kernel), vec![-1.0, 1.0]);

        let data = Matrix::from_vec(3, 1, vec![0.1f32, 0.6, 0.2]).unwrap();
        let result = convolve(&data, &kernel).unwrap();
        assert!((result.get(0, 0).unwrap() - 0.5).abs() < 1e-6);
        // 0.2 - 0.6 clamps to zero
        assert_eq!(result.get(1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_float_result_clamped() {
        let data = Matrix::from_vec(2, 1, vec![1.0f32, 1.0]).unwrap();
        let kernel = Matrix::from_vec(2, 1, vec![2.0f32, -0.5]).unwrap();
        // sum 1.5: weights 4/3 and -1/3, raw result 1.0
        let result = convolve(&data, &kernel).unwrap();
        assert!((result.get(0, 0).unwrap() - 1.0).abs() < 1e-6);

        let spike = Matrix::from_vec(2, 1, vec![3.0f32, 0.0]).unwrap();
        let kernel = Matrix::from_vec(2, 1, vec![1.0f32, 0.0]).unwrap();
        assert_eq!(convolve(&spike, &kernel).unwrap().get(0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_int_fixed_point_blur() {
        let data = Matrix::from_vec(3, 3, vec![9i32 << 16; 9]).unwrap();
        let kernel = Matrix::from_vec(3, 3, vec![1i32; 9]).unwrap();
        let result = convolve(&data, &kernel).unwrap();
        // weight (1 << 16) / 9 truncates to 7281, so the sum lands just under 9.0
        assert_eq!(result.get(0, 0).unwrap(), 7281 * 9 * 9);
    }

    #[test]
    fn test_int_sum_one_kernel_exact() {
        let data = Matrix::from_vec(3, 1, vec![1i32 << 16, 2 << 16, 5 << 16]).unwrap();
        let kernel = Matrix::from_vec(3, 1, vec![-1i32, 1, 1]).unwrap();
        let result = convolve(&data, &kernel).unwrap();
        assert_eq!(result.get(0, 0).unwrap(), 6 << 16);
    }

    #[test]
    fn test_int_not_clamped_to_unit_range() {
        let data = Matrix::from_vec(2, 1, vec![0i32, 4 << 16]).unwrap();
        let kernel = Matrix::from_vec(2, 1, vec![-1i32, 1]).unwrap();
        assert_eq!(convolve(&data, &kernel).unwrap().get(0, 0).unwrap(), 4 << 16);

        let kernel = Matrix::from_vec(2, 1, vec![1i32, -1]).unwrap();
        assert_eq!(convolve(&data, &kernel).unwrap().get(0, 0).unwrap(), -4 << 16);
    }

    #[test]
    fn test_int_large_unnormalized_weights_saturate() {
        let data = Matrix::from_vec(2, 1, vec![i32::MAX, i32::MAX]).unwrap();
        let kernel = Matrix::from_vec(2, 1, vec![-70000i32, 70000]).unwrap();
        assert_eq!(convolve(&data, &kernel).unwrap().get(0, 0).unwrap(), i32::MAX);

        let kernel = Matrix::from_vec(2, 1, vec![70000i32, -70000]).unwrap();
        assert_eq!(convolve(&data, &kernel).unwrap().get(0, 0).unwrap(), i32::MIN);
    }

    #[test]
    fn test_kernel_too_large() {
        let data = Matrix::<f32>::new(2, 4).unwrap();
        let kernel = Matrix::<f32>::new(3, 3).unwrap();
        assert_eq!(
            convolve(&data, &kernel).unwrap_err(),
            MatrixError::KernelTooLarge { kernel: (3, 3), data: (2, 4) }
        );
    }

    #[test]
    fn test_convolve_on_view() {
        let data = ramp(6, 6);
        let view = data.region(1, 1, 4, 4).unwrap();
        let kernel = Matrix::from_vec(2, 2, vec![1.0f32; 4]).unwrap();
        let from_view = convolve(&view, &kernel).unwrap();
        let from_copy = convolve(&view.deep_clone(), &kernel).unwrap();
        assert_eq!(from_view, from_copy);
    }

    #[test]
    fn test_add_weighted() {
        let acc = Matrix::from_vec(2, 1, vec![1.0f32, 1.0]).unwrap();
        let src = Matrix::from_vec(2, 1, vec![2.0f32, 4.0]).unwrap();
        acc.add_weighted(&src, 0.5).unwrap();
        assert_eq!(acc.to_vec(), vec![2.0, 3.0]);

        let acc = Matrix::from_vec(1, 1, vec![0i32]).unwrap();
        let src = Matrix::from_vec(1, 1, vec![3i32 << 16]).unwrap();
        acc.add_weighted(&src, 1 << 15).unwrap();
        assert_eq!(acc.get(0, 0).unwrap(), 3 << 15);
    }

    #[test]
    fn test_convolve_any_type_mismatch() {
        let data: AnyMatrix = Matrix::<f32>::new(3, 3).unwrap().into();
        let kernel: AnyMatrix = Matrix::<i32>::new(3, 3).unwrap().into();
        assert_eq!(
            convolve_any(&data, &kernel).unwrap_err(),
            MatrixError::UnsupportedElementType {
                operation: "float convolution",
                element_type: ElementType::Int32,
            }
        );

        let packed: AnyMatrix = Matrix::<u32>::new(3, 3).unwrap().into();
        assert_eq!(
            convolve_any(&packed, &kernel).unwrap_err(),
            MatrixError::UnsupportedElementType {
                operation: "convolve",
                element_type: ElementType::PackedWord,
            }
        );
    }
}
