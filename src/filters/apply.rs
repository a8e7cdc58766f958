//! Catalog kernels applied to matrices.
//!
//! Each function builds its kernel in the element kind of the data (int data
//! gets the int kernel, float data the float kernel) and runs the convolution
//! engine. Byte and packed-word data are rejected; convert them with
//! [`codec::channels`](crate::codec::channels) first.

use crate::convolution::convolve_any;
use crate::core::any::AnyMatrix;
use crate::core::error::{MatrixError, MatrixResult};
use crate::core::types::ElementType;
use crate::filters::kernels::{blur_kernel, gaussian_blur_kernel, KernelKind};

/// Gradient direction for the Sobel and Scharr operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Orientation picked out by a line detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
    Diagonal45,
    Diagonal135,
}

fn unsupported_kernel_target(element_type: ElementType) -> MatrixError {
    MatrixError::UnsupportedElementType {
        operation: "kernel filter",
        element_type,
    }
}

/// Build the fixed kernel `kind` for data of `element_type`.
pub fn kernel_for(kind: KernelKind, element_type: ElementType) -> MatrixResult<AnyMatrix> {
    match element_type {
        ElementType::Int32 => Ok(AnyMatrix::Int(kind.int_kernel())),
        ElementType::Float32 => Ok(AnyMatrix::Float(kind.float_kernel())),
        other => Err(unsupported_kernel_target(other)),
    }
}

/// Build a `size` x `size` box blur for data of `element_type`.
pub fn blur_kernel_for(size: usize, element_type: ElementType) -> MatrixResult<AnyMatrix> {
    let kernel = blur_kernel(size)?;
    match element_type {
        ElementType::Int32 => Ok(AnyMatrix::Int(kernel)),
        ElementType::Float32 => Ok(AnyMatrix::Float(kernel.map(|k| k as f32))),
        other => Err(unsupported_kernel_target(other)),
    }
}

/// Build a Gaussian kernel for data of `element_type`.
///
/// For int data the weights are quantized to 16.16 fixed point; the engine's
/// normalization then divides the scale back out.
pub fn gaussian_kernel_for(
    width: usize,
    sigma: Option<f32>,
    element_type: ElementType,
) -> MatrixResult<AnyMatrix> {
    let kernel = gaussian_blur_kernel(width, sigma)?;
    match element_type {
        ElementType::Float32 => Ok(AnyMatrix::Float(kernel)),
        ElementType::Int32 => Ok(AnyMatrix::Int(kernel.map(|k| (k * 65536.0).round() as i32))),
        other => Err(unsupported_kernel_target(other)),
    }
}

/// Convolve `data` with the fixed kernel `kind`.
pub fn apply_kernel(kind: KernelKind, data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    let kernel = kernel_for(kind, data.element_type())?;
    convolve_any(data, &kernel)
}

/// 3x3 box blur.
pub fn blur(data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    apply_kernel(KernelKind::Blur, data)
}

/// `size` x `size` box blur.
pub fn blur_n(data: &AnyMatrix, size: usize) -> MatrixResult<AnyMatrix> {
    let kernel = blur_kernel_for(size, data.element_type())?;
    convolve_any(data, &kernel)
}

pub fn sharpen(data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    apply_kernel(KernelKind::Sharpen, data)
}

/// 8-neighbour Laplacian edges.
pub fn laplacian(data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    apply_kernel(KernelKind::Laplacian, data)
}

/// 4-neighbour Laplacian edges.
pub fn cross_laplacian(data: &AnyMatrix) -> MatrixResult<AnyMatrix> {
    apply_kernel(KernelKind::CrossLaplacian, data)
}

pub fn sobel(data: &AnyMatrix, direction: Direction) -> MatrixResult<AnyMatrix> {
    match direction {
        Direction::Horizontal => apply_kernel(KernelKind::SobelHorizontal, data),
        Direction::Vertical => apply_kernel(KernelKind::SobelVertical, data),
    }
}

pub fn scharr(data: &AnyMatrix, direction: Direction) -> MatrixResult<AnyMatrix> {
    match direction {
        Direction::Horizontal => apply_kernel(KernelKind::ScharrHorizontal, data),
        Direction::Vertical => apply_kernel(KernelKind::ScharrVertical, data),
    }
}

pub fn line_detect(data: &AnyMatrix, orientation: LineOrientation) -> MatrixResult<AnyMatrix> {
    let kind = match orientation {
        LineOrientation::Horizontal => KernelKind::LineHorizontal,
        LineOrientation::Vertical => KernelKind::LineVertical,
        LineOrientation::Diagonal45 => KernelKind::Line45,
        LineOrientation::Diagonal135 => KernelKind::Line135,
    };
    apply_kernel(kind, data)
}

/// Gaussian blur with a `width` x `width` kernel; `sigma` defaults to
/// [`default_sigma`](crate::filters::kernels::default_sigma).
pub fn gaussian_blur(data: &AnyMatrix, width: usize, sigma: Option<f32>) -> MatrixResult<AnyMatrix> {
    let kernel = gaussian_kernel_for(width, sigma, data.element_type())?;
    convolve_any(data, &kernel)
}
