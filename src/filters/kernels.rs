//! Kernel catalog: fixed 3x3 operators and generated blur kernels.
//!
//! Fixed kernels are integer-valued and available as int or float matrices.
//! None of them is pre-normalized; the convolution engine divides by the sum
//! when it is neither 0 nor 1 (so blur is averaged while the edge and line
//! detectors, which sum to 0, keep their raw coefficients).

use crate::core::error::{MatrixError, MatrixResult};
use crate::core::matrix::Matrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every fixed kernel in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Uniform 3x3 average
    Blur,
    /// Center 5, orthogonal neighbours -1
    Sharpen,
    /// 8-neighbour Laplacian, center 8
    Laplacian,
    /// 4-neighbour Laplacian, center -4
    CrossLaplacian,
    SobelHorizontal,
    SobelVertical,
    ScharrHorizontal,
    ScharrVertical,
    LineHorizontal,
    LineVertical,
    /// Line running bottom-left to top-right
    Line45,
    /// Line running top-left to bottom-right
    Line135,
}

/// Broad grouping of kernels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum KernelCategory {
    Blur,
    Sharpen,
    Edge,
    Line,
}

impl KernelKind {
    /// All fixed kernels, in catalog order.
    pub const ALL: [KernelKind; 12] = [
        KernelKind::Blur,
        KernelKind::Sharpen,
        KernelKind::Laplacian,
        KernelKind::CrossLaplacian,
        KernelKind::SobelHorizontal,
        KernelKind::SobelVertical,
        KernelKind::ScharrHorizontal,
        KernelKind::ScharrVertical,
        KernelKind::LineHorizontal,
        KernelKind::LineVertical,
        KernelKind::Line45,
        KernelKind::Line135,
    ];

    /// Registry name, e.g. `"sobel_horizontal"`.
    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::Blur => "blur",
            KernelKind::Sharpen => "sharpen",
            KernelKind::Laplacian => "laplacian",
            KernelKind::CrossLaplacian => "cross_laplacian",
            KernelKind::SobelHorizontal => "sobel_horizontal",
            KernelKind::SobelVertical => "sobel_vertical",
            KernelKind::ScharrHorizontal => "scharr_horizontal",
            KernelKind::ScharrVertical => "scharr_vertical",
            KernelKind::LineHorizontal => "line_horizontal",
            KernelKind::LineVertical => "line_vertical",
            KernelKind::Line45 => "line_45",
            KernelKind::Line135 => "line_135",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            KernelKind::Blur => "Average each pixel with its 8 neighbours",
            KernelKind::Sharpen => "Boost the center against its orthogonal neighbours",
            KernelKind::Laplacian => "Second derivative over all 8 neighbours",
            KernelKind::CrossLaplacian => "Second derivative over the 4 orthogonal neighbours",
            KernelKind::SobelHorizontal => "Sobel gradient along x",
            KernelKind::SobelVertical => "Sobel gradient along y",
            KernelKind::ScharrHorizontal => "Scharr gradient along x",
            KernelKind::ScharrVertical => "Scharr gradient along y",
            KernelKind::LineHorizontal => "Respond to horizontal lines",
            KernelKind::LineVertical => "Respond to vertical lines",
            KernelKind::Line45 => "Respond to 45 degree lines",
            KernelKind::Line135 => "Respond to 135 degree lines",
        }
    }

    pub fn category(&self) -> KernelCategory {
        match self {
            KernelKind::Blur => KernelCategory::Blur,
            KernelKind::Sharpen => KernelCategory::Sharpen,
            KernelKind::Laplacian
            | KernelKind::CrossLaplacian
            | KernelKind::SobelHorizontal
            | KernelKind::SobelVertical
            | KernelKind::ScharrHorizontal
            | KernelKind::ScharrVertical => KernelCategory::Edge,
            KernelKind::LineHorizontal
            | KernelKind::LineVertical
            | KernelKind::Line45
            | KernelKind::Line135 => KernelCategory::Line,
        }
    }

    /// Integer coefficients, row-major.
    pub fn coefficients(&self) -> [[i32; 3]; 3] {
        match self {
            KernelKind::Blur => [[1, 1, 1], [1, 1, 1], [1, 1, 1]],
            KernelKind::Sharpen => [[0, -1, 0], [-1, 5, -1], [0, -1, 0]],
            KernelKind::Laplacian => [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]],
            KernelKind::CrossLaplacian => [[0, 1, 0], [1, -4, 1], [0, 1, 0]],
            KernelKind::SobelHorizontal => [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]],
            KernelKind::SobelVertical => [[-1, -2, -1], [0, 0, 0], [1, 2, 1]],
            KernelKind::ScharrHorizontal => [[-3, 0, 3], [-10, 0, 10], [-3, 0, 3]],
            KernelKind::ScharrVertical => [[-3, -10, -3], [0, 0, 0], [3, 10, 3]],
            KernelKind::LineHorizontal => [[-1, -1, -1], [2, 2, 2], [-1, -1, -1]],
            KernelKind::LineVertical => [[-1, 2, -1], [-1, 2, -1], [-1, 2, -1]],
            KernelKind::Line45 => [[-1, -1, 2], [-1, 2, -1], [2, -1, -1]],
            KernelKind::Line135 => [[2, -1, -1], [-1, 2, -1], [-1, -1, 2]],
        }
    }

    /// The kernel as an int matrix.
    pub fn int_kernel(&self) -> Matrix<i32> {
        Matrix::from_rows(self.coefficients())
    }

    /// The same coefficients as a float matrix.
    pub fn float_kernel(&self) -> Matrix<f32> {
        Matrix::from_rows(self.coefficients().map(|row| row.map(|k| k as f32)))
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KernelKind {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| MatrixError::UnknownKernel(s.to_string()))
    }
}

/// `size` x `size` box blur of ones.
pub fn blur_kernel(size: usize) -> MatrixResult<Matrix<i32>> {
    Matrix::from_vec(size, size, vec![1; size * size])
}

/// Sigma used by [`gaussian_blur_kernel`] when none is given:
/// `0.3 * ((width - 1) * 0.5 - 1) + 0.8`.
pub fn default_sigma(width: usize) -> f32 {
    0.3 * ((width as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// `width` x `width` Gaussian, cell `(i, j)` = `exp(-((i+d)^2 + (j+d)^2) / (2 sigma^2))`
/// with `d = -(width - 1) / 2`.
///
/// The peak cell is 1.0; the kernel is left unnormalized.
pub fn gaussian_blur_kernel(width: usize, sigma: Option<f32>) -> MatrixResult<Matrix<f32>> {
    let sigma = sigma.unwrap_or_else(|| default_sigma(width));
    let d = -(width as f32 - 1.0) / 2.0;
    let denominator = 2.0 * sigma * sigma;
    Matrix::from_fn(width, width, |i, j| {
        let x = i as f32 + d;
        let y = j as f32 + d;
        (-(x * x + y * y) / denominator).exp()
    })
}
