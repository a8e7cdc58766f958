//! Error types for pixelmatrix.
//!
//! Uses thiserror for structured errors with context. Every error is a
//! precondition failure raised before any element is written, and each one
//! carries the offending value so the caller can report it as-is.

use crate::core::types::ElementType;
use thiserror::Error;

/// Errors raised by matrix, codec, convolution and catalog operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Backing store has {actual} elements, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("{what} {value} is out of range {range}")]
    OutOfRange {
        what: &'static str,
        value: usize,
        range: Bounds,
    },

    #[error("Matrix dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Expected a {}x{} matrix, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{operation} does not support {element_type} matrices")]
    UnsupportedElementType {
        operation: &'static str,
        element_type: ElementType,
    },

    #[error("Unsupported channel layout: {0}")]
    UnsupportedChannelLayout(String),

    #[error("Kernel {}x{} is larger than data {}x{}", kernel.0, kernel.1, data.0, data.1)]
    KernelTooLarge {
        kernel: (usize, usize),
        data: (usize, usize),
    },

    #[error("Unknown kernel '{0}'")]
    UnknownKernel(String),

    #[error("Resampling failed: {0}")]
    Resize(String),
}

/// Half-open range `[start, end)` reported by [`MatrixError::OutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: usize,
    pub end: usize,
}

impl Bounds {
    /// Range `[0, end)`.
    pub fn upto(end: usize) -> Self {
        Self { start: 0, end }
    }

    pub fn contains(&self, value: usize) -> bool {
        value >= self.start && value < self.end
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Error Utilities
// ============================================================================

impl MatrixError {
    /// Build an `OutOfRange` error for `value` checked against `[0, end)`.
    pub fn out_of_range(what: &'static str, value: usize, end: usize) -> Self {
        MatrixError::OutOfRange {
            what,
            value,
            range: Bounds::upto(end),
        }
    }

    /// Check if this error comes from addressing outside a view.
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            MatrixError::OutOfRange { .. } | MatrixError::KernelTooLarge { .. }
        )
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            MatrixError::SizeMismatch { expected, .. } => Some(format!(
                "Supply a backing store of exactly {} elements",
                expected
            )),
            MatrixError::UnsupportedElementType { operation, .. } => Some(format!(
                "Convert the matrix to float or int before calling {}",
                operation
            )),
            MatrixError::UnsupportedChannelLayout(_) => {
                Some("Convert the bitmap to alpha8, gray8, bgra8888 or rgba8888".to_string())
            }
            MatrixError::KernelTooLarge { kernel, .. } => Some(format!(
                "Use data at least {}x{} in size",
                kernel.0, kernel.1
            )),
            _ => None,
        }
    }
}

/// Result type alias for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;
