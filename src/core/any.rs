//! Closed union over the four matrix element kinds.
//!
//! Algorithms are written once per element kind and picked by pattern matching
//! on [`AnyMatrix`], so callers can pass "some matrix" around without type
//! switches of their own.

use crate::core::error::{MatrixError, MatrixResult};
use crate::core::matrix::Matrix;
use crate::core::types::ElementType;

/// A matrix of any supported element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMatrix {
    /// 8-bit single channel
    Byte(Matrix<u8>),
    /// Packed four-channel pixels
    Packed(Matrix<u32>),
    /// 16.16 fixed point values
    Int(Matrix<i32>),
    /// Floating point values
    Float(Matrix<f32>),
}

macro_rules! forward {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyMatrix::Byte($m) => $body,
            AnyMatrix::Packed($m) => $body,
            AnyMatrix::Int($m) => $body,
            AnyMatrix::Float($m) => $body,
        }
    };
}

macro_rules! forward_view {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            AnyMatrix::Byte($m) => $body.map(AnyMatrix::Byte),
            AnyMatrix::Packed($m) => $body.map(AnyMatrix::Packed),
            AnyMatrix::Int($m) => $body.map(AnyMatrix::Int),
            AnyMatrix::Float($m) => $body.map(AnyMatrix::Float),
        }
    };
}

impl AnyMatrix {
    /// Get the element kind of the wrapped matrix.
    pub fn element_type(&self) -> ElementType {
        forward!(self, m => m.element_type())
    }

    pub fn width(&self) -> usize {
        forward!(self, m => m.width())
    }

    pub fn height(&self) -> usize {
        forward!(self, m => m.height())
    }

    pub fn shape(&self) -> (usize, usize) {
        forward!(self, m => m.shape())
    }

    /// One-row view, see [`Matrix::row`].
    pub fn row(&self, y: usize) -> MatrixResult<AnyMatrix> {
        forward_view!(self, m => m.row(y))
    }

    /// One-column view, see [`Matrix::column`].
    pub fn column(&self, x: usize) -> MatrixResult<AnyMatrix> {
        forward_view!(self, m => m.column(x))
    }

    /// Sub-rectangle view, see [`Matrix::region`].
    pub fn region(&self, left: usize, top: usize, width: usize, height: usize) -> MatrixResult<AnyMatrix> {
        forward_view!(self, m => m.region(left, top, width, height))
    }

    /// Independent compact copy.
    pub fn deep_clone(&self) -> AnyMatrix {
        match self {
            AnyMatrix::Byte(m) => AnyMatrix::Byte(m.deep_clone()),
            AnyMatrix::Packed(m) => AnyMatrix::Packed(m.deep_clone()),
            AnyMatrix::Int(m) => AnyMatrix::Int(m.deep_clone()),
            AnyMatrix::Float(m) => AnyMatrix::Float(m.deep_clone()),
        }
    }

    /// Try to get this value as a byte matrix.
    pub fn as_byte(&self) -> Option<&Matrix<u8>> {
        if let AnyMatrix::Byte(m) = self {
            Some(m)
        } else {
            None
        }
    }

    /// Try to get this value as a packed-word matrix.
    pub fn as_packed(&self) -> Option<&Matrix<u32>> {
        if let AnyMatrix::Packed(m) = self {
            Some(m)
        } else {
            None
        }
    }

    /// Try to get this value as an int matrix.
    pub fn as_int(&self) -> Option<&Matrix<i32>> {
        if let AnyMatrix::Int(m) = self {
            Some(m)
        } else {
            None
        }
    }

    /// Try to get this value as a float matrix.
    pub fn as_float(&self) -> Option<&Matrix<f32>> {
        if let AnyMatrix::Float(m) = self {
            Some(m)
        } else {
            None
        }
    }

    /// Error for `operation` not being implemented on this element kind.
    pub fn unsupported(&self, operation: &'static str) -> MatrixError {
        MatrixError::UnsupportedElementType {
            operation,
            element_type: self.element_type(),
        }
    }
}

impl From<Matrix<u8>> for AnyMatrix {
    fn from(m: Matrix<u8>) -> Self {
        AnyMatrix::Byte(m)
    }
}

impl From<Matrix<u32>> for AnyMatrix {
    fn from(m: Matrix<u32>) -> Self {
        AnyMatrix::Packed(m)
    }
}

impl From<Matrix<i32>> for AnyMatrix {
    fn from(m: Matrix<i32>) -> Self {
        AnyMatrix::Int(m)
    }
}

impl From<Matrix<f32>> for AnyMatrix {
    fn from(m: Matrix<f32>) -> Self {
        AnyMatrix::Float(m)
    }
}
