//! Conversions between channel matrices.
//!
//! Packed words carry four byte lanes; convolution wants one scalar channel in
//! float or 16.16 fixed point. These helpers move between the two without
//! going through raw bytes.

use crate::codec::encode::{fixed_to_byte, float_to_byte};
use crate::core::any::AnyMatrix;
use crate::core::error::{MatrixError, MatrixResult};
use crate::core::matrix::Matrix;
use serde::{Deserialize, Serialize};

/// A byte lane of a packed word, named by its position in an encoded BGRA
/// pixel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackedChannel {
    /// First byte of the pixel (bits 16..24)
    B0,
    /// Second byte (bits 8..16)
    B1,
    /// Third byte (bits 0..8)
    B2,
    /// Fourth byte (bits 24..32)
    B3,
}

impl PackedChannel {
    /// All lanes in pixel byte order.
    pub const ALL: [PackedChannel; 4] = [
        PackedChannel::B0,
        PackedChannel::B1,
        PackedChannel::B2,
        PackedChannel::B3,
    ];

    /// Bit offset of the lane inside the word.
    pub fn shift(&self) -> u32 {
        match self {
            PackedChannel::B0 => 16,
            PackedChannel::B1 => 8,
            PackedChannel::B2 => 0,
            PackedChannel::B3 => 24,
        }
    }
}

/// Pull one lane out of every packed word.
pub fn extract_channel(matrix: &Matrix<u32>, channel: PackedChannel) -> Matrix<u8> {
    let shift = channel.shift();
    matrix.map(|word| (word >> shift) as u8)
}

/// Pack four same-shaped byte matrices, given in [`PackedChannel::ALL`]
/// order, into words. Inverse of [`extract_channel`].
pub fn compose_channels(lanes: [&Matrix<u8>; 4]) -> MatrixResult<Matrix<u32>> {
    let shape = lanes[0].shape();
    if let Some(bad) = lanes.iter().find(|lane| lane.shape() != shape) {
        return Err(MatrixError::ShapeMismatch {
            expected: shape,
            actual: bad.shape(),
        });
    }

    let result = Matrix::<u32>::new(shape.0, shape.1)?;
    for (lane, channel) in lanes.iter().zip(PackedChannel::ALL) {
        let shift = channel.shift();
        result.zip_update(*lane, |word, byte| *word |= u32::from(byte) << shift)?;
    }
    Ok(result)
}

/// Bytes to `[0, 1]` floats.
pub fn bytes_to_float(matrix: &Matrix<u8>) -> Matrix<f32> {
    matrix.map(|v| v as f32 / 255.0)
}

/// Bytes to 16.16 fixed point.
pub fn bytes_to_fixed(matrix: &Matrix<u8>) -> Matrix<i32> {
    matrix.map(|v| (v as i32) << 16)
}

/// Floats to bytes with the single-channel encode rule.
pub fn float_to_bytes(matrix: &Matrix<f32>) -> Matrix<u8> {
    matrix.map(float_to_byte)
}

/// 16.16 fixed point to bytes with the single-channel encode rule.
pub fn fixed_to_bytes(matrix: &Matrix<i32>) -> Matrix<u8> {
    matrix.map(fixed_to_byte)
}

/// Convert a scalar matrix to floats in the same value scale.
///
/// Bytes map to `v / 255`, fixed point to `v / 65536`. Packed words have no
/// single scalar value and are rejected.
pub fn to_float(matrix: &AnyMatrix) -> MatrixResult<Matrix<f32>> {
    match matrix {
        AnyMatrix::Byte(m) => Ok(bytes_to_float(m)),
        AnyMatrix::Int(m) => Ok(m.map(|v| v as f32 / 65536.0)),
        AnyMatrix::Float(m) => Ok(m.deep_clone()),
        AnyMatrix::Packed(_) => Err(matrix.unsupported("to_float")),
    }
}

/// Convert a scalar matrix to 16.16 fixed point in the same value scale.
pub fn to_fixed(matrix: &AnyMatrix) -> MatrixResult<Matrix<i32>> {
    match matrix {
        AnyMatrix::Byte(m) => Ok(bytes_to_fixed(m)),
        AnyMatrix::Int(m) => Ok(m.deep_clone()),
        AnyMatrix::Float(m) => Ok(m.map(|v| (v * 65536.0).round() as i32)),
        AnyMatrix::Packed(_) => Err(matrix.unsupported("to_fixed")),
    }
}
