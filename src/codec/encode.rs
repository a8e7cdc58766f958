//! Matrices back into raw pixel bytes.

use crate::core::any::AnyMatrix;
use crate::core::types::ChannelLayout;
use serde::{Deserialize, Serialize};

/// Raw pixels ready to be wrapped into a container format by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedBitmap {
    /// Tightly packed pixel bytes, `row_stride * height` long.
    pub bytes: Vec<u8>,
    pub width: usize,
    pub height: usize,
    /// Layout of `bytes`.
    pub layout: ChannelLayout,
    /// Bytes per row.
    pub row_stride: usize,
}

/// Split a packed word into BGRA bytes: `[w>>16, w>>8, w, w>>24]`.
#[inline]
pub fn unpack_bgra(word: u32) -> [u8; 4] {
    [(word >> 16) as u8, (word >> 8) as u8, word as u8, (word >> 24) as u8]
}

/// `round(clamp(f, 0, 1) * 255)`.
#[inline]
pub fn float_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Round a 16.16 fixed point value to a byte: `clamp((v + 32768) >> 16, 0, 255)`.
#[inline]
pub fn fixed_to_byte(value: i32) -> u8 {
    ((value as i64 + 32768) >> 16).clamp(0, 255) as u8
}

/// Encode any matrix into raw bytes.
///
/// Packed words become BGRA pixels; byte, int and float matrices become a
/// single 8-bit channel.
pub fn encode_to_bitmap_bytes(matrix: &AnyMatrix) -> EncodedBitmap {
    let (width, height) = matrix.shape();
    let (bytes, layout) = match matrix {
        AnyMatrix::Packed(m) => {
            let pixels: Vec<[u8; 4]> = m.to_vec().into_iter().map(unpack_bgra).collect();
            (bytemuck::cast_slice::<[u8; 4], u8>(&pixels).to_vec(), ChannelLayout::Bgra8888)
        }
        AnyMatrix::Byte(m) => (m.to_vec(), ChannelLayout::Gray8),
        AnyMatrix::Int(m) => (
            m.to_vec().into_iter().map(fixed_to_byte).collect(),
            ChannelLayout::Gray8,
        ),
        AnyMatrix::Float(m) => (
            m.to_vec().into_iter().map(float_to_byte).collect(),
            ChannelLayout::Gray8,
        ),
    };

    EncodedBitmap {
        bytes,
        width,
        height,
        layout,
        row_stride: width * layout.bytes_per_pixel(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::Matrix;

    #[test]
    fn test_packed_encodes_bgra() {
        let word = (10 << 16) | (20 << 8) | 30 | (255 << 24);
        let m: AnyMatrix = Matrix::<u32>::from_vec(1, 1, vec![word]).unwrap().into();
        let encoded = encode_to_bitmap_bytes(&m);
        assert_eq!(encoded.bytes, vec![10, 20, 30, 255]);
        assert_eq!(encoded.layout, ChannelLayout::Bgra8888);
        assert_eq!(encoded.row_stride, 4);
    }

    #[test]
    fn test_float_encoding_clamps_and_rounds() {
        let m: AnyMatrix = Matrix::<f32>::from_vec(4, 1, vec![-0.5, 0.5, 1.0, 7.0])
            .unwrap()
            .into();
        let encoded = encode_to_bitmap_bytes(&m);
        assert_eq!(encoded.bytes, vec![0, 128, 255, 255]);
        assert_eq!(encoded.layout, ChannelLayout::Gray8);
        assert_eq!(encoded.row_stride, 4);
    }

    #[test]
    fn test_fixed_encoding() {
        assert_eq!(fixed_to_byte(200 << 16), 200);
        assert_eq!(fixed_to_byte((3 << 16) + 32768), 4);
        assert_eq!(fixed_to_byte((3 << 16) + 32767), 3);
        assert_eq!(fixed_to_byte(-5 << 16), 0);
        assert_eq!(fixed_to_byte(i32::MAX), 255);
    }

    #[test]
    fn test_encode_view_uses_view_extent() {
        let m = Matrix::<u8>::from_vec(3, 3, (1..=9).collect()).unwrap();
        let view: AnyMatrix = m.region(1, 1, 2, 2).unwrap().into();
        let encoded = encode_to_bitmap_bytes(&view);
        assert_eq!((encoded.width, encoded.height), (2, 2));
        assert_eq!(encoded.bytes, vec![5, 6, 8, 9]);
    }
}
