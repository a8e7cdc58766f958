//! Raw pixel bytes into matrices.

use crate::codec::options::DecodeOptions;
use crate::core::any::AnyMatrix;
use crate::core::error::{MatrixError, MatrixResult};
use crate::core::matrix::Matrix;
use crate::core::types::ChannelLayout;
use image::{ImageBuffer, Luma, Pixel, Rgba};
use log::{debug, trace};

/// Pack one BGRA pixel: `(b0<<16) | (b1<<8) | b2 | (b3<<24)`.
#[inline]
pub fn pack_bgra(px: [u8; 4]) -> u32 {
    ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | (px[2] as u32) | ((px[3] as u32) << 24)
}

/// Pack one RGBA pixel: `(b0<<16) | (b1<<24) | b2 | (b3<<8)`.
///
/// Not the byte-swapped mirror of [`pack_bgra`]: the second and fourth source
/// bytes trade places with the BGRA mapping. Kept bit-exact for compatibility
/// with bitmaps already stored this way.
#[inline]
pub fn pack_rgba(px: [u8; 4]) -> u32 {
    ((px[0] as u32) << 16) | ((px[1] as u32) << 24) | (px[2] as u32) | ((px[3] as u32) << 8)
}

/// Decode `width` x `height` pixels of `layout` into a matrix.
///
/// Single-channel layouts produce a byte matrix; the two 4x8-bit layouts
/// produce a packed-word matrix. A source larger than the bounds in `options`
/// is resampled first, once.
pub fn decode_bitmap_bytes(
    bytes: &[u8],
    width: usize,
    height: usize,
    layout: ChannelLayout,
    options: &DecodeOptions,
) -> MatrixResult<AnyMatrix> {
    if !layout.is_supported() {
        return Err(MatrixError::UnsupportedChannelLayout(layout.to_string()));
    }
    if width == 0 || height == 0 {
        return Err(MatrixError::InvalidDimensions { width, height });
    }
    // A saturated length is larger than any slice, so it still mismatches.
    let expected = width
        .saturating_mul(height)
        .saturating_mul(layout.bytes_per_pixel());
    if bytes.len() != expected {
        return Err(MatrixError::SizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }

    if let Some((target_width, target_height)) = options.target_size(width, height) {
        debug!(
            "Downscaling {} bitmap {}x{} to {}x{}",
            layout, width, height, target_width, target_height
        );
        let resized = resample(bytes, width, height, layout, target_width, target_height, options)?;
        return decode_bitmap_bytes(
            &resized,
            target_width,
            target_height,
            layout,
            &options.unbounded(),
        );
    }

    trace!("Decoding {} bitmap {}x{}", layout, width, height);
    let matrix = match layout {
        ChannelLayout::Alpha8 | ChannelLayout::Gray8 => {
            AnyMatrix::Byte(Matrix::from_vec(width, height, bytes.to_vec())?)
        }
        ChannelLayout::Bgra8888 => AnyMatrix::Packed(pack_pixels(bytes, width, height, pack_bgra)?),
        ChannelLayout::Rgba8888 => AnyMatrix::Packed(pack_pixels(bytes, width, height, pack_rgba)?),
        other => return Err(MatrixError::UnsupportedChannelLayout(other.to_string())),
    };
    Ok(matrix)
}

fn pack_pixels<F>(bytes: &[u8], width: usize, height: usize, pack: F) -> MatrixResult<Matrix<u32>>
where
    F: Fn([u8; 4]) -> u32,
{
    let words = bytes
        .chunks_exact(4)
        .map(|px| pack([px[0], px[1], px[2], px[3]]))
        .collect();
    Matrix::from_vec(width, height, words)
}

/// Resample raw pixels with the filter from `options`.
///
/// Four-channel layouts are resampled per channel, so the byte order inside a
/// pixel does not matter here.
fn resample(
    bytes: &[u8],
    width: usize,
    height: usize,
    layout: ChannelLayout,
    target_width: usize,
    target_height: usize,
    options: &DecodeOptions,
) -> MatrixResult<Vec<u8>> {
    if layout.is_single_channel() {
        resample_as::<Luma<u8>>(bytes, width, height, target_width, target_height, options)
    } else {
        resample_as::<Rgba<u8>>(bytes, width, height, target_width, target_height, options)
    }
}

fn resample_as<P>(
    bytes: &[u8],
    width: usize,
    height: usize,
    target_width: usize,
    target_height: usize,
    options: &DecodeOptions,
) -> MatrixResult<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let source: ImageBuffer<P, Vec<u8>> =
        ImageBuffer::from_raw(width as u32, height as u32, bytes.to_vec()).ok_or_else(|| {
            MatrixError::Resize(format!(
                "{} bytes do not form a {}x{} image",
                bytes.len(),
                width,
                height
            ))
        })?;
    let resized = image::imageops::resize(
        &source,
        target_width as u32,
        target_height as u32,
        options.filter,
    );
    Ok(resized.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ElementType;

    #[test]
    fn test_single_channel_copy() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let m = decode_bitmap_bytes(&bytes, 3, 2, ChannelLayout::Alpha8, &DecodeOptions::new())
            .unwrap();
        let m = m.as_byte().unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(2, 1).unwrap(), 6);
        assert_eq!(m.to_vec(), bytes.to_vec());
    }

    #[test]
    fn test_bgra_packing() {
        let bytes = [10u8, 20, 30, 255, 0, 0, 0, 0, 255, 255, 255, 255, 1, 2, 3, 4];
        let m = decode_bitmap_bytes(&bytes, 2, 2, ChannelLayout::Bgra8888, &DecodeOptions::new())
            .unwrap();
        assert_eq!(m.element_type(), ElementType::PackedWord);
        let m = m.as_packed().unwrap();
        assert_eq!(m.get(0, 0).unwrap(), (10 << 16) | (20 << 8) | 30 | (255 << 24));
        assert_eq!(m.get(1, 0).unwrap(), 0);
        assert_eq!(m.get(0, 1).unwrap(), 0xFFFF_FFFF);
        assert_eq!(m.get(1, 1).unwrap(), (1 << 16) | (2 << 8) | 3 | (4 << 24));
    }

    #[test]
    fn test_rgba_packing() {
        let bytes = [1u8, 2, 3, 4];
        let m = decode_bitmap_bytes(&bytes, 1, 1, ChannelLayout::Rgba8888, &DecodeOptions::new())
            .unwrap();
        assert_eq!(
            m.as_packed().unwrap().get(0, 0).unwrap(),
            (1 << 16) | (2 << 24) | 3 | (4 << 8)
        );
    }

    #[test]
    fn test_unsupported_layout() {
        let err = decode_bitmap_bytes(&[0; 2], 1, 1, ChannelLayout::Rgb565, &DecodeOptions::new())
            .unwrap_err();
        assert_eq!(err, MatrixError::UnsupportedChannelLayout("rgb565".to_string()));
    }

    #[test]
    fn test_buffer_length_checked() {
        let err = decode_bitmap_bytes(&[0; 7], 2, 1, ChannelLayout::Bgra8888, &DecodeOptions::new())
            .unwrap_err();
        assert_eq!(err, MatrixError::SizeMismatch { expected: 8, actual: 7 });
    }

    #[test]
    fn test_huge_dimensions_are_a_length_mismatch() {
        let err = decode_bitmap_bytes(&[], usize::MAX / 2, 3, ChannelLayout::Gray8, &DecodeOptions::new())
            .unwrap_err();
        assert_eq!(err, MatrixError::SizeMismatch { expected: usize::MAX, actual: 0 });
    }

    #[test]
    fn test_downscale_to_target_size() {
        let bytes = vec![128u8; 40 * 20];
        let options = DecodeOptions::new().with_max_size(10, 10);
        let m = decode_bitmap_bytes(&bytes, 40, 20, ChannelLayout::Gray8, &options).unwrap();
        // scale 0.25: round(10.5) x round(5.5)
        assert_eq!(m.shape(), (11, 6));
        // A flat image stays flat through the resampler.
        assert!(m.as_byte().unwrap().to_vec().iter().all(|&v| v == 128));
    }

    #[test]
    fn test_downscale_four_channel() {
        let bytes: Vec<u8> = std::iter::repeat([10u8, 20, 30, 255]).take(16 * 8).flatten().collect();
        let options = DecodeOptions::new().with_max_width(8);
        let m = decode_bitmap_bytes(&bytes, 16, 8, ChannelLayout::Bgra8888, &options).unwrap();
        assert_eq!(m.shape(), (9, 5));
        let expected = pack_bgra([10, 20, 30, 255]);
        assert!(m.as_packed().unwrap().to_vec().iter().all(|&w| w == expected));
    }
}
