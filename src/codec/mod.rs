//! Pixel channel codec.
//!
//! Bridges raw decoded bitmap bytes and matrices. The caller owns the
//! container format (PNG, JPEG, ...) and hands this module bare pixels in one
//! of the [`ChannelLayout`](crate::core::ChannelLayout)s; it gets bare pixels
//! back from [`encode_to_bitmap_bytes`].

pub mod channels;
pub mod decode;
pub mod encode;
pub mod options;

pub use channels::{
    bytes_to_fixed, bytes_to_float, compose_channels, extract_channel, fixed_to_bytes,
    float_to_bytes, to_fixed, to_float, PackedChannel,
};
pub use decode::{decode_bitmap_bytes, pack_bgra, pack_rgba};
pub use encode::{encode_to_bitmap_bytes, fixed_to_byte, float_to_byte, unpack_bgra, EncodedBitmap};
pub use options::DecodeOptions;
