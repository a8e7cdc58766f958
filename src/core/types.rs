//! Element kinds and channel layouts.
//!
//! Both sets are closed: a matrix holds one of four element kinds and the
//! codec understands a fixed list of pixel layouts. Enums keep every dispatch
//! site exhaustive, and serde handles them natively when a collaborator stores
//! layout tags in its own configuration.

use crate::core::error::MatrixError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four element kinds a matrix can hold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 8-bit unsigned (`u8`)
    Byte,
    /// Four 8-bit channels packed into a `u32`
    PackedWord,
    /// 32-bit signed, 16.16 fixed point when holding pixel values (`i32`)
    Int32,
    /// 32-bit float, `[0, 1]` when holding pixel values (`f32`)
    Float32,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            ElementType::Byte => 1,
            ElementType::PackedWord | ElementType::Int32 | ElementType::Float32 => 4,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Byte => "byte",
            ElementType::PackedWord => "packed word",
            ElementType::Int32 => "int32",
            ElementType::Float32 => "float32",
        };
        write!(f, "{}", name)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u32 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Scalar types that can back a [`Matrix`](crate::core::matrix::Matrix).
///
/// Sealed: the set matches [`ElementType`] one to one.
pub trait Element:
    sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Runtime tag for this element kind.
    const ELEMENT_TYPE: ElementType;
}

impl Element for u8 {
    const ELEMENT_TYPE: ElementType = ElementType::Byte;
}

impl Element for u32 {
    const ELEMENT_TYPE: ElementType = ElementType::PackedWord;
}

impl Element for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int32;
}

impl Element for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float32;
}

/// Pixel layouts a decoded bitmap may arrive in.
///
/// Only the single-channel and the two 4x8-bit layouts are decodable; the rest
/// are named so that the rejection error can say exactly what was received.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Single 8-bit opacity channel
    Alpha8,
    /// Single 8-bit greyscale channel
    Gray8,
    /// Four 8-bit channels, blue first
    Bgra8888,
    /// Four 8-bit channels, red first
    Rgba8888,
    Rgb565,
    Rgb888x,
    Argb4444,
    RgbaF16,
    Unknown,
}

impl ChannelLayout {
    /// Bytes occupied by one pixel in this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ChannelLayout::Alpha8 | ChannelLayout::Gray8 => 1,
            ChannelLayout::Rgb565 | ChannelLayout::Argb4444 => 2,
            ChannelLayout::Bgra8888 | ChannelLayout::Rgba8888 | ChannelLayout::Rgb888x => 4,
            ChannelLayout::RgbaF16 => 8,
            ChannelLayout::Unknown => 0,
        }
    }

    /// Whether the codec can decode this layout.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            ChannelLayout::Alpha8
                | ChannelLayout::Gray8
                | ChannelLayout::Bgra8888
                | ChannelLayout::Rgba8888
        )
    }

    /// Whether this layout carries a single 8-bit channel.
    pub fn is_single_channel(&self) -> bool {
        matches!(self, ChannelLayout::Alpha8 | ChannelLayout::Gray8)
    }

    /// Lowercase tag, as accepted by [`FromStr`].
    pub fn tag(&self) -> &'static str {
        match self {
            ChannelLayout::Alpha8 => "alpha8",
            ChannelLayout::Gray8 => "gray8",
            ChannelLayout::Bgra8888 => "bgra8888",
            ChannelLayout::Rgba8888 => "rgba8888",
            ChannelLayout::Rgb565 => "rgb565",
            ChannelLayout::Rgb888x => "rgb888x",
            ChannelLayout::Argb4444 => "argb4444",
            ChannelLayout::RgbaF16 => "rgbaf16",
            ChannelLayout::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ChannelLayout {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layout = match s.to_ascii_lowercase().as_str() {
            "alpha8" => ChannelLayout::Alpha8,
            "gray8" => ChannelLayout::Gray8,
            "bgra8888" => ChannelLayout::Bgra8888,
            "rgba8888" => ChannelLayout::Rgba8888,
            "rgb565" => ChannelLayout::Rgb565,
            "rgb888x" => ChannelLayout::Rgb888x,
            "argb4444" => ChannelLayout::Argb4444,
            "rgbaf16" => ChannelLayout::RgbaF16,
            "unknown" => ChannelLayout::Unknown,
            _ => return Err(MatrixError::UnsupportedChannelLayout(s.to_string())),
        };
        Ok(layout)
    }
}
