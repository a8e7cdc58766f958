//! # Pixelmatrix - Strided Pixel Matrices and Convolution
//!
//! Pixelmatrix is the numeric core of an image pipeline. A caller decodes a
//! bitmap into raw pixel bytes, turns them into a matrix, runs one or more
//! convolution operators, and encodes the result back into raw bytes.
//!
//! ## Features
//!
//! - **Zero-copy views**: rows, columns and regions alias the parent's storage
//! - **Channel codec**: single-channel, BGRA and RGBA bytes to and from matrices
//! - **Valid convolution**: float and 16.16 fixed point, with kernel normalization
//! - **Kernel catalog**: blur, sharpen, Laplacian, Sobel, Scharr, line detectors, Gaussian
//!
//! ## Quick Start
//!
//! ```rust
//! use pixelmatrix::prelude::*;
//!
//! // A 4x4 greyscale bitmap from the caller
//! let pixels: Vec<u8> = (0..16).map(|v| v * 16).collect();
//! let decoded = decode_bitmap_bytes(&pixels, 4, 4, ChannelLayout::Gray8, &DecodeOptions::new())?;
//!
//! // Convolution runs on float or fixed point data
//! let data = AnyMatrix::Float(to_float(&decoded)?);
//! let chained = KernelRegistry::with_builtins().apply_chain(&data, &["blur", "sharpen"]);
//! assert!(chained.is_err()); // the 2x2 blur output is too small for a 3x3 kernel
//!
//! let blurred = blur(&data)?;
//! assert_eq!(blurred.shape(), (2, 2));
//!
//! let encoded = encode_to_bitmap_bytes(&blurred);
//! assert_eq!(encoded.bytes.len(), 4);
//! # Ok::<(), MatrixError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: matrix views, element kinds, errors
//! - [`codec`]: raw pixel bytes to and from matrices
//! - [`convolution`]: the convolution engine
//! - [`filters`]: kernel catalog and registry

#![warn(clippy::all)]

pub mod codec;
pub mod convolution;
pub mod core;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use pixelmatrix::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::any::AnyMatrix;
    pub use crate::core::matrix::{shared, Matrix, Storage};
    pub use crate::core::types::{ChannelLayout, Element, ElementType};

    // Errors
    pub use crate::core::error::{MatrixError, MatrixResult};

    // Codec
    pub use crate::codec::{
        decode_bitmap_bytes, encode_to_bitmap_bytes, extract_channel, to_fixed, to_float,
        DecodeOptions, EncodedBitmap, PackedChannel,
    };

    // Convolution
    pub use crate::convolution::{convolve, convolve_any, Convolvable};

    // Filters
    pub use crate::filters::{
        apply_kernel, blur, blur_n, cross_laplacian, gaussian_blur, gaussian_blur_kernel,
        laplacian, line_detect, scharr, sharpen, sobel, Direction, KernelCategory, KernelKind,
        KernelRegistry, LineOrientation,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
