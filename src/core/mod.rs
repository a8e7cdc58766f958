//! Core types for the pixelmatrix numeric core.
//!
//! This module contains the foundational pieces every other layer builds on:
//! - Element kinds and channel layouts
//! - The strided matrix view and its shared backing store
//! - The closed union over matrix element kinds
//! - Error types

pub mod any;
pub mod error;
pub mod matrix;
pub mod types;

// Re-export commonly used types
pub use any::AnyMatrix;
pub use error::{Bounds, MatrixError, MatrixResult};
pub use matrix::{shared, Matrix, Storage};
pub use types::{ChannelLayout, Element, ElementType};
