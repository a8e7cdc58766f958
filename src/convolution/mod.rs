//! Convolution engine.
//!
//! Generic over float and 16.16 fixed point int matrices; see
//! [`engine`] for the algorithm.

pub mod engine;

pub use engine::{convolve, convolve_any, kernel_sum, normalized_weights, Convolvable};
