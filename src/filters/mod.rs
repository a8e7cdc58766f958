//! Kernel catalog.
//!
//! Contains the named kernels, the functions applying them, and the registry
//! used to look them up by name.

pub mod apply;
pub mod kernels;
pub mod registry;

pub use apply::{
    apply_kernel, blur, blur_n, cross_laplacian, gaussian_blur, laplacian, line_detect, scharr, sharpen, sobel,
    Direction, LineOrientation,
};
pub use kernels::{blur_kernel, default_sigma, gaussian_blur_kernel, KernelCategory, KernelKind};
pub use registry::{KernelEntry, KernelFactory, KernelRegistry};
