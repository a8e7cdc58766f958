//! Decode configuration.
//!
//! # Example
//!
//! ```
//! use pixelmatrix::codec::DecodeOptions;
//!
//! let options = DecodeOptions::new().with_max_size(1024, 768);
//! assert_eq!(options.target_size(2048, 1024), Some((1025, 513)));
//! ```

use image::imageops::FilterType;

/// Options for [`decode_bitmap_bytes`](crate::codec::decode_bitmap_bytes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Largest accepted width before the source is downscaled.
    pub max_width: Option<usize>,
    /// Largest accepted height before the source is downscaled.
    pub max_height: Option<usize>,
    /// Resampling filter used when downscaling.
    pub filter: FilterType,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            max_height: None,
            filter: FilterType::Lanczos3,
        }
    }
}

impl DecodeOptions {
    /// Create options with no size bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound both dimensions.
    pub fn with_max_size(mut self, max_width: usize, max_height: usize) -> Self {
        self.max_width = Some(max_width);
        self.max_height = Some(max_height);
        self
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Set the resampling filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Same filter, bounds removed.
    pub fn unbounded(&self) -> Self {
        Self {
            max_width: None,
            max_height: None,
            filter: self.filter,
        }
    }

    /// Check if a `width` x `height` source exceeds the bounds.
    pub fn needs_downscale(&self, width: usize, height: usize) -> bool {
        self.max_width.is_some_and(|max| width > max)
            || self.max_height.is_some_and(|max| height > max)
    }

    /// Uniform scale factor bringing the source inside the bounds, if needed.
    ///
    /// The smaller of the per-axis ratios wins; an unset bound does not
    /// constrain its axis.
    pub fn scale_for(&self, width: usize, height: usize) -> Option<f64> {
        if !self.needs_downscale(width, height) {
            return None;
        }
        let sx = self.max_width.map(|max| max as f64 / width as f64);
        let sy = self.max_height.map(|max| max as f64 / height as f64);
        match (sx, sy) {
            (Some(sx), Some(sy)) => Some(sx.min(sy)),
            (Some(s), None) | (None, Some(s)) => Some(s),
            (None, None) => None,
        }
    }

    /// Resampled size for a source exceeding the bounds.
    ///
    /// Each side is `round(side * scale + 0.5)`, never less than one pixel.
    pub fn target_size(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        self.scale_for(width, height).map(|scale| {
            let w = (width as f64 * scale + 0.5).round() as usize;
            let h = (height as f64 * scale + 0.5).round() as usize;
            (w.max(1), h.max(1))
        })
    }
}
