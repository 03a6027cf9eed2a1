//! Unit conversions shared by every renderer.
//!
//! These are pure functions with no failure modes. Callers construct sizes
//! through [`crate::ContainerContext::new`] / [`crate::NaturalSize::new`] so a
//! zero dimension never reaches a division here.

use crate::foundation::core::Size;

/// Pixel density assumed when converting pixels to physical slide inches.
pub const PX_PER_INCH: f64 = 96.0;

pub fn pixels_to_percent(value_px: f64, container_dim_px: f64) -> f64 {
    value_px / container_dim_px * 100.0
}

pub fn percent_to_pixels(percent: f64, container_dim_px: f64) -> f64 {
    percent / 100.0 * container_dim_px
}

pub fn pixels_to_inches(value_px: f64, px_per_inch: f64) -> f64 {
    value_px / px_per_inch
}

pub fn inches_to_pixels(value_in: f64, px_per_inch: f64) -> f64 {
    value_in * px_per_inch
}

/// Largest size with the aspect ratio of `natural_*` that fits in `max_*`.
///
/// Width-constrained first, then height-constrained if the height overflows.
/// Every renderer goes through this exact order; changing it makes the
/// raster and slide outputs diverge on ties.
pub fn scale_aspect_fit(natural_width: f64, natural_height: f64, max_width: f64, max_height: f64) -> Size {
    let aspect = natural_width / natural_height;
    let mut width = max_width;
    let mut height = width / aspect;
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }
    Size::new(width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/units.rs"]
mod tests;
