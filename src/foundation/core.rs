use std::str::FromStr;

use crate::foundation::error::{TemplatrError, TemplatrResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Integer pixel dimensions of an output raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> TemplatrResult<Self> {
        if width == 0 || height == 0 {
            return Err(TemplatrError::geometry(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl FromStr for Canvas {
    type Err = TemplatrError;

    /// Parses `WIDTHxHEIGHT`, e.g. `800x450`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| TemplatrError::validation(format!("expected WxH, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| TemplatrError::validation(format!("invalid dimension '{v}': {e}")))
        };
        Canvas::new(parse(w)?, parse(h)?)
    }
}

impl std::fmt::Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rejects zero, negative and non-finite sizes before they reach any division.
pub(crate) fn ensure_positive_size(size: Size, what: &str) -> TemplatrResult<Size> {
    if !size.width.is_finite() || !size.height.is_finite() {
        return Err(TemplatrError::geometry(format!(
            "{what} must be finite, got {}x{}",
            size.width, size.height
        )));
    }
    if size.width <= 0.0 || size.height <= 0.0 {
        return Err(TemplatrError::geometry(format!(
            "{what} must be non-empty, got {}x{}",
            size.width, size.height
        )));
    }
    Ok(size)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
