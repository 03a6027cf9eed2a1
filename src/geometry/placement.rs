use crate::{
    foundation::core::{Point, Rect, Size, ensure_positive_size},
    foundation::error::{TemplatrError, TemplatrResult},
    geometry::units::{percent_to_pixels, pixels_to_percent},
};

/// Pixel size of the surface a [`Placement`] was produced on.
///
/// A placement's position is in this surface's pixels and its size in percent of it, so the
/// two always travel together.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Size", into = "Size")]
pub struct ContainerContext {
    size: Size,
}

impl ContainerContext {
    pub fn new(width: f64, height: f64) -> TemplatrResult<Self> {
        Self::from_size(Size::new(width, height))
    }

    pub fn from_size(size: Size) -> TemplatrResult<Self> {
        Ok(Self {
            size: ensure_positive_size(size, "container")?,
        })
    }

    pub fn width(self) -> f64 {
        self.size.width
    }

    pub fn height(self) -> f64 {
        self.size.height
    }

    pub fn size(self) -> Size {
        self.size
    }
}

impl TryFrom<Size> for ContainerContext {
    type Error = TemplatrError;

    fn try_from(value: Size) -> Result<Self, Self::Error> {
        Self::from_size(value)
    }
}

impl From<ContainerContext> for Size {
    fn from(value: ContainerContext) -> Self {
        value.size
    }
}

/// Decoded pixel dimensions of a source image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NaturalSize {
    pub width: f64,
    pub height: f64,
}

impl NaturalSize {
    pub fn new(width: f64, height: f64) -> TemplatrResult<Self> {
        let size = ensure_positive_size(Size::new(width, height), "image natural size")?;
        Ok(Self {
            width: size.width,
            height: size.height,
        })
    }

    pub fn from_pixels(width: u32, height: u32) -> TemplatrResult<Self> {
        Self::new(f64::from(width), f64::from(height))
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Top-left corner in absolute pixels of the container's on-screen rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AbsolutePosition {
    pub x_px: f64,
    pub y_px: f64,
}

/// Size in percent of the container's width and height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RelativeSize {
    pub width_pct: f64,
    pub height_pct: f64,
}

/// Where the foreground sits inside its container.
///
/// Position and size deliberately use different units (pixels vs percent). Conversions to any
/// other space take the [`ContainerContext`] explicitly; nothing here clamps to the container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub position: AbsolutePosition,
    pub size: RelativeSize,
}

impl Placement {
    pub fn new(x_px: f64, y_px: f64, width_pct: f64, height_pct: f64) -> TemplatrResult<Self> {
        let placement = Self {
            position: AbsolutePosition { x_px, y_px },
            size: RelativeSize {
                width_pct,
                height_pct,
            },
        };
        placement.validate()?;
        Ok(placement)
    }

    pub fn validate(&self) -> TemplatrResult<()> {
        let all = [
            self.position.x_px,
            self.position.y_px,
            self.size.width_pct,
            self.size.height_pct,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(TemplatrError::validation(format!(
                "placement values must be finite: {self:?}"
            )));
        }
        if self.size.width_pct <= 0.0 || self.size.height_pct <= 0.0 {
            return Err(TemplatrError::validation(format!(
                "placement size must be > 0, got {}% x {}%",
                self.size.width_pct, self.size.height_pct
            )));
        }
        Ok(())
    }

    /// Builds a placement from a rectangle in container pixels.
    pub fn from_pixel_rect(rect: Rect, container: ContainerContext) -> Self {
        Self {
            position: AbsolutePosition {
                x_px: rect.x0,
                y_px: rect.y0,
            },
            size: RelativeSize {
                width_pct: pixels_to_percent(rect.width(), container.width()),
                height_pct: pixels_to_percent(rect.height(), container.height()),
            },
        }
    }

    pub fn width_px(&self, container: ContainerContext) -> f64 {
        percent_to_pixels(self.size.width_pct, container.width())
    }

    pub fn height_px(&self, container: ContainerContext) -> f64 {
        percent_to_pixels(self.size.height_pct, container.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.position.x_px, self.position.y_px)
    }

    /// The placement as a rectangle in the container's pixels.
    pub fn to_pixel_rect(&self, container: ContainerContext) -> Rect {
        Rect::from_origin_size(
            self.origin(),
            Size::new(self.width_px(container), self.height_px(container)),
        )
    }

    /// Maps the placement into an output raster of `output` pixels.
    ///
    /// Position scales by `output / container`, size is percent of `output`.
    pub fn rescaled_rect(&self, container: ContainerContext, output: Size) -> Rect {
        let scale_x = output.width / container.width();
        let scale_y = output.height / container.height();
        Rect::from_origin_size(
            Point::new(self.position.x_px * scale_x, self.position.y_px * scale_y),
            Size::new(
                percent_to_pixels(self.size.width_pct, output.width),
                percent_to_pixels(self.size.height_pct, output.height),
            ),
        )
    }

    /// The same on-screen rectangle expressed against another container.
    pub fn rebased(&self, from: ContainerContext, to: ContainerContext) -> Self {
        Self::from_pixel_rect(self.rescaled_rect(from, to.size()), to)
    }
}

/// Sub-rectangle of the foreground, in percent of its natural size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub const FULL: CropRegion = CropRegion {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> TemplatrResult<Self> {
        let crop = Self {
            x,
            y,
            width,
            height,
        };
        crop.validate()?;
        Ok(crop)
    }

    /// Clamps arbitrary values into a contained region of at least `min_pct` per side.
    pub fn clamped(x: f64, y: f64, width: f64, height: f64, min_pct: f64) -> Self {
        let min = min_pct.clamp(0.0, 100.0);
        let (x, width) = clamp_span(x, width, min);
        let (y, height) = clamp_span(y, height, min);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn validate(&self) -> TemplatrResult<()> {
        let vals = [self.x, self.y, self.width, self.height];
        if vals.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 100.0) {
            return Err(TemplatrError::validation(format!(
                "crop values must lie in [0, 100]: {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(TemplatrError::validation("crop must have a non-zero area"));
        }
        if self.right() > 100.0 + CONTAINMENT_EPS || self.bottom() > 100.0 + CONTAINMENT_EPS {
            return Err(TemplatrError::validation(format!(
                "crop must stay inside the image: {self:?}"
            )));
        }
        Ok(())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_contained(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= 100.0 + CONTAINMENT_EPS
            && self.bottom() <= 100.0 + CONTAINMENT_EPS
    }

    /// The crop in the foreground's natural pixel coordinates.
    pub fn source_rect(&self, natural: NaturalSize) -> Rect {
        Rect::new(
            percent_to_pixels(self.x, natural.width),
            percent_to_pixels(self.y, natural.height),
            percent_to_pixels(self.right(), natural.width),
            percent_to_pixels(self.bottom(), natural.height),
        )
    }
}

const CONTAINMENT_EPS: f64 = 1e-9;

fn clamp_span(start: f64, len: f64, min: f64) -> (f64, f64) {
    let len = if len.is_finite() { len } else { 100.0 };
    let len = len.max(min).min(100.0);
    let start = if start.is_finite() { start } else { 0.0 };
    let start = start.max(0.0).min(100.0 - len);
    (start, len)
}

/// What a finished editing session hands back to its caller.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedLayout {
    pub placement: Placement,
    pub container: ContainerContext,
    #[serde(default)]
    pub crop: Option<CropRegion>,
}

impl SavedLayout {
    pub fn validate(&self) -> TemplatrResult<()> {
        self.placement.validate()?;
        if let Some(crop) = &self.crop {
            crop.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/placement.rs"]
mod tests;
