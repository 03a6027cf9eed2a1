use crate::{
    foundation::core::{Rect, Size},
    foundation::error::{TemplatrError, TemplatrResult},
    geometry::placement::{AbsolutePosition, ContainerContext, NaturalSize, Placement, RelativeSize},
    geometry::units::{pixels_to_percent, scale_aspect_fit},
};

/// Constants of the default layout.
///
/// `padding` is in whatever unit the target renderer works in (pixels for rasters, inches for
/// slides once converted by the caller).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoFitConfig {
    /// Max foreground width as a fraction of the container width.
    pub coverage_x: f64,
    /// Max foreground height as a fraction of the container height.
    pub coverage_y: f64,
    pub padding: f64,
    /// Fill the coverage box even when the image is smaller than it.
    pub allow_upscale: bool,
}

impl Default for AutoFitConfig {
    fn default() -> Self {
        Self {
            coverage_x: 0.7,
            coverage_y: 0.8,
            padding: 16.0,
            allow_upscale: false,
        }
    }
}

impl AutoFitConfig {
    pub fn validate(&self) -> TemplatrResult<()> {
        for (name, v) in [("coverage_x", self.coverage_x), ("coverage_y", self.coverage_y)] {
            if !v.is_finite() || v <= 0.0 || v > 1.0 {
                return Err(TemplatrError::validation(format!(
                    "auto-fit {name} must be in (0, 1], got {v}"
                )));
            }
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(TemplatrError::validation(format!(
                "auto-fit padding must be finite and >= 0, got {}",
                self.padding
            )));
        }
        Ok(())
    }

    /// Same coverage, padding rescaled by `factor` (e.g. pixels to inches).
    pub fn with_padding_scaled(self, factor: f64) -> Self {
        Self {
            padding: self.padding * factor,
            ..self
        }
    }
}

/// Result of the auto-fit algorithm in the caller's unit system.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FitBox {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Default placement box for an image of `natural` size in a `container`, both in the same unit.
///
/// Aspect ratio is preserved. Width is capped at `coverage_x * container.width` and, unless
/// upscaling is allowed, at the natural width; height then falls back to `coverage_y` via
/// [`scale_aspect_fit`]'s ordering. Position is always `(padding, padding)`.
pub fn auto_fit(natural: NaturalSize, container: Size, config: &AutoFitConfig) -> FitBox {
    let max_w = container.width * config.coverage_x;
    let max_h = container.height * config.coverage_y;
    let width_cap = if config.allow_upscale {
        max_w
    } else {
        max_w.min(natural.width)
    };
    let fitted = scale_aspect_fit(natural.width, natural.height, width_cap, max_h);
    FitBox {
        x: config.padding,
        y: config.padding,
        width: fitted.width,
        height: fitted.height,
    }
}

/// [`auto_fit`] in container pixels, expressed as a [`Placement`].
pub fn compute_auto_fit_placement(
    natural: NaturalSize,
    container: ContainerContext,
    config: &AutoFitConfig,
) -> Placement {
    let fit = auto_fit(natural, container.size(), config);
    Placement {
        position: AbsolutePosition {
            x_px: fit.x,
            y_px: fit.y,
        },
        size: RelativeSize {
            width_pct: pixels_to_percent(fit.width, container.width()),
            height_pct: pixels_to_percent(fit.height, container.height()),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/autofit.rs"]
mod tests;
