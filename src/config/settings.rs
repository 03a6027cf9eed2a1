//! Runtime settings.
//!
//! Every field has a default matching the product's constants, so an empty JSON object is a
//! valid settings file. A few knobs can be overridden from the environment; see
//! [`Settings::with_env_overrides`].

use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::Canvas,
    foundation::error::{TemplatrError, TemplatrResult},
    geometry::placement::{ContainerContext, CropRegion},
    geometry::units::PX_PER_INCH,
    layout::autofit::AutoFitConfig,
};

pub const ENV_THUMBNAIL_CACHE_CAPACITY: &str = "TEMPLATR_THUMBNAIL_CACHE_CAPACITY";
pub const ENV_THREADS: &str = "TEMPLATR_THREADS";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_fit: AutoFitConfig,
    pub editor: EditorSettings,
    pub thumbnail: ThumbnailSettings,
    pub slides: SlideSettings,
    /// Worker threads for parallel thumbnail batches; `None` lets rayon decide.
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub container_width: f64,
    pub container_height: f64,
    /// Smallest width/height a resize can produce, in container pixels.
    pub min_size_px: f64,
    /// Smallest crop side, in percent of the foreground.
    pub min_crop_pct: f64,
    /// Crop proposed when crop mode is entered.
    pub default_crop: CropRegion,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            container_width: 800.0,
            container_height: 450.0,
            min_size_px: 50.0,
            min_crop_pct: 10.0,
            default_crop: CropRegion {
                x: 20.0,
                y: 20.0,
                width: 60.0,
                height: 60.0,
            },
        }
    }
}

impl EditorSettings {
    pub fn container(&self) -> TemplatrResult<ContainerContext> {
        ContainerContext::new(self.container_width, self.container_height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    pub canvas: Canvas,
    pub jpeg_quality: u8,
    pub cache_capacity: usize,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 400,
                height: 225,
            },
            jpeg_quality: 80,
            cache_capacity: 128,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SlideSettings {
    pub width_in: f64,
    pub height_in: f64,
    pub px_per_inch: f64,
}

impl Default for SlideSettings {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 7.5,
            px_per_inch: PX_PER_INCH,
        }
    }
}

impl Settings {
    pub fn from_json_str(s: &str) -> TemplatrResult<Self> {
        let settings: Settings = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_path(path: &Path) -> TemplatrResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Applies `TEMPLATR_*` environment overrides. Unparsable or zero values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = positive_usize(lookup(ENV_THUMBNAIL_CACHE_CAPACITY)) {
            self.thumbnail.cache_capacity = n;
        }
        if let Some(n) = positive_usize(lookup(ENV_THREADS)) {
            self.threads = Some(n);
        }
        self
    }

    pub fn validate(&self) -> TemplatrResult<()> {
        self.auto_fit.validate()?;

        let e = &self.editor;
        e.container()?;
        if !e.min_size_px.is_finite() || e.min_size_px <= 0.0 {
            return Err(TemplatrError::validation("editor min_size_px must be > 0"));
        }
        if !e.min_crop_pct.is_finite() || e.min_crop_pct <= 0.0 || e.min_crop_pct > 100.0 {
            return Err(TemplatrError::validation(
                "editor min_crop_pct must be in (0, 100]",
            ));
        }
        e.default_crop.validate()?;
        if e.default_crop.width < e.min_crop_pct || e.default_crop.height < e.min_crop_pct {
            return Err(TemplatrError::validation(format!(
                "editor default_crop sides must be >= min_crop_pct ({})",
                e.min_crop_pct
            )));
        }

        Canvas::new(self.thumbnail.canvas.width, self.thumbnail.canvas.height)?;
        if self.thumbnail.jpeg_quality == 0 || self.thumbnail.jpeg_quality > 100 {
            return Err(TemplatrError::validation(
                "thumbnail jpeg_quality must be in 1..=100",
            ));
        }
        if self.thumbnail.cache_capacity == 0 {
            return Err(TemplatrError::validation(
                "thumbnail cache_capacity must be >= 1",
            ));
        }

        let s = &self.slides;
        for (name, v) in [
            ("width_in", s.width_in),
            ("height_in", s.height_in),
            ("px_per_inch", s.px_per_inch),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TemplatrError::validation(format!(
                    "slides {name} must be finite and > 0"
                )));
            }
        }

        if self.threads == Some(0) {
            return Err(TemplatrError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }
}

fn positive_usize(v: Option<String>) -> Option<usize> {
    v.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
