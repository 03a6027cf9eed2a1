use std::sync::Arc;

use crate::{
    assets::decode::load_image,
    assets::source::{ImageRef, ImageSource},
    config::settings::Settings,
    foundation::error::TemplatrResult,
    geometry::placement::{ContainerContext, CropRegion, Placement, SavedLayout},
    layout::autofit::AutoFitConfig,
    render::compositor::{
        FrameRGBA, OutputSize, composite_auto_fit, composite_background, composite_to_raster,
    },
    render::encode::{OutputFormat, encode_frame},
};

/// Everything needed to composite one foreground onto one background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComposablePair {
    pub background: ImageRef,
    pub foreground: ImageRef,
    pub placement: Placement,
    pub container: ContainerContext,
    #[serde(default)]
    pub crop: Option<CropRegion>,
}

impl ComposablePair {
    pub fn from_layout(background: ImageRef, foreground: ImageRef, layout: &SavedLayout) -> Self {
        Self {
            background,
            foreground,
            placement: layout.placement,
            container: layout.container,
            crop: layout.crop,
        }
    }

    /// Replaces the placement wholesale; the previous value is discarded.
    pub fn with_placement(self, placement: Placement) -> Self {
        Self { placement, ..self }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutcome {
    pub frame: FrameRGBA,
    /// `false` when the foreground could not be decoded and only the background was drawn.
    pub foreground_drawn: bool,
}

/// An encoded thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub bytes: Arc<Vec<u8>>,
    pub foreground_drawn: bool,
}

/// Full-resolution composite honouring the pair's placement and crop.
///
/// A foreground that fails to load or decode degrades to a background-only frame. A background
/// failure is returned as a `Decode` error.
#[tracing::instrument(skip(source, pair), fields(background = %pair.background, foreground = %pair.foreground))]
pub fn render_pair(
    source: &dyn ImageSource,
    pair: &ComposablePair,
    output: OutputSize,
) -> TemplatrResult<RenderOutcome> {
    let background = load_image(source, &pair.background)?;
    match load_image(source, &pair.foreground) {
        Ok(foreground) => Ok(RenderOutcome {
            frame: composite_to_raster(
                &background,
                &foreground,
                &pair.placement,
                pair.container,
                pair.crop,
                output,
            )?,
            foreground_drawn: true,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "foreground unavailable; rendering background only");
            Ok(RenderOutcome {
                frame: composite_background(&background, output)?,
                foreground_drawn: false,
            })
        }
    }
}

/// Composite of the auto-fit default, computed against `output` itself.
#[tracing::instrument(skip(source, config))]
pub fn render_auto_fit(
    source: &dyn ImageSource,
    background: &ImageRef,
    foreground: &ImageRef,
    output: OutputSize,
    config: &AutoFitConfig,
) -> TemplatrResult<RenderOutcome> {
    let bg = load_image(source, background)?;
    match load_image(source, foreground) {
        Ok(fg) => Ok(RenderOutcome {
            frame: composite_auto_fit(&bg, &fg, output, config)?,
            foreground_drawn: true,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "foreground unavailable; rendering background only");
            Ok(RenderOutcome {
                frame: composite_background(&bg, output)?,
                foreground_drawn: false,
            })
        }
    }
}

pub fn render_thumbnail(
    source: &dyn ImageSource,
    background: &ImageRef,
    foreground: &ImageRef,
    settings: &Settings,
) -> TemplatrResult<RenderOutcome> {
    render_auto_fit(
        source,
        background,
        foreground,
        OutputSize::Fixed(settings.thumbnail.canvas),
        &settings.auto_fit,
    )
}

/// [`render_thumbnail`] encoded as JPEG at the configured quality.
pub fn encode_thumbnail(
    source: &dyn ImageSource,
    background: &ImageRef,
    foreground: &ImageRef,
    settings: &Settings,
) -> TemplatrResult<Thumbnail> {
    let outcome = render_thumbnail(source, background, foreground, settings)?;
    let bytes = encode_frame(
        &outcome.frame,
        OutputFormat::Jpeg {
            quality: settings.thumbnail.jpeg_quality,
        },
    )?;
    Ok(Thumbnail {
        bytes: Arc::new(bytes),
        foreground_drawn: outcome.foreground_drawn,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
