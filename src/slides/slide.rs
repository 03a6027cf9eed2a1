//! Editable slide objects on a fixed physical canvas.
//!
//! A slide carries at most two image objects: the background stretched over the whole slide and
//! the foreground laid out by auto-fit in inches. Both are independent objects a presentation
//! editor can move and resize.

use crate::{
    assets::decode::load_dimensions,
    assets::source::{ImageRef, ImageSource},
    config::settings::Settings,
    foundation::core::{Rect, Size},
    foundation::error::TemplatrResult,
    geometry::placement::NaturalSize,
    geometry::units::pixels_to_inches,
    layout::autofit::auto_fit,
};

/// A length on the slide.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideLength {
    Inches(f64),
    /// Percent of the slide's width (for x/width) or height (for y/height).
    Percent(f64),
}

impl SlideLength {
    pub fn to_inches(self, slide_dim_in: f64) -> f64 {
        match self {
            SlideLength::Inches(v) => v,
            SlideLength::Percent(p) => p / 100.0 * slide_dim_in,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Scale the image to fit the box without cropping.
    Contain,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideSizing {
    pub mode: SizingMode,
    pub width_in: f64,
    pub height_in: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideObject {
    pub image: ImageRef,
    pub x: SlideLength,
    pub y: SlideLength,
    pub width: SlideLength,
    pub height: SlideLength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<SlideSizing>,
}

impl SlideObject {
    /// Whole-slide object: origin at (0, 0), 100% by 100%.
    pub fn full_bleed(image: ImageRef) -> Self {
        Self {
            image,
            x: SlideLength::Inches(0.0),
            y: SlideLength::Inches(0.0),
            width: SlideLength::Percent(100.0),
            height: SlideLength::Percent(100.0),
            sizing: None,
        }
    }

    /// The object's box in inches on a slide of `slide` inches.
    pub fn rect_in(&self, slide: Size) -> Rect {
        let x = self.x.to_inches(slide.width);
        let y = self.y.to_inches(slide.height);
        Rect::new(
            x,
            y,
            x + self.width.to_inches(slide.width),
            y + self.height.to_inches(slide.height),
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<SlideObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<SlideObject>,
}

impl Slide {
    pub fn is_background_only(&self) -> bool {
        self.background.is_some() && self.foreground.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.foreground.is_none()
    }
}

/// Builds the slide for one template.
///
/// The foreground, when given with its natural pixel size, is placed by auto-fit re-run on the
/// slide in inches: natural size and padding are converted at the configured pixels per inch.
/// The user's edited placement is not consulted.
pub fn export_slide(
    background: Option<&ImageRef>,
    foreground: Option<(&ImageRef, NaturalSize)>,
    settings: &Settings,
) -> TemplatrResult<Slide> {
    let background = background.cloned().map(SlideObject::full_bleed);
    let Some((image, natural_px)) = foreground else {
        return Ok(Slide {
            background,
            foreground: None,
        });
    };

    let slides = &settings.slides;
    let ppi = slides.px_per_inch;
    let natural_in = NaturalSize::new(
        pixels_to_inches(natural_px.width, ppi),
        pixels_to_inches(natural_px.height, ppi),
    )?;
    let config = settings.auto_fit.with_padding_scaled(1.0 / ppi);
    let fit = auto_fit(
        natural_in,
        Size::new(slides.width_in, slides.height_in),
        &config,
    );

    Ok(Slide {
        background,
        foreground: Some(SlideObject {
            image: image.clone(),
            x: SlideLength::Inches(fit.x),
            y: SlideLength::Inches(fit.y),
            width: SlideLength::Inches(fit.width),
            height: SlideLength::Inches(fit.height),
            sizing: Some(SlideSizing {
                mode: SizingMode::Contain,
                width_in: fit.width,
                height_in: fit.height,
            }),
        }),
    })
}

/// [`export_slide`] with images resolved through `source`.
///
/// A background that cannot be read fails the slide. A foreground whose dimensions cannot be
/// determined is dropped with a warning, leaving a background-only slide.
#[tracing::instrument(skip(source, settings))]
pub fn export_slide_from_source(
    source: &dyn ImageSource,
    background: Option<&ImageRef>,
    foreground: Option<&ImageRef>,
    settings: &Settings,
) -> TemplatrResult<Slide> {
    if let Some(bg) = background {
        load_dimensions(source, bg)?;
    }

    let foreground = match foreground {
        Some(fg) => match load_dimensions(source, fg) {
            Ok(natural) => Some((fg, natural)),
            Err(err) => {
                tracing::warn!(error = %err, "foreground dimensions unavailable; background-only slide");
                None
            }
        },
        None => None,
    };

    export_slide(background, foreground, settings)
}

#[cfg(test)]
#[path = "../../tests/unit/slides/slide.rs"]
mod tests;
