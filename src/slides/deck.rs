use crate::{
    assets::source::ImageSource,
    config::settings::Settings,
    slides::slide::{Slide, export_slide_from_source},
    template::record::TemplateRecord,
};

/// Exported slides in template order, on a fixed canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideDeck {
    pub width_in: f64,
    pub height_in: f64,
    pub slides: Vec<Slide>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportStats {
    pub exported: usize,
    /// Slides exported without their foreground.
    pub background_only: usize,
    pub empty: usize,
    /// Templates whose slide could not be produced at all.
    pub skipped: usize,
}

/// Exports one slide per template, sequentially.
///
/// A failing template is skipped with a warning; the rest of the batch continues.
#[tracing::instrument(skip(source, templates, settings), fields(templates = templates.len()))]
pub fn export_deck(
    source: &dyn ImageSource,
    templates: &[TemplateRecord],
    settings: &Settings,
) -> (SlideDeck, ExportStats) {
    let mut stats = ExportStats::default();
    let mut slides = Vec::with_capacity(templates.len());

    for (i, template) in templates.iter().enumerate() {
        let slide = match export_slide_from_source(
            source,
            template.background.as_ref(),
            template.question.as_ref(),
            settings,
        ) {
            Ok(slide) => slide,
            Err(err) => {
                tracing::warn!(index = i, name = %template.name, error = %err, "skipping slide");
                stats.skipped += 1;
                continue;
            }
        };

        if slide.is_empty() {
            stats.empty += 1;
        } else if slide.is_background_only() && template.question.is_some() {
            stats.background_only += 1;
        }
        stats.exported += 1;
        slides.push(slide);
    }

    let deck = SlideDeck {
        width_in: settings.slides.width_in,
        height_in: settings.slides.height_in,
        slides,
    };
    (deck, stats)
}

#[cfg(test)]
#[path = "../../tests/unit/slides/deck.rs"]
mod tests;
