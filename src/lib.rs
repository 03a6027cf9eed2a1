//! Templatr places a "question" image on a background and renders the result.
//!
//! One [`Placement`] drives three renderers that must agree:
//!
//! - the interactive [`EditorSession`] (move, resize, crop, reset, save)
//! - the raster compositor ([`composite_to_raster`], thumbnails with [`ThumbnailCache`])
//! - the slide exporter ([`export_slide`], [`export_deck`])
//!
//! A placement keeps its position in container pixels and its size in percent of the container,
//! so every conversion takes a [`ContainerContext`] explicitly.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod editor;
mod foundation;
mod geometry;
mod layout;
mod render;
mod slides;
mod template;

pub use crate::foundation::core::{Canvas, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{TemplatrError, TemplatrResult};

pub use crate::config::settings::{
    ENV_THREADS, ENV_THUMBNAIL_CACHE_CAPACITY, EditorSettings, Settings, SlideSettings,
    ThumbnailSettings,
};
pub use crate::geometry::placement::{
    AbsolutePosition, ContainerContext, CropRegion, NaturalSize, Placement, RelativeSize,
    SavedLayout,
};
pub use crate::geometry::units::{
    PX_PER_INCH, inches_to_pixels, percent_to_pixels, pixels_to_inches, pixels_to_percent,
    scale_aspect_fit,
};
pub use crate::layout::autofit::{AutoFitConfig, FitBox, auto_fit, compute_auto_fit_placement};

pub use crate::editor::gesture::Handle;
pub use crate::editor::session::{EditorSession, Gesture, SessionState};

pub use crate::assets::decode::{
    DecodedImage, decode_image, load_dimensions, load_image, probe_dimensions,
};
pub use crate::assets::source::{FsImageSource, ImageRef, ImageSource, MemoryImageSource};

pub use crate::render::batch::render_thumbnails;
pub use crate::render::cache::{ThumbnailCache, ThumbnailKey, render_thumbnail_cached};
pub use crate::render::compositor::{
    FrameRGBA, OutputSize, composite_auto_fit, composite_background, composite_thumbnail,
    composite_to_raster,
};
pub use crate::render::encode::{OutputFormat, encode_frame};
pub use crate::render::pipeline::{
    ComposablePair, RenderOutcome, Thumbnail, encode_thumbnail, render_auto_fit, render_pair,
    render_thumbnail,
};

pub use crate::slides::deck::{ExportStats, SlideDeck, export_deck};
pub use crate::slides::slide::{
    SizingMode, Slide, SlideLength, SlideObject, SlideSizing, export_slide,
    export_slide_from_source,
};

pub use crate::template::record::{
    MAX_FOLDER_QUESTIONS, TemplateKind, TemplateRecord, template_names, validate_question_count,
};
