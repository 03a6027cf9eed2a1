use std::io::Cursor;

use crate::{
    foundation::error::{TemplatrError, TemplatrResult},
    render::compositor::FrameRGBA,
};

/// Encoding applied to a finished frame. Choosing one is the caller's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    /// Alpha is dropped; `quality` is clamped to `1..=100`.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }
}

pub fn encode_frame(frame: &FrameRGBA, format: OutputFormat) -> TemplatrResult<Vec<u8>> {
    let straight = frame.to_straight_rgba();
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            image::DynamicImage::ImageRgba8(straight)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| TemplatrError::export(format!("encode png: {e}")))?;
        }
        OutputFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(straight).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
                .encode_image(&rgb)
                .map_err(|e| TemplatrError::export(format!("encode jpeg: {e}")))?;
        }
    }
    Ok(buf)
}
