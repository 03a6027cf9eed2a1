use std::{io::Cursor, sync::Arc};

use crate::{
    assets::source::{ImageRef, ImageSource},
    foundation::error::{TemplatrError, TemplatrResult},
    foundation::math::premul_channel,
    geometry::placement::NaturalSize,
};

/// A decoded source image held as premultiplied RGBA8.
///
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    premul: Arc<image::RgbaImage>,
}

impl DecodedImage {
    /// Wraps straight-alpha pixels, premultiplying them.
    pub fn from_straight_rgba(mut rgba: image::RgbaImage) -> Self {
        premultiply_in_place(&mut rgba);
        Self {
            premul: Arc::new(rgba),
        }
    }

    pub fn width(&self) -> u32 {
        self.premul.width()
    }

    pub fn height(&self) -> u32 {
        self.premul.height()
    }

    pub fn natural_size(&self) -> TemplatrResult<NaturalSize> {
        NaturalSize::from_pixels(self.width(), self.height())
    }

    pub(crate) fn premul(&self) -> &image::RgbaImage {
        &self.premul
    }
}

/// Decodes encoded bytes (any format the `image` crate recognizes).
///
/// `reference` only labels errors.
pub fn decode_image(reference: &str, bytes: &[u8]) -> TemplatrResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| TemplatrError::decode(reference, e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(TemplatrError::decode(reference, "image has no pixels"));
    }
    Ok(DecodedImage::from_straight_rgba(rgba))
}

/// Reads only the header to learn the natural size.
pub fn probe_dimensions(reference: &str, bytes: &[u8]) -> TemplatrResult<NaturalSize> {
    let (w, h) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TemplatrError::decode(reference, e.to_string()))?
        .into_dimensions()
        .map_err(|e| TemplatrError::decode(reference, e.to_string()))?;
    NaturalSize::from_pixels(w, h).map_err(|e| TemplatrError::decode(reference, e.to_string()))
}

/// Loads and decodes `reference`. Every failure, including a missing image, is a `Decode` error.
pub fn load_image(source: &dyn ImageSource, reference: &ImageRef) -> TemplatrResult<DecodedImage> {
    let bytes = source.load(reference).map_err(|e| as_decode(reference, e))?;
    decode_image(reference.as_str(), &bytes)
}

/// Loads `reference` and probes its natural size without decoding pixels.
pub fn load_dimensions(
    source: &dyn ImageSource,
    reference: &ImageRef,
) -> TemplatrResult<NaturalSize> {
    let bytes = source.load(reference).map_err(|e| as_decode(reference, e))?;
    probe_dimensions(reference.as_str(), &bytes)
}

fn as_decode(reference: &ImageRef, err: TemplatrError) -> TemplatrError {
    if err.is_decode() {
        err
    } else {
        TemplatrError::decode(reference.as_str(), format!("{err:#}"))
    }
}

fn premultiply_in_place(rgba: &mut image::RgbaImage) {
    for px in rgba.pixels_mut() {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = premul_channel(px[0], a);
        px[1] = premul_channel(px[1], a);
        px[2] = premul_channel(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
