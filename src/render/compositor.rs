//! CPU raster compositor: one background stretched to the output, one foreground placed on top.
//!
//! All blending happens on premultiplied RGBA8. The foreground's destination rectangle is
//! derived from the [`Placement`] with [`Placement::rescaled_rect`], snapped to whole pixels by
//! rounding each edge and clipped to the canvas, so the same placement lands on the same
//! fraction of any output size.

use image::imageops::{self, FilterType};

use crate::{
    assets::decode::DecodedImage,
    config::settings::Settings,
    foundation::core::{Canvas, Rect},
    foundation::error::{TemplatrError, TemplatrResult},
    foundation::math::unpremul_channel,
    geometry::placement::{ContainerContext, CropRegion, Placement},
    layout::autofit::{AutoFitConfig, compute_auto_fit_placement},
    render::blend::over_in_place,
};

const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// A rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    fn from_premul(img: image::RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> TemplatrResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Straight-alpha pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px: [u8; 4] = self.data.get(i..i + 4)?.try_into().ok()?;
        Some(if self.premultiplied { unpremul(px) } else { px })
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_straight_rgba(&self) -> image::RgbaImage {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let out = unpremul([px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&out);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

fn unpremul(px: [u8; 4]) -> [u8; 4] {
    let a = px[3];
    if a == 255 {
        return px;
    }
    [
        unpremul_channel(px[0], a),
        unpremul_channel(px[1], a),
        unpremul_channel(px[2], a),
        a,
    ]
}

/// Output raster dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    /// The background's own pixel size.
    Native,
    Fixed(Canvas),
}

impl OutputSize {
    pub fn resolve(self, background: &DecodedImage) -> TemplatrResult<Canvas> {
        background.natural_size()?;
        match self {
            OutputSize::Native => Canvas::new(background.width(), background.height()),
            OutputSize::Fixed(canvas) => Canvas::new(canvas.width, canvas.height),
        }
    }
}

/// The background alone, stretched to `output`.
pub fn composite_background(
    background: &DecodedImage,
    output: OutputSize,
) -> TemplatrResult<FrameRGBA> {
    let canvas = output.resolve(background)?;
    Ok(FrameRGBA::from_premul(stretch(background, canvas)))
}

/// Composites `foreground` at `placement` over `background`.
///
/// `placement` was produced against `container`; `crop` selects the part of the foreground that
/// gets drawn (the whole image when `None`).
pub fn composite_to_raster(
    background: &DecodedImage,
    foreground: &DecodedImage,
    placement: &Placement,
    container: ContainerContext,
    crop: Option<CropRegion>,
    output: OutputSize,
) -> TemplatrResult<FrameRGBA> {
    placement.validate()?;
    let crop = crop.unwrap_or(CropRegion::FULL);
    crop.validate()?;

    let canvas = output.resolve(background)?;
    let mut frame = stretch(background, canvas);

    let dest = placement.rescaled_rect(container, canvas.size());
    let src = crop.source_rect(foreground.natural_size()?);
    draw_foreground(&mut frame, foreground, src, dest)?;

    Ok(FrameRGBA::from_premul(frame))
}

/// Renders the auto-fit default for `foreground` against the output canvas itself.
///
/// This is how thumbnails and the plain download are produced: the user's edited placement is
/// not consulted.
pub fn composite_auto_fit(
    background: &DecodedImage,
    foreground: &DecodedImage,
    output: OutputSize,
    config: &AutoFitConfig,
) -> TemplatrResult<FrameRGBA> {
    let canvas = output.resolve(background)?;
    let container = ContainerContext::from_size(canvas.size())?;
    let placement = compute_auto_fit_placement(foreground.natural_size()?, container, config);
    composite_to_raster(
        background,
        foreground,
        &placement,
        container,
        None,
        OutputSize::Fixed(canvas),
    )
}

pub fn composite_thumbnail(
    background: &DecodedImage,
    foreground: &DecodedImage,
    settings: &Settings,
) -> TemplatrResult<FrameRGBA> {
    composite_auto_fit(
        background,
        foreground,
        OutputSize::Fixed(settings.thumbnail.canvas),
        &settings.auto_fit,
    )
}

fn stretch(background: &DecodedImage, canvas: Canvas) -> image::RgbaImage {
    let src = background.premul();
    if src.dimensions() == (canvas.width, canvas.height) {
        return src.clone();
    }
    imageops::resize(src, canvas.width, canvas.height, RESAMPLE_FILTER)
}

/// Visible whole-pixel span of `[a, b)` after rounding both edges and clipping to `[0, limit)`,
/// together with the unclipped rounded edges.
fn snap_clip(a: f64, b: f64, limit: u32) -> ((f64, f64), (u32, u32)) {
    let (d0, d1) = (a.round(), b.round());
    let v0 = d0.clamp(0.0, f64::from(limit));
    let v1 = d1.clamp(0.0, f64::from(limit));
    // both bounded by `limit`, so the casts are exact
    ((d0, d1), (v0 as u32, v1 as u32))
}

/// Source pixel span covering the visible part `[v0, v1)` of the destination `[d0, d1)`.
fn source_span(src0: f64, src1: f64, (d0, d1): (f64, f64), (v0, v1): (u32, u32), len: u32) -> (u32, u32) {
    let scale = (src1 - src0) / (d1 - d0);
    let s0 = src0 + (f64::from(v0) - d0) * scale;
    let s1 = src0 + (f64::from(v1) - d0) * scale;
    // an overflowing destination degenerates to the whole source span
    let (s0, s1) = if s0.is_finite() && s1.is_finite() { (s0, s1) } else { (src0, src1) };
    let last = f64::from(len - 1);
    let lo = s0.floor().clamp(0.0, last);
    let hi = s1.ceil().clamp(lo + 1.0, f64::from(len));
    (lo as u32, hi as u32)
}

fn draw_foreground(
    frame: &mut image::RgbaImage,
    foreground: &DecodedImage,
    src: Rect,
    dest: Rect,
) -> TemplatrResult<()> {
    let (dx, (vx0, vx1)) = snap_clip(dest.x0, dest.x1, frame.width());
    let (dy, (vy0, vy1)) = snap_clip(dest.y0, dest.y1, frame.height());
    if vx1 <= vx0 || vy1 <= vy0 || dx.1 <= dx.0 || dy.1 <= dy.0 {
        return Ok(());
    }

    // only the visible part of the destination is resampled
    let img = foreground.premul();
    let (sx0, sx1) = source_span(src.x0, src.x1, dx, (vx0, vx1), img.width());
    let (sy0, sy1) = source_span(src.y0, src.y1, dy, (vy0, vy1), img.height());
    let cropped = imageops::crop_imm(img, sx0, sy0, sx1 - sx0, sy1 - sy0).to_image();

    let (vw, vh) = (vx1 - vx0, vy1 - vy0);
    let scaled = if cropped.dimensions() == (vw, vh) {
        cropped
    } else {
        imageops::resize(&cropped, vw, vh, RESAMPLE_FILTER)
    };

    let row_bytes = usize::try_from(vw)
        .map_err(|_| TemplatrError::geometry("destination row does not fit in memory"))?
        * 4;
    let frame_stride = (frame.width() as usize) * 4;
    let frame_buf: &mut [u8] = frame;
    for (row, y) in (vy0..vy1).enumerate() {
        let f_start = (y as usize) * frame_stride + (vx0 as usize) * 4;
        let s_start = row * row_bytes;
        let (Some(dst_row), Some(src_row)) = (
            frame_buf.get_mut(f_start..f_start + row_bytes),
            scaled.as_raw().get(s_start..s_start + row_bytes),
        ) else {
            return Err(TemplatrError::geometry("foreground row outside the frame"));
        };
        over_in_place(dst_row, src_row)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
