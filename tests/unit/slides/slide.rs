use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryImageSource;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(w, h))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn inches(len: SlideLength) -> f64 {
    match len {
        SlideLength::Inches(v) => v,
        SlideLength::Percent(p) => panic!("expected inches, got {p}%"),
    }
}

#[test]
fn background_fills_the_slide() {
    let bg = ImageRef::new("bg.png");
    let slide = export_slide(Some(&bg), None, &Settings::default()).unwrap();
    let obj = slide.background.clone().unwrap();
    assert_eq!(obj.x, SlideLength::Inches(0.0));
    assert_eq!(obj.width, SlideLength::Percent(100.0));
    assert_eq!(obj.height, SlideLength::Percent(100.0));
    assert_eq!(obj.rect_in(Size::new(10.0, 7.5)), Rect::new(0.0, 0.0, 10.0, 7.5));
    assert!(slide.is_background_only());
}

#[test]
fn wide_foreground_is_capped_by_coverage() {
    let bg = ImageRef::new("bg.png");
    let q = ImageRef::new("q.png");
    let natural = NaturalSize::new(1000.0, 500.0).unwrap();
    let slide = export_slide(Some(&bg), Some((&q, natural)), &Settings::default()).unwrap();
    let fg = slide.foreground.unwrap();

    assert!(close(inches(fg.x), 16.0 / 96.0));
    assert!(close(inches(fg.y), 16.0 / 96.0));
    assert!(close(inches(fg.width), 7.0));
    assert!(close(inches(fg.height), 3.5));
    let sizing = fg.sizing.unwrap();
    assert_eq!(sizing.mode, SizingMode::Contain);
    assert!(close(sizing.width_in, 7.0) && close(sizing.height_in, 3.5));
}

#[test]
fn small_foreground_keeps_natural_inches() {
    let q = ImageRef::new("q.png");
    let natural = NaturalSize::new(300.0, 500.0).unwrap();
    let slide = export_slide(None, Some((&q, natural)), &Settings::default()).unwrap();
    let fg = slide.foreground.unwrap();
    assert!(close(inches(fg.width), 3.125));
    assert!(close(inches(fg.height), 500.0 / 96.0));
    assert!(slide.background.is_none());
}

#[test]
fn tall_foreground_is_height_constrained() {
    let q = ImageRef::new("q.png");
    let natural = NaturalSize::new(300.0, 900.0).unwrap();
    let slide = export_slide(None, Some((&q, natural)), &Settings::default()).unwrap();
    let fg = slide.foreground.unwrap();
    assert!(close(inches(fg.height), 6.0));
    assert!(close(inches(fg.width), 2.0));
}

#[test]
fn unreadable_foreground_gives_background_only_slide() {
    let source = MemoryImageSource::new()
        .with("bg.png", png(40, 30))
        .with("bad.png", b"nope".to_vec());
    let bg = ImageRef::new("bg.png");

    for fg in ["bad.png", "missing.png"] {
        let slide = export_slide_from_source(
            &source,
            Some(&bg),
            Some(&ImageRef::new(fg)),
            &Settings::default(),
        )
        .unwrap();
        assert!(slide.is_background_only(), "{fg}");
    }

    let ok = source.clone().with("q.png", png(96, 48));
    let slide =
        export_slide_from_source(&ok, Some(&bg), Some(&ImageRef::new("q.png")), &Settings::default())
            .unwrap();
    let fg = slide.foreground.unwrap();
    assert!(close(inches(fg.width), 1.0));
    assert!(close(inches(fg.height), 0.5));
}

#[test]
fn unreadable_background_fails_the_slide() {
    let source = MemoryImageSource::new().with("q.png", png(10, 10));
    let err = export_slide_from_source(
        &source,
        Some(&ImageRef::new("bg.png")),
        Some(&ImageRef::new("q.png")),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn slide_json_shape() {
    let slide = export_slide(Some(&ImageRef::new("bg.png")), None, &Settings::default()).unwrap();
    let json = serde_json::to_value(&slide).unwrap();
    assert_eq!(json["background"]["image"], "bg.png");
    assert_eq!(json["background"]["width"]["percent"], 100.0);
    assert!(json.get("foreground").is_none());
    let back: Slide = serde_json::from_value(json).unwrap();
    assert_eq!(back, slide);
}
