use super::*;

#[test]
fn empty_json_yields_product_defaults() {
    let s = Settings::from_json_str("{}").unwrap();
    assert_eq!(s, Settings::default());
    assert_eq!(s.auto_fit.coverage_x, 0.7);
    assert_eq!(s.auto_fit.coverage_y, 0.8);
    assert_eq!(s.auto_fit.padding, 16.0);
    assert!(!s.auto_fit.allow_upscale);
    assert_eq!(s.thumbnail.canvas, Canvas::new(400, 225).unwrap());
    assert_eq!(s.thumbnail.jpeg_quality, 80);
    assert_eq!((s.slides.width_in, s.slides.height_in), (10.0, 7.5));
    assert_eq!(s.slides.px_per_inch, 96.0);
    assert_eq!(s.editor.min_size_px, 50.0);
    assert_eq!(s.editor.default_crop, CropRegion::new(20.0, 20.0, 60.0, 60.0).unwrap());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let s = Settings::from_json_str(r#"{"auto_fit":{"padding":8.0},"thumbnail":{"jpeg_quality":95}}"#)
        .unwrap();
    assert_eq!(s.auto_fit.padding, 8.0);
    assert_eq!(s.auto_fit.coverage_x, 0.7);
    assert_eq!(s.thumbnail.jpeg_quality, 95);
    assert_eq!(s.thumbnail.cache_capacity, 128);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        r#"{"auto_fit":{"coverage_y":1.5}}"#,
        r#"{"editor":{"container_width":0.0}}"#,
        r#"{"editor":{"min_crop_pct":0.0}}"#,
        r#"{"editor":{"min_size_px":0.0}}"#,
        r#"{"editor":{"min_crop_pct":30.0,"default_crop":{"x":0.0,"y":0.0,"width":20.0,"height":50.0}}}"#,
        r#"{"thumbnail":{"jpeg_quality":0}}"#,
        r#"{"thumbnail":{"canvas":{"width":0,"height":10}}}"#,
        r#"{"slides":{"px_per_inch":-96.0}}"#,
        r#"{"threads":0}"#,
    ] {
        assert!(Settings::from_json_str(bad).is_err(), "{bad}");
    }
    assert!(matches!(
        Settings::from_json_str("not json"),
        Err(TemplatrError::Serde(_))
    ));
}

#[test]
fn env_overrides_apply_positive_integers_only() {
    let s = Settings::default().with_overrides_from(|key| match key {
        ENV_THUMBNAIL_CACHE_CAPACITY => Some("16".to_string()),
        ENV_THREADS => Some("0".to_string()),
        _ => None,
    });
    assert_eq!(s.thumbnail.cache_capacity, 16);
    assert_eq!(s.threads, None);

    let s = Settings::default().with_overrides_from(|key| match key {
        ENV_THUMBNAIL_CACHE_CAPACITY => Some("lots".to_string()),
        ENV_THREADS => Some(" 3 ".to_string()),
        _ => None,
    });
    assert_eq!(s.thumbnail.cache_capacity, 128);
    assert_eq!(s.threads, Some(3));
}

#[test]
fn from_json_path_reports_missing_file() {
    let err = Settings::from_json_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read settings"));
}

#[test]
fn default_crop_at_the_floor_is_accepted() {
    let s = Settings::from_json_str(
        r#"{"editor":{"min_crop_pct":25.0,"default_crop":{"x":10.0,"y":10.0,"width":25.0,"height":40.0}}}"#,
    )
    .unwrap();
    assert_eq!(s.editor.default_crop.width, 25.0);
}
