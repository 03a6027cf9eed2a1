use super::*;

fn container() -> ContainerContext {
    ContainerContext::new(800.0, 450.0).unwrap()
}

#[test]
fn container_and_natural_size_reject_degenerate_input() {
    assert!(matches!(
        ContainerContext::new(0.0, 450.0),
        Err(TemplatrError::Geometry(_))
    ));
    assert!(matches!(
        NaturalSize::new(300.0, 0.0),
        Err(TemplatrError::Geometry(_))
    ));
    assert!(NaturalSize::from_pixels(0, 1).is_err());
    assert_eq!(NaturalSize::from_pixels(1000, 500).unwrap().aspect_ratio(), 2.0);
}

#[test]
fn container_deserialization_goes_through_validation() {
    let ok: ContainerContext = serde_json::from_str(r#"{"width":800.0,"height":450.0}"#).unwrap();
    assert_eq!(ok, container());
    assert!(serde_json::from_str::<ContainerContext>(r#"{"width":0.0,"height":450.0}"#).is_err());
}

#[test]
fn placement_keeps_mixed_units() {
    let p = Placement::new(16.0, 16.0, 70.0, 50.0).unwrap();
    let rect = p.to_pixel_rect(container());
    assert_eq!(rect, Rect::new(16.0, 16.0, 16.0 + 560.0, 16.0 + 225.0));

    let back = Placement::from_pixel_rect(rect, container());
    assert_eq!(back.position, p.position);
    assert!((back.size.width_pct - 70.0).abs() < 1e-9);
    assert!((back.size.height_pct - 50.0).abs() < 1e-9);
}

#[test]
fn placement_rejects_non_positive_or_non_finite_size() {
    assert!(Placement::new(0.0, 0.0, 0.0, 10.0).is_err());
    assert!(Placement::new(0.0, 0.0, 10.0, -1.0).is_err());
    assert!(Placement::new(f64::NAN, 0.0, 10.0, 10.0).is_err());
    // positions outside the container are representable
    assert!(Placement::new(-5.0, 900.0, 10.0, 10.0).is_ok());
}

#[test]
fn rescaled_rect_scales_position_and_takes_percent_of_output() {
    let p = Placement::new(80.0, 45.0, 25.0, 50.0).unwrap();
    let out = p.rescaled_rect(container(), Size::new(1600.0, 900.0));
    assert_eq!(out, Rect::new(160.0, 90.0, 160.0 + 400.0, 90.0 + 450.0));

    let rebased = p.rebased(container(), ContainerContext::new(400.0, 225.0).unwrap());
    assert_eq!(rebased.position.x_px, 40.0);
    assert_eq!(rebased.position.y_px, 22.5);
    assert!((rebased.size.width_pct - 25.0).abs() < 1e-9);
}

#[test]
fn crop_validation_and_source_rect() {
    let crop = CropRegion::new(20.0, 20.0, 60.0, 60.0).unwrap();
    let natural = NaturalSize::new(1000.0, 500.0).unwrap();
    assert_eq!(crop.source_rect(natural), Rect::new(200.0, 100.0, 800.0, 400.0));
    assert_eq!(
        CropRegion::FULL.source_rect(natural),
        Rect::new(0.0, 0.0, 1000.0, 500.0)
    );

    assert!(CropRegion::new(50.0, 0.0, 60.0, 10.0).is_err());
    assert!(CropRegion::new(-1.0, 0.0, 10.0, 10.0).is_err());
    assert!(CropRegion::new(0.0, 0.0, 0.0, 10.0).is_err());
}

#[test]
fn crop_clamped_always_contained() {
    let c = CropRegion::clamped(95.0, -10.0, 30.0, 500.0, 10.0);
    assert!(c.is_contained());
    assert_eq!(c, CropRegion::new(70.0, 0.0, 30.0, 100.0).unwrap());

    let c = CropRegion::clamped(f64::NAN, 50.0, 1.0, f64::INFINITY, 10.0);
    assert!(c.is_contained());
    assert_eq!(c.width, 10.0);
    assert_eq!(c.x, 0.0);
}

#[test]
fn saved_layout_round_trips_through_json() {
    let layout = SavedLayout {
        placement: Placement::new(16.0, 16.0, 70.0, 62.5).unwrap(),
        container: container(),
        crop: Some(CropRegion::new(20.0, 20.0, 60.0, 60.0).unwrap()),
    };
    let json = serde_json::to_string(&layout).unwrap();
    let back: SavedLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back, layout);
    back.validate().unwrap();

    let no_crop: SavedLayout = serde_json::from_str(
        r#"{"placement":{"position":{"x_px":1.0,"y_px":2.0},"size":{"width_pct":3.0,"height_pct":4.0}},"container":{"width":10.0,"height":10.0}}"#,
    )
    .unwrap();
    assert!(no_crop.crop.is_none());
}
