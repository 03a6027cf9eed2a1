use super::*;
use crate::foundation::core::Rect;

fn session_for(natural: (f64, f64)) -> EditorSession {
    let natural = NaturalSize::new(natural.0, natural.1).unwrap();
    EditorSession::auto_fit(natural, &Settings::default()).unwrap()
}

fn editing() -> EditorSession {
    let mut s = session_for((1000.0, 500.0));
    s.start_editing();
    s
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn starts_viewing_at_auto_fit_default() {
    let s = session_for((1000.0, 500.0));
    assert_eq!(s.state(), SessionState::Viewing);
    assert_eq!(s.placement(), s.default_placement());
    assert_eq!(s.placement().position.x_px, 16.0);
    assert!(close(s.placement().size.width_pct, 70.0));
    assert!(s.crop().is_none());
    assert!(!s.has_unsaved_changes());
}

#[test]
fn gestures_require_editing() {
    let mut s = session_for((1000.0, 500.0));
    assert!(!s.begin_move(Point::new(20.0, 20.0)));
    assert!(!s.begin_resize(Handle::Se));
    assert!(!s.toggle_crop());
    assert!(!s.pointer_move(Point::new(100.0, 100.0)));
    assert_eq!(s.placement(), s.default_placement());
}

#[test]
fn move_follows_pointer_minus_grab_offset() {
    let mut s = editing();
    assert!(s.begin_move(Point::new(26.0, 36.0)));
    assert!(s.pointer_move(Point::new(110.0, 120.0)));
    let p = s.placement();
    assert_eq!((p.position.x_px, p.position.y_px), (100.0, 100.0));
    // size is untouched by a move
    assert_eq!(p.size, s.default_placement().size);
    s.pointer_up();
    assert_eq!(s.active_gesture(), None);
    assert!(!s.pointer_move(Point::new(300.0, 300.0)));
}

#[test]
fn move_is_clamped_to_container() {
    let mut s = editing();
    s.begin_move(Point::new(16.0, 16.0));
    s.pointer_move(Point::new(5000.0, -5000.0));
    let rect = s.placement().to_pixel_rect(s.container());
    assert!(close(rect.x1, 800.0));
    assert_eq!(rect.y0, 0.0);
}

#[test]
fn only_one_gesture_at_a_time() {
    let mut s = editing();
    assert!(s.begin_move(Point::new(20.0, 20.0)));
    assert!(!s.begin_resize(Handle::Nw));
    assert!(!s.begin_move(Point::new(30.0, 30.0)));
    assert!(!s.toggle_crop());
    s.pointer_up();
    assert!(s.begin_resize(Handle::Nw));
    assert!(matches!(
        s.active_gesture(),
        Some(Gesture::Resize { handle: Handle::Nw })
    ));
}

#[test]
fn nw_resize_keeps_bottom_right_fixed() {
    let mut s = editing();
    let before = s.placement().to_pixel_rect(s.container());
    assert!(s.begin_resize(Handle::Nw));
    for p in [
        Point::new(5.0, 3.0),
        Point::new(100.0, 90.0),
        Point::new(-40.0, -40.0),
        Point::new(before.x1 - 10.0, before.y1 - 10.0),
    ] {
        s.pointer_move(p);
        let r = s.placement().to_pixel_rect(s.container());
        assert!(close(r.x1, before.x1), "{p:?} {r:?}");
        assert!(close(r.y1, before.y1), "{p:?} {r:?}");
        assert!(r.width() >= 50.0 - 1e-9);
    }
}

#[test]
fn resize_handles_are_disabled_in_crop_mode() {
    let mut s = editing();
    assert!(s.toggle_crop());
    assert!(s.crop_mode());
    assert_eq!(s.crop(), Some(CropRegion::new(20.0, 20.0, 60.0, 60.0).unwrap()));
    assert!(!s.begin_resize(Handle::Se));
    assert!(s.begin_crop_resize(Handle::Se));
}

#[test]
fn crop_gestures_stay_contained_at_every_step() {
    let mut s = editing();
    s.toggle_crop();
    let rect = s.placement().to_pixel_rect(s.container());
    let far = [
        Point::new(rect.x1 + 500.0, rect.y1 + 500.0),
        Point::new(rect.x0 - 500.0, rect.y0 - 500.0),
        Point::new(rect.center().x, rect.center().y),
        Point::new(rect.x1, rect.y0),
    ];

    assert!(s.begin_crop_move(rect.center()));
    for p in far {
        s.pointer_move(p);
        assert!(s.crop().unwrap().is_contained(), "{:?}", s.crop());
    }
    s.pointer_up();

    for handle in Handle::ALL {
        assert!(s.begin_crop_resize(handle));
        for p in far {
            s.pointer_move(p);
            let c = s.crop().unwrap();
            assert!(c.is_contained(), "{handle:?} {c:?}");
            assert!(c.width > 0.0 && c.height > 0.0);
        }
        s.pointer_up();
    }
}

#[test]
fn crop_move_is_relative_to_region() {
    let mut s = editing();
    s.toggle_crop();
    let rect: Rect = s.placement().to_pixel_rect(s.container());
    // grab the crop at its own top-left corner (20%, 20% of the region)
    let grab_at = Point::new(
        rect.x0 + rect.width() * 0.2,
        rect.y0 + rect.height() * 0.2,
    );
    assert!(s.begin_crop_move(grab_at));
    s.pointer_move(Point::new(rect.x0 + rect.width() * 0.3, rect.y0 + rect.height() * 0.1));
    let c = s.crop().unwrap();
    assert!(close(c.x, 30.0));
    assert!(close(c.y, 10.0));
    assert_eq!((c.width, c.height), (60.0, 60.0));
}

#[test]
fn leaving_crop_mode_discards_crop() {
    let mut s = editing();
    s.toggle_crop();
    assert!(s.crop().is_some());
    s.toggle_crop();
    assert!(s.crop().is_none());
    assert!(!s.crop_mode());
}

#[test]
fn reset_is_idempotent_regardless_of_history() {
    let mut s = editing();
    s.begin_move(Point::new(20.0, 20.0));
    s.pointer_move(Point::new(300.0, 200.0));
    s.pointer_up();
    s.begin_resize(Handle::Se);
    s.pointer_move(Point::new(700.0, 400.0));
    s.pointer_up();
    s.toggle_crop();

    s.reset();
    assert_eq!(s.placement(), s.default_placement());
    assert!(s.crop().is_none());
    assert!(s.is_editing());
    assert!(!s.crop_mode());

    s.reset();
    let fresh = session_for((1000.0, 500.0));
    assert_eq!(s.placement(), fresh.placement());
}

#[test]
fn save_only_when_changed() {
    let mut s = editing();
    assert_eq!(s.save(), None);
    assert!(s.is_editing());

    s.begin_move(Point::new(20.0, 20.0));
    s.pointer_move(Point::new(60.0, 40.0));
    s.pointer_up();
    assert!(s.has_unsaved_changes());

    let saved = s.save().unwrap();
    assert_eq!(s.state(), SessionState::Saved);
    assert_eq!(saved.placement, s.placement());
    assert_eq!(saved.container, s.container());
    assert!(!s.has_unsaved_changes());

    // saving again without changes does nothing
    s.start_editing();
    assert_eq!(s.save(), None);
}

#[test]
fn save_carries_crop() {
    let mut s = editing();
    s.toggle_crop();
    let saved = s.save().unwrap();
    assert_eq!(saved.crop, Some(CropRegion::new(20.0, 20.0, 60.0, 60.0).unwrap()));
    assert!(!s.crop_mode());
}

#[test]
fn non_finite_pointers_are_ignored() {
    let mut s = editing();
    assert!(!s.begin_move(Point::new(f64::NAN, 1.0)));
    assert!(s.begin_move(Point::new(20.0, 20.0)));
    assert!(!s.pointer_move(Point::new(f64::INFINITY, 1.0)));
    assert_eq!(s.placement(), s.default_placement());
}

#[test]
fn resume_rebases_saved_layout() {
    let settings = Settings::default();
    let container = settings.editor.container().unwrap();
    let default_placement = session_for((1000.0, 500.0)).default_placement();

    let saved = SavedLayout {
        placement: Placement::new(40.0, 20.0, 50.0, 50.0).unwrap(),
        container: ContainerContext::new(400.0, 225.0).unwrap(),
        crop: Some(CropRegion::new(0.0, 0.0, 50.0, 50.0).unwrap()),
    };
    let s = EditorSession::resume(default_placement, &saved, container, settings.editor).unwrap();
    assert_eq!(s.placement().position.x_px, 80.0);
    assert_eq!(s.placement().position.y_px, 40.0);
    assert!(close(s.placement().size.width_pct, 50.0));
    assert_eq!(s.crop(), saved.crop);
    assert!(!s.has_unsaved_changes());
    assert_eq!(s.default_placement(), default_placement);
}

#[test]
fn stop_editing_keeps_values_and_ends_gesture() {
    let mut s = editing();
    s.begin_move(Point::new(20.0, 20.0));
    s.pointer_move(Point::new(40.0, 40.0));
    s.stop_editing();
    assert_eq!(s.state(), SessionState::Viewing);
    assert_eq!(s.active_gesture(), None);
    assert_ne!(s.placement(), s.default_placement());
}

#[test]
fn resize_of_region_left_of_container_stays_valid_for_crop() {
    let container = ContainerContext::new(800.0, 450.0).unwrap();
    let start = Placement::new(-100.0, 10.0, 10.0, 20.0).unwrap();
    let mut s = EditorSession::new(start, None, container, Settings::default().editor).unwrap();
    s.start_editing();

    assert!(s.begin_resize(Handle::Nw));
    assert!(s.pointer_move(Point::new(5.0, 5.0)));
    s.pointer_up();
    let p = s.placement();
    assert!(p.validate().is_ok(), "{p:?}");
    assert_eq!(p.position.x_px, 0.0);
    assert!(close(p.width_px(container), 50.0));
    assert!(close(p.height_px(container), 95.0));

    // crop gestures divide by the region size
    assert!(s.toggle_crop());
    assert!(s.begin_crop_move(Point::new(20.0, 40.0)));
    s.pointer_move(Point::new(45.0, 90.0));
    s.pointer_up();
    let crop = s.crop().unwrap();
    assert!(crop.is_contained(), "{crop:?}");
    assert!(crop.x.is_finite() && crop.y.is_finite());
}

#[test]
fn resize_from_off_container_starts_never_breaks_placement() {
    let container = ContainerContext::new(800.0, 450.0).unwrap();
    let starts = [
        (-100.0, 10.0, 10.0, 20.0),
        (-2000.0, -2000.0, 5.0, 5.0),
        (900.0, 600.0, 10.0, 10.0),
        (-50.0, -50.0, 150.0, 150.0),
    ];
    let pointers = [
        Point::new(5.0, 5.0),
        Point::new(-1e5, -1e5),
        Point::new(1e5, 1e5),
        Point::new(400.0, 225.0),
    ];
    for (x, y, w, h) in starts {
        for handle in Handle::ALL {
            let start = Placement::new(x, y, w, h).unwrap();
            let mut s =
                EditorSession::new(start, None, container, Settings::default().editor).unwrap();
            s.start_editing();
            assert!(s.begin_resize(handle));
            for p in pointers {
                s.pointer_move(p);
                let placement = s.placement();
                assert!(placement.validate().is_ok(), "{handle:?} {p:?} {placement:?}");
                assert!(placement.width_px(container) >= 50.0 - 1e-9);
                assert!(placement.height_px(container) >= 50.0 - 1e-9);
            }
        }
    }
}
