use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn percent_round_trip_on_container_dims() {
    assert!(close(pixels_to_percent(560.0, 800.0), 70.0));
    assert!(close(percent_to_pixels(70.0, 800.0), 560.0));
    assert!(close(pixels_to_percent(280.0, 450.0), 62.222_222_222_222_22));
    for v in [0.0, 1.0, 33.3, 449.0] {
        assert!(close(percent_to_pixels(pixels_to_percent(v, 450.0), 450.0), v));
    }
}

#[test]
fn inches_use_the_given_density() {
    assert!(close(pixels_to_inches(16.0, PX_PER_INCH), 1.0 / 6.0));
    assert!(close(inches_to_pixels(10.0, PX_PER_INCH), 960.0));
}

#[test]
fn aspect_fit_width_first_then_height() {
    // wide source, width wins
    let s = scale_aspect_fit(1000.0, 500.0, 560.0, 360.0);
    assert!(close(s.width, 560.0) && close(s.height, 280.0));

    // tall source, height overflows and wins
    let s = scale_aspect_fit(300.0, 500.0, 560.0, 360.0);
    assert!(close(s.height, 360.0) && close(s.width, 216.0));
}

#[test]
fn aspect_fit_preserves_ratio_and_is_tight() {
    let naturals = [(1.0, 1.0), (1920.0, 1080.0), (37.0, 911.0), (4000.0, 3.0), (640.0, 480.0)];
    let boxes = [(560.0, 360.0), (100.0, 100.0), (7.0, 6.0), (1000.0, 10.0)];
    for &(w, h) in &naturals {
        for &(mw, mh) in &boxes {
            let s = scale_aspect_fit(w, h, mw, mh);
            assert!(((s.width / s.height) - (w / h)).abs() < 1e-9 * (w / h).max(1.0));
            assert!(s.width <= mw + 1e-9, "{w}x{h} in {mw}x{mh}: {s:?}");
            assert!(s.height <= mh + 1e-9, "{w}x{h} in {mw}x{mh}: {s:?}");
            assert!(close(s.width, mw) || close(s.height, mh));
        }
    }
}
