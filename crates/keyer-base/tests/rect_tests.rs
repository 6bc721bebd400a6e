use keyer_base::{Rect, Vec2};

#[test]
fn test_from_xyxy_round_trip() {
    let r = Rect::from_xyxy([1.0_f32, 2.0, 4.0, 6.0]);
    assert_eq!(r.origin, Vec2::new(1.0, 2.0));
    assert_eq!(r.size, Vec2::new(3.0, 4.0));
    assert_eq!(r.to_xyxy(), [1.0, 2.0, 4.0, 6.0]);
}

#[test]
fn test_center() {
    let r = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(10.0, 6.0));
    let c = r.center();
    assert!((c.x - 5.0).abs() < 1e-6);
    assert!((c.y - 3.0).abs() < 1e-6);
}

#[test]
fn test_scale_about_center_keeps_center() {
    let r = Rect::from_xyxy([10.0_f32, 20.0, 30.0, 60.0]);
    let grown = r.scale_about_center(1.5);
    let [x0, y0, x1, y1] = grown.to_xyxy();
    assert!((x0 - 5.0).abs() < 1e-4);
    assert!((y0 - 10.0).abs() < 1e-4);
    assert!((x1 - 35.0).abs() < 1e-4);
    assert!((y1 - 70.0).abs() < 1e-4);
}

#[test]
fn test_scale_about_center_degenerate_box() {
    let r = Rect::from_xyxy([3.0_f32, 3.0, 3.0, 3.0]);
    let grown = r.scale_about_center(2.0);
    assert_eq!(grown.to_xyxy(), [3.0, 3.0, 3.0, 3.0]);
}
