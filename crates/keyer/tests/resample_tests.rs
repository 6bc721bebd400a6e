use keyer::{resize_bicubic, resize_bilinear, RegionTarget};
use keyer_base::{Rect, Tensor};

#[test]
fn test_bicubic_same_size_is_identity() {
    let stack = Tensor::from_fn(vec![2, 4, 4], |i| (i * 7 % 11) as f32).unwrap();
    let out = resize_bicubic(&stack, 4, 4).unwrap();
    assert_eq!(out, stack);
}

#[test]
fn test_bicubic_preserves_constant_map() {
    let stack = Tensor::new(vec![1, 3, 3], vec![2.5; 9]).unwrap();
    let out = resize_bicubic(&stack, 7, 5).unwrap();
    assert_eq!(out.shape, vec![1, 7, 5]);
    for v in out.data {
        assert!((v - 2.5).abs() < 1e-5);
    }
}

#[test]
fn test_bicubic_upsample_keeps_spike_near_source() {
    let mut data = vec![0.0; 16];
    data[4 + 2] = 10.0; // row 1, col 2
    let stack = Tensor::new(vec![1, 4, 4], data).unwrap();
    let out = resize_bicubic(&stack, 8, 8).unwrap();

    let (pos, _) = out
        .data
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    let (x, y) = (pos % 8, pos / 8);
    assert!(x == 4 || x == 5, "x={x}");
    assert!(y == 2 || y == 3, "y={y}");
}

#[test]
fn test_bilinear_preserves_constant_map() {
    let plane = Tensor::new(vec![2, 2], vec![0.75; 4]).unwrap();
    let out = resize_bilinear(&plane, 5, 3).unwrap();
    assert_eq!(out.shape, vec![5, 3]);
    for v in out.data {
        assert!((v - 0.75).abs() < 1e-6);
    }
}

#[test]
fn test_bilinear_interpolates_between_centres() {
    let plane = Tensor::new(vec![1, 2], vec![0.0, 1.0]).unwrap();
    let out = resize_bilinear(&plane, 1, 4).unwrap();
    // src x = -0.25 (snapped), 0.25, 0.75, 1.25 (past last centre)
    let expected = [0.0, 0.25, 0.75, 1.0];
    for (v, e) in out.data.iter().zip(expected) {
        assert!((v - e).abs() < 1e-6, "{v} vs {e}");
    }
}

#[test]
fn test_resize_rejects_empty_target() {
    let plane = Tensor::new(vec![2, 2], vec![0.0; 4]).unwrap();
    assert!(resize_bilinear(&plane, 0, 3).is_err());
}

#[test]
fn test_region_target_ceils_and_keeps_real_extent() {
    let target = RegionTarget::for_region(&Rect::from_xyxy([0.0, 0.0, 7.5, 3.25]), 0);
    assert_eq!((target.width, target.height), (8, 4));
    assert!((target.width_correction - 0.9375).abs() < 1e-6);
    assert!((target.height_correction - 0.8125).abs() < 1e-6);
}

#[test]
fn test_region_target_clamps_small_extent() {
    let target = RegionTarget::for_region(&Rect::from_xyxy([3.0, 3.0, 3.2, 3.0]), 0);
    assert_eq!((target.width, target.height), (1, 1));
    assert_eq!(target.width_correction, 1.0);
    assert_eq!(target.height_correction, 1.0);
}

#[test]
fn test_region_target_min_size_floor() {
    let target = RegionTarget::for_region(&Rect::from_xyxy([0.0, 0.0, 2.0, 6.0]), 4);
    assert_eq!((target.width, target.height), (4, 6));
    assert_eq!(target.width_correction, 0.5);
    assert_eq!(target.height_correction, 1.0);
}
