use keyer::scores_to_probs;
use keyer_base::Tensor;

fn wavy_stack(c: usize, h: usize, w: usize) -> Tensor<f32> {
    Tensor::from_fn(vec![c, h, w], |i| ((i as f32) * 0.37).sin() * 6.0 + (i % 5) as f32).unwrap()
}

#[test]
fn test_each_channel_sums_to_one() {
    let probs = scores_to_probs(&wavy_stack(3, 5, 7)).unwrap();
    assert_eq!(probs.shape, vec![3, 5, 7]);
    for c in 0..3 {
        let sum: f32 = probs.slice(c).unwrap().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "channel {c} sums to {sum}");
    }
}

#[test]
fn test_probabilities_in_unit_interval() {
    let probs = scores_to_probs(&wavy_stack(2, 6, 6)).unwrap();
    assert!(probs.data.iter().all(|&p| (0.0..=1.0).contains(&p)));
}

#[test]
fn test_channels_are_independent() {
    let mut stack = wavy_stack(2, 3, 3);
    let before = scores_to_probs(&stack).unwrap();
    // Shifting channel 1 must not change channel 0
    for v in &mut stack.data[9..] {
        *v += 50.0;
    }
    let after = scores_to_probs(&stack).unwrap();
    assert_eq!(before.slice(0).unwrap(), after.slice(0).unwrap());
}

#[test]
fn test_softmax_is_shift_invariant() {
    let stack = wavy_stack(1, 4, 4);
    let shifted = stack.map(|&v| v - 1000.0);
    let a = scores_to_probs(&stack).unwrap();
    let b = scores_to_probs(&shifted).unwrap();
    for (x, y) in a.data.iter().zip(b.data.iter()) {
        assert!((x - y).abs() < 1e-4);
    }
}

#[test]
fn test_rejects_wrong_rank() {
    let flat = Tensor::new(vec![4, 4], vec![0.0; 16]).unwrap();
    assert!(scores_to_probs(&flat).is_err());
}
