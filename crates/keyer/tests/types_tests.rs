use keyer::{DecodedKeypoint, KeypointChannel, KeypointRecord, PastedMask};
use keyer_base::Tensor;

fn record() -> KeypointRecord {
    KeypointRecord {
        keypoints: vec![
            DecodedKeypoint { x: 1.0, y: 2.0, score: 3.0, probability: 0.5 },
            DecodedKeypoint { x: 4.0, y: 5.0, score: 6.0, probability: 0.25 },
        ],
    }
}

#[test]
fn test_channels_enumerate_in_order() {
    let channels: Vec<usize> = KeypointChannel::all(4).map(usize::from).collect();
    assert_eq!(channels, vec![0, 1, 2, 3]);
}

#[test]
fn test_keypoint_lookup_by_channel() {
    let r = record();
    assert_eq!(r.num_keypoints(), 2);
    assert_eq!(r.keypoint(KeypointChannel::new(1)).unwrap().score, 6.0);
    assert!(r.keypoint(KeypointChannel::new(2)).is_none());
}

#[test]
fn test_to_tensor_rows() {
    let t = record().to_tensor().unwrap();
    assert_eq!(t.shape, vec![4, 2]);
    assert_eq!(t.data, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0, 0.5, 0.25]);
}

#[test]
fn test_position_accessor() {
    let kp = record().keypoints[1];
    let p = kp.position();
    assert_eq!((p.x, p.y), (4.0, 5.0));
}

#[test]
fn test_pasted_mask_bytes() {
    let mask = PastedMask::Binary(Tensor::new(vec![1, 3], vec![true, false, true]).unwrap());
    assert_eq!((mask.height(), mask.width()), (1, 3));
    assert_eq!(mask.to_bytes().data, vec![1, 0, 1]);
}
