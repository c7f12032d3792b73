use std::sync::Arc;

use ndarray::Array2;
use tcomb_core::error::TcombError;
use tcomb_core::frame::PlaneRasters;
use tcomb_core::pipeline::{Attribute, AttributeKind, AttributeStore};

fn raster(value: u8) -> Arc<PlaneRasters> {
    Arc::new(PlaneRasters::new(vec![Array2::from_elem((2, 4), value)]))
}

#[test]
fn test_fetch_before_publish_is_an_error() {
    let store = AttributeStore::new();
    match store.fetch(7, AttributeKind::FinalMask) {
        Err(TcombError::AttributeNotReady { index, kind }) => {
            assert_eq!(index, 7);
            assert_eq!(kind, AttributeKind::FinalMask);
        }
        other => panic!("expected AttributeNotReady, got {other:?}"),
    }
}

#[test]
fn test_publish_and_typed_fetch() {
    let store = AttributeStore::new();
    assert!(store.publish(3, Attribute::SceneChange(true)));
    assert!(store.publish(3, Attribute::Average(raster(9))));
    assert!(store.scene_change(3).unwrap());
    assert_eq!(store.average(3).unwrap().slot(0)[[0, 0]], 9);
    assert!(store.contains(3, AttributeKind::Average));
    assert!(!store.contains(3, AttributeKind::MotionMask));
    assert!(store.motion_mask(3).is_err());
    assert_eq!(store.len(), 2);
}

#[test]
fn test_publish_keeps_first_value() {
    let store = AttributeStore::new();
    assert!(store.publish(0, Attribute::OscillationMask(raster(1))));
    assert!(!store.publish(0, Attribute::OscillationMask(raster(2))));
    assert_eq!(store.oscillation_mask(0).unwrap().slot(0)[[0, 0]], 1);
}

#[test]
fn test_evict_only_touches_one_kind() {
    let store = AttributeStore::new();
    for i in 0..10 {
        store.publish(i, Attribute::SceneChange(false));
        store.publish(i, Attribute::FinalMask(raster(0)));
    }
    assert_eq!(store.evict(AttributeKind::FinalMask, 6), 6);
    assert_eq!(store.count(AttributeKind::FinalMask), 4);
    assert_eq!(store.first_index(AttributeKind::FinalMask), Some(6));
    assert_eq!(store.count(AttributeKind::SceneChange), 10);
    assert_eq!(store.evict(AttributeKind::FinalMask, 6), 0);
}

#[test]
fn test_attribute_kind_display() {
    assert_eq!(AttributeKind::OscillationMask.to_string(), "oscillation mask");
    let err = TcombError::AttributeNotReady {
        index: 4,
        kind: AttributeKind::BlurPyramid,
    };
    assert_eq!(
        err.to_string(),
        "Attribute blur pyramid for frame 4 requested before it was produced"
    );
}
