#[allow(dead_code)]
mod common;

use tcomb_core::error::TcombError;
use tcomb_core::fields::{
    field_format, separate_fields, weave_fields, FieldOrder, FieldSource,
};
use tcomb_core::frame::{ChromaSampling, FieldParity};
use tcomb_core::source::{FrameSource, MemorySource};

#[test]
fn test_separate_then_weave_is_identity() {
    for sampling in [
        ChromaSampling::Mono,
        ChromaSampling::Cs420,
        ChromaSampling::Cs422,
        ChromaSampling::Cs444,
    ] {
        let format = common::format(8, 8, sampling);
        let frame = common::frame_from_fn(&format, common::texture);
        for first in [FieldParity::Top, FieldParity::Bottom] {
            let [a, b] = separate_fields(&frame, first);
            let woven = weave_fields(&a, &b, first).unwrap();
            assert_eq!(woven.planes, frame.planes, "{sampling} {first:?}");
        }
    }
}

#[test]
fn test_top_field_holds_even_rows() {
    let format = common::format(4, 4, ChromaSampling::Mono);
    let frame = common::frame_from_fn(&format, |_, r, _| r as u8);
    let [first, second] = separate_fields(&frame, FieldParity::Top);
    assert!(first.plane(0).iter().all(|&v| v % 2 == 0));
    assert!(second.plane(0).iter().all(|&v| v % 2 == 1));
    assert_eq!(first.metadata.parity, Some(FieldParity::Top));

    let [first, _] = separate_fields(&frame, FieldParity::Bottom);
    assert_eq!(first.plane(0)[[0, 0]], 1);
}

#[test]
fn test_weave_rejects_mismatched_fields() {
    let a = common::mono_frame(common::flat_plane(2, 4, 0));
    let b = common::mono_frame(common::flat_plane(3, 4, 0));
    assert!(matches!(
        weave_fields(&a, &b, FieldParity::Top),
        Err(TcombError::FormatMismatch(_))
    ));
}

#[test]
fn test_field_format_requires_even_chroma_rows() {
    let ok = field_format(&common::format(8, 8, ChromaSampling::Cs420)).unwrap();
    assert_eq!((ok.width, ok.height), (8, 4));
    assert_eq!(ok.plane_dim(1), (2, 4));

    // 4:2:0 with 6 rows has 3 chroma rows.
    assert!(matches!(
        field_format(&common::format(8, 6, ChromaSampling::Cs420)),
        Err(TcombError::InvalidDimensions { .. })
    ));
    assert!(field_format(&common::format(8, 6, ChromaSampling::Cs422)).is_ok());
    assert!(field_format(&common::format(8, 5, ChromaSampling::Mono)).is_err());
}

#[test]
fn test_auto_order_uses_source_hint() {
    assert_eq!(FieldOrder::Auto.first_parity(None), FieldParity::Top);
    assert_eq!(
        FieldOrder::Auto.first_parity(Some(FieldOrder::BottomFieldFirst)),
        FieldParity::Bottom
    );
    assert_eq!(
        FieldOrder::TopFieldFirst.first_parity(Some(FieldOrder::BottomFieldFirst)),
        FieldParity::Top
    );
}

#[test]
fn test_field_source_interleaves_fields_in_time() {
    let format = common::format(4, 4, ChromaSampling::Mono);
    let frames = common::sequence(&format, 3, |i, _, r, _| (i * 10 + r) as u8);
    let inner = MemorySource::new(frames).unwrap();
    let fields = FieldSource::new(inner, FieldOrder::BottomFieldFirst).unwrap();

    assert_eq!(fields.len(), 6);
    assert_eq!(fields.format().height, 2);
    // Field 2 is the bottom field of frame 1 (rows 1 and 3).
    let f2 = fields.frame(2).unwrap();
    assert_eq!(f2.plane(0)[[0, 0]], 11);
    assert_eq!(f2.plane(0)[[1, 0]], 13);
    assert_eq!(f2.metadata.frame_index, 2);
    // Field 3 is its top field.
    assert_eq!(fields.frame(3).unwrap().plane(0)[[0, 0]], 10);
    assert!(fields.frame(6).is_err());
}
