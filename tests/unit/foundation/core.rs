use super::*;

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(2)).is_err());
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(r.len_frames(), 3);
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(
        r.frames().collect::<Vec<_>>(),
        vec![FrameIndex(2), FrameIndex(3), FrameIndex(4)]
    );
}

#[test]
fn grow_clipped_stays_inside_canvas() {
    let canvas = Canvas {
        width: 20,
        height: 10,
    }
    .rect();
    let r = Rect::new(1, 2, 4, 3).grow_clipped(3, canvas);
    assert_eq!(r, Rect::new(0, 0, 8, 8));

    let edge = Rect::new(18, 8, 2, 2).grow_clipped(5, canvas);
    assert_eq!(edge, Rect::new(13, 3, 7, 7));
    assert!(canvas.contains_rect(edge));
}

#[test]
fn grow_clipped_keeps_empty_rect_empty() {
    let canvas = Rect::new(0, 0, 10, 10);
    assert!(Rect::new(4, 4, 0, 0).grow_clipped(3, canvas).is_empty());
}

#[test]
fn mask_rejects_ragged_length() {
    assert!(OpacityMask::new(3, vec![0; 7]).is_err());
    assert!(OpacityMask::new(0, vec![0; 2]).is_err());
    assert!(OpacityMask::new(0, Vec::new()).is_ok());
    let m = OpacityMask::new(3, vec![0; 6]).unwrap();
    assert_eq!(m.height(), 2);
}

#[test]
fn embed_pads_with_transparency() {
    let m = OpacityMask::new(2, vec![0xFF, 0x00, 0x00, 0xFF]).unwrap();
    let out = m
        .embed(Rect::new(3, 3, 2, 2), Rect::new(2, 2, 4, 4))
        .unwrap();
    assert_eq!(out.width(), 4);
    assert_eq!(out.height(), 4);
    assert_eq!(out.opaque_count(), 2);
    assert!(out.is_opaque(1, 1));
    assert!(out.is_opaque(2, 2));
    assert!(!out.is_opaque(2, 1));
}

#[test]
fn embed_rejects_rect_outside_target() {
    let m = OpacityMask::transparent(2, 2);
    assert!(m.embed(Rect::new(0, 0, 2, 2), Rect::new(1, 1, 4, 4)).is_err());
}
