use remi3ds::IndexedFrame;

fn source_8x8() -> Vec<u8> {
    // Distinct values so shifted copies are detectable.
    (0..64).map(|v| v as u8 + 100).collect()
}

// In-bounds blits copy the rectangle byte for byte.
#[test]
fn test_blit_inside_bounds_copies_exactly() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(2, 2, 4, 4, &src, 8);

    for y in 0..8 {
        for x in 0..8 {
            let expected = if (2..6).contains(&x) && (2..6).contains(&y) {
                src[x + y * 8]
            } else {
                0
            };
            assert_eq!(frame.index_at(x, y), expected, "mismatch at ({}, {})", x, y);
        }
    }
}

// A negative origin is clamped to zero without shifting the source read
// offset: the addresses written still satisfy addr = (y+j)*pitch + (x+i)
// with the clamped origin, so the visible content shifts by the clamp
// amount. This mirrors what interpreter drawing code expects.
#[test]
fn test_blit_negative_origin_clamps_origin_only() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(-2, -3, 4, 4, &src, 8);

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(frame.index_at(x, y), src[x + y * 8]);
        }
    }
    assert_eq!(frame.index_at(4, 0), 0);
    assert_eq!(frame.index_at(0, 4), 0);
}

// Rectangles sticking out past the bottom-right edge are truncated, and the
// truncated blit never touches anything outside the clipped region.
#[test]
fn test_blit_overflowing_rect_is_truncated() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(6, 6, 4, 4, &src, 8);

    for y in 0..8 {
        for x in 0..8 {
            let expected = if x >= 6 && y >= 6 { src[x + y * 8] } else { 0 };
            assert_eq!(frame.index_at(x, y), expected);
        }
    }
}

// An origin fully outside the buffer is a no-op.
#[test]
fn test_blit_origin_outside_is_noop() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(8, 0, 4, 4, &src, 8);
    frame.blit(0, 8, 4, 4, &src, 8);
    frame.blit(100, 100, 4, 4, &src, 8);
    assert!(frame.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_blit_degenerate_rect_is_noop() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(2, 2, 0, 4, &src, 8);
    frame.blit(2, 2, 4, 0, &src, 8);
    frame.blit(2, 2, -4, -4, &src, 8);
    assert!(frame.as_bytes().iter().all(|&b| b == 0));
}

// Full-frame blit, the common path every presented frame takes.
#[test]
fn test_blit_full_frame() {
    let mut frame = IndexedFrame::new(8, 8);
    let src = source_8x8();
    frame.blit(0, 0, 8, 8, &src, 8);
    assert_eq!(frame.as_bytes(), &src[..]);
}
