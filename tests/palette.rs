use remi3ds::{Color, Palette, PALETTE_SIZE};
use test_case::test_case;

// Round-trip law for the 6 -> 8 bit channel expansion: the stored value is
// the 6-bit input shifted up with its low bits replicated.
#[test_case(0x00, 0x00; "black")]
#[test_case(0x01, 0x05; "one")]
#[test_case(0x15, 0x55; "mid low")]
#[test_case(0x2a, 0xaa; "mid high")]
#[test_case(0x3e, 0xfa; "near max")]
#[test_case(0x3f, 0xff; "max maps to full intensity")]
fn test_six_bit_expansion(c: u8, expected: u8) {
    let mut palette = Palette::new();
    palette.set_entry(7, Color { r: c, g: c, b: c });
    let stored = palette.entry(7);
    assert_eq!(stored, Color { r: expected, g: expected, b: expected });
    assert_eq!(stored.r, (c << 2) | (c & 3));
}

#[test]
fn test_expansion_per_channel() {
    let mut palette = Palette::new();
    palette.set_entry(0, Color { r: 0x3f, g: 0x10, b: 0x01 });
    assert_eq!(palette.entry(0), Color { r: 0xff, g: 0x40, b: 0x05 });
}

// Bulk writes are already 8-bit and must come back verbatim, no expansion.
#[test]
fn test_set_range_is_verbatim() {
    let mut palette = Palette::new();
    let colors: Vec<u8> = (0u8..30).collect();
    palette.set_range(&colors, 10);
    for i in 0..10 {
        let c = palette.entry(i);
        assert_eq!(c.r, (i * 3) as u8);
        assert_eq!(c.g, (i * 3 + 1) as u8);
        assert_eq!(c.b, (i * 3 + 2) as u8);
    }
    // Untouched entries stay black.
    assert_eq!(palette.entry(10), Color::default());
}

#[test]
fn test_set_range_full_capacity() {
    let mut palette = Palette::new();
    let colors = vec![0x42u8; PALETTE_SIZE * 3];
    palette.set_range(&colors, PALETTE_SIZE);
    assert_eq!(palette.entry(PALETTE_SIZE - 1).g, 0x42);
}

#[test]
fn test_set_range_leaves_tail_entries() {
    let mut palette = Palette::new();
    palette.set_entry(200, Color { r: 0x3f, g: 0x3f, b: 0x3f });
    palette.set_range(&[1, 2, 3], 1);
    assert_eq!(palette.entry(0), Color { r: 1, g: 2, b: 3 });
    assert_eq!(palette.entry(200), Color { r: 0xff, g: 0xff, b: 0xff });
}
