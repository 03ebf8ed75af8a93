use log::*;

/// Number of palette slots the interpreter may address.
///
/// 256 game colors plus one extra slot the interpreter uses for text overlays.
pub const PALETTE_SIZE: usize = 257;

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The palette store.
///
/// Holds up to [PALETTE_SIZE] colors, always 8 bits per channel internally.
/// Single-entry writes come from the interpreter as 6-bit VGA style channels
/// and are widened on the way in; bulk writes are already 8-bit and are
/// copied verbatim.
#[derive(Clone)]
pub struct Palette {
    entries: [Color; PALETTE_SIZE],
}

// Widen a 6-bit channel to 8 bits.
// Replicating the low bits instead of shifting keeps 0x3F mapping to 0xFF
// rather than 0xFC.
fn expand_6_to_8(c: u8) -> u8 {
    ((c & 0x3f) << 2) | (c & 3)
}

impl Palette {
    /// Create a palette with every entry set to black.
    pub fn new() -> Palette {
        Palette {
            entries: [Color::default(); PALETTE_SIZE],
        }
    }

    /// Copy `n` 8-bit RGB triples from `pal` into entries `0..n`.
    ///
    /// `n` beyond [PALETTE_SIZE], or a buffer shorter than `n * 3` bytes, is
    /// a caller bug; the copy is truncated to what fits.
    pub fn set_range(&mut self, pal: &[u8], n: usize) {
        debug_assert!(n <= PALETTE_SIZE, "invalid palette count: {}", n);
        debug_assert!(pal.len() >= n * 3, "palette buffer too short for {} entries", n);
        let n = n.min(PALETTE_SIZE).min(pal.len() / 3);
        for (entry, rgb) in self.entries[..n].iter_mut().zip(pal.chunks_exact(3)) {
            *entry = Color {
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
            };
        }
    }

    /// Set a single entry from a 6-bit-per-channel color.
    pub fn set_entry(&mut self, i: usize, c: Color) {
        debug_assert!(i < PALETTE_SIZE, "invalid palette index: {}", i);
        match self.entries.get_mut(i) {
            Some(entry) => {
                *entry = Color {
                    r: expand_6_to_8(c.r),
                    g: expand_6_to_8(c.g),
                    b: expand_6_to_8(c.b),
                }
            }
            None => warn!("Ignoring out of range palette write at {}", i),
        }
    }

    /// Get an entry as stored, 8 bits per channel.
    pub fn entry(&self, i: usize) -> Color {
        debug_assert!(i < PALETTE_SIZE, "invalid palette index: {}", i);
        self.entries.get(i).copied().unwrap_or_default()
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::new()
    }
}
