/// The off-screen indexed framebuffer the interpreter draws into.
///
/// One byte per pixel, each byte a palette index. The interpreter only ever
/// mutates it through [IndexedFrame::blit]; the compositor reads it when
/// presenting a frame.
pub struct IndexedFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl IndexedFrame {
    pub fn new(width: usize, height: usize) -> IndexedFrame {
        IndexedFrame {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }

    /// Palette index at (x, y). Out of range reads index 0.
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.data.get(x + y * self.width).copied().unwrap_or(0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy a rectangle from `buf` (row stride `pitch`) into the frame.
    ///
    /// Never fails: an origin past the bottom-right corner is a no-op, a
    /// negative origin is clamped to zero, and width/height are truncated at
    /// the frame edges. Both the source read and the destination write use
    /// the address `(y + j) * pitch + (x + i)`; with a negative origin the
    /// clamp therefore shifts which part of `buf` lands in the frame rather
    /// than anchoring the rectangle's top-left sample. Interpreter drawing
    /// code depends on this addressing, so it is kept bit for bit.
    pub fn blit(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[u8], pitch: usize) {
        if x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let x = x.max(0);
        let y = y.max(0);
        let w = w.min(self.width as i32 - x);
        let h = h.min(self.height as i32 - y);
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);

        for j in 0..h {
            let row = (y + j) * pitch;
            for i in 0..w {
                let addr = row + x + i;
                debug_assert!(
                    addr < self.data.len(),
                    "blit address {} past framebuffer end",
                    addr
                );
                match (self.data.get_mut(addr), buf.get(addr)) {
                    (Some(dst), Some(&src)) => *dst = src,
                    _ => {}
                }
            }
        }
    }
}
