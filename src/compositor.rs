use crate::{IndexedFrame, Palette};

/// Pack an 8-bit RGB color into the display's 16-bit 5-6-5 layout.
pub fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// How the logical frame is mapped onto the physical screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// 1:1 pixels, centered on the screen.
    Centered,
    /// Stretched to the whole screen through the precomputed lookup table.
    Scaled,
}

/// Maps the logical indexed frame onto the physical framebuffer.
///
/// The physical framebuffer is mounted 90° rotated: consecutive memory
/// addresses run along the logical y axis, and the logical x axis advances
/// by `fb_width` per pixel. Both presentation modes bake that rotation into
/// their addressing instead of transforming per pixel.
pub struct Compositor {
    fb_width: usize,
    fb_height: usize,
    /// Physical pixel -> logical frame offset, for scaled mode.
    /// Built once; per-frame trig or division would be too slow here.
    scale_lut: Vec<usize>,
    mode: DisplayMode,
}

impl Compositor {
    /// Build a compositor for a `frame_w` x `frame_h` logical frame on a
    /// `fb_width` x `fb_height` physical framebuffer.
    ///
    /// Fails if the logical frame does not fit the rotated screen; the
    /// backend cannot run without a valid mapping.
    pub fn new(
        fb_width: usize,
        fb_height: usize,
        frame_w: usize,
        frame_h: usize,
    ) -> Result<Compositor, String> {
        if fb_width == 0 || fb_height == 0 {
            return Err(format!(
                "Invalid physical framebuffer size {}x{}",
                fb_width, fb_height
            ));
        }
        if frame_w >= fb_height || frame_h >= fb_width {
            return Err(format!(
                "Logical frame {}x{} does not fit the {}x{} rotated framebuffer",
                frame_w, frame_h, fb_width, fb_height
            ));
        }

        let mut scale_lut = vec![0; fb_width * fb_height];
        let delta_y = fb_width - frame_h;
        for j in 0..fb_width {
            for i in 0..fb_height {
                let mut y = (j as f32 / fb_width as f32 * frame_h as f32) as usize;
                if y >= frame_h {
                    y = frame_h - 1;
                }
                let mut x = (i as f32 / fb_height as f32 * frame_w as f32) as usize;
                if x >= frame_w {
                    x = frame_w - 1;
                }

                let lut_addr = (frame_h + delta_y - j) + i * fb_width;
                // The j == 0 column computes one slot past the table for the
                // last physical row; skip it.
                if let Some(slot) = scale_lut.get_mut(lut_addr) {
                    *slot = x + y * frame_w;
                }
            }
        }

        Ok(Compositor {
            fb_width,
            fb_height,
            scale_lut,
            mode: DisplayMode::Centered,
        })
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Fill `out` (the physical framebuffer) from the frame and palette,
    /// according to the current mode.
    pub fn present(&self, frame: &IndexedFrame, palette: &Palette, out: &mut [u16]) {
        match self.mode {
            DisplayMode::Centered => self.present_centered(frame, palette, out),
            DisplayMode::Scaled => self.present_scaled(frame, palette, out),
        }
    }

    fn present_centered(&self, frame: &IndexedFrame, palette: &Palette, out: &mut [u16]) {
        let start_x = self.fb_height / 2 - frame.width() / 2;
        let start_y = self.fb_width / 2 - frame.height() / 2;

        for j in 0..frame.height() {
            for i in 0..frame.width() {
                let c = palette.entry(frame.index_at(i, j) as usize);
                let addr = (frame.height() - j + start_y) + (i + start_x) * self.fb_width;
                if let Some(px) = out.get_mut(addr) {
                    *px = rgb565(c.r, c.g, c.b);
                }
            }
        }
    }

    fn present_scaled(&self, frame: &IndexedFrame, palette: &Palette, out: &mut [u16]) {
        let bytes = frame.as_bytes();
        for (px, &offset) in out.iter_mut().zip(self.scale_lut.iter()) {
            let index = bytes.get(offset).copied().unwrap_or(0);
            let c = palette.entry(index as usize);
            *px = rgb565(c.r, c.g, c.b);
        }
    }

    /// Physical destination address of logical pixel (i, j) in centered mode.
    ///
    /// Exposed so callers (and tests) can reason about placement without
    /// duplicating the rotation arithmetic.
    pub fn centered_address(&self, frame: &IndexedFrame, i: usize, j: usize) -> usize {
        let start_x = self.fb_height / 2 - frame.width() / 2;
        let start_y = self.fb_width / 2 - frame.height() / 2;
        (frame.height() - j + start_y) + (i + start_x) * self.fb_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_hex::assert_eq_hex;

    #[test]
    fn test_rgb565_layout() {
        assert_eq_hex!(rgb565(0xff, 0xff, 0xff), 0xffff);
        assert_eq_hex!(rgb565(0xff, 0, 0), 0xf800);
        assert_eq_hex!(rgb565(0, 0xff, 0), 0x07e0);
        assert_eq_hex!(rgb565(0, 0, 0xff), 0x001f);
    }

    #[test]
    fn test_frame_must_fit_rotated_screen() {
        assert!(Compositor::new(240, 400, 256, 224).is_ok());
        assert!(Compositor::new(240, 400, 512, 224).is_err());
        assert!(Compositor::new(240, 400, 256, 240).is_err());
        assert!(Compositor::new(0, 0, 256, 224).is_err());
    }
}
