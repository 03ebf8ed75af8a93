use std::path::PathBuf;
use std::sync::MutexGuard;

use log::*;

use crate::audio::{AudioCallback, AudioPipeline, SOUND_SAMPLE_RATE};
use crate::compositor::{Compositor, DisplayMode};
use crate::config::Options;
use crate::framebuffer::IndexedFrame;
use crate::hal::{Gfx, Hid, Platform};
use crate::input::{self, Button, PlayerInput};
use crate::options::OptionsSession;
use crate::palette::{Color, Palette};

/// Default options file, resolved against the working directory.
pub const OPTIONS_FILE: &str = "options.cfg";

/// The platform backend: the concrete realization of the interpreter-facing
/// presentation/input/audio contract for one hardware target.
///
/// Owns the palette, the off-screen indexed frame, the compositor, the
/// binding table and the audio pipeline; the interpreter drives it through
/// the methods below once per frame.
pub struct Backend<P: Platform> {
    platform: P,
    palette: Palette,
    frame: IndexedFrame,
    compositor: Compositor,
    audio: AudioPipeline,
    options: Options,
    options_path: PathBuf,
    /// The interpreter reads this snapshot after every [Backend::process_events].
    pub input: PlayerInput,
    paused: bool,
    overscan_color: u8,
    start_ticks: u64,
}

impl<P: Platform> Backend<P> {
    /// Bring the backend up for a `width` x `height` logical screen.
    ///
    /// `_title` is part of the contract but the console has no window title.
    /// Fails when the logical screen cannot be mapped onto the physical
    /// framebuffer; there is no degraded mode to fall back to.
    pub fn new(mut platform: P, _title: &str, width: usize, height: usize) -> Result<Self, String> {
        let start_ticks = platform.ticks();
        let (fb_width, fb_height) = platform.gfx().size();
        let compositor = Compositor::new(fb_width, fb_height, width, height)?;

        let options_path = PathBuf::from(OPTIONS_FILE);
        let mut backend = Backend {
            platform,
            palette: Palette::new(),
            frame: IndexedFrame::new(width, height),
            compositor,
            audio: AudioPipeline::new(),
            options: Options::load(&options_path),
            options_path,
            input: PlayerInput::default(),
            paused: false,
            overscan_color: 0,
            start_ticks,
        };
        backend.apply_display_mode();
        backend.clear_framebuffers();
        info!(
            "Backend up: {}x{} logical on {}x{} physical",
            width, height, fb_width, fb_height
        );
        Ok(backend)
    }

    /// Use a different options file (primarily for harnesses and tests).
    pub fn set_options_path(&mut self, path: PathBuf) {
        self.options = Options::load(&path);
        self.options_path = path;
        self.apply_display_mode();
    }

    fn apply_display_mode(&mut self) {
        self.compositor.set_mode(if self.options.fullscreen {
            DisplayMode::Scaled
        } else {
            DisplayMode::Centered
        });
    }

    /// Copy `n` 8-bit RGB triples into the palette.
    pub fn set_palette(&mut self, pal: &[u8], n: usize) {
        self.palette.set_range(pal, n);
    }

    /// Set one palette entry from 6-bit channels.
    pub fn set_palette_entry(&mut self, i: usize, c: Color) {
        self.palette.set_entry(i, c);
    }

    /// Read one palette entry, 8 bits per channel as stored.
    pub fn palette_entry(&self, i: usize) -> Color {
        self.palette.entry(i)
    }

    pub fn set_overscan_color(&mut self, i: u8) {
        self.overscan_color = i;
    }

    pub fn overscan_color(&self) -> u8 {
        self.overscan_color
    }

    /// Blit a rectangle of palette indices into the off-screen frame.
    pub fn copy_rect(&mut self, x: i32, y: i32, w: i32, h: i32, buf: &[u8], pitch: usize) {
        self.frame.blit(x, y, w, h, buf, pitch);
    }

    /// Fade transition between scenes. Not supported by this backend.
    pub fn fade_screen(&mut self) {}

    /// Composite the indexed frame into the hardware framebuffer and flip.
    ///
    /// `_shake_offset` (screen shake on explosions) is not applied on this
    /// backend. The flip blocks until the display is ready, which paces the
    /// interpreter's main loop.
    pub fn update_screen(&mut self, _shake_offset: i32) {
        let gfx = self.platform.gfx();
        self.compositor
            .present(&self.frame, &self.palette, gfx.framebuffer());
        gfx.flush_swap();
    }

    /// Poll input for this frame, refreshing [Backend::input].
    ///
    /// Blocks on the vertical blank first. A Select press enters the options
    /// menu synchronously; normal polling resumes only after the menu exits.
    pub fn process_events(&mut self) {
        if !self.platform.hid().app_running() {
            self.input.quit = true;
            return;
        }

        self.platform.gfx().wait_vblank();
        let buttons = self.platform.hid().scan();

        if buttons.pressed(Button::Select) {
            self.paused = true;
            self.audio.stop();
            self.run_options_session();
            return;
        }

        input::update_directions(&mut self.input, buttons);
        input::update_commands(&mut self.input, &self.options.bindings, buttons);
    }

    fn run_options_session(&mut self) {
        debug!("Entering options session");
        let mut quit = self.input.quit;
        OptionsSession::new(
            &mut self.platform,
            &mut self.options,
            &mut self.paused,
            &mut quit,
            &self.audio,
        )
        .run();
        self.input.quit = quit;

        self.apply_display_mode();
        self.options.save(&self.options_path);
        debug!("Options session done, fullscreen={}", self.options.fullscreen);
    }

    fn clear_framebuffers(&mut self) {
        let gfx = self.platform.gfx();
        for _ in 0..2 {
            gfx.framebuffer().fill(0);
            gfx.flush_swap();
        }
    }

    /// Suspend the main thread.
    pub fn sleep(&self, ms: u32) {
        self.platform.sleep_ms(ms);
    }

    /// Milliseconds since backend init, wrapping at 32 bits.
    pub fn timestamp(&self) -> u32 {
        let delta = self.platform.ticks().wrapping_sub(self.start_ticks);
        (delta / P::TICKS_PER_MS) as u32
    }

    /// Register the interpreter's sample callback and start playback.
    pub fn start_audio(&mut self, callback: AudioCallback) {
        let mixer = self.platform.take_mixer();
        self.audio.start(mixer, callback);
    }

    /// Pause playback; the audio thread idles until the next start.
    pub fn stop_audio(&self) {
        self.audio.stop();
    }

    pub fn output_sample_rate(&self) -> u32 {
        SOUND_SAMPLE_RATE
    }

    /// Hold the returned guard to keep the audio thread out of the
    /// interpreter's sample callback.
    pub fn lock_audio(&self) -> MutexGuard<'_, Option<AudioCallback>> {
        self.audio.lock()
    }

    /// Current display mode (reflects the persisted fullscreen toggle).
    pub fn display_mode(&self) -> DisplayMode {
        self.compositor.mode()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The compositor, for placement arithmetic.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// The off-screen indexed frame.
    pub fn frame(&self) -> &IndexedFrame {
        &self.frame
    }

    /// The underlying platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> Drop for Backend<P> {
    fn drop(&mut self) {
        // Palette, frame and lookup table free with the struct; the audio
        // thread must be joined before the mixer's hardware goes away.
        self.audio.shutdown();
    }
}
