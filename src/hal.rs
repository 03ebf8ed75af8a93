//! Narrow traits over the console hardware services.
//!
//! The backend owns one [Platform] and reaches each service through its own
//! trait, so every component's invariants can be exercised against small
//! test doubles. The real console services (gfx, HID, the DSP mixer, the
//! bottom-screen console) each map to one trait; the `sdl` feature provides
//! a desktop realization for development.

pub use crate::input::ButtonState;

/// The display service: a double-buffered 16-bit framebuffer plus vertical
/// blank synchronization.
///
/// The framebuffer is mounted 90° rotated relative to how the user holds
/// the device; [Gfx::size] reports `(width, height)` of the raw buffer,
/// where `width` is the memory stride.
pub trait Gfx {
    fn size(&self) -> (usize, usize);
    /// The back buffer to draw into, `width * height` RGB565 pixels.
    fn framebuffer(&mut self) -> &mut [u16];
    /// Flush the written buffer and swap it to the screen.
    fn flush_swap(&mut self);
    /// Block until the display is between refresh cycles. The once-per-frame
    /// call to this is the backend's frame pacing; no other timer exists.
    fn wait_vblank(&mut self);
}

/// The button input service.
pub trait Hid {
    /// False once the host OS asks the application to close.
    fn app_running(&mut self) -> bool;
    /// Sample every button's edge and level state for this frame.
    fn scan(&mut self) -> ButtonState;
}

/// The text console used by the options menu (the second screen on the real
/// device, the terminal on desktop). Lines may contain ANSI color escapes.
pub trait TextConsole {
    fn clear(&mut self);
    fn print_line(&mut self, line: &str);
}

/// The hardware audio mixer, owned by the audio thread.
///
/// The pipeline submits exactly one buffer at a time and polls
/// [AudioMixer::playing] to serialize: wait until the submitted buffer is
/// audibly started, then until it has drained, before touching the next one.
pub trait AudioMixer {
    /// Bring the output channel up: rate, mono PCM8 format, mix.
    fn open(&mut self);
    /// Drop any queued wavebuffers (used when playback resumes).
    fn reset(&mut self);
    /// Queue one filled sample buffer for playback.
    fn submit(&mut self, samples: &[u8]);
    /// True while a queued buffer is being played.
    fn playing(&mut self) -> bool;
    /// Release hardware resources before the audio thread exits.
    fn close(&mut self);
}

/// One concrete hardware target, bundling the services and the clock.
pub trait Platform {
    type Gfx: Gfx;
    type Hid: Hid;
    type Console: TextConsole;
    type Mixer: AudioMixer + Send + 'static;

    /// Hardware cycle counter ticks per millisecond, used to derive the
    /// interpreter's 32-bit timestamp.
    const TICKS_PER_MS: u64;

    fn gfx(&mut self) -> &mut Self::Gfx;
    fn hid(&mut self) -> &mut Self::Hid;
    fn console(&mut self) -> &mut Self::Console;
    /// Hand the mixer to the audio thread. Called at most once, on the
    /// first audio start request.
    fn take_mixer(&mut self) -> Option<Self::Mixer>;
    /// Raw cycle counter.
    fn ticks(&self) -> u64;
    fn sleep_ms(&self, ms: u32);
}
