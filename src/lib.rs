#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
mod audio;
pub use audio::{AudioCallback, AudioPipeline, AUDIO_BUFFER_LEN, SOUND_SAMPLE_RATE};
mod backend;
pub use backend::Backend;
mod bindings;
pub use bindings::{Command, KeyBindings};
mod compositor;
pub use compositor::{rgb565, Compositor, DisplayMode};
mod config;
pub use config::Options;
mod framebuffer;
pub use framebuffer::IndexedFrame;
pub mod hal;
mod input;
pub use input::{Button, ButtonState, PlayerInput};
mod options;
mod palette;
pub use palette::{Color, Palette, PALETTE_SIZE};
#[cfg(feature = "sdl")]
pub mod sdl;
