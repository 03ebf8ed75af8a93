//! Desktop realization of the hardware traits over SDL2.
//!
//! Emulates the console's top screen: a 240x400 RGB565 framebuffer mounted
//! 90° rotated, presented upright in a 400x240 window. The keyboard stands
//! in for the buttons and mixer submissions are routed to an SDL playback
//! device through a channel, so the audio thread sees the same
//! one-buffer-in-flight behavior as on hardware.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use log::*;
use sdl2::audio::{AudioCallback as SdlAudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::{EventPump, Sdl};

use crate::audio::SOUND_SAMPLE_RATE;
use crate::hal::{AudioMixer, Gfx, Hid, Platform, TextConsole};
use crate::input::{Button, ButtonState};

/// Raw framebuffer stride (the screen's short edge).
pub const FB_WIDTH: usize = 240;
/// Raw framebuffer rows (the screen's long edge).
pub const FB_HEIGHT: usize = 400;

/// Same cycle-counter resolution as the console, so timestamps behave
/// identically on both targets.
const TICKS_PER_SEC: u64 = 268_123_480;

const KEY_MAP: [(Scancode, Button); Button::COUNT] = [
    (Scancode::X, Button::A),
    (Scancode::Z, Button::B),
    (Scancode::Tab, Button::Select),
    (Scancode::Return, Button::Start),
    (Scancode::Right, Button::DRight),
    (Scancode::Left, Button::DLeft),
    (Scancode::Up, Button::DUp),
    (Scancode::Down, Button::DDown),
    (Scancode::W, Button::R),
    (Scancode::Q, Button::L),
    (Scancode::S, Button::X),
    (Scancode::A, Button::Y),
    (Scancode::Num1, Button::Zl),
    (Scancode::Num2, Button::Zr),
];

pub struct SdlGfx {
    canvas: Canvas<Window>,
    buffer: Vec<u16>,
    last_flip: Instant,
}

impl Gfx for SdlGfx {
    fn size(&self) -> (usize, usize) {
        (FB_WIDTH, FB_HEIGHT)
    }

    fn framebuffer(&mut self) -> &mut [u16] {
        &mut self.buffer
    }

    fn flush_swap(&mut self) {
        let creator = self.canvas.texture_creator();
        let mut texture = match creator.create_texture_streaming(
            PixelFormatEnum::RGB565,
            FB_WIDTH as u32,
            FB_HEIGHT as u32,
        ) {
            Ok(t) => t,
            Err(e) => {
                error!("Unable to create screen texture: {}", e);
                return;
            }
        };

        let mut bytes = Vec::with_capacity(self.buffer.len() * 2);
        for px in &self.buffer {
            bytes.extend_from_slice(&px.to_ne_bytes());
        }
        if let Err(e) = texture.update(None, &bytes, FB_WIDTH * 2) {
            error!("Unable to upload screen texture: {}", e);
            return;
        }

        self.canvas.clear();
        // Rotate the raw buffer back upright; the dst rect is the rotated
        // footprint centered in the window.
        let (win_w, win_h) = self.canvas.window().size();
        let dst = Rect::new(
            (win_w as i32 - FB_WIDTH as i32) / 2,
            (win_h as i32 - FB_HEIGHT as i32) / 2,
            FB_WIDTH as u32,
            FB_HEIGHT as u32,
        );
        if let Err(e) = self
            .canvas
            .copy_ex(&texture, None, Some(dst), -90.0, None, false, false)
        {
            error!("Unable to present frame: {}", e);
        }
        self.canvas.present();
    }

    fn wait_vblank(&mut self) {
        // Stand-in for the display's vertical blank: pace to 60 Hz.
        let frame = Duration::from_micros(16_667);
        let elapsed = self.last_flip.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
        self.last_flip = Instant::now();
    }
}

pub struct SdlHid {
    pump: EventPump,
    last_held: u32,
    running: bool,
}

impl Hid for SdlHid {
    fn app_running(&mut self) -> bool {
        for event in self.pump.poll_iter() {
            if let Event::Quit { .. } = event {
                self.running = false;
            }
        }
        self.running
    }

    fn scan(&mut self) -> ButtonState {
        let keyboard = self.pump.keyboard_state();
        let mut held = 0;
        for (scancode, button) in KEY_MAP {
            if keyboard.is_scancode_pressed(scancode) {
                held |= button.bit();
            }
        }
        let state = ButtonState {
            pressed: held & !self.last_held,
            released: self.last_held & !held,
            held,
        };
        self.last_held = held;
        state
    }
}

/// Options menu output goes to the terminal on desktop.
pub struct TermConsole;

impl TextConsole for TermConsole {
    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }

    fn print_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Consumes queued sample buffers on SDL's own audio thread.
struct QueueSink {
    rx: Receiver<Vec<i8>>,
    pending: Arc<AtomicUsize>,
    current: VecDeque<i8>,
    draining: bool,
}

impl SdlAudioCallback for QueueSink {
    type Channel = i8;

    fn callback(&mut self, out: &mut [i8]) {
        for sample in out.iter_mut() {
            if self.current.is_empty() {
                if self.draining {
                    self.pending.fetch_sub(1, Ordering::Relaxed);
                    self.draining = false;
                }
                if let Ok(buffer) = self.rx.try_recv() {
                    self.current = buffer.into();
                    self.draining = true;
                }
            }
            *sample = self.current.pop_front().unwrap_or(0);
        }
    }
}

/// The mixer handle given to the audio thread: forwards buffers to the SDL
/// device and reports in-flight state through a shared counter.
pub struct MixerProxy {
    tx: Sender<Vec<i8>>,
    pending: Arc<AtomicUsize>,
}

impl AudioMixer for MixerProxy {
    fn open(&mut self) {}

    fn reset(&mut self) {}

    fn submit(&mut self, samples: &[u8]) {
        let buffer: Vec<i8> = samples.iter().map(|&s| s as i8).collect();
        self.pending.fetch_add(1, Ordering::Relaxed);
        if self.tx.send(buffer).is_err() {
            warn!("Audio device went away, dropping samples");
            self.pending.fetch_sub(1, Ordering::Relaxed);
        }
    }

    fn playing(&mut self) -> bool {
        self.pending.load(Ordering::Relaxed) > 0
    }

    fn close(&mut self) {}
}

pub struct SdlPlatform {
    _sdl: Sdl,
    gfx: SdlGfx,
    hid: SdlHid,
    console: TermConsole,
    mixer: Option<MixerProxy>,
    _device: AudioDevice<QueueSink>,
    epoch: Instant,
}

impl SdlPlatform {
    pub fn new(title: &str) -> Result<SdlPlatform, String> {
        let sdl = sdl2::init()?;
        let video = sdl.video()?;
        let window = video
            .window(title, FB_HEIGHT as u32, FB_WIDTH as u32)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let pump = sdl.event_pump()?;

        let audio = sdl.audio()?;
        let (tx, rx) = mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let spec = AudioSpecDesired {
            freq: Some(SOUND_SAMPLE_RATE as i32),
            channels: Some(1),
            samples: Some(1024),
        };
        let sink_pending = pending.clone();
        let device = audio.open_playback(None, &spec, |_spec| QueueSink {
            rx,
            pending: sink_pending,
            current: VecDeque::new(),
            draining: false,
        })?;
        device.resume();
        info!("SDL platform up: {}x{} window", FB_HEIGHT, FB_WIDTH);

        Ok(SdlPlatform {
            _sdl: sdl,
            gfx: SdlGfx {
                canvas,
                buffer: vec![0; FB_WIDTH * FB_HEIGHT],
                last_flip: Instant::now(),
            },
            hid: SdlHid {
                pump,
                last_held: 0,
                running: true,
            },
            console: TermConsole,
            mixer: Some(MixerProxy { tx, pending }),
            _device: device,
            epoch: Instant::now(),
        })
    }
}

impl Platform for SdlPlatform {
    type Gfx = SdlGfx;
    type Hid = SdlHid;
    type Console = TermConsole;
    type Mixer = MixerProxy;

    const TICKS_PER_MS: u64 = TICKS_PER_SEC / 1000;

    fn gfx(&mut self) -> &mut SdlGfx {
        &mut self.gfx
    }

    fn hid(&mut self) -> &mut SdlHid {
        &mut self.hid
    }

    fn console(&mut self) -> &mut TermConsole {
        &mut self.console
    }

    fn take_mixer(&mut self) -> Option<MixerProxy> {
        self.mixer.take()
    }

    fn ticks(&self) -> u64 {
        (self.epoch.elapsed().as_nanos() * TICKS_PER_SEC as u128 / 1_000_000_000) as u64
    }

    fn sleep_ms(&self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
