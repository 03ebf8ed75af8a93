//! Test doubles for the hardware traits.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use remi3ds::hal::{AudioMixer, Gfx, Hid, Platform, TextConsole};
use remi3ds::{Button, ButtonState};

pub struct MockGfx {
    width: usize,
    height: usize,
    pub buffer: Vec<u16>,
    pub flips: usize,
    pub vblanks: usize,
}

impl Gfx for MockGfx {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    fn framebuffer(&mut self) -> &mut [u16] {
        &mut self.buffer
    }
    fn flush_swap(&mut self) {
        self.flips += 1;
    }
    fn wait_vblank(&mut self) {
        self.vblanks += 1;
    }
}

/// Plays back a fixed sequence of button scans; the app "closes" once the
/// script runs out, so menu loops always terminate.
pub struct ScriptedHid {
    pub frames: VecDeque<ButtonState>,
}

impl Hid for ScriptedHid {
    fn app_running(&mut self) -> bool {
        !self.frames.is_empty()
    }
    fn scan(&mut self) -> ButtonState {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MockConsole {
    pub lines: Vec<String>,
    pub clears: usize,
}

impl TextConsole for MockConsole {
    fn clear(&mut self) {
        self.clears += 1;
    }
    fn print_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Everything the mock mixer observed, shared with the test thread.
#[derive(Default)]
pub struct MixerLog {
    pub submissions: Vec<Vec<u8>>,
    /// A buffer was submitted while another was still in flight.
    pub overlap: bool,
    pub opened: bool,
    pub closed: bool,
    pub resets: usize,
    in_flight: u8,
}

pub struct MockMixer {
    pub log: Arc<Mutex<MixerLog>>,
}

impl AudioMixer for MockMixer {
    fn open(&mut self) {
        self.log.lock().unwrap().opened = true;
    }
    fn reset(&mut self) {
        self.log.lock().unwrap().resets += 1;
    }
    fn submit(&mut self, samples: &[u8]) {
        let mut log = self.log.lock().unwrap();
        if log.in_flight > 0 {
            log.overlap = true;
        }
        // Two playing() polls per buffer: one "started", one "completed".
        log.in_flight = 2;
        log.submissions.push(samples.to_vec());
    }
    fn playing(&mut self) -> bool {
        let mut log = self.log.lock().unwrap();
        if log.in_flight > 0 {
            log.in_flight -= 1;
            true
        } else {
            false
        }
    }
    fn close(&mut self) {
        self.log.lock().unwrap().closed = true;
    }
}

pub struct MockPlatform {
    pub gfx: MockGfx,
    pub hid: ScriptedHid,
    pub console: MockConsole,
    mixer: Option<MockMixer>,
    pub mixer_log: Arc<Mutex<MixerLog>>,
    pub ticks: Arc<AtomicU64>,
}

impl MockPlatform {
    pub fn new(fb_width: usize, fb_height: usize) -> MockPlatform {
        let mixer_log = Arc::new(Mutex::new(MixerLog::default()));
        MockPlatform {
            gfx: MockGfx {
                width: fb_width,
                height: fb_height,
                buffer: vec![0xdead; fb_width * fb_height],
                flips: 0,
                vblanks: 0,
            },
            hid: ScriptedHid {
                frames: VecDeque::new(),
            },
            console: MockConsole::default(),
            mixer: Some(MockMixer {
                log: mixer_log.clone(),
            }),
            mixer_log,
            ticks: Arc::new(AtomicU64::new(100_000)),
        }
    }

    pub fn with_frames(mut self, frames: Vec<ButtonState>) -> MockPlatform {
        self.hid.frames = frames.into();
        self
    }
}

impl Platform for MockPlatform {
    type Gfx = MockGfx;
    type Hid = ScriptedHid;
    type Console = MockConsole;
    type Mixer = MockMixer;

    const TICKS_PER_MS: u64 = 4;

    fn gfx(&mut self) -> &mut MockGfx {
        &mut self.gfx
    }
    fn hid(&mut self) -> &mut ScriptedHid {
        &mut self.hid
    }
    fn console(&mut self) -> &mut MockConsole {
        &mut self.console
    }
    fn take_mixer(&mut self) -> Option<MockMixer> {
        self.mixer.take()
    }
    fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
    fn sleep_ms(&self, _ms: u32) {}
}

pub fn press(button: Button) -> ButtonState {
    ButtonState {
        pressed: button.bit(),
        released: 0,
        held: button.bit(),
    }
}

pub fn release(button: Button) -> ButtonState {
    ButtonState {
        pressed: 0,
        released: button.bit(),
        held: 0,
    }
}

pub fn held(buttons: &[Button]) -> ButtonState {
    let mask = buttons.iter().fold(0, |m, b| m | b.bit());
    ButtonState {
        pressed: 0,
        released: 0,
        held: mask,
    }
}

pub fn idle() -> ButtonState {
    ButtonState::default()
}
