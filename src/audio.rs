use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::*;

use crate::hal::AudioMixer;

/// Sample rate the interpreter's mixer must produce, in Hz.
pub const SOUND_SAMPLE_RATE: u32 = 22_050;
/// Samples per hardware buffer (mono signed 8-bit PCM).
pub const AUDIO_BUFFER_LEN: usize = 8192;
/// Rotating pool of sample buffers handed to the mixer.
const SOUND_BUFFER_COUNT: usize = 4;
/// Idle poll interval while playback is paused.
const IDLE_POLL: Duration = Duration::from_millis(10);
/// Poll interval while a buffer is in flight at the mixer.
const PLAYBACK_POLL: Duration = Duration::from_micros(200);

/// Fills `stream` with exactly `stream.len()` samples, padding with silence
/// when the interpreter has nothing to play.
pub type AudioCallback = Box<dyn FnMut(&mut [u8]) + Send>;

/// State shared between the interpreter thread and the audio thread.
///
/// The callback is set before the thread starts and only replaced under the
/// mutex; `playing` and `quit` are plain flags that each side polls, never
/// read-modify-written, so relaxed loads and stores are enough.
struct AudioCore {
    quit: AtomicBool,
    playing: AtomicBool,
    callback: Mutex<Option<AudioCallback>>,
}

/// The audio pipeline: a dedicated thread pulling samples from the
/// interpreter's callback into a rotating buffer pool and feeding the
/// hardware mixer one buffer at a time.
pub struct AudioPipeline {
    core: Arc<AudioCore>,
    thread: Option<JoinHandle<()>>,
}

impl AudioPipeline {
    pub fn new() -> AudioPipeline {
        AudioPipeline {
            core: Arc::new(AudioCore {
                quit: AtomicBool::new(false),
                playing: AtomicBool::new(false),
                callback: Mutex::new(None),
            }),
            thread: None,
        }
    }

    /// Register the interpreter's callback and start playback, spawning the
    /// audio thread on the first call.
    ///
    /// `mixer` is only consumed the first time; later calls just swap the
    /// callback and raise the playing flag.
    pub fn start<M: AudioMixer + Send + 'static>(
        &mut self,
        mixer: Option<M>,
        callback: AudioCallback,
    ) {
        *self.lock() = Some(callback);
        self.core.playing.store(true, Ordering::Relaxed);

        if self.thread.is_none() {
            let Some(mixer) = mixer else {
                error!("No mixer available, audio stays silent");
                return;
            };
            let core = self.core.clone();
            self.thread = Some(thread::spawn(move || run(core, mixer)));
            info!("Audio thread started, rate {} Hz", SOUND_SAMPLE_RATE);
        }
    }

    /// Pause playback. The thread stays up and resumes on the next start.
    pub fn stop(&self) {
        self.core.playing.store(false, Ordering::Relaxed);
    }

    /// Resume playback with the already registered callback.
    pub fn resume(&self) {
        self.core.playing.store(true, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        self.core.playing.load(Ordering::Relaxed)
    }

    /// Serialize against the audio thread's callback invocations.
    ///
    /// While the guard is held the audio thread cannot enter the callback,
    /// so the interpreter may mutate state the callback reads. Dropping the
    /// guard releases the lock.
    pub fn lock(&self) -> MutexGuard<'_, Option<AudioCallback>> {
        self.core
            .callback
            .lock()
            .expect("audio callback mutex poisoned")
    }

    /// Signal the thread to quit and join it. Playback stops; queued
    /// hardware buffers are released by the thread on its way out.
    pub fn shutdown(&mut self) {
        self.core.quit.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!("Audio thread panicked during shutdown");
            } else {
                debug!("Audio thread joined");
            }
        }
    }
}

impl Default for AudioPipeline {
    fn default() -> AudioPipeline {
        AudioPipeline::new()
    }
}

impl Drop for AudioPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Audio thread body. Runs until the quit flag is raised.
fn run<M: AudioMixer>(core: Arc<AudioCore>, mut mixer: M) {
    mixer.open();

    let mut buffers = vec![[0u8; AUDIO_BUFFER_LEN]; SOUND_BUFFER_COUNT];
    let mut buf_index = 0;
    let mut primed = false;

    while !core.quit.load(Ordering::Relaxed) {
        if !core.playing.load(Ordering::Relaxed) {
            // Busy-poll rather than block so a resume is never missed.
            primed = false;
            thread::sleep(IDLE_POLL);
            continue;
        }

        if !primed {
            mixer.reset();
            primed = true;
        }

        {
            let mut guard = core.callback.lock().expect("audio callback mutex poisoned");
            let buffer = &mut buffers[buf_index];
            match guard.as_mut() {
                // The callback contract: fill the whole buffer, silence
                // included.
                Some(callback) => callback(buffer),
                None => buffer.fill(0),
            }
        }

        mixer.submit(&buffers[buf_index]);
        buf_index = (buf_index + 1) % SOUND_BUFFER_COUNT;

        // One buffer in flight at a time: wait for it to start, then to
        // drain, before filling the next one.
        while !mixer.playing() && !core.quit.load(Ordering::Relaxed) {
            thread::sleep(PLAYBACK_POLL);
        }
        while mixer.playing() && !core.quit.load(Ordering::Relaxed) {
            thread::sleep(PLAYBACK_POLL);
        }
    }

    mixer.close();
    debug!("Audio thread exiting");
}
