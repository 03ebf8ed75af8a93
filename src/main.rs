//! Test-pattern harness for the platform backend.
//!
//! Stands in for the game interpreter: feeds the backend a palette, an
//! animated blit pattern and (optionally) a tone-generator audio callback,
//! and pumps the input/present loop. Useful for eyeballing both display
//! modes, the options menu and audio without the game engine attached.

use clap::Parser;
use log::*;
use remi3ds::{sdl::SdlPlatform, Backend, PlayerInput};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(version, about = "Test-pattern harness for the remi3ds platform backend")]
struct Args {
    /// Logical screen width
    #[arg(long, default_value_t = 256)]
    width: usize,
    /// Logical screen height
    #[arg(long, default_value_t = 224)]
    height: usize,
    /// Play a 440 Hz test tone
    #[arg(long)]
    tone: bool,
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    TermLogger::init(
        if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Unable to initialize logger");

    let platform = match SdlPlatform::new("remi3ds harness") {
        Ok(p) => p,
        Err(e) => {
            error!("Unable to initialize SDL platform: {}", e);
            std::process::exit(1);
        }
    };
    let mut backend = match Backend::new(platform, "remi3ds harness", args.width, args.height) {
        Ok(b) => b,
        Err(e) => {
            error!("Unable to initialize backend: {}", e);
            std::process::exit(1);
        }
    };

    // Grayscale-to-hue ramp over the 256 game colors.
    let mut palette = vec![0u8; 256 * 3];
    for (i, rgb) in palette.chunks_exact_mut(3).enumerate() {
        rgb[0] = i as u8;
        rgb[1] = (i as u8).wrapping_mul(3);
        rgb[2] = 255 - i as u8;
    }
    backend.set_palette(&palette, 256);

    if args.tone {
        let mut phase = 0u32;
        let half_period = backend.output_sample_rate() / 440 / 2;
        backend.start_audio(Box::new(move |stream| {
            for sample in stream.iter_mut() {
                *sample = if (phase / half_period) % 2 == 0 {
                    0x20
                } else {
                    0xe0
                };
                phase = phase.wrapping_add(1);
            }
        }));
    }

    let (w, h) = (args.width, args.height);
    let mut frame = vec![0u8; w * h];
    let mut tick = 0usize;
    loop {
        backend.process_events();
        if backend.input.quit {
            break;
        }
        report_input(&backend.input);

        // Scrolling diagonal color bands.
        for y in 0..h {
            for x in 0..w {
                frame[x + y * w] = ((x + y + tick) / 4) as u8;
            }
        }
        backend.copy_rect(0, 0, w as i32, h as i32, &frame, w);
        backend.update_screen(0);
        tick += 1;
    }
    info!("Harness exiting after {} frames ({} ms)", tick, backend.timestamp());
}

fn report_input(input: &PlayerInput) {
    if input.enter || input.space || input.shift || input.backspace || input.escape {
        debug!(
            "input: dir={:04b} enter={} space={} shift={} backspace={} escape={}",
            input.dir_mask, input.enter, input.space, input.shift, input.backspace, input.escape
        );
    }
}
