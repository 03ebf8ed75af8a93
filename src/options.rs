//! The pause menu: rebind controls, toggle the display mode, quit.
//!
//! Runs synchronously inside [crate::Backend::process_events] — the
//! interpreter's loop is suspended until the session returns. The menu is
//! plain text on the platform's console screen, navigated with Up/Down and
//! activated with A (on button release, so held buttons don't auto-repeat
//! through the list).

use log::*;

use crate::audio::AudioPipeline;
use crate::bindings::Command;
use crate::config::Options;
use crate::hal::{Gfx, Hid, Platform, TextConsole};
use crate::input::Button;

const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Menu rows, in display order.
const REBINDABLE: [(Button, &str); 6] = [
    (Button::L, "Shoulder L"),
    (Button::R, "Shoulder R"),
    (Button::A, "A"),
    (Button::B, "B"),
    (Button::X, "X"),
    (Button::Y, "Y"),
];
const ROW_FULLSCREEN: usize = 0;
const ROW_RETURN: usize = 7;
const ROW_QUIT: usize = 8;
const ROW_MAX: usize = 8;

pub(crate) struct OptionsSession<'a, P: Platform> {
    platform: &'a mut P,
    options: &'a mut Options,
    paused: &'a mut bool,
    quit: &'a mut bool,
    audio: &'a AudioPipeline,
}

impl<'a, P: Platform> OptionsSession<'a, P> {
    pub fn new(
        platform: &'a mut P,
        options: &'a mut Options,
        paused: &'a mut bool,
        quit: &'a mut bool,
        audio: &'a AudioPipeline,
    ) -> Self {
        OptionsSession {
            platform,
            options,
            paused,
            quit,
            audio,
        }
    }

    pub fn run(&mut self) {
        let mut selected = 0;
        self.render(selected);

        while self.platform.hid().app_running() {
            let buttons = self.platform.hid().scan();

            if buttons.released(Button::DUp) {
                selected = if selected == 0 { ROW_MAX } else { selected - 1 };
                self.render(selected);
            } else if buttons.released(Button::DDown) {
                selected = if selected == ROW_MAX { 0 } else { selected + 1 };
                self.render(selected);
            }

            if buttons.released(Button::A) {
                self.activate(selected);
                self.render(selected);
            }

            if !*self.paused || *self.quit {
                self.platform.console().clear();
                return;
            }

            let gfx = self.platform.gfx();
            gfx.flush_swap();
            gfx.wait_vblank();
        }

        // Host shutdown while the menu was open.
        *self.quit = true;
    }

    fn activate(&mut self, selected: usize) {
        match selected {
            ROW_FULLSCREEN => {
                self.options.fullscreen = !self.options.fullscreen;
                if !self.options.fullscreen {
                    // Leaving scaled mode: both buffers hold a stretched
                    // frame that the centered mode would never overpaint.
                    let gfx = self.platform.gfx();
                    for _ in 0..2 {
                        gfx.framebuffer().fill(0);
                        gfx.flush_swap();
                    }
                }
            }
            ROW_RETURN => {
                *self.paused = false;
                self.audio.resume();
            }
            ROW_QUIT => {
                info!("Quit selected from options menu");
                *self.quit = true;
            }
            row => {
                let (button, _) = REBINDABLE[row - 1];
                let command = self.pick_command();
                self.options.bindings.set(button, command);
            }
        }
    }

    /// Sub-menu: choose the command for the button being rebound.
    fn pick_command(&mut self) -> Command {
        let max = Command::ALL.len() - 1;
        let mut selected = 0;
        self.render_commands(selected);

        while self.platform.hid().app_running() {
            let buttons = self.platform.hid().scan();

            if buttons.released(Button::DUp) {
                selected = if selected == 0 { max } else { selected - 1 };
                self.render_commands(selected);
            } else if buttons.released(Button::DDown) {
                selected = if selected == max { 0 } else { selected + 1 };
                self.render_commands(selected);
            }

            if buttons.released(Button::A) {
                return Command::ALL[selected];
            }

            let gfx = self.platform.gfx();
            gfx.flush_swap();
            gfx.wait_vblank();
        }

        *self.quit = true;
        Command::None
    }

    fn row(selected: usize, index: usize, text: &str) -> String {
        if selected == index {
            format!("{}> {}{}", GREEN, text, RESET)
        } else {
            format!("  {}", text)
        }
    }

    fn render(&mut self, selected: usize) {
        let fullscreen = self.options.fullscreen;
        let rows: Vec<String> = REBINDABLE
            .iter()
            .enumerate()
            .map(|(n, &(button, label))| {
                let text = format!("{} ({})", label, self.options.bindings.get(button).name());
                Self::row(selected, n + 1, &text)
            })
            .collect();

        let console = self.platform.console();
        console.clear();
        console.print_line("");
        console.print_line(" Video:");
        console.print_line(&Self::row(
            selected,
            ROW_FULLSCREEN,
            if fullscreen {
                "Display scaled"
            } else {
                "Normal size"
            },
        ));
        console.print_line("");
        console.print_line(" Controls:");
        for row in &rows {
            console.print_line(row);
        }
        console.print_line("");
        console.print_line(&Self::row(selected, ROW_RETURN, "Return to game"));
        console.print_line(&Self::row(selected, ROW_QUIT, "Exit game"));
    }

    fn render_commands(&mut self, selected: usize) {
        let console = self.platform.console();
        console.clear();
        console.print_line("");
        console.print_line(" Select command for key:");
        console.print_line("");
        for (n, command) in Command::ALL.iter().enumerate() {
            console.print_line(&Self::row(selected, n, command.name()));
        }
    }
}
