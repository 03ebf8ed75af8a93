use std::fs;
use std::path::Path;

use log::*;

use crate::bindings::{Command, KeyBindings};
use crate::input::Button;

/// The persisted user options: display mode plus the binding table.
///
/// Stored as whitespace-separated integers in a fixed order: the fullscreen
/// flag first, then one command value per button slot. Reserved buttons are
/// written too so that slot positions stay aligned, and their values are
/// ignored when loading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub fullscreen: bool,
    pub bindings: KeyBindings,
}

impl Options {
    /// Load options from `path`.
    ///
    /// Best effort: a missing or unreadable file, or one that doesn't parse,
    /// just yields the defaults.
    pub fn load(path: &Path) -> Options {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No options file at {:?} ({}), using defaults", path, e);
                return Options::default();
            }
        };

        let mut options = Options::default();
        let mut tokens = text.split_whitespace();
        match tokens.next().map(str::parse::<u8>) {
            Some(Ok(v)) => options.fullscreen = v != 0,
            _ => {
                warn!("Malformed options file {:?}, using defaults", path);
                return Options::default();
            }
        }
        for button in Button::ALL {
            let value = match tokens.next().map(str::parse::<u16>) {
                Some(Ok(v)) => v,
                _ => {
                    warn!("Options file {:?} is truncated, keeping defaults for the rest", path);
                    break;
                }
            };
            if button.is_reserved() {
                continue;
            }
            options.bindings.set(button, Command::from_u16(value));
        }
        info!("Loaded options from {:?}", path);
        options
    }

    /// Write options to `path`, one value per line.
    pub fn save(&self, path: &Path) {
        let mut text = String::new();
        text.push_str(if self.fullscreen { "1\n" } else { "0\n" });
        for button in Button::ALL {
            text.push_str(&format!("{}\n", self.bindings.get(button).to_u16()));
        }
        match fs::write(path, text) {
            Ok(()) => debug!("Saved options to {:?}", path),
            Err(e) => error!("Unable to save options to {:?}: {}", path, e),
        }
    }
}
