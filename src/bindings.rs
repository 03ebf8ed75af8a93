use crate::input::Button;

/// Logical command a physical button can be bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Command {
    #[default]
    None,
    Backspace,
    Enter,
    Shift,
    Space,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::None,
        Command::Backspace,
        Command::Enter,
        Command::Shift,
        Command::Space,
    ];

    /// Name shown in the options menu.
    pub fn name(self) -> &'static str {
        match self {
            Command::None => "No Binding",
            Command::Backspace => "Backspace",
            Command::Enter => "Enter",
            Command::Shift => "Shift",
            Command::Space => "Space",
        }
    }

    /// Stable integer used in the options file.
    pub fn to_u16(self) -> u16 {
        match self {
            Command::None => 0,
            Command::Backspace => 1,
            Command::Enter => 2,
            Command::Shift => 3,
            Command::Space => 4,
        }
    }

    /// Parse the options-file integer; unknown values mean no binding.
    pub fn from_u16(v: u16) -> Command {
        match v {
            1 => Command::Backspace,
            2 => Command::Enter,
            3 => Command::Shift,
            4 => Command::Space,
            _ => Command::None,
        }
    }
}

/// Button -> command table, one slot per physical button.
///
/// Only mutated through the options menu; reserved buttons always stay
/// [Command::None].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    slots: [Command; Button::COUNT],
}

impl KeyBindings {
    pub fn get(&self, button: Button) -> Command {
        self.slots[button as usize]
    }

    /// Bind `button` to `command`. Reserved buttons are left untouched.
    pub fn set(&mut self, button: Button, command: Command) {
        if !button.is_reserved() {
            self.slots[button as usize] = command;
        }
    }
}

impl Default for KeyBindings {
    fn default() -> KeyBindings {
        let mut slots = [Command::None; Button::COUNT];
        slots[Button::Y as usize] = Command::Backspace;
        slots[Button::B as usize] = Command::Enter;
        slots[Button::A as usize] = Command::Shift;
        slots[Button::X as usize] = Command::Space;
        KeyBindings { slots }
    }
}
