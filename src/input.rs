use crate::bindings::{Command, KeyBindings};

/// Physical buttons, in the console HID bit order.
///
/// `bit()` gives the mask used in [ButtonState] words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    A = 0,
    B,
    Select,
    Start,
    DRight,
    DLeft,
    DUp,
    DDown,
    R,
    L,
    X,
    Y,
    Zl,
    Zr,
}

impl Button {
    pub const COUNT: usize = 14;
    pub const ALL: [Button; Button::COUNT] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::DRight,
        Button::DLeft,
        Button::DUp,
        Button::DDown,
        Button::R,
        Button::L,
        Button::X,
        Button::Y,
        Button::Zl,
        Button::Zr,
    ];

    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Directional and system buttons can't be rebound; their config slots
    /// are positional placeholders only.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Button::DRight
                | Button::DLeft
                | Button::DUp
                | Button::DDown
                | Button::Select
                | Button::Start
        )
    }
}

/// One HID scan: edge and level state for every button.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonState {
    /// Went down this frame.
    pub pressed: u32,
    /// Went up this frame.
    pub released: u32,
    /// Currently down.
    pub held: u32,
}

impl ButtonState {
    pub fn pressed(&self, b: Button) -> bool {
        self.pressed & b.bit() != 0
    }
    pub fn released(&self, b: Button) -> bool {
        self.released & b.bit() != 0
    }
    pub fn held(&self, b: Button) -> bool {
        self.held & b.bit() != 0
    }
}

/// Consolidated input snapshot handed to the interpreter every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    /// Bitmask of [PlayerInput::DIR_UP] etc, rebuilt from held buttons on
    /// every poll.
    pub dir_mask: u8,
    pub enter: bool,
    pub space: bool,
    pub shift: bool,
    pub backspace: bool,
    /// Start was pressed; the interpreter treats this as escape intent.
    pub escape: bool,
    /// The host asked the application to exit, or the user quit from the
    /// options menu.
    pub quit: bool,
}

impl PlayerInput {
    pub const DIR_UP: u8 = 1 << 0;
    pub const DIR_DOWN: u8 = 1 << 1;
    pub const DIR_LEFT: u8 = 1 << 2;
    pub const DIR_RIGHT: u8 = 1 << 3;
}

/// Rebuild the direction mask from the buttons held right now.
///
/// Starting from zero each poll guarantees a released direction never
/// lingers into the next frame.
pub(crate) fn update_directions(pi: &mut PlayerInput, buttons: ButtonState) {
    pi.dir_mask = 0;
    if buttons.held(Button::DUp) {
        pi.dir_mask |= PlayerInput::DIR_UP;
    }
    if buttons.held(Button::DLeft) {
        pi.dir_mask |= PlayerInput::DIR_LEFT;
    }
    if buttons.held(Button::DRight) {
        pi.dir_mask |= PlayerInput::DIR_RIGHT;
    }
    if buttons.held(Button::DDown) {
        pi.dir_mask |= PlayerInput::DIR_DOWN;
    }
}

/// Apply press/release edges of the rebindable buttons through the binding
/// table, and the fixed Start -> escape mapping.
pub(crate) fn update_commands(pi: &mut PlayerInput, bindings: &KeyBindings, buttons: ButtonState) {
    for button in Button::ALL {
        if button.is_reserved() {
            continue;
        }
        let command = bindings.get(button);
        if command == Command::None {
            continue;
        }

        let flag = match command {
            Command::Backspace => &mut pi.backspace,
            Command::Enter => &mut pi.enter,
            Command::Shift => &mut pi.shift,
            Command::Space => &mut pi.space,
            Command::None => unreachable!(),
        };
        if buttons.pressed(button) {
            *flag = true;
        } else if buttons.released(button) {
            *flag = false;
        }
    }

    if buttons.pressed(Button::Start) {
        pi.escape = true;
    } else if buttons.released(Button::Start) {
        pi.escape = false;
    }
}
