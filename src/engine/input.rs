use log::debug;

pub const NUM_KEY_CODES: usize = 256;

/// Debounced key level. A repeated raw "down" collapses into `Held` so
/// consumers see exactly one `Down` edge per physical press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Up,
    Down,
    Held,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Per-frame input state, written synchronously by the platform event
/// callback and read once per simulation tick.
///
/// Mouse buttons carry no `Held` distinction; press/release tracking across
/// ticks is the consumer's job.
pub struct InputTracker {
    keys: [KeyState; NUM_KEY_CODES],
    left: ButtonState,
    right: ButtonState,
    pointer: (i32, i32),
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            keys: [KeyState::Up; NUM_KEY_CODES],
            left: ButtonState::Up,
            right: ButtonState::Up,
            pointer: (0, 0),
        }
    }

    pub fn key_down(&mut self, code: u8) {
        let state = &mut self.keys[usize::from(code)];
        *state = match *state {
            KeyState::Up => KeyState::Down,
            KeyState::Down | KeyState::Held => KeyState::Held,
        };
    }

    pub fn key_up(&mut self, code: u8) {
        self.keys[usize::from(code)] = KeyState::Up;
    }

    pub fn key(&self, code: u8) -> KeyState {
        self.keys[usize::from(code)]
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }

    pub fn pointer(&self) -> (i32, i32) {
        self.pointer
    }

    pub fn button_down(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.left = ButtonState::Down,
            MouseButton::Right => self.right = ButtonState::Down,
        }
    }

    pub fn button_up(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.left = ButtonState::Up,
            MouseButton::Right => self.right = ButtonState::Up,
        }
    }

    pub fn button(&self, button: MouseButton) -> ButtonState {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
        }
    }

    /// Clear every key and button back to `Up`. Triggered on focus loss.
    pub fn reset(&mut self) {
        debug!("input state reset");
        self.keys = [KeyState::Up; NUM_KEY_CODES];
        self.left = ButtonState::Up;
        self.right = ButtonState::Up;
    }
}
