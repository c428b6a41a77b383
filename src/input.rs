use std::collections::HashSet;

/// Keys the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

impl KeyCode {
    pub const W: Self = Self::Character('W');
    pub const A: Self = Self::Character('A');
    pub const S: Self = Self::Character('S');
    pub const D: Self = Self::Character('D');
    pub const P: Self = Self::Character('P');
    pub const R: Self = Self::Character('R');
    pub const UP: Self = Self::Named(NamedKey::Up);
    pub const DOWN: Self = Self::Named(NamedKey::Down);
    pub const LEFT: Self = Self::Named(NamedKey::Left);
    pub const RIGHT: Self = Self::Named(NamedKey::Right);
    pub const ESCAPE: Self = Self::Named(NamedKey::Escape);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Escape,
}

/// Window-layer notifications, queued and replayed once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resize { width: u32, height: u32 },
    MouseMove { x: f64, y: f64 },
    Scroll { delta: f32 },
    KeyEdge { key: KeyCode, pressed: bool },
}

/// Set of keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn set_key_up(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPhase {
    #[default]
    Released,
    Pressed,
}

/// Rising-edge detector for a single key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    phase: KeyPhase,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> KeyPhase {
        self.phase
    }

    /// Feeds this frame's polled state; true only on Released -> Pressed.
    pub fn update(&mut self, down: bool) -> bool {
        let fired = down && self.phase == KeyPhase::Released;
        self.phase = if down {
            KeyPhase::Pressed
        } else {
            KeyPhase::Released
        };
        fired
    }
}

/// Turns absolute cursor positions into look offsets.
///
/// The first sample only primes the tracker so the view does not jump
/// when the cursor is captured.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    last: Option<(f64, f64)>,
}

impl CursorTracker {
    /// Returns `(dx, dy)` with `dy` positive when the cursor moves up.
    pub fn offset(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = self.last.replace((x, y))?;
        Some(((x - previous.0) as f32, (previous.1 - y) as f32))
    }
}
