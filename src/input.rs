use std::collections::{HashMap, VecDeque};

pub use winit::event::MouseButton;
pub use winit::keyboard::{KeyCode, ModifiersState, NativeKeyCode, PhysicalKey};

// ── Events ────────────────────────────────────────────────────────────────────

/// Keyboard transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// Mouse button transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    ButtonDown,
    ButtonUp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// Milliseconds since the application started.
    pub timestamp_ms: u64,
    pub kind: KeyEventKind,
    /// Layout-independent key; `Unidentified` keys carry the platform scancode.
    pub key: PhysicalKey,
    /// Printable character produced by the key, if any.
    pub text: Option<char>,
    pub modifiers: ModifiersState,
    pub pressed: bool,
    pub repeat: bool,
}

impl KeyboardEvent {
    /// One-line diagnostic shown in the debug overlay.
    pub fn describe(&self, screen_width: u32) -> String {
        let sym = match (self.text, self.key) {
            (Some(ch), _) => ch.to_string(),
            (None, PhysicalKey::Code(code)) => format!("{code:?}"),
            (None, PhysicalKey::Unidentified(native)) => format!("{native:?}"),
        };
        format!(
            "[{} ms] screen_width:{} Keyboard, type:{:?}, sym:{}, modifiers:{}, state:{}, repeat:{}",
            self.timestamp_ms,
            screen_width,
            self.kind,
            sym,
            self.modifiers.bits(),
            self.pressed as u8,
            self.repeat as u8,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MouseButtonEvent {
    /// Milliseconds since the application started.
    pub timestamp_ms: u64,
    pub window_id: u64,
    pub kind: MouseEventKind,
    pub button: MouseButton,
    pub pressed: bool,
    /// 1 for a single click, 2 for a double click, and so on.
    pub clicks: u8,
    /// Cursor position in window pixels.
    pub x: i32,
    pub y: i32,
}

impl MouseButtonEvent {
    pub fn describe(&self) -> String {
        format!(
            "type: {:?}, timestamp: {}, window_id: {}, Button: {:?}, State: {}, Clicks: {}, X: {}, Y: {}",
            self.kind,
            self.timestamp_ms,
            self.window_id,
            self.button,
            self.pressed as u8,
            self.clicks,
            self.x,
            self.y,
        )
    }
}

// ── Click counting ────────────────────────────────────────────────────────────

/// Presses of the same button closer together than this count as one
/// multi-click.
pub const DOUBLE_CLICK_MS: u64 = 500;
/// How far (in pixels, per axis) the cursor may drift between clicks.
pub const DOUBLE_CLICK_RADIUS: i32 = 4;

#[derive(Copy, Clone, Debug)]
struct ClickState {
    timestamp_ms: u64,
    x: i32,
    y: i32,
    count: u8,
}

/// Per-button multi-click tracking. winit reports raw presses only.
#[derive(Default, Debug)]
pub struct ClickCounter {
    buttons: HashMap<MouseButton, ClickState>,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press and return its click count.
    pub fn press(&mut self, button: MouseButton, timestamp_ms: u64, x: i32, y: i32) -> u8 {
        let count = match self.buttons.get(&button) {
            Some(prev)
                if timestamp_ms.saturating_sub(prev.timestamp_ms) <= DOUBLE_CLICK_MS
                    && (x - prev.x).abs() <= DOUBLE_CLICK_RADIUS
                    && (y - prev.y).abs() <= DOUBLE_CLICK_RADIUS =>
            {
                prev.count.saturating_add(1)
            }
            _ => 1,
        };
        self.buttons.insert(button, ClickState { timestamp_ms, x, y, count });
        count
    }

    /// Click count reported with a release: that of the matching press.
    pub fn release(&self, button: MouseButton) -> u8 {
        self.buttons.get(&button).map_or(1, |state| state.count)
    }
}

/// Everything the frame loop reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The window was asked to close.
    Quit,
    Key(KeyboardEvent),
    MouseButton(MouseButtonEvent),
}

// ── EventSource ───────────────────────────────────────────────────────────────

/// Non-blocking event queue; `None` means nothing is pending right now.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}
