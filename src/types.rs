//! Core types for spark-slider.
//!
//! Orientation and direction, the value shape reported to listeners,
//! pointer/keyboard event types consumed by thumbs, and thumb flags.

use std::rc::Rc;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by registrations.
///
/// Call this to deregister exactly the handler it was returned for.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Orientation / Direction
// =============================================================================

/// Slider orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Value used for `aria-orientation`.
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }
}

/// Locale text direction. Flips horizontal movement and positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

// =============================================================================
// Slider Value
// =============================================================================

/// A slider value as configured or reported.
///
/// A slider configured with a single number reports single numbers;
/// one configured with a sequence reports sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum SliderValue {
    Single(f64),
    Multiple(Vec<f64>),
}

impl SliderValue {
    /// Thumb values in order.
    pub fn to_values(&self) -> Vec<f64> {
        match self {
            SliderValue::Single(v) => vec![*v],
            SliderValue::Multiple(values) => values.clone(),
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, SliderValue::Single(_))
    }

    /// Value of the first thumb, if any.
    pub fn first(&self) -> Option<f64> {
        match self {
            SliderValue::Single(v) => Some(*v),
            SliderValue::Multiple(values) => values.first().copied(),
        }
    }
}

impl From<f64> for SliderValue {
    fn from(value: f64) -> Self {
        SliderValue::Single(value)
    }
}

impl From<Vec<f64>> for SliderValue {
    fn from(values: Vec<f64>) -> Self {
        SliderValue::Multiple(values)
    }
}

impl<const N: usize> From<[f64; N]> for SliderValue {
    fn from(values: [f64; N]) -> Self {
        SliderValue::Multiple(values.to_vec())
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Value formatter used for labels and `aria-valuetext`. Never used for math.
pub type Formatter = Rc<dyn Fn(f64) -> String>;

/// Default number formatting: at most three fraction digits, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.3}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// The default [`Formatter`].
pub fn default_formatter() -> Formatter {
    Rc::new(format_number)
}

// =============================================================================
// Keyboard
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// True if alt, ctrl or meta is held. Such presses never start a drag.
    pub fn has_command(&self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "Home", "PageUp", "ArrowLeft")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press or auto-repeat.
    pub fn is_down(&self) -> bool {
        self.state != KeyState::Release
    }
}

// =============================================================================
// Pointer
// =============================================================================

/// Identity of a pointer or touch point, used to pair press and release.
pub type PointerId = u32;

/// What produced a move gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
    Keyboard,
    Virtual,
}

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

/// A pointer press on a thumb.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDownEvent {
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// `None` for legacy mouse input that carries no pointer identity.
    pub pointer_id: Option<PointerId>,
}

impl PointerDownEvent {
    /// Primary-button press with the given identity.
    pub fn primary(pointer_id: Option<PointerId>) -> Self {
        Self {
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
            pointer_id,
        }
    }
}

/// Release of a pointer or touch point anywhere in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleaseEvent {
    pub pointer_id: Option<PointerId>,
}

impl ReleaseEvent {
    pub fn new(pointer_id: Option<PointerId>) -> Self {
        Self { pointer_id }
    }
}

/// A movement step of an ongoing move gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveEvent {
    pub delta_x: f64,
    pub delta_y: f64,
    pub pointer_type: PointerType,
    pub modifiers: Modifiers,
}

impl MoveEvent {
    /// Pointer movement by the given deltas (in track units, e.g. pixels or cells).
    pub fn pointer(delta_x: f64, delta_y: f64) -> Self {
        Self {
            delta_x,
            delta_y,
            pointer_type: PointerType::Mouse,
            modifiers: Modifiers::default(),
        }
    }

    /// Keyboard-simulated movement (arrow keys).
    pub fn keyboard(delta_x: f64, delta_y: f64, modifiers: Modifiers) -> Self {
        Self {
            delta_x,
            delta_y,
            pointer_type: PointerType::Keyboard,
            modifiers,
        }
    }

    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }
}

// =============================================================================
// Thumb Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Interaction flags of a thumb, for renderers that style by state.
    ///
    /// Combine with bitwise OR: `ThumbFlags::DRAGGING | ThumbFlags::FOCUSED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ThumbFlags: u8 {
        const NONE = 0;
        const DRAGGING = 1 << 0;
        const FOCUSED = 1 << 1;
        const DISABLED = 1 << 2;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.23456), "1.235");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(-12.5), "-12.5");
    }

    #[test]
    fn test_slider_value_shapes() {
        assert_eq!(SliderValue::from(3.0).to_values(), vec![3.0]);
        assert!(SliderValue::from(3.0).is_single());
        assert_eq!(SliderValue::from([1.0, 2.0]).first(), Some(1.0));
        assert_eq!(SliderValue::Multiple(Vec::new()).first(), None);
    }

    #[test]
    fn test_thumb_flags() {
        let flags = ThumbFlags::DRAGGING | ThumbFlags::FOCUSED;
        assert!(flags.contains(ThumbFlags::DRAGGING));
        assert!(!flags.contains(ThumbFlags::DISABLED));
    }

    #[test]
    fn test_modifiers_command() {
        assert!(!Modifiers::shift().has_command());
        assert!(Modifiers::ctrl().has_command());
    }
}
