//! Input Module - Terminal event conversion, polling and slider routing
//!
//! Bridges crossterm's event system with slider thumbs. A [`TerminalHost`]
//! provides what thumbs need from a UI layer (track size, direction, input
//! focus, release listeners) for a track laid out in terminal cells, and a
//! [`TerminalSlider`] routes converted events to its thumbs.
//!
//! # API
//!
//! - `convert_mouse_event` - Convert crossterm MouseEvent to a TerminalMouseEvent
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `TerminalSlider::handle_event` - Dispatch an event to the slider's thumbs
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_slider::state::input::{poll_event, TerminalHost, TerminalSlider, TrackRect};
//! use std::time::Duration;
//!
//! let host = Rc::new(TerminalHost::new(TrackRect::horizontal(2, 1, 40)));
//! let slider = TerminalSlider::new(state, host);
//!
//! // Event loop
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         slider.handle_event(&event);
//!     }
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::io::stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
    MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
    poll, read,
    EnableMouseCapture, DisableMouseCapture,
};
use crossterm::execute;

use super::listeners::{GlobalListeners, ListenerHandle, ReleaseListener};
use super::slider::SliderState;
use crate::primitives::thumb::SliderThumb;
use crate::primitives::types::{InputHost, ThumbProps, TrackSize};
use crate::types::{
    Direction, KeyState, KeyboardEvent, Modifiers, MoveEvent, Orientation, PointerButton,
    PointerDownEvent, PointerId, PointerType, ReleaseEvent,
};

/// Pointer identity of the terminal mouse. A terminal has exactly one.
pub const MOUSE_POINTER_ID: PointerId = 1;

// =============================================================================
// MOUSE EVENT
// =============================================================================

/// Mouse action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Drag,
    Move,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    #[default]
    None,
}

/// Mouse event in terminal cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalMouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl TerminalMouseEvent {
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }
}

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified terminal event
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Mouse event (click, drag, move, etc.)
    Mouse(TerminalMouseEvent),
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to a TerminalMouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> TerminalMouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    TerminalMouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    }
}

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent.
///
/// Only keys a slider routes get a name: arrows, Home/End, PageUp/PageDown,
/// Tab (BackTab becomes shift+Tab), Escape and characters.
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let mut modifiers = convert_modifiers(event.modifiers);
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => {
            modifiers.shift = true;
            "Tab".to_string()
        }
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        // Keys no thumb handles
        _ => String::new(),
    };

    let state = match event.kind {
        crossterm::event::KeyEventKind::Press => KeyState::Press,
        crossterm::event::KeyEventKind::Repeat => KeyState::Repeat,
        crossterm::event::KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers,
        state,
    }
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: false, // Not exposed by crossterm
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Mouse(mouse) => Ok(InputEvent::Mouse(convert_mouse_event(mouse))),
        CrosstermEvent::Key(key) => Ok(InputEvent::Key(convert_key_event(key))),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TERMINAL HOST
// =============================================================================

/// Cells occupied by a slider track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl TrackRect {
    /// One-row track starting at `(x, y)`.
    pub fn horizontal(x: u16, y: u16, width: u16) -> Self {
        Self { x, y, width, height: 1 }
    }

    /// One-column track starting at `(x, y)`.
    pub fn vertical(x: u16, y: u16, height: u16) -> Self {
        Self { x, y, width: 1, height }
    }

    /// Cell at `position` (0..=1) along the track, measured from the left or top.
    pub fn cell_at(&self, orientation: Orientation, position: f64) -> (u16, u16) {
        let offset = |span: u16| (position * f64::from(span.saturating_sub(1))).round() as u16;
        match orientation {
            Orientation::Horizontal => (self.x.saturating_add(offset(self.width)), self.y),
            Orientation::Vertical => (self.x, self.y.saturating_add(offset(self.height))),
        }
    }

    /// Cells from the left or top of the track to `(x, y)`, or None outside it.
    pub fn offset_of(&self, orientation: Orientation, x: u16, y: u16) -> Option<u16> {
        let inside = (self.x..self.x.saturating_add(self.width)).contains(&x)
            && (self.y..self.y.saturating_add(self.height)).contains(&y);
        if !inside {
            return None;
        }
        Some(match orientation {
            Orientation::Horizontal => x - self.x,
            Orientation::Vertical => y - self.y,
        })
    }
}

/// [`InputHost`] for a slider drawn in a terminal.
///
/// Move deltas are whole cells; the track size is the distance between the
/// first and last cell of the track.
pub struct TerminalHost {
    listeners: GlobalListeners,
    direction: Cell<Direction>,
    track: Cell<TrackRect>,
    focused_input: RefCell<Option<String>>,
}

impl TerminalHost {
    pub fn new(track: TrackRect) -> Self {
        Self {
            listeners: GlobalListeners::new(),
            direction: Cell::new(Direction::Ltr),
            track: Cell::new(track),
            focused_input: RefCell::new(None),
        }
    }

    pub fn listeners(&self) -> &GlobalListeners {
        &self.listeners
    }

    pub fn track(&self) -> TrackRect {
        self.track.get()
    }

    /// Update after a relayout.
    pub fn set_track(&self, track: TrackRect) {
        self.track.set(track);
    }

    pub fn set_direction(&self, direction: Direction) {
        self.direction.set(direction);
    }

    /// Id of the input last asked to take focus.
    pub fn focused_input(&self) -> Option<String> {
        self.focused_input.borrow().clone()
    }
}

impl InputHost for TerminalHost {
    fn focus_input(&self, input_id: &str) {
        log::trace!("terminal host: focus {}", input_id);
        *self.focused_input.borrow_mut() = Some(input_id.to_string());
    }

    fn direction(&self) -> Direction {
        self.direction.get()
    }

    fn track_size(&self) -> TrackSize {
        let track = self.track.get();
        TrackSize::new(
            f64::from(track.width.saturating_sub(1)),
            f64::from(track.height.saturating_sub(1)),
        )
    }

    fn add_release_listener(&self, listener: ReleaseListener) -> ListenerHandle {
        self.listeners.add_release_listener(listener)
    }
}

// =============================================================================
// TERMINAL SLIDER
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct DragSession {
    thumb: usize,
    x: u16,
    y: u16,
}

/// A slider with one thumb per value, driven by terminal events.
pub struct TerminalSlider {
    state: Rc<SliderState>,
    host: Rc<TerminalHost>,
    thumbs: Vec<SliderThumb>,
    drag: Cell<Option<DragSession>>,
}

impl TerminalSlider {
    /// One thumb per slider value, with default props.
    pub fn new(state: Rc<SliderState>, host: Rc<TerminalHost>) -> Self {
        let props = (0..state.thumb_count()).map(ThumbProps::new).collect();
        Self::with_props(state, host, props)
    }

    pub fn with_props(state: Rc<SliderState>, host: Rc<TerminalHost>, props: Vec<ThumbProps>) -> Self {
        let thumbs = props
            .into_iter()
            .map(|props| {
                let input_host: Rc<dyn InputHost> = host.clone();
                SliderThumb::new(props, state.clone(), input_host)
            })
            .collect();

        Self {
            state,
            host,
            thumbs,
            drag: Cell::new(None),
        }
    }

    pub fn state(&self) -> &Rc<SliderState> {
        &self.state
    }

    pub fn host(&self) -> &Rc<TerminalHost> {
        &self.host
    }

    pub fn thumbs(&self) -> &[SliderThumb] {
        &self.thumbs
    }

    /// Cell a thumb is drawn in.
    pub fn thumb_cell(&self, slot: usize) -> Option<(u16, u16)> {
        let thumb = self.thumbs.get(slot)?;
        let aria = thumb.aria();
        Some(
            self.host
                .track()
                .cell_at(aria.input.aria_orientation, aria.thumb.position),
        )
    }

    /// Thumb drawn at a cell. Of stacked thumbs the focused one wins.
    pub fn thumb_at(&self, x: u16, y: u16) -> Option<usize> {
        let hits: Vec<usize> = (0..self.thumbs.len())
            .filter(|&slot| self.thumb_cell(slot) == Some((x, y)))
            .collect();
        let focused = self.state.focused_thumb();
        hits.iter()
            .copied()
            .find(|&slot| Some(self.thumbs[slot].index()) == focused)
            .or_else(|| hits.first().copied())
    }

    /// Route an event to the thumbs.
    /// Returns true if a thumb consumed the event.
    pub fn handle_event(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Resize(_, _) | InputEvent::None => false,
        }
    }

    fn handle_mouse(&self, event: &TerminalMouseEvent) -> bool {
        match (event.action, event.button) {
            (MouseAction::Down, MouseButton::Left) => match self.thumb_at(event.x, event.y) {
                Some(slot) => self.start_drag(slot, event),
                None => self.press_track(event),
            },
            (MouseAction::Drag, MouseButton::Left) => {
                let Some(session) = self.drag.get() else {
                    return false;
                };
                let delta_x = f64::from(event.x) - f64::from(session.x);
                let delta_y = f64::from(event.y) - f64::from(session.y);
                let mut movement = MoveEvent::pointer(delta_x, delta_y);
                movement.modifiers = event.modifiers;
                self.thumbs[session.thumb].move_by(&movement);
                self.drag.set(Some(DragSession {
                    x: event.x,
                    y: event.y,
                    ..session
                }));
                true
            }
            (MouseAction::Up, MouseButton::Left) => {
                let Some(session) = self.drag.take() else {
                    return false;
                };
                self.thumbs[session.thumb].move_end(PointerType::Mouse);
                self.host
                    .listeners()
                    .dispatch_release(&ReleaseEvent::new(Some(MOUSE_POINTER_ID)));
                true
            }
            _ => false,
        }
    }

    /// Press a thumb and start dragging it from the event's cell.
    fn start_drag(&self, slot: usize, event: &TerminalMouseEvent) -> bool {
        let thumb = &self.thumbs[slot];
        thumb.pointer_down(&PointerDownEvent {
            button: PointerButton::Primary,
            modifiers: event.modifiers,
            pointer_id: Some(MOUSE_POINTER_ID),
        });
        if !thumb.is_pressed() {
            return false;
        }
        thumb.move_start();
        self.drag.set(Some(DragSession {
            thumb: slot,
            x: event.x,
            y: event.y,
        }));
        true
    }

    /// Jump the closest thumb to a pressed track cell, then drag it.
    fn press_track(&self, event: &TerminalMouseEvent) -> bool {
        let orientation = self.state.orientation();
        let Some(offset) = self.host.track().offset_of(orientation, event.x, event.y) else {
            return false;
        };
        let span = self.host.track_size().along(orientation);
        let mut percent = if span > 0.0 { f64::from(offset) / span } else { 0.0 };
        if orientation.is_vertical() || self.host.direction() == Direction::Rtl {
            percent = 1.0 - percent;
        }

        let value = self.state.percent_value(percent);
        let Some(index) = self.state.closest_thumb(value) else {
            return false;
        };
        let Some(slot) = self.thumbs.iter().position(|thumb| thumb.index() == index) else {
            return false;
        };
        if !self.start_drag(slot, event) {
            return false;
        }

        log::debug!("terminal slider: track press at {} moves thumb {}", value, index);
        self.state.set_thumb_percent(index, percent);
        true
    }

    fn handle_key(&self, event: &KeyboardEvent) -> bool {
        if event.key == "Tab" {
            if !event.is_down() {
                return false;
            }
            return self.cycle_focus(event.modifiers.shift);
        }

        let focused = self.state.focused_thumb();
        match self.thumbs.iter().find(|thumb| Some(thumb.index()) == focused) {
            Some(thumb) => thumb.key_down(event),
            None => false,
        }
    }

    /// Move focus to the next (or previous) enabled thumb, wrapping around.
    fn cycle_focus(&self, backward: bool) -> bool {
        let count = self.thumbs.len();
        if count == 0 {
            return false;
        }

        let focused = self.state.focused_thumb();
        let current = self.thumbs.iter().position(|thumb| Some(thumb.index()) == focused);
        for step in 1..=count {
            let slot = match (current, backward) {
                (Some(current), false) => (current + step) % count,
                (Some(current), true) => (current + count * step - step) % count,
                (None, false) => step - 1,
                (None, true) => count - step,
            };
            let thumb = &self.thumbs[slot];
            if !thumb.is_disabled() {
                thumb.focus();
                return true;
            }
        }
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================
