//! Thumb Primitive - Pointer, touch, keyboard and focus handling for one thumb.
//!
//! A thumb turns raw interaction into slider engine calls and derives the
//! attributes a renderer needs to draw it. It holds no value of its own;
//! everything it shows is read from the [`SliderState`] on demand.
//!
//! # Features
//!
//! - Pointer and touch drags, paired with their release by pointer identity
//! - Arrow keys as one-step keyboard moves, shift for page steps
//! - PageUp / PageDown / Home / End as discrete commands
//! - Focus follows stack hand-off
//! - Native input change and form reset
//!
//! # Example
//!
//! ```ignore
//! use spark_slider::primitives::{slider_thumb, ThumbProps};
//!
//! let thumb = slider_thumb(ThumbProps::new(0), state.clone(), host.clone());
//!
//! thumb.pointer_down(&PointerDownEvent::primary(Some(1)));
//! thumb.move_start();
//! thumb.move_by(&MoveEvent::pointer(12.0, 0.0));
//! host.listeners().dispatch_release(&ReleaseEvent::new(Some(1)));
//!
//! let aria = thumb.aria();
//! println!("{}", aria.thumb.to_css());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::types::{
    InputAttributes, InputHost, LabelAttributes, SliderThumbAria, ThumbEdge, ThumbProps,
    ThumbStyle, ValidationState, join_ids,
};
use crate::state::listeners::ListenerHandle;
use crate::state::slider::SliderState;
use crate::state::snap::clamp;
use crate::types::{
    Cleanup, Direction, KeyboardEvent, Modifiers, MoveEvent, Orientation, PointerButton,
    PointerDownEvent, PointerId, PointerType, ReleaseEvent,
};

// =============================================================================
// Thumb Internals
// =============================================================================

struct ThumbInner {
    index: usize,
    props: ThumbProps,
    state: Rc<SliderState>,
    host: Rc<dyn InputHost>,
    /// Accumulated offset along the track, in track units. `None` until the
    /// first move of a gesture.
    current_position: Cell<Option<f64>>,
    /// Thumb this controller marked dragging.
    dragging_index: Cell<Option<usize>>,
    /// Identity captured at press; only its release ends the gesture.
    current_pointer: Cell<Option<PointerId>>,
    release_listener: RefCell<Option<ListenerHandle>>,
    reset_value: f64,
}

impl ThumbInner {
    /// Disabled by prop or by the slider. Keeps the engine's editability in step.
    fn refresh_disabled(&self) -> bool {
        let disabled = self.props.disabled.get() || self.state.is_disabled();
        self.state.set_thumb_editable(self.index, !disabled);
        disabled
    }

    fn orientation(&self) -> Orientation {
        self.props.orientation.unwrap_or_else(|| self.state.orientation())
    }

    fn input_id(&self) -> String {
        format!("{}-{}", self.state.slider_data().id, self.index)
    }

    /// Controlling thumb of a move: the focused one, else this one.
    fn control_index(&self) -> usize {
        self.state.focused_thumb().unwrap_or(self.index)
    }

    fn focus_input(&self) {
        if self.state.focused_thumb() == Some(self.index) {
            self.host.focus_input(&self.input_id());
        } else {
            // The focus subscription moves host focus.
            self.state.set_focused_thumb(Some(self.index));
        }
    }

    fn on_engine_focus(&self, focused: Option<usize>) {
        if focused == Some(self.index) {
            self.host.focus_input(&self.input_id());
        }
    }

    fn press(inner: &Rc<Self>, pointer_id: Option<PointerId>) {
        inner.focus_input();
        inner.current_pointer.set(pointer_id);

        let weak = Rc::downgrade(inner);
        let handle = inner.host.add_release_listener(Rc::new(move |event: &ReleaseEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.release(event);
            }
        }));
        // Replaces (and deregisters) a listener left by an unfinished gesture
        let previous = inner.release_listener.replace(Some(handle));
        drop(previous);

        log::debug!("thumb {}: press by pointer {:?}", inner.index, pointer_id);
    }

    fn release(&self, event: &ReleaseEvent) {
        if event.pointer_id != self.current_pointer.get() {
            return;
        }

        self.focus_input();
        if let Some(index) = self.dragging_index.take() {
            self.state.set_thumb_dragging(index, false);
        }
        self.current_pointer.set(None);

        let handle = self.release_listener.borrow_mut().take();
        if let Some(handle) = handle {
            handle.remove();
        }
        log::debug!("thumb {}: release by pointer {:?}", self.index, event.pointer_id);
    }

    fn move_start(&self) {
        if self.refresh_disabled() {
            return;
        }

        let control = self.control_index();
        self.current_position.set(None);
        if let Some(previous) = self.dragging_index.replace(Some(control)) {
            if previous != control {
                self.state.set_thumb_dragging(previous, false);
            }
        }
        self.state.set_thumb_dragging(control, true);
        log::debug!("thumb {}: move start on thumb {}", self.index, control);
    }

    fn move_by(&self, event: &MoveEvent) {
        if self.refresh_disabled() {
            return;
        }

        let state = &self.state;
        let control = self.control_index();

        // Focus may have been handed off mid-gesture
        if let Some(dragging) = self.dragging_index.get() {
            if dragging != control && state.is_thumb_dragging(dragging) {
                state.set_thumb_dragging(control, true);
                state.set_thumb_dragging(dragging, false);
                self.dragging_index.set(Some(control));
            }
        }

        let orientation = self.orientation();
        let reverse_x = self.host.direction() == Direction::Rtl;

        if event.pointer_type == PointerType::Keyboard {
            let decreasing = (event.delta_x > 0.0 && reverse_x)
                || (event.delta_x < 0.0 && !reverse_x)
                || event.delta_y > 0.0;
            let size = if event.modifiers.shift {
                state.page_size()
            } else {
                state.step()
            };
            if decreasing {
                state.decrement_thumb(control, Some(size));
            } else {
                state.increment_thumb(control, Some(size));
            }
            return;
        }

        let size = self.host.track_size().along(orientation);
        if size <= 0.0 {
            return;
        }

        let mut delta = if orientation.is_vertical() {
            event.delta_y
        } else {
            event.delta_x
        };
        if orientation.is_vertical() || reverse_x {
            delta = -delta;
        }

        let base = self
            .current_position
            .get()
            .unwrap_or_else(|| state.thumb_percent(control) * size);
        let position = base + delta;
        self.current_position.set(Some(position));
        state.set_thumb_percent(control, clamp(position / size, 0.0, 1.0));
    }

    fn move_end(&self, pointer_type: PointerType) {
        if let Some(index) = self.dragging_index.take() {
            self.state.set_thumb_dragging(index, false);
        }
        if pointer_type != PointerType::Keyboard {
            self.state.set_focused_thumb(None);
        }
        log::debug!("thumb {}: move end ({:?})", self.index, pointer_type);
    }

    fn key_command(&self, key: &str) {
        let state = &self.state;
        let index = self.index;

        state.set_thumb_dragging(index, true);
        match key {
            "PageUp" => state.increment_thumb(index, Some(state.page_size())),
            "PageDown" => state.decrement_thumb(index, Some(state.page_size())),
            "Home" => state.set_thumb_to_min(index),
            "End" => state.set_thumb_to_max(index),
            _ => {}
        }

        state.set_thumb_dragging(index, false);
        let focused = self.control_index();
        if focused != index {
            state.set_thumb_dragging(focused, false);
        }
    }

    fn keyboard_move(&self, delta_x: f64, delta_y: f64, modifiers: Modifiers) {
        self.move_start();
        self.move_by(&MoveEvent::keyboard(delta_x, delta_y, modifiers));
        self.move_end(PointerType::Keyboard);
    }
}

// =============================================================================
// Slider Thumb
// =============================================================================

/// Interaction controller for one thumb of a slider.
///
/// Dropping the thumb deregisters its focus subscription and any pending
/// release listener.
pub struct SliderThumb {
    inner: Rc<ThumbInner>,
    focus_cleanup: Option<Cleanup>,
}

/// Create a thumb controller for `props.index`.
pub fn slider_thumb(
    props: ThumbProps,
    state: Rc<SliderState>,
    host: Rc<dyn InputHost>,
) -> SliderThumb {
    SliderThumb::new(props, state, host)
}

impl SliderThumb {
    pub fn new(props: ThumbProps, state: Rc<SliderState>, host: Rc<dyn InputHost>) -> Self {
        let index = props.index;
        let inner = Rc::new(ThumbInner {
            index,
            reset_value: state.thumb_value(index),
            props,
            state,
            host,
            current_position: Cell::new(None),
            dragging_index: Cell::new(None),
            current_pointer: Cell::new(None),
            release_listener: RefCell::new(None),
        });
        inner.refresh_disabled();

        let weak = Rc::downgrade(&inner);
        let focus_cleanup = inner.state.on_focus_change(move |focused| {
            if let Some(inner) = weak.upgrade() {
                inner.on_engine_focus(focused);
            }
        });

        Self {
            inner,
            focus_cleanup: Some(focus_cleanup),
        }
    }

    pub fn index(&self) -> usize {
        self.inner.index
    }

    /// Id of the range input, derived from the slider id and thumb index.
    pub fn input_id(&self) -> String {
        self.inner.input_id()
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.refresh_disabled()
    }

    /// Value restored by [`form_reset`](Self::form_reset).
    pub fn reset_value(&self) -> f64 {
        self.inner.reset_value
    }

    // -------------------------------------------------------------------------
    // Press / release
    // -------------------------------------------------------------------------

    /// Primary-button press on the thumb. Presses with alt, ctrl or meta held
    /// are left to the host.
    pub fn pointer_down(&self, event: &PointerDownEvent) {
        if self.inner.refresh_disabled() {
            return;
        }
        if event.button != PointerButton::Primary || event.modifiers.has_command() {
            return;
        }
        ThumbInner::press(&self.inner, event.pointer_id);
    }

    /// Touch start; `identifier` is the first changed touch.
    pub fn touch_start(&self, identifier: PointerId) {
        if self.inner.refresh_disabled() {
            return;
        }
        ThumbInner::press(&self.inner, Some(identifier));
    }

    /// True between a press and its matching release.
    pub fn is_pressed(&self) -> bool {
        self.inner.release_listener.borrow().is_some()
    }

    // -------------------------------------------------------------------------
    // Move gesture
    // -------------------------------------------------------------------------

    pub fn move_start(&self) {
        self.inner.move_start();
    }

    pub fn move_by(&self, event: &MoveEvent) {
        self.inner.move_by(event);
    }

    pub fn move_end(&self, pointer_type: PointerType) {
        self.inner.move_end(pointer_type);
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Handle a key press. Returns true when the key was consumed.
    pub fn key_down(&self, event: &KeyboardEvent) -> bool {
        if !event.is_down() || self.inner.refresh_disabled() {
            return false;
        }

        match event.key.as_str() {
            "PageUp" | "PageDown" | "Home" | "End" => {
                self.inner.key_command(&event.key);
                true
            }
            "ArrowLeft" => {
                self.inner.keyboard_move(-1.0, 0.0, event.modifiers);
                true
            }
            "ArrowRight" => {
                self.inner.keyboard_move(1.0, 0.0, event.modifiers);
                true
            }
            "ArrowUp" => {
                self.inner.keyboard_move(0.0, -1.0, event.modifiers);
                true
            }
            "ArrowDown" => {
                self.inner.keyboard_move(0.0, 1.0, event.modifiers);
                true
            }
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focus(&self) {
        if self.inner.refresh_disabled() {
            return;
        }
        self.inner.state.set_focused_thumb(Some(self.inner.index));
    }

    /// Clears engine focus if it is on this thumb.
    pub fn blur(&self) {
        let state = &self.inner.state;
        if state.focused_thumb() == Some(self.inner.index) {
            state.set_focused_thumb(None);
        }
    }

    // -------------------------------------------------------------------------
    // Native input
    // -------------------------------------------------------------------------

    /// Value typed or stepped into the native range input.
    pub fn input_change(&self, raw: &str) {
        if self.inner.refresh_disabled() {
            return;
        }
        if let Ok(value) = raw.trim().parse::<f64>() {
            self.inner.state.set_thumb_value(self.inner.index, value);
        }
    }

    pub fn form_reset(&self) {
        self.inner
            .state
            .set_thumb_value(self.inner.index, self.inner.reset_value);
    }

    // -------------------------------------------------------------------------
    // Presentation
    // -------------------------------------------------------------------------

    pub fn aria(&self) -> SliderThumbAria {
        let inner = &self.inner;
        let state = &inner.state;
        let props = &inner.props;
        let index = inner.index;

        let is_disabled = inner.refresh_disabled();
        let orientation = inner.orientation();
        let rtl = inner.host.direction() == Direction::Rtl;

        let mut position = state.thumb_percent(index);
        if orientation.is_vertical() || rtl {
            position = 1.0 - position;
        }
        let edge = if orientation.is_vertical() {
            ThumbEdge::Top
        } else {
            ThumbEdge::Left
        };

        let data = state.slider_data();
        let input_id = inner.input_id();
        let label_id = props.label.as_ref().map(|_| format!("{input_id}-label"));
        let own_id = props.aria_label.as_ref().map(|_| input_id.as_str());
        let aria_labelledby = join_ids([
            own_id,
            label_id.as_deref(),
            Some(data.id.as_str()),
            props.aria_labelledby.as_deref(),
        ]);

        let is_invalid =
            props.is_invalid || props.validation_state == Some(ValidationState::Invalid);

        let input = InputAttributes {
            tab_index: if is_disabled { None } else { Some(0) },
            min: state.thumb_min(index),
            max: state.thumb_max(index),
            step: state.step(),
            value: state.thumb_value(index),
            name: props.name.clone(),
            disabled: is_disabled,
            aria_orientation: orientation,
            aria_valuetext: state.thumb_value_label(index),
            aria_required: props.is_required.then_some(true),
            aria_invalid: is_invalid.then_some(true),
            aria_errormessage: props.aria_errormessage.clone(),
            aria_describedby: join_ids([
                data.aria_describedby.as_deref(),
                props.aria_describedby.as_deref(),
            ]),
            aria_details: join_ids([data.aria_details.as_deref(), props.aria_details.as_deref()]),
            aria_label: props.aria_label.clone(),
            aria_labelledby,
            id: input_id.clone(),
        };

        let label = LabelAttributes {
            html_for: label_id.as_ref().map(|_| input_id),
            id: label_id,
        };

        SliderThumbAria {
            thumb: ThumbStyle { edge, position },
            input,
            label,
            is_dragging: state.is_thumb_dragging(index),
            is_focused: state.focused_thumb() == Some(index),
            is_disabled,
        }
    }
}

impl Drop for SliderThumb {
    fn drop(&mut self) {
        if let Some(cleanup) = self.focus_cleanup.take() {
            cleanup();
        }
        let handle = self.inner.release_listener.borrow_mut().take();
        drop(handle);
    }
}

// =============================================================================
// TESTS
// =============================================================================
