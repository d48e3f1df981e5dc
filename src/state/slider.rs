//! Slider State - Values, drag flags, focus and editability of every thumb
//!
//! The headless engine behind a slider. Owns thumb values and all the
//! clamping, snapping and stacking rules; thumbs and renderers only read it
//! and call its mutation methods.
//!
//! - `values` signal (one value per thumb, always ordered and on the grid)
//! - Per-thumb dragging flags with an end-of-change notification
//! - Focused thumb, moved by stack hand-off
//! - Change / change-end / focus notifications with cleanup functions
//!
//! # Stacked thumbs
//!
//! Thumbs holding equal values are stacked. A thumb's legal range is bounded
//! by its neighbors, so a stacked thumb cannot move past its stack mate.
//! When an update overshoots the targeted thumb's range toward a stack mate,
//! control is handed to the outermost stacked thumb on that side and focus
//! follows it.
//!
//! A repeated update is a no-op only while no hand-off happens. On a stacked
//! `[50, 50]`, `set_thumb_value(0, 55.0)` hands off and yields `[50, 55]`;
//! calling it again targets thumb 0, whose range now reaches 55, and yields
//! `[55, 55]`. Each call notifies once.
//!
//! # Example
//!
//! ```ignore
//! use spark_slider::state::{SliderConfig, SliderState};
//!
//! let state = SliderState::new(SliderConfig::default().default_value([20.0, 80.0]))?;
//!
//! let cleanup = state.on_change_end(|value| println!("committed {:?}", value));
//!
//! state.set_thumb_dragging(0, true);
//! state.set_thumb_value(0, 35.0);
//! state.set_thumb_dragging(0, false); // prints "committed Multiple([35.0, 80.0])"
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use super::config::{SliderConfig, SliderConfigError};
use super::snap::{
    page_size, percent_to_value, restrict_values, snap_value_to_step, stacked_pairs,
    value_to_percent,
};
use crate::types::{Cleanup, Formatter, Orientation, SliderValue};

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// Handler for value notifications.
pub type ValueHandler = Rc<dyn Fn(&SliderValue)>;

/// Handler for focus changes. Receives the newly focused thumb.
pub type FocusHandler = Rc<dyn Fn(Option<usize>)>;

struct HandlerRegistry {
    change: Vec<(usize, ValueHandler)>,
    change_end: Vec<(usize, ValueHandler)>,
    focus: Vec<(usize, FocusHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            change: Vec::new(),
            change_end: Vec::new(),
            focus: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Clone, Copy)]
enum HandlerKind {
    Change,
    ChangeEnd,
    Focus,
}

fn remove_handler(registry: &Weak<RefCell<HandlerRegistry>>, kind: HandlerKind, id: usize) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    let mut reg = registry.borrow_mut();
    match kind {
        HandlerKind::Change => reg.change.retain(|(handler_id, _)| *handler_id != id),
        HandlerKind::ChangeEnd => reg.change_end.retain(|(handler_id, _)| *handler_id != id),
        HandlerKind::Focus => reg.focus.retain(|(handler_id, _)| *handler_id != id),
    }
}

// =============================================================================
// SLIDER DATA
// =============================================================================

/// Slider-level element data every thumb refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderData {
    pub id: String,
    pub aria_describedby: Option<String>,
    pub aria_details: Option<String>,
}

// =============================================================================
// SLIDER STATE
// =============================================================================

/// State of one slider widget.
pub struct SliderState {
    min_value: f64,
    max_value: f64,
    step: f64,
    page_size: f64,
    orientation: Orientation,
    is_disabled: bool,
    single: bool,
    formatter: Formatter,
    data: SliderData,
    values: Signal<Vec<f64>>,
    dragging: Signal<Vec<bool>>,
    focused: Signal<Option<usize>>,
    editable: RefCell<Vec<bool>>,
    handlers: Rc<RefCell<HandlerRegistry>>,
}

impl SliderState {
    /// Build the state for a slider. Fails only on an invalid configuration.
    pub fn new(config: SliderConfig) -> Result<Self, SliderConfigError> {
        config.validate()?;

        let initial = config.initial_value();
        let values = restrict_values(
            &initial.to_values(),
            config.min_value,
            config.max_value,
            config.step,
        );
        let count = values.len();

        log::debug!(
            "slider {}: {} thumb(s) in [{}, {}] step {}",
            config.id,
            count,
            config.min_value,
            config.max_value,
            config.step
        );

        Ok(Self {
            min_value: config.min_value,
            max_value: config.max_value,
            step: config.step,
            page_size: page_size(config.min_value, config.max_value, config.step),
            orientation: config.orientation,
            is_disabled: config.is_disabled,
            single: initial.is_single(),
            formatter: config.formatter,
            data: SliderData {
                id: config.id,
                aria_describedby: config.aria_describedby,
                aria_details: config.aria_details,
            },
            values: signal(values),
            dragging: signal(vec![false; count]),
            focused: signal(None),
            editable: RefCell::new(vec![true; count]),
            handlers: Rc::new(RefCell::new(HandlerRegistry::new())),
        })
    }

    // -------------------------------------------------------------------------
    // Configuration accessors
    // -------------------------------------------------------------------------

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Larger increment for PageUp/PageDown and shift-arrows.
    pub fn page_size(&self) -> f64 {
        self.page_size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    pub fn slider_data(&self) -> &SliderData {
        &self.data
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Current values by thumb index.
    pub fn values(&self) -> Vec<f64> {
        self.values.get()
    }

    /// The reactive values cell, for renderers that bind to it.
    pub fn values_signal(&self) -> Signal<Vec<f64>> {
        self.values.clone()
    }

    pub fn thumb_count(&self) -> usize {
        self.values.get().len()
    }

    /// Value of a thumb. A missing index reads as the slider minimum.
    pub fn thumb_value(&self, index: usize) -> f64 {
        self.values.get().get(index).copied().unwrap_or(self.min_value)
    }

    /// Lowest value the thumb may take: the previous thumb's value, or the slider min.
    pub fn thumb_min(&self, index: usize) -> f64 {
        thumb_min_in(&self.values.get(), index, self.min_value)
    }

    /// Highest value the thumb may take: the next thumb's value, or the slider max.
    pub fn thumb_max(&self, index: usize) -> f64 {
        thumb_max_in(&self.values.get(), index, self.max_value)
    }

    /// Set a thumb's value, snapped to the step inside the thumb's range.
    ///
    /// May hand control to a stacked neighbor (see module docs). Ignored when
    /// the slider is disabled or the thumb is not editable.
    pub fn set_thumb_value(&self, index: usize, value: f64) {
        let mut values = self.values.get();
        if self.apply_value(&mut values, index, value) {
            self.commit(values);
        }
    }

    /// Set a thumb by a fraction (0..=1) of the track.
    pub fn set_thumb_percent(&self, index: usize, percent: f64) {
        self.set_thumb_value(index, self.percent_value(percent));
    }

    /// Move a thumb up by `max(step_size, step)`; `None` means one step.
    pub fn increment_thumb(&self, index: usize, step_size: Option<f64>) {
        let amount = step_size.unwrap_or(self.step).max(self.step);
        let target = snap_value_to_step(
            self.thumb_value(index) + amount,
            self.min_value,
            self.max_value,
            self.step,
        );
        self.set_thumb_value(index, target);
    }

    /// Move a thumb down by `max(step_size, step)`; `None` means one step.
    pub fn decrement_thumb(&self, index: usize, step_size: Option<f64>) {
        let amount = step_size.unwrap_or(self.step).max(self.step);
        let target = snap_value_to_step(
            self.thumb_value(index) - amount,
            self.min_value,
            self.max_value,
            self.step,
        );
        self.set_thumb_value(index, target);
    }

    /// Push a thumb to the slider minimum.
    ///
    /// Thumbs below it are in the way and go to the minimum too, as does
    /// every thumb stacked with it, so grabbing any handle of a collapsed
    /// stack moves the whole stack to the edge.
    pub fn set_thumb_to_min(&self, index: usize) {
        let mut values = self.values.get();
        if index >= values.len() {
            return;
        }
        let top = stack_end(&values, index);

        let mut changed = false;
        for i in 0..=top {
            changed |= self.write_snapped(&mut values, i, self.min_value);
        }
        if changed {
            self.commit(values);
        }
    }

    /// Push a thumb to the slider maximum. Mirror of [`Self::set_thumb_to_min`].
    pub fn set_thumb_to_max(&self, index: usize) {
        let mut values = self.values.get();
        if index >= values.len() {
            return;
        }
        let bottom = stack_start(&values, index);

        let mut changed = false;
        for i in (bottom..values.len()).rev() {
            changed |= self.write_snapped(&mut values, i, self.max_value);
        }
        if changed {
            self.commit(values);
        }
    }

    /// Push an externally controlled value into the state.
    ///
    /// The value is restricted like an initial value and committed without a
    /// change notification; the thumb count must match.
    pub fn sync_values(&self, value: impl Into<SliderValue>) {
        let raw = value.into().to_values();
        if raw.len() != self.thumb_count() {
            log::debug!(
                "slider {}: ignoring synced value with {} thumb(s), expected {}",
                self.data.id,
                raw.len(),
                self.thumb_count()
            );
            return;
        }
        let restricted = restrict_values(&raw, self.min_value, self.max_value, self.step);
        if restricted != self.values.get() {
            self.values.set(restricted);
        }
    }

    // -------------------------------------------------------------------------
    // Percent mapping and labels
    // -------------------------------------------------------------------------

    /// Thumb position as a fraction of the track (0..=1), before any inversion.
    pub fn thumb_percent(&self, index: usize) -> f64 {
        self.value_percent(self.thumb_value(index))
    }

    pub fn value_percent(&self, value: f64) -> f64 {
        value_to_percent(value, self.min_value, self.max_value)
    }

    /// Value at a fraction of the track, rounded to the nearest step.
    ///
    /// This is lossy: `thumb_percent` after `set_thumb_percent(i, p)` returns
    /// the fraction of the nearest step, not `p`.
    pub fn percent_value(&self, percent: f64) -> f64 {
        percent_to_value(percent, self.min_value, self.max_value, self.step)
    }

    /// Editable thumb nearest to `value`, the one a track press moves.
    ///
    /// Ties go to the focused thumb, then to the thumb that can move toward
    /// `value`: the last of a run when `value` lies above it, the first
    /// otherwise.
    pub fn closest_thumb(&self, value: f64) -> Option<usize> {
        let values = self.values.get();
        let distance = |i: usize| (values[i] - value).abs();
        let candidates: Vec<usize> = (0..values.len())
            .filter(|&i| self.is_thumb_editable(i))
            .collect();
        let nearest = candidates
            .iter()
            .map(|&i| distance(i))
            .fold(f64::INFINITY, f64::min);
        let ties: Vec<usize> = candidates
            .into_iter()
            .filter(|&i| distance(i) == nearest)
            .collect();

        let focused = self.focused.get();
        if let Some(index) = ties.iter().copied().find(|&i| Some(i) == focused) {
            return Some(index);
        }
        match ties.first() {
            Some(&first) if value >= values[first] => ties.last().copied(),
            first => first.copied(),
        }
    }

    pub fn thumb_value_label(&self, index: usize) -> String {
        self.formatted_value(self.thumb_value(index))
    }

    pub fn formatted_value(&self, value: f64) -> String {
        (self.formatter)(value)
    }

    // -------------------------------------------------------------------------
    // Dragging
    // -------------------------------------------------------------------------

    pub fn is_thumb_dragging(&self, index: usize) -> bool {
        self.dragging.get().get(index).copied().unwrap_or(false)
    }

    /// True while any thumb is dragging.
    pub fn is_dragging(&self) -> bool {
        self.dragging.get().iter().any(|d| *d)
    }

    /// Mark a thumb as dragging or not.
    ///
    /// When the last dragging thumb stops, change-end handlers receive the
    /// committed values. Disabled or non-editable thumbs cannot start
    /// dragging, but a flag set before the thumb was disabled can always be
    /// cleared.
    pub fn set_thumb_dragging(&self, index: usize, dragging: bool) {
        if dragging && (self.is_disabled || !self.is_thumb_editable(index)) {
            return;
        }

        let mut flags = self.dragging.get();
        let Some(flag) = flags.get_mut(index) else {
            return;
        };
        let was_dragging = *flag;
        if was_dragging == dragging {
            return;
        }
        *flag = dragging;
        let any_dragging = flags.iter().any(|d| *d);
        self.dragging.set(flags);

        if was_dragging && !any_dragging {
            let value = self.slider_value(&self.values.get());
            log::trace!("slider {}: change end {:?}", self.data.id, value);
            self.emit_change_end(&value);
        }
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focused_thumb(&self) -> Option<usize> {
        self.focused.get()
    }

    /// Focus a thumb (or none). Focus handlers fire only on change.
    pub fn set_focused_thumb(&self, index: Option<usize>) {
        if self.focused.get() == index {
            return;
        }
        self.focused.set(index);
        self.emit_focus(index);
    }

    // -------------------------------------------------------------------------
    // Editability
    // -------------------------------------------------------------------------

    pub fn is_thumb_editable(&self, index: usize) -> bool {
        self.editable.borrow().get(index).copied().unwrap_or(false)
    }

    pub fn set_thumb_editable(&self, index: usize, editable: bool) {
        if let Some(flag) = self.editable.borrow_mut().get_mut(index) {
            *flag = editable;
        }
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Called after every committed value change. Returns cleanup function.
    pub fn on_change<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&SliderValue) + 'static,
    {
        let id = {
            let mut reg = self.handlers.borrow_mut();
            let id = reg.next_id();
            reg.change.push((id, Rc::new(handler)));
            id
        };
        self.cleanup_for(HandlerKind::Change, id)
    }

    /// Called when the last dragging thumb is released. Returns cleanup function.
    pub fn on_change_end<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&SliderValue) + 'static,
    {
        let id = {
            let mut reg = self.handlers.borrow_mut();
            let id = reg.next_id();
            reg.change_end.push((id, Rc::new(handler)));
            id
        };
        self.cleanup_for(HandlerKind::ChangeEnd, id)
    }

    /// Called when the focused thumb changes. Returns cleanup function.
    pub fn on_focus_change<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(Option<usize>) + 'static,
    {
        let id = {
            let mut reg = self.handlers.borrow_mut();
            let id = reg.next_id();
            reg.focus.push((id, Rc::new(handler)));
            id
        };
        self.cleanup_for(HandlerKind::Focus, id)
    }

    fn cleanup_for(&self, kind: HandlerKind, id: usize) -> Cleanup {
        let registry = Rc::downgrade(&self.handlers);
        Box::new(move || remove_handler(&registry, kind, id))
    }

    // Handlers are cloned out before running so they may register or
    // deregister handlers themselves.

    fn emit_change(&self, value: &SliderValue) {
        let handlers: Vec<ValueHandler> =
            self.handlers.borrow().change.iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(value);
        }
    }

    fn emit_change_end(&self, value: &SliderValue) {
        let handlers: Vec<ValueHandler> =
            self.handlers.borrow().change_end.iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(value);
        }
    }

    fn emit_focus(&self, index: Option<usize>) {
        let handlers: Vec<FocusHandler> =
            self.handlers.borrow().focus.iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(index);
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Shape values the way the slider was configured.
    fn slider_value(&self, values: &[f64]) -> SliderValue {
        if self.single {
            SliderValue::Single(values.first().copied().unwrap_or(self.min_value))
        } else {
            SliderValue::Multiple(values.to_vec())
        }
    }

    fn commit(&self, values: Vec<f64>) {
        if values == self.values.get() {
            return;
        }
        let value = self.slider_value(&values);
        log::trace!("slider {}: values {:?}", self.data.id, values);
        self.values.set(values);
        self.emit_change(&value);
    }

    /// Apply an update to the working values, with stack hand-off.
    /// Returns true if the working values changed.
    fn apply_value(&self, values: &mut [f64], index: usize, value: f64) -> bool {
        if self.is_disabled || !self.is_thumb_editable(index) || !value.is_finite() {
            return false;
        }

        let mut control = index;
        if let Some(target) = self.hand_off_target(values, index, value) {
            if !self.is_thumb_editable(target) {
                return false;
            }
            log::debug!(
                "slider {}: hand-off from thumb {} to stacked thumb {}",
                self.data.id,
                index,
                target
            );
            control = target;
            self.set_focused_thumb(Some(target));
        }

        self.write_snapped(values, control, value)
    }

    /// The stacked thumb that should take an update the targeted thumb cannot accept.
    ///
    /// Walks from `index` through the stacked run toward the overshoot until
    /// a thumb's range accepts the value or the run ends. The focused thumb
    /// is never taken over from another thumb.
    fn hand_off_target(&self, values: &[f64], index: usize, value: f64) -> Option<usize> {
        let min = thumb_min_in(values, index, self.min_value);
        let max = thumb_max_in(values, index, self.max_value);
        if value >= min && value <= max {
            return None;
        }

        let stacked = stacked_pairs(values);
        if stacked.is_empty() {
            return None;
        }

        let mut target = index;
        if value > max {
            while stacked.contains(&(target, target + 1))
                && value > thumb_max_in(values, target, self.max_value)
            {
                target += 1;
            }
        } else {
            while target > 0
                && stacked.contains(&(target - 1, target))
                && value < thumb_min_in(values, target, self.min_value)
            {
                target -= 1;
            }
        }

        let focused = self.focused.get();
        if target == index || (focused == Some(target) && focused != Some(index)) {
            return None;
        }
        Some(target)
    }

    /// Snap `value` into thumb `index`'s current range and write it.
    /// Returns true if the working values changed.
    fn write_snapped(&self, values: &mut [f64], index: usize, value: f64) -> bool {
        if self.is_disabled || !self.is_thumb_editable(index) || index >= values.len() {
            return false;
        }
        let min = thumb_min_in(values, index, self.min_value);
        let max = thumb_max_in(values, index, self.max_value);
        let snapped = snap_value_to_step(value, min, max, self.step);
        if values[index] == snapped {
            return false;
        }
        values[index] = snapped;
        true
    }
}

// =============================================================================
// RANGE HELPERS
// =============================================================================

fn thumb_min_in(values: &[f64], index: usize, min_value: f64) -> f64 {
    if index == 0 {
        min_value
    } else {
        values.get(index - 1).copied().unwrap_or(min_value)
    }
}

fn thumb_max_in(values: &[f64], index: usize, max_value: f64) -> f64 {
    values.get(index + 1).copied().unwrap_or(max_value)
}

/// Last index of the stacked run that starts at or passes through `index`.
fn stack_end(values: &[f64], index: usize) -> usize {
    let mut end = index;
    while end + 1 < values.len() && values[end + 1] == values[index] {
        end += 1;
    }
    end
}

/// First index of the stacked run that ends at or passes through `index`.
fn stack_start(values: &[f64], index: usize) -> usize {
    let mut start = index;
    while start > 0 && values[start - 1] == values[index] {
        start -= 1;
    }
    start
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn slider(values: &[f64]) -> SliderState {
        SliderState::new(SliderConfig::default().default_value(values.to_vec()))
            .expect("valid config")
    }

    fn change_counter(state: &SliderState) -> (Rc<Cell<usize>>, Cleanup) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = state.on_change(move |_| count_clone.set(count_clone.get() + 1));
        (count, cleanup)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn test_initial_values_are_restricted() {
        let state = SliderState::new(
            SliderConfig::default().step(5.0).default_value([62.0, 12.0, 300.0]),
        )
        .expect("valid config");
        assert_eq!(state.values(), vec![60.0, 60.0, 100.0]);
    }

    #[test]
    fn test_default_value_is_min() {
        let state = SliderState::new(SliderConfig::default().range(-10.0, 10.0))
            .expect("valid config");
        assert_eq!(state.values(), vec![-10.0]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = SliderState::new(SliderConfig::default().range(5.0, 1.0));
        assert!(matches!(result, Err(SliderConfigError::EmptyRange { .. })));
    }

    #[test]
    fn test_page_size_derivation() {
        let state = SliderState::new(SliderConfig::default().range(0.0, 1000.0).step(100.0))
            .expect("valid config");
        assert_eq!(state.page_size(), 100.0);

        let state = slider(&[0.0]);
        assert_eq!(state.page_size(), 10.0);
    }

    // -------------------------------------------------------------------------
    // set_thumb_value
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_value_snaps_and_clamps() {
        let state = SliderState::new(SliderConfig::default().step(5.0).default_value([20.0, 80.0]))
            .expect("valid config");

        state.set_thumb_value(0, 33.0);
        assert_eq!(state.thumb_value(0), 35.0);

        // Clamped against the next thumb
        state.set_thumb_value(0, 95.0);
        assert_eq!(state.thumb_value(0), 80.0);

        // Clamped against the global max
        state.set_thumb_value(1, 500.0);
        assert_eq!(state.thumb_value(1), 100.0);
    }

    #[test]
    fn test_integral_step_with_negative_min_stays_on_grid() {
        let state = SliderState::new(
            SliderConfig::default()
                .range(-50.0, 100.0)
                .step(1.0)
                .default_value([35.2137, 0.0]),
        )
        .expect("valid config");
        assert_eq!(state.values(), vec![35.0, 35.0]);

        state.decrement_thumb(0, Some(state.page_size()));
        assert_eq!(state.values(), vec![20.0, 35.0]);

        state.set_thumb_value(0, 60.55);
        assert_eq!(state.values(), vec![35.0, 35.0]);
    }

    #[test]
    fn test_repeated_set_after_hand_off_continues() {
        let state = slider(&[50.0, 50.0]);
        let (changes, _cleanup) = change_counter(&state);

        state.set_thumb_value(0, 55.0);
        assert_eq!(state.values(), vec![50.0, 55.0]);
        state.set_thumb_value(0, 55.0);
        assert_eq!(state.values(), vec![55.0, 55.0]);
        assert_eq!(changes.get(), 2);

        state.set_thumb_value(0, 55.0);
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn test_thumb_range_follows_neighbors() {
        let state = slider(&[10.0, 40.0, 70.0]);
        assert_eq!((state.thumb_min(0), state.thumb_max(0)), (0.0, 40.0));
        assert_eq!((state.thumb_min(1), state.thumb_max(1)), (10.0, 70.0));
        assert_eq!((state.thumb_min(2), state.thumb_max(2)), (40.0, 100.0));
    }

    #[test]
    fn test_same_value_twice_notifies_once() {
        let state = slider(&[10.0, 60.0]);
        let (count, _cleanup) = change_counter(&state);

        state.set_thumb_value(0, 25.0);
        state.set_thumb_value(0, 25.0);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_non_editable_thumb_ignores_updates() {
        let state = slider(&[10.0, 60.0]);
        let (count, _cleanup) = change_counter(&state);

        state.set_thumb_editable(0, false);
        state.set_thumb_value(0, 30.0);
        state.increment_thumb(0, None);
        state.set_thumb_dragging(0, true);

        assert_eq!(state.values(), vec![10.0, 60.0]);
        assert!(!state.is_thumb_dragging(0));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_disabled_slider_ignores_updates() {
        let state = SliderState::new(SliderConfig::default().disabled(true).default_value(40.0))
            .expect("valid config");
        state.set_thumb_value(0, 70.0);
        state.set_thumb_to_max(0);
        assert_eq!(state.values(), vec![40.0]);
    }

    #[test]
    fn test_non_finite_value_ignored() {
        let state = slider(&[10.0]);
        state.set_thumb_value(0, f64::NAN);
        state.set_thumb_value(0, f64::INFINITY);
        assert_eq!(state.values(), vec![10.0]);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let state = slider(&[10.0]);
        state.set_thumb_value(3, 50.0);
        state.set_thumb_dragging(3, true);
        state.set_thumb_to_min(3);
        assert_eq!(state.values(), vec![10.0]);
        assert_eq!(state.thumb_value(3), 0.0);
    }

    // -------------------------------------------------------------------------
    // Stack hand-off
    // -------------------------------------------------------------------------

    #[test]
    fn test_stacked_drag_down_moves_targeted_thumb() {
        let state = slider(&[50.0, 50.0]);
        state.set_focused_thumb(Some(0));

        state.set_thumb_value(0, 45.0);

        assert_eq!(state.values(), vec![45.0, 50.0]);
        assert_eq!(state.focused_thumb(), Some(0));
    }

    #[test]
    fn test_stacked_drag_up_hands_off() {
        let state = slider(&[50.0, 50.0]);
        state.set_focused_thumb(Some(0));

        state.set_thumb_value(0, 55.0);

        assert_eq!(state.values(), vec![50.0, 55.0]);
        assert_eq!(state.focused_thumb(), Some(1));
    }

    #[test]
    fn test_hand_off_walks_through_stack() {
        let state = slider(&[30.0, 30.0, 30.0]);
        state.set_focused_thumb(Some(0));

        state.set_thumb_value(0, 40.0);

        assert_eq!(state.values(), vec![30.0, 30.0, 40.0]);
        assert_eq!(state.focused_thumb(), Some(2));
    }

    #[test]
    fn test_hand_off_down_from_top_of_stack() {
        let state = slider(&[20.0, 20.0, 60.0]);
        state.set_focused_thumb(Some(1));

        state.set_thumb_value(1, 5.0);

        assert_eq!(state.values(), vec![5.0, 20.0, 60.0]);
        assert_eq!(state.focused_thumb(), Some(0));
    }

    #[test]
    fn test_no_hand_off_to_unrelated_stack() {
        let state = slider(&[10.0, 50.0, 50.0]);
        state.set_focused_thumb(Some(0));

        state.set_thumb_value(0, 70.0);

        // Thumb 0 is not stacked; it clamps against thumb 1
        assert_eq!(state.values(), vec![50.0, 50.0, 50.0]);
        assert_eq!(state.focused_thumb(), Some(0));
    }

    #[test]
    fn test_hand_off_never_steals_focused_neighbor() {
        let state = slider(&[50.0, 50.0]);
        state.set_focused_thumb(Some(1));

        state.set_thumb_value(0, 60.0);

        assert_eq!(state.values(), vec![50.0, 50.0]);
        assert_eq!(state.focused_thumb(), Some(1));
    }

    #[test]
    fn test_hand_off_to_non_editable_is_noop() {
        let state = slider(&[50.0, 50.0]);
        let (count, _cleanup) = change_counter(&state);
        state.set_focused_thumb(Some(0));
        state.set_thumb_editable(1, false);

        state.set_thumb_value(0, 60.0);

        assert_eq!(state.values(), vec![50.0, 50.0]);
        assert_eq!(state.focused_thumb(), Some(0));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_hand_off_moves_focus_and_notifies() {
        let state = slider(&[50.0, 50.0]);
        state.set_focused_thumb(Some(0));

        let seen = Rc::new(Cell::new(None));
        let seen_clone = seen.clone();
        let _cleanup = state.on_focus_change(move |index| seen_clone.set(index));

        state.increment_thumb(0, None);

        assert_eq!(seen.get(), Some(1));
        assert_eq!(state.values(), vec![50.0, 51.0]);
    }

    // -------------------------------------------------------------------------
    // Increment / decrement
    // -------------------------------------------------------------------------

    #[test]
    fn test_increment_and_decrement() {
        let state = slider(&[50.0]);

        state.increment_thumb(0, None);
        assert_eq!(state.thumb_value(0), 51.0);

        state.increment_thumb(0, Some(state.page_size()));
        assert_eq!(state.thumb_value(0), 61.0);

        state.decrement_thumb(0, Some(0.25));
        assert_eq!(state.thumb_value(0), 60.0);

        state.decrement_thumb(0, Some(1000.0));
        assert_eq!(state.thumb_value(0), 0.0);
    }

    // -------------------------------------------------------------------------
    // set_thumb_to_min / set_thumb_to_max
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_to_min_pushes_whole_stack() {
        let state = slider(&[30.0, 30.0, 30.0]);
        let (count, _cleanup) = change_counter(&state);

        state.set_thumb_to_min(1);

        assert_eq!(state.values(), vec![0.0, 0.0, 0.0]);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_set_to_min_pushes_thumbs_in_the_way() {
        let state = slider(&[10.0, 30.0, 80.0]);
        state.set_thumb_to_min(1);
        assert_eq!(state.values(), vec![0.0, 0.0, 80.0]);
    }

    #[test]
    fn test_set_to_max_pushes_whole_stack() {
        let state = slider(&[10.0, 40.0, 40.0]);
        state.set_thumb_to_max(2);
        assert_eq!(state.values(), vec![10.0, 100.0, 100.0]);
    }

    #[test]
    fn test_set_to_max_stops_at_non_editable() {
        let state = slider(&[10.0, 40.0, 70.0]);
        state.set_thumb_editable(2, false);
        state.set_thumb_to_max(1);
        assert_eq!(state.values(), vec![10.0, 70.0, 70.0]);
    }

    // -------------------------------------------------------------------------
    // Percent
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_percent_quantizes() {
        let state = SliderState::new(SliderConfig::default().step(10.0).default_value(0.0))
            .expect("valid config");

        state.set_thumb_percent(0, 0.33);

        assert_eq!(state.thumb_value(0), 30.0);
        assert_eq!(state.thumb_percent(0), 0.3);
    }

    #[test]
    fn test_closest_thumb() {
        let state = slider(&[20.0, 80.0]);
        assert_eq!(state.closest_thumb(40.0), Some(0));
        assert_eq!(state.closest_thumb(70.0), Some(1));
        // Midway goes to the thumb above
        assert_eq!(state.closest_thumb(50.0), Some(1));

        state.set_focused_thumb(Some(0));
        assert_eq!(state.closest_thumb(50.0), Some(0));

        state.set_thumb_editable(0, false);
        assert_eq!(state.closest_thumb(10.0), Some(1));
    }

    #[test]
    fn test_closest_thumb_in_stack_moves_toward_value() {
        let state = slider(&[40.0, 40.0, 40.0]);
        assert_eq!(state.closest_thumb(60.0), Some(2));
        assert_eq!(state.closest_thumb(40.0), Some(2));
        assert_eq!(state.closest_thumb(10.0), Some(0));

        state.set_thumb_editable(0, false);
        state.set_thumb_editable(1, false);
        state.set_thumb_editable(2, false);
        assert_eq!(state.closest_thumb(10.0), None);
    }

    #[test]
    fn test_percent_value_clamps() {
        let state = slider(&[0.0]);
        assert_eq!(state.percent_value(-1.0), 0.0);
        assert_eq!(state.percent_value(2.0), 100.0);
    }

    // -------------------------------------------------------------------------
    // Dragging
    // -------------------------------------------------------------------------

    #[test]
    fn test_change_end_fires_when_last_thumb_stops() {
        let state = slider(&[20.0, 80.0]);
        let ends = Rc::new(RefCell::new(Vec::new()));
        let ends_clone = ends.clone();
        let _cleanup = state.on_change_end(move |value| ends_clone.borrow_mut().push(value.clone()));

        state.set_thumb_dragging(0, true);
        state.set_thumb_dragging(1, true);
        state.set_thumb_value(0, 30.0);

        state.set_thumb_dragging(0, false);
        assert!(ends.borrow().is_empty());

        state.set_thumb_value(1, 70.0);
        state.set_thumb_dragging(1, false);
        assert_eq!(*ends.borrow(), vec![SliderValue::Multiple(vec![30.0, 70.0])]);

        // Clearing an already idle thumb does not fire again
        state.set_thumb_dragging(1, false);
        assert_eq!(ends.borrow().len(), 1);
    }

    #[test]
    fn test_dragging_flag_clears_after_thumb_disabled() {
        let state = slider(&[20.0, 80.0]);
        let ends = Rc::new(Cell::new(0));
        let ends_clone = ends.clone();
        let _cleanup = state.on_change_end(move |_| ends_clone.set(ends_clone.get() + 1));

        state.set_thumb_dragging(0, true);
        state.set_thumb_editable(0, false);
        state.set_thumb_dragging(0, false);
        assert!(!state.is_thumb_dragging(0));
        assert_eq!(ends.get(), 1);

        // A disabled thumb still cannot start a drag
        state.set_thumb_dragging(0, true);
        assert!(!state.is_thumb_dragging(0));

        state.set_thumb_dragging(1, true);
        state.set_thumb_dragging(1, false);
        assert_eq!(ends.get(), 2);
    }

    #[test]
    fn test_single_value_shape() {
        let state = SliderState::new(SliderConfig::default().default_value(40.0))
            .expect("valid config");
        let last = Rc::new(RefCell::new(None));
        let last_clone = last.clone();
        let _cleanup = state.on_change(move |value| *last_clone.borrow_mut() = Some(value.clone()));

        state.set_thumb_value(0, 42.0);

        assert_eq!(*last.borrow(), Some(SliderValue::Single(42.0)));
    }

    // -------------------------------------------------------------------------
    // Focus / handlers
    // -------------------------------------------------------------------------

    #[test]
    fn test_focus_handler_fires_on_change_only() {
        let state = slider(&[20.0, 80.0]);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = state.on_focus_change(move |_| count_clone.set(count_clone.get() + 1));

        state.set_focused_thumb(Some(1));
        state.set_focused_thumb(Some(1));
        state.set_focused_thumb(None);
        assert_eq!(count.get(), 2);

        cleanup();
        state.set_focused_thumb(Some(0));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_cleanup_removes_change_handler() {
        let state = slider(&[20.0]);
        let (count, cleanup) = change_counter(&state);

        state.set_thumb_value(0, 30.0);
        cleanup();
        state.set_thumb_value(0, 40.0);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_sync_values_is_silent() {
        let state = slider(&[20.0, 80.0]);
        let (count, _cleanup) = change_counter(&state);

        state.sync_values([90.0, 10.0]);
        assert_eq!(state.values(), vec![90.0, 90.0]);

        state.sync_values(5.0);
        assert_eq!(state.values(), vec![90.0, 90.0]);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_formatted_label() {
        let state = SliderState::new(
            SliderConfig::default()
                .default_value(25.0)
                .formatter(|v| format!("{v}%")),
        )
        .expect("valid config");
        assert_eq!(state.thumb_value_label(0), "25%");
    }
}
