//! Primitive types - Props, host capabilities and derived attributes.
//!
//! These types define the interface between a thumb and its surroundings:
//! what the embedding passes in ([`ThumbProps`], an [`InputHost`]) and what
//! the renderer reads back ([`SliderThumbAria`], [`Attributes`]).

use std::collections::BTreeMap;
use std::rc::Rc;

use spark_signals::Signal;

use crate::state::listeners::{ListenerHandle, ReleaseListener};
use crate::types::{Direction, Orientation, ThumbFlags};

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Thumbs read props on every event, so a signal or getter prop (for
/// example `disabled`) takes effect without rebuilding the thumb.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal.
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value.
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Thumb Props
// =============================================================================

/// Validation display state of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Valid,
    Invalid,
}

/// Options for one thumb.
#[derive(Clone, Default)]
pub struct ThumbProps {
    /// Index of the thumb's value in the slider state.
    pub index: usize,
    /// Disables this thumb only. The slider's own disabled flag also applies.
    pub disabled: PropValue<bool>,
    /// Overrides the slider orientation.
    pub orientation: Option<Orientation>,
    /// Form field name of the range input.
    pub name: Option<String>,
    /// Visible label text. Its presence gives the thumb a label element.
    pub label: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
    pub aria_describedby: Option<String>,
    pub aria_details: Option<String>,
    pub aria_errormessage: Option<String>,
    pub is_required: bool,
    pub is_invalid: bool,
    pub validation_state: Option<ValidationState>,
}

impl ThumbProps {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

// =============================================================================
// Input Host
// =============================================================================

/// Size of the slider track, in the units move deltas are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackSize {
    pub width: f64,
    pub height: f64,
}

impl TrackSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the primary axis.
    pub fn along(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

/// Capabilities a thumb needs from the embedding UI layer.
pub trait InputHost {
    /// Move input focus to the element with this id without scrolling it into view.
    fn focus_input(&self, input_id: &str);

    /// Locale direction. Right-to-left flips horizontal movement.
    fn direction(&self) -> Direction {
        Direction::Ltr
    }

    /// Current size of the slider track.
    fn track_size(&self) -> TrackSize;

    /// Register a listener for pointer/touch releases anywhere in the host.
    fn add_release_listener(&self, listener: ReleaseListener) -> ListenerHandle;
}

// =============================================================================
// Attributes
// =============================================================================

/// Attributes whose values are space-separated id lists. Merging joins them.
const ID_LIST_ATTRIBUTES: [&str; 3] = ["aria-describedby", "aria-details", "aria-labelledby"];

/// Join id-reference lists, dropping empties and duplicates, keeping order.
pub fn join_ids<'a, I>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut ids: Vec<&str> = Vec::new();
    for id in parts.into_iter().flatten().flat_map(str::split_whitespace) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(" "))
    }
}

/// A bag of element attributes, as handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Set only when a value is present.
    pub fn set_opt(&mut self, name: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another bag into this one. Later values win, except id lists,
    /// which are concatenated.
    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            if ID_LIST_ATTRIBUTES.contains(&name) {
                let joined = join_ids([self.get(name), Some(value)]);
                self.set_opt(name, joined);
            } else {
                self.set(name, value);
            }
        }
    }
}

/// Merge several bags, left to right.
pub fn merge_attributes(bags: &[Attributes]) -> Attributes {
    let mut merged = Attributes::new();
    for bag in bags {
        merged.merge(bag);
    }
    merged
}

// =============================================================================
// Thumb Output
// =============================================================================

/// Edge the thumb offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbEdge {
    Left,
    Top,
}

impl ThumbEdge {
    pub fn as_str(self) -> &'static str {
        match self {
            ThumbEdge::Left => "left",
            ThumbEdge::Top => "top",
        }
    }
}

/// Placement of the thumb element along the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbStyle {
    pub edge: ThumbEdge,
    /// Offset from `edge` as a fraction of the track (0..=1).
    pub position: f64,
}

impl ThumbStyle {
    /// Inline style for DOM-like renderers.
    pub fn to_css(&self) -> String {
        format!(
            "position: absolute; {}: {}%; transform: translate(-50%, -50%); touch-action: none",
            self.edge.as_str(),
            self.position * 100.0
        )
    }
}

/// Attributes of the (visually hidden) range input carrying a thumb's semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputAttributes {
    pub id: String,
    /// `None` when disabled.
    pub tab_index: Option<i32>,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub name: Option<String>,
    pub disabled: bool,
    pub aria_orientation: Orientation,
    pub aria_valuetext: String,
    pub aria_required: Option<bool>,
    pub aria_invalid: Option<bool>,
    pub aria_errormessage: Option<String>,
    pub aria_describedby: Option<String>,
    pub aria_details: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
}

impl InputAttributes {
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new()
            .with("id", self.id.as_str())
            .with("type", "range")
            .with("min", self.min.to_string())
            .with("max", self.max.to_string())
            .with("step", self.step.to_string())
            .with("value", self.value.to_string())
            .with("aria-orientation", self.aria_orientation.as_str())
            .with("aria-valuetext", self.aria_valuetext.as_str());

        attrs.set_opt("tabindex", self.tab_index.map(|t| t.to_string()));
        attrs.set_opt("name", self.name.as_deref());
        if self.disabled {
            attrs.set("disabled", "true");
        }
        attrs.set_opt("aria-required", self.aria_required.map(|r| r.to_string()));
        attrs.set_opt("aria-invalid", self.aria_invalid.map(|i| i.to_string()));
        attrs.set_opt("aria-errormessage", self.aria_errormessage.as_deref());
        attrs.set_opt("aria-describedby", self.aria_describedby.as_deref());
        attrs.set_opt("aria-details", self.aria_details.as_deref());
        attrs.set_opt("aria-label", self.aria_label.as_deref());
        attrs.set_opt("aria-labelledby", self.aria_labelledby.as_deref());
        attrs
    }
}

/// Attributes of the optional label element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelAttributes {
    pub id: Option<String>,
    /// Id of the input the label is for.
    pub html_for: Option<String>,
}

/// Everything a renderer needs to draw and wire one thumb.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderThumbAria {
    pub thumb: ThumbStyle,
    pub input: InputAttributes,
    pub label: LabelAttributes,
    pub is_dragging: bool,
    pub is_focused: bool,
    pub is_disabled: bool,
}

impl SliderThumbAria {
    pub fn flags(&self) -> ThumbFlags {
        let mut flags = ThumbFlags::NONE;
        if self.is_dragging {
            flags |= ThumbFlags::DRAGGING;
        }
        if self.is_focused {
            flags |= ThumbFlags::FOCUSED;
        }
        if self.is_disabled {
            flags |= ThumbFlags::DISABLED;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids([Some("a"), None, Some("b c")]), Some("a b c".to_string()));
        assert_eq!(join_ids([Some("a b"), Some("b")]), Some("a b".to_string()));
        assert_eq!(join_ids([None, Some("  ")]), None);
    }

    #[test]
    fn test_merge_later_wins() {
        let a = Attributes::new().with("value", "1").with("name", "low");
        let b = Attributes::new().with("value", "2");
        let merged = merge_attributes(&[a, b]);
        assert_eq!(merged.get("value"), Some("2"));
        assert_eq!(merged.get("name"), Some("low"));
    }

    #[test]
    fn test_merge_joins_id_lists() {
        let a = Attributes::new().with("aria-describedby", "hint");
        let b = Attributes::new().with("aria-describedby", "error hint");
        let merged = merge_attributes(&[a, b]);
        assert_eq!(merged.get("aria-describedby"), Some("hint error"));
    }

    #[test]
    fn test_track_size_along_axis() {
        let size = TrackSize::new(200.0, 20.0);
        assert_eq!(size.along(Orientation::Horizontal), 200.0);
        assert_eq!(size.along(Orientation::Vertical), 20.0);
    }

    #[test]
    fn test_thumb_style_css() {
        let style = ThumbStyle { edge: ThumbEdge::Left, position: 0.25 };
        assert_eq!(
            style.to_css(),
            "position: absolute; left: 25%; transform: translate(-50%, -50%); touch-action: none"
        );
    }

    #[test]
    fn test_prop_value_getter() {
        let prop: PropValue<bool> = PropValue::Getter(Rc::new(|| true));
        assert!(prop.get());
        assert!(!PropValue::<bool>::default().get());
    }
}
