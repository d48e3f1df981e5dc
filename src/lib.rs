//! # spark-slider
//!
//! Headless, accessible range slider state and thumb interaction.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A slider is one [`SliderState`] shared (via `Rc`) by one [`SliderThumb`]
//! per value. The state owns every value and every rule; thumbs translate
//! pointer, touch, keyboard and focus input into state mutations and derive
//! presentation attributes on read:
//! ```text
//! crossterm event → TerminalSlider → SliderThumb → SliderState → values signal / handlers
//! ```
//!
//! Thumbs reach their surroundings only through the [`InputHost`] trait, so
//! the same thumb drives a terminal ([`TerminalHost`]) or any other UI layer.
//!
//! ## Modules
//!
//! - [`types`] - Core types (SliderValue, Orientation, pointer/keyboard events, ThumbFlags)
//! - [`state`] - Slider engine, step math, config, release listeners, terminal input
//! - [`primitives`] - Thumb controller, props and derived attributes

pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use state::{
    // Engine
    SliderState, SliderData, ValueHandler, FocusHandler,
    // Config
    SliderConfig, SliderConfigError, DEFAULT_MIN_VALUE, DEFAULT_MAX_VALUE, DEFAULT_STEP_VALUE,
    // Listeners
    GlobalListeners, ListenerHandle, ReleaseListener,
    // Terminal
    TerminalHost, TerminalSlider, TrackRect, InputEvent, TerminalMouseEvent, MouseAction,
    MouseButton, MOUSE_POINTER_ID, convert_key_event, convert_mouse_event, poll_event,
    read_event, enable_mouse, disable_mouse,
};

pub use state::snap::{
    snap_value_to_step, round_to_grid_precision, percent_to_value, value_to_percent, page_size,
    stacked_pairs,
};

pub use primitives::{
    slider_thumb, SliderThumb, slider_aria, SliderAria, SliderGroupProps, ThumbProps, PropValue, ValidationState, InputHost, TrackSize,
    Attributes, merge_attributes, join_ids, ThumbStyle, ThumbEdge, InputAttributes,
    LabelAttributes, SliderThumbAria,
};
