//! Slider Primitives - Thumb building blocks.
//!
//! This module provides the interaction layer on top of [`SliderState`]:
//! - [`slider_thumb`] - Pointer, touch, keyboard and focus handling for one thumb
//! - [`slider_aria`] - Group and label attributes of the slider as a whole
//!
//! # Architecture
//!
//! A thumb holds no value. Each interaction:
//! 1. Re-reads its props (so signal/getter props stay live)
//! 2. Calls the slider engine's mutation methods
//! 3. Leaves presentation to [`SliderThumb::aria`], derived on read
//!
//! # Reactivity
//!
//! Props can be:
//! - Static values: `disabled: PropValue::Static(true)`
//! - Signals: `disabled: PropValue::Signal(locked)` (stays connected!)
//! - Getters: `disabled: PropValue::Getter(Rc::new(|| is_locked()))`
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! slider_thumb(ThumbProps { disabled: PropValue::Signal(locked), ..ThumbProps::new(0) }, state, host);
//!
//! // WRONG - extracts value, thumb never re-enables
//! slider_thumb(ThumbProps { disabled: PropValue::Static(locked.get()), ..ThumbProps::new(0) }, state, host);
//! ```
//!
//! [`SliderState`]: crate::state::SliderState

pub mod group;
pub mod thumb;
pub mod types;

pub use group::{slider_aria, SliderAria, SliderGroupProps};
pub use thumb::{slider_thumb, SliderThumb};
pub use types::*;
