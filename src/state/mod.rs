//! State Module - Slider engine and the systems around it
//!
//! This module contains the state systems that power slider interactivity:
//!
//! - **Slider** - Thumb values, dragging/focus/editability, notifications
//! - **Snap** - Step snapping, percent mapping, stack detection
//! - **Config** - Slider settings and their validation
//! - **Listeners** - Scoped global release listeners
//! - **Input** - Crossterm conversion and terminal event routing

pub mod config;
pub mod input;
pub mod listeners;
pub mod slider;
pub mod snap;

pub use config::{
    SliderConfig, SliderConfigError, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, DEFAULT_STEP_VALUE,
};
pub use input::{
    convert_key_event, convert_mouse_event, disable_mouse, enable_mouse, poll_event, read_event,
    InputEvent, MouseAction, MouseButton, TerminalHost, TerminalMouseEvent, TerminalSlider,
    TrackRect, MOUSE_POINTER_ID,
};
pub use listeners::{GlobalListeners, ListenerHandle, ReleaseListener};
pub use slider::{FocusHandler, SliderData, SliderState, ValueHandler};
