//! Slider Configuration
//!
//! Immutable per-slider settings. Validated once when the engine is built;
//! after that no slider operation can fail.
//!
//! # Example
//!
//! ```ignore
//! use spark_slider::state::SliderConfig;
//!
//! let config = SliderConfig::default()
//!     .range(0.0, 1000.0)
//!     .step(50.0)
//!     .default_value([200.0, 800.0])
//!     .formatter(|v| format!("${v}"));
//! ```

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::types::{Formatter, Orientation, SliderValue, default_formatter};

pub const DEFAULT_MIN_VALUE: f64 = 0.0;
pub const DEFAULT_MAX_VALUE: f64 = 100.0;
pub const DEFAULT_STEP_VALUE: f64 = 1.0;

/// Rejected slider configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliderConfigError {
    #[error("slider range is empty: min {min} must be below max {max}")]
    EmptyRange { min: f64, max: f64 },

    #[error("slider step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("slider bounds must be finite (min {min}, max {max})")]
    NonFiniteBound { min: f64, max: f64 },

    #[error("slider value must hold at least one thumb")]
    EmptyValue,
}

/// Settings for one slider.
#[derive(Clone)]
pub struct SliderConfig {
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
    pub orientation: Orientation,
    pub is_disabled: bool,
    /// Controlled value. Wins over `default_value` when both are set.
    pub value: Option<SliderValue>,
    /// Initial value when uncontrolled. Defaults to `[min_value]`.
    pub default_value: Option<SliderValue>,
    pub formatter: Formatter,
    /// Element id of the slider group; thumb ids derive from it.
    pub id: String,
    /// Slider-level description references shared by all thumbs.
    pub aria_describedby: Option<String>,
    pub aria_details: Option<String>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            step: DEFAULT_STEP_VALUE,
            orientation: Orientation::Horizontal,
            is_disabled: false,
            value: None,
            default_value: None,
            formatter: default_formatter(),
            id: "slider".to_string(),
            aria_describedby: None,
            aria_details: None,
        }
    }
}

impl fmt::Debug for SliderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderConfig")
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("step", &self.step)
            .field("orientation", &self.orientation)
            .field("is_disabled", &self.is_disabled)
            .field("value", &self.value)
            .field("default_value", &self.default_value)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl SliderConfig {
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn disabled(mut self, is_disabled: bool) -> Self {
        self.is_disabled = is_disabled;
        self
    }

    pub fn value(mut self, value: impl Into<SliderValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<SliderValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(f64) -> String + 'static,
    {
        self.formatter = Rc::new(formatter);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn aria_describedby(mut self, ids: impl Into<String>) -> Self {
        self.aria_describedby = Some(ids.into());
        self
    }

    pub fn aria_details(mut self, ids: impl Into<String>) -> Self {
        self.aria_details = Some(ids.into());
        self
    }

    /// The value the slider starts from: controlled, else default, else min.
    pub fn initial_value(&self) -> SliderValue {
        self.value
            .clone()
            .or_else(|| self.default_value.clone())
            .unwrap_or_else(|| SliderValue::Multiple(vec![self.min_value]))
    }

    /// Check the preconditions every slider operation relies on.
    pub fn validate(&self) -> Result<(), SliderConfigError> {
        let (min, max) = (self.min_value, self.max_value);
        if !min.is_finite() || !max.is_finite() {
            return Err(SliderConfigError::NonFiniteBound { min, max });
        }
        if min >= max {
            return Err(SliderConfigError::EmptyRange { min, max });
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SliderConfigError::InvalidStep(self.step));
        }
        if self.initial_value().to_values().is_empty() {
            return Err(SliderConfigError::EmptyValue);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SliderConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.initial_value(), SliderValue::Multiple(vec![0.0]));
    }

    #[test]
    fn test_controlled_value_wins() {
        let config = SliderConfig::default().default_value(10.0).value(20.0);
        assert_eq!(config.initial_value(), SliderValue::Single(20.0));
    }

    #[test]
    fn test_rejects_empty_range() {
        let config = SliderConfig::default().range(10.0, 10.0);
        assert_eq!(
            config.validate(),
            Err(SliderConfigError::EmptyRange { min: 10.0, max: 10.0 })
        );
    }

    #[test]
    fn test_rejects_bad_step() {
        assert_eq!(
            SliderConfig::default().step(0.0).validate(),
            Err(SliderConfigError::InvalidStep(0.0))
        );
        assert!(SliderConfig::default().step(-1.0).validate().is_err());
        assert!(SliderConfig::default().step(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let config = SliderConfig::default().range(0.0, f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(SliderConfigError::NonFiniteBound { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_value() {
        let config = SliderConfig::default().default_value(Vec::<f64>::new());
        assert_eq!(config.validate(), Err(SliderConfigError::EmptyValue));
    }

    #[test]
    fn test_error_messages() {
        let err = SliderConfigError::InvalidStep(0.0);
        assert_eq!(err.to_string(), "slider step must be positive and finite, got 0");
    }
}
