//! Slider group - Attributes of the element wrapping a slider's track and thumbs.
//!
//! The group carries the slider-wide label and descriptions. Thumb inputs
//! name the group id in their `aria-labelledby`, so the group label reads
//! before each thumb's own label.

use super::types::{join_ids, Attributes, LabelAttributes};
use crate::state::slider::SliderState;

/// Labelling props of the slider as a whole.
#[derive(Debug, Clone, Default)]
pub struct SliderGroupProps {
    /// Visible label text. Its presence creates a label element id.
    pub label: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby: Option<String>,
}

/// Derived attributes for the group element and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderAria {
    pub group: Attributes,
    pub label: LabelAttributes,
}

/// Group and label attributes of a slider.
///
/// The label points at the first thumb's input, so activating it focuses
/// that thumb.
pub fn slider_aria(props: &SliderGroupProps, state: &SliderState) -> SliderAria {
    let data = state.slider_data();
    let label_id = props.label.as_ref().map(|_| format!("{}-label", data.id));

    let mut group = Attributes::new()
        .with("role", "group")
        .with("id", data.id.clone());
    group.set_opt("aria-label", props.aria_label.clone());
    group.set_opt(
        "aria-labelledby",
        join_ids([label_id.as_deref(), props.aria_labelledby.as_deref()]),
    );
    group.set_opt("aria-describedby", data.aria_describedby.clone());
    group.set_opt("aria-details", data.aria_details.clone());
    if state.is_disabled() {
        group.set("aria-disabled", "true");
    }

    let label = LabelAttributes {
        html_for: label_id
            .as_ref()
            .filter(|_| state.thumb_count() > 0)
            .map(|_| format!("{}-0", data.id)),
        id: label_id,
    };

    SliderAria { group, label }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::SliderConfig;

    fn state(config: SliderConfig) -> SliderState {
        SliderState::new(config.default_value([20.0, 80.0])).unwrap()
    }

    #[test]
    fn test_group_with_label() {
        let state = state(SliderConfig::default().id("price").aria_describedby("hint"));
        let props = SliderGroupProps {
            label: Some("Price".to_string()),
            aria_labelledby: Some("heading".to_string()),
            ..SliderGroupProps::default()
        };

        let aria = slider_aria(&props, &state);
        assert_eq!(aria.group.get("role"), Some("group"));
        assert_eq!(aria.group.get("id"), Some("price"));
        assert_eq!(aria.group.get("aria-labelledby"), Some("price-label heading"));
        assert_eq!(aria.group.get("aria-describedby"), Some("hint"));
        assert!(!aria.group.contains("aria-disabled"));
        assert_eq!(aria.label.id.as_deref(), Some("price-label"));
        assert_eq!(aria.label.html_for.as_deref(), Some("price-0"));
    }

    #[test]
    fn test_group_without_label() {
        let state = state(SliderConfig::default().disabled(true));
        let props = SliderGroupProps {
            aria_label: Some("Volume".to_string()),
            ..SliderGroupProps::default()
        };

        let aria = slider_aria(&props, &state);
        assert_eq!(aria.group.get("aria-label"), Some("Volume"));
        assert!(!aria.group.contains("aria-labelledby"));
        assert_eq!(aria.group.get("aria-disabled"), Some("true"));
        assert_eq!(aria.label, LabelAttributes::default());
    }
}
