//! Step Math - Snapping, percent mapping and stack detection
//!
//! Pure functions over plain numbers. Everything the slider engine commits
//! passes through [`snap_value_to_step`], which keeps values on the step
//! grid anchored at the lower bound.
//!
//! Rounding matches what browsers do for range inputs: halves round up
//! (toward positive infinity) in percent mapping, and away from the base
//! when snapping.

/// Round half toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Clamp without panicking on inverted or NaN bounds.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Slack allowed when counting whole steps in a span.
const STEP_EPSILON: f64 = 1e-9;

/// Cap on decimal places used for grid rounding.
const MAX_DECIMALS: i32 = 15;

fn decimal_places(value: f64) -> i32 {
    let text = value.abs().to_string();
    text.find('.')
        .map_or(0, |point| (text.len() - point - 1) as i32)
        .min(MAX_DECIMALS)
}

/// Round onto the decimal precision shared by a grid's step and base.
///
/// With step `1` and base `-50`, `34.99999999999999` becomes `35`.
pub fn round_to_grid_precision(value: f64, step: f64, base: f64) -> f64 {
    let precision = decimal_places(step).max(decimal_places(base));
    let pow = 10f64.powi(precision);
    round_half_up(value * pow) / pow
}

/// Snap `value` to the nearest multiple of `step` counted from `min`,
/// then clamp into `[min, max]`.
///
/// Ties round away from `min`. A value above `max` falls back to the last
/// grid point that is not above `max`. The result is always `min + k * step`
/// for a whole `k`, rounded to the precision of `step` and `min`.
pub fn snap_value_to_step(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let steps = ((value - min) / step).round();
    let mut snapped = round_to_grid_precision(min + steps * step, step, min);

    if snapped < min {
        snapped = min;
    } else if snapped > max {
        let steps = ((max - min) / step + STEP_EPSILON).floor();
        snapped = round_to_grid_precision(min + steps * step, step, min);
    }

    snapped.max(min).min(max)
}

/// Map a fraction of the `[min, max]` span to a step-rounded value.
pub fn percent_to_value(percent: f64, min: f64, max: f64, step: f64) -> f64 {
    let value = percent * (max - min) + min;
    let rounded = round_half_up((value - min) / step) * step + min;
    clamp(round_to_grid_precision(rounded, step, min), min, max)
}

/// Position of `value` within `[min, max]` as a fraction.
pub fn value_to_percent(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Page size: a tenth of the range on the step grid, at least one step.
pub fn page_size(min: f64, max: f64, step: f64) -> f64 {
    let tenth = (max - min) / 10.0;
    let snapped = snap_value_to_step(tenth, 0.0, tenth + step, step);
    snapped.max(step)
}

/// Adjacent index pairs holding equal values.
///
/// `[10, 50, 50, 50]` yields `[(1, 2), (2, 3)]`.
pub fn stacked_pairs(values: &[f64]) -> Vec<(usize, usize)> {
    values
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] == pair[1])
        .map(|(i, _)| (i, i + 1))
        .collect()
}

/// Bring raw initial values onto the grid and into order.
///
/// Each value is snapped inside `[previous, max]`, so the result is
/// monotonic and within bounds whatever the input. Non-finite entries
/// collapse onto their lower neighbor.
pub fn restrict_values(values: &[f64], min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut restricted: Vec<f64> = Vec::with_capacity(values.len());
    for &value in values {
        let lower = restricted.last().copied().unwrap_or(min);
        let value = if value.is_finite() { value } else { lower };
        restricted.push(snap_value_to_step(value, lower, max, step));
    }
    restricted
}
