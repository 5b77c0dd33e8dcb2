use crate::config::{HUE_WEIGHT, MAX_ROUND_SCORE, SAT_WEIGHT};
use crate::gameplay::color::ColorSample;

/// Shortest arc between two hues, in degrees. Always in `[0, 180]`.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Round accuracy in `0..=100`. Hue counts for 70%, saturation for 30%.
pub fn score(target: ColorSample, picked: ColorSample) -> u32 {
    let hue_diff = hue_distance(target.hue, picked.hue);
    let sat_diff = (target.saturation - picked.saturation).abs();

    let hue_score = (100.0 - hue_diff / 180.0 * 100.0).max(0.0);
    let sat_score = (100.0 - sat_diff).max(0.0);

    let weighted = hue_score * HUE_WEIGHT + sat_score * SAT_WEIGHT;
    (weighted.round() as u32).min(MAX_ROUND_SCORE)
}
