//! Free-text parsing for session fields
//!
//! Durations and intensities arrive as whatever the coach typed ("45 min",
//! "RPE 7.5", "Alta"). Parsing is lossy on purpose and never fails: a duration
//! without a number is 0 minutes and an intensity without an RPE yields no
//! sample. Downstream thresholds are tuned to exactly this behaviour.

use regex::Regex;
use std::sync::LazyLock;

static FIRST_INTEGER_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid integer regex"));

static RPE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)RPE\s*([0-9]+(\.[0-9]+)?)").expect("valid rpe regex"));

/// Substrings (lowercase) that mark a session as high intensity
const HIGH_INTENSITY_MARKERS: [&str; 5] = ["alta", "rpe 8", "rpe 9", "rpe 10", "máxima"];

/// Substring (lowercase) that marks a session as light / restorative
const LIGHT_INTENSITY_MARKER: &str = "ligera";

/// First run of ASCII digits in the text, 0 when there is none
pub fn parse_duration_minutes(text: &str) -> u32 {
  FIRST_INTEGER_RE
    .find(text)
    .and_then(|m| m.as_str().parse::<u32>().ok())
    .unwrap_or(0)
}

/// First RPE value in the text ("RPE 7.5" -> 7.5)
pub fn parse_rpe(text: &str) -> Option<f64> {
  RPE_RE
    .captures(text)
    .and_then(|caps| caps.get(1))
    .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn is_high_intensity(text: &str) -> bool {
  let lowered = text.to_lowercase();
  HIGH_INTENSITY_MARKERS.iter().any(|marker| lowered.contains(marker))
}

pub fn is_light_intensity(text: &str) -> bool {
  text.to_lowercase().contains(LIGHT_INTENSITY_MARKER)
}

/// Round half away from zero to the given number of decimals
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
  let factor = 10f64.powi(decimals as i32);
  (value * factor).round() / factor
}
