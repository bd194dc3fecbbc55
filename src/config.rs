//! Analysis thresholds
//!
//! Defaults are the values the risk rules were tuned with. Each one can be
//! overridden through the environment (or a `.env` file) so a studio can
//! tighten or relax the checks without a rebuild.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Environment keys
/// ---------------------------------------------------------------------------

pub const ENV_DAILY_VOLUME_LIMIT: &str = "TRAINING_LOAD_DAILY_VOLUME_LIMIT_MIN";
pub const ENV_HIGH_DENSITY_MINUTES: &str = "TRAINING_LOAD_HIGH_DENSITY_MIN";
pub const ENV_HIGH_DENSITY_SESSIONS: &str = "TRAINING_LOAD_HIGH_DENSITY_SESSIONS";
pub const ENV_RECOVERY_CHECK_DAYS: &str = "TRAINING_LOAD_RECOVERY_CHECK_DAYS";
pub const ENV_MIN_RECOVERY_DAYS: &str = "TRAINING_LOAD_MIN_RECOVERY_DAYS";
pub const ENV_CALORIES_PER_MINUTE: &str = "TRAINING_LOAD_CALORIES_PER_MIN";
pub const ENV_HIGH_AVERAGE_RPE: &str = "TRAINING_LOAD_HIGH_AVERAGE_RPE";
pub const ENV_UNDER_TRAINED_RATIO: &str = "TRAINING_LOAD_UNDER_TRAINED_RATIO";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?}")]
  InvalidValue { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Analysis Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
  /// A single day above this many minutes is flagged
  pub daily_volume_limit_minutes: u32,
  /// High-density day: duration strictly above this
  pub high_density_minutes: u32,
  /// High-density day: session count strictly above this
  pub high_density_sessions: usize,
  /// Recovery check only applies from this many training days
  pub recovery_check_min_training_days: usize,
  /// Fewer recovery days than this triggers the missing-recovery finding
  pub min_recovery_days: usize,
  /// Calorie estimate factor for the weekly overview
  pub calories_per_minute: u32,
  /// Average RPE strictly above this flags the week as too intense
  pub high_average_rpe: f64,
  /// A muscle group with fewer sessions than this share of the average is
  /// under-trained
  pub under_trained_ratio: f64,
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      daily_volume_limit_minutes: 120,
      high_density_minutes: 90,
      high_density_sessions: 3,
      recovery_check_min_training_days: 5,
      min_recovery_days: 2,
      calories_per_minute: 8,
      high_average_rpe: 8.0,
      under_trained_ratio: 0.7,
    }
  }
}

impl AnalysisConfig {
  /// Load `.env` (if present) and then read overrides from the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  /// Read overrides from the environment; unset keys keep their default
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    let config = Self {
      daily_volume_limit_minutes: env_or(ENV_DAILY_VOLUME_LIMIT, defaults.daily_volume_limit_minutes)?,
      high_density_minutes: env_or(ENV_HIGH_DENSITY_MINUTES, defaults.high_density_minutes)?,
      high_density_sessions: env_or(ENV_HIGH_DENSITY_SESSIONS, defaults.high_density_sessions)?,
      recovery_check_min_training_days: env_or(
        ENV_RECOVERY_CHECK_DAYS,
        defaults.recovery_check_min_training_days,
      )?,
      min_recovery_days: env_or(ENV_MIN_RECOVERY_DAYS, defaults.min_recovery_days)?,
      calories_per_minute: env_or(ENV_CALORIES_PER_MINUTE, defaults.calories_per_minute)?,
      high_average_rpe: env_or(ENV_HIGH_AVERAGE_RPE, defaults.high_average_rpe)?,
      under_trained_ratio: env_or(ENV_UNDER_TRAINED_RATIO, defaults.under_trained_ratio)?,
    };

    if config != defaults {
      tracing::info!(?config, "Analysis thresholds overridden from environment");
    }

    Ok(config)
  }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
  match env::var(key) {
    Ok(raw) if raw.trim().is_empty() => {
      tracing::warn!(key, "Empty override ignored");
      Ok(default)
    }
    Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
      key: key.to_string(),
      value: raw,
    }),
    Err(_) => Ok(default),
  }
}
