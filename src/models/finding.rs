use serde::{Deserialize, Serialize};

use super::plan::{DayKey, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskKind {
  ConsecutiveMuscleGroup,
  ConsecutiveHighIntensity,
  MissingRecovery,
  ExcessiveDailyVolume,
}

impl RiskKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      RiskKind::ConsecutiveMuscleGroup => "consecutive_muscle_group",
      RiskKind::ConsecutiveHighIntensity => "consecutive_high_intensity",
      RiskKind::MissingRecovery => "missing_recovery",
      RiskKind::ExcessiveDailyVolume => "excessive_daily_volume",
    }
  }
}

/// Finding severity. Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Low,
  Medium,
  High,
}

impl std::fmt::Display for Severity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Low => write!(f, "low"),
      Self::Medium => write!(f, "medium"),
      Self::High => write!(f, "high"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiniPlanKind {
  Mobility,
  Deload,
}

/// Ready-to-insert partial day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniPlan {
  pub kind: MiniPlanKind,
  pub name: String,
  pub sessions: Vec<Session>,
}

impl MiniPlan {
  pub fn total_duration_minutes(&self) -> u32 {
    self.sessions.iter().map(|s| s.duration_minutes()).sum()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFinding {
  /// Stable across runs for the same plan (kind + days)
  pub id: String,
  pub kind: RiskKind,
  pub severity: Severity,
  pub title: String,
  pub description: String,
  pub affected_days: Vec<DayKey>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub muscle_groups: Option<Vec<String>>,
  pub recommendation_text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suggested_plan: Option<MiniPlan>,
}
