//! Deterministic analysis layer for weekly training plans
//!
//! This module computes load metrics from a planned week. The risk detector
//! and any presentation layer read these pre-computed numbers rather than
//! re-deriving them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::models::plan::OVERLAP_EXEMPT_TAGS;
use crate::models::{DayKey, RiskFinding, Session, Severity, WeeklyPlan, WeeklyTargets};
use crate::parsing::round_half_away;
use crate::risk::RiskDetector;

/// ---------------------------------------------------------------------------
/// Tier 1: Per-Day Stats
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
  pub day: DayKey,
  pub sessions: usize,
  pub duration_minutes: u32,
}

impl DailyStats {
  pub fn compute(day: DayKey, sessions: &[Session]) -> Self {
    Self {
      day,
      sessions: sessions.len(),
      duration_minutes: sessions
        .iter()
        .fold(0u32, |acc, s| acc.saturating_add(s.duration_minutes())),
    }
  }

  fn is_high_density(&self, config: &AnalysisConfig) -> bool {
    self.duration_minutes > config.high_density_minutes
      || self.sessions > config.high_density_sessions
  }
}

/// ---------------------------------------------------------------------------
/// Tier 2: Intensity
/// ---------------------------------------------------------------------------

/// Session counts by intensity band. Every session lands in exactly one band,
/// including the ones whose intensity text carries no RPE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityDistribution {
  /// RPE below 6
  pub low: usize,
  /// RPE 6 up to (not including) 8
  pub moderate: usize,
  /// RPE 8+, or a high-intensity label without an RPE
  pub high: usize,
  /// No RPE and no recognizable label
  pub unrated: usize,
}

impl IntensityDistribution {
  fn record(&mut self, session: &Session) {
    match session.rpe() {
      Some(rpe) if rpe >= 8.0 => self.high += 1,
      Some(rpe) if rpe >= 6.0 => self.moderate += 1,
      Some(_) => self.low += 1,
      None if session.is_high_intensity() => self.high += 1,
      None => self.unrated += 1,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tier 2b: Muscle-Group Volume
/// ---------------------------------------------------------------------------

/// How often a muscle group is trained across the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupVolume {
  pub group: String,
  pub sessions: usize,
  /// Distinct days, calendar order
  pub days: Vec<DayKey>,
  /// Session count below `under_trained_ratio` of the per-group average
  pub under_trained: bool,
}

impl MuscleGroupVolume {
  /// One entry per trained group, sorted by name. Cardio, mobility and
  /// full-body tags are not muscle groups, and mobility or recovery sessions
  /// add no volume.
  fn compute_all(plan: &WeeklyPlan, config: &AnalysisConfig) -> Vec<Self> {
    let mut by_group: BTreeMap<String, (usize, Vec<DayKey>)> = BTreeMap::new();

    for day in DayKey::ALL {
      for session in plan.sessions(day) {
        if session.modality.is_recovery_or_mobility() {
          continue;
        }
        for tag in session.muscle_tags() {
          if OVERLAP_EXEMPT_TAGS.contains(&tag.as_str()) {
            continue;
          }
          let (sessions, days) = by_group.entry(tag).or_default();
          *sessions += 1;
          if days.last() != Some(&day) {
            days.push(day);
          }
        }
      }
    }

    if by_group.is_empty() {
      return Vec::new();
    }

    let total: usize = by_group.values().map(|(sessions, _)| sessions).sum();
    let average = total as f64 / by_group.len() as f64;
    let floor = average * config.under_trained_ratio;

    by_group
      .into_iter()
      .map(|(group, (sessions, days))| Self {
        group,
        sessions,
        days,
        under_trained: (sessions as f64) < floor,
      })
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Tier 3: Target Compliance
/// ---------------------------------------------------------------------------

/// Actual vs intended weekly totals. Only present when targets were supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCompliance {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sessions_ratio: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_ratio: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub calories_ratio: Option<f64>,

  /// Duration more than 10% above target
  pub duration_over_target: bool,

  /// Session count more than 20% below target
  pub sessions_under_target: bool,

  /// Set when duration is off target by more than 10% either way
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub duration_deviation: Option<DurationDeviation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationDirection {
  Over,
  Under,
}

/// Weekly duration vs target: medium past 10%, high past 20%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationDeviation {
  pub direction: DeviationDirection,
  /// actual - target
  pub difference_minutes: i64,
  pub severity: Severity,
}

impl DurationDeviation {
  fn compute(total_duration: u32, target: u32) -> Option<Self> {
    if target == 0 {
      return None;
    }

    let difference_minutes = i64::from(total_duration) - i64::from(target);
    let off = difference_minutes.unsigned_abs();
    let target = u64::from(target);

    // off > 10% of target, in integers
    if off * 10 <= target {
      return None;
    }

    Some(Self {
      direction: if difference_minutes > 0 {
        DeviationDirection::Over
      } else {
        DeviationDirection::Under
      },
      difference_minutes,
      severity: if off * 5 > target {
        Severity::High
      } else {
        Severity::Medium
      },
    })
  }
}

impl TargetCompliance {
  fn compute(
    total_sessions: usize,
    total_duration: u32,
    calories: u32,
    targets: &WeeklyTargets,
  ) -> Self {
    let ratio = |actual: f64, target: u32| -> Option<f64> {
      if target > 0 {
        Some(round_half_away(actual / target as f64, 2))
      } else {
        None
      }
    };

    Self {
      sessions_ratio: ratio(total_sessions as f64, targets.sessions),
      duration_ratio: ratio(total_duration as f64, targets.duration_minutes),
      calories_ratio: ratio(calories as f64, targets.calories),
      duration_over_target: targets.duration_minutes > 0
        && total_duration as f64 > targets.duration_minutes as f64 * 1.1,
      sessions_under_target: targets.sessions > 0
        && (total_sessions as f64) < targets.sessions as f64 * 0.8,
      duration_deviation: DurationDeviation::compute(total_duration, targets.duration_minutes),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tier 4: Weekly Metrics
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
  pub total_sessions: usize,
  pub total_duration_minutes: u32,

  /// One entry per day, calendar order
  pub daily_stats: Vec<DailyStats>,

  /// total / 7, rounded
  pub average_daily_duration_minutes: u32,

  /// Session count per modality name
  pub modality_distribution: BTreeMap<String, usize>,

  /// Per muscle group, sorted by name
  pub muscle_group_volume: Vec<MuscleGroupVolume>,

  /// RPE of every session whose intensity carries one, in calendar order
  pub intensity_samples: Vec<f64>,
  pub average_intensity: f64,
  pub max_intensity: f64,
  pub min_intensity: f64,
  pub intensity_distribution: IntensityDistribution,
  /// Unrounded average RPE above `high_average_rpe`
  pub high_average_intensity: bool,

  pub recovery_or_mobility_session_count: usize,
  pub rest_day_count: usize,
  pub high_density_days: Vec<DayKey>,

  /// This week's minutes
  pub acute_load: u32,
  /// Target minutes, or the acute load when no target exists
  pub chronic_load: u32,
  /// acute / chronic, 1.0 when chronic is zero
  pub load_ratio: f64,

  pub estimated_calories: u32,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_compliance: Option<TargetCompliance>,
}

impl WeeklyMetrics {
  /// Compute weekly metrics with the default thresholds
  pub fn compute(plan: &WeeklyPlan, targets: Option<&WeeklyTargets>) -> Self {
    Self::compute_with(plan, targets, &AnalysisConfig::default())
  }

  pub fn compute_with(
    plan: &WeeklyPlan,
    targets: Option<&WeeklyTargets>,
    config: &AnalysisConfig,
  ) -> Self {
    let daily_stats: Vec<DailyStats> = DayKey::ALL
      .iter()
      .map(|day| DailyStats::compute(*day, plan.sessions(*day)))
      .collect();

    let total_sessions: usize = daily_stats.iter().map(|d| d.sessions).sum();
    let total_duration_minutes = daily_stats
      .iter()
      .fold(0u32, |acc, d| acc.saturating_add(d.duration_minutes));
    let average_daily_duration_minutes =
      round_half_away(total_duration_minutes as f64 / 7.0, 0) as u32;

    let mut modality_distribution = BTreeMap::new();
    let mut intensity_samples = Vec::new();
    let mut intensity_distribution = IntensityDistribution::default();
    let mut recovery_or_mobility_session_count = 0;

    for day in DayKey::ALL {
      for session in plan.sessions(day) {
        *modality_distribution
          .entry(session.modality.as_str().to_string())
          .or_insert(0) += 1;

        if let Some(rpe) = session.rpe() {
          intensity_samples.push(rpe);
        }
        intensity_distribution.record(session);

        if session.modality.is_recovery_or_mobility() {
          recovery_or_mobility_session_count += 1;
        }
      }
    }

    let (average_intensity, max_intensity, min_intensity) =
      Self::intensity_summary(&intensity_samples);
    let high_average_intensity = !intensity_samples.is_empty()
      && intensity_samples.iter().sum::<f64>() / intensity_samples.len() as f64
        > config.high_average_rpe;
    let muscle_group_volume = MuscleGroupVolume::compute_all(plan, config);

    let rest_day_count = daily_stats.iter().filter(|d| d.sessions == 0).count();
    let high_density_days = daily_stats
      .iter()
      .filter(|d| d.is_high_density(config))
      .map(|d| d.day)
      .collect();

    let acute_load = total_duration_minutes;
    let chronic_load = targets.map_or(acute_load, |t| t.duration_minutes);
    let load_ratio = Self::load_ratio(acute_load, chronic_load);

    let estimated_calories = total_duration_minutes.saturating_mul(config.calories_per_minute);
    let target_compliance = targets.map(|t| {
      TargetCompliance::compute(total_sessions, total_duration_minutes, estimated_calories, t)
    });

    Self {
      total_sessions,
      total_duration_minutes,
      daily_stats,
      average_daily_duration_minutes,
      modality_distribution,
      muscle_group_volume,
      intensity_samples,
      average_intensity,
      max_intensity,
      min_intensity,
      intensity_distribution,
      high_average_intensity,
      recovery_or_mobility_session_count,
      rest_day_count,
      high_density_days,
      acute_load,
      chronic_load,
      load_ratio,
      estimated_calories,
      target_compliance,
    }
  }

  /// (average rounded to 1 decimal, max, min); all zero without samples
  fn intensity_summary(samples: &[f64]) -> (f64, f64, f64) {
    if samples.is_empty() {
      return (0.0, 0.0, 0.0);
    }
    let sum: f64 = samples.iter().sum();
    let avg = round_half_away(sum / samples.len() as f64, 1);
    let max = samples.iter().copied().fold(f64::MIN, f64::max);
    let min = samples.iter().copied().fold(f64::MAX, f64::min);
    (avg, max, min)
  }

  fn load_ratio(acute: u32, chronic: u32) -> f64 {
    if chronic == 0 {
      return 1.0;
    }
    round_half_away(acute as f64 / chronic as f64, 2)
  }
}

/// Metrics with the default thresholds
pub fn aggregate(plan: &WeeklyPlan, targets: Option<&WeeklyTargets>) -> WeeklyMetrics {
  WeeklyMetrics::compute(plan, targets)
}

/// ---------------------------------------------------------------------------
/// Weekly Analysis (metrics + findings)
/// ---------------------------------------------------------------------------

/// Everything a plan view needs after a change to the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAnalysis {
  pub metrics: WeeklyMetrics,
  /// Rule order, not severity order
  pub findings: Vec<RiskFinding>,
}

impl WeeklyAnalysis {
  pub fn compute(
    plan: &WeeklyPlan,
    targets: Option<&WeeklyTargets>,
    config: &AnalysisConfig,
  ) -> Self {
    let metrics = WeeklyMetrics::compute_with(plan, targets, config);
    let findings = RiskDetector::new(config.clone()).detect(plan, &DayKey::ALL);

    tracing::debug!(
      total_sessions = metrics.total_sessions,
      total_minutes = metrics.total_duration_minutes,
      load_ratio = metrics.load_ratio,
      findings = findings.len(),
      "Weekly analysis computed"
    );

    Self { metrics, findings }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
