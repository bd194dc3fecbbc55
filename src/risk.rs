//! Weekly risk detection
//!
//! Runs a fixed battery of scheduling heuristics over a planned week:
//! - Rule A: same non-exempt muscle group on consecutive days
//! - Rule B: high intensity on consecutive days
//! - Rule C: a busy week with too few recovery days
//! - Rule D: a single day above the volume limit
//!
//! Findings come out in rule order (A, B, C, D) and, within a rule, in day
//! order. The detector never sorts by severity; see [`rank_by_severity`].

use std::collections::BTreeSet;

use crate::config::AnalysisConfig;
use crate::corrective::{
  synthesize_deload_plan, synthesize_general_mobility_plan, synthesize_mobility_plan,
};
use crate::models::plan::OVERLAP_EXEMPT_TAGS;
use crate::models::{DayKey, RiskFinding, RiskKind, Severity, WeeklyPlan};

/// ---------------------------------------------------------------------------
/// Detector
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RiskDetector {
  config: AnalysisConfig,
}

impl RiskDetector {
  pub fn new(config: AnalysisConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &AnalysisConfig {
    &self.config
  }

  /// Run every rule over `plan`, walking days in `day_order`
  pub fn detect(&self, plan: &WeeklyPlan, day_order: &[DayKey]) -> Vec<RiskFinding> {
    let mut findings = Vec::new();

    findings.extend(self.consecutive_muscle_groups(plan, day_order));
    findings.extend(self.consecutive_high_intensity(plan, day_order));
    findings.extend(self.missing_recovery(plan, day_order));
    findings.extend(self.excessive_daily_volume(plan, day_order));

    for finding in &findings {
      tracing::debug!(
        id = %finding.id,
        kind = finding.kind.as_str(),
        severity = %finding.severity,
        "Risk finding"
      );
    }

    findings
  }

  /// Rule A
  fn consecutive_muscle_groups(&self, plan: &WeeklyPlan, day_order: &[DayKey]) -> Vec<RiskFinding> {
    day_order
      .windows(2)
      .filter_map(|pair| {
        let (first, second) = (pair[0], pair[1]);
        let first_tags = day_tags(plan, first);
        let second_tags = day_tags(plan, second);

        let overlap: Vec<String> = first_tags
          .intersection(&second_tags)
          .filter(|t| !OVERLAP_EXEMPT_TAGS.contains(&t.as_str()))
          .cloned()
          .collect();

        if overlap.is_empty() {
          return None;
        }

        let severity = if overlap.len() >= 2 {
          Severity::High
        } else {
          Severity::Medium
        };
        let joined = overlap.join(", ");

        Some(RiskFinding {
          id: format!("consecutive-muscle-{}", pair_slug(first, second)),
          kind: RiskKind::ConsecutiveMuscleGroup,
          severity,
          title: "Same muscle groups on consecutive days".to_string(),
          description: format!(
            "{} and {} both load {}, leaving no time to recover between sessions.",
            first, second, joined
          ),
          affected_days: vec![first, second],
          suggested_plan: Some(synthesize_mobility_plan(overlap.as_slice())),
          muscle_groups: Some(overlap),
          recommendation_text: format!(
            "Move one of the {} sessions to a non-adjacent day, or swap it for mobility work.",
            joined
          ),
        })
      })
      .collect()
  }

  /// Rule B
  fn consecutive_high_intensity(&self, plan: &WeeklyPlan, day_order: &[DayKey]) -> Vec<RiskFinding> {
    day_order
      .windows(2)
      .filter(|pair| is_high_intensity_day(plan, pair[0]) && is_high_intensity_day(plan, pair[1]))
      .map(|pair| {
        let (first, second) = (pair[0], pair[1]);
        RiskFinding {
          id: format!("high-intensity-{}", pair_slug(first, second)),
          kind: RiskKind::ConsecutiveHighIntensity,
          severity: Severity::High,
          title: "High intensity on consecutive days".to_string(),
          description: format!(
            "{} and {} are both high-intensity days back to back.",
            first, second
          ),
          affected_days: vec![first, second],
          muscle_groups: None,
          recommendation_text: format!(
            "Turn {} into an active deload: light cardio plus stretching.",
            second
          ),
          suggested_plan: Some(synthesize_deload_plan()),
        }
      })
      .collect()
  }

  /// Rule C
  fn missing_recovery(&self, plan: &WeeklyPlan, day_order: &[DayKey]) -> Option<RiskFinding> {
    let training_days: Vec<DayKey> = day_order
      .iter()
      .copied()
      .filter(|day| !plan.sessions(*day).is_empty())
      .collect();
    let recovery_days = day_order
      .iter()
      .filter(|day| plan.sessions(**day).iter().any(|s| s.is_recovery()))
      .count();

    if training_days.len() < self.config.recovery_check_min_training_days
      || recovery_days >= self.config.min_recovery_days
    {
      return None;
    }

    Some(RiskFinding {
      id: "missing-recovery".to_string(),
      kind: RiskKind::MissingRecovery,
      severity: Severity::Medium,
      title: "Not enough recovery in the week".to_string(),
      description: format!(
        "{} training days with only {} recovery or mobility day(s); at least {} recommended.",
        training_days.len(),
        recovery_days,
        self.config.min_recovery_days
      ),
      affected_days: training_days,
      muscle_groups: None,
      recommendation_text: "Add a mobility or recovery block to one of the training days."
        .to_string(),
      suggested_plan: Some(synthesize_general_mobility_plan()),
    })
  }

  /// Rule D
  fn excessive_daily_volume(&self, plan: &WeeklyPlan, day_order: &[DayKey]) -> Vec<RiskFinding> {
    let limit = self.config.daily_volume_limit_minutes;

    day_order
      .iter()
      .filter_map(|day| {
        let minutes = plan.day(*day).map_or(0, |p| p.total_duration_minutes());
        if minutes <= limit {
          return None;
        }

        Some(RiskFinding {
          id: format!("daily-volume-{}", day.as_str().to_lowercase()),
          kind: RiskKind::ExcessiveDailyVolume,
          severity: Severity::Medium,
          title: "Excessive volume in a single day".to_string(),
          description: format!(
            "{} totals {} minutes, above the {}-minute daily limit.",
            day, minutes, limit
          ),
          affected_days: vec![*day],
          muscle_groups: None,
          recommendation_text: format!(
            "Split {} into two shorter days or cut accessory volume.",
            day
          ),
          suggested_plan: None,
        })
      })
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Helpers
/// ---------------------------------------------------------------------------

/// Tags that put load on the day. Mobility and recovery sessions never count,
/// so an inserted corrective block cannot create or widen an overlap.
fn day_tags(plan: &WeeklyPlan, day: DayKey) -> BTreeSet<String> {
  plan
    .sessions(day)
    .iter()
    .filter(|s| !s.modality.is_recovery_or_mobility())
    .flat_map(|s| s.muscle_tags())
    .collect()
}

fn is_high_intensity_day(plan: &WeeklyPlan, day: DayKey) -> bool {
  plan.sessions(day).iter().any(|s| s.is_high_intensity())
}

fn pair_slug(first: DayKey, second: DayKey) -> String {
  format!(
    "{}-{}",
    first.as_str().to_lowercase(),
    second.as_str().to_lowercase()
  )
}

/// Detect risks with the default thresholds
pub fn detect_risks(plan: &WeeklyPlan, day_order: &[DayKey]) -> Vec<RiskFinding> {
  RiskDetector::default().detect(plan, day_order)
}

/// Display ordering: high first, ties keep detection order
pub fn rank_by_severity(findings: &[RiskFinding]) -> Vec<RiskFinding> {
  let mut ranked = findings.to_vec();
  ranked.sort_by(|a, b| b.severity.cmp(&a.severity));
  ranked
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{DayPlan, Modality, Session};
  use crate::test_utils::{
    findings_of, five_day_week, mobility, plan_from, session, strength, without_session_ids,
  };

  fn week() -> [DayKey; 7] {
    DayKey::ALL
  }

  fn hard(id: &str, intensity: &str) -> Session {
    session(id, "40 min", Modality::MetCon, intensity, &[])
  }

  #[test]
  fn test_zero_week_has_no_findings() {
    let rest_days = DayKey::ALL
      .iter()
      .fold(WeeklyPlan::new(), |p, d| p.with_day(*d, DayPlan::default()));

    assert!(detect_risks(&rest_days, &week()).is_empty());
    assert!(detect_risks(&WeeklyPlan::new(), &week()).is_empty());
  }

  #[test]
  fn test_monday_tuesday_legs() {
    let plan = plan_from(vec![
      (DayKey::Monday, vec![session("a", "45 min", Modality::Strength, "RPE 7", &["legs"])]),
      (DayKey::Tuesday, vec![session("b", "50 min", Modality::Strength, "RPE 8", &["legs"])]),
    ]);

    let findings = detect_risks(&plan, &week());
    assert_eq!(findings.len(), 1);

    let f = &findings[0];
    assert_eq!(f.kind, RiskKind::ConsecutiveMuscleGroup);
    assert_eq!(f.severity, Severity::Medium);
    assert_eq!(f.affected_days, vec![DayKey::Monday, DayKey::Tuesday]);
    assert_eq!(f.muscle_groups, Some(vec!["legs".to_string()]));
    assert_eq!(f.id, "consecutive-muscle-monday-tuesday");

    let mini = f.suggested_plan.as_ref().unwrap();
    assert_eq!(mini.sessions.len(), 1);
    assert_eq!(mini.sessions[0].label, "Hip & leg mobility");
    assert_eq!(mini.sessions[0].duration_minutes(), 15);
  }

  #[test]
  fn test_overlap_escalates_with_two_tags() {
    let plan = plan_from(vec![
      (DayKey::Wednesday, vec![strength("a", &["legs", "back"])]),
      (DayKey::Thursday, vec![strength("b", &["back", "legs", "chest"])]),
    ]);

    let findings = detect_risks(&plan, &week());
    let overlap = findings_of(&findings, RiskKind::ConsecutiveMuscleGroup);
    assert_eq!(overlap.len(), 1);
    assert_eq!(overlap[0].severity, Severity::High);
    assert_eq!(
      overlap[0].muscle_groups,
      Some(vec!["back".to_string(), "legs".to_string()])
    );
    assert_eq!(overlap[0].suggested_plan.as_ref().unwrap().sessions.len(), 2);
  }

  #[test]
  fn test_exempt_tags_never_overlap() {
    for tag in ["cardio", "mobility", "full-body"] {
      let plan = plan_from(vec![
        (DayKey::Monday, vec![strength("a", &[tag])]),
        (DayKey::Tuesday, vec![strength("b", &[tag])]),
      ]);
      let findings = detect_risks(&plan, &week());
      assert!(
        findings_of(&findings, RiskKind::ConsecutiveMuscleGroup).is_empty(),
        "{} should be exempt",
        tag
      );
    }
  }

  #[test]
  fn test_overlap_only_between_adjacent_days() {
    let plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["legs"])]),
      (DayKey::Wednesday, vec![strength("b", &["legs"])]),
      (DayKey::Sunday, vec![strength("c", &["legs"])]),
    ]);
    assert!(detect_risks(&plan, &week()).is_empty());
  }

  #[test]
  fn test_spanish_tags_overlap_with_english() {
    let plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["Piernas"])]),
      (DayKey::Tuesday, vec![strength("b", &["legs"])]),
    ]);
    let findings = detect_risks(&plan, &week());
    assert_eq!(findings[0].muscle_groups, Some(vec!["legs".to_string()]));
  }

  #[test]
  fn test_consecutive_high_intensity() {
    let plan = plan_from(vec![
      (DayKey::Friday, vec![hard("a", "RPE 9")]),
      (DayKey::Saturday, vec![hard("b", "rpe 9")]),
    ]);

    let findings = detect_risks(&plan, &week());
    let high = findings_of(&findings, RiskKind::ConsecutiveHighIntensity);
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].severity, Severity::High);
    assert_eq!(high[0].affected_days, vec![DayKey::Friday, DayKey::Saturday]);

    let deload = high[0].suggested_plan.as_ref().unwrap();
    assert_eq!(deload.sessions.len(), 2);
  }

  #[test]
  fn test_high_intensity_needs_both_days() {
    let plan = plan_from(vec![
      (DayKey::Friday, vec![hard("a", "RPE 9")]),
      (DayKey::Saturday, vec![hard("b", "RPE 7")]),
    ]);
    assert!(detect_risks(&plan, &week()).is_empty());
  }

  #[test]
  fn test_high_intensity_markers() {
    for marker in ["Alta", "Intensidad máxima", "RPE 10", "rpe 8"] {
      let plan = plan_from(vec![
        (DayKey::Monday, vec![hard("a", marker)]),
        (DayKey::Tuesday, vec![hard("b", "Alta")]),
      ]);
      let findings = detect_risks(&plan, &week());
      assert_eq!(
        findings_of(&findings, RiskKind::ConsecutiveHighIntensity).len(),
        1,
        "marker {}",
        marker
      );
    }
  }

  #[test]
  fn test_missing_recovery_threshold() {
    let findings = detect_risks(&five_day_week(1), &week());
    let missing = findings_of(&findings, RiskKind::MissingRecovery);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::Medium);
    assert_eq!(
      missing[0].affected_days,
      vec![
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday
      ]
    );
    assert_eq!(
      missing[0].suggested_plan.as_ref().unwrap().sessions[0].label,
      "General mobility"
    );

    let findings = detect_risks(&five_day_week(2), &week());
    assert!(findings_of(&findings, RiskKind::MissingRecovery).is_empty());
  }

  #[test]
  fn test_missing_recovery_needs_enough_training_days() {
    let plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["legs"])]),
      (DayKey::Wednesday, vec![strength("b", &["back"])]),
      (DayKey::Friday, vec![strength("c", &["chest"])]),
      (DayKey::Sunday, vec![strength("d", &["arms"])]),
    ]);
    assert!(detect_risks(&plan, &week()).is_empty());
  }

  #[test]
  fn test_recovery_by_training_type() {
    let mut plan = five_day_week(1);
    let mut walk = session("walk", "30 min", Modality::Cardio, "RPE 5", &["cardio"]);
    walk.training_type = Some("Recuperación".to_string());
    plan.append_sessions(DayKey::Friday, vec![walk]);

    let findings = detect_risks(&plan, &week());
    assert!(findings_of(&findings, RiskKind::MissingRecovery).is_empty());
  }

  #[test]
  fn test_daily_volume_threshold() {
    let over = plan_from(vec![
      (
        DayKey::Monday,
        vec![
          session("a", "61 min", Modality::Strength, "RPE 6", &["legs"]),
          session("b", "60 min", Modality::Cardio, "RPE 5", &["cardio"]),
        ],
      ),
      (DayKey::Wednesday, vec![session("c", "120 min", Modality::Cardio, "RPE 5", &[])]),
    ]);

    let findings = detect_risks(&over, &week());
    let volume = findings_of(&findings, RiskKind::ExcessiveDailyVolume);
    assert_eq!(volume.len(), 1);
    assert_eq!(volume[0].affected_days, vec![DayKey::Monday]);
    assert_eq!(volume[0].severity, Severity::Medium);
    assert!(volume[0].suggested_plan.is_none());
  }

  #[test]
  fn test_rule_order() {
    let plan = plan_from(vec![
      (
        DayKey::Monday,
        vec![session("a", "130 min", Modality::Strength, "RPE 9", &["legs"])],
      ),
      (DayKey::Tuesday, vec![session("b", "45 min", Modality::Strength, "RPE 9", &["legs"])]),
    ]);

    let kinds: Vec<RiskKind> = detect_risks(&plan, &week()).iter().map(|f| f.kind).collect();
    assert_eq!(
      kinds,
      vec![
        RiskKind::ConsecutiveMuscleGroup,
        RiskKind::ConsecutiveHighIntensity,
        RiskKind::ExcessiveDailyVolume
      ]
    );
  }

  #[test]
  fn test_custom_thresholds() {
    let config = AnalysisConfig {
      daily_volume_limit_minutes: 40,
      ..AnalysisConfig::default()
    };
    let plan = plan_from(vec![(DayKey::Monday, vec![strength("a", &["legs"])])]);

    assert!(detect_risks(&plan, &week()).is_empty());
    let findings = RiskDetector::new(config).detect(&plan, &week());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, RiskKind::ExcessiveDailyVolume);
  }

  #[test]
  fn test_inserted_mobility_plan_does_not_add_findings() {
    let mut plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["legs"])]),
      (DayKey::Tuesday, vec![strength("b", &["legs"])]),
    ]);
    let before = detect_risks(&plan, &week());
    let mini = before[0].suggested_plan.clone().unwrap();

    plan.append_sessions(DayKey::Tuesday, mini.sessions);
    let after = detect_risks(&plan, &week());

    assert_eq!(after.len(), before.len());
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].severity, Severity::Medium);
    assert_eq!(after[0].muscle_groups, Some(vec!["legs".to_string()]));
  }

  #[test]
  fn test_inserted_upper_body_plan_keeps_overlap_unchanged() {
    let mut plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["back", "chest"])]),
      (DayKey::Tuesday, vec![strength("b", &["back"])]),
      (DayKey::Wednesday, vec![strength("c", &["shoulders"])]),
    ]);
    let before = detect_risks(&plan, &week());
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].muscle_groups, Some(vec!["back".to_string()]));

    let mini = before[0].suggested_plan.clone().unwrap();
    assert_eq!(mini.sessions[0].label, "Upper-body mobility");
    plan.append_sessions(DayKey::Tuesday, mini.sessions);

    let after = detect_risks(&plan, &week());
    assert_eq!(without_session_ids(&after), without_session_ids(&before));
  }

  #[test]
  fn test_mobility_sessions_do_not_load_muscle_groups() {
    let mut stretch = session("s", "20 min", Modality::Recovery, "RPE 2", &["legs"]);
    stretch.label = "Foam rolling".to_string();
    let plan = plan_from(vec![
      (DayKey::Monday, vec![strength("a", &["legs"])]),
      (DayKey::Tuesday, vec![stretch]),
    ]);
    assert!(detect_risks(&plan, &week()).is_empty());
  }

  #[test]
  fn test_inserted_deload_plan_does_not_add_findings() {
    let mut plan = plan_from(vec![
      (DayKey::Friday, vec![hard("a", "RPE 9")]),
      (DayKey::Saturday, vec![hard("b", "RPE 9")]),
    ]);
    let before = detect_risks(&plan, &week());
    let deload = before[0].suggested_plan.clone().unwrap();

    plan.append_sessions(DayKey::Saturday, deload.sessions);
    let after = detect_risks(&plan, &week());
    assert_eq!(without_session_ids(&after), without_session_ids(&before));
  }

  #[test]
  fn test_inserted_general_mobility_clears_missing_recovery() {
    let mut plan = five_day_week(1);
    let findings = detect_risks(&plan, &week());
    let missing = findings_of(&findings, RiskKind::MissingRecovery)[0];

    let mini = missing.suggested_plan.clone().unwrap();
    plan.append_sessions(DayKey::Friday, mini.sessions);
    assert!(detect_risks(&plan, &week()).is_empty());
  }

  #[test]
  fn test_detection_is_deterministic() {
    let mut plan = five_day_week(0);
    plan.append_sessions(DayKey::Tuesday, vec![strength("x", &["legs"])]);
    plan.append_sessions(DayKey::Saturday, vec![mobility("y")]);

    let first = without_session_ids(&detect_risks(&plan, &week()));
    let second = without_session_ids(&detect_risks(&plan, &week()));
    assert!(!first.is_empty());
    assert_eq!(first, second);
  }

  #[test]
  fn test_rank_by_severity_is_stable() {
    let plan = plan_from(vec![
      (
        DayKey::Monday,
        vec![session("a", "130 min", Modality::Strength, "RPE 9", &["legs"])],
      ),
      (
        DayKey::Tuesday,
        vec![session("b", "125 min", Modality::Strength, "RPE 9", &["legs", "back"])],
      ),
      (DayKey::Wednesday, vec![session("c", "20 min", Modality::Strength, "RPE 6", &["back"])]),
    ]);

    let detected = detect_risks(&plan, &week());
    let ranked: Vec<String> = rank_by_severity(&detected).into_iter().map(|f| f.id).collect();
    assert_eq!(
      ranked,
      vec![
        "high-intensity-monday-tuesday",
        "consecutive-muscle-monday-tuesday",
        "consecutive-muscle-tuesday-wednesday",
        "daily-volume-monday",
        "daily-volume-tuesday",
      ]
    );
  }
}
