//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Session and plan factories
//! - Canned weeks that trigger (or avoid) each risk rule
//! - Helper assertions

use crate::models::{DayKey, DayPlan, Modality, RiskFinding, RiskKind, Session, WeeklyPlan};

/// ---------------------------------------------------------------------------
/// Factories
/// ---------------------------------------------------------------------------

/// Build a session with the fields the analysis reads
pub fn session(
  id: &str,
  duration: &str,
  modality: Modality,
  intensity: &str,
  tags: &[&str],
) -> Session {
  Session {
    id: id.to_string(),
    start_time: "08:00".to_string(),
    label: format!("Block {}", id),
    duration: duration.to_string(),
    modality,
    intensity: intensity.to_string(),
    muscle_groups: tags.iter().map(|t| t.to_string()).collect(),
    training_type: None,
    notes: String::new(),
  }
}

/// 45-minute strength session on the given tags at RPE 7
pub fn strength(id: &str, tags: &[&str]) -> Session {
  session(id, "45 min", Modality::Strength, "RPE 7", tags)
}

/// 30-minute mobility session (counts as a recovery day)
pub fn mobility(id: &str) -> Session {
  session(id, "30 min", Modality::Mobility, "Ligera", &["mobility"])
}

/// Build a weekly plan from (day, sessions) pairs; other days stay absent
pub fn plan_from(days: Vec<(DayKey, Vec<Session>)>) -> WeeklyPlan {
  days
    .into_iter()
    .fold(WeeklyPlan::new(), |plan, (day, sessions)| {
      plan.with_day(day, DayPlan::with_sessions(sessions))
    })
}

/// ---------------------------------------------------------------------------
/// Canned weeks
/// ---------------------------------------------------------------------------

/// Five training days on non-adjacent muscle groups with moderate load.
/// `recovery_days` of them (from Monday) get a mobility block.
pub fn five_day_week(recovery_days: usize) -> WeeklyPlan {
  let layout = [
    (DayKey::Monday, "legs"),
    (DayKey::Tuesday, "chest"),
    (DayKey::Wednesday, "back"),
    (DayKey::Thursday, "arms"),
    (DayKey::Friday, "glutes"),
  ];

  let days = layout
    .iter()
    .enumerate()
    .map(|(i, (day, tag))| {
      let mut sessions = vec![strength(&format!("{}-main", day), &[*tag])];
      if i < recovery_days {
        sessions.push(mobility(&format!("{}-mob", day)));
      }
      (*day, sessions)
    })
    .collect();

  plan_from(days)
}

/// ---------------------------------------------------------------------------
/// Assertions
/// ---------------------------------------------------------------------------

pub fn findings_of(findings: &[RiskFinding], kind: RiskKind) -> Vec<&RiskFinding> {
  findings.iter().filter(|f| f.kind == kind).collect()
}

/// Findings with synthesized session ids blanked, for run-to-run comparison
pub fn without_session_ids(findings: &[RiskFinding]) -> Vec<RiskFinding> {
  findings
    .iter()
    .cloned()
    .map(|mut f| {
      if let Some(plan) = f.suggested_plan.as_mut() {
        for s in plan.sessions.iter_mut() {
          s.id.clear();
        }
      }
      f
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_five_day_week_layout() {
    let plan = five_day_week(1);
    assert_eq!(plan.sessions(DayKey::Monday).len(), 2);
    assert_eq!(plan.sessions(DayKey::Tuesday).len(), 1);
    assert!(plan.sessions(DayKey::Saturday).is_empty());
  }

  #[test]
  fn test_session_factory_parses() {
    let s = session("a", "50 min", Modality::Strength, "RPE 8", &["legs"]);
    assert_eq!(s.duration_minutes(), 50);
    assert_eq!(s.rpe(), Some(8.0));
  }
}
