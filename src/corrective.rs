//! Corrective mini-plan synthesis
//!
//! Builds small, self-contained blocks (mobility or deload) that a coach can
//! drop straight into a day to answer a risk finding. Content is fixed per
//! branch; only the session ids change between calls.

use chrono::Utc;

use crate::models::plan::{
  normalize_muscle_tag, TAG_BACK, TAG_CARDIO, TAG_CHEST, TAG_LEGS, TAG_MOBILITY, TAG_SHOULDERS,
};
use crate::models::{MiniPlan, MiniPlanKind, Modality, Session};

/// ---------------------------------------------------------------------------
/// Session templates
/// ---------------------------------------------------------------------------

const LIGHT_INTENSITY: &str = "Ligera · RPE 3";

struct SessionTemplate {
  id_prefix: &'static str,
  label: &'static str,
  minutes: u32,
  modality: Modality,
  intensity: &'static str,
  tags: &'static [&'static str],
  notes: &'static str,
}

impl SessionTemplate {
  fn build(&self) -> Session {
    Session {
      id: session_id(self.id_prefix),
      start_time: String::new(),
      label: self.label.to_string(),
      duration: format!("{} min", self.minutes),
      modality: self.modality.clone(),
      intensity: self.intensity.to_string(),
      muscle_groups: self.tags.iter().map(|t| t.to_string()).collect(),
      training_type: None,
      notes: self.notes.to_string(),
    }
  }
}

fn hip_and_leg_mobility() -> SessionTemplate {
  SessionTemplate {
    id_prefix: "mobility-legs",
    label: "Hip & leg mobility",
    minutes: 15,
    modality: Modality::Mobility,
    intensity: LIGHT_INTENSITY,
    tags: &[TAG_LEGS, TAG_MOBILITY],
    notes: "Hip openers, hamstring flossing and ankle dorsiflexion drills",
  }
}

fn upper_body_mobility() -> SessionTemplate {
  SessionTemplate {
    id_prefix: "mobility-upper",
    label: "Upper-body mobility",
    minutes: 15,
    modality: Modality::Mobility,
    intensity: LIGHT_INTENSITY,
    tags: &[TAG_BACK, TAG_CHEST, TAG_SHOULDERS, TAG_MOBILITY],
    notes: "Thoracic rotations, pec doorway stretch and band dislocates",
  }
}

fn general_mobility() -> SessionTemplate {
  SessionTemplate {
    id_prefix: "mobility-general",
    label: "General mobility",
    minutes: 20,
    modality: Modality::Mobility,
    intensity: LIGHT_INTENSITY,
    tags: &[TAG_MOBILITY],
    notes: "Full-body dynamic mobility flow",
  }
}

fn light_cardio() -> SessionTemplate {
  SessionTemplate {
    id_prefix: "deload-cardio",
    label: "Light cardio",
    minutes: 20,
    modality: Modality::Cardio,
    intensity: "RPE 3-4 · conversational pace",
    tags: &[TAG_CARDIO],
    notes: "Bike or brisk walk, able to hold a conversation throughout",
  }
}

fn stretching() -> SessionTemplate {
  SessionTemplate {
    id_prefix: "deload-stretch",
    label: "Stretching & mobility",
    minutes: 15,
    modality: Modality::Mobility,
    intensity: LIGHT_INTENSITY,
    tags: &[TAG_MOBILITY],
    notes: "Static stretching and breathing",
  }
}

/// Opaque, unique per call: `<prefix>-<epoch millis>-<random suffix>`
fn session_id(prefix: &str) -> String {
  let suffix = uuid::Uuid::new_v4().simple().to_string();
  format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), &suffix[..8])
}

/// ---------------------------------------------------------------------------
/// Synthesis
/// ---------------------------------------------------------------------------

/// Mobility mini-plan scoped to the overloaded muscle groups.
///
/// `legs` adds a hip & leg block, `back` or `chest` adds an upper-body block
/// (both can fire). Anything else, or an empty tag list, yields one general
/// mobility block.
pub fn synthesize_mobility_plan<S: AsRef<str>>(muscle_groups: &[S]) -> MiniPlan {
  let tags: Vec<String> = muscle_groups
    .iter()
    .map(|t| normalize_muscle_tag(t.as_ref()))
    .collect();
  let has = |tag: &str| tags.iter().any(|t| t == tag);

  let mut templates = Vec::new();
  if has(TAG_LEGS) {
    templates.push(hip_and_leg_mobility());
  }
  if has(TAG_BACK) || has(TAG_CHEST) {
    templates.push(upper_body_mobility());
  }

  let name = match templates.len() {
    0 => "General mobility reset",
    1 if has(TAG_LEGS) => "Lower-body mobility reset",
    1 => "Upper-body mobility reset",
    _ => "Full mobility reset",
  };

  if templates.is_empty() {
    templates.push(general_mobility());
  }

  MiniPlan {
    kind: MiniPlanKind::Mobility,
    name: name.to_string(),
    sessions: templates.iter().map(SessionTemplate::build).collect(),
  }
}

/// Mobility mini-plan with no muscle-group scope
pub fn synthesize_general_mobility_plan() -> MiniPlan {
  synthesize_mobility_plan::<&str>(&[])
}

/// Fixed deload: light cardio followed by stretching
pub fn synthesize_deload_plan() -> MiniPlan {
  MiniPlan {
    kind: MiniPlanKind::Deload,
    name: "Active deload".to_string(),
    sessions: vec![light_cardio().build(), stretching().build()],
  }
}
