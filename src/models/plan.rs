use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::parsing;

/// ---------------------------------------------------------------------------
/// Muscle-group tags
/// ---------------------------------------------------------------------------

pub const TAG_LEGS: &str = "legs";
pub const TAG_BACK: &str = "back";
pub const TAG_CHEST: &str = "chest";
pub const TAG_SHOULDERS: &str = "shoulders";
pub const TAG_CARDIO: &str = "cardio";
pub const TAG_MOBILITY: &str = "mobility";
pub const TAG_FULL_BODY: &str = "full-body";

/// Tags that never count as overlapping stress between consecutive days
pub const OVERLAP_EXEMPT_TAGS: [&str; 3] = [TAG_CARDIO, TAG_MOBILITY, TAG_FULL_BODY];

/// Normalize a free-form muscle-group tag (case, whitespace, Spanish labels)
pub fn normalize_muscle_tag(tag: &str) -> String {
  let lowered = tag.trim().to_lowercase();
  match lowered.as_str() {
    "piernas" | "leg" => TAG_LEGS.to_string(),
    "espalda" => TAG_BACK.to_string(),
    "pecho" => TAG_CHEST.to_string(),
    "hombros" | "shoulder" => TAG_SHOULDERS.to_string(),
    "brazos" => "arms".to_string(),
    "gluteos" | "glúteos" => "glutes".to_string(),
    "movilidad" => TAG_MOBILITY.to_string(),
    "fullbody" | "full body" => TAG_FULL_BODY.to_string(),
    _ => lowered,
  }
}

/// ---------------------------------------------------------------------------
/// Day keys (calendar order)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayKey {
  #[serde(alias = "monday", alias = "Lunes", alias = "lunes")]
  Monday,
  #[serde(alias = "tuesday", alias = "Martes", alias = "martes")]
  Tuesday,
  #[serde(alias = "wednesday", alias = "Miércoles", alias = "miércoles", alias = "Miercoles")]
  Wednesday,
  #[serde(alias = "thursday", alias = "Jueves", alias = "jueves")]
  Thursday,
  #[serde(alias = "friday", alias = "Viernes", alias = "viernes")]
  Friday,
  #[serde(alias = "saturday", alias = "Sábado", alias = "sábado", alias = "Sabado")]
  Saturday,
  #[serde(alias = "sunday", alias = "Domingo", alias = "domingo")]
  Sunday,
}

impl DayKey {
  pub const ALL: [DayKey; 7] = [
    DayKey::Monday,
    DayKey::Tuesday,
    DayKey::Wednesday,
    DayKey::Thursday,
    DayKey::Friday,
    DayKey::Saturday,
    DayKey::Sunday,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DayKey::Monday => "Monday",
      DayKey::Tuesday => "Tuesday",
      DayKey::Wednesday => "Wednesday",
      DayKey::Thursday => "Thursday",
      DayKey::Friday => "Friday",
      DayKey::Saturday => "Saturday",
      DayKey::Sunday => "Sunday",
    }
  }
}

impl std::fmt::Display for DayKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Modality
/// ---------------------------------------------------------------------------

/// Session modality. Unknown labels are kept verbatim in `Other`, so
/// deserialization never fails on a new modality name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Modality {
  Strength,
  Cardio,
  Mobility,
  Recovery,
  Core,
  MetCon,
  Hiit,
  Accessory,
  Other(String),
}

impl Modality {
  pub fn as_str(&self) -> &str {
    match self {
      Modality::Strength => "Strength",
      Modality::Cardio => "Cardio",
      Modality::Mobility => "Mobility",
      Modality::Recovery => "Recovery",
      Modality::Core => "Core",
      Modality::MetCon => "MetCon",
      Modality::Hiit => "HIIT",
      Modality::Accessory => "Accessory",
      Modality::Other(name) => name,
    }
  }

  pub fn is_recovery_or_mobility(&self) -> bool {
    matches!(self, Modality::Mobility | Modality::Recovery)
  }
}

impl Default for Modality {
  fn default() -> Self {
    Modality::Other(String::new())
  }
}

impl From<String> for Modality {
  fn from(s: String) -> Self {
    match s.trim().to_lowercase().as_str() {
      "strength" | "fuerza" => Modality::Strength,
      "cardio" => Modality::Cardio,
      "mobility" | "movilidad" => Modality::Mobility,
      "recovery" | "recuperacion" | "recuperación" => Modality::Recovery,
      "core" => Modality::Core,
      "metcon" => Modality::MetCon,
      "hiit" => Modality::Hiit,
      "accessory" => Modality::Accessory,
      _ => Modality::Other(s.trim().to_string()),
    }
  }
}

impl From<Modality> for String {
  fn from(m: Modality) -> Self {
    m.as_str().to_string()
  }
}

impl std::fmt::Display for Modality {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Session / DayPlan / WeeklyPlan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  pub id: String,
  #[serde(default, alias = "time")]
  pub start_time: String,
  #[serde(alias = "block")]
  pub label: String,
  /// Free text such as "45 min"
  #[serde(default)]
  pub duration: String,
  #[serde(default)]
  pub modality: Modality,
  /// Free text, may carry an RPE ("RPE 7.5")
  #[serde(default)]
  pub intensity: String,
  #[serde(default, alias = "gruposMusculares")]
  pub muscle_groups: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none", alias = "tipoEntrenamiento")]
  pub training_type: Option<String>,
  #[serde(default)]
  pub notes: String,
}

impl Session {
  /// Minutes parsed from the duration text, 0 when it carries no number
  pub fn duration_minutes(&self) -> u32 {
    parsing::parse_duration_minutes(&self.duration)
  }

  pub fn rpe(&self) -> Option<f64> {
    parsing::parse_rpe(&self.intensity)
  }

  pub fn is_high_intensity(&self) -> bool {
    parsing::is_high_intensity(&self.intensity)
  }

  /// Normalized, de-duplicated muscle-group tags
  pub fn muscle_tags(&self) -> BTreeSet<String> {
    self
      .muscle_groups
      .iter()
      .map(|t| normalize_muscle_tag(t))
      .filter(|t| !t.is_empty())
      .collect()
  }

  /// Recovery by modality, by training type, or by a light intensity label
  pub fn is_recovery(&self) -> bool {
    if self.modality.is_recovery_or_mobility() {
      return true;
    }
    let by_type = self.training_type.as_deref().map_or(false, |t| {
      matches!(
        t.trim().to_lowercase().as_str(),
        "recuperacion" | "recuperación" | "movilidad" | "recovery" | "mobility"
      )
    });
    by_type || parsing::is_light_intensity(&self.intensity)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
  #[serde(default)]
  pub micro_cycle: String,
  #[serde(default)]
  pub focus: String,
  #[serde(default, alias = "volume")]
  pub volume_label: String,
  #[serde(default, alias = "intensity")]
  pub intensity_label: String,
  #[serde(default)]
  pub sessions: Vec<Session>,
}

impl DayPlan {
  pub fn with_sessions(sessions: Vec<Session>) -> Self {
    Self {
      sessions,
      ..Self::default()
    }
  }

  pub fn is_rest_day(&self) -> bool {
    self.sessions.is_empty()
  }

  pub fn total_duration_minutes(&self) -> u32 {
    self
      .sessions
      .iter()
      .fold(0u32, |acc, s| acc.saturating_add(s.duration_minutes()))
  }
}

/// A week of training keyed by day. Days absent from the map read as empty
/// rest days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
  days: BTreeMap<DayKey, DayPlan>,
}

impl WeeklyPlan {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_day(mut self, day: DayKey, plan: DayPlan) -> Self {
    self.days.insert(day, plan);
    self
  }

  pub fn set_day(&mut self, day: DayKey, plan: DayPlan) {
    self.days.insert(day, plan);
  }

  pub fn day(&self, day: DayKey) -> Option<&DayPlan> {
    self.days.get(&day)
  }

  pub fn sessions(&self, day: DayKey) -> &[Session] {
    self.days.get(&day).map(|p| p.sessions.as_slice()).unwrap_or(&[])
  }

  /// Append sessions to a day, creating the day if it is missing
  pub fn append_sessions<I>(&mut self, day: DayKey, sessions: I)
  where
    I: IntoIterator<Item = Session>,
  {
    self.days.entry(day).or_default().sessions.extend(sessions);
  }
}

/// Program's intended weekly totals, used only as ratio denominators
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTargets {
  #[serde(default)]
  pub sessions: u32,
  #[serde(default, alias = "duration")]
  pub duration_minutes: u32,
  #[serde(default)]
  pub calories: u32,
}
