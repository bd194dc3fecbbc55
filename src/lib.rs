pub mod analysis;
pub mod commands;
pub mod config;
pub mod corrective;
pub mod models;
pub mod parsing;
pub mod risk;

#[cfg(test)]
mod test_utils;

pub use analysis::{aggregate, WeeklyAnalysis, WeeklyMetrics};
pub use config::{AnalysisConfig, ConfigError};
pub use corrective::{synthesize_deload_plan, synthesize_mobility_plan};
pub use models::{
  DayKey, DayPlan, MiniPlan, MiniPlanKind, Modality, RiskFinding, RiskKind, Session, Severity,
  WeeklyPlan, WeeklyTargets,
};
pub use risk::{detect_risks, rank_by_severity, RiskDetector};

/// Metrics plus risk findings for a week, the call a plan view makes on
/// every change
pub fn analyze_week(
  plan: &WeeklyPlan,
  targets: Option<&WeeklyTargets>,
  config: &AnalysisConfig,
) -> WeeklyAnalysis {
  WeeklyAnalysis::compute(plan, targets, config)
}
