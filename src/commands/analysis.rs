use serde::Deserialize;

use super::{parse_request, to_response, CommandError};
use crate::analysis::WeeklyAnalysis;
use crate::config::AnalysisConfig;
use crate::models::{DayKey, MiniPlan, WeeklyPlan, WeeklyTargets};

/// ---------------------------------------------------------------------------
/// Requests
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeWeekRequest {
  pub plan: WeeklyPlan,
  #[serde(default)]
  pub targets: Option<WeeklyTargets>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyMiniPlanRequest {
  pub plan: WeeklyPlan,
  pub day: DayKey,
  pub mini_plan: MiniPlan,
}

/// ---------------------------------------------------------------------------
/// Weekly Analysis Commands
/// ---------------------------------------------------------------------------

/// Metrics and risk findings for `{ plan, targets? }`, default thresholds
pub fn analyze_week_json(request_json: &str) -> Result<String, CommandError> {
  analyze_week_json_with(request_json, &AnalysisConfig::default())
}

pub fn analyze_week_json_with(
  request_json: &str,
  config: &AnalysisConfig,
) -> Result<String, CommandError> {
  let request: AnalyzeWeekRequest = parse_request(request_json)?;
  let analysis = WeeklyAnalysis::compute(&request.plan, request.targets.as_ref(), config);
  to_response(&analysis)
}

/// Append a mini-plan's sessions to the caller-chosen day and return the
/// updated plan
pub fn apply_mini_plan_json(request_json: &str) -> Result<String, CommandError> {
  let request: ApplyMiniPlanRequest = parse_request(request_json)?;
  let mut plan = request.plan;

  tracing::debug!(
    day = %request.day,
    mini_plan = %request.mini_plan.name,
    sessions = request.mini_plan.sessions.len(),
    "Applying mini-plan"
  );

  plan.append_sessions(request.day, request.mini_plan.sessions);
  to_response(&plan)
}
