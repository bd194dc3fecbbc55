pub mod plan;
pub mod finding;

pub use plan::{DayKey, DayPlan, Modality, Session, WeeklyPlan, WeeklyTargets};
pub use finding::{MiniPlan, MiniPlanKind, RiskFinding, RiskKind, Severity};
