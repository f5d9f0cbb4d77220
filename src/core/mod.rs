mod plan;
mod projection;
mod types;

pub use plan::{build_plan, format_inr, recommend};
pub use projection::project;
pub use types::{
    InvestmentGoal, PlanInputs, PlanOutcome, RecommendationBlock, RiskProfile, SipInputs,
    SipResult,
};
