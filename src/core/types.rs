use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InvestmentGoal {
    Retirement,
    Wealth,
    Education,
    House,
    ShortTerm,
    Other,
}

/// Parameters for a single SIP projection. Years may be fractional; the
/// projection formula uses real exponentiation over months.
#[derive(Debug, Clone, Copy)]
pub struct SipInputs {
    pub monthly_amount: f64,
    pub annual_return_percent: f64,
    pub years: f64,
}

/// Projection figures in whole currency units. Each field is rounded
/// independently, so `total_value` can differ from the sum of the other two
/// by one unit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipResult {
    pub total_investment: i64,
    pub estimated_returns: i64,
    pub total_value: i64,
}

#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub age: u32,
    pub monthly_income: f64,
    pub risk_profile: RiskProfile,
    pub investment_goal: InvestmentGoal,
}

/// One titled section of an investment plan. Order within a plan is
/// presentation order and is fixed by the recommender.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBlock {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub suggested_monthly_amount: i64,
    pub contribution_percent: u32,
    pub equity_percent: u32,
    pub debt_percent: u32,
    pub horizon_years: u32,
    pub goal_description: &'static str,
    pub recommendations: Vec<RecommendationBlock>,
}
