use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    InvestmentGoal, PlanInputs, RecommendationBlock, RiskProfile, SipInputs, build_plan,
    format_inr, project,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<CliRiskProfile> for RiskProfile {
    fn from(value: CliRiskProfile) -> Self {
        match value {
            CliRiskProfile::Conservative => RiskProfile::Conservative,
            CliRiskProfile::Moderate => RiskProfile::Moderate,
            CliRiskProfile::Aggressive => RiskProfile::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliInvestmentGoal {
    Retirement,
    Wealth,
    Education,
    House,
    ShortTerm,
    Other,
}

impl From<CliInvestmentGoal> for InvestmentGoal {
    fn from(value: CliInvestmentGoal) -> Self {
        match value {
            CliInvestmentGoal::Retirement => InvestmentGoal::Retirement,
            CliInvestmentGoal::Wealth => InvestmentGoal::Wealth,
            CliInvestmentGoal::Education => InvestmentGoal::Education,
            CliInvestmentGoal::House => InvestmentGoal::House,
            CliInvestmentGoal::ShortTerm => InvestmentGoal::ShortTerm,
            CliInvestmentGoal::Other => InvestmentGoal::Other,
        }
    }
}

/// Unrecognized risk-profile strings collapse to the conservative default
/// rather than rejecting the request.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiRiskProfile {
    Conservative,
    Moderate,
    Aggressive,
    #[serde(other)]
    Unrecognized,
}

impl From<ApiRiskProfile> for CliRiskProfile {
    fn from(value: ApiRiskProfile) -> Self {
        match value {
            ApiRiskProfile::Conservative | ApiRiskProfile::Unrecognized => {
                CliRiskProfile::Conservative
            }
            ApiRiskProfile::Moderate => CliRiskProfile::Moderate,
            ApiRiskProfile::Aggressive => CliRiskProfile::Aggressive,
        }
    }
}

/// Unrecognized goal strings fall back to the general-goals default.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiInvestmentGoal {
    Retirement,
    Wealth,
    Education,
    House,
    #[serde(alias = "shortTerm", alias = "short_term")]
    ShortTerm,
    Other,
    #[serde(other)]
    Unrecognized,
}

impl From<ApiInvestmentGoal> for CliInvestmentGoal {
    fn from(value: ApiInvestmentGoal) -> Self {
        match value {
            ApiInvestmentGoal::Retirement => CliInvestmentGoal::Retirement,
            ApiInvestmentGoal::Wealth => CliInvestmentGoal::Wealth,
            ApiInvestmentGoal::Education => CliInvestmentGoal::Education,
            ApiInvestmentGoal::House => CliInvestmentGoal::House,
            ApiInvestmentGoal::ShortTerm => CliInvestmentGoal::ShortTerm,
            ApiInvestmentGoal::Other | ApiInvestmentGoal::Unrecognized => CliInvestmentGoal::Other,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly_amount: Option<f64>,
    annual_return: Option<f64>,
    years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    age: Option<u32>,
    monthly_income: Option<f64>,
    risk_profile: Option<ApiRiskProfile>,
    investment_goal: Option<ApiInvestmentGoal>,
}

#[derive(Parser, Debug)]
#[command(
    name = "sipplan",
    about = "SIP projection and rule-based investment plan recommendations"
)]
struct Cli {
    #[arg(long, help = "Monthly SIP contribution, between 500 and 10000000")]
    monthly_amount: f64,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "Expected annual return in percent, between 1 and 30"
    )]
    annual_return: f64,
    #[arg(long, help = "Investment period in years, between 1 and 40")]
    years: f64,
    #[arg(long, help = "Investor age, between 18 and 100")]
    age: u32,
    #[arg(long, help = "Monthly income, between 10000 and 100000000")]
    monthly_income: f64,
    #[arg(long, value_enum, default_value_t = CliRiskProfile::Moderate)]
    risk_profile: CliRiskProfile,
    #[arg(long, value_enum, default_value_t = CliInvestmentGoal::Wealth)]
    investment_goal: CliInvestmentGoal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    total_investment: i64,
    estimated_returns: i64,
    total_value: i64,
    total_investment_display: String,
    estimated_returns_display: String,
    total_value_display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    suggested_monthly_amount: i64,
    suggested_monthly_amount_display: String,
    contribution_percent: u32,
    equity_percent: u32,
    debt_percent: u32,
    horizon_years: u32,
    goal_description: &'static str,
    recommendations: Vec<RecommendationBlock>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_sip_inputs(cli: &Cli) -> Result<SipInputs, String> {
    if !cli.monthly_amount.is_finite() || !(500.0..=10_000_000.0).contains(&cli.monthly_amount) {
        return Err("--monthly-amount must be between 500 and 10000000".to_string());
    }

    if !cli.annual_return.is_finite() || !(1.0..=30.0).contains(&cli.annual_return) {
        return Err("--annual-return must be between 1 and 30".to_string());
    }

    if !cli.years.is_finite() || !(1.0..=40.0).contains(&cli.years) {
        return Err("--years must be between 1 and 40".to_string());
    }

    Ok(SipInputs {
        monthly_amount: cli.monthly_amount,
        annual_return_percent: cli.annual_return,
        years: cli.years,
    })
}

fn build_plan_inputs(cli: &Cli) -> Result<PlanInputs, String> {
    if !(18..=100).contains(&cli.age) {
        return Err("--age must be between 18 and 100".to_string());
    }

    if !cli.monthly_income.is_finite()
        || !(10_000.0..=100_000_000.0).contains(&cli.monthly_income)
    {
        return Err("--monthly-income must be between 10000 and 100000000".to_string());
    }

    Ok(PlanInputs {
        age: cli.age,
        monthly_income: cli.monthly_income,
        risk_profile: cli.risk_profile.into(),
        investment_goal: cli.investment_goal.into(),
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("SIP planner HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/sip");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    let inputs = match sip_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let result = project(&inputs);
    json_response(
        StatusCode::OK,
        SipResponse {
            total_investment: result.total_investment,
            estimated_returns: result.estimated_returns,
            total_value: result.total_value,
            total_investment_display: format_inr(result.total_investment),
            estimated_returns_display: format_inr(result.estimated_returns),
            total_value_display: format_inr(result.total_value),
        },
    )
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    let inputs = match plan_inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let outcome = build_plan(&inputs);
    json_response(
        StatusCode::OK,
        PlanResponse {
            suggested_monthly_amount: outcome.suggested_monthly_amount,
            suggested_monthly_amount_display: format_inr(outcome.suggested_monthly_amount),
            contribution_percent: outcome.contribution_percent,
            equity_percent: outcome.equity_percent,
            debt_percent: outcome.debt_percent,
            horizon_years: outcome.horizon_years,
            goal_description: outcome.goal_description,
            recommendations: outcome.recommendations,
        },
    )
}

fn sip_inputs_from_payload(payload: SipPayload) -> Result<SipInputs, String> {
    let mut cli = default_cli_for_api();
    if let Some(v) = payload.monthly_amount {
        cli.monthly_amount = v;
    }
    if let Some(v) = payload.annual_return {
        cli.annual_return = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    build_sip_inputs(&cli)
}

fn plan_inputs_from_payload(payload: PlanPayload) -> Result<PlanInputs, String> {
    let mut cli = default_cli_for_api();
    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.risk_profile {
        cli.risk_profile = v.into();
    }
    if let Some(v) = payload.investment_goal {
        cli.investment_goal = v.into();
    }
    build_plan_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        monthly_amount: 5_000.0,
        annual_return: 12.0,
        years: 10.0,
        age: 30,
        monthly_income: 50_000.0,
        risk_profile: CliRiskProfile::Moderate,
        investment_goal: CliInvestmentGoal::Wealth,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn sip_inputs_from_json(json: &str) -> Result<SipInputs, String> {
    let payload = serde_json::from_str::<SipPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    sip_inputs_from_payload(payload)
}

#[cfg(test)]
fn plan_inputs_from_json(json: &str) -> Result<PlanInputs, String> {
    let payload = serde_json::from_str::<PlanPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    plan_inputs_from_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_sip_inputs_accepts_defaults() {
        let inputs = build_sip_inputs(&sample_cli()).expect("valid inputs");
        assert_approx(inputs.monthly_amount, 5_000.0);
        assert_approx(inputs.annual_return_percent, 12.0);
        assert_approx(inputs.years, 10.0);
    }

    #[test]
    fn build_sip_inputs_rejects_out_of_range_amount() {
        let mut cli = sample_cli();
        cli.monthly_amount = 499.0;
        let err = build_sip_inputs(&cli).expect_err("must reject small amount");
        assert!(err.contains("--monthly-amount"));

        cli.monthly_amount = 10_000_001.0;
        let err = build_sip_inputs(&cli).expect_err("must reject large amount");
        assert!(err.contains("--monthly-amount"));
    }

    #[test]
    fn build_sip_inputs_rejects_out_of_range_return_and_years() {
        let mut cli = sample_cli();
        cli.annual_return = 0.5;
        let err = build_sip_inputs(&cli).expect_err("must reject sub-1 return");
        assert!(err.contains("--annual-return"));

        let mut cli = sample_cli();
        cli.years = 41.0;
        let err = build_sip_inputs(&cli).expect_err("must reject long period");
        assert!(err.contains("--years"));
    }

    #[test]
    fn build_sip_inputs_rejects_non_finite_values() {
        let mut cli = sample_cli();
        cli.monthly_amount = f64::NAN;
        assert!(build_sip_inputs(&cli).is_err());

        let mut cli = sample_cli();
        cli.years = f64::INFINITY;
        assert!(build_sip_inputs(&cli).is_err());
    }

    #[test]
    fn build_plan_inputs_rejects_out_of_range_age_and_income() {
        let mut cli = sample_cli();
        cli.age = 17;
        let err = build_plan_inputs(&cli).expect_err("must reject minors");
        assert!(err.contains("--age"));

        let mut cli = sample_cli();
        cli.monthly_income = 9_999.0;
        let err = build_plan_inputs(&cli).expect_err("must reject low income");
        assert!(err.contains("--monthly-income"));
    }

    #[test]
    fn sip_inputs_from_json_parses_web_keys() {
        let json = r#"{
          "monthlyAmount": 7500,
          "annualReturn": 10.5,
          "years": 15
        }"#;
        let inputs = sip_inputs_from_json(json).expect("json should parse");
        assert_approx(inputs.monthly_amount, 7_500.0);
        assert_approx(inputs.annual_return_percent, 10.5);
        assert_approx(inputs.years, 15.0);
    }

    #[test]
    fn plan_inputs_from_json_parses_web_keys() {
        let json = r#"{
          "age": 42,
          "monthlyIncome": 150000,
          "riskProfile": "aggressive",
          "investmentGoal": "short-term"
        }"#;
        let inputs = plan_inputs_from_json(json).expect("json should parse");
        assert_eq!(inputs.age, 42);
        assert_approx(inputs.monthly_income, 150_000.0);
        assert_eq!(inputs.risk_profile, RiskProfile::Aggressive);
        assert_eq!(inputs.investment_goal, InvestmentGoal::ShortTerm);
    }

    #[test]
    fn unrecognized_risk_profile_defaults_to_conservative() {
        let json = r#"{"riskProfile": "yolo"}"#;
        let inputs = plan_inputs_from_json(json).expect("json should parse");
        assert_eq!(inputs.risk_profile, RiskProfile::Conservative);
    }

    #[test]
    fn unrecognized_goal_defaults_to_other() {
        let json = r#"{"investmentGoal": "moon-base"}"#;
        let inputs = plan_inputs_from_json(json).expect("json should parse");
        assert_eq!(inputs.investment_goal, InvestmentGoal::Other);
    }

    #[test]
    fn missing_payload_fields_fall_back_to_defaults() {
        let inputs = plan_inputs_from_json("{}").expect("empty payload is valid");
        assert_eq!(inputs.age, 30);
        assert_approx(inputs.monthly_income, 50_000.0);
        assert_eq!(inputs.risk_profile, RiskProfile::Moderate);
        assert_eq!(inputs.investment_goal, InvestmentGoal::Wealth);
    }

    #[test]
    fn sip_response_serialization_contains_expected_fields() {
        let inputs = sip_inputs_from_json(r#"{"monthlyAmount": 5000, "annualReturn": 12, "years": 10}"#)
            .expect("valid inputs");
        let result = project(&inputs);
        let response = SipResponse {
            total_investment: result.total_investment,
            estimated_returns: result.estimated_returns,
            total_value: result.total_value,
            total_investment_display: format_inr(result.total_investment),
            estimated_returns_display: format_inr(result.estimated_returns),
            total_value_display: format_inr(result.total_value),
        };
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"totalInvestment\":600000"));
        assert!(json.contains("\"totalValueDisplay\":\"₹11,61,695\""));
        assert!(json.contains("\"estimatedReturns\""));
    }

    #[test]
    fn plan_response_serialization_omits_absent_narratives_and_bullets() {
        let inputs = plan_inputs_from_json(r#"{"age": 28, "riskProfile": "aggressive"}"#)
            .expect("valid inputs");
        let outcome = build_plan(&inputs);
        let response = PlanResponse {
            suggested_monthly_amount: outcome.suggested_monthly_amount,
            suggested_monthly_amount_display: format_inr(outcome.suggested_monthly_amount),
            contribution_percent: outcome.contribution_percent,
            equity_percent: outcome.equity_percent,
            debt_percent: outcome.debt_percent,
            horizon_years: outcome.horizon_years,
            goal_description: outcome.goal_description,
            recommendations: outcome.recommendations,
        };
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"suggestedMonthlyAmount\":15000"));
        assert!(json.contains("\"equityPercent\":72"));
        assert!(json.contains("\"recommendations\""));
        // Strategy block carries bullets but no narrative; the key must be absent.
        assert!(!json.contains("\"narrative\":null"));
        assert!(!json.contains("\"bullets\":null"));
    }
}
