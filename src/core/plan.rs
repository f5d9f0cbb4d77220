use super::types::{InvestmentGoal, PlanInputs, PlanOutcome, RecommendationBlock, RiskProfile};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AgeBracket {
    Under30,
    ThirtyToFortyFour,
    FortyFiveAndOver,
}

impl AgeBracket {
    fn for_age(age: u32) -> Self {
        if age < 30 {
            AgeBracket::Under30
        } else if age < 45 {
            AgeBracket::ThirtyToFortyFour
        } else {
            AgeBracket::FortyFiveAndOver
        }
    }
}

/// Share of income to invest, by age bracket and risk profile. Higher risk
/// tolerance invests more; the share tapers with age.
fn contribution_percent(bracket: AgeBracket, risk: RiskProfile) -> u32 {
    match (bracket, risk) {
        (AgeBracket::Under30, RiskProfile::Aggressive) => 30,
        (AgeBracket::Under30, RiskProfile::Moderate) => 25,
        (AgeBracket::Under30, RiskProfile::Conservative) => 20,
        (AgeBracket::ThirtyToFortyFour, RiskProfile::Aggressive) => 25,
        (AgeBracket::ThirtyToFortyFour, RiskProfile::Moderate) => 20,
        (AgeBracket::ThirtyToFortyFour, RiskProfile::Conservative) => 15,
        (AgeBracket::FortyFiveAndOver, RiskProfile::Aggressive) => 20,
        (AgeBracket::FortyFiveAndOver, RiskProfile::Moderate) => 15,
        (AgeBracket::FortyFiveAndOver, RiskProfile::Conservative) => 10,
    }
}

/// Age-adjusted equity share with a per-profile floor: the `max` keeps the
/// equity allocation from dropping below the profile minimum at any age.
fn equity_percent(age: u32, risk: RiskProfile) -> u32 {
    let age = i64::from(age);
    let equity = match risk {
        RiskProfile::Aggressive => (100 - age).max(60),
        RiskProfile::Moderate => (100 - age).max(40),
        RiskProfile::Conservative => (70 - age).max(20),
    };
    equity.min(100) as u32
}

fn horizon_years(goal: InvestmentGoal, age: u32) -> u32 {
    match goal {
        InvestmentGoal::Retirement => (60 - i64::from(age)).max(5) as u32,
        InvestmentGoal::Wealth => 15,
        InvestmentGoal::Education => {
            if age < 40 {
                15
            } else {
                10
            }
        }
        InvestmentGoal::House => 10,
        InvestmentGoal::ShortTerm => 3,
        InvestmentGoal::Other => 10,
    }
}

fn goal_description(goal: InvestmentGoal) -> &'static str {
    match goal {
        InvestmentGoal::Retirement => "building a retirement corpus",
        InvestmentGoal::Wealth => "long-term wealth creation",
        InvestmentGoal::Education => "child's education planning",
        InvestmentGoal::House => "saving for a home purchase",
        InvestmentGoal::ShortTerm => "achieving short-term financial goals",
        InvestmentGoal::Other => "general investment goals",
    }
}

fn risk_label(risk: RiskProfile) -> &'static str {
    match risk {
        RiskProfile::Conservative => "conservative",
        RiskProfile::Moderate => "moderate",
        RiskProfile::Aggressive => "aggressive",
    }
}

fn strategy_bullets(risk: RiskProfile) -> [&'static str; 4] {
    match risk {
        RiskProfile::Aggressive => [
            "Focus on equity mutual funds with diversified portfolios",
            "Consider a mix of large-cap, mid-cap, and small-cap exposure",
            "Stay invested for the long term to ride out market volatility",
            "Review and rebalance your portfolio annually",
        ],
        RiskProfile::Moderate => [
            "Balance between equity and debt mutual funds",
            "Consider hybrid or balanced funds for diversification",
            "Maintain emergency fund in liquid instruments",
            "Gradually increase debt allocation as you near your goal",
        ],
        RiskProfile::Conservative => [
            "Prioritize debt mutual funds and fixed-income instruments",
            "Consider equity exposure only for very long-term goals",
            "Focus on capital preservation and steady returns",
            "Keep sufficient liquidity for emergencies",
        ],
    }
}

/// Formats a whole-rupee amount with Indian digit grouping: the last three
/// digits form one group, the rest split into groups of two.
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 2 + 2);
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Derives the plan figures and assembles the recommendation blocks in their
/// fixed presentation order.
pub fn build_plan(inputs: &PlanInputs) -> PlanOutcome {
    let bracket = AgeBracket::for_age(inputs.age);
    let contribution_percent = contribution_percent(bracket, inputs.risk_profile);
    let suggested_monthly_amount =
        (inputs.monthly_income * f64::from(contribution_percent) / 100.0).round() as i64;
    let equity_percent = equity_percent(inputs.age, inputs.risk_profile);
    let debt_percent = 100 - equity_percent;
    let horizon_years = horizon_years(inputs.investment_goal, inputs.age);
    let goal_description = goal_description(inputs.investment_goal);
    let risk = risk_label(inputs.risk_profile);

    let mut recommendations = Vec::with_capacity(6);

    recommendations.push(RecommendationBlock {
        title: "Suggested Monthly Investment".to_string(),
        narrative: Some(format!(
            "Based on your monthly income of {} and your {risk} risk profile, consider \
             investing around {} per month ({contribution_percent}% of income). This amount \
             balances your current lifestyle needs with future financial goals.",
            format_inr(inputs.monthly_income.round() as i64),
            format_inr(suggested_monthly_amount),
        )),
        bullets: None,
    });

    recommendations.push(RecommendationBlock {
        title: "Recommended Asset Allocation".to_string(),
        narrative: Some(format!(
            "For {goal_description}, consider an asset allocation approach:"
        )),
        bullets: Some(vec![
            format!("Equity-oriented investments: {equity_percent}% (for growth potential)"),
            format!(
                "Debt-oriented investments: {debt_percent}% (for stability and capital \
                 preservation)"
            ),
            format!(
                "This allocation aligns with your age ({} years) and {risk} risk profile",
                inputs.age
            ),
        ]),
    });

    recommendations.push(RecommendationBlock {
        title: "Investment Horizon".to_string(),
        narrative: Some(format!(
            "For your goal of {goal_description}, consider a time horizon of approximately \
             {horizon_years} years. Longer investment horizons generally allow for better \
             wealth accumulation through the power of compounding."
        )),
        bullets: None,
    });

    recommendations.push(RecommendationBlock {
        title: "Investment Strategy Ideas".to_string(),
        narrative: None,
        bullets: Some(
            strategy_bullets(inputs.risk_profile)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
    });

    if inputs.investment_goal != InvestmentGoal::ShortTerm {
        recommendations.push(RecommendationBlock {
            title: "Tax Planning".to_string(),
            narrative: Some(
                "Consider tax-saving investment options like ELSS (Equity Linked Savings \
                 Scheme) to optimize your tax liability under Section 80C, while also \
                 building wealth for your long-term goals."
                    .to_string(),
            ),
            bullets: None,
        });
    }

    recommendations.push(RecommendationBlock {
        title: "Review and Adjust".to_string(),
        narrative: Some(
            "These are general ideas based on common investment principles. Your actual \
             investment decisions should be made after consulting with a SEBI-registered \
             investment advisor who can consider your complete financial situation, existing \
             investments, and specific requirements."
                .to_string(),
        ),
        bullets: None,
    });

    PlanOutcome {
        suggested_monthly_amount,
        contribution_percent,
        equity_percent,
        debt_percent,
        horizon_years,
        goal_description,
        recommendations,
    }
}

/// The ordered recommendation blocks for the given profile.
pub fn recommend(inputs: &PlanInputs) -> Vec<RecommendationBlock> {
    build_plan(inputs).recommendations
}
