//! The fixed catalog of financial red flags.
//!
//! Each rule pairs a predicate with an evidence template. Both read the same
//! [`ConcernContext`], so the full catalog view and the applicable-only view
//! come from one evaluation pass.

use super::money::{group_thousands, round_half_up};
use super::types::{ConcernId, ConcernInstance, JobGrowth, ProjectionYear, Scenario};

const DEBT_TO_INCOME_LIMIT: f64 = 20.0;
const SCHOOL_SHORTFALL_LIMIT: i64 = -500;
const DEPENDENT_SALARY_FLOOR: i64 = 50_000;
const DEPENDENT_SUPPORT_MONTHLY: i64 = 600;
const REMAINING_DEBT_LIMIT: i64 = 5_000;
const EDUCATION_COST_SALARY_SHARE: f64 = 0.4;
const NO_FIRST_JOB: &str = "No post-graduation year within the projection";

/// Salary floors for locations where a low entry salary is a red flag.
/// Locations not listed never trigger the mismatch rule.
pub const LOCATION_SALARY_FLOORS: [(&str, i64); 2] =
    [("San Francisco", 120_000), ("Austin/Denver", 50_000)];

/// Inputs every rule sees.
#[derive(Debug, Clone, Copy)]
pub struct ConcernContext<'a> {
    pub scenario: &'a Scenario,
    pub projection: &'a [ProjectionYear],
    /// First year with `is_school == false`, if the horizon has one.
    pub first_job: Option<&'a ProjectionYear>,
}

impl<'a> ConcernContext<'a> {
    pub fn new(scenario: &'a Scenario, projection: &'a [ProjectionYear]) -> Self {
        Self {
            scenario,
            projection,
            first_job: projection.iter().find(|year| !year.is_school),
        }
    }

    fn school_years(&self) -> impl Iterator<Item = &'a ProjectionYear> + use<'a> {
        let projection: &'a [ProjectionYear] = self.projection;
        projection.iter().filter(|year| year.is_school)
    }
}

pub struct ConcernRule {
    pub id: ConcernId,
    pub title: &'static str,
    pub description: &'static str,
    applies: fn(&ConcernContext<'_>) -> bool,
    evidence: fn(&ConcernContext<'_>) -> String,
}

impl ConcernRule {
    pub fn applies(&self, ctx: &ConcernContext<'_>) -> bool {
        (self.applies)(ctx)
    }

    pub fn evidence(&self, ctx: &ConcernContext<'_>) -> String {
        (self.evidence)(ctx)
    }

    pub fn evaluate(&self, ctx: &ConcernContext<'_>) -> ConcernInstance {
        ConcernInstance {
            id: self.id,
            title: self.title,
            description: self.description,
            applies: self.applies(ctx),
            evidence: self.evidence(ctx),
        }
    }
}

pub static CATALOG: [ConcernRule; 8] = [
    ConcernRule {
        id: ConcernId::DebtBurden,
        title: "High Debt-to-Income Ratio",
        description: "Debt payments consume too much of monthly income",
        applies: debt_burden_applies,
        evidence: debt_burden_evidence,
    },
    ConcernRule {
        id: ConcernId::SchoolDeficit,
        title: "Monthly Deficit During School",
        description: "Expenses exceed income while studying",
        applies: school_deficit_applies,
        evidence: school_deficit_evidence,
    },
    ConcernRule {
        id: ConcernId::DependentBurden,
        title: "Supporting Dependents on Entry Salary",
        description: "Dependent costs too high relative to starting income",
        applies: dependent_burden_applies,
        evidence: dependent_burden_evidence,
    },
    ConcernRule {
        id: ConcernId::ExtendedDebt,
        title: "Debt Extends Beyond 10 Years",
        description: "Significant debt remaining after decade of repayment",
        applies: extended_debt_applies,
        evidence: extended_debt_evidence,
    },
    ConcernRule {
        id: ConcernId::JobMarket,
        title: "Weak Job Market for This Career",
        description: "Limited growth prospects in chosen field",
        applies: job_market_applies,
        evidence: job_market_evidence,
    },
    ConcernRule {
        id: ConcernId::HighEducationCost,
        title: "High Education Cost Relative to Starting Salary",
        description: "Education expense is disproportionate to entry salary",
        applies: high_education_cost_applies,
        evidence: high_education_cost_evidence,
    },
    ConcernRule {
        id: ConcernId::LocationSalaryMismatch,
        title: "Salary May Not Match Cost of Living",
        description: "Starting salary seems low for the location",
        applies: location_salary_mismatch_applies,
        evidence: location_salary_mismatch_evidence,
    },
    ConcernRule {
        id: ConcernId::NoWorkIncome,
        title: "No Income During School",
        description: "Full-time student with no part-time work",
        applies: no_work_income_applies,
        evidence: no_work_income_evidence,
    },
];

pub fn rule(id: ConcernId) -> &'static ConcernRule {
    // Catalog order follows `ConcernId` declaration order.
    &CATALOG[id as usize]
}

/// Every catalog entry, applicable or not, with rendered evidence.
pub fn evaluate_concerns(scenario: &Scenario, projection: &[ProjectionYear]) -> Vec<ConcernInstance> {
    let ctx = ConcernContext::new(scenario, projection);
    CATALOG.iter().map(|rule| rule.evaluate(&ctx)).collect()
}

/// Only the concerns the numbers actually support.
pub fn actual_concerns(scenario: &Scenario, projection: &[ProjectionYear]) -> Vec<ConcernInstance> {
    evaluate_concerns(scenario, projection)
        .into_iter()
        .filter(|concern| concern.applies)
        .collect()
}

fn debt_burden_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.first_job
        .is_some_and(|year| year.debt_to_income_ratio > DEBT_TO_INCOME_LIMIT)
}

fn debt_burden_evidence(ctx: &ConcernContext<'_>) -> String {
    let Some(year) = ctx.first_job else {
        return NO_FIRST_JOB.to_string();
    };
    format!(
        "${}/month debt payment vs ${}/month salary ({}% Debt-to-Income)",
        year.monthly_debt_payment,
        round_half_up(year.salary as f64 / 12.0),
        year.debt_to_income_ratio
    )
}

fn school_deficit_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.school_years()
        .any(|year| year.monthly_surplus < SCHOOL_SHORTFALL_LIMIT)
}

fn school_deficit_evidence(ctx: &ConcernContext<'_>) -> String {
    let shortfall = ctx
        .school_years()
        .next()
        .map(|year| year.monthly_surplus.abs())
        .unwrap_or(0);
    format!("Around ${shortfall}/month shortfall")
}

fn dependent_burden_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.scenario.dependents > 0
        && ctx
            .first_job
            .is_some_and(|year| year.salary < DEPENDENT_SALARY_FLOOR)
}

fn dependent_burden_evidence(ctx: &ConcernContext<'_>) -> String {
    let Some(year) = ctx.first_job else {
        return NO_FIRST_JOB.to_string();
    };
    let annual_cost = i64::from(ctx.scenario.dependents) * DEPENDENT_SUPPORT_MONTHLY * 12;
    format!(
        "Dependent costs: ${annual_cost}/year. Entry salary: ${}/year",
        year.salary
    )
}

fn extended_debt_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.projection
        .last()
        .is_some_and(|year| year.debt > REMAINING_DEBT_LIMIT)
}

fn extended_debt_evidence(ctx: &ConcernContext<'_>) -> String {
    let remaining = ctx.projection.last().map(|year| year.debt).unwrap_or(0);
    format!("Remaining debt: ${}", group_thousands(remaining))
}

fn job_market_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.scenario.job_growth == JobGrowth::Weak
}

fn job_market_evidence(ctx: &ConcernContext<'_>) -> String {
    format!(
        "Job growth: {}. Salary plateau: ${}/year",
        ctx.scenario.job_growth, ctx.scenario.salary_5yr
    )
}

fn high_education_cost_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.first_job.is_some_and(|year| {
        ctx.scenario.total_education_cost > year.salary as f64 * EDUCATION_COST_SALARY_SHARE
    })
}

fn high_education_cost_evidence(ctx: &ConcernContext<'_>) -> String {
    let Some(year) = ctx.first_job else {
        return NO_FIRST_JOB.to_string();
    };
    let cost = ctx.scenario.total_education_cost;
    let share = if year.salary > 0 {
        round_half_up(cost / year.salary as f64 * 100.0)
    } else {
        0
    };
    format!(
        "Education cost: ${} vs first year salary: ${} ({share}% of salary)",
        group_thousands(round_half_up(cost)),
        group_thousands(year.salary)
    )
}

fn location_salary_floor(location: &str) -> Option<i64> {
    LOCATION_SALARY_FLOORS
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, floor)| *floor)
}

fn location_salary_mismatch_applies(ctx: &ConcernContext<'_>) -> bool {
    let Some(floor) = location_salary_floor(&ctx.scenario.location) else {
        return false;
    };
    ctx.first_job.is_some_and(|year| year.salary < floor)
}

fn location_salary_mismatch_evidence(ctx: &ConcernContext<'_>) -> String {
    let Some(year) = ctx.first_job else {
        return NO_FIRST_JOB.to_string();
    };
    format!(
        "{} - Starting salary ${}, monthly expenses ${}",
        ctx.scenario.location,
        group_thousands(year.salary),
        group_thousands(round_half_up(ctx.scenario.monthly_expenses))
    )
}

fn no_work_income_applies(ctx: &ConcernContext<'_>) -> bool {
    ctx.scenario.annual_income_while_studying == 0.0
}

fn no_work_income_evidence(ctx: &ConcernContext<'_>) -> String {
    format!(
        "{} years of school with $0 income",
        ctx.scenario.years_in_school
    )
}
