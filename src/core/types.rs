use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tables::INCOME_WHILE_STUDYING;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobGrowth {
    Weak,
    Moderate,
    Strong,
}

impl JobGrowth {
    pub fn as_str(self) -> &'static str {
        match self {
            JobGrowth::Weak => "weak",
            JobGrowth::Moderate => "moderate",
            JobGrowth::Strong => "strong",
        }
    }
}

impl fmt::Display for JobGrowth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the career parameter table.
#[derive(Debug, Clone, Copy)]
pub struct Career {
    pub title: &'static str,
    pub start_salary: f64,
    pub salary_5yr: f64,
    pub job_growth: JobGrowth,
    pub location: &'static str,
    pub monthly_base_expenses: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct EducationPath {
    pub name: &'static str,
    pub years: f64,
    pub cost_per_year: f64,
}

/// A generated student situation. Treated as read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub age: u32,
    pub career: String,
    pub location: String,
    pub start_salary: f64,
    #[serde(rename = "salary5yr")]
    pub salary_5yr: f64,
    pub job_growth: JobGrowth,
    pub education_path: String,
    pub years_in_school: f64,
    pub education_cost_per_year: f64,
    pub total_education_cost: f64,
    pub current_debt: f64,
    pub dependents: u32,
    pub monthly_expenses: f64,
    pub will_work_during_school: bool,
    pub annual_income_while_studying: f64,
    pub federal_loan_rate: f64,
    pub loan_repayment_years: u32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be >= 0")]
    Negative { field: &'static str },
    #[error("yearsInSchool must be > 0")]
    NoSchoolTime,
    #[error("yearsInSchool must be <= 60")]
    SchoolTooLong,
    #[error("loanRepaymentYears must be between 1 and 50")]
    RepaymentTermOutOfRange,
    #[error("totalEducationCost must equal yearsInSchool x educationCostPerYear ({expected})")]
    TotalCostMismatch { expected: f64 },
    #[error("annualIncomeWhileStudying must be {expected} when willWorkDuringSchool is {works}")]
    StudyIncomeMismatch { expected: f64, works: bool },
}

pub const MAX_YEARS_IN_SCHOOL: f64 = 60.0;
pub const MAX_LOAN_REPAYMENT_YEARS: u32 = 50;
const DERIVED_COST_TOLERANCE: f64 = 0.01;

impl Scenario {
    /// Checks the invariants a generated scenario always satisfies. Only
    /// scenarios arriving from outside the generator need this.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for (field, value) in [
            ("startSalary", self.start_salary),
            ("salary5yr", self.salary_5yr),
            ("yearsInSchool", self.years_in_school),
            ("educationCostPerYear", self.education_cost_per_year),
            ("totalEducationCost", self.total_education_cost),
            ("currentDebt", self.current_debt),
            ("monthlyExpenses", self.monthly_expenses),
            ("annualIncomeWhileStudying", self.annual_income_while_studying),
            ("federalLoanRate", self.federal_loan_rate),
        ] {
            if !value.is_finite() {
                return Err(ScenarioError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ScenarioError::Negative { field });
            }
        }

        if self.years_in_school <= 0.0 {
            return Err(ScenarioError::NoSchoolTime);
        }
        if self.years_in_school > MAX_YEARS_IN_SCHOOL {
            return Err(ScenarioError::SchoolTooLong);
        }
        if !(1..=MAX_LOAN_REPAYMENT_YEARS).contains(&self.loan_repayment_years) {
            return Err(ScenarioError::RepaymentTermOutOfRange);
        }

        let expected_total = self.years_in_school * self.education_cost_per_year;
        if (self.total_education_cost - expected_total).abs() > DERIVED_COST_TOLERANCE {
            return Err(ScenarioError::TotalCostMismatch {
                expected: expected_total,
            });
        }
        let expected_income = if self.will_work_during_school {
            INCOME_WHILE_STUDYING
        } else {
            0.0
        };
        if self.annual_income_while_studying != expected_income {
            return Err(ScenarioError::StudyIncomeMismatch {
                expected: expected_income,
                works: self.will_work_during_school,
            });
        }
        Ok(())
    }
}

/// One emitted year of the projection. Currency fields are whole dollars,
/// the ratio is a percentage with one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub debt: i64,
    /// Annual income for the year: salary after graduation, the while-studying
    /// income during school.
    pub salary: i64,
    pub monthly_debt_payment: i64,
    pub annual_debt_payment: i64,
    pub debt_to_income_ratio: f64,
    pub monthly_surplus: i64,
    pub net_worth: i64,
    pub is_school: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcernId {
    DebtBurden,
    SchoolDeficit,
    DependentBurden,
    ExtendedDebt,
    JobMarket,
    HighEducationCost,
    LocationSalaryMismatch,
    NoWorkIncome,
}

impl ConcernId {
    pub const ALL: [ConcernId; 8] = [
        ConcernId::DebtBurden,
        ConcernId::SchoolDeficit,
        ConcernId::DependentBurden,
        ConcernId::ExtendedDebt,
        ConcernId::JobMarket,
        ConcernId::HighEducationCost,
        ConcernId::LocationSalaryMismatch,
        ConcernId::NoWorkIncome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConcernId::DebtBurden => "debt_burden",
            ConcernId::SchoolDeficit => "school_deficit",
            ConcernId::DependentBurden => "dependent_burden",
            ConcernId::ExtendedDebt => "extended_debt",
            ConcernId::JobMarket => "job_market",
            ConcernId::HighEducationCost => "high_education_cost",
            ConcernId::LocationSalaryMismatch => "location_salary_mismatch",
            ConcernId::NoWorkIncome => "no_work_income",
        }
    }
}

impl fmt::Display for ConcernId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown concern id '{0}'")]
pub struct UnknownConcernId(pub String);

impl FromStr for ConcernId {
    type Err = UnknownConcernId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ConcernId::ALL
            .into_iter()
            .find(|id| id.as_str() == trimmed)
            .ok_or_else(|| UnknownConcernId(trimmed.to_string()))
    }
}

/// A catalog rule evaluated against one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcernInstance {
    pub id: ConcernId,
    pub title: &'static str,
    pub description: &'static str,
    pub applies: bool,
    pub evidence: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Rating {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Rating::Excellent
        } else if score >= 60 {
            Rating::Good
        } else {
            Rating::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent assessment",
            Rating::Good => "Good assessment with room for improvement",
            Rating::NeedsImprovement => "Assessment needs improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub correct_identifications: usize,
    pub total_concerns: usize,
    pub missed_concerns: Vec<ConcernInstance>,
    pub false_positives: Vec<ConcernId>,
    pub score: u32,
}

impl DiagnosisResult {
    pub fn rating(&self) -> Rating {
        Rating::from_score(self.score)
    }

    /// Every actual concern was found and there was at least one to find.
    pub fn is_perfect(&self) -> bool {
        self.total_concerns > 0 && self.correct_identifications == self.total_concerns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::ScenarioChoices;
    use crate::core::tables::{CAREERS, EDUCATION_PATHS};

    fn sample_scenario() -> Scenario {
        Scenario::from_choices(ScenarioChoices {
            name: "Jordan",
            age: 18,
            career: &CAREERS[3],
            education_path: &EDUCATION_PATHS[0],
            dependents: 1,
            current_debt: 12_000.0,
            will_work_during_school: true,
        })
    }

    #[test]
    fn validate_accepts_generated_shape() {
        sample_scenario().validate().expect("valid scenario");
    }

    #[test]
    fn validate_rejects_negative_money() {
        let mut scenario = sample_scenario();
        scenario.current_debt = -1.0;
        let err = scenario.validate().expect_err("must reject negative debt");
        assert_eq!(err, ScenarioError::Negative { field: "currentDebt" });
        assert!(err.to_string().contains("currentDebt"));
    }

    #[test]
    fn validate_rejects_non_finite_values() {
        let mut scenario = sample_scenario();
        scenario.start_salary = f64::NAN;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::NotFinite { field: "startSalary" })
        );
    }

    #[test]
    fn validate_rejects_out_of_range_school_and_term() {
        let mut scenario = sample_scenario();
        scenario.years_in_school = 0.0;
        assert_eq!(scenario.validate(), Err(ScenarioError::NoSchoolTime));

        scenario.years_in_school = 61.0;
        assert_eq!(scenario.validate(), Err(ScenarioError::SchoolTooLong));

        scenario.years_in_school = 2.0;
        scenario.loan_repayment_years = 0;
        assert_eq!(scenario.validate(), Err(ScenarioError::RepaymentTermOutOfRange));
    }

    #[test]
    fn validate_rejects_inconsistent_derived_fields() {
        let mut scenario = sample_scenario();
        scenario.total_education_cost = 999_999.0;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::TotalCostMismatch { expected: 13_000.0 })
        );

        let mut scenario = sample_scenario();
        scenario.total_education_cost += 0.001;
        scenario.validate().expect("sub-cent drift is tolerated");

        let mut scenario = sample_scenario();
        scenario.will_work_during_school = false;
        let err = scenario.validate().expect_err("income contradicts the flag");
        assert_eq!(
            err,
            ScenarioError::StudyIncomeMismatch {
                expected: 0.0,
                works: false
            }
        );
        assert_eq!(
            err.to_string(),
            "annualIncomeWhileStudying must be 0 when willWorkDuringSchool is false"
        );

        let mut scenario = sample_scenario();
        scenario.annual_income_while_studying = 0.0;
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::StudyIncomeMismatch {
                expected: 18_000.0,
                works: true
            })
        );
    }

    #[test]
    fn concern_ids_parse_from_wire_names() {
        for id in ConcernId::ALL {
            assert_eq!(id.as_str().parse::<ConcernId>(), Ok(id));
        }
        assert_eq!(" job_market ".parse::<ConcernId>(), Ok(ConcernId::JobMarket));
        let err = "bad_vibes".parse::<ConcernId>().expect_err("unknown id");
        assert_eq!(err.to_string(), "unknown concern id 'bad_vibes'");
    }

    #[test]
    fn scenario_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_scenario()).expect("serializes");
        assert_eq!(json["salary5yr"], 72_000.0);
        assert_eq!(json["jobGrowth"], "moderate");
        assert_eq!(json["yearsInSchool"], 2.0);
        assert_eq!(json["annualIncomeWhileStudying"], 18_000.0);
        let back: Scenario = serde_json::from_value(json).expect("round trips");
        assert_eq!(back, sample_scenario());
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(Rating::from_score(100), Rating::Excellent);
        assert_eq!(Rating::from_score(80), Rating::Excellent);
        assert_eq!(Rating::from_score(79), Rating::Good);
        assert_eq!(Rating::from_score(60), Rating::Good);
        assert_eq!(Rating::from_score(59), Rating::NeedsImprovement);
    }
}
