mod concerns;
mod diagnosis;
mod engine;
mod generator;
mod money;
mod round;
mod tables;
mod types;

pub use concerns::{CATALOG, ConcernContext, ConcernRule, actual_concerns, evaluate_concerns, rule};
pub use diagnosis::score;
pub use engine::{
    PROJECTION_YEARS, debt_at_graduation, level_monthly_payment, project,
    salary_for_years_since_graduation,
};
pub use generator::{ScenarioChoices, generate_scenario, generate_scenario_with};
pub use round::{BatchSummary, ConcernIncidence, ConcernOption, Percentiles, Round, run_batch};
pub use tables::{CAREERS, EDUCATION_PATHS};
pub use types::{
    Career, ConcernId, ConcernInstance, DiagnosisResult, EducationPath, JobGrowth, ProjectionYear,
    Rating, Scenario, ScenarioError, UnknownConcernId,
};
