use rand::Rng;

use super::tables::{
    CAREERS, CHILDCARE_PER_DEPENDENT_MONTHLY, DEPENDENTS, EDUCATION_PATHS, EXISTING_DEBT,
    FEDERAL_LOAN_RATE, INCOME_WHILE_STUDYING, LOAN_REPAYMENT_YEARS, MAX_AGE, MIN_AGE, NAMES,
    WORK_DURING_SCHOOL_PROBABILITY,
};
use super::types::{Career, EducationPath, Scenario};

/// The raw draws a scenario is built from.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioChoices<'a> {
    pub name: &'a str,
    pub age: u32,
    pub career: &'a Career,
    pub education_path: &'a EducationPath,
    pub dependents: u32,
    pub current_debt: f64,
    pub will_work_during_school: bool,
}

impl Scenario {
    /// Derives the composite fields (total education cost, monthly expenses,
    /// income while studying) from one set of table draws.
    pub fn from_choices(choices: ScenarioChoices<'_>) -> Self {
        let ScenarioChoices {
            name,
            age,
            career,
            education_path,
            dependents,
            current_debt,
            will_work_during_school,
        } = choices;

        let annual_income_while_studying = if will_work_during_school {
            INCOME_WHILE_STUDYING
        } else {
            0.0
        };

        Scenario {
            name: name.to_string(),
            age,
            career: career.title.to_string(),
            location: career.location.to_string(),
            start_salary: career.start_salary,
            salary_5yr: career.salary_5yr,
            job_growth: career.job_growth,
            education_path: education_path.name.to_string(),
            years_in_school: education_path.years,
            education_cost_per_year: education_path.cost_per_year,
            total_education_cost: education_path.cost_per_year * education_path.years,
            current_debt,
            dependents,
            monthly_expenses: career.monthly_base_expenses
                + CHILDCARE_PER_DEPENDENT_MONTHLY * dependents as f64,
            will_work_during_school,
            annual_income_while_studying,
            federal_loan_rate: FEDERAL_LOAN_RATE,
            loan_repayment_years: LOAN_REPAYMENT_YEARS,
        }
    }
}

pub fn generate_scenario() -> Scenario {
    generate_scenario_with(&mut rand::thread_rng())
}

pub fn generate_scenario_with<R: Rng + ?Sized>(rng: &mut R) -> Scenario {
    let career = pick(rng, &CAREERS);
    let education_path = pick(rng, &EDUCATION_PATHS);
    let dependents = *pick(rng, &DEPENDENTS);
    let current_debt = *pick(rng, &EXISTING_DEBT);
    let will_work_during_school = rng.gen_bool(WORK_DURING_SCHOOL_PROBABILITY);
    let name = *pick(rng, &NAMES);
    let age = rng.gen_range(MIN_AGE..=MAX_AGE);

    Scenario::from_choices(ScenarioChoices {
        name,
        age,
        career,
        education_path,
        dependents,
        current_debt,
        will_work_during_school,
    })
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
