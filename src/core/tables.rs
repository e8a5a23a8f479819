//! Static parameter tables the scenario generator samples from.
//!
//! Weighting is expressed by repeating values: `DEPENDENTS` holds three zeros
//! out of five entries, so a uniform pick lands on "no dependents" 60% of the
//! time.

use super::types::{Career, EducationPath, JobGrowth};

pub const FEDERAL_LOAN_RATE: f64 = 0.05;
pub const LOAN_REPAYMENT_YEARS: u32 = 10;
pub const INCOME_WHILE_STUDYING: f64 = 18_000.0;
pub const CHILDCARE_PER_DEPENDENT_MONTHLY: f64 = 1_800.0;
pub const WORK_DURING_SCHOOL_PROBABILITY: f64 = 0.5;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 23;

pub static NAMES: [&str; 8] = [
    "Alex", "Jordan", "Taylor", "Casey", "Morgan", "Riley", "Avery", "Quinn",
];

pub static CAREERS: [Career; 6] = [
    Career {
        title: "Nursing",
        start_salary: 62_000.0,
        salary_5yr: 72_000.0,
        job_growth: JobGrowth::Strong,
        location: "Mid-size city",
        monthly_base_expenses: 2_200.0,
    },
    Career {
        title: "Software Engineer (MAMAA)",
        start_salary: 200_000.0,
        salary_5yr: 250_000.0,
        job_growth: JobGrowth::Strong,
        location: "San Francisco",
        monthly_base_expenses: 4_500.0,
    },
    Career {
        title: "High School Teacher",
        start_salary: 42_000.0,
        salary_5yr: 50_000.0,
        job_growth: JobGrowth::Weak,
        location: "Suburban",
        monthly_base_expenses: 1_800.0,
    },
    Career {
        title: "Business Analyst",
        start_salary: 58_000.0,
        salary_5yr: 72_000.0,
        job_growth: JobGrowth::Moderate,
        location: "Austin/Denver",
        monthly_base_expenses: 2_400.0,
    },
    Career {
        title: "Social Worker",
        start_salary: 38_000.0,
        salary_5yr: 42_000.0,
        job_growth: JobGrowth::Weak,
        location: "Mid-size city",
        monthly_base_expenses: 1_900.0,
    },
    Career {
        title: "Mechanical Engineer",
        start_salary: 72_000.0,
        salary_5yr: 92_000.0,
        job_growth: JobGrowth::Strong,
        location: "Austin/Denver",
        monthly_base_expenses: 2_500.0,
    },
];

pub static EDUCATION_PATHS: [EducationPath; 4] = [
    EducationPath {
        name: "Community College (2 year)",
        years: 2.0,
        cost_per_year: 6_500.0,
    },
    EducationPath {
        name: "State University (4 year)",
        years: 4.0,
        cost_per_year: 16_000.0,
    },
    EducationPath {
        name: "Private University (4 year)",
        years: 4.0,
        cost_per_year: 32_000.0,
    },
    EducationPath {
        name: "Bootcamp (6 month)",
        years: 0.5,
        cost_per_year: 14_000.0,
    },
];

pub static DEPENDENTS: [u32; 5] = [0, 0, 0, 1, 2];

pub static EXISTING_DEBT: [f64; 5] = [0.0, 0.0, 5_000.0, 12_000.0, 25_000.0];
