use super::money::{round_half_up, round_to_tenth};
use super::types::{ProjectionYear, Scenario};

pub const PROJECTION_YEARS: u32 = 10;
pub const FLAT_TAX_RATE: f64 = 0.20;

const SALARY_RAMP_YEARS: f64 = 5.0;
const LATE_CAREER_GROWTH: f64 = 0.02;
const MONTHS_PER_YEAR: u32 = 12;

/// Unrounded state for one simulated year. Only `emit` rounds.
#[derive(Debug, Clone, Copy)]
struct YearFlow {
    year: u32,
    debt: f64,
    income: f64,
    monthly_payment: f64,
    annual_debt_payment: f64,
    after_tax_income: f64,
    years_since_graduation: f64,
    is_school: bool,
}

impl YearFlow {
    fn debt_to_income_ratio(&self) -> f64 {
        if self.income > 0.0 {
            (self.annual_debt_payment / self.income) * 100.0
        } else {
            0.0
        }
    }

    fn monthly_surplus(&self, monthly_expenses: f64) -> f64 {
        self.after_tax_income / 12.0 - (monthly_expenses + self.monthly_payment)
    }

    fn net_worth(&self) -> f64 {
        let earned = if self.is_school {
            0.0
        } else {
            self.after_tax_income * self.years_since_graduation
        };
        earned - self.debt.max(0.0)
    }

    fn emit(&self, scenario: &Scenario) -> ProjectionYear {
        ProjectionYear {
            year: self.year,
            debt: round_half_up(self.debt.max(0.0)),
            salary: round_half_up(self.income),
            monthly_debt_payment: round_half_up(self.monthly_payment),
            annual_debt_payment: round_half_up(self.annual_debt_payment),
            debt_to_income_ratio: round_to_tenth(self.debt_to_income_ratio()),
            monthly_surplus: round_half_up(self.monthly_surplus(scenario.monthly_expenses)),
            net_worth: round_half_up(self.net_worth()),
            is_school: self.is_school,
        }
    }
}

/// Projects the scenario over a fixed ten-year horizon.
///
/// The repayment amount is fixed up front from the debt balance at
/// graduation, then the timeline is replayed from the pre-existing debt.
/// School years are the integer years `y` with `y <= years_in_school`; a
/// program shorter than a year (0.5 for a bootcamp) therefore has no school
/// year at all and year 1 is already a salaried year with
/// `years_since_graduation = 0.5`.
pub fn project(scenario: &Scenario) -> Vec<ProjectionYear> {
    let monthly_rate = scenario.federal_loan_rate / 12.0;
    let monthly_payment = level_monthly_payment(
        debt_at_graduation(scenario),
        scenario.federal_loan_rate,
        scenario.loan_repayment_years,
    );

    let mut debt = scenario.current_debt;
    let mut years = Vec::with_capacity(PROJECTION_YEARS as usize);

    for year in 1..=PROJECTION_YEARS {
        let is_school = is_school_year(scenario, year);
        let years_since_graduation = year as f64 - scenario.years_in_school;

        let (income, annual_debt_payment) = if is_school {
            debt = accrue_school_year(debt, scenario);
            (scenario.annual_income_while_studying, 0.0)
        } else {
            let salary = salary_for_years_since_graduation(scenario, years_since_graduation);
            debt = repay_year(debt, monthly_rate, monthly_payment);
            (salary, monthly_payment * 12.0)
        };

        let taxes_owed = if income > 0.0 {
            income * FLAT_TAX_RATE
        } else {
            0.0
        };

        let flow = YearFlow {
            year,
            debt,
            income,
            monthly_payment,
            annual_debt_payment,
            after_tax_income: income - taxes_owed,
            years_since_graduation,
            is_school,
        };
        years.push(flow.emit(scenario));
    }

    years
}

pub fn is_school_year(scenario: &Scenario, year: u32) -> bool {
    year as f64 <= scenario.years_in_school
}

/// Balance when repayment starts: pre-existing debt plus every unfunded
/// school year, compounded annually.
pub fn debt_at_graduation(scenario: &Scenario) -> f64 {
    let mut debt = scenario.current_debt;
    let mut year = 1;
    while is_school_year(scenario, year) {
        debt = accrue_school_year(debt, scenario);
        year += 1;
    }
    debt
}

fn accrue_school_year(debt: f64, scenario: &Scenario) -> f64 {
    let total_annual_expenses =
        scenario.education_cost_per_year + scenario.monthly_expenses * 12.0;
    let deficit = (total_annual_expenses - scenario.annual_income_while_studying).max(0.0);
    let debt = debt + deficit;
    debt + debt * scenario.federal_loan_rate
}

fn repay_year(mut debt: f64, monthly_rate: f64, monthly_payment: f64) -> f64 {
    for _ in 0..MONTHS_PER_YEAR {
        debt += debt * monthly_rate;
        debt = (debt - monthly_payment).max(0.0);
    }
    debt
}

/// Level payment that fully amortizes `principal` over `years` of monthly
/// payments. Zero principal or a zero rate yields no payment.
pub fn level_monthly_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    if principal <= 0.0 || monthly_rate <= 0.0 {
        return 0.0;
    }

    let months = (years * MONTHS_PER_YEAR) as i32;
    let growth = (1.0 + monthly_rate).powi(months);
    let denom = growth - 1.0;
    if denom <= 0.0 {
        return 0.0;
    }
    principal * monthly_rate * growth / denom
}

/// Salary curve: the start salary in the first year out, a straight line up
/// to the five-year salary, then 2% of the five-year salary per extra year.
pub fn salary_for_years_since_graduation(scenario: &Scenario, years_since_graduation: f64) -> f64 {
    let start = scenario.start_salary;
    let plateau = scenario.salary_5yr;

    if years_since_graduation == 1.0 {
        start
    } else if years_since_graduation <= SALARY_RAMP_YEARS {
        let progress = (years_since_graduation - 1.0) / (SALARY_RAMP_YEARS - 1.0);
        start + (plateau - start) * progress
    } else {
        plateau + plateau * LATE_CAREER_GROWTH * (years_since_graduation - SALARY_RAMP_YEARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::{ScenarioChoices, generate_scenario_with};
    use crate::core::tables::{CAREERS, EDUCATION_PATHS};
    use crate::core::types::{EducationPath, JobGrowth};
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    const TWO_YEAR_PATH: EducationPath = EducationPath {
        name: "Two-year program",
        years: 2.0,
        cost_per_year: 13_000.0,
    };

    fn nursing_scenario() -> Scenario {
        Scenario::from_choices(ScenarioChoices {
            name: "Alex",
            age: 20,
            career: &CAREERS[0],
            education_path: &TWO_YEAR_PATH,
            dependents: 0,
            current_debt: 0.0,
            will_work_during_school: true,
        })
    }

    fn bootcamp_scenario(current_debt: f64) -> Scenario {
        Scenario::from_choices(ScenarioChoices {
            name: "Quinn",
            age: 21,
            career: &CAREERS[0],
            education_path: &EDUCATION_PATHS[3],
            dependents: 0,
            current_debt,
            will_work_during_school: true,
        })
    }

    #[test]
    fn level_payment_matches_standard_annuity() {
        let payment = level_monthly_payment(20_000.0, 0.05, 10);
        assert_approx_tol(payment, 212.13, 0.005);

        let mut balance = 20_000.0;
        for _ in 0..10 {
            balance = repay_year(balance, 0.05 / 12.0, payment);
        }
        assert!(balance <= 0.01, "balance left after term: {balance}");
    }

    #[test]
    fn level_payment_is_zero_without_principal_or_rate() {
        assert_approx(level_monthly_payment(0.0, 0.05, 10), 0.0);
        assert_approx(level_monthly_payment(25_000.0, 0.0, 10), 0.0);
    }

    #[test]
    fn salary_curve_ramps_then_grows_two_percent() {
        let scenario = nursing_scenario();
        assert_approx(salary_for_years_since_graduation(&scenario, 1.0), 62_000.0);
        assert_approx(salary_for_years_since_graduation(&scenario, 2.0), 64_500.0);
        assert_approx(salary_for_years_since_graduation(&scenario, 5.0), 72_000.0);
        assert_approx(salary_for_years_since_graduation(&scenario, 6.0), 73_440.0);
        assert_approx(salary_for_years_since_graduation(&scenario, 8.0), 76_320.0);
    }

    #[test]
    fn nursing_projection_accrues_then_amortizes() {
        let scenario = nursing_scenario();
        assert_approx(scenario.total_education_cost, 26_000.0);
        assert_approx(debt_at_graduation(&scenario), 46_063.5);

        let years = project(&scenario);
        assert_eq!(years.len(), 10);

        let first = &years[0];
        assert!(first.is_school);
        assert_eq!(first.debt, 22_470);
        assert_eq!(first.salary, 18_000);
        assert_eq!(first.annual_debt_payment, 0);
        assert_approx(first.debt_to_income_ratio, 0.0);
        assert_eq!(first.monthly_surplus, -1_489);
        assert_eq!(first.net_worth, -22_470);

        let first_job = &years[2];
        assert!(!first_job.is_school);
        assert_eq!(first_job.salary, 62_000);
        assert_eq!(first_job.monthly_debt_payment, 489);
        assert_eq!(first_job.annual_debt_payment, 5_863);
        assert_approx(first_job.debt_to_income_ratio, 9.5);
        assert_eq!(first_job.debt, 42_421);
        assert_eq!(first_job.monthly_surplus, 1_445);
        assert_eq!(first_job.net_worth, 7_179);

        assert_eq!(years[6].salary, 72_000);
        assert_eq!(years[7].salary, 73_440);

        let last = &years[9];
        assert_eq!(last.salary, 76_320);
        assert_eq!(last.debt, 11_137);
        assert_eq!(last.net_worth, 477_311);
    }

    #[test]
    fn school_income_covering_costs_leaves_no_debt() {
        let cheap_path = EducationPath {
            name: "Evening classes",
            years: 3.0,
            cost_per_year: 1_000.0,
        };
        let mut scenario = Scenario::from_choices(ScenarioChoices {
            name: "Casey",
            age: 18,
            career: &CAREERS[2],
            education_path: &cheap_path,
            dependents: 0,
            current_debt: 0.0,
            will_work_during_school: true,
        });
        scenario.monthly_expenses = 1_000.0;

        assert_approx(debt_at_graduation(&scenario), 0.0);
        let years = project(&scenario);
        for year in &years {
            assert_eq!(year.debt, 0);
            assert_eq!(year.monthly_debt_payment, 0);
            assert_eq!(year.annual_debt_payment, 0);
        }
        assert!(years[..3].iter().all(|y| y.is_school));
        assert!(years[3..].iter().all(|y| !y.is_school));
    }

    #[test]
    fn sub_year_program_has_no_school_years() {
        let years = project(&bootcamp_scenario(0.0));

        assert!(years.iter().all(|y| !y.is_school));
        assert_eq!(years[0].salary, 60_750);
        assert_eq!(years[0].net_worth, 24_300);
        assert_eq!(years[5].salary, 72_720);
        assert!(years.iter().all(|y| y.monthly_debt_payment == 0));
    }

    #[test]
    fn sub_year_program_amortizes_existing_debt_from_year_one() {
        let scenario = bootcamp_scenario(12_000.0);
        assert_approx(debt_at_graduation(&scenario), 12_000.0);

        let years = project(&scenario);
        assert_eq!(years[0].monthly_debt_payment, 127);
        assert_eq!(years[0].debt, 11_051);
        assert_approx(years[0].debt_to_income_ratio, 2.5);
        assert_eq!(years[8].debt, 1_487);
        assert_eq!(years[9].debt, 0);
    }

    #[test]
    fn horizon_spent_entirely_in_school_reports_no_ratio() {
        let long_path = EducationPath {
            name: "Extended doctorate",
            years: 12.0,
            cost_per_year: 20_000.0,
        };
        let scenario = Scenario::from_choices(ScenarioChoices {
            name: "Morgan",
            age: 23,
            career: &CAREERS[1],
            education_path: &long_path,
            dependents: 1,
            current_debt: 25_000.0,
            will_work_during_school: false,
        });

        let years = project(&scenario);
        assert!(years.iter().all(|y| y.is_school));
        for year in &years {
            assert_eq!(year.salary, 0);
            assert_approx(year.debt_to_income_ratio, 0.0);
            assert!((year.net_worth + year.debt).abs() <= 1);
        }
        assert!(years.windows(2).all(|w| w[1].debt > w[0].debt));
    }

    #[test]
    fn generated_scenarios_project_ten_ordered_years() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let scenario = generate_scenario_with(&mut rng);
            let years = project(&scenario);
            assert_eq!(years.len(), PROJECTION_YEARS as usize);
            for (idx, year) in years.iter().enumerate() {
                assert_eq!(year.year, idx as u32 + 1);
                assert!(year.debt >= 0);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_projection_invariants_hold(
            career_idx in 0usize..6,
            years_in_school_halves in 1u32..24,
            cost_per_year in 0u32..60_000,
            dependents in 0u32..4,
            current_debt in 0u32..60_000,
            works in any::<bool>(),
        ) {
            let path = EducationPath {
                name: "Generated path",
                years: years_in_school_halves as f64 / 2.0,
                cost_per_year: cost_per_year as f64,
            };
            let scenario = Scenario::from_choices(ScenarioChoices {
                name: "Avery",
                age: 19,
                career: &CAREERS[career_idx],
                education_path: &path,
                dependents,
                current_debt: current_debt as f64,
                will_work_during_school: works,
            });

            let years = project(&scenario);
            prop_assert_eq!(years.len(), 10);

            let payment = years[0].monthly_debt_payment;
            for (idx, year) in years.iter().enumerate() {
                prop_assert_eq!(year.year, idx as u32 + 1);
                prop_assert!(year.debt >= 0);
                prop_assert_eq!(year.monthly_debt_payment, payment);
                prop_assert!(year.debt_to_income_ratio >= 0.0);
                if year.salary == 0 {
                    prop_assert!(year.debt_to_income_ratio == 0.0);
                }
                prop_assert_eq!(year.is_school, (idx as f64 + 1.0) <= scenario.years_in_school);
                if year.is_school {
                    prop_assert_eq!(year.annual_debt_payment, 0);
                }
            }
        }
    }

    #[test]
    fn job_growth_label_does_not_change_projection() {
        let mut weak = nursing_scenario();
        weak.job_growth = JobGrowth::Weak;
        assert_eq!(project(&weak), project(&nursing_scenario()));
    }
}
