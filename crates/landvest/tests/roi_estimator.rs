use landvest::investment::{
    Estimate, GradePolicy, InvestmentGrade, RoiEstimator, RoiInputs, UndefinedReason,
};

fn eastside_scheme() -> RoiInputs {
    RoiInputs {
        purchase_price: 450_000.0,
        development_cost: 150_000.0,
        planning_cost: 25_000.0,
        professional_fees: 15_000.0,
        holding_period_months: 24,
        expected_annual_growth_percent: 26.4,
    }
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

#[test]
fn eastside_scheme_projects_expected_metrics() {
    let result = RoiEstimator::default()
        .estimate(&eastside_scheme())
        .expect("valid inputs");

    assert!(close(result.total_investment, 640_000.0));
    assert!(close(result.growth_multiplier, 1.528));
    assert!(close(result.expected_value, 792_600.0));
    assert!(close(result.net_profit, 152_600.0));

    let roi = result.roi_percent.value().expect("roi defined");
    assert!((roi - 23.84375).abs() < 1e-9);
    assert_eq!(result.investment_grade, InvestmentGrade::C);
    assert_eq!(result.break_even_months, Estimate::Defined(101));

    let annualized = result
        .annualized_return_percent
        .value()
        .expect("annualized return defined");
    let expected = ((792_600.0_f64 / 640_000.0).powf(0.5) - 1.0) * 100.0;
    assert!(close(annualized, expected));
}

#[test]
fn zero_investment_leaves_ratios_undefined() {
    let inputs = RoiInputs {
        purchase_price: 0.0,
        development_cost: 0.0,
        planning_cost: 0.0,
        professional_fees: 0.0,
        holding_period_months: 12,
        expected_annual_growth_percent: 10.0,
    };

    let result = RoiEstimator::default()
        .estimate(&inputs)
        .expect("zero costs are allowed");

    assert_eq!(
        result.roi_percent,
        Estimate::Undefined(UndefinedReason::ZeroInvestment)
    );
    assert_eq!(
        result.annualized_return_percent,
        Estimate::Undefined(UndefinedReason::ZeroInvestment)
    );
    assert!(!result.break_even_months.is_defined());
    assert_eq!(result.investment_grade, InvestmentGrade::D);

    let json = serde_json::to_value(result).expect("serializes");
    assert_eq!(json["roi_percent"]["status"], serde_json::json!("undefined"));
}

#[test]
fn estimates_are_idempotent() {
    let estimator = RoiEstimator::default();
    let first = estimator.estimate(&eastside_scheme()).expect("valid inputs");
    let second = estimator.estimate(&eastside_scheme()).expect("valid inputs");
    assert_eq!(first, second);
}

#[test]
fn higher_growth_never_lowers_the_grade() {
    let estimator = RoiEstimator::default();
    let mut previous = InvestmentGrade::D;

    for step in 0..=200 {
        let inputs = RoiInputs {
            expected_annual_growth_percent: -50.0 + f64::from(step),
            ..eastside_scheme()
        };
        let grade = estimator
            .estimate(&inputs)
            .expect("valid inputs")
            .investment_grade;
        assert!(grade <= previous, "grade fell back to {grade} at step {step}");
        previous = grade;
    }

    assert_eq!(previous, InvestmentGrade::A);
}

#[test]
fn configured_risk_threshold_forces_grade_f() {
    let estimator = RoiEstimator::new(GradePolicy {
        risk_override_threshold: Some(65),
    });

    let risky = estimator
        .estimate_with_risk(&eastside_scheme(), Some(80))
        .expect("valid inputs");
    assert_eq!(risky.investment_grade, InvestmentGrade::F);

    let calm = estimator
        .estimate_with_risk(&eastside_scheme(), Some(20))
        .expect("valid inputs");
    assert_eq!(calm.investment_grade, InvestmentGrade::C);
    assert_eq!(risky.roi_percent, calm.roi_percent);
}
