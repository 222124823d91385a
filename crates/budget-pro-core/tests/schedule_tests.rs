use budget_pro_core::schedule::builder::{
    build_schedule, AmortizationMode, LoanDefinition, RateType, ScheduleOutput, UpfrontFeePolicy,
};
use budget_pro_core::schedule::calendar::Frequency;
use budget_pro_core::schedule::rates::{RateEffective, RateOverride};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn loan(mode: AmortizationMode, principal: Decimal, periods: u32) -> LoanDefinition {
    LoanDefinition {
        principal,
        annual_rate: dec!(0.06),
        rate_type: RateType::Fixed,
        amortization_mode: mode,
        total_periods: periods,
        grace_periods: 0,
        balloon_pct: Decimal::ZERO,
        monthly_insurance: Decimal::ZERO,
        upfront_fees: Decimal::ZERO,
        upfront_fee_policy: UpfrontFeePolicy::FirstPeriod,
        frequency: Frequency::Monthly,
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        variable_rates: Vec::new(),
        recalc_each_period: false,
    }
}

fn build(input: &LoanDefinition) -> ScheduleOutput {
    build_schedule(input).unwrap().result
}

fn assert_fully_amortized(sched: &ScheduleOutput, principal: Decimal) {
    assert_eq!(
        sched.lines.last().unwrap().remaining_principal_after,
        Decimal::ZERO
    );
    let total: Decimal = sched.lines.iter().map(|l| l.principal_due).sum();
    assert_eq!(total, principal);
    for pair in sched.lines.windows(2) {
        assert!(
            pair[1].remaining_principal_after <= pair[0].remaining_principal_after,
            "balance must be non-increasing"
        );
    }
}

// ===========================================================================
// Known-answer scenarios
// ===========================================================================

#[test]
fn test_zero_rate_annuity_equal_installments() {
    // 1000 over 10 periods at 0% => ten installments of exactly 100
    let mut input = loan(AmortizationMode::Annuity, dec!(1000), 10);
    input.annual_rate = Decimal::ZERO;

    let sched = build(&input);
    for line in &sched.lines {
        assert_eq!(line.principal_due, dec!(100));
    }
    assert_fully_amortized(&sched, dec!(1000));
}

#[test]
fn test_principal_constant_with_two_grace_periods() {
    // 1200 over 6 periods, 2 of grace => 4 amortizing periods of 300
    let mut input = loan(AmortizationMode::PrincipalConstant, dec!(1200), 6);
    input.grace_periods = 2;

    let sched = build(&input);
    assert_eq!(sched.lines[0].principal_due, Decimal::ZERO);
    assert_eq!(sched.lines[1].principal_due, Decimal::ZERO);
    assert_eq!(sched.lines[2].principal_due, dec!(300));
    assert_fully_amortized(&sched, dec!(1200));
}

#[test]
fn test_interest_only_defers_all_principal() {
    let input = loan(AmortizationMode::InterestOnly, dec!(1000), 5);

    let sched = build(&input);
    for line in &sched.lines[..4] {
        assert_eq!(line.principal_due, Decimal::ZERO);
        // 0.5%/month on the undiminished 1000
        assert_eq!(line.interest_due, dec!(5));
    }
    assert_eq!(sched.lines[4].principal_due, dec!(1000));
    assert_fully_amortized(&sched, dec!(1000));
}

#[test]
fn test_balloon_defers_twenty_percent() {
    let mut input = loan(AmortizationMode::Balloon, dec!(10000), 12);
    input.balloon_pct = dec!(0.2);

    let sched = build(&input);
    let final_line = sched.lines.last().unwrap();
    assert!(final_line.principal_due >= dec!(2000));
    assert_fully_amortized(&sched, dec!(10000));
}

// ===========================================================================
// Properties across modes
// ===========================================================================

#[test]
fn test_full_amortization_every_mode() {
    for mode in [
        AmortizationMode::Annuity,
        AmortizationMode::PrincipalConstant,
        AmortizationMode::InterestOnly,
        AmortizationMode::Balloon,
    ] {
        let mut input = loan(mode, dec!(9876.54), 24);
        input.annual_rate = dec!(0.0475);
        if mode == AmortizationMode::Balloon {
            input.balloon_pct = dec!(0.3);
        }
        let sched = build(&input);
        assert_eq!(sched.lines.len(), 24);
        assert_fully_amortized(&sched, dec!(9876.54));
    }
}

#[test]
fn test_grace_periods_are_principal_free_every_mode() {
    for mode in [
        AmortizationMode::Annuity,
        AmortizationMode::PrincipalConstant,
        AmortizationMode::InterestOnly,
        AmortizationMode::Balloon,
    ] {
        let mut input = loan(mode, dec!(5000), 12);
        input.grace_periods = 3;
        if mode == AmortizationMode::Balloon {
            input.balloon_pct = dec!(0.1);
        }
        let sched = build(&input);
        for line in &sched.lines[..3] {
            assert_eq!(line.principal_due, Decimal::ZERO, "{mode:?}");
            assert_eq!(line.remaining_principal_after, dec!(5000), "{mode:?}");
            assert!(line.interest_due > Decimal::ZERO, "{mode:?}");
        }
        assert_fully_amortized(&sched, dec!(5000));
    }
}

#[test]
fn test_rounding_residue_lands_in_final_period() {
    // 1000 over 3 periods at 0%: 333.33 + 333.33 + 333.34
    let mut input = loan(AmortizationMode::Annuity, dec!(1000), 3);
    input.annual_rate = Decimal::ZERO;

    let sched = build(&input);
    assert_eq!(sched.lines[0].principal_due, dec!(333.33));
    assert_eq!(sched.lines[1].principal_due, dec!(333.33));
    assert_eq!(sched.lines[2].principal_due, dec!(333.34));
    assert_fully_amortized(&sched, dec!(1000));
}

// ===========================================================================
// Dates and fees
// ===========================================================================

#[test]
fn test_due_dates_follow_frequency() {
    let mut input = loan(AmortizationMode::Annuity, dec!(1000), 3);
    input.start_date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

    let sched = build(&input);
    let dates: Vec<NaiveDate> = sched.lines.iter().map(|l| l.due_date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        ]
    );

    input.frequency = Frequency::Weekly;
    let sched = build(&input);
    assert_eq!(
        sched.lines[2].due_date,
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    );
}

#[test]
fn test_weekly_rate_divisor() {
    // 5200 at 52%/year weekly => 1%/week on the opening balance
    let mut input = loan(AmortizationMode::InterestOnly, dec!(5200), 4);
    input.annual_rate = dec!(0.52);
    input.frequency = Frequency::Weekly;

    let sched = build(&input);
    assert_eq!(sched.lines[0].interest_due, dec!(52));
}

#[test]
fn test_both_fee_policies_charge_the_same_total() {
    let mut first = loan(AmortizationMode::Annuity, dec!(2000), 12);
    first.upfront_fees = dec!(35);

    let mut spread = first.clone();
    spread.upfront_fee_policy = UpfrontFeePolicy::Amortized;

    let first_sched = build(&first);
    let spread_sched = build(&spread);

    assert_eq!(first_sched.lines[0].fees_due, dec!(35));
    assert!(first_sched.lines[1..].iter().all(|l| l.fees_due.is_zero()));

    let spread_total: Decimal = spread_sched.lines.iter().map(|l| l.fees_due).sum();
    assert_eq!(spread_total, dec!(35));
    assert!(spread_sched.lines.iter().all(|l| l.fees_due >= Decimal::ZERO));
    assert_eq!(first_sched.total_fees, spread_sched.total_fees);
}

// ===========================================================================
// Variable rates
// ===========================================================================

#[test]
fn test_variable_rate_by_date_changes_interest() {
    let mut input = loan(AmortizationMode::InterestOnly, dec!(1000), 6);
    input.annual_rate = dec!(0.12);
    input.rate_type = RateType::Variable;
    input.variable_rates = vec![RateOverride {
        effective: RateEffective::Date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
        annual_rate: dec!(0.24),
    }];

    let sched = build(&input);
    // Periods due March through May accrue at 1%, June onwards at 2%
    assert_eq!(sched.lines[0].interest_due, dec!(10));
    assert_eq!(sched.lines[2].interest_due, dec!(10));
    assert_eq!(sched.lines[3].interest_due, dec!(20));
    assert_eq!(sched.lines[5].interest_due, dec!(20));
}

#[test]
fn test_recalc_rebases_on_remaining_balance() {
    let mut input = loan(AmortizationMode::Annuity, dec!(10000), 24);
    input.annual_rate = dec!(0.06);
    input.rate_type = RateType::Variable;
    input.recalc_each_period = true;
    input.variable_rates = vec![RateOverride {
        effective: RateEffective::Period(13),
        annual_rate: dec!(0.10),
    }];

    let sched = build(&input);
    assert_fully_amortized(&sched, dec!(10000));

    // The rate step shows up as a jump in the total payment from period 13
    let before = sched.lines[11].principal_due + sched.lines[11].interest_due;
    let after = sched.lines[12].principal_due + sched.lines[12].interest_due;
    assert!(after > before);

    // And the payment is roughly level within each rate regime
    for pair in sched.lines[12..23].windows(2) {
        let a = pair[0].principal_due + pair[0].interest_due;
        let b = pair[1].principal_due + pair[1].interest_due;
        assert!((a - b).abs() <= dec!(0.05));
    }
}
