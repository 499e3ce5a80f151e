use effective_rent_core::effective_rent::calculator::{
    calculate_effective_rent, EffectiveRentInput, EffectiveRentOutput, FreeRentTreatment,
    Perspective, TiAmortization,
};
use effective_rent_core::EffectiveRentError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const TOLERANCE: Decimal = dec!(0.000001);

/// Scenario A: tenant view, front-loaded free rent, straight-line TI
fn scenario_a() -> EffectiveRentInput {
    EffectiveRentInput {
        rentable_square_feet: dec!(10000),
        starting_rent: dec!(2.50),
        term_months: 60,
        annual_escalation: dec!(0.03),
        free_rent_months: 3,
        free_rent_treatment: FreeRentTreatment::FrontLoaded,
        ti_allowance_per_sf: dec!(30),
        ti_amortization: TiAmortization::StraightLine,
        perspective: Perspective::Tenant,
    }
}

fn calc(input: &EffectiveRentInput) -> EffectiveRentOutput {
    calculate_effective_rent(input).unwrap().result
}

// ===========================================================================
// Acceptance scenarios
// ===========================================================================

#[test]
fn test_scenario_a_tenant_front_loaded() {
    let out = calc(&scenario_a());
    assert!(
        out.summary.net_effective_rent_monthly < out.summary.avg_contract_rent,
        "Tenant NER {} should be below average contract rent {}",
        out.summary.net_effective_rent_monthly,
        out.summary.avg_contract_rent
    );
}

#[test]
fn test_scenario_b_tenant_spread() {
    let a = calc(&scenario_a());

    let mut input = scenario_a();
    input.free_rent_treatment = FreeRentTreatment::SpreadEvenly;
    let b = calc(&input);

    assert!(b.schedule[0].after_free_rent > Decimal::ZERO);
    assert!(
        (b.summary.total_free_rent_value - a.summary.total_free_rent_value).abs() < dec!(0.01),
        "Free rent value should be unchanged: {} vs {}",
        b.summary.total_free_rent_value,
        a.summary.total_free_rent_value
    );
    // 7.50 of free rent over 60 months
    assert_eq!(b.free_rent_credit_per_month, Some(dec!(0.125)));
    assert_eq!(b.schedule[0].after_free_rent, dec!(2.375));
}

#[test]
fn test_scenario_c_landlord() {
    let mut input = scenario_a();
    input.perspective = Perspective::Landlord;
    let out = calc(&input);
    assert!(out.summary.net_effective_rent_monthly > out.summary.avg_contract_rent);
    assert_eq!(out.summary.net_effective_rent_monthly, dec!(3.029567905));
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_schedule_length_matches_term() {
    for term in [1u32, 11, 12, 13, 60, 121, 360] {
        let mut input = scenario_a();
        input.term_months = term;
        let out = calc(&input);
        assert_eq!(out.schedule.len(), term as usize);
        assert_eq!(out.schedule.first().map(|r| r.month), Some(1));
        assert_eq!(out.schedule.last().map(|r| r.month), Some(term));
    }
}

#[test]
fn test_escalation_compounds_on_anniversaries() {
    let out = calc(&scenario_a());
    assert_eq!(out.schedule[12].scheduled_rent, dec!(2.50) * dec!(1.03));
    assert_eq!(
        out.schedule[24].scheduled_rent,
        dec!(2.50) * dec!(1.03) * dec!(1.03)
    );
    assert_eq!(out.schedule[11].scheduled_rent, dec!(2.50));
}

#[test]
fn test_front_loaded_first_months_are_zero() {
    let out = calc(&scenario_a());
    for row in &out.schedule[..3] {
        assert_eq!(row.after_free_rent, Decimal::ZERO);
    }
    assert_eq!(out.schedule[3].after_free_rent, dec!(2.50));
}

#[test]
fn test_spread_never_negative() {
    let mut input = scenario_a();
    input.free_rent_treatment = FreeRentTreatment::SpreadEvenly;
    input.free_rent_months = 48;
    input.annual_escalation = dec!(0.20);
    let out = calc(&input);
    assert!(out
        .schedule
        .iter()
        .all(|r| r.after_free_rent >= Decimal::ZERO));
}

#[test]
fn test_spread_credit_applied_uniformly() {
    let mut input = scenario_a();
    input.free_rent_treatment = FreeRentTreatment::SpreadEvenly;
    let out = calc(&input);
    let credit = out.free_rent_credit_per_month.unwrap();
    for row in &out.schedule {
        assert_eq!(row.scheduled_rent - row.after_free_rent, credit);
    }
}

#[test]
fn test_free_rent_invariance_across_treatments() {
    for free in [0u32, 1, 6, 12, 18] {
        let mut front = scenario_a();
        front.free_rent_months = free;
        let mut spread = front.clone();
        spread.free_rent_treatment = FreeRentTreatment::SpreadEvenly;

        let f = calc(&front).summary.total_free_rent_value;
        let s = calc(&spread).summary.total_free_rent_value;
        assert!(
            (f - s).abs() < dec!(0.01),
            "free={free}: front {f} vs spread {s}"
        );
    }
}

#[test]
fn test_net_effective_rent_row_identity() {
    let out = calc(&scenario_a());
    for row in &out.schedule {
        assert_eq!(row.net_effective_rent, row.after_free_rent - dec!(0.5));
    }
}

// ===========================================================================
// TI
// ===========================================================================

#[test]
fn test_ti_sign_brackets_contract_rent() {
    let tenant = calc(&scenario_a()).summary;
    let mut input = scenario_a();
    input.perspective = Perspective::Landlord;
    let landlord = calc(&input).summary;

    assert!(tenant.net_effective_rent_monthly < tenant.avg_contract_rent);
    assert!(tenant.avg_contract_rent < landlord.net_effective_rent_monthly);
}

#[test]
fn test_discounted_zero_rate_equals_straight_line() {
    let straight = calc(&scenario_a()).summary;
    let mut input = scenario_a();
    input.ti_amortization = TiAmortization::Discounted {
        discount_rate: Decimal::ZERO,
    };
    let discounted = calc(&input).summary;
    assert_eq!(discounted.ti_impact_per_month, straight.ti_impact_per_month);
    assert_eq!(
        discounted.net_effective_rent_monthly,
        straight.net_effective_rent_monthly
    );
}

#[test]
fn test_discounted_ti_level_payment() {
    let mut input = scenario_a();
    input.ti_amortization = TiAmortization::Discounted {
        discount_rate: dec!(0.07),
    };
    let out = calc(&input);
    // 30 * (0.07/12) / (1 - (1 + 0.07/12)^-60) = 0.594036
    assert!((out.summary.ti_impact_per_month - dec!(0.594036)).abs() < dec!(0.00001));
    assert!(
        (out.summary.net_effective_rent_monthly - dec!(1.935532)).abs() < dec!(0.00001)
    );
}

// ===========================================================================
// Monotonicity
// ===========================================================================

#[test]
fn test_free_rent_lowers_tenant_ner() {
    let mut none = scenario_a();
    none.free_rent_months = 0;
    let without = calc(&none).summary.net_effective_rent_monthly;
    let with = calc(&scenario_a()).summary.net_effective_rent_monthly;
    assert!(with < without);
}

#[test]
fn test_more_ti_moves_ner_by_perspective() {
    let mut low = scenario_a();
    low.ti_allowance_per_sf = dec!(10);
    let mut high = scenario_a();
    high.ti_allowance_per_sf = dec!(50);

    assert!(
        calc(&high).summary.net_effective_rent_monthly
            < calc(&low).summary.net_effective_rent_monthly
    );

    low.perspective = Perspective::Landlord;
    high.perspective = Perspective::Landlord;
    assert!(
        calc(&high).summary.net_effective_rent_monthly
            > calc(&low).summary.net_effective_rent_monthly
    );
}

// ===========================================================================
// Aggregates
// ===========================================================================

#[test]
fn test_aggregates_use_unrounded_values() {
    let out = calc(&scenario_a());
    let s = &out.summary;
    let scheduled_sum: Decimal = out.schedule.iter().map(|r| r.scheduled_rent).sum();

    assert_eq!(s.total_contract_rent, scheduled_sum * dec!(10000));
    assert_eq!(s.total_ti, dec!(300000));
    assert!(
        (s.net_effective_rent_annual - s.net_effective_rent_monthly * dec!(12)).abs() < TOLERANCE
    );
    assert_eq!(s.net_effective_rent_monthly, dec!(2.029567905));
}

#[test]
fn test_spread_clamp_shortfall_is_reported() {
    // 23 of 24 months free with a 300% step-up: the credit exceeds year-one rent
    let input = EffectiveRentInput {
        rentable_square_feet: dec!(1000),
        starting_rent: dec!(1),
        term_months: 24,
        annual_escalation: dec!(3),
        free_rent_months: 23,
        free_rent_treatment: FreeRentTreatment::SpreadEvenly,
        ti_allowance_per_sf: Decimal::ZERO,
        ti_amortization: TiAmortization::StraightLine,
        perspective: Perspective::Tenant,
    };
    let full = calculate_effective_rent(&input).unwrap();
    let out = &full.result;
    // free value = 12 * 1 + 11 * 4 = 56; credit = 56 / 24 = 2.333...
    assert!(out.unapplied_free_rent_credit > Decimal::ZERO);
    assert!(out.schedule[..12].iter().all(|r| r.after_free_rent.is_zero()));
    assert!(full.warnings.iter().any(|w| w.contains("not applied")));
}

// ===========================================================================
// Errors and envelope
// ===========================================================================

#[test]
fn test_invalid_input_is_rejected_before_computation() {
    let mut input = scenario_a();
    input.rentable_square_feet = dec!(-10);
    match calculate_effective_rent(&input) {
        Err(EffectiveRentError::InvalidInput { field, reason }) => {
            assert_eq!(field, "rentable_square_feet");
            assert!(reason.contains("positive"));
        }
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_envelope_echoes_assumptions() {
    let full = calculate_effective_rent(&scenario_a()).unwrap();
    assert_eq!(full.assumptions["term_months"], 60);
    assert_eq!(full.assumptions["perspective"], "Tenant");
    assert_eq!(full.metadata.precision, "rust_decimal_128bit");
    assert!(full.warnings.is_empty());
}

// ===========================================================================
// Decimal range
// ===========================================================================

fn assert_overflow_on(input: &EffectiveRentInput, expected_field: &str) {
    match calculate_effective_rent(input) {
        Err(EffectiveRentError::InvalidInput { field, reason }) => {
            assert_eq!(field, expected_field);
            assert!(reason.contains("overflow"), "unexpected reason: {reason}");
        }
        other => panic!("Expected InvalidInput on {expected_field}, got {other:?}"),
    }
}

#[test]
fn test_discounted_ti_at_extreme_rate_returns_error() {
    let mut input = scenario_a();
    input.term_months = 360;
    input.ti_amortization = TiAmortization::Discounted {
        discount_rate: dec!(3),
    };
    assert_overflow_on(&input, "discount_rate");
}

#[test]
fn test_runaway_escalation_returns_error() {
    let mut input = scenario_a();
    input.term_months = 1200;
    input.annual_escalation = dec!(1);
    assert_overflow_on(&input, "annual_escalation");
}

#[test]
fn test_total_contract_rent_overflow_returns_error() {
    let mut input = scenario_a();
    input.rentable_square_feet = Decimal::MAX;
    assert_overflow_on(&input, "rentable_square_feet");
}
