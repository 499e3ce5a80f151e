//! Net effective rent (NER) analysis for a single lease.
//!
//! Builds the month-by-month contract rent schedule with annual step
//! escalations, applies the free-rent concession (front-loaded or spread
//! evenly in dollar terms), amortizes the tenant improvement allowance
//! (straight-line or as a level payment at a discount rate) and nets the
//! result from either the tenant's or the landlord's point of view.
//!
//! All figures are per square foot per month unless stated otherwise.
//! Nothing is rounded here; see [`super::report`] for display rounding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EffectiveRentError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SquareFeet};
use crate::EffectiveRentResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MONTHS_PER_YEAR: u32 = 12;
const HIGH_ESCALATION_THRESHOLD: Rate = dec!(0.10);
const HIGH_DISCOUNT_RATE_THRESHOLD: Rate = dec!(0.25);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whose economics the analysis reflects.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Perspective {
    /// TI is a credit and lowers the effective rent
    #[default]
    Tenant,
    /// TI is a cost and raises the effective rent
    Landlord,
}

impl Perspective {
    fn signed(self, ti_per_month: Money) -> Money {
        if ti_per_month.is_zero() {
            return Decimal::ZERO;
        }
        match self {
            Perspective::Tenant => -ti_per_month,
            Perspective::Landlord => ti_per_month,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Perspective::Tenant => "tenant perspective",
            Perspective::Landlord => "landlord perspective",
        }
    }
}

/// How the free-rent concession lands in the monthly schedule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FreeRentTreatment {
    /// The first N months are waived outright
    #[default]
    FrontLoaded,
    /// The dollar value of the first N months is credited evenly across the term
    SpreadEvenly,
}

impl FreeRentTreatment {
    fn describe(self) -> &'static str {
        match self {
            FreeRentTreatment::FrontLoaded => "front-loaded free rent",
            FreeRentTreatment::SpreadEvenly => "free rent spread evenly",
        }
    }
}

/// Amortization policy for the TI allowance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method")]
pub enum TiAmortization {
    /// Allowance divided evenly over the term
    #[default]
    StraightLine,
    /// Level monthly payment recovering the allowance at `discount_rate / 12`
    Discounted {
        /// Annual discount rate (e.g. 0.07 = 7%)
        discount_rate: Rate,
    },
}

impl TiAmortization {
    fn describe(&self) -> &'static str {
        match self {
            TiAmortization::StraightLine => "straight-line TI amortization",
            TiAmortization::Discounted { .. } => "discounted TI amortization",
        }
    }
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Lease parameters for one effective rent calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRentInput {
    /// Rentable square feet
    pub rentable_square_feet: SquareFeet,
    /// Month-one contract rent ($/SF/month)
    pub starting_rent: Money,
    /// Lease term in months
    pub term_months: u32,
    /// Annual escalation applied on each anniversary (e.g. 0.03 = 3%)
    #[serde(default)]
    pub annual_escalation: Rate,
    /// Months of free rent; anything beyond the term is clamped
    #[serde(default)]
    pub free_rent_months: u32,
    /// How the free-rent concession is applied
    #[serde(default)]
    pub free_rent_treatment: FreeRentTreatment,
    /// TI allowance ($/SF, lump sum)
    #[serde(default)]
    pub ti_allowance_per_sf: Money,
    /// TI amortization policy
    #[serde(default)]
    pub ti_amortization: TiAmortization,
    #[serde(default)]
    pub perspective: Perspective,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single month of the rent schedule ($/SF/month, unrounded).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentScheduleRow {
    /// Month number (1-indexed)
    pub month: u32,
    /// Contract rent after escalations
    pub scheduled_rent: Money,
    /// Rent after the free-rent concession
    pub after_free_rent: Money,
    /// Unsigned monthly TI amortization
    pub ti_per_month: Money,
    /// After-free-rent rent with the perspective-signed TI applied
    pub net_effective_rent: Money,
}

/// Headline metrics derived from the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveRentSummary {
    /// Average net effective rent ($/SF/month)
    pub net_effective_rent_monthly: Money,
    /// Net effective rent annualised ($/SF/year)
    pub net_effective_rent_annual: Money,
    /// Average scheduled contract rent ($/SF/month)
    pub avg_contract_rent: Money,
    /// Unsigned monthly TI amortization ($/SF/month)
    pub ti_impact_per_month: Money,
    /// Scheduled rent over the term, whole premises ($)
    pub total_contract_rent: Money,
    /// Rent waived by the concession, whole premises ($)
    pub total_free_rent_value: Money,
    /// TI allowance, whole premises ($)
    pub total_ti: Money,
}

/// Complete output of an effective rent calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRentOutput {
    pub rentable_square_feet: SquareFeet,
    pub perspective: Perspective,
    /// Free-rent months after clamping to the term
    pub free_rent_months_applied: u32,
    /// Uniform monthly credit ($/SF) when free rent is spread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_rent_credit_per_month: Option<Money>,
    /// Spread credit ($/SF, summed over the term) lost to the zero floor
    pub unapplied_free_rent_credit: Money,
    pub summary: EffectiveRentSummary,
    pub schedule: Vec<RentScheduleRow>,
}

/// Result of applying the free-rent concession to a scheduled rent stream.
#[derive(Debug, Clone)]
struct FreeRentConcession {
    rents: Vec<Money>,
    credit_per_month: Option<Money>,
    unapplied_credit: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the monthly rent schedule and net effective rent metrics for a
/// lease.
///
/// Steps:
/// 1. Contract rent steps up by `annual_escalation` at months 13, 25, ...
/// 2. Free rent zeroes the first N months, or subtracts
///    `sum(first N months) / term` from every month (floored at zero).
/// 3. TI is amortized straight-line, or as a level payment
///    `TI * r / (1 - (1 + r)^-n)` with `r = discount_rate / 12`.
/// 4. NER = after-free-rent rent - TI (tenant) or + TI (landlord).
pub fn calculate_effective_rent(
    input: &EffectiveRentInput,
) -> EffectiveRentResult<ComputationOutput<EffectiveRentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // --- Contract rent ---
    let scheduled = build_escalation_schedule(
        input.starting_rent,
        input.annual_escalation,
        input.term_months,
    )?;
    let scheduled_sum = checked_sum(&scheduled, "annual_escalation")?;

    // --- Free rent ---
    let free_months = input.free_rent_months.min(input.term_months);
    if input.free_rent_months > input.term_months {
        warnings.push(format!(
            "Free rent of {} months exceeds the {}-month term; clamped to {}",
            input.free_rent_months, input.term_months, free_months
        ));
    }
    let concession = apply_free_rent(&scheduled, free_months, input.free_rent_treatment);
    if concession.unapplied_credit > Decimal::ZERO {
        warnings.push(format!(
            "Spread free-rent credit exceeds scheduled rent in some months; \
             {} $/SF of concession was not applied",
            concession.unapplied_credit
        ));
    }

    // --- TI ---
    let ti_per_month = amortize_ti(
        input.ti_allowance_per_sf,
        input.term_months,
        &input.ti_amortization,
    )?;
    let signed_ti = input.perspective.signed(ti_per_month);

    let schedule = scheduled
        .iter()
        .zip(&concession.rents)
        .enumerate()
        .map(|(i, (&scheduled_rent, &after_free_rent))| {
            let net_effective_rent = after_free_rent
                .checked_add(signed_ti)
                .ok_or_else(|| overflow("ti_allowance_per_sf"))?;
            Ok(RentScheduleRow {
                month: (i + 1) as u32,
                scheduled_rent,
                after_free_rent,
                ti_per_month,
                net_effective_rent,
            })
        })
        .collect::<EffectiveRentResult<Vec<RentScheduleRow>>>()?;

    // --- Aggregation ---
    let term = Decimal::from(input.term_months);
    let rsf = input.rentable_square_feet;
    let effective_sum: Money = concession.rents.iter().copied().sum();
    let net_sum = checked_sum(
        schedule.iter().map(|r| &r.net_effective_rent),
        "ti_allowance_per_sf",
    )?;

    let total_contract_rent = checked_mul(scheduled_sum, rsf, "rentable_square_feet")?;
    let total_effective_rent = effective_sum * rsf;
    let net_effective_rent_monthly = net_sum / term;

    let summary = EffectiveRentSummary {
        net_effective_rent_monthly,
        net_effective_rent_annual: checked_mul(
            net_effective_rent_monthly,
            Decimal::from(MONTHS_PER_YEAR),
            "starting_rent",
        )?,
        avg_contract_rent: scheduled_sum / term,
        ti_impact_per_month: ti_per_month,
        total_contract_rent,
        total_free_rent_value: total_contract_rent - total_effective_rent,
        total_ti: checked_mul(input.ti_allowance_per_sf, rsf, "rentable_square_feet")?,
    };

    // --- Reasonableness warnings ---
    if input.annual_escalation > HIGH_ESCALATION_THRESHOLD {
        warnings.push(format!(
            "Annual escalation of {} exceeds 10%; verify lease terms",
            input.annual_escalation
        ));
    }
    if let TiAmortization::Discounted { discount_rate } = input.ti_amortization {
        if discount_rate > HIGH_DISCOUNT_RATE_THRESHOLD {
            warnings.push(format!(
                "Discount rate of {discount_rate} exceeds 25%; verify cost of capital"
            ));
        }
    }
    if input.ti_allowance_per_sf > scheduled_sum {
        warnings.push(format!(
            "TI allowance of {} $/SF exceeds total contract rent of {} $/SF over the term",
            input.ti_allowance_per_sf, scheduled_sum
        ));
    }

    let output = EffectiveRentOutput {
        rentable_square_feet: rsf,
        perspective: input.perspective,
        free_rent_months_applied: free_months,
        free_rent_credit_per_month: concession.credit_per_month,
        unapplied_free_rent_credit: concession.unapplied_credit,
        summary,
        schedule,
    };

    let methodology = format!(
        "Net effective rent: annual step escalation, {}, {} ({})",
        input.free_rent_treatment.describe(),
        input.ti_amortization.describe(),
        input.perspective.describe()
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(&methodology, input, warnings, elapsed, output))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &EffectiveRentInput) -> EffectiveRentResult<()> {
    if input.rentable_square_feet <= Decimal::ZERO {
        return Err(EffectiveRentError::InvalidInput {
            field: "rentable_square_feet".into(),
            reason: "Rentable square feet must be positive".into(),
        });
    }
    if input.starting_rent <= Decimal::ZERO {
        return Err(EffectiveRentError::InvalidInput {
            field: "starting_rent".into(),
            reason: "Starting rent must be positive".into(),
        });
    }
    if input.term_months == 0 {
        return Err(EffectiveRentError::InvalidInput {
            field: "term_months".into(),
            reason: "Lease term must be greater than zero".into(),
        });
    }
    if input.annual_escalation < Decimal::ZERO {
        return Err(EffectiveRentError::InvalidInput {
            field: "annual_escalation".into(),
            reason: "Annual escalation cannot be negative".into(),
        });
    }
    if input.ti_allowance_per_sf < Decimal::ZERO {
        return Err(EffectiveRentError::InvalidInput {
            field: "ti_allowance_per_sf".into(),
            reason: "TI allowance cannot be negative".into(),
        });
    }
    if let TiAmortization::Discounted { discount_rate } = input.ti_amortization {
        if discount_rate < Decimal::ZERO {
            return Err(EffectiveRentError::InvalidInput {
                field: "discount_rate".into(),
                reason: "Discount rate cannot be negative".into(),
            });
        }
    }
    Ok(())
}

fn overflow(field: &str) -> EffectiveRentError {
    EffectiveRentError::InvalidInput {
        field: field.into(),
        reason: "Lease totals overflow decimal range".into(),
    }
}

fn checked_mul(a: Decimal, b: Decimal, field: &str) -> EffectiveRentResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

fn checked_sum<'a>(
    values: impl IntoIterator<Item = &'a Money>,
    field: &str,
) -> EffectiveRentResult<Money> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(*v).ok_or_else(|| overflow(field))
    })
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

fn build_escalation_schedule(
    starting_rent: Money,
    annual_escalation: Rate,
    term_months: u32,
) -> EffectiveRentResult<Vec<Money>> {
    let step = Decimal::ONE + annual_escalation;
    let mut rents = Vec::with_capacity(term_months as usize);
    let mut current = starting_rent;

    for month in 1..=term_months {
        if month > 1 && (month - 1) % MONTHS_PER_YEAR == 0 {
            current = checked_mul(current, step, "annual_escalation")?;
        }
        rents.push(current);
    }

    Ok(rents)
}

fn apply_free_rent(
    scheduled: &[Money],
    free_months: u32,
    treatment: FreeRentTreatment,
) -> FreeRentConcession {
    let n = (free_months as usize).min(scheduled.len());

    match treatment {
        FreeRentTreatment::FrontLoaded => {
            let rents = scheduled
                .iter()
                .enumerate()
                .map(|(i, &rent)| if i < n { Decimal::ZERO } else { rent })
                .collect();
            FreeRentConcession {
                rents,
                credit_per_month: None,
                unapplied_credit: Decimal::ZERO,
            }
        }
        FreeRentTreatment::SpreadEvenly => {
            let free_value: Money = scheduled[..n].iter().copied().sum();
            let credit = if scheduled.is_empty() {
                Decimal::ZERO
            } else {
                free_value / Decimal::from(scheduled.len() as u64)
            };

            let mut unapplied = Decimal::ZERO;
            let rents = scheduled
                .iter()
                .map(|&rent| {
                    let net = rent - credit;
                    if net < Decimal::ZERO {
                        unapplied -= net;
                        Decimal::ZERO
                    } else {
                        net
                    }
                })
                .collect();

            FreeRentConcession {
                rents,
                credit_per_month: Some(credit),
                unapplied_credit: unapplied,
            }
        }
    }
}

fn amortize_ti(
    allowance: Money,
    term_months: u32,
    method: &TiAmortization,
) -> EffectiveRentResult<Money> {
    if allowance.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let straight_line = allowance / Decimal::from(term_months);

    match method {
        TiAmortization::StraightLine => Ok(straight_line),
        TiAmortization::Discounted { discount_rate } => {
            let monthly_rate = *discount_rate / Decimal::from(MONTHS_PER_YEAR);
            if monthly_rate.is_zero() {
                // Limit of the annuity as r -> 0
                return Ok(straight_line);
            }
            time_value::pmt(monthly_rate, term_months, -allowance, Decimal::ZERO).map_err(
                |e| match e {
                    EffectiveRentError::InvalidInput { reason, .. } => {
                        EffectiveRentError::InvalidInput {
                            field: "discount_rate".into(),
                            reason,
                        }
                    }
                    other => other,
                },
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
