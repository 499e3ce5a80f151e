use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::EffectiveRentError;
use crate::types::{Money, Rate};
use crate::EffectiveRentResult;

/// Payment (PMT): the level per-period amount that retires `present_value`
/// (and reaches `future_value`) over `nper` periods at `rate`.
///
/// At a zero rate this degenerates to a straight-line split.
pub fn pmt(
    rate: Rate,
    nper: u32,
    present_value: Money,
    future_value: Money,
) -> EffectiveRentResult<Money> {
    if nper == 0 {
        return Err(EffectiveRentError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(EffectiveRentError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let compounded = present_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(future_value))
        .ok_or_else(|| overflow("present_value"))?;
    Ok(-compounded / annuity_factor)
}

/// (1 + rate)^nper with an integer exponent.
fn growth_factor(rate: Rate, nper: u32) -> EffectiveRentResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| overflow("rate"))
}

fn overflow(field: &str) -> EffectiveRentError {
    EffectiveRentError::InvalidInput {
        field: field.into(),
        reason: "Compounded value overflows decimal range".into(),
    }
}
