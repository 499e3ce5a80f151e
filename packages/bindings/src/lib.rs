use napi::Result as NapiResult;
use napi_derive::napi;

use effective_rent_core::effective_rent::calculator::{self, EffectiveRentInput};
use effective_rent_core::effective_rent::report;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<EffectiveRentInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Effective rent
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_effective_rent(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = calculator::calculate_effective_rent(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Display-ready report: rounded schedule, labeled summary, cards, insights.
#[napi]
pub fn effective_rent_report(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = calculator::calculate_effective_rent(&input).map_err(to_napi_error)?;
    let report = report::build_report(&output.result);
    serde_json::to_string(&report).map_err(to_napi_error)
}

/// Suggested export file stem for a given RSF and local timestamp
/// (`YYYY-MM-DDTHH:MM:SS`).
#[napi]
pub fn export_basename(rentable_square_feet: String, timestamp: String) -> NapiResult<String> {
    let rsf: rust_decimal::Decimal = rentable_square_feet.parse().map_err(to_napi_error)?;
    let stamp: chrono::NaiveDateTime = timestamp.parse().map_err(to_napi_error)?;
    Ok(report::export_basename(rsf, stamp))
}
