use effective_rent_core::effective_rent::calculator::EffectiveRentOutput;
use effective_rent_core::effective_rent::report::{format_fixed, RATE_DP};
use effective_rent_core::ComputationOutput;

/// Print just the monthly net effective rent ($/SF/mo).
pub fn print_minimal(
    output: &ComputationOutput<EffectiveRentOutput>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", minimal_line(&output.result));
    Ok(())
}

fn minimal_line(output: &EffectiveRentOutput) -> String {
    format_fixed(output.summary.net_effective_rent_monthly, RATE_DP)
}
