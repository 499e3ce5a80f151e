pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;
pub mod xlsx;

use effective_rent_core::effective_rent::calculator::EffectiveRentOutput;
use effective_rent_core::ComputationOutput;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(
    format: &OutputFormat,
    output: &ComputationOutput<EffectiveRentOutput>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => json::print_json(output),
        OutputFormat::Table => table::print_table(output),
        OutputFormat::Csv => csv_out::print_csv(output),
        OutputFormat::Minimal => minimal::print_minimal(output),
    }
}
