use std::io;

use effective_rent_core::effective_rent::calculator::EffectiveRentOutput;
use effective_rent_core::effective_rent::report::{self, ScheduleDisplayRow};
use effective_rent_core::ComputationOutput;

/// Write the display-rounded monthly schedule as CSV to stdout.
pub fn print_csv(
    output: &ComputationOutput<EffectiveRentOutput>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    write_schedule(stdout.lock(), &report::schedule_rows(&output.result))?;
    Ok(())
}

/// Serialise schedule rows with the export column headers.
pub fn write_schedule<W: io::Write>(writer: W, rows: &[ScheduleDisplayRow]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
