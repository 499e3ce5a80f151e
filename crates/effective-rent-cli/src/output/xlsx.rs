use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use effective_rent_core::effective_rent::calculator::EffectiveRentOutput;
use effective_rent_core::effective_rent::report::{self, SCHEDULE_HEADERS};

pub const SCHEDULE_SHEET: &str = "Rent Schedule";
pub const SUMMARY_SHEET: &str = "Summary";

/// Build a two-sheet workbook: the monthly schedule and the summary metrics.
pub fn build_workbook(output: &EffectiveRentOutput) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let cents = Format::new().set_num_format("0.00");

    let schedule = workbook.add_worksheet();
    schedule.set_name(SCHEDULE_SHEET)?;
    for (col, title) in SCHEDULE_HEADERS.iter().enumerate() {
        schedule.write_string_with_format(0, col as u16, *title, &header)?;
        schedule.set_column_width(col as u16, if col == 0 { 8 } else { 26 })?;
    }
    for (i, row) in report::schedule_rows(output).iter().enumerate() {
        let r = (i + 1) as u32;
        schedule.write_number(r, 0, row.month)?;
        schedule.write_number_with_format(r, 1, as_f64(row.scheduled_rent), &cents)?;
        schedule.write_number_with_format(r, 2, as_f64(row.after_free_rent), &cents)?;
        schedule.write_number_with_format(r, 3, as_f64(row.ti), &cents)?;
        schedule.write_number_with_format(r, 4, as_f64(row.effective), &cents)?;
    }

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    summary.write_string_with_format(0, 0, "Metric", &header)?;
    summary.write_string_with_format(0, 1, "Value", &header)?;
    summary.set_column_width(0, 32)?;
    summary.set_column_width(1, 16)?;
    for (i, line) in report::summary_table(&output.summary).iter().enumerate() {
        let r = (i + 1) as u32;
        summary.write_string(r, 0, line.metric.as_str())?;
        summary.write_string(r, 1, line.value.as_str())?;
    }

    Ok(workbook)
}

/// Build the workbook and write it to `path`.
pub fn save_workbook(path: &Path, output: &EffectiveRentOutput) -> Result<(), XlsxError> {
    let mut workbook = build_workbook(output)?;
    workbook.save(path)
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
