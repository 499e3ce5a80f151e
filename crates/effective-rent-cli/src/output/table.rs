use tabled::{builder::Builder, Table};

use effective_rent_core::effective_rent::calculator::EffectiveRentOutput;
use effective_rent_core::effective_rent::report::{self, MetricCard, SCHEDULE_HEADERS};
use effective_rent_core::ComputationOutput;

/// Format output as tables using the tabled crate.
pub fn print_table(
    output: &ComputationOutput<EffectiveRentOutput>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = report::build_report(&output.result);

    println!("{}", cards_table(&report.headline));
    println!(
        "\nTotal Values ({} RSF)",
        report::format_grouped(output.result.rentable_square_feet, 0)
    );
    println!("{}", cards_table(&report.totals));

    let mut summary = Builder::default();
    summary.push_record(["Metric", "Value"]);
    for line in &report.summary {
        summary.push_record([line.metric.as_str(), line.value.as_str()]);
    }
    println!("\n{}", Table::from(summary));

    let mut schedule = Builder::default();
    schedule.push_record(SCHEDULE_HEADERS);
    for row in &report.schedule {
        schedule.push_record(row.to_record());
    }
    println!("\nMonthly Payment Schedule");
    println!("{}", Table::from(schedule));

    let insights = &report.insights;
    println!(
        "\nFree rent months: {}  Escalations: {}  Highest rent: ${}/SF  Avg effective: ${}/SF/mo",
        insights.free_rent_periods,
        insights.escalation_count,
        insights.highest_scheduled_rent,
        insights.avg_effective_rent
    );

    if !output.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &output.warnings {
            println!("  - {}", w);
        }
    }

    println!("\nMethodology: {}", output.methodology);
    Ok(())
}

fn cards_table(cards: &[MetricCard]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value", "Detail"]);
    for card in cards {
        builder.push_record([card.title.as_str(), card.value.as_str(), card.detail.as_str()]);
    }
    Table::from(builder)
}
