//! Presentation helpers for effective rent results.
//!
//! The calculator works on unrounded values; everything in this module is
//! display-oriented. Per-SF figures are rounded to cents and whole-premises
//! totals to dollars at the point of rendering only.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculator::{EffectiveRentOutput, EffectiveRentSummary};
use crate::types::{Money, SquareFeet};

/// Decimal places for $/SF figures.
pub const RATE_DP: u32 = 2;
/// Decimal places for whole-premises dollar totals.
pub const TOTAL_DP: u32 = 0;

/// Column labels of the exported monthly schedule.
pub const SCHEDULE_HEADERS: [&str; 5] = [
    "Month",
    "Scheduled Rent ($/SF/mo)",
    "After Free Rent ($/SF/mo)",
    "TI ($/SF/mo)",
    "Effective ($/SF/mo)",
];

/// One display-rounded month of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDisplayRow {
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Scheduled Rent ($/SF/mo)")]
    pub scheduled_rent: Money,
    #[serde(rename = "After Free Rent ($/SF/mo)")]
    pub after_free_rent: Money,
    #[serde(rename = "TI ($/SF/mo)")]
    pub ti: Money,
    #[serde(rename = "Effective ($/SF/mo)")]
    pub effective: Money,
}

impl ScheduleDisplayRow {
    /// Cells in `SCHEDULE_HEADERS` order.
    pub fn to_record(&self) -> [String; 5] {
        [
            self.month.to_string(),
            self.scheduled_rent.to_string(),
            self.after_free_rent.to_string(),
            self.ti.to_string(),
            self.effective.to_string(),
        ]
    }
}

/// A labeled, formatted summary metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryLine {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Headline figure with a one-line supporting detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub detail: String,
}

/// Derived observations about the schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleInsights {
    pub highest_scheduled_rent: Money,
    /// Months whose displayed after-free-rent value is zero
    pub free_rent_periods: usize,
    /// Months where displayed contract rent steps up
    pub escalation_count: usize,
    pub avg_scheduled_rent: Money,
    pub avg_effective_rent: Money,
}

/// Everything a renderer needs, pre-rounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveRentReport {
    pub headline: [MetricCard; 3],
    pub totals: [MetricCard; 3],
    pub summary: Vec<SummaryLine>,
    pub insights: ScheduleInsights,
    pub schedule: Vec<ScheduleDisplayRow>,
}

/// Assemble the full display report for a calculation.
pub fn build_report(output: &EffectiveRentOutput) -> EffectiveRentReport {
    EffectiveRentReport {
        headline: headline_cards(&output.summary),
        totals: total_value_cards(&output.summary, output.rentable_square_feet),
        summary: summary_table(&output.summary),
        insights: insights(output),
        schedule: schedule_rows(output),
    }
}

/// Monthly schedule rounded to cents.
pub fn schedule_rows(output: &EffectiveRentOutput) -> Vec<ScheduleDisplayRow> {
    output
        .schedule
        .iter()
        .map(|row| ScheduleDisplayRow {
            month: row.month,
            scheduled_rent: round_display(row.scheduled_rent, RATE_DP),
            after_free_rent: round_display(row.after_free_rent, RATE_DP),
            ti: round_display(row.ti_per_month, RATE_DP),
            effective: round_display(row.net_effective_rent, RATE_DP),
        })
        .collect()
}

/// The seven summary metrics, labeled and formatted for export.
pub fn summary_table(summary: &EffectiveRentSummary) -> Vec<SummaryLine> {
    let lines = [
        ("Net Effective Rent ($/SF/mo)", summary.net_effective_rent_monthly, RATE_DP),
        ("Net Effective Rent ($/SF/yr)", summary.net_effective_rent_annual, RATE_DP),
        ("Avg Contract Rent ($/SF/mo)", summary.avg_contract_rent, RATE_DP),
        ("TI Impact ($/SF/mo)", summary.ti_impact_per_month, RATE_DP),
        ("Total Contract Rent ($)", summary.total_contract_rent, TOTAL_DP),
        ("Total Free Rent Value ($)", summary.total_free_rent_value, TOTAL_DP),
        ("Total TI ($)", summary.total_ti, TOTAL_DP),
    ];

    lines
        .into_iter()
        .map(|(metric, value, dp)| SummaryLine {
            metric: metric.to_string(),
            value: format_grouped(value, dp),
        })
        .collect()
}

/// Net effective rent, average contract rent and TI impact cards.
pub fn headline_cards(summary: &EffectiveRentSummary) -> [MetricCard; 3] {
    let ner = round_display(summary.net_effective_rent_monthly, RATE_DP);
    let avg = round_display(summary.avg_contract_rent, RATE_DP);
    let spread = avg - ner;
    let sign = if spread < Decimal::ZERO { "" } else { "+" };

    [
        MetricCard {
            title: "Net Effective Rent".into(),
            value: format!("${}/SF/mo", format_grouped(ner, RATE_DP)),
            detail: format!(
                "${}/SF/yr",
                format_grouped(summary.net_effective_rent_annual, RATE_DP)
            ),
        },
        MetricCard {
            title: "Avg Contract Rent".into(),
            value: format!("${}/SF/mo", format_grouped(avg, RATE_DP)),
            detail: format!("{sign}{} $/SF/mo vs NER", format_fixed(spread, RATE_DP)),
        },
        MetricCard {
            title: "TI Impact".into(),
            value: format!(
                "${}/SF/mo",
                format_grouped(summary.ti_impact_per_month, RATE_DP)
            ),
            detail: format!("${} total", format_grouped(summary.total_ti, TOTAL_DP)),
        },
    ]
}

/// Whole-premises totals: contract rent, free rent savings, TI allowance.
pub fn total_value_cards(summary: &EffectiveRentSummary, rsf: SquareFeet) -> [MetricCard; 3] {
    let contract = round_display(summary.total_contract_rent, TOTAL_DP);
    let free = round_display(summary.total_free_rent_value, TOTAL_DP);
    let total_ti = round_display(summary.total_ti, TOTAL_DP);

    let free_pct = if contract.is_zero() {
        Decimal::ZERO
    } else {
        free / contract * dec!(100)
    };
    let ti_per_sf = if rsf.is_zero() {
        Decimal::ZERO
    } else {
        total_ti / rsf
    };

    [
        MetricCard {
            title: "Total Contract Rent".into(),
            value: format!("${}", format_grouped(contract, TOTAL_DP)),
            detail: "Total scheduled rent over lease term".into(),
        },
        MetricCard {
            title: "Free Rent Savings".into(),
            value: format!("${}", format_grouped(free, TOTAL_DP)),
            detail: format!("{}% of contract", format_fixed(free_pct, 1)),
        },
        MetricCard {
            title: "Total TI Allowance".into(),
            value: format!("${}", format_grouped(total_ti, TOTAL_DP)),
            detail: format!("${}/SF", format_fixed(ti_per_sf, RATE_DP)),
        },
    ]
}

pub fn insights(output: &EffectiveRentOutput) -> ScheduleInsights {
    let rows = schedule_rows(output);
    let months = Decimal::from(rows.len().max(1) as u64);

    let highest_scheduled_rent = rows
        .iter()
        .map(|r| r.scheduled_rent)
        .max()
        .unwrap_or(Decimal::ZERO);
    let free_rent_periods = rows.iter().filter(|r| r.after_free_rent.is_zero()).count();
    let escalation_count = rows
        .windows(2)
        .filter(|w| w[1].scheduled_rent > w[0].scheduled_rent)
        .count();

    let scheduled_sum: Money = rows.iter().map(|r| r.scheduled_rent).sum();
    let effective_sum: Money = rows.iter().map(|r| r.effective).sum();

    ScheduleInsights {
        highest_scheduled_rent,
        free_rent_periods,
        escalation_count,
        avg_scheduled_rent: round_display(scheduled_sum / months, RATE_DP),
        avg_effective_rent: round_display(effective_sum / months, RATE_DP),
    }
}

/// Suggested export file stem, e.g. `rent_analysis_10000sf_2024-03-01_0930`.
pub fn export_basename(rsf: SquareFeet, stamp: NaiveDateTime) -> String {
    let whole_sf = rsf.trunc().to_u64().unwrap_or_default();
    format!(
        "rent_analysis_{whole_sf}sf_{}",
        stamp.format("%Y-%m-%d_%H%M")
    )
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Round for display to exactly `dp` decimals, folding negative zero into zero.
pub fn round_display(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp(dp);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(dp);
    rounded
}

/// Fixed-point text with exactly `dp` decimals and no grouping.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    round_display(value, dp).to_string()
}

/// Fixed-point text with thousands separators, e.g. `1,592,741`.
pub fn format_grouped(value: Decimal, dp: u32) -> String {
    let text = format_fixed(value, dp);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
