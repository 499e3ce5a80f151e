use std::fs::File;
use std::path::PathBuf;

use chrono::Local;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use effective_rent_core::effective_rent::calculator::{
    self, EffectiveRentInput, EffectiveRentOutput, FreeRentTreatment, Perspective,
    TiAmortization,
};
use effective_rent_core::effective_rent::report;
use effective_rent_core::ComputationOutput;

use crate::input;
use crate::output::{csv_out, xlsx};

/// TI amortization method flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TiMethodArg {
    StraightLine,
    Discounted,
}

/// Perspective flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PerspectiveArg {
    Tenant,
    Landlord,
}

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Lease parameters shared by every effective rent command
#[derive(Args, Debug)]
pub struct LeaseArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Rentable square feet
    #[arg(long, default_value = "10000")]
    pub rsf: Decimal,

    /// Month-one rent ($/SF/mo)
    #[arg(long, default_value = "2.50")]
    pub start_rent: Decimal,

    /// Lease term in months
    #[arg(long, default_value_t = 60)]
    pub term_months: u32,

    /// Annual escalation (e.g. 0.03 for 3%)
    #[arg(long, default_value = "0.03")]
    pub annual_escalation: Decimal,

    /// Months of free rent
    #[arg(long, default_value_t = 3)]
    pub free_rent_months: u32,

    /// Credit the value of the free months evenly across the term
    #[arg(long)]
    pub spread_free_rent: bool,

    /// TI allowance ($/SF)
    #[arg(long, default_value = "25")]
    pub ti_allowance: Decimal,

    /// TI amortization method
    #[arg(long, value_enum, default_value = "straight-line")]
    pub ti_method: TiMethodArg,

    /// Annual discount rate for discounted TI (e.g. 0.07 for 7%)
    #[arg(long, default_value = "0.07")]
    pub discount_rate: Decimal,

    /// Tenant treats TI as a credit, landlord as a cost
    #[arg(long, value_enum, default_value = "tenant")]
    pub perspective: PerspectiveArg,
}

impl LeaseArgs {
    /// Build calculator input from the individual flags.
    pub fn to_input(&self) -> EffectiveRentInput {
        EffectiveRentInput {
            rentable_square_feet: self.rsf,
            starting_rent: self.start_rent,
            term_months: self.term_months,
            annual_escalation: self.annual_escalation,
            free_rent_months: self.free_rent_months,
            free_rent_treatment: if self.spread_free_rent {
                FreeRentTreatment::SpreadEvenly
            } else {
                FreeRentTreatment::FrontLoaded
            },
            ti_allowance_per_sf: self.ti_allowance,
            ti_amortization: match self.ti_method {
                TiMethodArg::StraightLine => TiAmortization::StraightLine,
                TiMethodArg::Discounted => TiAmortization::Discounted {
                    discount_rate: self.discount_rate,
                },
            },
            perspective: match self.perspective {
                PerspectiveArg::Tenant => Perspective::Tenant,
                PerspectiveArg::Landlord => Perspective::Landlord,
            },
        }
    }
}

/// Arguments for the effective rent calculation
#[derive(Args, Debug)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub lease: LeaseArgs,
}

/// Arguments for exporting the rent analysis to a file
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// File format to write
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Directory to write the export into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub lease: LeaseArgs,
}

pub fn run_calculate(
    args: CalculateArgs,
) -> Result<ComputationOutput<EffectiveRentOutput>, Box<dyn std::error::Error>> {
    calculate(&args.lease)
}

pub fn run_export(args: ExportArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let output = calculate(&args.lease)?;

    let stem = report::export_basename(
        output.result.rentable_square_feet,
        Local::now().naive_local(),
    );
    let path = args
        .out_dir
        .join(format!("{stem}.{}", args.format.extension()));

    match args.format {
        ExportFormat::Csv => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
            csv_out::write_schedule(file, &report::schedule_rows(&output.result))?;
        }
        ExportFormat::Xlsx => xlsx::save_workbook(&path, &output.result)?,
    }

    info!(path = %path.display(), "export written");
    Ok(path)
}

fn calculate(
    lease: &LeaseArgs,
) -> Result<ComputationOutput<EffectiveRentOutput>, Box<dyn std::error::Error>> {
    let input = resolve_input(lease)?;
    let output = calculator::calculate_effective_rent(&input)?;

    debug!(
        ner_monthly = %output.result.summary.net_effective_rent_monthly,
        elapsed_us = output.metadata.computation_time_us,
        "effective rent calculated"
    );
    for w in &output.warnings {
        warn!("{}", w);
    }

    Ok(output)
}

fn resolve_input(lease: &LeaseArgs) -> Result<EffectiveRentInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = lease.input {
        debug!(path = %path, "reading lease parameters from file");
        input::file::read_input(path)
    } else if let Some(parsed) = input::stdin::read_stdin()? {
        debug!("reading lease parameters from stdin");
        Ok(parsed)
    } else {
        debug!("using lease parameters from flags");
        Ok(lease.to_input())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        lease: LeaseArgs,
    }

    fn parse(args: &[&str]) -> LeaseArgs {
        let argv = std::iter::once("ner").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().lease
    }

    /// Default flags: the standard 10,000 SF scenario with $30 TI
    pub(crate) fn sample_output() -> ComputationOutput<EffectiveRentOutput> {
        let input = parse(&["--ti-allowance", "30"]).to_input();
        calculator::calculate_effective_rent(&input).unwrap()
    }

    #[test]
    fn test_flag_defaults() {
        let input = parse(&[]).to_input();
        assert_eq!(input.rentable_square_feet, dec!(10000));
        assert_eq!(input.starting_rent, dec!(2.50));
        assert_eq!(input.term_months, 60);
        assert_eq!(input.annual_escalation, dec!(0.03));
        assert_eq!(input.free_rent_months, 3);
        assert_eq!(input.free_rent_treatment, FreeRentTreatment::FrontLoaded);
        assert_eq!(input.ti_allowance_per_sf, dec!(25));
        assert_eq!(input.ti_amortization, TiAmortization::StraightLine);
        assert_eq!(input.perspective, Perspective::Tenant);
    }

    #[test]
    fn test_discount_rate_only_used_when_discounted() {
        let straight = parse(&["--discount-rate", "0.09"]).to_input();
        assert_eq!(straight.ti_amortization, TiAmortization::StraightLine);

        let discounted =
            parse(&["--ti-method", "discounted", "--discount-rate", "0.09"]).to_input();
        assert_eq!(
            discounted.ti_amortization,
            TiAmortization::Discounted {
                discount_rate: dec!(0.09)
            }
        );
    }

    #[test]
    fn test_spread_and_landlord_flags() {
        let input = parse(&["--spread-free-rent", "--perspective", "landlord"]).to_input();
        assert_eq!(input.free_rent_treatment, FreeRentTreatment::SpreadEvenly);
        assert_eq!(input.perspective, Perspective::Landlord);
    }

    #[test]
    fn test_rejects_non_numeric_rsf() {
        let argv = ["ner", "--rsf", "lots"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_sample_output_is_scenario_a() {
        let out = sample_output();
        assert_eq!(out.result.summary.net_effective_rent_monthly, dec!(2.029567905));
    }

    #[test]
    fn test_export_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    }
}
