use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use delay_penalty::{
    Decimal, MONEY_SCALE, MoratoriumCalendar, PayerCategory, PenaltyEngine, PenaltyRequest, PenaltyResult,
    ReferenceData,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Payer {
    Individual,
    LegalEntity,
}

impl From<Payer> for PayerCategory {
    fn from(payer: Payer) -> Self {
        match payer {
            Payer::Individual => Self::Individual,
            Payer::LegalEntity => Self::LegalEntity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "delay-penalty", version, about = "Penalty for late handover of a flat under a shared-construction agreement")]
struct Cli {
    /// Reference tables (JSON) replacing the built-in key rates and moratoria
    #[arg(short = 'r', long = "reference", global = true)]
    reference: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute overdue days and the penalty
    Compute(ComputeArgs),
    /// Show the key rate in force on a handover date
    Rate {
        /// Handover date (DD.MM.YYYY)
        #[arg(long = "handover")]
        handover: String,
    },
    /// Print the reference tables in use as JSON
    Reference,
}

#[derive(Args, Debug)]
struct ComputeArgs {
    /// Price of the flat
    #[arg(long = "price")]
    price: String,

    /// Handover date under the agreement (DD.MM.YYYY)
    #[arg(long = "handover")]
    handover: String,

    /// Actual transfer date, or today if not yet transferred (DD.MM.YYYY)
    #[arg(long = "actual")]
    actual: String,

    /// Who is owed the penalty
    #[arg(long = "payer", value_enum, default_value = "individual")]
    payer: Payer,

    /// Leave moratorium periods out of the delay
    #[arg(long = "exclude-moratorium")]
    exclude_moratorium: bool,

    /// Print the result as JSON
    #[arg(long = "json")]
    json: bool,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_reference(path: Option<&PathBuf>) -> anyhow::Result<ReferenceData> {
    let Some(path) = path else {
        return Ok(ReferenceData::builtin());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data = ReferenceData::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!(
        path = %path.display(),
        key_rates = data.key_rates.len(),
        moratoria = data.moratoria.len(),
        "loaded reference tables"
    );
    Ok(data)
}

/// `1234567.8` -> `1 234 567.80`
fn format_amount(amount: Decimal) -> String {
    let text = format!("{:.*}", MONEY_SCALE as usize, amount);
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let (sign, digits) = whole.strip_prefix('-').map_or(("", whole), |d| ("-", d));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{fraction}")
}

fn write_result(out: &mut impl Write, result: &PenaltyResult) -> io::Result<()> {
    writeln!(out, "Overdue days: {}", result.overdue_days)?;
    if result.excluded_days > 0 {
        writeln!(out, "Moratorium days excluded: {}", result.excluded_days)?;
    }
    match result.applied_rate_percent {
        Some(rate) => writeln!(out, "Key rate: {rate}%")?,
        None => writeln!(out, "Key rate: not available for the handover date")?,
    }
    if let Some(amount) = result.penalty_amount {
        writeln!(out, "Penalty: {} RUB", format_amount(amount))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let reference = load_reference(cli.reference.as_ref())?;

    match cli.command {
        Command::Compute(args) => {
            let engine = PenaltyEngine::from_reference(reference)?;
            let request = PenaltyRequest {
                price:              args.price,
                handover_date:      args.handover,
                actual_date:        args.actual,
                payer:              args.payer.into(),
                exclude_moratorium: args.exclude_moratorium,
            };
            debug!(?request, "computing penalty");
            let result = engine.compute(&request)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                write_result(&mut io::stdout().lock(), &result)?;
            }
        },
        Command::Rate { handover } => {
            let (rates, _) = reference.into_parts()?;
            let engine = PenaltyEngine::new(&rates, MoratoriumCalendar::empty());
            match engine.rate_preview(&handover)? {
                Some(rate) => println!("{rate}%"),
                None => {
                    let earliest = rates
                        .earliest()
                        .map_or_else(|| "no rates loaded".to_owned(), |d| format!("table starts {d}"));
                    println!("not available ({earliest})");
                },
            }
        },
        Command::Reference => {
            println!("{}", reference.to_json_pretty()?);
        },
    }

    Ok(())
}
