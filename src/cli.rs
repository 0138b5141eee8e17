use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::core::{
    FormState, Headline, InputIssue, Projection, Summary, YearlyRow, dividend_yield_percent,
    write_csv,
};
use crate::error::{AppError, Result};
use crate::persistence::{JsonFileStore, StatePersistence};

#[derive(Parser, Debug)]
#[command(
    name = "smartinvest",
    version,
    about = "Monthly compounding projections for growth and dividend stocks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the web calculator and its JSON/CSV API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one projection, print it and optionally export the yearly CSV
    Project(ProjectArgs),
    /// Dividend yield in percent from the dividend per share and share price
    DividendYield {
        #[arg(long)]
        dividend_per_share: f64,
        #[arg(long)]
        share_price: f64,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliStockType {
    Growth,
    Dividend,
}

impl CliStockType {
    fn as_form_value(self) -> &'static str {
        match self {
            CliStockType::Growth => "growth",
            CliStockType::Dividend => "dividend",
        }
    }
}

/// Unset flags fall back to the last saved inputs, then to built-in defaults.
/// Numbers are read like form fields: malformed values count as 0.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    #[arg(long, value_enum)]
    pub stock_type: Option<CliStockType>,
    #[arg(long, value_name = "AMOUNT")]
    pub initial: Option<String>,
    #[arg(long, value_name = "AMOUNT")]
    pub monthly: Option<String>,
    #[arg(long, help = "Investment horizon in whole years (minimum 1)")]
    pub years: Option<String>,
    #[arg(long, value_name = "PERCENT", help = "Expected annual return for growth stocks")]
    pub rate: Option<String>,
    #[arg(long, value_name = "PRICE")]
    pub share_price: Option<String>,
    #[arg(long, value_name = "PERCENT", help = "Annual share price growth for dividend stocks")]
    pub price_growth: Option<String>,
    #[arg(long, value_name = "PERCENT", help = "Annual dividend yield for dividend stocks")]
    pub dividend_yield: Option<String>,
    #[arg(long, help = "Reinvest dividends (true/false)")]
    pub reinvest: Option<bool>,
    #[arg(long, help = "ISO 4217 currency code, e.g. SAR or USD")]
    pub currency: Option<String>,
    #[arg(long, value_name = "PATH", help = "Write the yearly summary CSV to PATH")]
    pub csv: Option<PathBuf>,
    #[arg(long, help = "Print the projection as JSON")]
    pub json: bool,
    #[arg(long, help = "Do not remember these inputs for the next run")]
    pub no_save: bool,
    #[arg(
        long,
        env = "SMARTINVEST_STATE_FILE",
        default_value = "smartinvest-state.json"
    )]
    pub state_file: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectReport<'a> {
    currency: &'a str,
    issues: &'a [InputIssue],
    summary: &'a Summary,
    headline: &'a Headline,
    yearly_rows: &'a [YearlyRow],
}

pub fn apply_args(form: &mut FormState, args: &ProjectArgs) {
    if let Some(v) = args.stock_type {
        form.stock_type = v.as_form_value().to_string();
    }
    for (slot, value) in [
        (&mut form.initial, &args.initial),
        (&mut form.monthly, &args.monthly),
        (&mut form.years, &args.years),
        (&mut form.rate, &args.rate),
        (&mut form.share_price, &args.share_price),
        (&mut form.rate_growth, &args.price_growth),
        (&mut form.div_yield, &args.dividend_yield),
        (&mut form.currency, &args.currency),
    ] {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }
    if let Some(v) = args.reinvest {
        form.reinvest = v;
    }
}

pub fn run_project(args: &ProjectArgs) -> Result<()> {
    let persistence = StatePersistence::new(JsonFileStore::new(&args.state_file));
    let mut form = FormState::default();
    if let Some(stored) = persistence.load() {
        tracing::debug!(path = %args.state_file.display(), "loaded saved inputs");
        form.apply_stored(stored);
    }
    apply_args(&mut form, args);

    let projection = Projection::from_form(&form);
    for issue in &projection.input.issues {
        tracing::warn!(
            field = issue.field,
            problem = ?issue.problem,
            raw = %issue.raw,
            "input coerced"
        );
    }

    if args.json {
        let report = ProjectReport {
            currency: &projection.input.currency,
            issues: &projection.input.issues,
            summary: &projection.summary,
            headline: &projection.headline,
            yearly_rows: &projection.rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_projection(&projection);
    }

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        write_csv(&projection.rows, &projection.input.params.model, BufWriter::new(file))?;
        tracing::info!(path = %path.display(), rows = projection.rows.len(), "wrote yearly summary");
    }

    if !args.no_save {
        persistence.save(&form);
    }
    Ok(())
}

pub fn run_dividend_yield(dividend_per_share: f64, share_price: f64) -> Result<()> {
    let yield_percent = dividend_yield_percent(dividend_per_share, share_price)
        .ok_or_else(|| AppError::InvalidInput("enter the share price first".to_string()))?;
    println!("Dividend yield = {yield_percent:.2}%");
    Ok(())
}

fn print_projection(projection: &Projection) {
    let is_dividend = projection.input.params.model.is_dividend();
    let currency = &projection.currency;

    println!("{}", projection.summary.narrative);
    println!();
    println!("Final balance:       {}", projection.headline.final_balance);
    println!("Total contributions: {}", projection.headline.total_contributions);
    println!("Total dividends:     {}", projection.headline.total_dividends);
    println!();
    println!(
        "{:>4} {:>20} {:>20} {:>20}",
        "Year", "Contributions", "Dividends", "Year-end balance"
    );
    println!("{}", "-".repeat(67));
    for row in &projection.rows {
        let dividends = if is_dividend {
            currency.format(row.cumulative_dividends)
        } else {
            "-".to_string()
        };
        println!(
            "{:>4} {:>20} {:>20} {:>20}",
            row.year,
            currency.format(row.cumulative_contributions),
            dividends,
            currency.format(row.year_end_balance)
        );
    }
}
