use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use storebooks::models::flexible_date;
use storebooks::{
    calculate_gl_balances, calculate_inventory_status, calculate_payroll_metrics,
    calculate_sales_metrics, generate_balance_sheet, generate_income_statement, load_csv_batch,
    Collection, DashboardMetrics, DataQualityEngine, EngineConfig, Snapshot, SnapshotError,
};

#[derive(Parser)]
#[command(name = "storebooks", version, about = "Costing and accounting reports from a data snapshot")]
struct Cli {
    /// Snapshot JSON file (collections keyed by name, optional "asOf")
    snapshot: PathBuf,

    /// Engine config JSON (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the snapshot's as-of date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Replace a collection from CSV, e.g. `--csv salesLog=sales.csv` (repeatable)
    #[arg(long = "csv", value_parser = parse_csv_source)]
    csv: Vec<(Collection, PathBuf)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// All KPIs: sales, payroll, expenses, inventory, GL balances
    Dashboard,
    /// Revenue, COGS and profit by category
    Sales,
    /// Hours, cost and leave per employee
    Payroll,
    /// Stock levels and low-stock alerts
    Inventory,
    /// Signed balance per GL account
    Ledger,
    /// Income statement for an inclusive date range
    Income {
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
    },
    /// Point-in-time balance sheet
    BalanceSheet,
    /// Data-quality checks (exit code 1 on critical issues)
    Check,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    flexible_date::parse(s).ok_or_else(|| format!("invalid date '{}'", s))
}

fn parse_csv_source(s: &str) -> Result<(Collection, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <collection>=<path>, got '{}'", s))?;
    let collection: Collection = name.parse().map_err(|e: SnapshotError| e.to_string())?;
    Ok((collection, PathBuf::from(path)))
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storebooks=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut snapshot = Snapshot::load(&cli.snapshot)
        .with_context(|| format!("Failed to load snapshot {:?}", cli.snapshot))?;
    if let Some(as_of) = cli.as_of {
        snapshot.as_of = as_of;
    }
    for (collection, path) in &cli.csv {
        snapshot.apply(load_csv_batch(*collection, path)?);
        eprintln!("📥 {} loaded from {:?}", collection, path);
    }

    match cli.command {
        Command::Dashboard => {
            let metrics = DashboardMetrics::compute(&snapshot, &config);
            eprintln!("📊 {}", metrics.summary());
            print_json(&metrics)?;
        }
        Command::Sales => print_json(&calculate_sales_metrics(
            &snapshot.products,
            &snapshot.inventory_log,
            &snapshot.sales_log,
        ))?,
        Command::Payroll => print_json(&calculate_payroll_metrics(
            &snapshot.employees,
            &snapshot.payroll_log,
            &snapshot.leave_requests,
            &config,
        ))?,
        Command::Inventory => print_json(&calculate_inventory_status(
            &snapshot.products,
            &snapshot.inventory_log,
            &snapshot.sales_log,
            &config,
        ))?,
        Command::Ledger => print_json(&calculate_gl_balances(&snapshot.general_ledger))?,
        Command::Income { start, end } => {
            print_json(&generate_income_statement(&snapshot, start, end, &config))?
        }
        Command::BalanceSheet => {
            let sheet = generate_balance_sheet(&snapshot, &config);
            if !sheet.is_balanced(config.balance_tolerance) {
                eprintln!(
                    "⚠️  Balance check {:.2}: the equity plug uses operational net profit, not the GL",
                    sheet.check
                );
            }
            print_json(&sheet)?;
        }
        Command::Check => {
            let report = DataQualityEngine::new().validate(&snapshot);
            eprintln!("🔍 {}", report.summary());
            print_json(&report)?;
            if report.has_critical_issues() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
