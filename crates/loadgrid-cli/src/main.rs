//! loadgrid CLI - Portfolio Workload Aggregation
//!
//! Command-line interface for loading allocation sheets and printing the
//! heat map, timeline, utilization, conflict and capacity views.

mod config;
mod output;
mod render;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use loadgrid_core::sample::sample_portfolio;
use loadgrid_core::{calendar, DepartmentFilter, Phase, Portfolio, Settings, YearMonth};
use loadgrid_engine::{
    aggregate_par, average_monthly_demand, capacity_plan, department_budgets, detect_conflicts_with, heatmap,
    kpis, shift_records, timeline, utilization_grid, RecordFilter,
};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::output::{emit, ExitCode, OutputFormat};

/// Months at the start of the capacity plan that feed the average demand
const AVERAGE_WINDOW: usize = 3;

#[derive(Parser)]
#[command(name = "loadgrid")]
#[command(author, version, about = "Portfolio workload aggregation", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug) when RUST_LOG is unset
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: ./loadgrid.toml)
    #[arg(long, value_name = "FILE", global = true, env = "LOADGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Project metadata sheet (JSON rows: Project, Department, Total_MM)
    #[arg(long, value_name = "FILE", global = true)]
    meta: Option<PathBuf>,

    /// Allocations sheet (JSON rows: Project, Date, Phase, MM, Employees)
    #[arg(long, value_name = "FILE", global = true)]
    alloc: Option<PathBuf>,

    /// Single portfolio file with both sheets (.toml or .json)
    #[arg(long, value_name = "FILE", global = true, conflicts_with_all = ["meta", "alloc"])]
    portfolio: Option<PathBuf>,

    /// Use the built-in sample portfolio when no files are given
    #[arg(long, global = true)]
    sample: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the portfolio
    Check,

    /// Dominant phase per project and month
    Heatmap {
        #[arg(short, long)]
        department: Option<String>,
        /// First month (YYYY-MM)
        #[arg(long)]
        start: Option<YearMonth>,
        /// Number of months
        #[arg(long)]
        months: Option<usize>,
    },

    /// Yearly project timeline with assigned people
    Timeline {
        #[arg(short, long)]
        department: Option<String>,
        #[arg(long)]
        start: Option<YearMonth>,
    },

    /// Employees booked beyond a full-time month
    Conflicts,

    /// Per-employee utilization grid
    Utilization {
        #[arg(long)]
        start: Option<YearMonth>,
    },

    /// Portfolio demand against available capacity
    Capacity {
        #[arg(long)]
        start: Option<YearMonth>,
    },

    /// Headline counts and department budgets
    Summary {
        #[arg(short, long)]
        department: Option<String>,
        /// Focus month (YYYY-MM)
        #[arg(long)]
        month: Option<YearMonth>,
    },

    /// Move matching allocation rows by whole months
    Shift {
        /// Months to move (negative moves back)
        #[arg(long, allow_hyphen_values = true)]
        delta: i32,
        #[arg(long)]
        project: Option<String>,
        #[arg(long, value_parser = parse_phase)]
        phase: Option<Phase>,
        /// Only rows in this month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Where to write the shifted allocations (JSON rows)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print consecutive months
    Months {
        /// First month (YYYY-MM)
        start: String,
        count: usize,
    },

    /// Write the sample portfolio as meta.json and alloc.json
    Sample {
        /// Target directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_phase(text: &str) -> Result<Phase, String> {
    Phase::parse(text).ok_or_else(|| {
        let names: Vec<&str> = Phase::ALL.iter().map(Phase::as_str).collect();
        format!("unknown phase '{text}', expected one of: {}", names.join(", "))
    })
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = config::load_settings(cli.config.as_deref())?;
    let code = run(&cli, &settings)?;
    Ok(code.into())
}

/// Resolve the data source from the global flags
fn load(cli: &Cli, settings: &Settings) -> Result<Portfolio> {
    let portfolio = match (&cli.portfolio, &cli.meta, &cli.alloc) {
        (Some(path), _, _) => loadgrid_parser::load_portfolio_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        (None, Some(meta), Some(alloc)) => {
            loadgrid_parser::load_portfolio(meta, alloc).context("Failed to load portfolio sheets")?
        }
        (None, Some(_), None) => bail!("--meta needs --alloc"),
        (None, None, Some(_)) => bail!("--alloc needs --meta"),
        (None, None, None) if cli.sample => {
            tracing::info!("using sample portfolio");
            sample_portfolio(settings.start())
        }
        (None, None, None) => bail!("No data: pass --meta and --alloc, --portfolio, or --sample"),
    };

    let unknown = portfolio.unknown_projects();
    if !unknown.is_empty() {
        tracing::warn!("allocations reference unknown projects: {}", unknown.join(", "));
    }
    Ok(portfolio)
}

fn run(cli: &Cli, settings: &Settings) -> Result<ExitCode> {
    let format = cli.format;
    let workload = &settings.workload;
    let timeline_settings = &settings.timeline;
    let start_or_default = |start: Option<YearMonth>| start.unwrap_or_else(|| settings.start());

    match &cli.command {
        Commands::Check => {
            let portfolio = load(cli, settings)?;
            let text = render::check(&portfolio);
            let report = CheckReport {
                projects: portfolio.projects.len(),
                allocations: portfolio.allocations.len(),
                departments: portfolio.departments(),
                unknown_projects: portfolio.unknown_projects(),
                duplicate_projects: portfolio.duplicate_projects(),
            };
            emit(format, &report, || text)?;
            let errors = report.unknown_projects.len() + report.duplicate_projects.len();
            return Ok(ExitCode::from_error_count(errors));
        }
        Commands::Heatmap {
            department,
            start,
            months,
        } => {
            let portfolio = load(cli, settings)?;
            let filter = DepartmentFilter::from_option(department.as_deref());
            let months = start_or_default(*start).months(months.unwrap_or(timeline_settings.heatmap_months));
            let rows = heatmap(&portfolio, &filter, &months);
            emit(format, &rows, || render::heatmap(&rows, &months))?;
        }
        Commands::Timeline { department, start } => {
            let portfolio = load(cli, settings)?;
            let filter = DepartmentFilter::from_option(department.as_deref());
            let months = start_or_default(*start).months(timeline_settings.horizon_months);
            let rows = timeline(&portfolio, &filter, &months);
            emit(format, &rows, || render::timeline(&rows))?;
        }
        Commands::Conflicts => {
            let portfolio = load(cli, settings)?;
            let loads = aggregate_par(&portfolio.allocations);
            let conflicts = detect_conflicts_with(&loads, workload.full_time_effort);
            emit(format, &conflicts, || render::conflicts(&conflicts))?;
        }
        Commands::Utilization { start } => {
            let portfolio = load(cli, settings)?;
            let loads = aggregate_par(&portfolio.allocations);
            let months = start_or_default(*start).months(timeline_settings.horizon_months);
            let rows = utilization_grid(&loads, &months, workload.full_time_effort);
            emit(format, &rows, || render::utilization(&rows, &months))?;
        }
        Commands::Capacity { start } => {
            let portfolio = load(cli, settings)?;
            let months = start_or_default(*start).months(timeline_settings.capacity_months);
            let plan = capacity_plan(&portfolio.allocations, &months, workload.available_capacity);
            let window = &months[..months.len().min(AVERAGE_WINDOW)];
            let average = average_monthly_demand(&portfolio.allocations, window);
            let report = CapacityReport {
                months: plan,
                average_demand: average,
            };
            emit(format, &report, || render::capacity(&report.months, average))?;
        }
        Commands::Summary { department, month } => {
            let portfolio = load(cli, settings)?;
            let filter = DepartmentFilter::from_option(department.as_deref());
            let focus = start_or_default(*month);
            let report = SummaryReport {
                month: focus,
                kpis: kpis(&portfolio, &filter, focus),
                budgets: department_budgets(&portfolio, &filter),
            };
            emit(format, &report, || render::summary(&report.kpis, focus, &report.budgets))?;
        }
        Commands::Shift {
            delta,
            project,
            phase,
            month,
            output,
        } => {
            let mut portfolio = load(cli, settings)?;
            let filter = RecordFilter {
                project: project.clone(),
                phase: *phase,
                month: month.clone(),
            };
            let report = shift_records(&mut portfolio.allocations, &filter, *delta);
            loadgrid_parser::save_json(output, &portfolio.allocations)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            emit(format, &report, || {
                let mut text = format!("Shifted {} rows by {delta} month(s)", report.shifted);
                if !report.skipped.is_empty() {
                    text.push_str(&format!(", skipped {}: {}", report.skipped.len(), report.skipped.join(", ")));
                }
                text + &format!("\nWrote {}\n", output.display())
            })?;
        }
        Commands::Months { start, count } => {
            let months = calendar::sequence(start, *count)?;
            emit(format, &months, || {
                months.iter().map(|m| format!("{m}\n")).collect()
            })?;
        }
        Commands::Sample { output } => write_sample(output, settings.start())?,
    }
    Ok(ExitCode::Success)
}

fn write_sample(dir: &Path, start: YearMonth) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let portfolio = sample_portfolio(start);
    loadgrid_parser::save_json(&dir.join("meta.json"), &portfolio.projects)?;
    loadgrid_parser::save_json(&dir.join("alloc.json"), &portfolio.allocations)?;
    println!(
        "Wrote {} projects and {} allocation rows to {}",
        portfolio.projects.len(),
        portfolio.allocations.len(),
        dir.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct CheckReport<'a> {
    projects: usize,
    allocations: usize,
    departments: Vec<&'a str>,
    unknown_projects: Vec<&'a str>,
    duplicate_projects: Vec<&'a str>,
}

#[derive(Serialize)]
struct CapacityReport {
    months: Vec<loadgrid_engine::MonthCapacity>,
    average_demand: Option<f64>,
}

#[derive(Serialize)]
struct SummaryReport {
    month: YearMonth,
    kpis: loadgrid_engine::Kpis,
    budgets: Vec<(String, f64)>,
}
