//! # jobtrends-cli
//!
//! Command-line interface for the job-posting dashboards: inspect the
//! company leaderboard, county tables and the monthly series, and run the
//! forecast pipeline against a CSV export.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use dataset::company::{leaderboard, melt_both, melt_single, PostingMetric};
use dataset::series::{count_pairs, filter_range};
use dataset::{load_companies, load_locations, load_series, location};
use geocode::{resolve_all, Nominatim};
use sarima::{export, forecast_monthly, ForecastConfig};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "jobtrends")]
#[command(about = "Job posting dashboard CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank companies by posting counts
    Companies {
        /// Companies CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Preamble rows above the header
        #[arg(long, default_value = "2")]
        skip_rows: usize,

        /// Metric: total, unique or both
        #[arg(short, long, default_value = "both")]
        metric: String,

        /// How many companies to rank
        #[arg(short, long, default_value = "5")]
        top: usize,

        /// Output file for the JSON rows (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show county statistics, optionally geocoded
    Locations {
        /// Locations CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Preamble rows above the header
        #[arg(long, default_value = "0")]
        skip_rows: usize,

        /// State code to filter by; omit to list available states
        #[arg(short, long)]
        state: Option<String>,

        /// Resolve county coordinates via the lookup service
        #[arg(long)]
        geocode: bool,

        /// Pause between lookup requests in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },

    /// Print the monthly posting series
    Series {
        /// Series CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Preamble rows above the header
        #[arg(long, default_value = "2")]
        skip_rows: usize,

        /// First month to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last month to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Forecast future monthly posting counts
    Forecast {
        /// Series CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Preamble rows above the header
        #[arg(long, default_value = "2")]
        skip_rows: usize,

        /// Months ahead to forecast
        #[arg(long, default_value = "12")]
        horizon: usize,

        /// Seasonal differencing order
        #[arg(long, default_value = "1")]
        seasonal_d: usize,

        /// Season length in months
        #[arg(long, default_value = "12")]
        period: usize,

        /// First month of the training window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last month of the training window (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Write the forecast CSV here (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Directory holding the three CSV exports
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn open(path: &PathBuf) -> CliResult<File> {
    File::open(path).map_err(|e| format!("Failed to open {:?}: {}", path, e))
}

/// Run the companies leaderboard command
fn run_companies(
    input: PathBuf,
    skip_rows: usize,
    metric: String,
    top: usize,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let records = load_companies(open(&input)?, skip_rows).map_err(|e| e.to_string())?;
    println!(
        "Loaded {} companies from {:?}",
        records.len(),
        input.file_name().unwrap_or_default()
    );

    let rows = match metric.to_lowercase().as_str() {
        "both" => melt_both(&leaderboard(&records, PostingMetric::Total, top)),
        other => {
            let parsed: PostingMetric = other.parse()?;
            melt_single(&leaderboard(&records, parsed, top), parsed)
        }
    };

    println!("Top {} companies ({}):", top, metric);
    for row in &rows {
        println!(
            "  {:<30} {:>8}  [{}]  {}",
            row.company, row.postings, row.posting_type, row.ratio_label
        );
    }

    if let Some(path) = output {
        let mut file =
            File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, &rows)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Rows written to {:?}", path);
    }

    Ok(())
}

/// Run the locations command
fn run_locations(
    input: PathBuf,
    skip_rows: usize,
    state: Option<String>,
    geocode: bool,
    delay_ms: u64,
) -> CliResult<()> {
    let records = load_locations(open(&input)?, skip_rows).map_err(|e| e.to_string())?;
    println!(
        "Loaded {} counties from {:?}",
        records.len(),
        input.file_name().unwrap_or_default()
    );

    let Some(state) = state else {
        println!("Available states:");
        for code in location::states(&records) {
            println!("  {}", code);
        }
        return Ok(());
    };

    let counties = location::filter_state(&records, &state);
    if counties.is_empty() {
        return Err(format!("No counties found for state '{}'", state));
    }

    println!("{} counties in {}:", counties.len(), state.to_uppercase());
    for record in &counties {
        println!(
            "  {:<35} ${:>10.0}  {:>6} postings  {:>3} days",
            record.county, record.median_salary, record.unique_postings, record.median_duration_days
        );
    }

    if let Some((highest, lowest)) = location::salary_extremes(&counties) {
        println!("Highest median salary: {} (${:.0})", highest.county, highest.median_salary);
        println!("Lowest median salary:  {} (${:.0})", lowest.county, lowest.median_salary);
    }

    if geocode {
        let resolver = Nominatim::new().map_err(|e| e.to_string())?;
        let names: Vec<String> = counties.iter().map(|r| r.county.clone()).collect();
        let outcome = resolve_all(&resolver, &names, Duration::from_millis(delay_ms));
        println!("\nResolved {} of {} counties:", outcome.located.len(), names.len());
        for place in &outcome.located {
            println!(
                "  {:<35} {:>9.4}, {:>9.4}",
                place.place, place.coordinates.latitude, place.coordinates.longitude
            );
        }
        for missing in &outcome.missing {
            println!("  {:<35} (not found)", missing);
        }
    }

    Ok(())
}

/// Run the series command
fn run_series(
    input: PathBuf,
    skip_rows: usize,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> CliResult<()> {
    let points = load_series(open(&input)?, skip_rows).map_err(|e| e.to_string())?;
    let window = filter_range(&points, start, end);
    println!(
        "{} of {} months in range:",
        window.len(),
        points.len()
    );
    for point in &window {
        println!(
            "  {}  {:>8} postings  intensity {:.2}",
            point.month.format("%Y-%m"),
            point.unique_postings,
            point.posting_intensity
        );
    }
    Ok(())
}

/// Run the forecast command
#[allow(clippy::too_many_arguments)]
fn run_forecast(
    input: PathBuf,
    skip_rows: usize,
    horizon: usize,
    seasonal_d: usize,
    period: usize,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let points = load_series(open(&input)?, skip_rows).map_err(|e| e.to_string())?;
    let window = filter_range(&points, start, end);
    println!(
        "Loaded {} months from {:?}",
        window.len(),
        input.file_name().unwrap_or_default()
    );

    let config = ForecastConfig {
        horizon,
        seasonal_d,
        period,
        ..ForecastConfig::default()
    };
    let report =
        forecast_monthly(&count_pairs(&window), &config).map_err(|e| e.to_string())?;

    println!(
        "Selected SARIMA{}{} by AIC ({:.2})",
        report.order, report.seasonal, report.aic
    );
    println!("Forecast {} months:", horizon);
    for point in &report.points {
        println!("  {}: {:.2}", point.month.format("%Y-%m"), point.value);
    }

    if let Some(path) = output {
        let file =
            File::create(&path).map_err(|e| format!("Failed to create output: {}", e))?;
        export::write_csv(&report.points, file).map_err(|e| e.to_string())?;
        println!("Forecast written to {:?}", path);
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Companies {
            input,
            skip_rows,
            metric,
            top,
            output,
        } => run_companies(input, skip_rows, metric, top, output),

        Commands::Locations {
            input,
            skip_rows,
            state,
            geocode,
            delay_ms,
        } => run_locations(input, skip_rows, state, geocode, delay_ms),

        Commands::Series {
            input,
            skip_rows,
            start,
            end,
        } => run_series(input, skip_rows, start, end),

        Commands::Forecast {
            input,
            skip_rows,
            horizon,
            seasonal_d,
            period,
            start,
            end,
            output,
        } => run_forecast(
            input, skip_rows, horizon, seasonal_d, period, start, end, output,
        ),

        Commands::Serve {
            port,
            host,
            data_dir,
        } => {
            println!(
                "Starting server on {}:{} with data from {:?}",
                host, port, data_dir
            );
            println!(
                "Use the jobtrends-server binary (HOST={} PORT={} DATA_DIR={:?})",
                host, port, data_dir
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
