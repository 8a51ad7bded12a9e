use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use synop::present::chart::{write_daily_chart, write_gdd_chart};
use synop::present::export::{save_daily, save_monthly, SavedArtifacts};
use synop::present::table::{daily_table, monthly_table, welcome_banner};
use synop::present::{ChartKind, ExportError, OutputLayout};
use synop::{parse_date, Synop, SynopConfig};
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "synop")]
#[command(about = "Historical SYNOP observations, daily readings and growing degree days", long_about = None)]
struct Cli {
    /// Configuration file, overrides $SYNOP_CONFIG and ./synop.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the synoptic readings of a station on one day
    Daily {
        /// Station name, e.g. ROUEN-BOOS. Prompted when missing.
        #[arg(long)]
        station: Option<String>,
        /// Date as YYYY-MM-DD. Prompted when missing.
        #[arg(long)]
        date: Option<String>,
        /// Do not write the chart
        #[arg(long)]
        no_chart: bool,
    },
    /// Aggregate a month per day and compute growing degree days
    Monthly {
        #[arg(long)]
        station: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// GDD base in °C, defaults to pipeline.base_temperature
        #[arg(long)]
        base_temperature: Option<f64>,
        #[arg(long)]
        no_chart: bool,
    },
    /// Run the web front end
    Serve {
        /// Address to listen on, defaults to server.bind
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = SynopConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    synop::logging::init(&config.logging).context("failed to initialise logging")?;

    let layout = OutputLayout::from(&config.output);
    match cli.command {
        Commands::Daily {
            station,
            date,
            no_chart,
        } => {
            let now = Local::now().naive_local();
            if station.is_none() || date.is_none() {
                println!("{}", welcome_banner(now));
            }
            let station = match station {
                Some(station) => station,
                None => prompt("\nEnter weather station name (e.g., ROUEN-BOOS): ")?,
            }
            .trim()
            .to_uppercase();
            let date = match date {
                Some(date) => date,
                None => prompt("Enter date (YYYY-MM-DD): ")?,
            };
            let date = parse_date(&date)?;

            let synop = Synop::new(&config)?;
            let report = synop.daily().station(&station).date(date).call().await;
            report.status().into_result()?;

            println!("{}", daily_table(&report, now));
            print_warning(report.warning());
            print_saved(&save_daily(&layout, &report)?);
            if !no_chart {
                let path = layout.chart_file(ChartKind::Daily);
                print_chart(write_daily_chart(&report, &path), &path);
            }
        }
        Commands::Monthly {
            station,
            year,
            month,
            base_temperature,
            no_chart,
        } => {
            let station = station.trim().to_uppercase();
            let synop = Synop::new(&config)?;
            let report = synop
                .monthly()
                .station(&station)
                .year(year)
                .month(month)
                .maybe_base_temperature(base_temperature)
                .call()
                .await?;
            report.status().into_result()?;

            println!("{}", monthly_table(&report));
            print_warning(report.warning());
            print_saved(&save_monthly(&layout, &report)?);
            if !no_chart {
                let path = layout.chart_file(ChartKind::MonthlyGdd);
                print_chart(write_gdd_chart(&report.station, &report.series, &path), &path);
            }
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let app = synop::web::build_app(Synop::new(&config)?, layout);
            let listener = TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {}", bind))?;
            info!("HTTP server listening on http://{}", listener.local_addr()?);
            axum::serve(listener, app).await.context("server error")?;
        }
    }
    Ok(())
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_saved(saved: &SavedArtifacts) {
    println!("Données enregistrées sous {}", saved.csv.display());
    println!("Données enregistrées sous {}", saved.json.display());
    if let Some(pdf) = &saved.pdf {
        println!("Rapport PDF enregistré sous {}", pdf.display());
    }
}

fn print_warning(warning: Option<&str>) {
    if let Some(warning) = warning {
        warn!("{}", warning);
        println!("{}", warning);
    }
}

fn print_chart(result: Result<(), ExportError>, path: &std::path::Path) {
    match result {
        Ok(()) => println!("Graphique enregistré sous {}", path.display()),
        Err(ExportError::ChartsDisabled) => warn!("Chart skipped, built without the `charts` feature"),
        Err(e) => warn!("Failed to write chart {:?}: {}", path, e),
    }
}
