//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::linear_model_adapter::LinearForecastModel;
use crate::adapters::presentation;
use crate::domain::error::DashboardError;
use crate::domain::interaction::Dashboard;
use crate::domain::prepare::derive_indicators;
use crate::domain::store::StockStore;
use crate::logging;
use crate::settings::{DEFAULT_LOG_LEVEL, Settings};

#[derive(Parser, Debug)]
#[command(name = "stockcast", about = "Interactive stock analysis and forecast dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show record count and date span of the loaded data
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print actual and predicted close for one date
    Lookup {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Derive indicator columns from a raw OHLCV CSV
    Prepare {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Keep the leading rows whose indicators are still warming up
        #[arg(long)]
        keep_warmup: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM-DD, got {s:?}"))
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Serve { config } => {
            load_settings(config.as_deref()).and_then(|settings| run_serve(&settings))
        }
        Command::Info { config } => {
            load_settings(config.as_deref()).and_then(|settings| run_info(&settings))
        }
        Command::Lookup { config, date } => {
            load_settings(config.as_deref()).and_then(|settings| run_lookup(&settings, date))
        }
        Command::Prepare {
            input,
            output,
            keep_warmup,
        } => {
            logging::init(DEFAULT_LOG_LEVEL);
            run_prepare(&input, &output, keep_warmup)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::init(DEFAULT_LOG_LEVEL);
            tracing::error!(error = %e, "stockcast failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Reads the config file, when given, and installs logging at its level.
pub fn load_settings(config: Option<&Path>) -> Result<Settings, DashboardError> {
    let adapter = match config {
        Some(path) => FileConfigAdapter::from_file(path)?,
        None => FileConfigAdapter::empty(),
    };
    let settings = Settings::from_config_and_env(&adapter)?;
    logging::init(&settings.log_level);
    if let Some(path) = config {
        tracing::info!(path = %path.display(), "loaded config");
    }
    Ok(settings)
}

/// Loads the store and the model. Both are required before serving.
pub fn bootstrap(settings: &Settings) -> Result<(StockStore, LinearForecastModel), DashboardError> {
    let store = StockStore::load(&CsvAdapter::new(&settings.data_path))?;
    tracing::info!(
        path = %settings.data_path.display(),
        records = store.len(),
        first = %store.min_date(),
        last = %store.max_date(),
        "loaded stock data"
    );
    let model = LinearForecastModel::from_file(&settings.model_path)?;
    Ok((store, model))
}

fn run_serve(settings: &Settings) -> Result<(), DashboardError> {
    let (store, model) = bootstrap(settings)?;

    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::sync::Arc;

        let state = AppState {
            store: Arc::new(store),
            oracle: Arc::new(model),
            symbol: settings.symbol.clone(),
        };
        let router = build_router(state);
        let addr = settings.listen_addr();

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "dashboard listening");
            axum::serve(listener, router).await?;
            Ok::<(), DashboardError>(())
        })
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (store, model);
        Err(DashboardError::ConfigInvalid {
            section: "web".into(),
            key: "feature".into(),
            reason: "stockcast was built without the web feature".into(),
        })
    }
}

fn run_info(settings: &Settings) -> Result<(), DashboardError> {
    let store = StockStore::load(&CsvAdapter::new(&settings.data_path))?;
    println!("Source:  {}", settings.data_path.display());
    println!("Symbol:  {}", settings.symbol);
    println!("Records: {}", store.len());
    println!("Range:   {} to {}", store.min_date(), store.max_date());
    let complete = store.records().iter().filter(|r| r.is_complete()).count();
    println!("Complete rows: {complete}");
    Ok(())
}

fn run_lookup(settings: &Settings, date: NaiveDate) -> Result<(), DashboardError> {
    let (store, model) = bootstrap(settings)?;
    let dash = Dashboard::new(&store, &model);
    println!("{}", presentation::lookup_text(&dash.lookup(Some(date))));
    Ok(())
}

fn run_prepare(input: &Path, output: &Path, keep_warmup: bool) -> Result<(), DashboardError> {
    let raw = CsvAdapter::new(input).load_raw()?;
    let store = StockStore::new(&input.display().to_string(), raw)?;
    let prepared = derive_indicators(store.records(), keep_warmup);
    CsvAdapter::new(output).write_processed(&prepared)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        raw = store.len(),
        written = prepared.len(),
        "prepared indicator columns"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lookup_date() {
        let cli = Cli::try_parse_from(["stockcast", "lookup", "--date", "2024-01-02"]).unwrap();
        match cli.command {
            Command::Lookup { date, config } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_lookup_date() {
        assert!(Cli::try_parse_from(["stockcast", "lookup", "--date", "02/01/2024"]).is_err());
    }

    #[test]
    fn parses_prepare_flags() {
        let cli = Cli::try_parse_from([
            "stockcast",
            "prepare",
            "-i",
            "raw.csv",
            "-o",
            "out.csv",
            "--keep-warmup",
        ])
        .unwrap();
        match cli.command {
            Command::Prepare {
                input,
                output,
                keep_warmup,
            } => {
                assert_eq!(input, PathBuf::from("raw.csv"));
                assert_eq!(output, PathBuf::from("out.csv"));
                assert!(keep_warmup);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
