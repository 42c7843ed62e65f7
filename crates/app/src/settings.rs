//! Settings for the console. Values are read, in increasing priority, from
//! the TOML file (`config/library.toml` unless `--config` says otherwise),
//! the `LIBRARY_DESK_*` environment and the command line.
use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/library.toml";
const ENV_PREFIX: &str = "LIBRARY_DESK";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_url: String,
    pub log_level: String,
    pub loan_days: u32,
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./library.db?mode=rwc".to_string(),
            log_level: "warn".to_string(),
            loan_days: engine::DEFAULT_LOAN_DAYS,
            max_attempts: 5,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "library_desk", about = "Library front desk console")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the database connection string.
    #[arg(long)]
    database_url: Option<String>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the loan period in days.
    #[arg(long)]
    loan_days: Option<u32>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::resolve(Args::parse())
    }

    pub fn resolve(args: Args) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        if let Some(database_url) = args.database_url {
            settings.database_url = database_url;
        }
        if let Some(log_level) = args.log_level {
            settings.log_level = log_level;
        }
        if let Some(loan_days) = args.loan_days {
            settings.loan_days = loan_days;
        }
        settings.max_attempts = settings.max_attempts.max(1);

        Ok(settings)
    }

    /// Filter directive for the tracing subscriber.
    pub fn env_filter(&self) -> String {
        format!(
            "library_desk={level},engine={level}",
            level = self.log_level
        )
    }
}
