//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for LabTrack using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use tokio::sync::watch;

/// LabTrack - laboratory sample lifecycle tool
#[derive(Parser, Debug)]
#[command(name = "labtrack")]
#[command(version, about, long_about = None)]
#[command(author = "LabTrack Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "labtrack.toml", env = "LABTRACK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LABTRACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateConfigArgs),

    /// Register a new sample for a patient
    Register(commands::lifecycle::RegisterArgs),

    /// Record the analysis result of a sample
    AddResult(commands::lifecycle::AddResultArgs),

    /// Validate a recorded result
    Validate(commands::lifecycle::ValidateResultArgs),

    /// Tell the patient their validated result is ready
    Notify(commands::lifecycle::NotifyArgs),

    /// Reject a sample
    Reject(commands::lifecycle::RejectArgs),

    /// Show one sample by id or code
    Show(commands::lookup::ShowArgs),

    /// List the samples of a patient
    Patient(commands::lookup::PatientArgs),

    /// List results awaiting validation
    Pending(commands::lookup::PendingArgs),

    /// Render the report of a sample
    Report(commands::lookup::ReportArgs),

    /// Run one sample through the whole lifecycle
    Demo(commands::demo::DemoArgs),
}

impl Cli {
    /// Run the selected command and return the process exit code
    pub async fn execute(&self, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
        let config = self.config.as_str();
        match &self.command {
            Commands::Init(args) => args.execute().await,
            Commands::ValidateConfig(args) => args.execute(config).await,
            Commands::Register(args) => args.execute(config, shutdown_signal).await,
            Commands::AddResult(args) => args.execute(config, shutdown_signal).await,
            Commands::Validate(args) => args.execute(config, shutdown_signal).await,
            Commands::Notify(args) => args.execute(config, shutdown_signal).await,
            Commands::Reject(args) => args.execute(config, shutdown_signal).await,
            Commands::Show(args) => args.execute(config).await,
            Commands::Patient(args) => args.execute(config).await,
            Commands::Pending(args) => args.execute(config).await,
            Commands::Report(args) => args.execute(config).await,
            Commands::Demo(args) => args.execute(config, shutdown_signal).await,
        }
    }
}
