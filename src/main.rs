// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod batching;
mod catalog;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

impl From<app_config::LogLevel> for LevelFilter {
    fn from(level: app_config::LogLevel) -> Self {
        match level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Options shared by every translation subcommand
#[derive(Args, Debug, Clone)]
struct SharedArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Source language code, or 'auto' for service-side detection
    #[arg(short, long)]
    source_language: Option<String>,

    /// Directory holding the extracted templates (.pot)
    #[arg(long)]
    pot_dir: Option<String>,

    /// Directory holding the per-locale catalogs
    #[arg(long)]
    locale_dir: Option<String>,

    /// Write changed catalogs back to disk
    #[arg(short, long)]
    auto_save: bool,

    /// Also write the compiled .mo next to each saved catalog
    #[arg(long)]
    compile: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a single catalog file
    File {
        /// Catalog file to translate
        #[arg(value_name = "CATALOG")]
        path: PathBuf,

        /// Target language code; defaults to the catalog's Language header
        #[arg(short, long)]
        target_language: Option<String>,

        #[command(flatten)]
        shared: SharedArgs,
    },

    /// Translate every catalog under the locale directory
    Locale {
        #[command(flatten)]
        shared: SharedArgs,
    },

    /// Translate every template under the pot directory into the target languages
    Pot {
        /// Target language codes, comma separated
        #[arg(short, long, value_delimiter = ',')]
        target_languages: Vec<String>,

        #[command(flatten)]
        shared: SharedArgs,
    },

    /// Generate shell completions for potranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// potranslate - batch translation for gettext catalogs
///
/// Translates PO catalogs and POT templates through the Google Cloud
/// Translation API, batching entries to stay inside the service's request
/// size limits and merging the results back into the files.
#[derive(Parser, Debug)]
#[command(name = "potranslate")]
#[command(version)]
#[command(about = "Batch translation for gettext catalogs")]
#[command(long_about = "potranslate collects the untranslated entries of gettext catalogs, submits
them to the Google Cloud Translation API in character-bounded batches, and
writes the translations back.

EXAMPLES:
    potranslate file messages.po                   # Target from the catalog's Language header
    potranslate file -t fr messages.po             # Explicit target language
    potranslate locale --locale-dir locale -a      # Translate a whole locale tree and save
    potranslate pot -t fr,es,de --auto-save        # Fill catalogs from templates
    potranslate completions bash > potranslate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. The API key comes from the config file or
    the GOOGLE_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "potranslate", &mut std::io::stdout());
            Ok(())
        }
        Commands::File { path, target_language, shared } => {
            let controller = build_controller(&shared)?;
            let outcome = controller.translate_file(&path, target_language.as_deref()).await?;
            if !outcome.updated {
                info!("Nothing to translate in {}", path.display());
            }
            Ok(())
        }
        Commands::Locale { shared } => {
            let controller = build_controller(&shared)?;
            let status = controller.translate_locale_tree().await?;
            if status.failed > 0 {
                return Err(anyhow!("{} catalog(s) failed to translate", status.failed));
            }
            Ok(())
        }
        Commands::Pot { target_languages, shared } => {
            let controller = build_controller(&shared)?;
            let targets = if target_languages.is_empty() {
                controller.config().target_languages.clone()
            } else {
                target_languages
            };
            let status = controller.translate_templates(&targets).await?;
            if status.failed > 0 {
                return Err(anyhow!("{} catalog(s) failed to translate", status.failed));
            }
            Ok(())
        }
    }
}

/// Load the config, apply CLI overrides, validate, and build the controller
fn build_controller(shared: &SharedArgs) -> Result<Controller> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &shared.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    let config_path = std::path::Path::new(&shared.config_path);
    let mut config = if config_path.exists() {
        Config::load_or_default(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", shared.config_path);
        let config = Config::default();
        std::fs::write(config_path, config.to_json()?)
            .context(format!("Failed to write default config to file: {}", shared.config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(source) = &shared.source_language {
        config.source_language = source.clone();
    }
    if let Some(pot_dir) = &shared.pot_dir {
        config.pot_dir = pot_dir.clone();
    }
    if let Some(locale_dir) = &shared.locale_dir {
        config.locale_dir = locale_dir.clone();
    }
    if shared.auto_save {
        config.auto_save = true;
    }
    if shared.compile {
        config.compile = true;
    }
    if let Some(level) = &shared.log_level {
        config.log_level = level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if shared.log_level.is_none() {
        log::set_max_level(config.log_level.clone().into());
    }

    Controller::with_config(config)
}
