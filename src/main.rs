// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use reelwright::app_config::{self, Config};
use reelwright::{Controller, ScriptRequest};

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate, render and archive a video (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Build the timeline for a voiced script and print it as JSON
    Assemble(AssembleArgs),

    /// Generate shell completions for reelwright
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every pipeline command
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_api_key: Option<String>,

    /// Fish Audio API key
    #[arg(long, env = "FISHAUDIO_API_KEY", hide_env_values = true, global = true)]
    fishaudio_api_key: Option<String>,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Character who explains the topic
    #[arg(value_name = "EXPLAINER")]
    explainer: String,

    /// Character who pushes back
    #[arg(value_name = "CONTRARIAN")]
    contrarian: String,

    /// What the video is about
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Target length in seconds
    #[arg(value_name = "SECONDS")]
    seconds: u32,
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Voiced script (as saved after speech synthesis)
    #[arg(value_name = "SCRIPT_JSON")]
    script: PathBuf,

    /// Background video to fit under the layers
    #[arg(short, long, value_name = "MP4")]
    background: PathBuf,
}

/// Reelwright - narrated dialogue shorts
///
/// Writes a two-character dialogue about a topic, voices it, and renders it
/// over a looping background with portraits and captions.
#[derive(Parser, Debug)]
#[command(name = "reelwright")]
#[command(version)]
#[command(about = "Narrated dialogue short-form video generator")]
#[command(long_about = "Reelwright writes a two-character dialogue about a topic, voices every line and renders a vertical video with portraits and captions.

EXAMPLES:
    reelwright Peter Stewie \"black holes\" 45          # Full pipeline
    reelwright generate Peter Stewie \"tides\" 30       # Same, explicit subcommand
    reelwright assemble final_script.json -b bg.mp4   # Print the timeline as JSON
    reelwright completions bash > reelwright.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. API keys are read from OPENAI_API_KEY and
    FISHAUDIO_API_KEY when not set in the config.")]
#[command(args_conflicts_with_subcommands = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    common: CommonArgs,

    /// Character who explains the topic
    #[arg(value_name = "EXPLAINER")]
    explainer: Option<String>,

    /// Character who pushes back
    #[arg(value_name = "CONTRARIAN")]
    contrarian: Option<String>,

    /// What the video is about
    #[arg(value_name = "TOPIC")]
    topic: Option<String>,

    /// Target length in seconds
    #[arg(value_name = "SECONDS")]
    seconds: Option<u32>,
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

    // @returns: ANSI colour for log level
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "reelwright", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(&cli.common, args).await,
        Some(Commands::Assemble(args)) => run_assemble(&cli.common, args).await,
        None => {
            // Default behavior: positional arguments run the full pipeline
            let (Some(explainer), Some(contrarian), Some(topic), Some(seconds)) =
                (cli.explainer, cli.contrarian, cli.topic, cli.seconds)
            else {
                return Err(anyhow!(
                    "EXPLAINER, CONTRARIAN, TOPIC and SECONDS are required when no subcommand is specified"
                ));
            };
            let args = GenerateArgs {
                explainer,
                contrarian,
                topic,
                seconds,
            };
            run_generate(&cli.common, args).await
        }
    }
}

/// Load the configuration and apply command line overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let (mut config, created) = Config::load_or_create(&options.config_path)?;
    if created {
        warn!(
            "Config file not found at '{}', created a default config.",
            options.config_path
        );
    }

    if let Some(key) = &options.openai_api_key {
        if config.script.api_key.is_empty() {
            config.script.api_key = key.clone();
        }
    }
    if let Some(key) = &options.fishaudio_api_key {
        if config.speech.api_key.is_empty() {
            config.speech.api_key = key.clone();
        }
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_generate(options: &CommonArgs, args: GenerateArgs) -> Result<()> {
    let config = load_config(options)?;
    config
        .validate_credentials()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let request = ScriptRequest::new(args.topic, args.seconds, args.explainer, args.contrarian);
    let summary = controller.run(request).await?;

    info!("Video: {:?}", summary.video_path);
    if let Some(quiz_path) = &summary.quiz_path {
        info!("Quiz: {:?}", quiz_path);
    }
    Ok(())
}

async fn run_assemble(options: &CommonArgs, args: AssembleArgs) -> Result<()> {
    let config = load_config(options)?;
    let controller = Controller::with_config(config)?;

    let timeline = controller
        .assemble_from_script(&args.script, &args.background)
        .await?;

    let json = serde_json::to_string_pretty(&timeline).context("Failed to serialize timeline")?;
    println!("{}", json);
    Ok(())
}
