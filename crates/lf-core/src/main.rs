//! levelfit - log level vs. duration regression
//!
//! The main entry point, handling:
//! - Argument parsing and per-run setting overrides
//! - Logging setup (human or JSONL on stderr)
//! - The analyze and check commands
//! - Config inspection (show, validate, schema)
//! - Mapping errors to stable exit codes

use clap::{Args, Parser, Subcommand};
use lf_common::{format_error_human, Error, OutputFormat, RunId, StructuredError, SCHEMA_VERSION};
use lf_core::config::{load_config, ConfigOptions, Settings, SettingsOverrides, UnknownLevelPolicy};
use lf_core::exit_codes::ExitCode;
use lf_core::log_event;
use lf_core::logging::{event_names, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage};
use lf_core::pipeline::{check_input, run_pipeline, PipelineOptions};
use lf_core::report::{render, render_check, AnalysisReport};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Input file used when none is given.
const DEFAULT_INPUT: &str = "logdata.csv";

/// Relate log severity to request duration with a grouped linear regression
#[derive(Parser)]
#[command(name = "levelfit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to levelfit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Unit suffix stripped from TimeTaken values
    #[arg(long, global = true)]
    suffix: Option<String>,

    /// Field delimiter of the input file
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// Confidence level for fitted-mean intervals
    #[arg(long, global = true)]
    confidence: Option<f64>,

    /// Significance threshold for both verdicts
    #[arg(long, global = true)]
    alpha: Option<f64>,

    /// What to do with log levels outside the ordinal table
    #[arg(long, global = true)]
    unknown_levels: Option<UnknownLevelPolicy>,

    /// Include the Service x LogLevel count table
    #[arg(long, global = true)]
    service_counts: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report (default)
    Analyze(InputArgs),

    /// Load and normalize the input without fitting
    Check(InputArgs),

    /// Inspect and validate configuration
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Delimited log file with Timestamp, Service, LogLevel and TimeTaken columns
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,
    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the resolved config)
        path: Option<PathBuf>,
    },
    /// Print the JSON schema for levelfit.toml
    Schema,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    // Machine-readable stdout gets machine-readable stderr.
    let log_format = if cli.global.format.is_structured() {
        LogFormat::Jsonl
    } else {
        LogFormat::Human
    };
    init_logging(&LogConfig::from_env(log_level, Some(log_format)));

    let exit_code = match cli.command {
        None => run_analyze(
            &cli.global,
            &InputArgs {
                input: PathBuf::from(DEFAULT_INPUT),
            },
        ),
        Some(Commands::Analyze(args)) => run_analyze(&cli.global, &args),
        Some(Commands::Check(args)) => run_check(&cli.global, &args),
        Some(Commands::Config(args)) => run_config(&cli.global, &args),
        Some(Commands::Version) => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn config_options(global: &GlobalOpts) -> ConfigOptions {
    ConfigOptions {
        config_path: global.config.clone(),
        overrides: SettingsOverrides {
            delimiter: global.delimiter.clone(),
            duration_suffix: global.suffix.clone(),
            confidence_level: global.confidence,
            significance_level: global.alpha,
            unknown_levels: global.unknown_levels,
            service_counts: global.service_counts.then_some(true),
        },
    }
}

fn run_analyze(global: &GlobalOpts, args: &InputArgs) -> ExitCode {
    let run_id = RunId::new();
    let input = args.input.display().to_string();
    let ctx = LogContext::new(run_id.to_string()).with_input(input.clone());
    log_event!(ctx, INFO, event_names::RUN_STARTED, Stage::Init, "analysis started");

    let result = (|| -> lf_common::Result<String> {
        let config = load_config(&config_options(global))?;
        log_config_source(&ctx, &config.snapshot().source, config.path.is_some());

        let options = PipelineOptions::from_settings(&config.settings)?;
        let analysis = run_pipeline(&args.input, &options, &ctx)?;
        let report = AnalysisReport::new(
            &run_id,
            input.clone(),
            config.snapshot(),
            analysis,
            config.settings.report.service_counts,
        );
        let rendered = render(&report, global.format)?;
        let format_name = global.format.to_string();
        log_event!(
            ctx,
            DEBUG,
            event_names::REPORT_RENDERED,
            Stage::Report,
            "report rendered",
            format = format_name.as_str()
        );
        Ok(rendered)
    })();

    match result {
        Ok(rendered) => {
            emit(&rendered);
            log_event!(ctx, INFO, event_names::RUN_FINISHED, Stage::Report, "analysis finished");
            ExitCode::Clean
        }
        Err(err) => fail(global, &ctx, &err),
    }
}

fn run_check(global: &GlobalOpts, args: &InputArgs) -> ExitCode {
    let run_id = RunId::new();
    let input = args.input.display().to_string();
    let ctx = LogContext::new(run_id.to_string()).with_input(input.clone());

    let result = (|| -> lf_common::Result<String> {
        let config = load_config(&config_options(global))?;
        let options = PipelineOptions::from_settings(&config.settings)?;
        let summary = check_input(&args.input, &options, &ctx)?;
        render_check(&input, &summary, global.format)
    })();

    match result {
        Ok(rendered) => {
            emit(&rendered);
            ExitCode::Clean
        }
        Err(err) => fail(global, &ctx, &err),
    }
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    let ctx = LogContext::new(RunId::new().to_string());
    let result = match &args.command {
        ConfigCommands::Show => config_show(global),
        ConfigCommands::Validate { path } => config_validate(global, path.as_ref()),
        ConfigCommands::Schema => serde_json::to_string_pretty(&Settings::json_schema())
            .map_err(Error::from),
    };
    match result {
        Ok(rendered) => {
            emit(&rendered);
            ExitCode::Clean
        }
        Err(err) => fail(global, &ctx, &err),
    }
}

/// Display the effective configuration (defaults when no file is found).
fn config_show(global: &GlobalOpts) -> lf_common::Result<String> {
    let config = load_config(&config_options(global))?;
    let snapshot = config.snapshot();

    match global.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "source": snapshot,
            "settings": config.settings,
        }))?),
        OutputFormat::Summary => Ok(format!(
            "source={} path={}",
            snapshot.source,
            snapshot.path.as_deref().unwrap_or("-")
        )),
        OutputFormat::Text | OutputFormat::Md => {
            let toml = config
                .settings
                .to_toml_string()
                .map_err(|e| Error::InvalidConfig(e.to_string()))?;
            let mut out = String::new();
            out.push_str(&format!("# source: {}\n", snapshot.source));
            if let Some(path) = &snapshot.path {
                out.push_str(&format!("# path: {}\n", path));
            }
            if let Some(hash) = &snapshot.sha256 {
                out.push_str(&format!("# sha256: {}\n", hash));
            }
            out.push_str(&toml);
            Ok(out)
        }
    }
}

fn config_validate(global: &GlobalOpts, path: Option<&PathBuf>) -> lf_common::Result<String> {
    let options = ConfigOptions {
        config_path: path.cloned().or_else(|| global.config.clone()),
        overrides: SettingsOverrides::default(),
    };
    let config = load_config(&options)?;
    let snapshot = config.snapshot();
    let target = snapshot.path.clone().unwrap_or_else(|| "built-in defaults".to_string());

    Ok(match global.format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "status": "valid",
            "source": snapshot,
        }))?,
        _ => format!("✓ {} is valid ({})", target, snapshot.source),
    })
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let info = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "levelfit_version": env!("CARGO_PKG_VERSION"),
                "rust_version": env!("CARGO_PKG_RUST_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&info).unwrap_or_default());
        }
        _ => {
            println!("levelfit {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

fn log_config_source(ctx: &LogContext, source: &str, from_file: bool) {
    if from_file {
        log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "configuration loaded",
            source = source
        );
    } else {
        log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "no configuration file found; using defaults"
        );
    }
}

/// Write a payload to stdout with exactly one trailing newline.
fn emit(payload: &str) {
    if payload.ends_with('\n') {
        print!("{}", payload);
    } else {
        println!("{}", payload);
    }
}

fn fail(global: &GlobalOpts, ctx: &LogContext, err: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(err);
    log_event!(
        ctx,
        ERROR,
        event_names::RUN_FAILED,
        Stage::Init,
        err.to_string(),
        code = err.code(),
        exit_code = exit_code.as_i32()
    );

    if global.format.is_structured() {
        let structured = StructuredError::from(err)
            .with_context("exit_code", exit_code.code_name())
            .with_context("input", ctx.input_label());
        eprintln!("{}", structured.to_json_pretty());
    } else {
        let use_color = !global.no_color && std::io::stderr().is_terminal();
        eprintln!("{}", format_error_human(err, use_color));
    }
    exit_code
}
