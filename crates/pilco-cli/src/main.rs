//! pilco-cost - expected-cost evaluation from the command line
//!
//! Loads a squared-exponential cost from a config file and evaluates it under
//! Gaussian beliefs read from JSON, printing one result per belief.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use pilco_cli::commands::{read_beliefs, run_check, run_eval, run_point};
use pilco_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use pilco_cli::output::{render_error, Report, VersionReport};
use pilco_cli::{CliError, ExitCode, OutputFormat};
use pilco_config::load_cost;
use tracing::debug;

/// Evaluate PILCO expected costs under Gaussian beliefs
#[derive(Parser)]
#[command(name = "pilco-cost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Cost config file (.toml or .json); falls back to PILCO_COST_CONFIG,
    /// then PILCO_CONFIG_DIR, then ~/.config/pilco/
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Log level (overrides PILCO_LOG and RUST_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (overrides PILCO_LOG_FORMAT)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl GlobalOpts {
    fn cli_log_level(&self) -> Option<LogLevel> {
        if self.log_level.is_some() {
            return self.log_level;
        }
        if self.quiet {
            return Some(LogLevel::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the configured cost under each belief in a JSON file
    Eval(EvalArgs),

    /// Evaluate the configured cost at a single point-mass location
    Point(PointArgs),

    /// Validate the cost config and print a summary
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Belief file: one {"loc", "cov"} object or an array of them ("-" for stdin)
    #[arg(long, short = 'b')]
    belief: PathBuf,
}

#[derive(Args, Debug)]
struct PointArgs {
    /// Comma-separated location values, e.g. --loc=0.1,-0.2
    #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
    loc: Vec<f64>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success,
                _ => ExitCode::ArgsError,
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.cli_log_level(), cli.global.log_format);
    init_logging(&log_config);

    let format = cli.global.format;
    let exit_code = match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::Success
        }
        Err(e) => {
            let code = e.exit_code();
            debug!(exit_code = %code, "Command failed");
            eprintln!("{}", render_error(&e, format));
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let format = cli.global.format;
    let config = cli.global.config.as_deref();

    match &cli.command {
        Commands::Eval(args) => {
            let loaded = load_cost(config)?;
            let beliefs = read_beliefs(&args.belief)?;
            run_eval(&loaded, &beliefs)?.render(format)
        }
        Commands::Point(args) => {
            let loaded = load_cost(config)?;
            run_point(&loaded, &args.loc)?.render(format)
        }
        Commands::Check => {
            let loaded = load_cost(config)?;
            run_check(&loaded).render(format)
        }
        Commands::Version => VersionReport::default().render(format),
    }
}
