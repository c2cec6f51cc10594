use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use status_check::Checker;
use status_check::config::app_config::load_config;

/// Run one HTTP health check and print the result as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// URL-encoded check parameters, e.g. `url=https%3A%2F%2Fexample.com&acceptCodes=404`
    params: String,

    /// YAML configuration file (defaults to $CONFIG_FILE, then ./config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Abort the request after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let app_config = match load_config(cli.config.as_deref()) {
        Ok(app_config) => app_config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(2);
        }
    };

    let mut checker_config = match app_config.checker_config() {
        Ok(checker_config) => checker_config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(2);
        }
    };
    if let Some(seconds) = cli.timeout {
        checker_config.timeout = Some(Duration::from_secs(seconds));
    }

    let checker = match Checker::new(checker_config) {
        Ok(checker) => checker,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(2);
        }
    };

    let result = checker.check(&cli.params).await;
    if cli.pretty {
        println!("{}", result.to_json_pretty());
    } else {
        println!("{}", result.to_json());
    }

    if result.success_status {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
