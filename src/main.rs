use std::process;

use gravpart::engine;
use gravpart::identity::RandomGroupIds;
use gravpart::setup::{Config, ConfigError};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const CONFIG_EXIT: i32 = 2;

fn init_logging(verbosity: u64) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        // --help and --version land here too
        Err(ConfigError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(CONFIG_EXIT);
        }
    };
    init_logging(config.verbosity());

    let result = match config.seed() {
        Some(seed) => engine::run(&config, &mut RandomGroupIds::seeded(seed)),
        None => engine::run(&config, &mut RandomGroupIds::from_entropy()),
    };

    match result {
        Ok(summary) => info!(
            locations = summary.locations,
            groups = summary.groups,
            "done"
        ),
        Err(e) => {
            error!("{}", e);
            process::exit(e.exit_code());
        }
    }
}
