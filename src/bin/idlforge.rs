use clap::Parser;
use idlforge::cli::{run, Cli};
use idlforge::logging::{init_logging_with_config, LogConfig};

fn main() {
    let cli = Cli::parse();

    let mut config = LogConfig::from_env();
    if cli.verbose {
        config = config.verbose();
    }
    if let Err(e) = init_logging_with_config(&config) {
        eprintln!("Warning: {e:#}");
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
