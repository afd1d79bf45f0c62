//! memstress CLI entry point

use anyhow::{Context, Result};
use memstress::config::{cli::Cli, cli_convert, validator};
use memstress::output::{json, text};
use memstress::Runner;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    println!("memstress v{}", env!("CARGO_PKG_VERSION"));
    println!("Synthetic allocation workload generator");
    println!();

    let config = cli_convert::build_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;
    debug!(?config, "effective configuration");

    print!("{}", config);
    println!();
    println!("Starting run...");
    println!();

    let summary = Runner::new(&config).run()?;

    text::print_results(&summary, &config);

    if let Some(ref path) = config.output.json_output {
        let output = json::build_json_output(&config, &summary);
        json::write_json_output(path, &output, true)?;
        println!("JSON summary written to {}", path.display());
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over `--debug`
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
