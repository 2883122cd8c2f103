use clap::Parser;
use tracing_subscriber::EnvFilter;

use dsda_client::cli::{self, Cli};
use dsda_client::client::DsdaClient;
use dsda_client::site::HttpFetcher;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("dsda_client=debug,info")
    } else {
        EnvFilter::new("dsda_client=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = cli.client_config();
    let fetcher = HttpFetcher::new(config.timeout)?;
    let mut client = DsdaClient::new(fetcher, config);

    match cli.command {
        Some(command) => cli::execute(&mut client, command, cli.format)?,
        None => {
            cli::repl::warn_on_interrupt()?;
            cli::repl::run(&mut client, std::io::stdin().lock(), cli.format)?;
        }
    }

    Ok(())
}
