use crate::cli::OutputFormat;
use crate::client::DsdaClient;
use crate::site::PageFetcher;

/// Execute sync
///
/// # Errors
///
/// Returns an error if a page cannot be read or a cache written.
pub fn run<F: PageFetcher>(client: &mut DsdaClient<F>, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Text {
        println!("Starting sync. Do not interrupt the application!");
    }

    let summary = client.sync_full()?;

    match format {
        OutputFormat::Text => {
            println!("Sync completed!");
            tracing::info!(
                "{} players, {} wads, {} compats{}",
                summary.players,
                summary.wads,
                summary.compats,
                if summary.full_compat_sync { " (full)" } else { "" }
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
