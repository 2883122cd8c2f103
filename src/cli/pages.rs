use crate::cli::OutputFormat;
use crate::client::{DsdaClient, RandomPage, UpdateInfo};
use crate::site::PageFetcher;

/// Execute random_player_page
///
/// # Errors
///
/// Returns an error if the player cache cannot be synced or has no entry
/// for the picked page.
pub fn run_random_player<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = client.random_player_page(&mut rand::thread_rng())?;
    print_page(&page, format)
}

/// Execute random_wad_page
///
/// # Errors
///
/// Returns an error if the wad cache cannot be synced or has no entry for
/// the picked page.
pub fn run_random_wad<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = client.random_wad_page(&mut rand::thread_rng())?;
    print_page(&page, format)
}

fn print_page(page: &RandomPage, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}: {}", page.name, page.url),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page)?),
    }
    Ok(())
}

/// Execute last_dsda_update
///
/// # Errors
///
/// Returns an error if the updates page cannot be read.
pub fn run_last_update<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let update = client.last_update()?;

    match format {
        OutputFormat::Text => print_text_update(&update),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&update)?),
    }

    Ok(())
}

fn print_text_update(update: &UpdateInfo) {
    println!("{}", update.date);
    println!("Demos in update: {}", update.demo_count);
    if !update.new_players.is_empty() {
        println!("New players: {}", update.new_players.join(", "));
    }
}
