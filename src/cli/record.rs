use clap::Args;

use crate::cli::OutputFormat;
use crate::client::{DsdaClient, RecordReport};
use crate::site::PageFetcher;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RecordArgs {
    /// Wad name, e.g. "scythe" or "2 (1994)"
    pub wad: String,

    /// Category, e.g. uvmax, uvspeed, nm100, pacifist
    pub category: String,

    /// Level: e#m#, map##, d#ep#, d#all, or ## for map##. The first level
    /// on the wad page when omitted.
    pub level: Option<String>,
}

/// Execute get_record
///
/// # Errors
///
/// Returns an error if the record lookup fails.
pub fn run<F: PageFetcher>(
    client: &mut DsdaClient<F>,
    args: &RecordArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = client.get_record(&args.wad, &args.category, args.level.as_deref())?;

    match format {
        OutputFormat::Text => print_text_record(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_text_record(report: &RecordReport) {
    let record = &report.record;
    println!("Time: {}", record.time);
    println!("Player: {}", record.player);
    println!("Demo link: {}", record.link.as_deref().unwrap_or("None"));
    if let Some(note) = &record.category_note {
        println!("Category: {note}");
    }
}
