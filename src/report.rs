use crate::error::Result;
use crate::lister::{CodecEntry, FeatureFailure, Listing, ListingEvent};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Printed in the path column when the plugin file is not known.
pub const UNKNOWN_PLUGIN_PATH: &str = "unknown";

const NAME_WIDTH: usize = 20;
const KLASS_WIDTH: usize = 25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One padded line per codec
    #[default]
    Text,
    /// A single JSON document
    Json,
}

pub fn write_report<W: Write>(listing: &Listing, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(listing, out),
        OutputFormat::Json => write_json(listing, out),
    }
}

/// Writes codecs and failures interleaved in the order they were found.
pub fn write_text<W: Write>(listing: &Listing, out: &mut W) -> Result<()> {
    for event in listing.events() {
        match event {
            ListingEvent::Codec(entry) => writeln!(out, "{}", format_entry(entry))?,
            ListingEvent::Failure(failure) => writeln!(out, "{}", format_failure(failure))?,
        }
    }
    out.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    codecs: Vec<&'a CodecEntry>,
    errors: Vec<&'a FeatureFailure>,
}

pub fn write_json<W: Write>(listing: &Listing, out: &mut W) -> Result<()> {
    let report = JsonReport {
        codecs: listing.entries().collect(),
        errors: listing.failures().collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Columns are padded but never truncated, long names push the rest of the line right.
pub fn format_entry(entry: &CodecEntry) -> String {
    let path = entry
        .plugin_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| UNKNOWN_PLUGIN_PATH.to_string());

    format!(
        "{:<NAME_WIDTH$} - {:<KLASS_WIDTH$} - {}",
        entry.name, entry.klass, path
    )
}

pub fn format_failure(failure: &FeatureFailure) -> String {
    format!("Error with feature {}: {}", failure.feature, failure.message)
}
