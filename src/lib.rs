pub mod config;
pub mod error;
pub mod lister;
pub mod registry;
pub mod report;

use std::io::Write;
use tracing::info;

//
// Re-export
//
pub use config::Config;
pub use error::{Error, FeatureError, Result};
pub use lister::{CodecEntry, FeatureFailure, KlassMatcher, Listing, ListingEvent, list_codecs};
pub use registry::{Registry, Snapshot};
#[cfg(feature = "gstreamer")]
pub use registry::SystemRegistry;
pub use report::{OutputFormat, write_report};

/// Lists the matching codecs and writes the report to `out`.
pub fn run<W: Write>(config: Config, out: &mut W) -> Result<()> {
    let matcher = KlassMatcher::new(config.keywords.as_slice());

    let listing = match &config.snapshot {
        Some(path) => {
            info!(path = %path.display(), "Reading registry snapshot");
            inspect(&Snapshot::load(path)?, &config, &matcher)?
        }
        None => inspect_system_registry(&config, &matcher)?,
    };

    write_report(&listing, config.format, out)
}

#[cfg(feature = "gstreamer")]
fn inspect_system_registry(config: &Config, matcher: &KlassMatcher) -> Result<Listing> {
    let registry = SystemRegistry::init()?;
    inspect(&registry, config, matcher)
}

#[cfg(not(feature = "gstreamer"))]
fn inspect_system_registry(_config: &Config, _matcher: &KlassMatcher) -> Result<Listing> {
    Err(Error::NoBackend)
}

fn inspect<R: Registry>(registry: &R, config: &Config, matcher: &KlassMatcher) -> Result<Listing> {
    if let Some(path) = &config.save_snapshot {
        Snapshot::capture(registry).save(path)?;
    }
    Ok(list_codecs(registry, matcher))
}
