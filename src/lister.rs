use crate::error::FeatureError;
use crate::registry::{ElementFactoryInfo, FeatureHandle, PluginHandle, Registry, resolve_klass};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Class keywords selecting codec element factories.
pub const DEFAULT_KEYWORDS: [&str; 2] = ["decoder", "encoder"];

/// Case-insensitive substring match against an element class string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KlassMatcher {
    keywords: Vec<String>,
}

impl KlassMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|keyword| keyword.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// `klass` must already be lowercase.
    pub fn matches(&self, klass: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| klass.contains(keyword.as_str()))
    }
}

impl Default for KlassMatcher {
    fn default() -> Self {
        Self::new(&DEFAULT_KEYWORDS)
    }
}

/// An element factory whose class matched.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CodecEntry {
    pub name: String,
    /// Lowercased class string.
    pub klass: String,
    /// `None` when the owning plugin or its file could not be resolved.
    pub plugin_path: Option<PathBuf>,
}

/// A feature that could not be inspected.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FeatureFailure {
    pub feature: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingEvent {
    Codec(CodecEntry),
    Failure(FeatureFailure),
}

/// Result of one pass over a registry, in registry order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    events: Vec<ListingEvent>,
}

impl Listing {
    pub fn events(&self) -> &[ListingEvent] {
        &self.events
    }

    pub fn entries(&self) -> impl Iterator<Item = &CodecEntry> {
        self.events.iter().filter_map(|event| match event {
            ListingEvent::Codec(entry) => Some(entry),
            ListingEvent::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FeatureFailure> {
        self.events.iter().filter_map(|event| match event {
            ListingEvent::Failure(failure) => Some(failure),
            ListingEvent::Codec(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Walks every plugin of `registry` and collects the element factories whose class
/// matches. A feature that fails to inspect is recorded and enumeration carries on.
pub fn list_codecs<R: Registry>(registry: &R, matcher: &KlassMatcher) -> Listing {
    let mut events = Vec::new();
    let mut inspected = 0usize;

    for plugin in registry.plugins() {
        let plugin_name = plugin.name();
        let features = registry.features_by_plugin(&plugin_name);
        debug!(plugin = %plugin_name, features = features.len(), "Inspecting plugin");

        for feature in &features {
            let Some(factory) = feature.element_factory() else {
                continue;
            };
            inspected += 1;

            match inspect_factory(feature, factory, matcher) {
                Ok(Some(entry)) => events.push(ListingEvent::Codec(entry)),
                Ok(None) => {}
                Err(error) => {
                    let feature = feature.name();
                    warn!(%feature, %error, "Failed to inspect feature");
                    events.push(ListingEvent::Failure(FeatureFailure {
                        feature,
                        message: error.to_string(),
                    }));
                }
            }
        }
    }

    let listing = Listing { events };
    info!(
        inspected,
        codecs = listing.entries().count(),
        failures = listing.failures().count(),
        "Registry listing finished"
    );
    listing
}

fn inspect_factory<F: FeatureHandle>(
    feature: &F,
    factory: &dyn ElementFactoryInfo,
    matcher: &KlassMatcher,
) -> Result<Option<CodecEntry>, FeatureError> {
    let Some((klass, source)) = resolve_klass(factory)? else {
        return Ok(None);
    };

    let klass = klass.to_lowercase();
    if !matcher.matches(&klass) {
        return Ok(None);
    }

    let name = feature.name();
    trace!(feature = %name, ?source, "Class resolved");

    Ok(Some(CodecEntry {
        name,
        klass,
        plugin_path: feature.plugin().and_then(|plugin| plugin.filename()),
    }))
}
