//! Read-only views over a plugin registry.
//!
//! The lister only ever talks to these traits. [`SystemRegistry`] backs them with the
//! live GStreamer registry, [`Snapshot`] with a registry captured to JSON.

pub mod snapshot;
#[cfg(feature = "gstreamer")]
pub mod system;

use crate::error::FeatureError;
use std::path::PathBuf;

pub use snapshot::Snapshot;
#[cfg(feature = "gstreamer")]
pub use system::SystemRegistry;

/// Metadata key holding the element class string, e.g. `"Codec/Decoder/Video"`.
pub const KLASS_METADATA_KEY: &str = "klass";

/// A catalog of installed plugins and the features they contribute.
pub trait Registry {
    type Plugin: PluginHandle;
    type Feature: FeatureHandle<Plugin = Self::Plugin>;

    /// All plugins known to the registry, in registry order.
    fn plugins(&self) -> Vec<Self::Plugin>;

    /// Features contributed by the plugin called `plugin_name`.
    fn features_by_plugin(&self, plugin_name: &str) -> Vec<Self::Feature>;
}

pub trait PluginHandle {
    fn name(&self) -> String;

    /// Shared object the plugin was loaded from, if the registry knows it.
    fn filename(&self) -> Option<PathBuf>;
}

pub trait FeatureHandle {
    type Plugin: PluginHandle;

    fn name(&self) -> String;

    /// Returns the element factory view of this feature, or `None` for other
    /// feature kinds (type finders, device providers, tracers, ...).
    fn element_factory(&self) -> Option<&dyn ElementFactoryInfo>;

    /// The plugin that contributed this feature. `None` when it cannot be resolved.
    fn plugin(&self) -> Option<Self::Plugin>;
}

/// Introspection of an element factory.
///
/// Bindings differ in how they expose the class string: some have a direct accessor,
/// others only the generic metadata table. [`resolve_klass`] tries both.
pub trait ElementFactoryInfo {
    /// Direct class accessor. `None` means the binding does not offer one.
    fn klass(&self) -> Option<Result<String, FeatureError>>;

    /// Generic metadata lookup.
    fn metadata(&self, key: &str) -> Result<Option<String>, FeatureError>;
}

/// Where a class string was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KlassSource {
    Accessor,
    Metadata,
}

/// Reads the class string of `factory`, preferring the direct accessor and falling back
/// to the `klass` metadata entry. Empty strings are reported as absent.
pub fn resolve_klass(
    factory: &dyn ElementFactoryInfo,
) -> Result<Option<(String, KlassSource)>, FeatureError> {
    let resolved = match factory.klass() {
        Some(klass) => Some((klass?, KlassSource::Accessor)),
        None => factory
            .metadata(KLASS_METADATA_KEY)?
            .map(|klass| (klass, KlassSource::Metadata)),
    };

    Ok(resolved.filter(|(klass, _)| !klass.is_empty()))
}
