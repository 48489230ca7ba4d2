use super::{ElementFactoryInfo, FeatureHandle, PluginHandle, Registry, resolve_klass};
use crate::error::{Error, FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A registry captured to JSON, so it can be inspected on another host.
///
/// ```json
/// {
///   "plugins": [
///     {
///       "name": "libav",
///       "filename": "/usr/lib/gstreamer-1.0/libgstlibav.so",
///       "features": [
///         { "name": "avdec_h264", "klass": "Codec/Decoder/Video" },
///         { "name": "typefind", "kind": "type_find" }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default)]
    pub plugins: Vec<SnapshotPlugin>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotPlugin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
    #[serde(default)]
    pub features: Vec<SnapshotFeature>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotFeature {
    pub name: String,
    #[serde(default)]
    pub kind: FeatureKind,
    /// Value of the direct class accessor. Absent when only metadata was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub klass: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    /// Introspection error raised while reading this feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The owning plugin could not be resolved from the feature.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub detached: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    #[default]
    ElementFactory,
    TypeFind,
    DeviceProvider,
    Other,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), plugins = self.plugins.len(), "Snapshot saved");
        Ok(())
    }

    /// Records every plugin and feature of `registry`.
    ///
    /// Non element factories are kept with their kind only. Class lookups that fail are
    /// stored as the feature's error so the snapshot replays them.
    pub fn capture<R: Registry>(registry: &R) -> Self {
        let plugins = registry
            .plugins()
            .iter()
            .map(|plugin| {
                let name = plugin.name();
                let features = registry
                    .features_by_plugin(&name)
                    .iter()
                    .map(capture_feature)
                    .collect();
                SnapshotPlugin {
                    filename: plugin.filename(),
                    name,
                    features,
                }
            })
            .collect();

        Self { plugins }
    }
}

fn capture_feature<F: FeatureHandle>(feature: &F) -> SnapshotFeature {
    let mut captured = SnapshotFeature {
        name: feature.name(),
        kind: FeatureKind::Other,
        klass: None,
        metadata: BTreeMap::new(),
        error: None,
        detached: feature.plugin().is_none(),
    };

    if let Some(factory) = feature.element_factory() {
        captured.kind = FeatureKind::ElementFactory;
        match resolve_klass(factory) {
            Ok(Some((klass, _))) => captured.klass = Some(klass),
            Ok(None) => {}
            Err(error) => captured.error = Some(error.to_string()),
        }
    }

    captured
}

/// Plugin view handed out by a [`Snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotPluginRef {
    name: String,
    filename: Option<PathBuf>,
}

impl From<&SnapshotPlugin> for SnapshotPluginRef {
    fn from(plugin: &SnapshotPlugin) -> Self {
        Self {
            name: plugin.name.clone(),
            filename: plugin.filename.clone(),
        }
    }
}

impl PluginHandle for SnapshotPluginRef {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn filename(&self) -> Option<PathBuf> {
        self.filename.clone()
    }
}

/// Feature view handed out by a [`Snapshot`].
#[derive(Clone, Debug)]
pub struct SnapshotFeatureRef {
    feature: SnapshotFeature,
    plugin: SnapshotPluginRef,
}

impl FeatureHandle for SnapshotFeatureRef {
    type Plugin = SnapshotPluginRef;

    fn name(&self) -> String {
        self.feature.name.clone()
    }

    fn element_factory(&self) -> Option<&dyn ElementFactoryInfo> {
        match self.feature.kind {
            FeatureKind::ElementFactory => Some(&self.feature),
            _ => None,
        }
    }

    fn plugin(&self) -> Option<SnapshotPluginRef> {
        (!self.feature.detached).then(|| self.plugin.clone())
    }
}

impl ElementFactoryInfo for SnapshotFeature {
    fn klass(&self) -> Option<std::result::Result<String, FeatureError>> {
        if let Some(error) = &self.error {
            return Some(Err(FeatureError::Introspection(error.clone())));
        }
        self.klass.clone().map(Ok)
    }

    fn metadata(&self, key: &str) -> std::result::Result<Option<String>, FeatureError> {
        if let Some(error) = &self.error {
            return Err(FeatureError::Introspection(error.clone()));
        }
        Ok(self.metadata.get(key).cloned())
    }
}

impl Registry for Snapshot {
    type Plugin = SnapshotPluginRef;
    type Feature = SnapshotFeatureRef;

    fn plugins(&self) -> Vec<SnapshotPluginRef> {
        self.plugins.iter().map(SnapshotPluginRef::from).collect()
    }

    fn features_by_plugin(&self, plugin_name: &str) -> Vec<SnapshotFeatureRef> {
        // plugin names are unique in a registry, the first match owns the name
        let Some(plugin) = self.plugins.iter().find(|plugin| plugin.name == plugin_name) else {
            return Vec::new();
        };

        let owner = SnapshotPluginRef::from(plugin);
        plugin
            .features
            .iter()
            .map(|feature| SnapshotFeatureRef {
                feature: feature.clone(),
                plugin: owner.clone(),
            })
            .collect()
    }
}
