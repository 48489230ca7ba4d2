use super::{ElementFactoryInfo, FeatureHandle, PluginHandle, Registry};
use crate::error::{FeatureError, Result};
use gstreamer as gst;
use gst::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// The process-wide GStreamer registry.
///
/// The registry is owned by GStreamer; this handle only reads from it.
#[derive(Clone, Debug)]
pub struct SystemRegistry {
    inner: gst::Registry,
}

impl SystemRegistry {
    /// Initializes GStreamer and returns the default registry.
    ///
    /// Repeated calls are fine, `gst::init` is idempotent.
    pub fn init() -> Result<Self> {
        gst::init()?;
        let (major, minor, micro, nano) = gst::version();
        debug!(%major, %minor, %micro, %nano, "GStreamer initialized");

        Ok(Self {
            inner: gst::Registry::get(),
        })
    }
}

impl Registry for SystemRegistry {
    type Plugin = gst::Plugin;
    type Feature = gst::PluginFeature;

    fn plugins(&self) -> Vec<gst::Plugin> {
        self.inner.plugins().into_iter().collect()
    }

    fn features_by_plugin(&self, plugin_name: &str) -> Vec<gst::PluginFeature> {
        self.inner
            .features_by_plugin(plugin_name)
            .into_iter()
            .collect()
    }
}

impl PluginHandle for gst::Plugin {
    fn name(&self) -> String {
        gst::Plugin::plugin_name(self).to_string()
    }

    fn filename(&self) -> Option<PathBuf> {
        gst::Plugin::filename(self)
    }
}

impl FeatureHandle for gst::PluginFeature {
    type Plugin = gst::Plugin;

    fn name(&self) -> String {
        GstObjectExt::name(self).to_string()
    }

    fn element_factory(&self) -> Option<&dyn ElementFactoryInfo> {
        self.downcast_ref::<gst::ElementFactory>()
            .map(|factory| factory as &dyn ElementFactoryInfo)
    }

    fn plugin(&self) -> Option<gst::Plugin> {
        PluginFeatureExt::plugin(self)
    }
}

impl ElementFactoryInfo for gst::ElementFactory {
    fn klass(&self) -> Option<std::result::Result<String, FeatureError>> {
        Some(Ok(gst::ElementFactory::klass(self).to_string()))
    }

    fn metadata(&self, key: &str) -> std::result::Result<Option<String>, FeatureError> {
        Ok(gst::ElementFactory::metadata(self, key).map(str::to_owned))
    }
}
