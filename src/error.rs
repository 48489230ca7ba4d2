use std::io;
use std::path::PathBuf;
use std::result;

/// Result type of the fatal paths: framework start-up, snapshot I/O and report output.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors that abort the whole run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[cfg(feature = "gstreamer")]
    #[error("GStreamer initialization failed: {0}")]
    Init(#[from] gstreamer::glib::Error),

    #[cfg(not(feature = "gstreamer"))]
    #[error("Built without GStreamer support, a registry snapshot is required")]
    NoBackend,

    #[error("Failed to read snapshot {}: {source}", .path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid snapshot {}: {source}", .path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write snapshot {}: {source}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// An introspection failure scoped to a single plugin feature.
///
/// These never abort enumeration; the lister reports them inline and moves on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("{0}")]
    Introspection(String),
}
