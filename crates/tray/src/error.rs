//! Error types for the tray controller.

use std::path::PathBuf;

use systray_protocol::CodecError;

use crate::types::ExitInfo;

/// Errors produced by the tray controller and its process bridge.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("failed to start tray binary {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read icon {path}: {source}")]
    Icon {
        path: String,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Codec(#[from] CodecError),

    #[error("tray input closed")]
    Closed,

    #[error("tray exited before becoming ready ({0})")]
    ExitedBeforeReady(ExitInfo),

    #[error("menu item has no internal identity")]
    UnassignedItem,
}
