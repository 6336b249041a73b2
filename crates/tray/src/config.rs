//! Tray controller configuration.

use std::ffi::OsString;
use std::path::PathBuf;

use systray_protocol::Menu;

use crate::checkbox::CheckboxStyle;

/// Everything needed to start a tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Path of the platform tray binary. Locating, unpacking or caching the
    /// binary is up to the caller.
    pub bin_path: PathBuf,
    /// Extra command line arguments for the tray binary.
    pub args: Vec<OsString>,
    /// Initial menu. Ownership passes to the controller.
    pub menu: Menu,
    /// How checked items are rendered.
    pub checkbox_style: CheckboxStyle,
}

impl TrayConfig {
    /// Creates a configuration using the host platform's checkbox style.
    pub fn new(bin_path: impl Into<PathBuf>, menu: Menu) -> Self {
        Self {
            bin_path: bin_path.into(),
            args: Vec::new(),
            menu,
            checkbox_style: CheckboxStyle::for_host(),
        }
    }

    pub fn with_checkbox_style(mut self, style: CheckboxStyle) -> Self {
        self.checkbox_style = style;
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}
