//! Host-side controller for a native system tray icon.
//!
//! The tray itself is rendered by a separately built binary. This crate
//! spawns it, waits for it to report readiness, sends it the menu and later
//! updates, and turns its click notifications back into the caller's items.
//!
//! - [`SysTray`]: construct, `ready()`, listen, send, kill
//! - [`TrayConfig`]: binary path, initial menu, checkbox rendering style
//! - [`CheckboxStyle`]: native checkboxes or a title suffix marker
//!
//! # Platform notes
//! - Linux trays have no native checkbox, so checked items get
//!   [`CHECK_MARKER`] appended to their title
//! - Windows: the tray is started without a console window

mod bridge;
pub mod checkbox;
mod config;
mod error;
pub mod icon;
pub mod identity;
mod listeners;
mod menu;
mod pumps;
mod tray;
mod types;

pub use checkbox::{CHECK_MARKER, CheckboxStyle};
pub use config::TrayConfig;
pub use error::TrayError;
pub use identity::IdentityMap;
pub use tray::SysTray;
pub use types::{ClickEvent, ExitInfo, TrayState};

pub use systray_protocol::{Action, ItemId, Menu, MenuItem};
