//! Wire protocol between the host process and the native tray binary.
//!
//! The tray binary reads one JSON object per line on its standard input
//! ([`Action`]) and writes one JSON object per line on its standard output
//! ([`Event`]). This crate holds the menu model, both tagged unions and the
//! line codec; it performs no I/O.

pub mod codec;
pub mod constants;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use codec::{CodecError, decode_event, encode_action, encode_line, redact};
pub use messages::{Action, Event};
pub use types::{ItemId, ItemPatch, Menu, MenuItem};
