//! Background tasks moving lines between the host and the tray process.

pub(crate) mod read;
pub(crate) mod stderr;
pub(crate) mod write;
