//! Public types for the tray controller.

use std::fmt;
use std::process::ExitStatus;

use systray_protocol::{ItemId, MenuItem};

/// A click on a menu item, resolved against the host's menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// The authoritative item, with the fields reported by the tray merged in.
    pub item: MenuItem,
    /// Sequence id echoed by the tray (`-1` when unattributed).
    pub seq_id: i64,
    /// Internal identity of the clicked item.
    pub id: ItemId,
}

/// How the tray process ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Terminating signal, if the process was killed by one (Unix only).
    pub signal: Option<i32>,
}

impl ExitInfo {
    /// Whether the process exited normally with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => f.write_str("unknown exit status"),
        }
    }
}

/// Lifecycle of a [`SysTray`](crate::SysTray).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayState {
    /// Process spawned, waiting for its ready event.
    Initializing,
    /// Initial menu delivered; actions and clicks flow freely.
    Ready,
    /// Shutdown requested, waiting for the process to exit.
    Exiting,
    /// Process has exited.
    Exited(ExitInfo),
}

impl TrayState {
    pub fn is_exited(&self) -> bool {
        matches!(self, Self::Exited(_))
    }

    /// Whether moving from `self` to `next` is a valid transition.
    pub(crate) fn can_become(&self, next: &TrayState) -> bool {
        match (self, next) {
            (Self::Exited(_), _) => false,
            (_, Self::Exited(_)) => true,
            (Self::Initializing, Self::Ready) => true,
            (Self::Initializing | Self::Ready, Self::Exiting) => true,
            _ => false,
        }
    }
}
