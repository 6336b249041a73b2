//! Process bridge: owns the tray subprocess and its standard streams.
//!
//! Spawning wires up four background tasks:
//! - read pump: stdout lines -> [`BridgeEvent::Event`]
//! - stderr pump: stderr lines -> [`BridgeEvent::Stderr`]
//! - write pump: queued lines -> stdin, one at a time
//! - exit waiter: process exit -> [`BridgeEvent::Exited`]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use systray_protocol::Event;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::TrayError;
use crate::pumps::write::WriteRequest;
use crate::types::ExitInfo;

/// Capacity of the outbound and inbound queues.
const QUEUE_CAPACITY: usize = 256;

/// Something observed on the tray process.
#[derive(Debug)]
pub(crate) enum BridgeEvent {
    /// A parsed line from stdout.
    Event(Event),
    /// A line from stderr.
    Stderr(String),
    /// An I/O failure while observing the process.
    Error(TrayError),
    /// The process has exited.
    Exited(ExitInfo),
}

/// Handle to a running tray subprocess.
pub(crate) struct Bridge {
    bin_path: PathBuf,
    pid: Option<u32>,
    write_tx: mpsc::Sender<WriteRequest>,
    exit_rx: watch::Receiver<Option<ExitInfo>>,
    /// Stops the pumps.
    cancel: CancellationToken,
    /// Makes the exit waiter kill the process.
    kill: CancellationToken,
}

impl Bridge {
    /// Starts the tray binary and its pumps.
    pub(crate) async fn spawn(
        bin_path: PathBuf,
        args: &[OsString],
    ) -> Result<(Self, mpsc::Receiver<BridgeEvent>), TrayError> {
        ensure_executable(&bin_path).await;

        let mut child = spawn_tray(&bin_path, args)?;
        let pid = child.id();

        let stdin = child.stdin.take().ok_or(TrayError::Closed)?;
        let stdout = child.stdout.take().ok_or(TrayError::Closed)?;
        let stderr = child.stderr.take().ok_or(TrayError::Closed)?;

        let (write_tx, write_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (exit_tx, exit_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let kill = CancellationToken::new();

        tokio::spawn(crate::pumps::write::write_pump(stdin, write_rx, cancel.clone()));
        tokio::spawn(crate::pumps::read::read_pump(
            stdout,
            events_tx.clone(),
            cancel.clone(),
        ));
        tokio::spawn(crate::pumps::stderr::stderr_pump(
            stderr,
            events_tx.clone(),
            cancel.clone(),
        ));
        tokio::spawn(wait_for_exit(child, exit_tx, events_tx, kill.clone()));

        info!(path = %bin_path.display(), pid, "tray process started");

        let bridge = Self {
            bin_path,
            pid,
            write_tx,
            exit_rx,
            cancel,
            kill,
        };
        Ok((bridge, events_rx))
    }

    pub(crate) fn bin_path(&self) -> &Path {
        &self.bin_path
    }

    pub(crate) fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Exit status, once the process has been reaped.
    pub(crate) fn exit_info(&self) -> Option<ExitInfo> {
        *self.exit_rx.borrow()
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.exit_info().is_none()
    }

    /// Queues `line` behind every line queued before it.
    pub(crate) async fn queue_line(&self, line: String) -> Result<PendingWrite, TrayError> {
        let (done, result) = oneshot::channel();
        self.write_tx
            .send(WriteRequest { line, done })
            .await
            .map_err(|_| TrayError::Closed)?;
        Ok(PendingWrite { result })
    }

    /// Kills the process without asking it to exit.
    pub(crate) fn force_kill(&self) {
        self.kill.cancel();
    }
}

/// A queued line whose write has not necessarily happened yet.
pub(crate) struct PendingWrite {
    result: oneshot::Receiver<std::io::Result<()>>,
}

impl PendingWrite {
    /// Waits until the line has been written and flushed.
    pub(crate) async fn wait(self) -> Result<(), TrayError> {
        self.result.await.map_err(|_| TrayError::Closed)??;
        Ok(())
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.kill.cancel();
    }
}

/// Adds execute permission to the tray binary if it lacks any.
///
/// Failures are only logged: spawning reports the real problem.
async fn ensure_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let meta = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) => {
                debug!(path = %path.display(), "cannot stat tray binary: {e}");
                return;
            }
        };
        let mode = meta.permissions().mode();
        if mode & 0o111 == 0o111 {
            return;
        }
        let perms = std::fs::Permissions::from_mode(mode | 0o111);
        match tokio::fs::set_permissions(path, perms).await {
            Ok(()) => debug!(path = %path.display(), "made tray binary executable"),
            Err(e) => debug!(path = %path.display(), "cannot chmod tray binary: {e}"),
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}

/// Launches the tray with piped standard streams and no console window.
fn spawn_tray(path: &Path, args: &[OsString]) -> Result<Child, TrayError> {
    let mut cmd = Command::new(path);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(windows)]
    {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    cmd.spawn().map_err(|source| TrayError::Spawn {
        path: path.to_path_buf(),
        source,
    })
}

/// Waits for the process to exit, killing it first if asked to.
async fn wait_for_exit(
    mut child: Child,
    exit_tx: watch::Sender<Option<ExitInfo>>,
    events: mpsc::Sender<BridgeEvent>,
    kill: CancellationToken,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill.cancelled() => {
            if let Err(e) = child.start_kill() {
                warn!("failed to kill tray process: {e}");
            }
            child.wait().await
        }
    };

    let info = match status {
        Ok(status) => ExitInfo::from(status),
        Err(e) => {
            warn!("failed to wait for tray process: {e}");
            let _ = events.send(BridgeEvent::Error(e.into())).await;
            ExitInfo::default()
        }
    };

    info!(%info, "tray process exited");
    exit_tx.send_replace(Some(info));
    let _ = events.send(BridgeEvent::Exited(info)).await;
}
