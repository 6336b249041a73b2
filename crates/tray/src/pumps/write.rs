//! Stdin write pump: serialises outbound lines.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::error;

/// One line queued for the tray, with a slot for the write outcome.
pub(crate) struct WriteRequest {
    pub(crate) line: String,
    pub(crate) done: oneshot::Sender<std::io::Result<()>>,
}

/// Writes queued lines to the tray's standard input.
///
/// Lines are written whole and in queue order. The pump stops after the
/// first failed write; later requests then fail to enqueue.
pub(crate) async fn write_pump<W>(
    mut writer: W,
    mut write_rx: mpsc::Receiver<WriteRequest>,
    cancel: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            req = write_rx.recv() => {
                let Some(req) = req else { break };
                let result = write_line(&mut writer, &req.line).await;
                let failed = result.is_err();
                if let Err(e) = &result {
                    error!("tray stdin write error: {e}");
                }
                let _ = req.done.send(result);
                if failed {
                    break;
                }
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
