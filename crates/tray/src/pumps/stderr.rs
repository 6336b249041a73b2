//! Stderr pump: forwards diagnostic output of the tray.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::bridge::BridgeEvent;

/// Forwards every line the tray writes to standard error.
pub(crate) async fn stderr_pump<R>(
    reader: R,
    events: mpsc::Sender<BridgeEvent>,
    cancel: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        tokio::select! {
            _ = cancel.cancelled() => break,

            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim_end_matches(['\n', '\r']);
                        debug!(target: "systray::tray_stderr", "{line}");
                        let _ = events.send(BridgeEvent::Stderr(line.to_string())).await;
                    }
                    Err(e) => {
                        debug!("tray stderr read error: {e}");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_lines() {
        let (tx, mut rx) = mpsc::channel(16);
        stderr_pump(&b"first\nsecond\n"[..], tx, CancellationToken::new()).await;

        let mut lines = Vec::new();
        while let Ok(BridgeEvent::Stderr(line)) = rx.try_recv() {
            lines.push(line);
        }
        assert_eq!(lines, ["first", "second"]);
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_forwarding() {
        let (tx, mut rx) = mpsc::channel(16);
        stderr_pump(&b"\xff\nafter\r\n"[..], tx, CancellationToken::new()).await;

        let mut lines = Vec::new();
        while let Ok(BridgeEvent::Stderr(line)) = rx.try_recv() {
            lines.push(line);
        }
        assert_eq!(lines, ["\u{FFFD}", "after"]);
    }
}
