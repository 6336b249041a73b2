//! Stdout read pump: parses tray events line by line.

use systray_protocol::{decode_event, redact};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::bridge::BridgeEvent;

/// Reads newline-delimited events from the tray's standard output.
///
/// A line that is not UTF-8 or does not parse is logged and skipped; the
/// loop only ends on end of stream, a read error, or cancellation.
pub(crate) async fn read_pump<R>(
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
                    Ok(0) => {
                        debug!("tray stdout closed");
                        break;
                    }
                    Ok(_) => match std::str::from_utf8(&buf) {
                        Ok(line) => handle_line(line, &events).await,
                        Err(e) => warn!(
                            line = %redact(&String::from_utf8_lossy(&buf)),
                            "dropping non UTF-8 line from tray: {e}"
                        ),
                    },
                    Err(e) => {
                        warn!("tray stdout read error: {e}");
                        let _ = events.send(BridgeEvent::Error(e.into())).await;
                        break;
                    }
                }
            }
        }
    }
}

/// Handles a single line from the tray.
async fn handle_line(line: &str, events: &mpsc::Sender<BridgeEvent>) {
    if line.trim().is_empty() {
        return;
    }

    trace!(line = %redact(line), "received line");

    match decode_event(line) {
        Ok(event) => {
            let _ = events.send(BridgeEvent::Event(event)).await;
        }
        Err(e) => warn!(line = %redact(line), "dropping malformed line from tray: {e}"),
    }
}
