//! WebSocket transport for the channel.
//!
//! Provides [`ConnectedChannel`] which handles WebSocket I/O for the push
//! endpoint. This is a thin layer that just moves text payloads - protocol
//! logic remains in the Sans-IO [`Channel`](crate::Channel).

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Events surfaced by the transport task.
///
/// These map onto the channel's transport callbacks: `Text` feeds
/// `message_received`, `Errored` feeds `transport_errored`, and `Closed`
/// feeds `transport_closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text payload arrived from the server.
    Text(String),
    /// The server reported a transport-level failure.
    Errored(String),
    /// The connection is gone. Always the last event.
    Closed,
}

/// Handle to an open connection with WebSocket transport.
///
/// Payloads are sent/received via the channels, and an internal task
/// handles the WebSocket I/O.
pub struct ConnectedChannel {
    /// Send serialized messages to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive transport events from the server.
    pub from_server: mpsc::Receiver<TransportEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedChannel {
    /// Stop the connection task without a closing handshake.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to the push endpoint via WebSocket.
///
/// Returns a [`ConnectedChannel`] with channels for payload transport.
pub async fn connect(url: &str) -> Result<ConnectedChannel, TransportError> {
    let (stream, _response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| TransportError::Connection(format!("handshake failed: {e}")))?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(32);

    let handle = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    Ok(ConnectedChannel {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the WebSocket.
async fn run_connection<S>(
    stream: tokio_tungstenite::WebSocketStream<S>,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<TransportEvent>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(text) = outbound else {
                    // Channel handle dropped: closing handshake, then stop.
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                };
                if let Err(e) = sink.send(Message::text(text)).await {
                    tracing::debug!(%e, "websocket send failed");
                    let _ = from_server.send(TransportEvent::Errored(e.to_string())).await;
                    break;
                }
            },
            inbound = source.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if from_server.send(TransportEvent::Text(text.to_string())).await.is_err() {
                            break;
                        }
                    },
                    Some(Ok(Message::Ping(payload))) => {
                        // Protocol-level keepalive, answered here; the
                        // application heartbeat runs above this layer.
                        let _ = sink.send(Message::Pong(payload)).await;
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        tracing::debug!(%e, "websocket receive failed");
                        let _ = from_server.send(TransportEvent::Errored(e.to_string())).await;
                        break;
                    },
                }
            },
        }
    }

    let _ = from_server.send(TransportEvent::Closed).await;
}
