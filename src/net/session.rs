//! Channel to the narrative service
//!
//! Bootstraps a session id over HTTP, then keeps a WebSocket to the
//! session-scoped endpoint. The channel is best-effort enrichment: every
//! failure path lands in `Closed` and the simulation rides on offline.
//! Single connection attempt, no retry.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::net::protocol::{InboundMessage, OutboundMessage, SessionInfo};

/// Pending inbound messages kept between ticks; overflow drops the newest.
const INBOUND_CAPACITY: usize = 256;

/// Lifecycle of the service connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Never attempted
    Disconnected,
    /// Bootstrap or socket handshake in flight
    Connecting,
    /// Socket established
    Open,
    /// Attempt failed or the socket dropped; terminal for this channel
    Closed,
}

/// Errors on the way to an open channel
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("session bootstrap failed: {0}")]
    Bootstrap(#[from] reqwest::Error),
    #[error("socket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("unsupported service url: {0}")]
    BadUrl(String),
}

/// Handle to the narrative service connection.
///
/// Outbound messages go through an unbounded queue serviced by a writer
/// task; inbound messages land in a bounded queue the tick loop drains.
pub struct SessionChannel {
    state: Arc<RwLock<ChannelState>>,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
    inbound: crossbeam_channel::Receiver<InboundMessage>,
    session_id: Option<String>,
}

impl SessionChannel {
    /// A channel that was never connected. Sends are dropped, drains are
    /// empty; used when the service is disabled and as the failure fallback.
    pub fn offline() -> Self {
        let (outbound, _) = mpsc::unbounded_channel();
        let (_, inbound) = crossbeam_channel::bounded(0);
        Self {
            state: Arc::new(RwLock::new(ChannelState::Closed)),
            outbound,
            inbound,
            session_id: None,
        }
    }

    /// Connect to the service rooted at `base_url` (e.g.
    /// `http://localhost:8000`). Never fails the caller: a failed attempt
    /// logs a warning and returns an offline channel.
    pub async fn connect(base_url: &str) -> Self {
        match Self::try_connect(base_url).await {
            Ok(channel) => channel,
            Err(error) => {
                warn!(%error, "narrative service unavailable, riding offline");
                Self::offline()
            }
        }
    }

    async fn try_connect(base_url: &str) -> Result<Self, ChannelError> {
        let state = Arc::new(RwLock::new(ChannelState::Connecting));

        let bootstrap = format!("{}/session/new", base_url.trim_end_matches('/'));
        let info: SessionInfo = reqwest::get(&bootstrap)
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ws_url = socket_url(base_url, &info.session_id)?;
        let (socket, _) = connect_async(ws_url).await?;
        let (mut sink, mut stream) = socket.split();

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (inbound_tx, inbound) = crossbeam_channel::bounded(INBOUND_CAPACITY);

        *state.write() = ChannelState::Open;
        info!(session_id = %info.session_id, "narrative channel open");

        // Writer: serialize and push outbound messages until the queue or
        // socket closes.
        let writer_state = state.clone();
        tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(error) => {
                        debug!(%error, "failed to encode outbound message");
                        continue;
                    }
                };
                if let Err(error) = sink.send(Message::Text(json.into())).await {
                    warn!(%error, "narrative socket write failed");
                    break;
                }
            }
            *writer_state.write() = ChannelState::Closed;
        });

        // Reader: parse inbound frames into the tick-drained queue.
        let reader_state = state.clone();
        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<InboundMessage>(text.as_str())
                    {
                        Ok(message) => {
                            if inbound_tx.try_send(message).is_err() {
                                debug!("inbound queue full, dropping message");
                            }
                        }
                        Err(error) => debug!(%error, "malformed inbound message dropped"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "narrative socket read failed");
                        break;
                    }
                }
            }
            *reader_state.write() = ChannelState::Closed;
            info!("narrative channel closed");
        });

        Ok(Self {
            state,
            outbound,
            inbound,
            session_id: Some(info.session_id),
        })
    }

    pub fn state(&self) -> ChannelState {
        *self.state.read()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Queue an outbound message. Quietly dropped when the channel is not
    /// open; local simulation never depends on delivery.
    pub fn send(&self, message: OutboundMessage) {
        if !self.is_open() {
            return;
        }
        if self.outbound.send(message).is_err() {
            debug!("outbound queue closed, message dropped");
        }
    }

    /// Drain every inbound message that arrived since the last tick
    pub fn drain_inbound(&self) -> Vec<InboundMessage> {
        self.inbound.try_iter().collect()
    }
}

/// Session-scoped socket endpoint derived from the HTTP base url
fn socket_url(base_url: &str, session_id: &str) -> Result<String, ChannelError> {
    let trimmed = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(ChannelError::BadUrl(base_url.to_string()));
    };
    Ok(format!("{ws_base}/ws/{session_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_url() {
        assert_eq!(
            socket_url("http://localhost:8000", "abc").unwrap(),
            "ws://localhost:8000/ws/abc"
        );
        assert_eq!(
            socket_url("https://narrative.example.com/", "abc").unwrap(),
            "wss://narrative.example.com/ws/abc"
        );
        assert!(socket_url("ftp://nope", "abc").is_err());
    }

    #[test]
    fn test_offline_channel_is_inert() {
        let channel = SessionChannel::offline();
        assert_eq!(channel.state(), ChannelState::Closed);
        assert!(channel.session_id().is_none());

        // Sends are dropped, drains are empty, nothing panics.
        channel.send(OutboundMessage::VoiceInput {
            text: "anyone there?".to_string(),
        });
        assert!(channel.drain_inbound().is_empty());
    }

    #[tokio::test]
    async fn test_connect_failure_degrades_to_offline() {
        // Port 1 on loopback refuses immediately; the simulation must get a
        // closed channel back, not an error.
        let channel = SessionChannel::connect("http://127.0.0.1:1").await;
        assert_eq!(channel.state(), ChannelState::Closed);
    }
}
