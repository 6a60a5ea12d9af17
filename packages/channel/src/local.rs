use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::ChannelEvent;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::frame::Frame;
use crate::models::RealtimeChannel;

type Listeners = DashMap<String, Vec<UnboundedSender<serde_json::Value>>>;

struct Shared {
    listeners: Listeners,
    closed: AtomicBool,
}

/// Client side of an in-process channel.
///
/// Pair it with a [`PeerEnd`] that plays the server: a transport adapter pumps
/// frames between the peer and a socket, tests drive the peer directly.
#[derive(Clone)]
pub struct LocalChannel {
    shared: Arc<Shared>,
    outbound: UnboundedSender<Frame>,
}

/// Server side of a [`LocalChannel`].
pub struct PeerEnd {
    shared: Arc<Shared>,
    sent: UnboundedReceiver<Frame>,
}

impl LocalChannel {
    pub fn pair() -> (LocalChannel, PeerEnd) {
        let shared = Arc::new(Shared {
            listeners: DashMap::new(),
            closed: AtomicBool::new(false),
        });
        let (outbound, sent) = mpsc::unbounded_channel();
        (
            LocalChannel {
                shared: Arc::clone(&shared),
                outbound,
            },
            PeerEnd { shared, sent },
        )
    }

    /// Number of live listeners for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.shared
            .listeners
            .get(event)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

impl RealtimeChannel for LocalChannel {
    fn send(&self, event: &str, payload: serde_json::Value) {
        if self.outbound.send(Frame::new(event, payload)).is_err() {
            warn!(event, "Peer is gone, dropping outgoing frame");
        }
    }

    fn listen(&self, event: &str) -> UnboundedReceiver<serde_json::Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.shared.closed.load(Ordering::Acquire) {
            return rx;
        }
        self.shared
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(tx);
        rx
    }
}

impl PeerEnd {
    /// Deliver a payload to every listener of `event`. Returns how many received it.
    pub fn push(&self, event: &str, payload: serde_json::Value) -> usize {
        let Some(mut senders) = self.shared.listeners.get_mut(event) else {
            debug!(event, "No listeners for pushed frame");
            return 0;
        };
        senders.retain(|tx| tx.send(payload.clone()).is_ok());
        senders.len()
    }

    pub fn push_event<E: ChannelEvent>(&self, event: &E) -> usize {
        self.push(E::NAME, event.to_payload())
    }

    /// Decode a text frame, as read from a socket, and deliver it.
    pub fn push_text(&self, text: &str) -> Result<usize, ChannelError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(ChannelError::Closed);
        }
        let frame = Frame::decode(text)?;
        Ok(self.push(&frame.event, frame.payload))
    }

    /// Wait for the next frame the client sent.
    pub async fn next_sent(&mut self) -> Option<Frame> {
        self.sent.recv().await
    }

    /// Everything the client has sent so far.
    pub fn drain_sent(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            match self.sent.try_recv() {
                Ok(frame) => frames.push(frame),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return frames,
            }
        }
    }

    /// Disconnect: every client subscription ends after its buffered payloads.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.listeners.clear();
    }
}

impl Drop for PeerEnd {
    fn drop(&mut self) {
        self.close();
    }
}
