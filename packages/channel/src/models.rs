use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use common::ChannelEvent;
use futures::Stream;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tracing::debug;

/// A single shared real-time connection.
///
/// `send` never blocks and never reports delivery: the protocol on top must
/// tolerate drops and reordering. Reconnects are the implementor's concern.
pub trait RealtimeChannel: Send + Sync {
    /// Fire-and-forget an event to the server.
    fn send(&self, event: &str, payload: serde_json::Value);

    /// Register a listener for `event`. Every listener receives every frame,
    /// in arrival order.
    fn listen(&self, event: &str) -> UnboundedReceiver<serde_json::Value>;
}

/// Typed helpers over any [`RealtimeChannel`], including trait objects.
pub trait RealtimeChannelExt: RealtimeChannel {
    fn on<T: DeserializeOwned>(&self, event: &str) -> Subscription<T> {
        Subscription::new(event, self.listen(event))
    }

    fn on_event<E: ChannelEvent>(&self) -> Subscription<E> {
        self.on(E::NAME)
    }

    fn emit<E: ChannelEvent>(&self, event: &E) {
        self.send(E::NAME, event.to_payload());
    }
}

impl<C: RealtimeChannel + ?Sized> RealtimeChannelExt for C {}

/// Stream of parsed payloads for one event name.
///
/// Payloads that fail to parse as `T` are skipped; they never end the stream.
pub struct Subscription<T> {
    event: String,
    rx: UnboundedReceiver<serde_json::Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub fn new(event: impl Into<String>, rx: UnboundedReceiver<serde_json::Value>) -> Self {
        Self {
            event: event.into(),
            rx,
            _marker: PhantomData,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    fn parse(&self, payload: serde_json::Value) -> Option<T> {
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(event = %self.event, error = %e, "Dropping malformed payload");
                None
            }
        }
    }

    /// Next already-delivered payload, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(payload) => {
                    if let Some(value) = self.parse(payload) {
                        return Some(value);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Wait for the next payload. Returns None once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            let payload = self.rx.recv().await?;
            if let Some(value) = self.parse(payload) {
                return Some(value);
            }
        }
    }
}

impl<T: DeserializeOwned> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            match this.rx.poll_recv(cx) {
                Poll::Ready(Some(payload)) => {
                    if let Some(value) = this.parse(payload) {
                        return Poll::Ready(Some(value));
                    }
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
