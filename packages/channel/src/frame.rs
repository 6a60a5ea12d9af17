use common::ChannelEvent;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// One event on the wire: `{"event": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }

    pub fn from_event<E: ChannelEvent>(event: &E) -> Self {
        Self::new(E::NAME, event.to_payload())
    }

    /// Parse the payload as `E`, failing if the name or shape does not match.
    pub fn parse<E: ChannelEvent>(&self) -> Result<E, ChannelError> {
        if self.event != E::NAME {
            return Err(ChannelError::Malformed(serde::de::Error::custom(format!(
                "expected event '{}', got '{}'",
                E::NAME,
                self.event
            ))));
        }
        Ok(E::from_payload(self.payload.clone())?)
    }

    pub fn encode(&self) -> Result<String, ChannelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, ChannelError> {
        Ok(serde_json::from_str(text)?)
    }
}
