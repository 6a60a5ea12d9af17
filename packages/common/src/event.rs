use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::AttemptUpdate;

pub const LANG_CHANGE: &str = "lang-change";
pub const ATTEMPT_ADD: &str = "attempt-add";
pub const ATTEMPT_DELETE: &str = "attempt-delete";
pub const ATTEMPT_UPDATE: &str = "attempt-update";

/// Typed payload bound to a channel event name.
pub trait ChannelEvent: Serialize + DeserializeOwned {
    /// Event name used on the wire (e.g., "attempt-add").
    const NAME: &'static str;

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    fn from_payload(payload: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload)
    }
}

/// Tells the server which locale to render verdict titles in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangChange(pub String);

/// Asks the server to push updates for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptAdd(pub i32);

/// Stops pushes for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptDelete(pub i32);

impl ChannelEvent for LangChange {
    const NAME: &'static str = LANG_CHANGE;
}

impl ChannelEvent for AttemptAdd {
    const NAME: &'static str = ATTEMPT_ADD;
}

impl ChannelEvent for AttemptDelete {
    const NAME: &'static str = ATTEMPT_DELETE;
}

impl ChannelEvent for AttemptUpdate {
    const NAME: &'static str = ATTEMPT_UPDATE;
}
