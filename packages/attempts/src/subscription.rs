use std::collections::BTreeSet;
use std::sync::Arc;

use channel::{RealtimeChannel, RealtimeChannelExt};
use common::event::{AttemptAdd, AttemptDelete, LangChange};
use tracing::debug;

/// Keeps the server's push set equal to the set of rendered attempt ids.
pub struct SubscriptionSet {
    channel: Arc<dyn RealtimeChannel>,
    subscribed: BTreeSet<i32>,
    locale: Option<String>,
}

impl SubscriptionSet {
    pub fn new(channel: Arc<dyn RealtimeChannel>) -> Self {
        Self {
            channel,
            subscribed: BTreeSet::new(),
            locale: None,
        }
    }

    /// Replace the rendered set.
    ///
    /// Emits `lang-change` first, then `attempt-delete` for ids that left, then
    /// `attempt-add` for ids that appeared, in the order given.
    pub fn assign<I>(&mut self, ids: I, locale: &str)
    where
        I: IntoIterator<Item = i32>,
    {
        self.channel.emit(&LangChange(locale.to_string()));
        self.locale = Some(locale.to_string());

        let mut next = Vec::new();
        let mut next_set = BTreeSet::new();
        for id in ids {
            if next_set.insert(id) {
                next.push(id);
            }
        }

        let stale: Vec<i32> = self.subscribed.difference(&next_set).copied().collect();
        for id in stale {
            self.remove(id);
        }
        for id in next {
            self.add(id);
        }
    }

    /// Subscribe one id. Returns false if it was already subscribed.
    pub fn add(&mut self, id: i32) -> bool {
        if !self.subscribed.insert(id) {
            return false;
        }
        debug!(attempt_id = id, "Subscribing");
        self.channel.emit(&AttemptAdd(id));
        true
    }

    /// Unsubscribe one id. Returns false if it was not subscribed.
    pub fn remove(&mut self, id: i32) -> bool {
        if !self.subscribed.remove(&id) {
            return false;
        }
        debug!(attempt_id = id, "Unsubscribing");
        self.channel.emit(&AttemptDelete(id));
        true
    }

    /// Unsubscribe everything. Returns how many ids were dropped.
    pub fn clear(&mut self) -> usize {
        let ids = std::mem::take(&mut self.subscribed);
        for &id in &ids {
            self.channel.emit(&AttemptDelete(id));
        }
        if !ids.is_empty() {
            debug!(count = ids.len(), "Cleared subscriptions");
        }
        ids.len()
    }

    /// Announce a new locale. Returns false if it did not change.
    pub fn set_locale(&mut self, locale: &str) -> bool {
        if self.locale.as_deref() == Some(locale) {
            return false;
        }
        self.channel.emit(&LangChange(locale.to_string()));
        self.locale = Some(locale.to_string());
        true
    }

    pub fn contains(&self, id: i32) -> bool {
        self.subscribed.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.subscribed.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }
}
