use std::sync::Arc;

use channel::{RealtimeChannel, RealtimeChannelExt, Subscription};
use common::{AttemptDetail, AttemptUpdate, Submission, Viewer};
use tracing::{debug, info, warn};

use crate::api::{ApiError, AttemptsApi};
use crate::config::EffectsConfig;
use crate::effects::{EffectContext, EffectSink, EffectsDispatcher, Notification};
use crate::error::{AttemptsError, Result};
use crate::ownership::{is_owner, may_view_detail};
use crate::reconciler::{AttemptRows, Reconciliation, Transition, reset_for_rerun};
use crate::subscription::SubscriptionSet;

/// Drives one attempts table: rows, subscriptions, pushes, effects and row actions.
///
/// All mutation goes through `&mut self`, so a single task owns the table.
/// Dropping the controller unsubscribes every row.
pub struct SubmissionListController<S: EffectSink> {
    api: Arc<dyn AttemptsApi>,
    viewer: Viewer,
    duel_in_progress: bool,
    rows: AttemptRows,
    subscriptions: SubscriptionSet,
    updates: Subscription<AttemptUpdate>,
    effects: EffectsDispatcher,
    sink: S,
}

impl<S: EffectSink> SubmissionListController<S> {
    pub fn new(
        channel: Arc<dyn RealtimeChannel>,
        api: Arc<dyn AttemptsApi>,
        viewer: Viewer,
        effects: EffectsConfig,
        sink: S,
    ) -> Self {
        let updates = channel.on_event::<AttemptUpdate>();
        Self {
            api,
            viewer,
            duel_in_progress: false,
            rows: AttemptRows::default(),
            subscriptions: SubscriptionSet::new(channel),
            updates,
            effects: EffectsDispatcher::new(effects),
            sink,
        }
    }

    /// Mark the table as part of a running duel.
    pub fn set_duel_in_progress(&mut self, in_progress: bool) {
        self.duel_in_progress = in_progress;
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn rows(&self) -> &AttemptRows {
        &self.rows
    }

    pub fn row(&self, id: i32) -> Option<&Submission> {
        self.rows.get(id)
    }

    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Replace the rendered rows (initial load, page or filter change).
    pub fn set_rows(&mut self, rows: Vec<Submission>) {
        for id in self.rows.replace(rows) {
            self.effects.reset(id);
        }
        // A kept row whose snapshot moved away from the fired verdict is on a new cycle.
        for row in self.rows.iter() {
            if self.effects.last_fired(row.id) != Some(row.verdict_code) {
                self.effects.reset(row.id);
            }
        }
        self.subscriptions
            .assign(self.rows.ids().collect::<Vec<_>>(), &self.viewer.locale);
        info!(rows = self.rows.len(), "Attempts table loaded");
    }

    /// Add a single row, e.g. an attempt the viewer just submitted.
    pub fn mount_row(&mut self, row: Submission) -> bool {
        let id = row.id;
        if !self.rows.insert(row) {
            return false;
        }
        self.subscriptions.add(id);
        true
    }

    /// Remove a row now; the server is told to stop pushing for it.
    pub fn unmount_row(&mut self, id: i32) -> Option<Submission> {
        let row = self.rows.remove(id)?;
        self.effects.reset(id);
        self.subscriptions.remove(id);
        Some(row)
    }

    pub fn set_locale(&mut self, locale: &str) {
        self.viewer.locale = locale.to_string();
        self.subscriptions.set_locale(locale);
    }

    /// Reconcile one push and fire whatever effects it calls for.
    pub fn handle_update(&mut self, update: AttemptUpdate) -> Option<Transition> {
        match self.rows.apply(&update) {
            Reconciliation::Applied(transition) => {
                let ctx = EffectContext {
                    is_owner: is_owner(&self.viewer, &transition.row),
                    duel_in_progress: self.duel_in_progress,
                };
                self.effects.dispatch(&transition, ctx, &mut self.sink);
                Some(transition)
            }
            Reconciliation::Discarded(_) => None,
        }
    }

    /// Apply every push that has already arrived. Returns how many were received.
    pub fn drain(&mut self) -> usize {
        let mut received = 0;
        while let Some(update) = self.updates.try_next() {
            self.handle_update(update);
            received += 1;
        }
        received
    }

    /// Apply pushes as they arrive until the channel closes. The rows keep
    /// their last known state afterwards.
    pub async fn run(&mut self) {
        while let Some(update) = self.updates.recv().await {
            self.handle_update(update);
        }
        info!("Attempt updates channel closed");
    }

    /// Send the attempt back to the judge. The row is reset only once the server agrees.
    pub async fn rerun(&mut self, id: i32) -> Result<()> {
        self.require_row(id)?;
        let api = Arc::clone(&self.api);
        if let Err(e) = api.rerun(id).await {
            return Err(self.surface("rerun", id, e));
        }

        match self.rows.get_mut(id) {
            Some(row) => {
                reset_for_rerun(row);
                self.effects.reset(id);
                info!(attempt_id = id, "Attempt queued for rerun");
                self.sink
                    .notify(Notification::Info(format!("Attempt {id} queued for rerun")));
            }
            None => debug!(attempt_id = id, "Rerun finished after the row was removed"),
        }
        Ok(())
    }

    /// Buy access to the attempt's source and verdict.
    pub async fn purchase_view(&mut self, id: i32) -> Result<()> {
        self.require_row(id)?;
        let api = Arc::clone(&self.api);
        if let Err(e) = api.purchase_view(id).await {
            return Err(self.surface("purchase view of", id, e));
        }
        if let Some(row) = self.rows.get_mut(id) {
            row.can_view = true;
        }
        self.sink
            .notify(Notification::Info(format!("Attempt {id} unlocked")));
        Ok(())
    }

    /// Buy access to the attempt's test data.
    pub async fn purchase_test_view(&mut self, id: i32) -> Result<()> {
        self.require_row(id)?;
        let api = Arc::clone(&self.api);
        if let Err(e) = api.purchase_test_view(id).await {
            return Err(self.surface("purchase tests of", id, e));
        }
        if let Some(row) = self.rows.get_mut(id) {
            row.can_test_view = true;
        }
        self.sink
            .notify(Notification::Info(format!("Tests of attempt {id} unlocked")));
        Ok(())
    }

    /// Fetch the full attempt for the detail dialog.
    pub async fn open_detail(&mut self, id: i32) -> Result<AttemptDetail> {
        let row = self.require_row(id)?;
        if !may_view_detail(&self.viewer, row) {
            self.sink.notify(Notification::Error(format!(
                "You cannot view attempt {id}"
            )));
            return Err(AttemptsError::Forbidden(id));
        }

        let api = Arc::clone(&self.api);
        match api.attempt(id).await {
            Ok(detail) => Ok(detail),
            Err(e) => Err(self.surface("load", id, e)),
        }
    }

    /// Unsubscribe and drop every row.
    pub fn teardown(&mut self) {
        self.subscriptions.clear();
        for row in self.rows.clear() {
            self.effects.reset(row.id);
        }
    }

    fn require_row(&self, id: i32) -> Result<&Submission> {
        self.rows.get(id).ok_or(AttemptsError::NotFound(id))
    }

    fn surface(&mut self, action: &str, id: i32, error: ApiError) -> AttemptsError {
        warn!(attempt_id = id, error = %error, "Could not {action} attempt");
        self.sink.notify(Notification::Error(format!(
            "Could not {action} attempt {id}: {error}"
        )));
        AttemptsError::Api(error)
    }
}

impl<S: EffectSink> Drop for SubmissionListController<S> {
    fn drop(&mut self) {
        self.subscriptions.clear();
    }
}
