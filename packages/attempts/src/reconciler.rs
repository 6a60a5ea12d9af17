use std::collections::HashSet;

use common::{AttemptUpdate, Submission, VerdictCode};
use tracing::debug;

/// A push that changed a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The row after the update.
    pub row: Submission,
    pub previous: VerdictCode,
    pub current: VerdictCode,
}

impl Transition {
    pub fn id(&self) -> i32 {
        self.row.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// No row with that id is rendered.
    UnknownId,
    /// The update was addressed to a different row.
    IdMismatch,
    /// The update would move the row back along `InQueue -> Running -> terminal`.
    Regression {
        current: VerdictCode,
        incoming: VerdictCode,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Applied(Transition),
    Discarded(DiscardReason),
}

/// Compute the effect of `update` on `row` without mutating anything.
pub fn reconcile(row: &Submission, update: &AttemptUpdate) -> Reconciliation {
    if row.id != update.id {
        return Reconciliation::Discarded(DiscardReason::IdMismatch);
    }

    let previous = row.verdict_code;
    let incoming = update.verdict_code;
    if incoming.stage() < previous.stage() {
        return Reconciliation::Discarded(DiscardReason::Regression {
            current: previous,
            incoming,
        });
    }

    let mut next = row.clone();
    next.verdict_code = incoming;
    next.verdict_title = if update.verdict_title.is_empty() {
        incoming.default_title().to_string()
    } else {
        update.verdict_title.clone()
    };
    next.test_case_number = update.test_case_number;
    next.time = update.time;
    next.memory = update.memory;
    next.balls = update.balls;

    Reconciliation::Applied(Transition {
        row: next,
        previous,
        current: incoming,
    })
}

/// Local reset after a successful rerun command: back to the queue, progress cleared.
pub fn reset_for_rerun(row: &mut Submission) {
    row.verdict_code = VerdictCode::InQueue;
    row.verdict_title = VerdictCode::InQueue.default_title().to_string();
    row.test_case_number = None;
    row.time = None;
    row.memory = None;
    row.balls = None;
}

/// The rendered rows, in display order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct AttemptRows {
    rows: Vec<Submission>,
}

impl AttemptRows {
    pub fn new(rows: Vec<Submission>) -> Self {
        let mut table = Self::default();
        table.replace(rows);
        table
    }

    /// Swap in a new row set, keeping the first of any duplicated id.
    /// Returns the ids that are no longer present.
    pub fn replace(&mut self, rows: Vec<Submission>) -> Vec<i32> {
        let mut seen = HashSet::new();
        let next: Vec<Submission> = rows.into_iter().filter(|r| seen.insert(r.id)).collect();
        let removed = self
            .rows
            .iter()
            .map(|r| r.id)
            .filter(|id| !seen.contains(id))
            .collect();
        self.rows = next;
        removed
    }

    /// Append a row. Returns false, leaving the table unchanged, if the id is present.
    pub fn insert(&mut self, row: Submission) -> bool {
        if self.contains(row.id) {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn remove(&mut self, id: i32) -> Option<Submission> {
        let pos = self.rows.iter().position(|r| r.id == id)?;
        Some(self.rows.remove(pos))
    }

    pub fn clear(&mut self) -> Vec<Submission> {
        std::mem::take(&mut self.rows)
    }

    pub fn get(&self, id: i32) -> Option<&Submission> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut Submission> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.iter().map(|r| r.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Submission> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[Submission] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Locate the addressed row and apply the update to it.
    pub fn apply(&mut self, update: &AttemptUpdate) -> Reconciliation {
        let Some(row) = self.get_mut(update.id) else {
            debug!(attempt_id = update.id, "Update for a row that is not rendered");
            return Reconciliation::Discarded(DiscardReason::UnknownId);
        };

        let outcome = reconcile(row, update);
        match &outcome {
            Reconciliation::Applied(transition) => {
                *row = transition.row.clone();
                debug!(
                    attempt_id = update.id,
                    previous = %transition.previous,
                    current = %transition.current,
                    "Applied update"
                );
            }
            Reconciliation::Discarded(reason) => {
                debug!(attempt_id = update.id, ?reason, "Discarded stale update");
            }
        }
        outcome
    }
}
