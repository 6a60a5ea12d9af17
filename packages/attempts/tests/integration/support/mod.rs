use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use attempts::{ApiError, AttemptsApi, EffectsConfig, RecordingSink, SubmissionListController};
use channel::{Frame, LocalChannel, PeerEnd};
use common::{AttemptDetail, AttemptUpdate, Owner, Submission, VerdictCode, Viewer};

/// In-memory stand-in for the REST service.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    details: Mutex<HashMap<i32, AttemptDetail>>,
}

impl FakeApi {
    /// Make every call to `op` fail with a 500.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn add_detail(&self, detail: AttemptDetail) {
        self.details
            .lock()
            .unwrap()
            .insert(detail.attempt.id, detail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str, id: i32) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("{op} {id}"));
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::Status {
                status: 500,
                message: "judge is on fire".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttemptsApi for FakeApi {
    async fn attempt(&self, id: i32) -> Result<AttemptDetail, ApiError> {
        self.record("attempt", id)?;
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: "Not Found".into(),
            })
    }

    async fn rerun(&self, id: i32) -> Result<(), ApiError> {
        self.record("rerun", id)
    }

    async fn purchase_view(&self, id: i32) -> Result<(), ApiError> {
        self.record("purchase_view", id)
    }

    async fn purchase_test_view(&self, id: i32) -> Result<(), ApiError> {
        self.record("purchase_test_view", id)
    }
}

pub struct TestTable {
    pub controller: SubmissionListController<RecordingSink>,
    pub peer: PeerEnd,
    pub api: Arc<FakeApi>,
}

impl TestTable {
    pub fn new(viewer: Viewer) -> Self {
        Self::with_effects(viewer, EffectsConfig::default())
    }

    pub fn with_effects(viewer: Viewer, effects: EffectsConfig) -> Self {
        let (channel, peer) = LocalChannel::pair();
        let api = Arc::new(FakeApi::default());
        let controller = SubmissionListController::new(
            Arc::new(channel),
            api.clone(),
            viewer,
            effects,
            RecordingSink::default(),
        );
        Self {
            controller,
            peer,
            api,
        }
    }

    /// Push an update from the server and let the controller process it.
    pub fn push(&mut self, update: AttemptUpdate) {
        self.peer.push_event(&update);
        self.controller.drain();
    }

    pub fn sent(&mut self) -> Vec<Frame> {
        self.peer.drain_sent()
    }

    pub fn code(&self, id: i32) -> VerdictCode {
        self.controller.row(id).unwrap().verdict_code
    }
}

pub fn alice() -> Viewer {
    Viewer::user("alice", "en")
}

pub fn row(id: i32, author: &str, can_view: bool) -> Submission {
    let mut row = Submission::new(id, Owner::user(author));
    row.can_view = can_view;
    row.language = "rust".into();
    row
}

pub fn update(id: i32, code: VerdictCode) -> AttemptUpdate {
    AttemptUpdate::status(id, code)
}

pub fn count(frames: &[Frame], event: &str) -> usize {
    frames.iter().filter(|f| f.event == event).count()
}
