use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::VerdictCode;

/// Author of an attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Owner {
    User {
        username: String,
    },
    Team {
        #[serde(default)]
        name: String,
        members: BTreeSet<String>,
    },
}

impl Owner {
    pub fn user(username: impl Into<String>) -> Self {
        Self::User {
            username: username.into(),
        }
    }

    pub fn team<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Team {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// A judged code attempt as shown in an attempts table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i32,
    #[serde(default)]
    pub verdict_code: VerdictCode,
    /// Localized label for `verdict_code`, rendered by the server.
    #[serde(default)]
    pub verdict_title: String,
    pub test_case_number: Option<i32>,
    /// Milliseconds.
    pub time: Option<i32>,
    /// Kilobytes.
    pub memory: Option<i32>,
    /// Points earned (partial score).
    pub balls: Option<i32>,
    pub owner: Owner,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_test_view: bool,
    #[serde(default)]
    pub language: String,
    pub problem: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// A freshly queued attempt with no progress yet.
    pub fn new(id: i32, owner: Owner) -> Self {
        Self {
            id,
            verdict_code: VerdictCode::InQueue,
            verdict_title: VerdictCode::InQueue.default_title().to_string(),
            test_case_number: None,
            time: None,
            memory: None,
            balls: None,
            owner,
            can_view: false,
            can_test_view: false,
            language: String::new(),
            problem: None,
            created_at: None,
        }
    }
}

/// Push payload of the `attempt-update` event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptUpdate {
    pub id: i32,
    pub verdict_code: VerdictCode,
    #[serde(default)]
    pub verdict_title: String,
    pub test_case_number: Option<i32>,
    pub time: Option<i32>,
    pub memory: Option<i32>,
    pub balls: Option<i32>,
}

impl AttemptUpdate {
    /// Update carrying only a code, with the default title and no progress.
    pub fn status(id: i32, verdict_code: VerdictCode) -> Self {
        Self {
            id,
            verdict_code,
            verdict_title: verdict_code.default_title().to_string(),
            test_case_number: None,
            time: None,
            memory: None,
            balls: None,
        }
    }
}

/// Per-test result inside an attempt detail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDetail {
    pub number: i32,
    pub verdict_code: VerdictCode,
    pub time: Option<i32>,
    pub memory: Option<i32>,
    pub balls: Option<i32>,
}

/// Full attempt as returned by `GET /attempts/{id}`, including restricted fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetail {
    #[serde(flatten)]
    pub attempt: Submission,
    pub source_code: Option<String>,
    /// Compiler or checker output.
    pub error_log: Option<String>,
    #[serde(default)]
    pub tests: Vec<TestCaseDetail>,
}

/// The user looking at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// None for anonymous visitors.
    pub username: Option<String>,
    pub locale: String,
}

impl Viewer {
    pub fn user(username: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            locale: locale.into(),
        }
    }

    pub fn anonymous(locale: impl Into<String>) -> Self {
        Self {
            username: None,
            locale: locale.into(),
        }
    }
}
