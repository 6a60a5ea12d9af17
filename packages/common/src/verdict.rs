use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Judge status of an attempt.
///
/// `InQueue` and `Running` are the only non-terminal codes. Everything else is a
/// final verdict that only an explicit rerun can leave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VerdictCode {
    /// Waiting for a judge.
    #[default]
    InQueue,
    /// Test cases are being executed.
    Running,
    /// All test cases passed.
    Accepted,
    /// Output did not match the expected output.
    WrongAnswer,
    /// Exceeded the time limit.
    TimeLimitExceeded,
    /// Exceeded the memory limit.
    MemoryLimitExceeded,
    /// Program crashed or exited with a non-zero code.
    RuntimeError,
    /// Failed to compile.
    CompilationError,
    /// Refused by the judge before running (banned construct, wrong language).
    Rejected,
    /// Some test groups earned points.
    PartialSolution,
    /// Previously accepted, broken by a hack during a contest.
    Hacked,
    /// Internal judge failure.
    JudgementFailed,
    /// The problem has no usable checker.
    CheckerNotFound,
    /// Shown as accepted to the author, re-checked later.
    FakeAccepted,
}

impl VerdictCode {
    /// Returns true if judging is complete for this code.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InQueue | Self::Running)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Position along `InQueue -> Running -> terminal`.
    ///
    /// All terminal codes share the last stage, so a terminal-to-terminal change
    /// (say Accepted to Hacked) is not a regression.
    pub fn stage(&self) -> u8 {
        match self {
            Self::InQueue => 0,
            Self::Running => 1,
            _ => 2,
        }
    }

    /// All possible codes.
    pub const ALL: &'static [VerdictCode] = &[
        Self::InQueue,
        Self::Running,
        Self::Accepted,
        Self::WrongAnswer,
        Self::TimeLimitExceeded,
        Self::MemoryLimitExceeded,
        Self::RuntimeError,
        Self::CompilationError,
        Self::Rejected,
        Self::PartialSolution,
        Self::Hacked,
        Self::JudgementFailed,
        Self::CheckerNotFound,
        Self::FakeAccepted,
    ];

    /// All terminal codes.
    pub const TERMINAL: &'static [VerdictCode] = &[
        Self::Accepted,
        Self::WrongAnswer,
        Self::TimeLimitExceeded,
        Self::MemoryLimitExceeded,
        Self::RuntimeError,
        Self::CompilationError,
        Self::Rejected,
        Self::PartialSolution,
        Self::Hacked,
        Self::JudgementFailed,
        Self::CheckerNotFound,
        Self::FakeAccepted,
    ];

    /// Returns the wire representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InQueue => "InQueue",
            Self::Running => "Running",
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "WrongAnswer",
            Self::TimeLimitExceeded => "TimeLimitExceeded",
            Self::MemoryLimitExceeded => "MemoryLimitExceeded",
            Self::RuntimeError => "RuntimeError",
            Self::CompilationError => "CompilationError",
            Self::Rejected => "Rejected",
            Self::PartialSolution => "PartialSolution",
            Self::Hacked => "Hacked",
            Self::JudgementFailed => "JudgementFailed",
            Self::CheckerNotFound => "CheckerNotFound",
            Self::FakeAccepted => "FakeAccepted",
        }
    }

    /// English label used until the server sends a localized title.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::InQueue => "In queue",
            Self::Running => "Running",
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong answer",
            Self::TimeLimitExceeded => "Time limit exceeded",
            Self::MemoryLimitExceeded => "Memory limit exceeded",
            Self::RuntimeError => "Runtime error",
            Self::CompilationError => "Compilation error",
            Self::Rejected => "Rejected",
            Self::PartialSolution => "Partial solution",
            Self::Hacked => "Hacked",
            Self::JudgementFailed => "Judgement failed",
            Self::CheckerNotFound => "Checker not found",
            Self::FakeAccepted => "Accepted",
        }
    }
}

impl fmt::Display for VerdictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error when parsing an unknown verdict code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid verdict code '{invalid}'")]
pub struct ParseVerdictError {
    invalid: String,
}

impl FromStr for VerdictCode {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|code| code.as_str() == s)
            .copied()
            .ok_or_else(|| ParseVerdictError {
                invalid: s.to_string(),
            })
    }
}
