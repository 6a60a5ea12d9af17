pub mod attempt;
pub mod event;
pub mod verdict;

pub use attempt::{AttemptDetail, AttemptUpdate, Owner, Submission, TestCaseDetail, Viewer};
pub use event::ChannelEvent;
pub use verdict::{ParseVerdictError, VerdictCode};
