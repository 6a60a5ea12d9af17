pub mod api;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod ownership;
pub mod reconciler;
pub mod subscription;

pub use api::{ApiError, AttemptsApi, HttpAttemptsApi};
pub use crate::config::{ApiConfig, EffectsConfig, SyncAppConfig, ViewerConfig};
pub use controller::SubmissionListController;
pub use effects::{
    Animation, Effect, EffectContext, EffectSink, EffectsDispatcher, Notification, RecordingSink,
    Sound, plan_effects,
};
pub use error::{AttemptsError, Result};
pub use reconciler::{AttemptRows, DiscardReason, Reconciliation, Transition, reconcile};
pub use subscription::SubscriptionSet;
