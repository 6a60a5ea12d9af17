use std::collections::HashMap;

use common::{Submission, VerdictCode};
use tracing::{debug, info};

use crate::config::EffectsConfig;
use crate::reconciler::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Success,
    Failure,
}

/// A side effect requested by a verdict transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PlaySound(Sound),
    Animate { attempt_id: i32, animation: Animation },
    /// Judging of this row finished.
    CheckFinished(Submission),
}

/// User-facing transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectContext {
    pub is_owner: bool,
    /// The table is part of a running duel, where every verdict is celebrated.
    pub duel_in_progress: bool,
}

/// Performs effects. Implemented by the view layer.
pub trait EffectSink {
    fn perform(&mut self, effect: Effect);

    fn notify(&mut self, notification: Notification);
}

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
    pub notifications: Vec<Notification>,
}

impl RecordingSink {
    pub fn sounds(&self) -> Vec<Sound> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::PlaySound(sound) => Some(*sound),
                _ => None,
            })
            .collect()
    }

    pub fn finished(&self) -> Vec<&Submission> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::CheckFinished(row) => Some(row),
                _ => None,
            })
            .collect()
    }
}

impl EffectSink for RecordingSink {
    fn perform(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Decide which effects a transition calls for. Non-terminal codes call for none.
pub fn plan_effects(
    transition: &Transition,
    ctx: EffectContext,
    config: &EffectsConfig,
) -> Vec<Effect> {
    let row = &transition.row;
    let code = transition.current;
    if !code.is_terminal() {
        return Vec::new();
    }

    let sound_allowed = config.sound_enabled
        && (!config.owner_only_sound || ctx.is_owner || ctx.duel_in_progress);
    let mut effects = Vec::new();

    let (visible, animation, sound) = if code.is_accepted() {
        (
            row.can_view || ctx.duel_in_progress,
            Animation::Success,
            Sound::Success,
        )
    } else {
        (row.can_view, Animation::Failure, Sound::Failure)
    };

    if visible {
        effects.push(Effect::Animate {
            attempt_id: row.id,
            animation,
        });
        if sound_allowed {
            effects.push(Effect::PlaySound(sound));
        }
    }
    effects.push(Effect::CheckFinished(row.clone()));
    effects
}

/// Fires each row's terminal effects at most once per verdict code.
#[derive(Debug, Default)]
pub struct EffectsDispatcher {
    config: EffectsConfig,
    fired: HashMap<i32, VerdictCode>,
}

impl EffectsDispatcher {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            fired: HashMap::new(),
        }
    }

    /// Plan and perform the effects of `transition`. Returns how many were performed.
    pub fn dispatch(
        &mut self,
        transition: &Transition,
        ctx: EffectContext,
        sink: &mut dyn EffectSink,
    ) -> usize {
        let id = transition.id();
        let code = transition.current;
        if !code.is_terminal() {
            // Judging started over, so the next verdict is a new one.
            self.fired.remove(&id);
            return 0;
        }
        if self.fired.get(&id) == Some(&code) {
            debug!(attempt_id = id, verdict = %code, "Effects already fired");
            return 0;
        }

        let effects = plan_effects(transition, ctx, &self.config);
        self.fired.insert(id, code);
        info!(
            attempt_id = id,
            verdict = %code,
            effects = effects.len(),
            "Verdict effects"
        );

        let count = effects.len();
        for effect in effects {
            sink.perform(effect);
        }
        count
    }

    /// Let the row's verdict effects fire again. Used after a rerun and when
    /// the row leaves the table.
    pub fn reset(&mut self, id: i32) {
        self.fired.remove(&id);
    }

    pub fn last_fired(&self, id: i32) -> Option<VerdictCode> {
        self.fired.get(&id).copied()
    }
}
