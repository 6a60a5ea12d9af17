use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use attempts::{AttemptsApi, Effect, EffectSink, EffectsConfig, Notification, SubmissionListController};
use channel::{Frame, LocalChannel};
use common::{Submission, Viewer};
use console::style;
use tracing::warn;

pub struct ReplayOptions {
    pub rows: Vec<Submission>,
    /// One text frame per line, as captured from the socket.
    pub frames: Vec<String>,
    pub viewer: Viewer,
    pub duel: bool,
    pub effects: EffectsConfig,
    /// Print effects as they fire.
    pub echo: bool,
}

pub struct ReplayReport {
    pub rows: Vec<Submission>,
    pub effects: Vec<Effect>,
    /// Everything the client sent, including the teardown deletes.
    pub sent: Vec<Frame>,
    pub skipped_lines: usize,
}

/// Sink that prints each effect and keeps it for the report.
struct ConsoleSink {
    echo: bool,
    effects: Vec<Effect>,
}

impl EffectSink for ConsoleSink {
    fn perform(&mut self, effect: Effect) {
        if self.echo {
            println!("{} {}", style("effect").cyan(), describe_effect(&effect));
        }
        self.effects.push(effect);
    }

    fn notify(&mut self, notification: Notification) {
        if self.echo {
            match &notification {
                Notification::Info(message) => println!("{} {message}", style("info").green()),
                Notification::Error(message) => println!("{} {message}", style("error").red()),
            }
        }
    }
}

pub fn describe_effect(effect: &Effect) -> String {
    match effect {
        Effect::PlaySound(sound) => format!("sound {sound:?}"),
        Effect::Animate {
            attempt_id,
            animation,
        } => format!("animate #{attempt_id} {animation:?}"),
        Effect::CheckFinished(row) => format!("finished #{} {}", row.id, row.verdict_code),
    }
}

pub fn load_rows(path: &Path) -> Result<Vec<Submission>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rows from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid rows in {}", path.display()))
}

pub fn load_frames(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Run the recorded frames through a live controller.
pub fn replay(api: Arc<dyn AttemptsApi>, options: ReplayOptions) -> ReplayReport {
    let (channel, mut peer) = LocalChannel::pair();
    let sink = ConsoleSink {
        echo: options.echo,
        effects: Vec::new(),
    };
    let mut controller = SubmissionListController::new(
        Arc::new(channel),
        api,
        options.viewer,
        options.effects,
        sink,
    );
    controller.set_duel_in_progress(options.duel);
    controller.set_rows(options.rows);

    let mut skipped_lines = 0;
    for (index, line) in options.frames.iter().enumerate() {
        match peer.push_text(line) {
            Ok(_) => {
                controller.drain();
            }
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed frame");
                skipped_lines += 1;
            }
        }
    }

    let rows = controller.rows().as_slice().to_vec();
    let effects = std::mem::take(&mut controller.sink_mut().effects);
    drop(controller);

    ReplayReport {
        rows,
        effects,
        sent: peer.drain_sent(),
        skipped_lines,
    }
}
