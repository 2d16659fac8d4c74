use std::path::PathBuf;

use forge_logging::{forge_debug, forge_warn};

use crate::compose::compose;
use crate::item::{ItemId, ItemStatus, ProcessResult};
use crate::log_sink::LogLevel;
use crate::state::{BatchPhase, BatchRun, Candidate};
use crate::{AppState, Effect, Msg};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded(files) => {
            if files.is_empty() {
                return (state, Vec::new());
            }
            let ids = state.queue.add(files);
            forge_debug!("Queued {} file(s)", ids.len());
            state.mark_dirty();
            Vec::new()
        }
        Msg::ItemRemoved(item_id) => {
            if state.queue.remove(item_id) {
                if state.preview_item == Some(item_id) {
                    state.preview_item = None;
                }
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::QueueCleared => {
            state.queue.clear();
            state.preview_item = None;
            state.mark_dirty();
            Vec::new()
        }
        Msg::SelectionToggled(item_id) => {
            state.queue.toggle_select(item_id);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SelectAll => {
            state.queue.select_all();
            state.mark_dirty();
            Vec::new()
        }
        Msg::DeselectAll => {
            state.queue.deselect_all();
            state.mark_dirty();
            Vec::new()
        }
        Msg::FilterChanged(filter) => {
            state.queue.set_filter(filter);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BasePathChanged(path) => {
            state.base_path = path;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ConfigUpdated(patch) => {
            patch.apply(&mut state.config);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ResizeUpdated(patch) => {
            patch.apply(&mut state.config.resize);
            state.mark_dirty();
            Vec::new()
        }
        Msg::PngOptionsChanged(options) => {
            state.config.png_options = options;
            state.mark_dirty();
            Vec::new()
        }
        Msg::JpegOptionsChanged(options) => {
            state.config.jpeg_options = options;
            state.mark_dirty();
            Vec::new()
        }
        Msg::WebpOptionsChanged(options) => {
            state.config.webp_options = options;
            state.mark_dirty();
            Vec::new()
        }
        Msg::StartClicked => start_batch(&mut state),
        Msg::StopClicked => {
            stop_batch(&mut state);
            Vec::new()
        }
        Msg::ItemProgress { item_id, percent } => {
            if state.queue.update_progress(item_id, percent) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ItemProcessed { item_id, outcome } => apply_outcome(&mut state, item_id, outcome),
        Msg::PreviewRequested(item_id) => {
            state.preview_item = item_id.filter(|id| state.queue.contains(*id));
            state.mark_dirty();
            Vec::new()
        }
        Msg::PreviewFailed { item_id, message } => {
            forge_warn!("Preview for item {} failed: {}", item_id, message);
            Vec::new()
        }
        Msg::LogsVisibilityChanged(show) => {
            state.show_logs = show;
            state.mark_dirty();
            Vec::new()
        }
        Msg::LogsCleared => {
            state.logs.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::RevealOutputClicked(item_id) => {
            match state.queue.get(item_id).and_then(|item| item.result.as_ref()) {
                Some(result) => vec![Effect::RevealOutput {
                    path: PathBuf::from(&result.output_path),
                }],
                None => Vec::new(),
            }
        }
        Msg::RestoreSession(session) => {
            if state.run.is_some() {
                forge_warn!("Ignoring session restore while a batch is active");
                return (state, Vec::new());
            }
            state.restore(session);
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_batch(state: &mut AppState) -> Vec<Effect> {
    if state.run.is_some() {
        // A stopped run may still be waiting on its last call.
        forge_debug!("Start ignored: previous batch still has an item in flight");
        return Vec::new();
    }

    let candidates: Vec<Candidate> = state
        .queue
        .batch_candidates()
        .into_iter()
        .map(Candidate::from)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let count = candidates.len();
    state.phase = BatchPhase::Running;
    state.cancel_requested = false;
    state.run = Some(BatchRun {
        candidates,
        cursor: 0,
        in_flight: None,
    });
    state
        .logs
        .append(LogLevel::Info, format!("Starting batch: {count} file(s)"));
    state.mark_dirty();

    dispatch_next(state)
}

fn stop_batch(state: &mut AppState) {
    if state.run.is_none() {
        return;
    }
    state.cancel_requested = true;
    state.phase = BatchPhase::Idle;
    state.mark_dirty();
    forge_debug!("Stop requested; in-flight item {:?} will finish", state.in_flight());
}

/// Issues the next candidate, or ends the run when cancelled or exhausted.
fn dispatch_next(state: &mut AppState) -> Vec<Effect> {
    let cancelled = state.cancel_requested;
    let Some(run) = state.run.as_mut() else {
        return Vec::new();
    };
    if cancelled || run.cursor >= run.candidates.len() {
        finish_run(state);
        return Vec::new();
    }

    let index = run.cursor;
    let candidate = run.candidates[index].clone();
    run.cursor += 1;
    run.in_flight = Some(candidate.clone());

    state.current_index = index;
    // No-op when the item was removed after the snapshot.
    state
        .queue
        .update_status(candidate.id, ItemStatus::Processing, None);
    state.logs.append(
        LogLevel::Info,
        format!(
            "Processing: {} ({:.2} MB)",
            candidate.name,
            candidate.size as f64 / BYTES_PER_MB
        ),
    );
    state.mark_dirty();

    vec![Effect::ProcessItem {
        item_id: candidate.id,
        input_path: candidate.path,
        config: compose(&state.config, state.base_path.as_deref()),
    }]
}

fn apply_outcome(
    state: &mut AppState,
    item_id: ItemId,
    outcome: Result<ProcessResult, String>,
) -> Vec<Effect> {
    let candidate = state
        .run
        .as_mut()
        .and_then(|run| run.in_flight.take_if(|candidate| candidate.id == item_id));
    let Some(candidate) = candidate else {
        forge_warn!("Ignoring outcome for item {}: not in flight", item_id);
        return Vec::new();
    };

    match outcome {
        Ok(result) => {
            let message = format!(
                "{} - Saved {:.2} MB ({:.1}%)",
                candidate.name,
                result.saved_bytes() as f64 / BYTES_PER_MB,
                result.compression_ratio
            );
            state
                .queue
                .update_status(item_id, ItemStatus::Completed, Some(result));
            state.logs.append(LogLevel::Success, message);
        }
        Err(error) => {
            state.queue.update_status(item_id, ItemStatus::Error, None);
            state.logs.append(
                LogLevel::Error,
                format!("{} - Error: {}", candidate.name, error),
            );
        }
    }
    state.mark_dirty();

    dispatch_next(state)
}

fn finish_run(state: &mut AppState) {
    state.run = None;
    state.phase = BatchPhase::Idle;
    state.cancel_requested = false;

    let counts = state.queue.counts();
    state.logs.append(
        LogLevel::Success,
        format!(
            "Batch complete: {} succeeded, {} failed",
            counts.completed, counts.error
        ),
    );
    state.mark_dirty();
}
