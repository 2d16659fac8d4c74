use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use forge_core::{
    update, AppState, AppViewModel, ConfigPatch, FileInfo, ItemId, ItemStatus, LogEntry, LogLevel,
    Msg, OutputFormat, ProcessConfig, ResizeModeKind, ResizePatch,
};
use forge_engine::{
    is_supported, CommandProcessingService, EngineSettings, FileSource, FsFileSource,
    ProcessingService,
};
use forge_logging::{forge_debug, forge_info, forge_warn};

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::persistence::{default_state_dir, SessionStore};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the state, runs effects and pushes view snapshots to subscribers.
pub struct Orchestrator {
    state: AppState,
    effects: EffectRunner,
    subscribers: Vec<mpsc::Sender<AppViewModel>>,
}

impl Orchestrator {
    pub fn new(state: AppState, effects: EffectRunner) -> Self {
        Self {
            state,
            effects,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// New subscribers get the current view straight away.
    pub fn subscribe(&mut self) -> mpsc::Receiver<AppViewModel> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(self.state.view());
        self.subscribers.push(tx);
        rx
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let was_dirty = state.consume_dirty();
            self.state = state;

            if was_dirty {
                let view = self.state.view();
                self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
            }
            inbox.extend(self.effects.run(effects));
        }
    }

    pub fn start(&mut self) {
        self.dispatch(Msg::StartClicked);
    }

    pub fn stop(&mut self) {
        self.dispatch(Msg::StopClicked);
    }

    pub fn shutdown(&mut self) {
        self.effects.shutdown();
    }

    /// Feeds one engine event back into the state if it arrives within `wait`.
    ///
    /// When the engine is gone the in-flight item is failed, so the run can
    /// drain its remaining candidates instead of waiting forever.
    pub fn pump(&mut self, wait: Duration) -> bool {
        match self.effects.next_msg(wait) {
            Ok(Some(msg)) => {
                self.dispatch(msg);
                true
            }
            Ok(None) => false,
            Err(closed) => match self.state.in_flight() {
                Some(item_id) => {
                    forge_warn!("Failing item {}: {}", item_id, closed);
                    self.dispatch(Msg::ItemProcessed {
                        item_id,
                        outcome: Err(closed.to_string()),
                    });
                    true
                }
                None => false,
            },
        }
    }

    /// Pumps engine events until no processing call is outstanding.
    ///
    /// With `stop_on_error` the run is stopped once an item fails; the item
    /// already in flight at that point still finishes.
    pub fn run_until_idle(&mut self, stop_on_error: bool) {
        let errors_before = self.state.queue().counts().error;
        while self.state.in_flight().is_some() {
            self.pump(POLL_INTERVAL);
            if stop_on_error
                && self.state.is_processing()
                && self.state.queue().counts().error > errors_before
            {
                forge_info!("Stopping batch after a failed item");
                self.stop();
            }
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    forge_logging::initialize(cli.log_destination(), cli.log_level());

    let state_dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);
    let sessions = SessionStore::new(&state_dir);

    let service: Arc<dyn ProcessingService> = Arc::new(
        CommandProcessingService::new(&cli.processor).with_args(cli.processor_args.clone()),
    );
    let settings = EngineSettings {
        process_timeout: Duration::from_secs(cli.timeout_secs),
    };
    let mut orchestrator =
        Orchestrator::new(AppState::new(), EffectRunner::new(service, settings));

    if !cli.fresh {
        if let Some(session) = sessions.load() {
            orchestrator.dispatch(Msg::RestoreSession(session));
        }
    }
    for msg in config_msgs(&cli, orchestrator.state().config()) {
        orchestrator.dispatch(msg);
    }

    let files = scan_inputs(&FsFileSource, &cli.inputs, cli.recursive, cli.max_depth)?;
    if let Some(base) = base_path(&cli.inputs) {
        orchestrator.dispatch(Msg::BasePathChanged(Some(base)));
    }
    if !files.is_empty() {
        orchestrator.dispatch(Msg::FilesAdded(files));
    }
    if let Some(filter) = cli.filter {
        orchestrator.dispatch(Msg::FilterChanged(filter.into()));
    }
    if orchestrator.state().queue().is_empty() {
        bail!("nothing queued; pass image files or directories");
    }

    let reporter = spawn_reporter(orchestrator.subscribe());
    orchestrator.start();
    orchestrator.run_until_idle(cli.stop_on_error);

    if cli.reveal {
        if let Some(item_id) = last_completed(orchestrator.state()) {
            orchestrator.dispatch(Msg::RevealOutputClicked(item_id));
        }
    }

    sessions.save(&orchestrator.state().persisted_session());
    forge_info!("Session saved to {:?}", sessions.path());

    let counts = orchestrator.state().queue().counts();
    orchestrator.shutdown();
    // Dropping the orchestrator closes the subscriber channel.
    drop(orchestrator);
    let _ = reporter.join();

    println!(
        "{} completed, {} failed, {} pending",
        counts.completed, counts.error, counts.pending
    );
    Ok(())
}

/// Messages that overlay command-line settings on the current config.
fn config_msgs(cli: &Cli, current: &ProcessConfig) -> Vec<Msg> {
    let mut msgs = Vec::new();
    let mut config = current.clone();

    let patch = ConfigPatch {
        output_format: cli.format.map(OutputFormat::from),
        output_path: cli.output.clone(),
        ..ConfigPatch::default()
    };
    if patch != ConfigPatch::default() {
        patch.clone().apply(&mut config);
        msgs.push(Msg::ConfigUpdated(patch));
    }

    if let Some(scale) = cli.scale {
        msgs.push(Msg::ResizeUpdated(ResizePatch {
            enabled: Some(true),
            mode: Some(ResizeModeKind::Percentage),
            scale: Some(scale),
            ..ResizePatch::default()
        }));
    }

    if let Some(quality) = cli.quality {
        config.set_active_quality(quality);
        msgs.push(match config.output_format {
            OutputFormat::Png => Msg::PngOptionsChanged(config.png_options),
            OutputFormat::Jpeg => Msg::JpegOptionsChanged(config.jpeg_options),
            OutputFormat::WebP => Msg::WebpOptionsChanged(config.webp_options),
        });
    }
    msgs
}

fn scan_inputs(
    source: &dyn FileSource,
    inputs: &[PathBuf],
    recursive: bool,
    max_depth: Option<usize>,
) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = source
                .scan_directory(input, recursive, max_depth)
                .with_context(|| format!("scanning {}", input.display()))?;
            forge_debug!("Found {} image(s) in {:?}", found.len(), input);
            files.extend(found);
        } else if is_supported(input) {
            let info = source
                .file_info(input)
                .with_context(|| format!("reading {}", input.display()))?;
            files.push(info);
        } else {
            forge_warn!("Skipping unsupported input {:?}", input);
        }
    }
    Ok(files)
}

/// A single directory input becomes the root mirrored under the output path.
fn base_path(inputs: &[PathBuf]) -> Option<PathBuf> {
    match inputs {
        [only] if only.is_dir() => Some(only.clone()),
        _ => None,
    }
}

fn last_completed(state: &AppState) -> Option<ItemId> {
    state
        .queue()
        .items()
        .iter()
        .rev()
        .find(|item| item.status == ItemStatus::Completed)
        .map(|item| item.id)
}

fn spawn_reporter(views: mpsc::Receiver<AppViewModel>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut last_seen: Option<LogEntry> = None;
        for view in views {
            for entry in unseen(&view.logs, last_seen.as_ref()) {
                println!(
                    "[{}] {:<7} {}",
                    entry.timestamp,
                    level_label(entry.level),
                    entry.message
                );
            }
            last_seen = view.logs.last().cloned();
        }
    })
}

/// Entries after the last one already printed; everything if it was evicted or cleared.
fn unseen<'a>(logs: &'a [LogEntry], last_seen: Option<&LogEntry>) -> &'a [LogEntry] {
    match last_seen.and_then(|seen| logs.iter().rposition(|entry| entry == seen)) {
        Some(pos) => &logs[pos + 1..],
        None => logs,
    }
}

fn level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "INFO",
        LogLevel::Success => "OK",
        LogLevel::Warning => "WARN",
        LogLevel::Error => "ERROR",
    }
}
