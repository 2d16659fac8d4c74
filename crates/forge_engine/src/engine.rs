use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use forge_core::{ItemId, WireConfig};
use forge_logging::{forge_info, forge_warn};
use thiserror::Error;
use tokio::runtime::Runtime;

use crate::service::{ChannelProgressSink, ProcessingService};
use crate::{EngineEvent, FailureKind, ProcessError};

enum EngineCommand {
    Process {
        item_id: ItemId,
        input_path: PathBuf,
        config: WireConfig,
    },
    Shutdown,
}

/// The worker thread is gone; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("processing engine stopped")]
pub struct EngineClosed;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Upper bound for a single processing call.
    pub process_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            process_timeout: Duration::from_secs(300),
        }
    }
}

/// Worker thread that runs processing calls one after another.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(service: Arc<dyn ProcessingService>, settings: EngineSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                run_command(&runtime, &service, &settings, command, &event_tx);
            }
            // Refuse new commands before the event channel reports closed.
            drop(cmd_rx);
            forge_info!("Engine worker stopped");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn process(
        &self,
        item_id: ItemId,
        input_path: impl Into<PathBuf>,
        config: WireConfig,
    ) -> Result<(), EngineClosed> {
        self.cmd_tx
            .send(EngineCommand::Process {
                item_id,
                input_path: input_path.into(),
                config,
            })
            .map_err(|_| EngineClosed)
    }

    /// Asks the worker to exit once the commands queued before this one are done.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    /// `Ok(None)` when nothing arrived within `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineClosed> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineClosed),
        }
    }
}

fn run_command(
    runtime: &Runtime,
    service: &Arc<dyn ProcessingService>,
    settings: &EngineSettings,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Process {
            item_id,
            input_path,
            config,
        } => {
            let service = Arc::clone(service);
            let sink = ChannelProgressSink::new(event_tx.clone());
            let limit = settings.process_timeout;
            // Spawned so a panicking service surfaces as a join error.
            let task = runtime.spawn(async move {
                tokio::time::timeout(
                    limit,
                    service.process_one(item_id, &input_path, &config, &sink),
                )
                .await
            });

            let result = match runtime.block_on(task) {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => Err(ProcessError::new(FailureKind::Timeout(limit), "")),
                Err(join_err) => Err(ProcessError::new(
                    FailureKind::Panicked,
                    join_err.to_string(),
                )),
            };
            if let Err(err) = &result {
                forge_warn!("Item {} failed: {}", item_id, err);
            }
            let _ = event_tx.send(EngineEvent::ItemProcessed { item_id, result });
        }
        EngineCommand::Shutdown => {}
    }
}
