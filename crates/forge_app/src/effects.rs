use std::sync::Arc;
use std::time::Duration;

use forge_core::{Effect, Msg};
use forge_engine::{
    reveal_output, EngineClosed, EngineEvent, EngineHandle, EngineSettings, ProcessingService,
};
use forge_logging::{forge_info, forge_warn};

/// Executes core effects and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    reveal: fn(&std::path::Path) -> Result<(), forge_engine::RevealError>,
}

impl EffectRunner {
    pub fn new(service: Arc<dyn ProcessingService>, settings: EngineSettings) -> Self {
        Self {
            engine: EngineHandle::new(service, settings),
            reveal: reveal_output,
        }
    }

    #[cfg(test)]
    pub fn with_reveal(
        mut self,
        reveal: fn(&std::path::Path) -> Result<(), forge_engine::RevealError>,
    ) -> Self {
        self.reveal = reveal;
        self
    }

    /// Runs `effects`, returning messages that must be fed straight back.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut feedback = Vec::new();
        for effect in effects {
            match effect {
                Effect::ProcessItem {
                    item_id,
                    input_path,
                    config,
                } => {
                    forge_info!("ProcessItem item_id={} path={:?}", item_id, input_path);
                    if let Err(err) = self.engine.process(item_id, input_path, config) {
                        forge_warn!("Item {} not processed: {}", item_id, err);
                        feedback.push(Msg::ItemProcessed {
                            item_id,
                            outcome: Err(err.to_string()),
                        });
                    }
                }
                Effect::RevealOutput { path } => {
                    if let Err(err) = (self.reveal)(&path) {
                        forge_warn!("Could not reveal {:?}: {}", path, err);
                    }
                }
            }
        }
        feedback
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineClosed> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress { item_id, percent } => Msg::ItemProgress { item_id, percent },
        EngineEvent::ItemProcessed { item_id, result } => Msg::ItemProcessed {
            item_id,
            outcome: result.map_err(|err| err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_engine::{FailureKind, ProcessError};

    #[test]
    fn failures_carry_display_text() {
        let msg = map_event(EngineEvent::ItemProcessed {
            item_id: 4,
            result: Err(ProcessError::new(FailureKind::Spawn, "No such file")),
        });
        assert_eq!(
            msg,
            Msg::ItemProcessed {
                item_id: 4,
                outcome: Err("failed to start processing service: No such file".into()),
            }
        );
    }

    #[test]
    fn progress_maps_to_item_progress() {
        let msg = map_event(EngineEvent::Progress {
            item_id: 2,
            percent: 30,
        });
        assert_eq!(
            msg,
            Msg::ItemProgress {
                item_id: 2,
                percent: 30
            }
        );
    }
}
