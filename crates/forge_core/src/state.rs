use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ProcessConfig;
use crate::item::{ItemId, ItemStatus, WorkItem};
use crate::log_sink::LogSink;
use crate::projection::StatusFilter;
use crate::queue::QueueStore;
use crate::view_model::{AppViewModel, ItemRowView};

/// Externally observable orchestrator state. There is no visible stopping state:
/// a stop request reports `Idle` straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    Idle,
    Running,
}

/// Item data captured when a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) id: ItemId,
    pub(crate) path: PathBuf,
    pub(crate) name: String,
    pub(crate) size: u64,
}

impl From<&WorkItem> for Candidate {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id,
            path: item.path.clone(),
            name: item.name.clone(),
            size: item.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct BatchRun {
    pub(crate) candidates: Vec<Candidate>,
    pub(crate) cursor: usize,
    pub(crate) in_flight: Option<Candidate>,
}

/// Shape saved between sessions under one storage key.
///
/// Selection, preview and log-panel visibility are deliberately absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSession {
    pub items: Vec<WorkItem>,
    pub config: ProcessConfig,
    pub base_path: Option<PathBuf>,
    pub status_filter: StatusFilter,
    pub is_processing: bool,
    pub current_index: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) queue: QueueStore,
    pub(crate) config: ProcessConfig,
    pub(crate) base_path: Option<PathBuf>,
    pub(crate) logs: LogSink,
    pub(crate) phase: BatchPhase,
    pub(crate) run: Option<BatchRun>,
    pub(crate) cancel_requested: bool,
    pub(crate) current_index: usize,
    pub(crate) preview_item: Option<ItemId>,
    pub(crate) show_logs: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProcessConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .queue
            .filtered()
            .into_iter()
            .map(|item| ItemRowView::from_item(item, self.queue.is_selected(item.id)))
            .collect();

        AppViewModel {
            phase: self.phase,
            current_index: self.current_index,
            filter: self.queue.filter(),
            counts: self.queue.counts(),
            rows,
            selected_count: self.queue.selected().len(),
            total_count: self.queue.len(),
            logs: self.logs.iter().cloned().collect(),
            show_logs: self.show_logs,
            preview_item: self.preview_item,
            output_format: self.config.output_format,
            output_path: self.config.output_path.clone(),
            dirty: self.dirty,
        }
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn logs(&self) -> &LogSink {
        &self.logs
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn is_processing(&self) -> bool {
        self.phase == BatchPhase::Running
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    /// Item whose processing call has been issued but not yet answered.
    ///
    /// This can still be `Some` after a stop request while the phase is `Idle`.
    pub fn in_flight(&self) -> Option<ItemId> {
        self.run
            .as_ref()
            .and_then(|run| run.in_flight.as_ref())
            .map(|candidate| candidate.id)
    }

    pub fn persisted_session(&self) -> PersistedSession {
        PersistedSession {
            items: self.queue.items().to_vec(),
            config: self.config.clone(),
            base_path: self.base_path.clone(),
            status_filter: self.queue.filter(),
            is_processing: self.is_processing(),
            current_index: self.current_index,
        }
    }

    /// Replaces queue, config and base path with a saved session.
    ///
    /// Runs are never resumed: the phase stays `Idle` and items saved mid-flight
    /// go back to `Pending`.
    pub(crate) fn restore(&mut self, session: PersistedSession) {
        let items = session
            .items
            .into_iter()
            .map(|mut item| {
                if item.status == ItemStatus::Processing {
                    item.status = ItemStatus::Pending;
                    item.progress = None;
                }
                if item.status != ItemStatus::Completed {
                    item.result = None;
                }
                item
            })
            .collect();

        self.queue = QueueStore::new();
        self.queue.add_items(items);
        self.queue.set_filter(session.status_filter);
        self.config = session.config;
        self.base_path = session.base_path;
        self.current_index = session.current_index;
        self.phase = BatchPhase::Idle;
        self.run = None;
        self.cancel_requested = false;
        self.preview_item = None;
        self.show_logs = false;
    }

    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
