use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::item::{ItemId, ItemStatus, WorkItem};
use crate::log_sink::LogEntry;
use crate::projection::{StatusCounts, StatusFilter};
use crate::state::BatchPhase;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub phase: BatchPhase,
    pub current_index: usize,
    pub filter: StatusFilter,
    pub counts: StatusCounts,
    /// Rows passing the active filter, in queue order.
    pub rows: Vec<ItemRowView>,
    pub selected_count: usize,
    pub total_count: usize,
    pub logs: Vec<LogEntry>,
    pub show_logs: bool,
    pub preview_item: Option<ItemId>,
    pub output_format: OutputFormat,
    pub output_path: PathBuf,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRowView {
    pub item_id: ItemId,
    pub name: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub status: ItemStatus,
    pub progress: Option<u8>,
    pub selected: bool,
    pub saved_bytes: Option<i64>,
    pub compression_ratio: Option<f32>,
}

impl ItemRowView {
    pub(crate) fn from_item(item: &WorkItem, selected: bool) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            size: item.size,
            width: item.width,
            height: item.height,
            format: item.format.clone(),
            status: item.status,
            progress: item.progress,
            selected,
            saved_bytes: item.result.as_ref().map(|r| r.saved_bytes()),
            compression_ratio: item.result.as_ref().map(|r| r.compression_ratio),
        }
    }
}
