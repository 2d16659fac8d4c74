//! Pixel forge core: pure batch state machine and view-model helpers.
mod compose;
mod config;
mod effect;
mod item;
mod log_sink;
mod msg;
mod projection;
mod queue;
mod state;
mod update;
mod view_model;

pub use compose::{
    compose, resolve_resize, ResizeMode, WireConfig, WireResize, FALLBACK_HEIGHT,
    FALLBACK_MAX_HEIGHT, FALLBACK_MAX_WIDTH, FALLBACK_WIDTH, NEUTRAL_SCALE,
};
pub use config::{
    ConfigPatch, EncoderOptions, FileConflictMode, JpegEncoder, JpegOptions, MetadataMode,
    OutputFormat, PngEncoder, PngOptions, ProcessConfig, ResizeAlgorithm, ResizeConfig,
    ResizeModeKind, ResizePatch, WebPEncoder, WebPOptions, DEFAULT_OUTPUT_PATH,
};
pub use effect::Effect;
pub use item::{FileInfo, ItemId, ItemStatus, ProcessResult, WorkItem};
pub use log_sink::{LogEntry, LogLevel, LogSink, LOG_CAPACITY};
pub use msg::Msg;
pub use projection::{filtered_items, status_counts, StatusCounts, StatusFilter};
pub use queue::QueueStore;
pub use state::{AppState, BatchPhase, PersistedSession};
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView};
