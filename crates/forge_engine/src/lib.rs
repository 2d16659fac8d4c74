//! Pixel forge engine: processing service seam, worker thread and file IO.
mod engine;
mod persist;
mod reveal;
mod scan;
mod service;
mod types;

pub use engine::{EngineClosed, EngineHandle, EngineSettings};
pub use persist::{ensure_state_dir, KeyedStore, PersistError};
pub use reveal::{reveal_output, reveal_target, RevealError};
pub use scan::{
    is_supported, FileSource, FsFileSource, ScanError, DEFAULT_MAX_DEPTH, SUPPORTED_EXTENSIONS,
};
pub use service::{ChannelProgressSink, CommandProcessingService, ProcessingService, ProgressSink};
pub use types::{EngineEvent, FailureKind, ProcessError};
