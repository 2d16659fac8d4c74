use std::fmt;
use std::time::Duration;

use forge_core::{ItemId, ProcessResult};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress {
        item_id: ItemId,
        percent: u8,
    },
    ItemProcessed {
        item_id: ItemId,
        result: Result<ProcessResult, ProcessError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProcessError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ProcessError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The service could not be started.
    Spawn,
    /// The request payload could not be encoded.
    InvalidRequest,
    /// The service ran but reported failure.
    ServiceFailed { exit_code: Option<i32> },
    /// The service answered with something that is not a result.
    InvalidResponse,
    Timeout(Duration),
    /// The service implementation panicked.
    Panicked,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Spawn => write!(f, "failed to start processing service"),
            FailureKind::InvalidRequest => write!(f, "invalid processing request"),
            FailureKind::ServiceFailed {
                exit_code: Some(code),
            } => write!(f, "processing service exited with status {code}"),
            FailureKind::ServiceFailed { exit_code: None } => {
                write!(f, "processing service was terminated")
            }
            FailureKind::InvalidResponse => write!(f, "invalid response from processing service"),
            FailureKind::Timeout(limit) => {
                write!(f, "processing timed out after {}s", limit.as_secs())
            }
            FailureKind::Panicked => write!(f, "processing service panicked"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
