use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type ItemId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

/// Metadata about an input image, as reported by a file scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// Outcome reported by the processing service for one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub success: bool,
    pub original_size: u64,
    pub new_size: u64,
    pub compression_ratio: f32,
    pub output_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessResult {
    /// Bytes saved by the optimization; negative when the output grew.
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.new_size as i64
    }
}

/// A queued file together with its processing lifecycle.
///
/// `result` is only ever present while `status` is [`ItemStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: ItemId,
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
    pub format: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ProcessResult>,
}

impl WorkItem {
    pub fn pending(id: ItemId, info: FileInfo) -> Self {
        Self {
            id,
            path: info.path,
            name: info.name,
            size: info.size,
            width: info.width,
            height: info.height,
            format: info.format,
            status: ItemStatus::Pending,
            progress: None,
            result: None,
        }
    }
}
