use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use forge_core::FileInfo;
use forge_logging::forge_debug;
use thiserror::Error;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tiff", "gif"];

/// Depth used by recursive scans when the caller gives none.
pub const DEFAULT_MAX_DEPTH: usize = 10;

const UNKNOWN_FORMAT: &str = "unknown";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Source of queueable files: directory scans and single-file lookups.
pub trait FileSource: Send + Sync {
    fn scan_directory(
        &self,
        path: &Path,
        recursive: bool,
        max_depth: Option<usize>,
    ) -> Result<Vec<FileInfo>, ScanError>;

    fn file_info(&self, path: &Path) -> Result<FileInfo, ScanError>;
}

/// Local filesystem scanner that reads only image headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn scan_directory(
        &self,
        path: &Path,
        recursive: bool,
        max_depth: Option<usize>,
    ) -> Result<Vec<FileInfo>, ScanError> {
        if !path.exists() {
            return Err(ScanError::NotFound(path.to_path_buf()));
        }

        let depth = if recursive {
            max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
        } else {
            1
        };

        let mut files = Vec::new();
        for entry in WalkDir::new(path)
            .max_depth(depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() || !is_supported(entry.path()) {
                continue;
            }
            match self.file_info(entry.path()) {
                Ok(info) => files.push(info),
                Err(err) => forge_debug!("Skipping {:?}: {}", entry.path(), err),
            }
        }
        Ok(files)
    }

    fn file_info(&self, path: &Path) -> Result<FileInfo, ScanError> {
        let metadata = fs::metadata(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io(err),
        })?;

        let (width, height, format) = match read_dimensions(path) {
            Some((width, height)) => {
                let format = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(str::to_uppercase)
                    .unwrap_or_else(|| UNKNOWN_FORMAT.to_string());
                (width, height, format)
            }
            None => (0, 0, UNKNOWN_FORMAT.to_string()),
        };

        Ok(FileInfo {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(UNKNOWN_FORMAT)
                .to_string(),
            size: metadata.len(),
            width,
            height,
            format,
        })
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reads width and height from the header without decoding pixels.
fn read_dimensions(path: &Path) -> Option<(u32, u32)> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
