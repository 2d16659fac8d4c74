use std::path::{Path, PathBuf};
use std::process::Stdio;

use forge_core::{ItemId, ProcessResult, WireConfig};
use forge_logging::{forge_debug, forge_trace};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::{EngineEvent, FailureKind, ProcessError};

/// Prefix of progress lines a service may print before its result.
const PROGRESS_PREFIX: &str = "progress ";

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The external operation that optimizes a single image.
#[async_trait::async_trait]
pub trait ProcessingService: Send + Sync {
    async fn process_one(
        &self,
        item_id: ItemId,
        input_path: &Path,
        config: &WireConfig,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResult, ProcessError>;
}

/// Runs an external program once per image.
///
/// The program receives the input path as its last argument and the wire
/// config as JSON on stdin. It may print `progress <0-100>` lines, and must
/// finish with a camelCase `ProcessResult` JSON document on stdout.
#[derive(Debug, Clone)]
pub struct CommandProcessingService {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandProcessingService {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait::async_trait]
impl ProcessingService for CommandProcessingService {
    async fn process_one(
        &self,
        item_id: ItemId,
        input_path: &Path,
        config: &WireConfig,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResult, ProcessError> {
        let payload = serde_json::to_vec(config)
            .map_err(|err| ProcessError::new(FailureKind::InvalidRequest, err.to_string()))?;

        forge_debug!(
            "Spawning {:?} for item {} ({:?})",
            self.program,
            item_id,
            input_path
        );
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(input_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ProcessError::new(FailureKind::Spawn, err.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = match stdin.write_all(&payload).await {
                Ok(()) => stdin.shutdown().await,
                Err(err) => Err(err),
            };
            // A service that ignores its config may exit before reading stdin.
            match written {
                Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(io_error(err));
                }
                _ => {}
            }
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::new(FailureKind::Io, "stdout not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProcessError::new(FailureKind::Io, "stderr not captured"))?;
        // Drained alongside stdout so a chatty service cannot fill the pipe and stall.
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });
        let mut lines = BufReader::new(stdout).lines();
        let mut response = String::new();
        while let Some(line) = lines.next_line().await.map_err(io_error)? {
            if let Some(percent) = parse_progress(&line) {
                sink.emit(EngineEvent::Progress { item_id, percent });
                continue;
            }
            forge_trace!("item {} stdout: {}", item_id, line);
            response.push_str(&line);
            response.push('\n');
        }

        let status = child.wait().await.map_err(io_error)?;
        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(ProcessError::new(
                FailureKind::ServiceFailed {
                    exit_code: status.code(),
                },
                stderr,
            ));
        }

        serde_json::from_str(response.trim())
            .map_err(|err| ProcessError::new(FailureKind::InvalidResponse, err.to_string()))
    }
}

fn io_error(err: std::io::Error) -> ProcessError {
    ProcessError::new(FailureKind::Io, err.to_string())
}

fn parse_progress(line: &str) -> Option<u8> {
    line.strip_prefix(PROGRESS_PREFIX)
        .and_then(|rest| rest.trim().parse::<u8>().ok())
        .map(|percent| percent.min(100))
}

#[cfg(test)]
mod tests {
    use super::parse_progress;

    #[test]
    fn progress_lines_are_recognised() {
        assert_eq!(parse_progress("progress 40"), Some(40));
        assert_eq!(parse_progress("progress 300"), None);
        assert_eq!(parse_progress("progress 250"), Some(100));
        assert_eq!(parse_progress("progress 100 "), Some(100));
        assert_eq!(parse_progress("{\"success\":true}"), None);
        assert_eq!(parse_progress("progress abc"), None);
    }
}
