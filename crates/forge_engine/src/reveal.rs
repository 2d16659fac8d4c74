use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevealError {
    #[error("no parent directory for {0}")]
    NoParent(PathBuf),
    #[error("failed to open folder: {0}")]
    Launch(#[from] io::Error),
}

#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const OPENER: &str = "xdg-open";

/// Directory shown when revealing `output_path`.
pub fn reveal_target(output_path: &Path) -> Result<&Path, RevealError> {
    output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .ok_or_else(|| RevealError::NoParent(output_path.to_path_buf()))
}

/// Opens the folder containing `output_path` in the platform file browser.
///
/// Fire-and-forget: the opener is spawned and never waited on.
pub fn reveal_output(output_path: &Path) -> Result<(), RevealError> {
    let folder = reveal_target(output_path)?;
    Command::new(OPENER).arg(folder).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_is_parent_directory() {
        let target = reveal_target(Path::new("/tmp/optimized/a_optimized.jpg")).unwrap();
        assert_eq!(target, Path::new("/tmp/optimized"));
    }

    #[test]
    fn bare_file_name_has_no_target() {
        assert!(matches!(
            reveal_target(Path::new("a.jpg")),
            Err(RevealError::NoParent(_))
        ));
    }
}
