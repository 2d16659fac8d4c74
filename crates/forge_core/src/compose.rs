use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{
    FileConflictMode, JpegOptions, MetadataMode, OutputFormat, PngOptions, ProcessConfig,
    ResizeAlgorithm, ResizeConfig, ResizeModeKind, WebPOptions,
};

/// Scale sent when resizing is disabled.
pub const NEUTRAL_SCALE: f32 = 100.0;
pub const FALLBACK_WIDTH: u32 = 800;
pub const FALLBACK_HEIGHT: u32 = 600;
pub const FALLBACK_MAX_WIDTH: u32 = 1920;
pub const FALLBACK_MAX_HEIGHT: u32 = 1080;

/// Resize request as the processing service expects it: exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeMode {
    Percentage {
        scale: f32,
    },
    FixedWidth {
        width: u32,
    },
    FixedHeight {
        height: u32,
    },
    Exact {
        width: u32,
        height: u32,
    },
    #[serde(rename_all = "camelCase")]
    FitBox {
        max_width: u32,
        max_height: u32,
    },
    FillBox {
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResize {
    pub enabled: bool,
    pub mode: ResizeMode,
    pub algorithm: ResizeAlgorithm,
}

/// Configuration payload handed to the processing service with every item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    pub output_format: OutputFormat,
    pub resize: WireResize,
    pub png_options: PngOptions,
    pub jpeg_options: JpegOptions,
    pub webp_options: WebPOptions,
    pub metadata_mode: MetadataMode,
    pub file_conflict_mode: FileConflictMode,
    pub preserve_folder_structure: bool,
    pub base_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

/// Builds the wire payload for the processing service. Pure and deterministic.
pub fn compose(config: &ProcessConfig, base_path: Option<&Path>) -> WireConfig {
    WireConfig {
        output_format: config.output_format,
        resize: WireResize {
            enabled: config.resize.enabled,
            mode: resolve_resize(&config.resize),
            algorithm: config.resize.algorithm,
        },
        png_options: config.png_options.clone(),
        jpeg_options: config.jpeg_options.clone(),
        webp_options: config.webp_options.clone(),
        metadata_mode: config.metadata_mode,
        file_conflict_mode: config.file_conflict_mode,
        preserve_folder_structure: config.preserve_folder_structure,
        base_path: base_path.map(Path::to_path_buf),
        output_path: config.output_path.clone(),
    }
}

/// Resolves the editable resize settings into one concrete variant.
///
/// A disabled resize still yields `Percentage { scale: 100 }`; unset fields
/// fall back to the defaults the settings panel shows.
pub fn resolve_resize(resize: &ResizeConfig) -> ResizeMode {
    if !resize.enabled {
        return ResizeMode::Percentage {
            scale: NEUTRAL_SCALE,
        };
    }

    let width = resize.width.unwrap_or(FALLBACK_WIDTH);
    let height = resize.height.unwrap_or(FALLBACK_HEIGHT);
    match resize.mode {
        ResizeModeKind::Percentage => ResizeMode::Percentage {
            scale: resize.scale.unwrap_or(NEUTRAL_SCALE),
        },
        ResizeModeKind::FixedWidth => ResizeMode::FixedWidth { width },
        ResizeModeKind::FixedHeight => ResizeMode::FixedHeight { height },
        ResizeModeKind::Exact => ResizeMode::Exact { width, height },
        ResizeModeKind::FitBox => ResizeMode::FitBox {
            max_width: resize.max_width.unwrap_or(FALLBACK_MAX_WIDTH),
            max_height: resize.max_height.unwrap_or(FALLBACK_MAX_HEIGHT),
        },
        ResizeModeKind::FillBox => ResizeMode::FillBox { width, height },
    }
}
