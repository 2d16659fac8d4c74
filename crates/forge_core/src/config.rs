//! UI-editable processing configuration.
//!
//! Serialized with camelCase keys so the same shape is used for the session
//! file and for the processing service payload.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/optimized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Png,
    #[default]
    Jpeg,
    WebP,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Which resize shape the user picked; the numeric fields live on [`ResizeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeModeKind {
    FixedWidth,
    FixedHeight,
    Exact,
    #[default]
    Percentage,
    FitBox,
    FillBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeAlgorithm {
    #[default]
    Lanczos3,
    CatmullRom,
    Nearest,
    Mitchell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeConfig {
    pub enabled: bool,
    pub mode: ResizeModeKind,
    pub algorithm: ResizeAlgorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: ResizeModeKind::Percentage,
            algorithm: ResizeAlgorithm::Lanczos3,
            width: None,
            height: None,
            scale: Some(100.0),
            max_width: None,
            max_height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PngEncoder {
    /// Palette quantization, best for lossy output.
    #[default]
    Imagequant,
    Standard,
    #[serde(rename = "oxipng")]
    OxiPng,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PngOptions {
    pub encoder: PngEncoder,
    pub lossy: bool,
    pub quality: u8,
    pub dithering: bool,
    pub preserve_transparency: bool,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            encoder: PngEncoder::Imagequant,
            lossy: true,
            quality: 80,
            dithering: true,
            preserve_transparency: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JpegEncoder {
    #[serde(rename = "mozjpeg")]
    MozJpeg,
    #[default]
    #[serde(rename = "standard")]
    Standard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JpegOptions {
    pub encoder: JpegEncoder,
    pub quality: u8,
    pub progressive: bool,
    /// Optimize Huffman tables.
    pub optimize_coding: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            encoder: JpegEncoder::Standard,
            quality: 60,
            progressive: true,
            optimize_coding: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WebPEncoder {
    #[default]
    #[serde(rename = "libwebp")]
    LibWebP,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPOptions {
    pub encoder: WebPEncoder,
    pub lossy: bool,
    pub quality: u8,
    /// 0 (fast) to 6 (slow, smaller).
    pub method: u8,
}

impl Default for WebPOptions {
    fn default() -> Self {
        Self {
            encoder: WebPEncoder::LibWebP,
            lossy: true,
            quality: 85,
            method: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataMode {
    #[default]
    StripAll,
    KeepOrientation,
    KeepColorProfile,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileConflictMode {
    Overwrite,
    #[default]
    Rename,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    pub output_format: OutputFormat,
    pub resize: ResizeConfig,
    pub png_options: PngOptions,
    pub jpeg_options: JpegOptions,
    pub webp_options: WebPOptions,
    pub metadata_mode: MetadataMode,
    pub file_conflict_mode: FileConflictMode,
    pub preserve_folder_structure: bool,
    pub output_path: PathBuf,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Jpeg,
            resize: ResizeConfig::default(),
            png_options: PngOptions::default(),
            jpeg_options: JpegOptions::default(),
            webp_options: WebPOptions::default(),
            metadata_mode: MetadataMode::StripAll,
            file_conflict_mode: FileConflictMode::Rename,
            preserve_folder_structure: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// The encoder block selected by the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderOptions<'a> {
    Png(&'a PngOptions),
    Jpeg(&'a JpegOptions),
    WebP(&'a WebPOptions),
}

impl EncoderOptions<'_> {
    pub fn quality(&self) -> u8 {
        match self {
            EncoderOptions::Png(options) => options.quality,
            EncoderOptions::Jpeg(options) => options.quality,
            EncoderOptions::WebP(options) => options.quality,
        }
    }
}

impl ProcessConfig {
    /// Only one encoder block is honoured at a time; the other two are kept but ignored.
    pub fn active_encoder(&self) -> EncoderOptions<'_> {
        match self.output_format {
            OutputFormat::Png => EncoderOptions::Png(&self.png_options),
            OutputFormat::Jpeg => EncoderOptions::Jpeg(&self.jpeg_options),
            OutputFormat::WebP => EncoderOptions::WebP(&self.webp_options),
        }
    }

    /// Sets the quality knob of whichever encoder block is active.
    pub fn set_active_quality(&mut self, quality: u8) {
        let quality = quality.min(100);
        match self.output_format {
            OutputFormat::Png => self.png_options.quality = quality,
            OutputFormat::Jpeg => self.jpeg_options.quality = quality,
            OutputFormat::WebP => self.webp_options.quality = quality,
        }
    }
}

/// Partial update of the top-level config fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigPatch {
    pub output_format: Option<OutputFormat>,
    pub metadata_mode: Option<MetadataMode>,
    pub file_conflict_mode: Option<FileConflictMode>,
    pub preserve_folder_structure: Option<bool>,
    pub output_path: Option<PathBuf>,
}

impl ConfigPatch {
    pub fn apply(self, config: &mut ProcessConfig) {
        if let Some(format) = self.output_format {
            config.output_format = format;
        }
        if let Some(mode) = self.metadata_mode {
            config.metadata_mode = mode;
        }
        if let Some(mode) = self.file_conflict_mode {
            config.file_conflict_mode = mode;
        }
        if let Some(preserve) = self.preserve_folder_structure {
            config.preserve_folder_structure = preserve;
        }
        if let Some(path) = self.output_path {
            config.output_path = path;
        }
    }
}

/// Partial update of the resize settings. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResizePatch {
    pub enabled: Option<bool>,
    pub mode: Option<ResizeModeKind>,
    pub algorithm: Option<ResizeAlgorithm>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ResizePatch {
    pub fn apply(self, resize: &mut ResizeConfig) {
        if let Some(enabled) = self.enabled {
            resize.enabled = enabled;
        }
        if let Some(mode) = self.mode {
            resize.mode = mode;
        }
        if let Some(algorithm) = self.algorithm {
            resize.algorithm = algorithm;
        }
        resize.width = self.width.or(resize.width);
        resize.height = self.height.or(resize.height);
        resize.scale = self.scale.or(resize.scale);
        resize.max_width = self.max_width.or(resize.max_width);
        resize.max_height = self.max_height.or(resize.max_height);
    }
}
