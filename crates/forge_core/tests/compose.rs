use std::path::{Path, PathBuf};

use forge_core::{
    compose, resolve_resize, FileConflictMode, MetadataMode, OutputFormat, ProcessConfig,
    ResizeAlgorithm, ResizeConfig, ResizeMode, ResizeModeKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn resize(mode: ResizeModeKind) -> ResizeConfig {
    ResizeConfig {
        enabled: true,
        mode,
        ..ResizeConfig::default()
    }
}

#[test]
fn disabled_resize_always_composes_neutral_percentage() {
    let modes = [
        ResizeModeKind::FixedWidth,
        ResizeModeKind::FixedHeight,
        ResizeModeKind::Exact,
        ResizeModeKind::Percentage,
        ResizeModeKind::FitBox,
        ResizeModeKind::FillBox,
    ];
    for mode in modes {
        let mut config = ProcessConfig::default();
        config.resize = ResizeConfig {
            enabled: false,
            mode,
            width: Some(123),
            height: Some(456),
            scale: Some(25.0),
            max_width: Some(10),
            max_height: Some(20),
            ..ResizeConfig::default()
        };

        let wire = compose(&config, None);
        assert_eq!(wire.resize.mode, ResizeMode::Percentage { scale: 100.0 });
        assert!(!wire.resize.enabled);
    }
}

#[test]
fn enabled_resize_builds_matching_variant() {
    let mut fixed = resize(ResizeModeKind::FixedWidth);
    fixed.width = Some(1280);
    assert_eq!(
        resolve_resize(&fixed),
        ResizeMode::FixedWidth { width: 1280 }
    );

    let mut exact = resize(ResizeModeKind::Exact);
    exact.width = Some(640);
    exact.height = Some(480);
    assert_eq!(
        resolve_resize(&exact),
        ResizeMode::Exact {
            width: 640,
            height: 480
        }
    );

    let mut fit = resize(ResizeModeKind::FitBox);
    fit.max_width = Some(2048);
    fit.max_height = Some(2048);
    assert_eq!(
        resolve_resize(&fit),
        ResizeMode::FitBox {
            max_width: 2048,
            max_height: 2048
        }
    );

    let mut percentage = resize(ResizeModeKind::Percentage);
    percentage.scale = Some(50.0);
    assert_eq!(
        resolve_resize(&percentage),
        ResizeMode::Percentage { scale: 50.0 }
    );
}

#[test]
fn unset_fields_fall_back_to_panel_defaults() {
    let mut height_only = resize(ResizeModeKind::FixedHeight);
    height_only.scale = None;
    assert_eq!(
        resolve_resize(&height_only),
        ResizeMode::FixedHeight { height: 600 }
    );
    assert_eq!(
        resolve_resize(&resize(ResizeModeKind::FillBox)),
        ResizeMode::FillBox {
            width: 800,
            height: 600
        }
    );
    assert_eq!(
        resolve_resize(&resize(ResizeModeKind::FitBox)),
        ResizeMode::FitBox {
            max_width: 1920,
            max_height: 1080
        }
    );

    let mut no_scale = resize(ResizeModeKind::Percentage);
    no_scale.scale = None;
    assert_eq!(
        resolve_resize(&no_scale),
        ResizeMode::Percentage { scale: 100.0 }
    );
}

#[test]
fn other_fields_pass_through_unchanged() {
    let mut config = ProcessConfig::default();
    config.output_format = OutputFormat::WebP;
    config.metadata_mode = MetadataMode::KeepColorProfile;
    config.file_conflict_mode = FileConflictMode::Skip;
    config.preserve_folder_structure = true;
    config.output_path = PathBuf::from("/out");
    config.webp_options.quality = 42;
    config.resize.algorithm = ResizeAlgorithm::Mitchell;

    let wire = compose(&config, Some(Path::new("/photos")));

    assert_eq!(wire.output_format, OutputFormat::WebP);
    assert_eq!(wire.metadata_mode, MetadataMode::KeepColorProfile);
    assert_eq!(wire.file_conflict_mode, FileConflictMode::Skip);
    assert!(wire.preserve_folder_structure);
    assert_eq!(wire.output_path, PathBuf::from("/out"));
    assert_eq!(wire.base_path, Some(PathBuf::from("/photos")));
    assert_eq!(wire.png_options, config.png_options);
    assert_eq!(wire.jpeg_options, config.jpeg_options);
    assert_eq!(wire.webp_options, config.webp_options);
    assert_eq!(wire.resize.algorithm, ResizeAlgorithm::Mitchell);
}

#[test]
fn compose_is_deterministic() {
    let config = ProcessConfig::default();
    assert_eq!(compose(&config, None), compose(&config, None));
}

#[test]
fn wire_payload_uses_service_field_names() {
    let mut config = ProcessConfig::default();
    config.resize = ResizeConfig {
        enabled: true,
        mode: ResizeModeKind::FitBox,
        max_width: Some(1600),
        max_height: Some(900),
        ..ResizeConfig::default()
    };

    let value = serde_json::to_value(compose(&config, None)).unwrap();

    assert_eq!(value["outputFormat"], json!("jpeg"));
    assert_eq!(
        value["resize"],
        json!({
            "enabled": true,
            "mode": { "fitBox": { "maxWidth": 1600, "maxHeight": 900 } },
            "algorithm": "lanczos3"
        })
    );
    assert_eq!(value["jpegOptions"]["optimizeCoding"], json!(true));
    assert_eq!(value["pngOptions"]["preserveTransparency"], json!(true));
    assert_eq!(value["webpOptions"]["method"], json!(4));
    assert_eq!(value["metadataMode"], json!("stripAll"));
    assert_eq!(value["fileConflictMode"], json!("rename"));
    assert_eq!(value["preserveFolderStructure"], json!(false));
    assert_eq!(value["basePath"], json!(null));
    assert_eq!(value["outputPath"], json!("/tmp/optimized"));
}

#[test]
fn disabled_resize_serializes_as_percentage_variant() {
    let value = serde_json::to_value(compose(&ProcessConfig::default(), None)).unwrap();
    assert_eq!(
        value["resize"]["mode"],
        json!({ "percentage": { "scale": 100.0 } })
    );
}
