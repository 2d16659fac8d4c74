use std::fs;
use std::path::Path;

use forge_engine::{is_supported, FileSource, FsFileSource, ScanError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn names(files: &[forge_core::FileInfo]) -> Vec<String> {
    files.iter().map(|f| f.name.clone()).collect()
}

fn layout() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_png(&root.join("b.png"), 4, 3);
    fs::write(root.join("a.jpg"), b"not really a jpeg").unwrap();
    fs::write(root.join("notes.txt"), b"ignore me").unwrap();
    fs::create_dir_all(root.join("sub/deeper")).unwrap();
    write_png(&root.join("sub/c.png"), 2, 2);
    write_png(&root.join("sub/deeper/d.png"), 1, 1);
    temp
}

#[test]
fn non_recursive_scan_lists_top_level_images_only() {
    let temp = layout();
    let files = FsFileSource
        .scan_directory(temp.path(), false, None)
        .unwrap();
    assert_eq!(names(&files), vec!["a.jpg", "b.png"]);
}

#[test]
fn header_dimensions_and_format_are_read() {
    let temp = layout();
    let info = FsFileSource.file_info(&temp.path().join("b.png")).unwrap();
    assert_eq!((info.width, info.height), (4, 3));
    assert_eq!(info.format, "PNG");
    assert!(info.size > 0);
}

#[test]
fn unreadable_image_keeps_zero_dimensions() {
    let temp = layout();
    let info = FsFileSource.file_info(&temp.path().join("a.jpg")).unwrap();
    assert_eq!((info.width, info.height), (0, 0));
    assert_eq!(info.format, "unknown");
    assert_eq!(info.size, 17);
}

#[test]
fn recursive_scan_respects_depth() {
    let temp = layout();
    let shallow = FsFileSource
        .scan_directory(temp.path(), true, Some(2))
        .unwrap();
    assert_eq!(names(&shallow), vec!["a.jpg", "b.png", "c.png"]);

    let full = FsFileSource.scan_directory(temp.path(), true, None).unwrap();
    assert_eq!(names(&full), vec!["a.jpg", "b.png", "c.png", "d.png"]);
}

#[test]
fn missing_directory_is_reported() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");
    assert!(matches!(
        FsFileSource.scan_directory(&missing, true, None),
        Err(ScanError::NotFound(_))
    ));
}

#[test]
fn extension_check_is_case_insensitive() {
    assert!(is_supported(Path::new("photo.JPG")));
    assert!(is_supported(Path::new("x.tiff")));
    assert!(!is_supported(Path::new("x.svg")));
    assert!(!is_supported(Path::new("README")));
}
