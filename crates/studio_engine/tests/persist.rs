use std::fs;

use studio_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads").join("today");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_bytes() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("result.png", &[0x89, b'P', b'N', b'G']).unwrap();
    assert_eq!(first.file_name().unwrap(), "result.png");
    assert_eq!(fs::read(&first).unwrap(), vec![0x89, b'P', b'N', b'G']);

    let second = writer.write("result.png", b"replaced").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"replaced");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("result.png", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("result.png").exists());
}
