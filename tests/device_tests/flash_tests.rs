//! Tests for the flash image
//!
//! These tests verify:
//! - Erased contents and NOR programming
//! - Persistence across reopen
//! - Header and CRC validation

use std::fs;
use std::path::PathBuf;

use cmdlink::device::{FlashImage, SimulatedWinc, Winc, M2M_ERR_INVALID_ARG};
use cmdlink::CmdlinkError;
use tempfile::TempDir;

const SIZE: usize = 64 * 1024;

fn setup_temp_image() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("flash.img");
    (temp_dir, path)
}

#[test]
fn test_new_image_is_erased() {
    let (_temp, path) = setup_temp_image();
    let image = FlashImage::open(&path, SIZE).unwrap();

    assert!(path.exists());
    assert_eq!(image.size(), SIZE);
    assert!(image.as_slice().iter().all(|&b| b == 0xFF));
}

#[test]
fn test_program_persists_across_reopen() {
    let (_temp, path) = setup_temp_image();
    {
        let mut image = FlashImage::open(&path, SIZE).unwrap();
        image.program(0x20, &[0x12, 0x34]).unwrap();
    }

    let image = FlashImage::open(&path, SIZE).unwrap();
    assert_eq!(image.read(0x20, 2).unwrap(), vec![0x12, 0x34]);
}

#[test]
fn test_erase_persists_across_reopen() {
    let (_temp, path) = setup_temp_image();
    {
        let mut image = FlashImage::open(&path, SIZE).unwrap();
        image.program(0x1004, &[0x00]).unwrap();
        image.erase_sector(0x1000).unwrap();
    }

    let image = FlashImage::open(&path, SIZE).unwrap();
    assert_eq!(image.read(0x1004, 1).unwrap(), vec![0xFF]);
}

#[test]
fn test_out_of_range_access() {
    let mut image = FlashImage::in_memory(SIZE);

    assert_eq!(image.read(SIZE as u32 - 1, 2), Err(M2M_ERR_INVALID_ARG));
    assert_eq!(image.program(u32::MAX, &[0]), Err(M2M_ERR_INVALID_ARG));
    assert_eq!(image.erase_sector(SIZE as u32), Err(M2M_ERR_INVALID_ARG));
}

#[test]
fn test_detects_corrupted_data() {
    let (_temp, path) = setup_temp_image();
    {
        let mut image = FlashImage::open(&path, SIZE).unwrap();
        image.program(0, &[0xAA]).unwrap();
    }

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    fs::write(&path, bytes).unwrap();

    let result = FlashImage::open(&path, SIZE);
    assert!(matches!(result, Err(CmdlinkError::ImageCorruption(_))));
}

#[test]
fn test_detects_bad_magic() {
    let (_temp, path) = setup_temp_image();
    FlashImage::open(&path, SIZE).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = b'X';
    fs::write(&path, bytes).unwrap();

    let result = FlashImage::open(&path, SIZE);
    assert!(matches!(result, Err(CmdlinkError::ImageCorruption(_))));
}

#[test]
fn test_detects_truncation() {
    let (_temp, path) = setup_temp_image();
    FlashImage::open(&path, SIZE).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 100]).unwrap();

    let result = FlashImage::open(&path, SIZE);
    assert!(matches!(result, Err(CmdlinkError::ImageCorruption(_))));
}

#[test]
fn test_winc_reports_version() {
    let mut winc = SimulatedWinc::new(FlashImage::in_memory(SIZE));
    let version = winc.version().unwrap();

    assert_eq!(version.firmware, (19, 6, 1));
    assert_eq!(version.driver, (19, 3, 0));
}
