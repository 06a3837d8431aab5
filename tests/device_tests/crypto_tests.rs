//! Tests for the simulated crypto element

use std::fs;

use cmdlink::device::{
    CryptoElement, SimulatedCrypto, ATCA_BAD_PARAM, ATCA_DATA_ZONE_LOCKED, ATCA_INVALID_SIZE,
    ATCA_UNIMPLEMENTED,
};
use cmdlink::{Config, SimulatedDevice};
use tempfile::TempDir;

#[test]
fn test_slot_layout() {
    let mut crypto = SimulatedCrypto::in_memory();

    assert_eq!(crypto.slot_size(0).unwrap(), 36);
    assert_eq!(crypto.slot_size(8).unwrap(), 416);
    assert_eq!(crypto.slot_size(15).unwrap(), 72);
    assert_eq!(crypto.slot_size(16), Err(ATCA_BAD_PARAM));
    assert_eq!(crypto.otp_size().unwrap(), 64);
}

#[test]
fn test_write_and_read_slot() {
    let mut crypto = SimulatedCrypto::in_memory();

    crypto.write_slot(3, &[1, 2, 3]).unwrap();
    assert_eq!(crypto.read_slot(3, 4).unwrap(), vec![1, 2, 3, 0]);
    assert_eq!(crypto.write_slot(3, &[0; 37]), Err(ATCA_INVALID_SIZE));
}

#[test]
fn test_lock_slot() {
    let mut crypto = SimulatedCrypto::in_memory();

    assert!(!crypto.is_slot_locked(5).unwrap());
    crypto.lock_slot(5).unwrap();
    assert!(crypto.is_slot_locked(5).unwrap());

    assert_eq!(crypto.write_slot(5, &[1]), Err(ATCA_DATA_ZONE_LOCKED));
    assert_eq!(crypto.lock_slot(5), Err(ATCA_DATA_ZONE_LOCKED));
}

#[test]
fn test_private_key_operations_unavailable() {
    let mut crypto = SimulatedCrypto::in_memory();

    assert_eq!(crypto.generate_public_key(0), Err(ATCA_UNIMPLEMENTED));
    assert_eq!(crypto.sign_digest(0, &[0; 32]), Err(ATCA_UNIMPLEMENTED));
}

#[test]
fn test_state_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ecc.bin");
    {
        let mut crypto = SimulatedCrypto::open(&path).unwrap();
        crypto.write_slot(9, &[0xDE, 0xAD]).unwrap();
        crypto.lock_slot(9).unwrap();
    }

    let mut crypto = SimulatedCrypto::open(&path).unwrap();
    assert_eq!(crypto.read_slot(9, 2).unwrap(), vec![0xDE, 0xAD]);
    assert!(crypto.is_slot_locked(9).unwrap());
}

#[test]
fn test_garbage_state_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ecc.bin");
    fs::write(&path, b"not a crypto element").unwrap();

    assert!(SimulatedCrypto::open(&path).is_err());
}

#[test]
fn test_device_open_creates_images() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("device");
    let config = Config::builder().data_dir(&data_dir).build();

    SimulatedDevice::open(&config).unwrap();

    assert!(data_dir.join("winc_flash.img").exists());
    assert!(data_dir.join("ecc.bin").exists());
}
