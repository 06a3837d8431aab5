//! Tests for WINC flash commands

use crate::{send, send_blob, session};

#[test]
fn test_fresh_flash_reads_erased() {
    let mut device = session();
    assert_eq!(send(&mut device, "MC+WINC+READ=0,4"), "FFFFFFFF\r\nOK\r\n");
}

#[test]
fn test_write_then_read() {
    let mut device = session();

    assert_eq!(
        send_blob(&mut device, "MC+WINC+WRITEBLOB=0x100,4,8", "12345678"),
        "\r\nOK\r\n"
    );
    assert_eq!(send(&mut device, "MC+WINC+READ=0x100,4"), "12345678\r\nOK\r\n");
    assert_eq!(send(&mut device, "MC+WINC+READ=256,2"), "1234\r\nOK\r\n");
}

#[test]
fn test_programming_only_clears_bits() {
    let mut device = session();

    send_blob(&mut device, "MC+WINC+WRITEBLOB=0x100,4,8", "12345678");
    send_blob(&mut device, "MC+WINC+WRITEBLOB=0x100,4,8", "FFFF0000");
    assert_eq!(send(&mut device, "MC+WINC+READ=0x100,4"), "12340000\r\nOK\r\n");
}

#[test]
fn test_erase_sector() {
    let mut device = session();

    send_blob(&mut device, "MC+WINC+WRITEBLOB=0x1000,2,4", "0000");
    send_blob(&mut device, "MC+WINC+WRITEBLOB=0x2000,2,4", "0000");

    assert_eq!(send(&mut device, "MC+WINC+ERASE=0x1FFF"), "OK\r\n");
    assert_eq!(send(&mut device, "MC+WINC+READ=0x1000,2"), "FFFF\r\nOK\r\n");
    assert_eq!(send(&mut device, "MC+WINC+READ=0x2000,2"), "0000\r\nOK\r\n");
}

#[test]
fn test_read_length_limits() {
    let mut device = session();

    assert_eq!(
        send(&mut device, "MC+WINC+READ=0,256"),
        format!("{}\r\nOK\r\n", "F".repeat(512))
    );
    assert_eq!(send(&mut device, "MC+WINC+READ=0,257"), "ERROR: 0x5\r\n");
    assert_eq!(send(&mut device, "MC+WINC+READ=0,0"), "ERROR: 0x5\r\n");
    assert_eq!(send(&mut device, "MC+WINC+READ=0"), "ERROR: 0x3\r\n");
}

#[test]
fn test_out_of_range_address_is_winc_error() {
    let mut device = session();

    assert_eq!(send(&mut device, "MC+WINC+READ=0x7FFFF,2"), "ERROR: 0x2F1\r\n");
    assert_eq!(send(&mut device, "MC+WINC+ERASE=0x80000"), "ERROR: 0x2F1\r\n");
}

#[test]
fn test_write_blob_length_must_match() {
    let mut device = session();

    assert_eq!(
        send_blob(&mut device, "MC+WINC+WRITEBLOB=0,2,2", "AB"),
        "\r\nERROR: 0x5\r\n"
    );
    assert_eq!(send(&mut device, "MC+WINC+ERASE"), "ERROR: 0x3\r\n");
    assert_eq!(send(&mut device, "MC+WINC+ERASE=NOWHERE"), "ERROR: 0x5\r\n");
}
