//! Tests for status codes and status lines

use cmdlink::protocol::{write_status, HandlerError, Status, StatusSource};

fn status_line(status: Status) -> String {
    let mut out = Vec::new();
    write_status(&mut out, status).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_ok_line() {
    assert_eq!(status_line(Status::OK), "OK\r\n");
}

#[test]
fn test_error_lines_are_unpadded_uppercase_hex() {
    assert_eq!(status_line(Status::BAD_COMMAND), "ERROR: 0x1\r\n");
    assert_eq!(status_line(Status::BUFFER_OVERRUN), "ERROR: 0x2\r\n");
    assert_eq!(status_line(Status::BAD_ARGUMENT_COUNT), "ERROR: 0x3\r\n");
    assert_eq!(status_line(Status::BAD_BLOB), "ERROR: 0x4\r\n");
    assert_eq!(status_line(Status::BAD_ARGUMENT_VALUE), "ERROR: 0x5\r\n");
}

#[test]
fn test_composite_codes() {
    let status = Status::composite(StatusSource::CryptoAuth, 0xF9);
    assert_eq!(status.code(), 0x1F9);
    assert_eq!(status.source(), Some(StatusSource::CryptoAuth));
    assert_eq!(status.native(), 0xF9);
    assert_eq!(status_line(status), "ERROR: 0x1F9\r\n");

    let status = Status::composite(StatusSource::Winc, 0xF1);
    assert_eq!(status.code(), 0x2F1);
    assert_eq!(status_line(status), "ERROR: 0x2F1\r\n");
}

#[test]
fn test_composite_of_zero_is_ok() {
    assert!(Status::composite(StatusSource::Winc, 0).is_ok());
}

#[test]
fn test_handler_error_conversion() {
    assert_eq!(Status::from(HandlerError::BadArgumentCount), Status::BAD_ARGUMENT_COUNT);
    assert_eq!(Status::from(HandlerError::BadArgumentValue), Status::BAD_ARGUMENT_VALUE);
    assert_eq!(Status::from(HandlerError::CryptoAuth(0xE2)).code(), 0x1E2);
    assert_eq!(Status::from(HandlerError::Winc(0xF4)).code(), 0x2F4);
}

#[test]
fn test_parse_line() {
    assert_eq!(Status::parse_line("OK\r\n"), Some(Status::OK));
    assert_eq!(Status::parse_line("ERROR: 0x1F9\r\n"), Some(Status::from_code(0x1F9)));
    assert_eq!(Status::parse_line("ERROR: 0x4"), Some(Status::BAD_BLOB));
    assert_eq!(Status::parse_line("MC+PONG=OK\r\n"), None);
}

#[test]
fn test_parse_line_rejects_zero_error_code() {
    assert_eq!(Status::parse_line("ERROR: 0x0\r\n"), None);
    assert_eq!(Status::parse_line("ERROR: 0x000"), None);
}
