//! Housekeeping commands

use crate::device::Winc;
use crate::protocol::{match_string, Arguments, CommandTable, HandlerError, HandlerResult, Payload};

use super::{BOARD_NAME, FW_NAME, FW_VERSION, HANDLER_VERSION};

/// `MC+ABOUT`: firmware, WINC and handler identification
pub(super) fn about<W: Winc>(winc: &mut W, payload: &mut Payload) -> HandlerResult {
    let board_versions = winc_versions(winc)?;
    payload.format(format_args!(
        "{}\r\nFW {}\r\n{}Command handler {}\r\nfor the {}\r\n",
        FW_NAME, FW_VERSION, board_versions, HANDLER_VERSION, BOARD_NAME
    ));
    Ok(())
}

/// `MC+BLOBTEST`: the blob is the response
pub(super) fn blob_test(_payload: &mut Payload) -> HandlerResult {
    Ok(())
}

/// `MC+PING=<x>` answers `MC+PONG=<x>`
pub(super) fn ping(args: &Arguments<'_>, payload: &mut Payload) -> HandlerResult {
    if args.len() != 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let arg = args.get_str(0).ok_or(HandlerError::BadArgumentValue)?;
    payload.format(format_args!("MC+PONG={}", arg));
    Ok(())
}

/// `MC+VERSION[=COMMANDHANDLER|FIRMWARE|WINC]`
pub(super) fn version<W: Winc>(
    args: &Arguments<'_>,
    winc: &mut W,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() > 1 {
        return Err(HandlerError::BadArgumentCount);
    }

    match args.get(0) {
        None => payload.format(format_args!("{}\r\n", HANDLER_VERSION)),
        Some(arg) if match_string("COMMANDHANDLER", arg) => {
            payload.format(format_args!("{}\r\n", HANDLER_VERSION))
        }
        Some(arg) if match_string("FIRMWARE", arg) => {
            payload.format(format_args!("{}\r\n", FW_VERSION))
        }
        Some(arg) if match_string("WINC", arg) => {
            let versions = winc_versions(winc)?;
            payload.set(versions.as_bytes());
        }
        Some(_) => return Err(HandlerError::BadArgumentValue),
    }
    Ok(())
}

/// `MC+LISTCOMMANDS`: every token in table order, one per line
pub(super) fn list_commands<C: Copy>(
    table: &CommandTable<C>,
    payload: &mut Payload,
) -> HandlerResult {
    payload.clear();
    for descriptor in table.iter() {
        payload.extend(descriptor.token.as_bytes());
        payload.extend(b"\r\n");
    }
    Ok(())
}

fn winc_versions<W: Winc>(winc: &mut W) -> Result<String, HandlerError> {
    let version = winc.version().map_err(HandlerError::Winc)?;
    let (fw_major, fw_minor, fw_patch) = version.firmware;
    let (drv_major, drv_minor, drv_patch) = version.driver;
    Ok(format!(
        "WINC firmware {}.{}.{}\r\nWINC driver {}.{}.{}\r\n",
        fw_major, fw_minor, fw_patch, drv_major, drv_minor, drv_patch
    ))
}
