//! WINC flash commands

use crate::device::{Winc, FLASH_PAGE_SIZE};
use crate::hex;
use crate::protocol::{parse_arg_u16, parse_arg_u32, Arguments, HandlerError, HandlerResult, Payload};

/// Address and length arguments shared by read and write
fn address_and_length(args: &Arguments<'_>) -> Result<(u32, usize), HandlerError> {
    let address = args
        .get(0)
        .and_then(parse_arg_u32)
        .ok_or(HandlerError::BadArgumentValue)?;
    let length = args
        .get(1)
        .and_then(parse_arg_u16)
        .map(usize::from)
        .filter(|&len| len > 0 && len <= FLASH_PAGE_SIZE)
        .ok_or(HandlerError::BadArgumentValue)?;
    Ok((address, length))
}

/// `MC+WINC+READ=<address>,<length>`; at most one page per call
pub(super) fn read<W: Winc>(
    args: &Arguments<'_>,
    winc: &mut W,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 2 {
        return Err(HandlerError::BadArgumentCount);
    }
    let (address, length) = address_and_length(args)?;

    let data = winc
        .flash_read(address, length)
        .map_err(HandlerError::Winc)?;
    payload.set(&hex::encode(&data));
    Ok(())
}

/// `MC+WINC+WRITEBLOB=<address>,<length>,<bloblen>` followed by `2 * length` hex digits
pub(super) fn write_blob<W: Winc>(
    args: &Arguments<'_>,
    winc: &mut W,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 3 {
        return Err(HandlerError::BadArgumentCount);
    }
    let (address, length) = address_and_length(args)?;
    if payload.len() != 2 * length {
        return Err(HandlerError::BadArgumentValue);
    }

    let data = hex::decode(payload.as_slice());
    winc.flash_write(address, &data).map_err(HandlerError::Winc)?;

    payload.clear();
    Ok(())
}

/// `MC+WINC+ERASE=<address>`; erases the sector holding the address
pub(super) fn erase<W: Winc>(args: &Arguments<'_>, winc: &mut W) -> HandlerResult {
    if args.len() != 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let address = args
        .get(0)
        .and_then(parse_arg_u32)
        .ok_or(HandlerError::BadArgumentValue)?;

    winc.flash_erase_sector(address).map_err(HandlerError::Winc)?;
    Ok(())
}
