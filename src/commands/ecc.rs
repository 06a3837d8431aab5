//! Crypto element commands
//!
//! Binary results go back as uppercase hex. Blobs arrive as hex and are
//! decoded leniently.

use crate::device::{
    CryptoElement, DEVICE_PRIVATE_KEY_SLOT, ECC_DIGEST_SIZE, ECC_PUB_KEY_SIZE, MAX_ECC_DATA_SLOT,
};
use crate::hex;
use crate::protocol::{parse_arg_u16, Arguments, HandlerError, HandlerResult, Payload};

fn slot_arg(args: &Arguments<'_>, index: usize) -> Result<u16, HandlerError> {
    args.get(index)
        .and_then(parse_arg_u16)
        .filter(|&slot| slot <= MAX_ECC_DATA_SLOT)
        .ok_or(HandlerError::BadArgumentValue)
}

/// Optional length argument; falls back to `default` and rejects zero
fn length_arg(
    args: &Arguments<'_>,
    index: usize,
    default: impl FnOnce() -> Result<usize, HandlerError>,
) -> Result<usize, HandlerError> {
    let length = match args.get(index) {
        Some(arg) => parse_arg_u16(arg).ok_or(HandlerError::BadArgumentValue)? as usize,
        None => default()?,
    };
    if length == 0 {
        return Err(HandlerError::BadArgumentValue);
    }
    Ok(length)
}

fn respond_hex(payload: &mut Payload, data: &[u8]) {
    payload.set(&hex::encode(data));
}

/// `MC+ECC+SERIAL`
pub(super) fn serial<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if !args.is_empty() {
        return Err(HandlerError::BadArgumentCount);
    }
    let serial = crypto.serial_number().map_err(HandlerError::CryptoAuth)?;
    respond_hex(payload, &serial);
    Ok(())
}

/// `MC+ECC+GENPUBKEY[=<slot>]`
pub(super) fn gen_pub_key<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() > 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = if args.is_empty() {
        DEVICE_PRIVATE_KEY_SLOT
    } else {
        slot_arg(args, 0)?
    };
    let key = crypto
        .generate_public_key(slot)
        .map_err(HandlerError::CryptoAuth)?;
    respond_hex(payload, &key);
    Ok(())
}

/// `MC+ECC+PUBKEY+READ=<slot>`
pub(super) fn pub_key_read<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = slot_arg(args, 0)?;
    let key = crypto.read_public_key(slot).map_err(HandlerError::CryptoAuth)?;
    respond_hex(payload, &key);
    Ok(())
}

/// `MC+ECC+PUBKEY+WRITE=<slot>,<bloblen>` followed by the key as 128 hex digits
pub(super) fn pub_key_write<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if payload.len() != 2 * ECC_PUB_KEY_SIZE {
        return Err(HandlerError::BadArgumentValue);
    }
    if args.len() != 2 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = slot_arg(args, 0)?;

    let mut key = [0u8; ECC_PUB_KEY_SIZE];
    key.copy_from_slice(&hex::decode(payload.as_slice()));
    crypto
        .write_public_key(slot, &key)
        .map_err(HandlerError::CryptoAuth)?;

    payload.clear();
    Ok(())
}

/// `MC+ECC+SIGNDIGEST=<length>,<bloblen>` followed by a hex SHA-256 digest
pub(super) fn sign_digest<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 2 {
        return Err(HandlerError::BadArgumentCount);
    }

    let digest: [u8; ECC_DIGEST_SIZE] = hex::decode(payload.as_slice())
        .try_into()
        .map_err(|_| HandlerError::BadArgumentValue)?;
    let signature = crypto
        .sign_digest(DEVICE_PRIVATE_KEY_SLOT, &digest)
        .map_err(HandlerError::CryptoAuth)?;

    respond_hex(payload, &signature);
    Ok(())
}

/// `MC+ECC+READ=<slot>[,<length>]`; the whole slot when no length is given
pub(super) fn read<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.is_empty() || args.len() > 2 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = slot_arg(args, 0)?;
    let length = length_arg(args, 1, || {
        crypto.slot_size(slot).map_err(HandlerError::CryptoAuth)
    })?;

    let data = crypto
        .read_slot(slot, length)
        .map_err(HandlerError::CryptoAuth)?;
    respond_hex(payload, &data);
    Ok(())
}

/// `MC+ECC+OTP+READ[=<length>]`; the whole zone when no length is given
pub(super) fn otp_read<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() > 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let length = length_arg(args, 0, || {
        crypto.otp_size().map_err(HandlerError::CryptoAuth)
    })?;

    let data = crypto.read_otp(length).map_err(HandlerError::CryptoAuth)?;
    respond_hex(payload, &data);
    Ok(())
}

/// `MC+ECC+WRITEBLOB=<slot>,<length>,<bloblen>` followed by `2 * length` hex digits
pub(super) fn write_blob<E: CryptoElement>(
    args: &Arguments<'_>,
    crypto: &mut E,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 3 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = slot_arg(args, 0)?;
    let length = length_arg(args, 1, || Err(HandlerError::BadArgumentValue))?;
    if payload.is_empty() || payload.len() != 2 * length {
        return Err(HandlerError::BadArgumentValue);
    }

    let data = hex::decode(payload.as_slice());
    crypto
        .write_slot(slot, &data)
        .map_err(HandlerError::CryptoAuth)?;

    payload.clear();
    Ok(())
}

/// `MC+ECC+LOCK=<slot>`; locking an already locked slot succeeds
pub(super) fn lock<E: CryptoElement>(args: &Arguments<'_>, crypto: &mut E) -> HandlerResult {
    if args.len() != 1 {
        return Err(HandlerError::BadArgumentCount);
    }
    let slot = slot_arg(args, 0)?;

    let locked = crypto
        .is_slot_locked(slot)
        .map_err(HandlerError::CryptoAuth)?;
    if !locked {
        crypto.lock_slot(slot).map_err(HandlerError::CryptoAuth)?;
    }
    Ok(())
}
