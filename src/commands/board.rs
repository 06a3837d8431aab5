//! Board commands: LEDs and reset

use crate::device::Board;
use crate::protocol::{match_string, Arguments, HandlerError, HandlerResult, Payload};

/// LED names accepted by `MC+SETLED` and `MC+GETLED`, with their port masks
pub const LED_NAMES: [(&str, u8); 5] = [
    ("ERROR", 0x01),
    ("DATA", 0x02),
    ("CONN", 0x04),
    ("WIFI", 0x08),
    ("ALL", 0x0F),
];

fn find_led(arg: &[u8]) -> Option<(&'static str, u8)> {
    LED_NAMES
        .iter()
        .copied()
        .find(|(name, _)| match_string(name, arg))
}

/// `MC+SETLED=<led>,<ON|OFF>`
pub(super) fn set_led<B: Board>(args: &Arguments<'_>, board: &mut B) -> HandlerResult {
    if args.len() != 2 {
        return Err(HandlerError::BadArgumentCount);
    }

    let (_, mask) = args
        .get(0)
        .and_then(find_led)
        .ok_or(HandlerError::BadArgumentValue)?;

    let state = args.get(1).ok_or(HandlerError::BadArgumentValue)?;
    let on = if match_string("ON", state) {
        true
    } else if match_string("OFF", state) {
        false
    } else {
        return Err(HandlerError::BadArgumentValue);
    };

    board.set_leds(mask, on);
    Ok(())
}

/// `MC+GETLED=<led>` answers `LED:<led> is ON|OFF`
pub(super) fn get_led<B: Board>(
    args: &Arguments<'_>,
    board: &B,
    payload: &mut Payload,
) -> HandlerResult {
    if args.len() != 1 {
        return Err(HandlerError::BadArgumentCount);
    }

    let (name, mask) = args
        .get(0)
        .and_then(find_led)
        .ok_or(HandlerError::BadArgumentValue)?;

    let state = if board.leds_on(mask) { "ON" } else { "OFF" };
    payload.format(format_args!("LED:{} is {}", name, state));
    Ok(())
}

/// `MC+RESET`
pub(super) fn reset<B: Board>(board: &mut B) -> HandlerResult {
    board.reset();
    Ok(())
}
