//! Command handler tests, driven through the interpreter

mod winc_tests;

use cmdlink::{default_table, Config, Interpreter, SimulatedDevice};

// =============================================================================
// Helper Functions
// =============================================================================

pub type DeviceSession = Interpreter<SimulatedDevice, Vec<u8>>;

pub fn session() -> DeviceSession {
    Interpreter::new(
        &Config::default(),
        default_table(),
        SimulatedDevice::in_memory(),
        Vec::new(),
    )
    .unwrap()
}

fn take_output(interpreter: &mut DeviceSession) -> String {
    let out = String::from_utf8(interpreter.sink().clone()).unwrap();
    interpreter.sink_mut().clear();
    out
}

/// Send one command line and return the full reply
pub fn send(interpreter: &mut DeviceSession, line: &str) -> String {
    interpreter.feed_all(line.as_bytes()).unwrap();
    interpreter.feed_all(b"\r\n").unwrap();
    take_output(interpreter)
}

/// Send a payload command and its blob; returns the reply after the prompt
pub fn send_blob(interpreter: &mut DeviceSession, line: &str, blob: &str) -> String {
    let prompt = send(interpreter, line);
    assert_eq!(prompt, ">", "no prompt for {}", line);

    interpreter.feed_all(blob.as_bytes()).unwrap();
    interpreter.feed_all(b"\r\n").unwrap();
    take_output(interpreter)
}
