//! Simulated board
//!
//! Four active-low LEDs on one port and a reset counter.

use super::Board;

/// Host-side stand-in for the board GPIO
#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    /// Port output register; a cleared bit lights its LED
    port_out: u8,
    resets: u32,
}

impl SimulatedBoard {
    /// All LEDs off
    pub fn new() -> Self {
        Self {
            port_out: 0x0F,
            resets: 0,
        }
    }

    /// Number of software resets requested so far
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    pub fn port_out(&self) -> u8 {
        self.port_out
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for SimulatedBoard {
    fn set_leds(&mut self, mask: u8, on: bool) {
        if on {
            self.port_out &= !mask;
        } else {
            self.port_out |= mask;
        }
    }

    fn leds_on(&self, mask: u8) -> bool {
        self.port_out & mask != mask
    }

    fn reset(&mut self) {
        tracing::info!("Board reset requested");
        self.resets += 1;
        self.port_out = 0x0F;
    }
}
