//! Device Module
//!
//! Collaborators the command handlers drive: the board (LEDs, reset), the
//! crypto authentication element and the WINC module with its SPI flash.
//!
//! ## Responsibilities
//! - Define the interface each collaborator exposes to the handlers
//! - Provide host-side simulations so a session can run without hardware
//!
//! Collaborator calls report failure with the collaborator's own 8-bit
//! status code; the handlers fold that code into a composite wire status.

mod board;
mod crypto;
mod flash;

pub use board::SimulatedBoard;
pub use crypto::{
    CryptoState, SimulatedCrypto, ATCA_BAD_PARAM, ATCA_DATA_ZONE_LOCKED, ATCA_EXECUTION_ERROR,
    ATCA_INVALID_SIZE, ATCA_UNIMPLEMENTED,
};
pub use flash::{FlashImage, SimulatedWinc, DEFAULT_FLASH_SIZE, M2M_ERR_FAIL, M2M_ERR_INVALID_ARG};

// =============================================================================
// Shared Constants
// =============================================================================

/// Crypto element serial number length
pub const ECC_SERIAL_NUM_SIZE: usize = 9;

/// Uncompressed P-256 public key (X and Y) length
pub const ECC_PUB_KEY_SIZE: usize = 64;

/// Signature (R and S) length
pub const ECC_SIG_SIZE: usize = 64;

/// SHA-256 digest length accepted for signing
pub const ECC_DIGEST_SIZE: usize = 32;

/// Highest data slot number
pub const MAX_ECC_DATA_SLOT: u16 = 15;

/// Slot holding the device private key
pub const DEVICE_PRIVATE_KEY_SLOT: u16 = 0;

/// Largest chunk accepted by a single flash read or write
pub const FLASH_PAGE_SIZE: usize = 256;

/// Flash erase granularity
pub const FLASH_SECTOR_SIZE: usize = 4096;

/// Collaborator result carrying the native status code on failure
pub type NativeResult<T> = std::result::Result<T, u8>;

// =============================================================================
// Collaborator Interfaces
// =============================================================================

/// Board level GPIO and reset control
pub trait Board {
    /// Switch every LED in `mask` on or off
    fn set_leds(&mut self, mask: u8, on: bool);

    /// True when any LED in `mask` is lit
    fn leds_on(&self, mask: u8) -> bool;

    /// Software reset
    fn reset(&mut self);
}

/// Crypto authentication element
pub trait CryptoElement {
    fn serial_number(&mut self) -> NativeResult<[u8; ECC_SERIAL_NUM_SIZE]>;

    /// Public key derived from the private key held in `slot`
    fn generate_public_key(&mut self, slot: u16) -> NativeResult<[u8; ECC_PUB_KEY_SIZE]>;

    /// Public key stored in `slot`
    fn read_public_key(&mut self, slot: u16) -> NativeResult<[u8; ECC_PUB_KEY_SIZE]>;

    fn write_public_key(&mut self, slot: u16, key: &[u8; ECC_PUB_KEY_SIZE]) -> NativeResult<()>;

    /// Sign `digest` with the private key in `slot`
    fn sign_digest(
        &mut self,
        slot: u16,
        digest: &[u8; ECC_DIGEST_SIZE],
    ) -> NativeResult<[u8; ECC_SIG_SIZE]>;

    fn slot_size(&mut self, slot: u16) -> NativeResult<usize>;

    fn otp_size(&mut self) -> NativeResult<usize>;

    /// Read `len` bytes from the start of `slot`
    fn read_slot(&mut self, slot: u16, len: usize) -> NativeResult<Vec<u8>>;

    /// Write `data` to the start of `slot`
    fn write_slot(&mut self, slot: u16, data: &[u8]) -> NativeResult<()>;

    fn read_otp(&mut self, len: usize) -> NativeResult<Vec<u8>>;

    fn is_slot_locked(&mut self, slot: u16) -> NativeResult<bool>;

    fn lock_slot(&mut self, slot: u16) -> NativeResult<()>;
}

/// WINC firmware and driver revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WincVersion {
    pub firmware: (u8, u8, u8),
    pub driver: (u8, u8, u8),
}

/// WINC network controller and its SPI flash
pub trait Winc {
    fn version(&mut self) -> NativeResult<WincVersion>;

    fn flash_read(&mut self, address: u32, len: usize) -> NativeResult<Vec<u8>>;

    fn flash_write(&mut self, address: u32, data: &[u8]) -> NativeResult<()>;

    /// Erase the sector containing `address`
    fn flash_erase_sector(&mut self, address: u32) -> NativeResult<()>;
}
