//! Commands Module
//!
//! The command vocabulary of the provisioning firmware and the [`Device`]
//! that executes it against a board, a crypto element and a WINC module.
//!
//! ## Commands
//! - Housekeeping: `MC+ABOUT`, `MC+BLOBTEST`, `MC+PING`, `MC+VERSION`,
//!   `MC+LISTCOMMANDS`
//! - Board: `MC+SETLED`, `MC+GETLED`, `MC+RESET`
//! - Crypto element: `MC+ECC+...`
//! - WINC flash: `MC+WINC+READ`, `MC+WINC+WRITEBLOB`, `MC+WINC+ERASE`

mod board;
mod ecc;
mod housekeeping;
mod winc;

use std::fs;

use crate::config::Config;
use crate::device::{
    Board, CryptoElement, FlashImage, SimulatedBoard, SimulatedCrypto, SimulatedWinc, Winc,
    DEFAULT_FLASH_SIZE,
};
use crate::error::Result;
use crate::protocol::{
    CommandDescriptor, CommandHandler, CommandTable, HandlerResult, Invocation, Payload,
};

pub use board::LED_NAMES;

// =============================================================================
// Identity
// =============================================================================

/// Version of the command handler framework
pub const HANDLER_VERSION: &str = "1.3.0";

/// Name of the complete firmware
pub const FW_NAME: &str = "AVR-IoT provisioning FW";

/// Version of the complete firmware
pub const FW_VERSION: &str = "0.4.9";

pub const BOARD_NAME: &str = "AVR-IoT WG";

// =============================================================================
// Command Vocabulary
// =============================================================================

/// Every command the device understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McCommand {
    About,
    BlobTest,
    Ping,
    EccGenPubKey,
    EccLock,
    EccOtpRead,
    EccRead,
    EccPubKeyRead,
    EccSerial,
    EccSignDigest,
    EccWriteBlob,
    EccPubKeyWrite,
    GetLed,
    ListCommands,
    Reset,
    SetLed,
    Version,
    WincErase,
    WincRead,
    WincWriteBlob,
}

/// The standard command table, in lookup order
pub fn default_table() -> CommandTable<McCommand> {
    use McCommand::*;

    CommandTable::new(vec![
        CommandDescriptor::new("MC+ABOUT", About, false),
        CommandDescriptor::new("MC+BLOBTEST", BlobTest, true),
        CommandDescriptor::new("MC+PING", Ping, false),
        CommandDescriptor::new("MC+ECC+GENPUBKEY", EccGenPubKey, false),
        CommandDescriptor::new("MC+ECC+LOCK", EccLock, false),
        CommandDescriptor::new("MC+ECC+OTP+READ", EccOtpRead, false),
        CommandDescriptor::new("MC+ECC+READ", EccRead, false),
        CommandDescriptor::new("MC+ECC+PUBKEY+READ", EccPubKeyRead, false),
        CommandDescriptor::new("MC+ECC+SERIAL", EccSerial, false),
        CommandDescriptor::new("MC+ECC+SIGNDIGEST", EccSignDigest, true),
        CommandDescriptor::new("MC+ECC+WRITEBLOB", EccWriteBlob, true),
        CommandDescriptor::new("MC+ECC+PUBKEY+WRITE", EccPubKeyWrite, true),
        CommandDescriptor::new("MC+GETLED", GetLed, false),
        CommandDescriptor::new("MC+LISTCOMMANDS", ListCommands, false),
        CommandDescriptor::new("MC+RESET", Reset, false),
        CommandDescriptor::new("MC+SETLED", SetLed, false),
        CommandDescriptor::new("MC+VERSION", Version, false),
        CommandDescriptor::new("MC+WINC+ERASE", WincErase, false),
        CommandDescriptor::new("MC+WINC+READ", WincRead, false),
        CommandDescriptor::new("MC+WINC+WRITEBLOB", WincWriteBlob, true),
    ])
}

// =============================================================================
// Device
// =============================================================================

/// Device with every collaborator simulated on the host
pub type SimulatedDevice = Device<SimulatedBoard, SimulatedCrypto, SimulatedWinc>;

/// Executes [`McCommand`]s against the device collaborators
#[derive(Debug)]
pub struct Device<B, E, W> {
    board: B,
    crypto: E,
    winc: W,
}

impl<B, E, W> Device<B, E, W> {
    pub fn new(board: B, crypto: E, winc: W) -> Self {
        Self {
            board,
            crypto,
            winc,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn crypto(&self) -> &E {
        &self.crypto
    }

    pub fn winc(&self) -> &W {
        &self.winc
    }
}

impl SimulatedDevice {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const FLASH_FILENAME: &'static str = "winc_flash.img";
    const CRYPTO_FILENAME: &'static str = "ecc.bin";

    /// Open a simulated device whose state lives under `config.data_dir`
    pub fn open(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let flash = FlashImage::open(
            &config.data_dir.join(Self::FLASH_FILENAME),
            DEFAULT_FLASH_SIZE,
        )?;
        let crypto = SimulatedCrypto::open(&config.data_dir.join(Self::CRYPTO_FILENAME))?;

        Ok(Device::new(
            SimulatedBoard::new(),
            crypto,
            SimulatedWinc::new(flash),
        ))
    }

    /// Simulated device that keeps all state in memory
    pub fn in_memory() -> Self {
        Device::new(
            SimulatedBoard::new(),
            SimulatedCrypto::in_memory(),
            SimulatedWinc::new(FlashImage::in_memory(DEFAULT_FLASH_SIZE)),
        )
    }
}

impl<B: Board, E: CryptoElement, W: Winc> CommandHandler for Device<B, E, W> {
    type Command = McCommand;

    fn execute(
        &mut self,
        invocation: Invocation<'_, McCommand>,
        payload: &mut Payload,
    ) -> HandlerResult {
        let args = &invocation.args;

        match invocation.command {
            McCommand::About => housekeeping::about(&mut self.winc, payload),
            McCommand::BlobTest => housekeeping::blob_test(payload),
            McCommand::Ping => housekeeping::ping(args, payload),
            McCommand::Version => housekeeping::version(args, &mut self.winc, payload),
            McCommand::ListCommands => housekeeping::list_commands(invocation.table, payload),

            McCommand::SetLed => board::set_led(args, &mut self.board),
            McCommand::GetLed => board::get_led(args, &self.board, payload),
            McCommand::Reset => board::reset(&mut self.board),

            McCommand::EccSerial => ecc::serial(args, &mut self.crypto, payload),
            McCommand::EccGenPubKey => ecc::gen_pub_key(args, &mut self.crypto, payload),
            McCommand::EccPubKeyRead => ecc::pub_key_read(args, &mut self.crypto, payload),
            McCommand::EccPubKeyWrite => ecc::pub_key_write(args, &mut self.crypto, payload),
            McCommand::EccSignDigest => ecc::sign_digest(args, &mut self.crypto, payload),
            McCommand::EccRead => ecc::read(args, &mut self.crypto, payload),
            McCommand::EccOtpRead => ecc::otp_read(args, &mut self.crypto, payload),
            McCommand::EccWriteBlob => ecc::write_blob(args, &mut self.crypto, payload),
            McCommand::EccLock => ecc::lock(args, &mut self.crypto),

            McCommand::WincRead => winc::read(args, &mut self.winc, payload),
            McCommand::WincWriteBlob => winc::write_blob(args, &mut self.winc, payload),
            McCommand::WincErase => winc::erase(args, &mut self.winc),
        }
    }

    fn identify(&mut self, payload: &mut Payload) -> HandlerResult {
        housekeeping::about(&mut self.winc, payload)
    }
}
