//! Simulated crypto element
//!
//! Data slots, an OTP zone, per-slot lock flags and a serial number, kept in
//! a [`CryptoState`] that is optionally persisted with bincode after every
//! mutation. Private key operations (public key generation and signing) need
//! real key material and report [`ATCA_UNIMPLEMENTED`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CmdlinkError, Result};

use super::{
    CryptoElement, NativeResult, ECC_DIGEST_SIZE, ECC_PUB_KEY_SIZE, ECC_SERIAL_NUM_SIZE,
    ECC_SIG_SIZE, MAX_ECC_DATA_SLOT,
};

// =============================================================================
// Native Status Codes
// =============================================================================

pub const ATCA_BAD_PARAM: u8 = 0xE2;
pub const ATCA_INVALID_SIZE: u8 = 0xE4;
pub const ATCA_EXECUTION_ERROR: u8 = 0xF4;
pub const ATCA_UNIMPLEMENTED: u8 = 0xF9;
/// Write to a locked slot
pub const ATCA_DATA_ZONE_LOCKED: u8 = 0x02;

/// Slot sizes of an ATECC608 data zone
const SLOT_SIZES: [usize; 16] = [
    36, 36, 36, 36, 36, 36, 36, 36, 416, 72, 72, 72, 72, 72, 72, 72,
];

const OTP_SIZE: usize = 64;

const DEFAULT_SERIAL: [u8; ECC_SERIAL_NUM_SIZE] =
    [0x01, 0x23, 0x5A, 0x3C, 0x10, 0x7B, 0x2D, 0x44, 0xEE];

/// Persistent contents of the simulated element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoState {
    pub serial: [u8; ECC_SERIAL_NUM_SIZE],
    pub slots: Vec<Vec<u8>>,
    pub locked: Vec<bool>,
    pub otp: Vec<u8>,
}

impl Default for CryptoState {
    fn default() -> Self {
        Self {
            serial: DEFAULT_SERIAL,
            slots: SLOT_SIZES.iter().map(|&size| vec![0u8; size]).collect(),
            locked: vec![false; SLOT_SIZES.len()],
            otp: vec![0u8; OTP_SIZE],
        }
    }
}

/// Host-side stand-in for the crypto element
#[derive(Debug)]
pub struct SimulatedCrypto {
    state: CryptoState,
    path: Option<PathBuf>,
}

impl SimulatedCrypto {
    /// Fresh element that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            state: CryptoState::default(),
            path: None,
        }
    }

    /// Load the element state from `path`, or start fresh if it does not exist
    pub fn open(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let bytes = fs::read(path)?;
            let state: CryptoState = bincode::deserialize(&bytes)?;
            if state.slots.len() != SLOT_SIZES.len() || state.locked.len() != SLOT_SIZES.len() {
                return Err(CmdlinkError::ImageCorruption(format!(
                    "{}: expected {} slots, found {}",
                    path.display(),
                    SLOT_SIZES.len(),
                    state.slots.len()
                )));
            }
            state
        } else {
            CryptoState::default()
        };

        let element = Self {
            state,
            path: Some(path.to_path_buf()),
        };
        element.persist()?;
        Ok(element)
    }

    pub fn state(&self) -> &CryptoState {
        &self.state
    }

    /// Write the state back to its file, if it has one
    pub fn persist(&self) -> Result<()> {
        if let Some(path) = &self.path {
            let bytes = bincode::serialize(&self.state)?;
            fs::write(path, bytes)?;
        }
        Ok(())
    }

    fn commit(&self) -> NativeResult<()> {
        self.persist().map_err(|e| {
            tracing::warn!("Failed to persist crypto element state: {}", e);
            ATCA_EXECUTION_ERROR
        })
    }

    fn slot_index(&self, slot: u16) -> NativeResult<usize> {
        if slot > MAX_ECC_DATA_SLOT {
            return Err(ATCA_BAD_PARAM);
        }
        Ok(slot as usize)
    }

    fn writable_slot(&self, slot: u16) -> NativeResult<usize> {
        let index = self.slot_index(slot)?;
        if self.state.locked[index] {
            return Err(ATCA_DATA_ZONE_LOCKED);
        }
        Ok(index)
    }
}

impl CryptoElement for SimulatedCrypto {
    fn serial_number(&mut self) -> NativeResult<[u8; ECC_SERIAL_NUM_SIZE]> {
        Ok(self.state.serial)
    }

    fn generate_public_key(&mut self, slot: u16) -> NativeResult<[u8; ECC_PUB_KEY_SIZE]> {
        self.slot_index(slot)?;
        Err(ATCA_UNIMPLEMENTED)
    }

    fn read_public_key(&mut self, slot: u16) -> NativeResult<[u8; ECC_PUB_KEY_SIZE]> {
        let index = self.slot_index(slot)?;
        let data = &self.state.slots[index];
        if data.len() < ECC_PUB_KEY_SIZE {
            return Err(ATCA_BAD_PARAM);
        }
        let mut key = [0u8; ECC_PUB_KEY_SIZE];
        key.copy_from_slice(&data[..ECC_PUB_KEY_SIZE]);
        Ok(key)
    }

    fn write_public_key(&mut self, slot: u16, key: &[u8; ECC_PUB_KEY_SIZE]) -> NativeResult<()> {
        let index = self.writable_slot(slot)?;
        if self.state.slots[index].len() < ECC_PUB_KEY_SIZE {
            return Err(ATCA_BAD_PARAM);
        }
        self.state.slots[index][..ECC_PUB_KEY_SIZE].copy_from_slice(key);
        self.commit()
    }

    fn sign_digest(
        &mut self,
        slot: u16,
        _digest: &[u8; ECC_DIGEST_SIZE],
    ) -> NativeResult<[u8; ECC_SIG_SIZE]> {
        self.slot_index(slot)?;
        Err(ATCA_UNIMPLEMENTED)
    }

    fn slot_size(&mut self, slot: u16) -> NativeResult<usize> {
        let index = self.slot_index(slot)?;
        Ok(self.state.slots[index].len())
    }

    fn otp_size(&mut self) -> NativeResult<usize> {
        Ok(self.state.otp.len())
    }

    fn read_slot(&mut self, slot: u16, len: usize) -> NativeResult<Vec<u8>> {
        let index = self.slot_index(slot)?;
        self.state.slots[index]
            .get(..len)
            .map(<[u8]>::to_vec)
            .ok_or(ATCA_INVALID_SIZE)
    }

    fn write_slot(&mut self, slot: u16, data: &[u8]) -> NativeResult<()> {
        let index = self.writable_slot(slot)?;
        let target = self.state.slots[index]
            .get_mut(..data.len())
            .ok_or(ATCA_INVALID_SIZE)?;
        target.copy_from_slice(data);
        self.commit()
    }

    fn read_otp(&mut self, len: usize) -> NativeResult<Vec<u8>> {
        self.state
            .otp
            .get(..len)
            .map(<[u8]>::to_vec)
            .ok_or(ATCA_INVALID_SIZE)
    }

    fn is_slot_locked(&mut self, slot: u16) -> NativeResult<bool> {
        let index = self.slot_index(slot)?;
        Ok(self.state.locked[index])
    }

    fn lock_slot(&mut self, slot: u16) -> NativeResult<()> {
        let index = self.writable_slot(slot)?;
        self.state.locked[index] = true;
        self.commit()
    }
}
