//! Simulated WINC module and SPI flash image
//!
//! ## Image File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "CLFL" (4) | Version: u16 (2) | Size: u32 (4)  │
//! │   DataCRC: u32 (4)                                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Flash contents (Size bytes)                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Flash behaves like NOR: erase sets a sector to `0xFF`, and programming
//! can only clear bits.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{CmdlinkError, Result};

use super::{NativeResult, Winc, WincVersion, FLASH_SECTOR_SIZE};

/// Magic bytes identifying a flash image file
const MAGIC: &[u8; 4] = b"CLFL";

/// Current image format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Size (4) + CRC (4) = 14 bytes
const HEADER_SIZE: usize = 14;

/// WINC1500 flash size (4 Mbit)
pub const DEFAULT_FLASH_SIZE: usize = 512 * 1024;

const ERASED: u8 = 0xFF;

// WINC driver status codes, as the low byte of their i8 value
pub const M2M_ERR_FAIL: u8 = (-12i8) as u8;
pub const M2M_ERR_INVALID_ARG: u8 = (-15i8) as u8;

// =============================================================================
// Flash Image
// =============================================================================

/// Flash contents, optionally backed by an image file
#[derive(Debug)]
pub struct FlashImage {
    data: Vec<u8>,
    path: Option<PathBuf>,
}

impl FlashImage {
    /// Erased flash of `size` bytes that is never written to disk
    pub fn in_memory(size: usize) -> Self {
        Self {
            data: vec![ERASED; size],
            path: None,
        }
    }

    /// Open an image file, creating an erased one of `size` bytes if missing
    pub fn open(path: &Path, size: usize) -> Result<Self> {
        if !path.exists() {
            let image = Self {
                data: vec![ERASED; size],
                path: Some(path.to_path_buf()),
            };
            image.persist()?;
            return Ok(image);
        }

        let mut file = File::open(path)?;
        let mut header = [0u8; HEADER_SIZE];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(CmdlinkError::ImageCorruption(format!(
                "Invalid flash image magic: expected CLFL, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(CmdlinkError::Storage(format!(
                "Unsupported flash image version: {}",
                version
            )));
        }

        let stored_size = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
        let stored_crc = u32::from_le_bytes([header[10], header[11], header[12], header[13]]);

        let mut data = Vec::with_capacity(stored_size);
        file.read_to_end(&mut data)?;
        if data.len() != stored_size {
            return Err(CmdlinkError::ImageCorruption(format!(
                "Flash image truncated: expected {} bytes, got {}",
                stored_size,
                data.len()
            )));
        }

        let crc = crc32fast::hash(&data);
        if crc != stored_crc {
            return Err(CmdlinkError::ImageCorruption(format!(
                "Flash image CRC mismatch: stored {:08x}, computed {:08x}",
                stored_crc, crc
            )));
        }

        Ok(Self {
            data,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write the image back to its file, if it has one
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let tmp_path = path.with_extension("tmp");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&(self.data.len() as u32).to_le_bytes())?;
        writer.write_all(&crc32fast::hash(&self.data).to_le_bytes())?;
        writer.write_all(&self.data)?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| CmdlinkError::Storage(format!("Failed to flush flash image: {}", e)))?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn range(&self, address: u32, len: usize) -> NativeResult<std::ops::Range<usize>> {
        let start = address as usize;
        let end = start.checked_add(len).ok_or(M2M_ERR_INVALID_ARG)?;
        if end > self.data.len() {
            return Err(M2M_ERR_INVALID_ARG);
        }
        Ok(start..end)
    }

    pub fn read(&self, address: u32, len: usize) -> NativeResult<Vec<u8>> {
        let range = self.range(address, len)?;
        Ok(self.data[range].to_vec())
    }

    /// Program `data` at `address`; bits can only go from 1 to 0
    pub fn program(&mut self, address: u32, data: &[u8]) -> NativeResult<()> {
        let range = self.range(address, data.len())?;
        for (cell, &byte) in self.data[range].iter_mut().zip(data) {
            *cell &= byte;
        }
        self.commit()
    }

    /// Erase the sector containing `address`
    pub fn erase_sector(&mut self, address: u32) -> NativeResult<()> {
        let start = (address as usize / FLASH_SECTOR_SIZE) * FLASH_SECTOR_SIZE;
        let range = self.range(start as u32, FLASH_SECTOR_SIZE)?;
        self.data[range].fill(ERASED);
        self.commit()
    }

    fn commit(&self) -> NativeResult<()> {
        self.persist().map_err(|e| {
            tracing::warn!("Failed to persist flash image: {}", e);
            M2M_ERR_FAIL
        })
    }
}

// =============================================================================
// Simulated WINC
// =============================================================================

/// Host-side stand-in for the WINC module
#[derive(Debug)]
pub struct SimulatedWinc {
    flash: FlashImage,
    version: WincVersion,
}

impl SimulatedWinc {
    pub fn new(flash: FlashImage) -> Self {
        Self {
            flash,
            version: WincVersion {
                firmware: (19, 6, 1),
                driver: (19, 3, 0),
            },
        }
    }

    pub fn flash(&self) -> &FlashImage {
        &self.flash
    }
}

impl Winc for SimulatedWinc {
    fn version(&mut self) -> NativeResult<WincVersion> {
        Ok(self.version)
    }

    fn flash_read(&mut self, address: u32, len: usize) -> NativeResult<Vec<u8>> {
        self.flash.read(address, len)
    }

    fn flash_write(&mut self, address: u32, data: &[u8]) -> NativeResult<()> {
        self.flash.program(address, data)
    }

    fn flash_erase_sector(&mut self, address: u32) -> NativeResult<()> {
        self.flash.erase_sector(address)
    }
}
