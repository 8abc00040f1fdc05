mod mbc1;
mod rom_only;

pub(super) use mbc1::Mbc1Cartridge;
pub(super) use rom_only::RomOnlyCartridge;

use anyhow::{bail, ensure, Result};

use crate::{MIN_ROM_SIZE, ROM_BANK_SIZE};

use super::bus::FaultLog;

/// Mapper family declared by the cartridge-type byte at 0x0147.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapperKind {
    RomOnly,
    Mbc1,
}

/// Fixed-offset metadata extracted from the cartridge header.
///
/// The core trusts the declared sizes: they drive the bank controller's
/// bounds checks even when the image on disk is shorter.
#[derive(Clone, Debug)]
pub struct CartridgeHeader {
    pub title: String,
    pub cart_type: u8,
    pub mapper: MapperKind,
    pub rom_size: usize,
    pub rom_banks: u16,
    pub ram_size: usize,
    pub ram_banks: u8,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self> {
        ensure!(
            rom.len() >= MIN_ROM_SIZE,
            "cartridge image too small to contain a header ({} bytes)",
            rom.len()
        );

        let cart_type = rom[0x0147];
        let mapper = match cart_type {
            0x00 => MapperKind::RomOnly,
            0x01..=0x03 => MapperKind::Mbc1,
            other => bail!("unsupported cartridge type 0x{:02X}", other),
        };
        let (rom_size, rom_banks) = rom_size_from_code(rom[0x0148])?;
        let (ram_size, ram_banks) = ram_size_from_code(rom[0x0149])?;

        // The title is up to 16 bytes and NUL-terminated.
        let title: String = rom[0x0134..0x0144]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        log::info!(
            "cartridge '{}': type 0x{:02X}, {} ROM banks, {} RAM banks",
            title,
            cart_type,
            rom_banks,
            ram_banks
        );

        Ok(Self {
            title,
            cart_type,
            mapper,
            rom_size,
            rom_banks,
            ram_size,
            ram_banks,
        })
    }
}

fn rom_size_from_code(code: u8) -> Result<(usize, u16)> {
    match code {
        0x00..=0x07 => Ok(((ROM_BANK_SIZE * 2) << code, 2u16 << code)),
        0x52 => Ok((ROM_BANK_SIZE * 72, 72)),
        0x53 => Ok((ROM_BANK_SIZE * 80, 80)),
        0x54 => Ok((ROM_BANK_SIZE * 96, 96)),
        other => bail!("invalid ROM size code 0x{:02X} in header at 0x0148", other),
    }
}

fn ram_size_from_code(code: u8) -> Result<(usize, u8)> {
    match code {
        0x00 => Ok((0, 0)),
        0x01 => Ok((2 * 1024, 1)),
        0x02 => Ok((8 * 1024, 1)),
        0x03 => Ok((32 * 1024, 4)),
        0x04 => Ok((128 * 1024, 16)),
        0x05 => Ok((64 * 1024, 8)),
        other => bail!("invalid RAM size code 0x{:02X} in header at 0x0149", other),
    }
}

/// Mapper dispatch wrapper for the supported cartridge types.
pub(super) enum Cartridge {
    RomOnly(RomOnlyCartridge),
    Mbc1(Mbc1Cartridge),
}

impl Cartridge {
    pub(super) fn new(rom: Vec<u8>, header: &CartridgeHeader) -> Self {
        match header.mapper {
            MapperKind::RomOnly => Cartridge::RomOnly(RomOnlyCartridge::new(rom, header)),
            MapperKind::Mbc1 => Cartridge::Mbc1(Mbc1Cartridge::new(rom, header)),
        }
    }

    pub(super) fn rom_read(&self, addr: u16, faults: &mut FaultLog) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.rom_read(addr, faults),
            Cartridge::Mbc1(c) => c.rom_read(addr, faults),
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8, faults: &mut FaultLog) {
        match self {
            Cartridge::RomOnly(c) => c.rom_write(addr, value, faults),
            Cartridge::Mbc1(c) => c.rom_write(addr, value, faults),
        }
    }

    pub(super) fn ram_read(&self, addr: u16, faults: &mut FaultLog) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.ram_read(addr, faults),
            Cartridge::Mbc1(c) => c.ram_read(addr, faults),
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8, faults: &mut FaultLog) {
        match self {
            Cartridge::RomOnly(c) => c.ram_write(addr, value, faults),
            Cartridge::Mbc1(c) => c.ram_write(addr, value, faults),
        }
    }
}
