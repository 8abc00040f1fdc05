use super::super::bus::{AccessFault, FaultLog};
use super::CartridgeHeader;

/// Unbanked 32 KiB cartridge (type 0x00): no bank controller, no
/// external RAM.
pub(in super::super) struct RomOnlyCartridge {
    rom: Vec<u8>,
    rom_size: usize,
}

impl RomOnlyCartridge {
    pub(super) fn new(rom: Vec<u8>, header: &CartridgeHeader) -> Self {
        Self {
            rom,
            rom_size: header.rom_size,
        }
    }

    pub(super) fn rom_read(&self, addr: u16, faults: &mut FaultLog) -> u8 {
        let offset = addr as usize;
        if offset >= self.rom_size {
            faults.record(AccessFault::OutOfBounds { addr }, "ROM read");
            return 0xFF;
        }
        self.rom.get(offset).copied().unwrap_or(0xFF)
    }

    pub(super) fn rom_write(&mut self, addr: u16, _value: u8, faults: &mut FaultLog) {
        faults.record(
            AccessFault::Illegal { addr },
            "write to ROM-only cartridge",
        );
    }

    pub(super) fn ram_read(&self, _addr: u16, _faults: &mut FaultLog) -> u8 {
        // No external RAM installed.
        0xFF
    }

    pub(super) fn ram_write(&mut self, addr: u16, _value: u8, faults: &mut FaultLog) {
        faults.record(
            AccessFault::Illegal { addr },
            "external RAM write with no RAM installed",
        );
    }
}
