use anyhow::Result;

use crate::catalog::Catalog;
use crate::cpu::{Cpu, Registers};

use super::bus::{FaultLog, GameBoyBus};
use super::cartridge::{Cartridge, CartridgeHeader};

/// High-level machine: the CPU core, the memory map and the instruction
/// catalog, wired together.
///
/// The step loop is the sole driver of all mutation; callers own the
/// indefinite loop and decide when to stop.
pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: GameBoyBus,
    catalog: Catalog,
    header: CartridgeHeader,
}

impl GameBoy {
    /// Build a machine from a raw cartridge image.
    pub fn new(rom: &[u8]) -> Result<Self> {
        let header = CartridgeHeader::parse(rom)?;
        let cart = Cartridge::new(rom.to_vec(), &header);
        Ok(Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::new(cart),
            catalog: Catalog::new(),
            header,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    /// Execute one instruction and return the charged cycle count.
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.bus, &self.catalog)
    }

    /// Drive the loop for `n` instructions; returns the total cycle count.
    pub fn run_steps(&mut self, n: u64) -> u64 {
        let mut cycles = 0u64;
        for _ in 0..n {
            cycles += self.step() as u64;
        }
        cycles
    }

    pub fn regs(&self) -> &Registers {
        &self.cpu.regs
    }

    /// Frames signalled by the display timing stub so far.
    pub fn frames(&self) -> u64 {
        self.bus.screen.frames()
    }

    /// Recovered memory-access faults so far.
    pub fn faults(&self) -> &FaultLog {
        &self.bus.faults
    }
}
