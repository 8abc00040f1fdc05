mod bus;
mod cartridge;
mod gameboy;
mod screen;

pub use bus::{AccessFault, FaultLog, GameBoyBus, IF_VBLANK};
pub use cartridge::{CartridgeHeader, MapperKind};
pub use gameboy::GameBoy;
pub use screen::{Screen, VBLANK_INTERVAL};

#[cfg(test)]
mod tests;
