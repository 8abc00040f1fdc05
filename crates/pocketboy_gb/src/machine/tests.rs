use super::{AccessFault, CartridgeHeader, GameBoy, MapperKind, IF_VBLANK, VBLANK_INTERVAL};
use crate::cpu::Bus;

/// Build a synthetic cartridge image with a valid header.
///
/// The first byte of every 16 KiB bank is stamped with the bank index so
/// the banking tests can see which bank the switchable window resolves to.
fn build_rom(cart_type: u8, rom_code: u8, ram_code: u8) -> Vec<u8> {
    let size = 0x8000usize << rom_code;
    let mut rom = vec![0u8; size];
    for bank in 0..(size / 0x4000) {
        rom[bank * 0x4000] = bank as u8;
    }

    let title = b"BANKTEST";
    rom[0x0134..0x0134 + title.len()].copy_from_slice(title);
    rom[0x0147] = cart_type;
    rom[0x0148] = rom_code;
    rom[0x0149] = ram_code;
    rom
}

fn mbc1_gameboy(rom_code: u8, ram_code: u8) -> GameBoy {
    let cart_type = if ram_code == 0 { 0x01 } else { 0x03 };
    GameBoy::new(&build_rom(cart_type, rom_code, ram_code)).unwrap()
}

#[test]
fn header_fields_are_extracted() {
    let gb = mbc1_gameboy(0x02, 0x03);
    let header = gb.header();

    assert_eq!(header.title, "BANKTEST");
    assert_eq!(header.mapper, MapperKind::Mbc1);
    assert_eq!(header.rom_banks, 8);
    assert_eq!(header.rom_size, 128 * 1024);
    assert_eq!(header.ram_banks, 4);
    assert_eq!(header.ram_size, 32 * 1024);
}

#[test]
fn header_validation_errors() {
    // Too small to contain a header at all.
    assert!(CartridgeHeader::parse(&[0u8; 0x100]).is_err());

    // Unsupported mapper.
    let mut rom = build_rom(0x19, 0x00, 0x00);
    assert!(CartridgeHeader::parse(&rom).is_err());

    // Invalid ROM size code.
    rom[0x0147] = 0x01;
    rom[0x0148] = 0x20;
    assert!(CartridgeHeader::parse(&rom).is_err());

    // Invalid RAM size code.
    rom[0x0148] = 0x00;
    rom[0x0149] = 0x09;
    assert!(CartridgeHeader::parse(&rom).is_err());
}

#[test]
fn rom_bank_zero_selects_are_coerced_to_one() {
    let mut gb = mbc1_gameboy(0x02, 0x00);

    // Bank 0 cannot be addressed through the bank register.
    gb.bus.write8(0x2000, 0x00);
    assert_eq!(gb.bus.read8(0x4000), 0x01);

    // 0x20 masks down to zero in the 5-bit register: same coercion.
    gb.bus.write8(0x2000, 0x20);
    assert_eq!(gb.bus.read8(0x4000), 0x01);

    gb.bus.write8(0x2000, 0x05);
    assert_eq!(gb.bus.read8(0x4000), 0x05);

    // The fixed window still resolves to bank 0.
    assert_eq!(gb.bus.read8(0x0000), 0x00);
}

#[test]
fn rom_mode_extends_bank_number_past_five_bits() {
    let mut gb = mbc1_gameboy(0x05, 0x00); // 64 banks

    gb.bus.write8(0x2000, 0x01);
    gb.bus.write8(0x4000, 0x01); // ROM mode: OR into bits 5-6
    assert_eq!(gb.bus.read8(0x4000), 0x21);
}

#[test]
fn out_of_bounds_rom_read_degrades_to_sentinel() {
    let mut gb = mbc1_gameboy(0x00, 0x00); // 2 banks only

    gb.bus.write8(0x2000, 0x05);
    assert_eq!(gb.bus.read8(0x4000), 0xFF);
    assert_eq!(gb.bus.faults.out_of_bounds, 1);
    assert_eq!(
        gb.bus.faults.last,
        Some(AccessFault::OutOfBounds { addr: 0x4000 })
    );
}

#[test]
fn external_ram_writes_are_gated_on_enable() {
    let mut gb = mbc1_gameboy(0x00, 0x03);

    // Disabled at power-on: the write is dropped.
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.faults.illegal, 1);
    assert_eq!(gb.bus.read8(0xA000), 0x00);

    // 0x0A in the low nibble enables RAM.
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.read8(0xA000), 0x42);

    // Any value without the 0x0A pattern disables again.
    gb.bus.write8(0x0000, 0x00);
    gb.bus.write8(0xA000, 0x99);
    assert_eq!(gb.bus.read8(0xA000), 0x42);
}

#[test]
fn ram_banking_mode_switches_banks() {
    let mut gb = mbc1_gameboy(0x00, 0x03);

    gb.bus.write8(0x0000, 0x0A); // enable RAM
    gb.bus.write8(0x6000, 0x01); // RAM banking mode

    gb.bus.write8(0x4000, 0x01); // bank 1
    gb.bus.write8(0xA000, 0x11);

    gb.bus.write8(0x4000, 0x00); // bank 0
    gb.bus.write8(0xA000, 0x22);

    assert_eq!(gb.bus.read8(0xA000), 0x22);
    gb.bus.write8(0x4000, 0x01);
    assert_eq!(gb.bus.read8(0xA000), 0x11);
}

#[test]
fn ram_bank_select_without_ram_is_rejected() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    gb.bus.write8(0x6000, 0x01);
    gb.bus.write8(0x4000, 0x02);

    // No RAM declared: reads stay at the sentinel, writes fault.
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x55);
    assert!(gb.bus.faults.illegal >= 1);
}

#[test]
fn hram_write_read_roundtrip_over_full_range() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    for addr in 0xFF80u16..=0xFFFE {
        gb.bus.write8(addr, addr as u8);
    }
    for addr in 0xFF80u16..=0xFFFE {
        assert_eq!(gb.bus.read8(addr), addr as u8, "addr 0x{:04X}", addr);
    }
}

#[test]
fn echo_ram_reads_alias_wram_and_writes_fault() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    gb.bus.write8(0xC123, 0x77);
    assert_eq!(gb.bus.read8(0xE123), 0x77);

    gb.bus.write8(0xE123, 0x99);
    assert_eq!(gb.bus.faults.illegal, 1);
    assert_eq!(gb.bus.read8(0xC123), 0x77);
}

#[test]
fn unusable_region_degrades_without_aborting() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    assert_eq!(gb.bus.read8(0xFEA0), 0xFF);
    gb.bus.write8(0xFEFF, 0x01);
    assert_eq!(gb.bus.faults.illegal, 2);
    assert_eq!(
        gb.bus.faults.last,
        Some(AccessFault::Illegal { addr: 0xFEFF })
    );
}

#[test]
fn ie_io_vram_and_oam_accept_writes() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    gb.bus.write8(0xFFFF, 0x1F);
    assert_eq!(gb.bus.read8(0xFFFF), 0x1F);

    gb.bus.write8(0xFF05, 0xAB);
    assert_eq!(gb.bus.read8(0xFF05), 0xAB);

    gb.bus.write8(0x8000, 0x3C);
    assert_eq!(gb.bus.read8(0x8000), 0x3C);

    gb.bus.write8(0xFE00, 0x5A);
    assert_eq!(gb.bus.read8(0xFE00), 0x5A);
}

#[test]
fn lcdc_register_packs_and_unpacks() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    // Power-on value: LCD on, BG tile data at 0x8000, BG enabled.
    assert_eq!(gb.bus.read8(0xFF40), 0x91);

    gb.bus.write8(0xFF40, 0x00);
    assert_eq!(gb.bus.read8(0xFF40), 0x00);

    gb.bus.write8(0xFF40, 0xFF);
    assert_eq!(gb.bus.read8(0xFF40), 0xFF);
}

#[test]
fn crossing_the_vblank_threshold_raises_if() {
    let mut gb = mbc1_gameboy(0x00, 0x00);

    gb.bus.tick(VBLANK_INTERVAL - 1);
    assert_eq!(gb.bus.read8(0xFF0F) & IF_VBLANK, 0);
    assert_eq!(gb.frames(), 0);

    gb.bus.tick(1);
    assert_ne!(gb.bus.read8(0xFF0F) & IF_VBLANK, 0);
    assert_eq!(gb.frames(), 1);
}

#[test]
fn rom_only_cartridge_rejects_writes() {
    let mut gb = GameBoy::new(&build_rom(0x00, 0x00, 0x00)).unwrap();

    gb.bus.write8(0x2000, 0x05);
    assert_eq!(gb.bus.faults.illegal, 1);
    // No bank controller: the window above 0x4000 stays put.
    assert_eq!(gb.bus.read8(0x4000), 0x01);
}

#[test]
fn program_executes_through_the_whole_stack() {
    let mut rom = build_rom(0x01, 0x00, 0x00);
    // LD A,0x2A; ADD A,A; HALT
    rom[0x0100..0x0104].copy_from_slice(&[0x3E, 0x2A, 0x87, 0x76]);
    let mut gb = GameBoy::new(&rom).unwrap();

    let cycles = gb.run_steps(3);

    assert_eq!(cycles, 8 + 4 + 4);
    assert_eq!(gb.regs().a, 0x54);
    assert_eq!(gb.regs().pc, 0x0104);
    assert!(gb.cpu.halted);
}

#[test]
fn vblank_fires_while_stepping_instructions() {
    // A NOP sled is enough: ~21k instructions cross the threshold once.
    let mut gb = mbc1_gameboy(0x02, 0x00);

    gb.run_steps(VBLANK_INTERVAL as u64 / 4 + 16);

    assert!(gb.frames() >= 1);
}
