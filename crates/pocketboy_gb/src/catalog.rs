//! Static per-opcode metadata: byte lengths, cycle costs and flag effects.
//!
//! The engine resolves every fetched opcode against these tables; the
//! declared length is what advances PC, and the declared cycle cost is what
//! feeds the display timing counter. Undefined opcodes are represented as
//! missing entries, not as a separate error table.

/// One entry of the instruction catalog.
#[derive(Clone, Debug)]
pub struct Instruction {
    pub opcode: u8,
    /// Mnemonic with operands, e.g. `LD BC,d16`.
    pub mnemonic: String,
    /// Instruction length in bytes, operands included.
    pub length: u8,
    /// Cycle cost. For branch-dependent instructions this is the cost with
    /// the branch taken.
    pub cycles: u32,
    /// Cycle cost when a conditional branch is not taken.
    pub cycles_not_taken: Option<u32>,
    /// Flag effect in Z N H C order: a letter means computed, `0`/`1`
    /// forced, `-` preserved.
    pub flags: &'static str,
}

type Def = (u8, &'static str, u8, &'static [u32], &'static str);

/// The irregular halves of the primary table (0x00–0x3F and 0xC0–0xFF).
///
/// The register block 0x40–0xBF follows a fully regular encoding and is
/// generated in `register_block_entry`. Opcode holes (0xD3, 0xDB, 0xDD,
/// 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD) are simply absent.
const PRIMARY_DEFS: &[Def] = &[
    (0x00, "NOP", 1, &[4], "- - - -"),
    (0x01, "LD BC,d16", 3, &[12], "- - - -"),
    (0x02, "LD (BC),A", 1, &[8], "- - - -"),
    (0x03, "INC BC", 1, &[8], "- - - -"),
    (0x04, "INC B", 1, &[4], "Z 0 H -"),
    (0x05, "DEC B", 1, &[4], "Z 1 H -"),
    (0x06, "LD B,d8", 2, &[8], "- - - -"),
    (0x07, "RLCA", 1, &[4], "0 0 0 C"),
    (0x08, "LD (a16),SP", 3, &[20], "- - - -"),
    (0x09, "ADD HL,BC", 1, &[8], "- 0 H C"),
    (0x0A, "LD A,(BC)", 1, &[8], "- - - -"),
    (0x0B, "DEC BC", 1, &[8], "- - - -"),
    (0x0C, "INC C", 1, &[4], "Z 0 H -"),
    (0x0D, "DEC C", 1, &[4], "Z 1 H -"),
    (0x0E, "LD C,d8", 2, &[8], "- - - -"),
    (0x0F, "RRCA", 1, &[4], "0 0 0 C"),
    (0x10, "STOP", 2, &[4], "- - - -"),
    (0x11, "LD DE,d16", 3, &[12], "- - - -"),
    (0x12, "LD (DE),A", 1, &[8], "- - - -"),
    (0x13, "INC DE", 1, &[8], "- - - -"),
    (0x14, "INC D", 1, &[4], "Z 0 H -"),
    (0x15, "DEC D", 1, &[4], "Z 1 H -"),
    (0x16, "LD D,d8", 2, &[8], "- - - -"),
    (0x17, "RLA", 1, &[4], "0 0 0 C"),
    (0x18, "JR r8", 2, &[12], "- - - -"),
    (0x19, "ADD HL,DE", 1, &[8], "- 0 H C"),
    (0x1A, "LD A,(DE)", 1, &[8], "- - - -"),
    (0x1B, "DEC DE", 1, &[8], "- - - -"),
    (0x1C, "INC E", 1, &[4], "Z 0 H -"),
    (0x1D, "DEC E", 1, &[4], "Z 1 H -"),
    (0x1E, "LD E,d8", 2, &[8], "- - - -"),
    (0x1F, "RRA", 1, &[4], "0 0 0 C"),
    (0x20, "JR NZ,r8", 2, &[12, 8], "- - - -"),
    (0x21, "LD HL,d16", 3, &[12], "- - - -"),
    (0x22, "LD (HL+),A", 1, &[8], "- - - -"),
    (0x23, "INC HL", 1, &[8], "- - - -"),
    (0x24, "INC H", 1, &[4], "Z 0 H -"),
    (0x25, "DEC H", 1, &[4], "Z 1 H -"),
    (0x26, "LD H,d8", 2, &[8], "- - - -"),
    (0x27, "DAA", 1, &[4], "Z - 0 C"),
    (0x28, "JR Z,r8", 2, &[12, 8], "- - - -"),
    (0x29, "ADD HL,HL", 1, &[8], "- 0 H C"),
    (0x2A, "LD A,(HL+)", 1, &[8], "- - - -"),
    (0x2B, "DEC HL", 1, &[8], "- - - -"),
    (0x2C, "INC L", 1, &[4], "Z 0 H -"),
    (0x2D, "DEC L", 1, &[4], "Z 1 H -"),
    (0x2E, "LD L,d8", 2, &[8], "- - - -"),
    (0x2F, "CPL", 1, &[4], "- 1 1 -"),
    (0x30, "JR NC,r8", 2, &[12, 8], "- - - -"),
    (0x31, "LD SP,d16", 3, &[12], "- - - -"),
    (0x32, "LD (HL-),A", 1, &[8], "- - - -"),
    (0x33, "INC SP", 1, &[8], "- - - -"),
    (0x34, "INC (HL)", 1, &[12], "Z 0 H -"),
    (0x35, "DEC (HL)", 1, &[12], "Z 1 H -"),
    (0x36, "LD (HL),d8", 2, &[12], "- - - -"),
    (0x37, "SCF", 1, &[4], "- 0 0 1"),
    (0x38, "JR C,r8", 2, &[12, 8], "- - - -"),
    (0x39, "ADD HL,SP", 1, &[8], "- 0 H C"),
    (0x3A, "LD A,(HL-)", 1, &[8], "- - - -"),
    (0x3B, "DEC SP", 1, &[8], "- - - -"),
    (0x3C, "INC A", 1, &[4], "Z 0 H -"),
    (0x3D, "DEC A", 1, &[4], "Z 1 H -"),
    (0x3E, "LD A,d8", 2, &[8], "- - - -"),
    (0x3F, "CCF", 1, &[4], "- 0 0 C"),
    (0xC0, "RET NZ", 1, &[20, 8], "- - - -"),
    (0xC1, "POP BC", 1, &[12], "- - - -"),
    (0xC2, "JP NZ,a16", 3, &[16, 12], "- - - -"),
    (0xC3, "JP a16", 3, &[16], "- - - -"),
    (0xC4, "CALL NZ,a16", 3, &[24, 12], "- - - -"),
    (0xC5, "PUSH BC", 1, &[16], "- - - -"),
    (0xC6, "ADD A,d8", 2, &[8], "Z 0 H C"),
    (0xC7, "RST 00H", 1, &[16], "- - - -"),
    (0xC8, "RET Z", 1, &[20, 8], "- - - -"),
    (0xC9, "RET", 1, &[16], "- - - -"),
    (0xCA, "JP Z,a16", 3, &[16, 12], "- - - -"),
    (0xCB, "PREFIX CB", 1, &[4], "- - - -"),
    (0xCC, "CALL Z,a16", 3, &[24, 12], "- - - -"),
    (0xCD, "CALL a16", 3, &[24], "- - - -"),
    (0xCE, "ADC A,d8", 2, &[8], "Z 0 H C"),
    (0xCF, "RST 08H", 1, &[16], "- - - -"),
    (0xD0, "RET NC", 1, &[20, 8], "- - - -"),
    (0xD1, "POP DE", 1, &[12], "- - - -"),
    (0xD2, "JP NC,a16", 3, &[16, 12], "- - - -"),
    (0xD4, "CALL NC,a16", 3, &[24, 12], "- - - -"),
    (0xD5, "PUSH DE", 1, &[16], "- - - -"),
    (0xD6, "SUB d8", 2, &[8], "Z 1 H C"),
    (0xD7, "RST 10H", 1, &[16], "- - - -"),
    (0xD8, "RET C", 1, &[20, 8], "- - - -"),
    (0xD9, "RETI", 1, &[16], "- - - -"),
    (0xDA, "JP C,a16", 3, &[16, 12], "- - - -"),
    (0xDC, "CALL C,a16", 3, &[24, 12], "- - - -"),
    (0xDE, "SBC A,d8", 2, &[8], "Z 1 H C"),
    (0xDF, "RST 18H", 1, &[16], "- - - -"),
    (0xE0, "LDH (a8),A", 2, &[12], "- - - -"),
    (0xE1, "POP HL", 1, &[12], "- - - -"),
    (0xE2, "LD (C),A", 1, &[8], "- - - -"),
    (0xE5, "PUSH HL", 1, &[16], "- - - -"),
    (0xE6, "AND d8", 2, &[8], "Z 0 1 0"),
    (0xE7, "RST 20H", 1, &[16], "- - - -"),
    (0xE8, "ADD SP,r8", 2, &[16], "0 0 H C"),
    (0xE9, "JP (HL)", 1, &[4], "- - - -"),
    (0xEA, "LD (a16),A", 3, &[16], "- - - -"),
    (0xEE, "XOR d8", 2, &[8], "Z 0 0 0"),
    (0xEF, "RST 28H", 1, &[16], "- - - -"),
    (0xF0, "LDH A,(a8)", 2, &[12], "- - - -"),
    (0xF1, "POP AF", 1, &[12], "Z N H C"),
    (0xF2, "LD A,(C)", 1, &[8], "- - - -"),
    (0xF3, "DI", 1, &[4], "- - - -"),
    (0xF5, "PUSH AF", 1, &[16], "- - - -"),
    (0xF6, "OR d8", 2, &[8], "Z 0 0 0"),
    (0xF7, "RST 30H", 1, &[16], "- - - -"),
    (0xF8, "LD HL,SP+r8", 2, &[12], "0 0 H C"),
    (0xF9, "LD SP,HL", 1, &[8], "- - - -"),
    (0xFA, "LD A,(a16)", 3, &[16], "- - - -"),
    (0xFB, "EI", 1, &[4], "- - - -"),
    (0xFE, "CP d8", 2, &[8], "Z 1 H C"),
    (0xFF, "RST 38H", 1, &[16], "- - - -"),
];

/// Operand names in opcode-field order: 0=B … 6=(HL), 7=A.
const REG_NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];

/// Instruction catalog: 256 primary and 256 CB-prefixed entries, loaded
/// once at startup. A `None` slot is a valid "undefined opcode" marker.
pub struct Catalog {
    primary: Vec<Option<Instruction>>,
    prefixed: Vec<Option<Instruction>>,
}

impl Catalog {
    pub fn new() -> Self {
        let mut primary: Vec<Option<Instruction>> = (0..0x100).map(|_| None).collect();
        for &(opcode, mnemonic, length, cycles, flags) in PRIMARY_DEFS {
            primary[opcode as usize] = Some(Instruction {
                opcode,
                mnemonic: mnemonic.to_string(),
                length,
                cycles: cycles[0],
                cycles_not_taken: cycles.get(1).copied(),
                flags,
            });
        }
        for opcode in 0x40u8..=0xBF {
            primary[opcode as usize] = Some(Self::register_block_entry(opcode));
        }

        let prefixed = (0..0x100)
            .map(|opcode| Some(Self::prefixed_entry(opcode as u8)))
            .collect();

        Self { primary, prefixed }
    }

    pub fn primary(&self, opcode: u8) -> Option<&Instruction> {
        self.primary[opcode as usize].as_ref()
    }

    pub fn prefixed(&self, opcode: u8) -> Option<&Instruction> {
        self.prefixed[opcode as usize].as_ref()
    }

    /// The 0x40–0xBF block: `LD r,r'` transfers (with HALT in the 0x76
    /// slot) and the eight-opcode ALU families. All single-byte; `(HL)`
    /// operands cost one extra memory cycle.
    fn register_block_entry(opcode: u8) -> Instruction {
        if opcode == 0x76 {
            return Instruction {
                opcode,
                mnemonic: "HALT".to_string(),
                length: 1,
                cycles: 4,
                cycles_not_taken: None,
                flags: "- - - -",
            };
        }

        let src = REG_NAMES[(opcode & 0x07) as usize];
        let uses_hl = opcode & 0x07 == 6;

        if opcode < 0x80 {
            let dst = REG_NAMES[((opcode >> 3) & 0x07) as usize];
            Instruction {
                opcode,
                mnemonic: format!("LD {},{}", dst, src),
                length: 1,
                cycles: if uses_hl || (opcode >> 3) & 0x07 == 6 { 8 } else { 4 },
                cycles_not_taken: None,
                flags: "- - - -",
            }
        } else {
            const FAMILIES: [(&str, &str); 8] = [
                ("ADD A,", "Z 0 H C"),
                ("ADC A,", "Z 0 H C"),
                ("SUB ", "Z 1 H C"),
                ("SBC A,", "Z 1 H C"),
                ("AND ", "Z 0 1 0"),
                ("XOR ", "Z 0 0 0"),
                ("OR ", "Z 0 0 0"),
                ("CP ", "Z 1 H C"),
            ];
            let (name, flags) = FAMILIES[((opcode >> 3) & 0x07) as usize];
            Instruction {
                opcode,
                mnemonic: format!("{}{}", name, src),
                length: 1,
                cycles: if uses_hl { 8 } else { 4 },
                cycles_not_taken: None,
                flags,
            }
        }
    }

    /// The CB-prefixed table is fully regular: bits 7–6 select the group
    /// (rotate/shift, BIT, RES, SET), bits 5–3 the sub-operation or bit
    /// number, bits 2–0 the operand.
    fn prefixed_entry(opcode: u8) -> Instruction {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let target = REG_NAMES[z as usize];

        let (mnemonic, flags) = match x {
            0 => {
                const ROTATES: [(&str, &str); 8] = [
                    ("RLC", "Z 0 0 C"),
                    ("RRC", "Z 0 0 C"),
                    ("RL", "Z 0 0 C"),
                    ("RR", "Z 0 0 C"),
                    ("SLA", "Z 0 0 C"),
                    ("SRA", "Z 0 0 C"),
                    ("SWAP", "Z 0 0 0"),
                    ("SRL", "Z 0 0 C"),
                ];
                let (name, flags) = ROTATES[y as usize];
                (format!("{} {}", name, target), flags)
            }
            1 => (format!("BIT {},{}", y, target), "Z 0 1 -"),
            2 => (format!("RES {},{}", y, target), "- - - -"),
            _ => (format!("SET {},{}", y, target), "- - - -"),
        };

        // (HL) forms cost 16 cycles, except BIT which only reads: 12.
        let cycles = if z == 6 {
            if x == 1 {
                12
            } else {
                16
            }
        } else {
            8
        };

        Instruction {
            opcode,
            mnemonic,
            length: 2,
            cycles,
            cycles_not_taken: None,
            flags,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_opcodes_have_no_entry() {
        let catalog = Catalog::new();
        for opcode in [0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD] {
            assert!(catalog.primary(opcode).is_none(), "0x{:02X}", opcode);
        }
    }

    #[test]
    fn every_defined_primary_entry_is_present() {
        let catalog = Catalog::new();
        let defined = (0u16..0x100)
            .filter(|&op| catalog.primary(op as u8).is_some())
            .count();
        assert_eq!(defined, 245);
    }

    #[test]
    fn lengths_and_cycles_spot_checks() {
        let catalog = Catalog::new();

        let nop = catalog.primary(0x00).unwrap();
        assert_eq!((nop.length, nop.cycles), (1, 4));

        let ld_bc = catalog.primary(0x01).unwrap();
        assert_eq!((ld_bc.length, ld_bc.cycles), (3, 12));

        let jr_nz = catalog.primary(0x20).unwrap();
        assert_eq!(jr_nz.length, 2);
        assert_eq!((jr_nz.cycles, jr_nz.cycles_not_taken), (12, Some(8)));

        let call = catalog.primary(0xCD).unwrap();
        assert_eq!((call.length, call.cycles, call.cycles_not_taken), (3, 24, None));

        let ld_b_hl = catalog.primary(0x46).unwrap();
        assert_eq!(ld_b_hl.mnemonic, "LD B,(HL)");
        assert_eq!(ld_b_hl.cycles, 8);

        let add_a_a = catalog.primary(0x87).unwrap();
        assert_eq!(add_a_a.mnemonic, "ADD A,A");
        assert_eq!(add_a_a.flags, "Z 0 H C");
    }

    #[test]
    fn prefixed_table_is_complete_and_regular() {
        let catalog = Catalog::new();
        for opcode in 0u16..0x100 {
            let instr = catalog.prefixed(opcode as u8).unwrap();
            assert_eq!(instr.length, 2);
        }

        assert_eq!(catalog.prefixed(0x00).unwrap().mnemonic, "RLC B");
        assert_eq!(catalog.prefixed(0x46).unwrap().mnemonic, "BIT 0,(HL)");
        assert_eq!(catalog.prefixed(0x46).unwrap().cycles, 12);
        assert_eq!(catalog.prefixed(0x86).unwrap().mnemonic, "RES 0,(HL)");
        assert_eq!(catalog.prefixed(0x86).unwrap().cycles, 16);
        assert_eq!(catalog.prefixed(0xFF).unwrap().mnemonic, "SET 7,A");
        assert_eq!(catalog.prefixed(0x37).unwrap().mnemonic, "SWAP A");
        assert_eq!(catalog.prefixed(0x37).unwrap().flags, "Z 0 0 0");
    }
}
