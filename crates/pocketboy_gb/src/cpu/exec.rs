use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Decode and execute a single primary-table opcode.
    ///
    /// Handlers mutate registers, flags, SP and memory but never advance PC
    /// past their own instruction: the step loop adds the declared length
    /// afterwards. Control transfers go through `jump`, which parks PC at
    /// `target - length` so that advance lands on the target.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        match opcode {
            // NOP
            0x00 => {}

            // LD rr, d16
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(bus, opcode),

            // LD (BC/DE/HL±), A
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),

            // LD A, (BC/DE/HL±)
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),

            // INC rr / DEC rr (no flag effects)
            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16(opcode),

            // INC r / DEC r (including (HL) forms)
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                self.exec_inc8(bus, opcode)
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                self.exec_dec8(bus, opcode)
            }

            // LD r, d8 (and LD (HL), d8)
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(bus, opcode)
            }

            // Accumulator rotates (Z forced to zero, unlike the CB forms).
            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),

            // LD (a16), SP
            0x08 => self.exec_ld_a16_sp(bus),

            // ADD HL, rr
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(opcode),

            // STOP: the engine models only running/halted, so idle like HALT.
            0x10 => {
                log::debug!("STOP at PC=0x{:04X}, idling", self.regs.pc);
                self.halted = true;
            }

            // JR r8 / JR cc, r8
            0x18 => self.exec_jr(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => {
                let cond = self.condition(opcode >> 3);
                self.exec_jr(bus, cond)
            }

            0x27 => self.alu_daa(),
            // CPL: A = !A, flags - 1 1 -
            0x2F => {
                self.regs.a ^= 0xFF;
                self.set_flag(Flag::N, true);
                self.set_flag(Flag::H, true);
            }
            // SCF: flags - 0 0 1
            0x37 => {
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, true);
            }
            // CCF: flags - 0 0 !C
            0x3F => {
                let carry = self.get_flag(Flag::C);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, false);
                self.set_flag(Flag::C, !carry);
            }

            // HALT sits in the middle of the LD r,r block.
            0x76 => self.halted = true,

            // LD r1, r2 (register/memory transfers)
            0x40..=0x7F => {
                let dst = (opcode >> 3) & 0x07;
                let src = opcode & 0x07;
                let value = self.read_reg8(bus, src);
                self.write_reg8(bus, dst, value);
            }

            // ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, r
            0x80..=0xBF => {
                let value = self.read_reg8(bus, opcode & 0x07);
                self.exec_alu_op((opcode >> 3) & 0x07, value);
            }

            // RET cc / RET / RETI
            0xC0 | 0xC8 | 0xD0 | 0xD8 => {
                let cond = self.condition(opcode >> 3);
                self.exec_ret(bus, cond)
            }
            0xC9 => self.exec_ret(bus, true),
            0xD9 => {
                self.exec_ret(bus, true);
                self.ime = true;
            }

            // POP rr / PUSH rr
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop_rr(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push_rr(bus, opcode),

            // JP cc, a16 / JP a16 / JP (HL)
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let cond = self.condition(opcode >> 3);
                self.exec_jp_a16(bus, cond)
            }
            0xC3 => self.exec_jp_a16(bus, true),
            0xE9 => {
                let hl = self.regs.hl();
                self.jump(hl, 1);
            }

            // CALL cc, a16 / CALL a16
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let cond = self.condition(opcode >> 3);
                self.exec_call_a16(bus, cond)
            }
            0xCD => self.exec_call_a16(bus, true),

            // ALU A, d8
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.imm8(bus);
                self.exec_alu_op((opcode >> 3) & 0x07, value);
            }

            // RST n: push the return address, jump to the fixed vector.
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                let ret = self.regs.pc.wrapping_add(1);
                self.push_u16(bus, ret);
                self.jump((opcode & 0x38) as u16, 1);
            }

            // LDH (a8), A / LDH A, (a8)
            0xE0 => {
                let addr = 0xFF00u16.wrapping_add(self.imm8(bus) as u16);
                bus.write8(addr, self.regs.a);
            }
            0xF0 => {
                let addr = 0xFF00u16.wrapping_add(self.imm8(bus) as u16);
                self.regs.a = bus.read8(addr);
            }

            // LD (C), A / LD A, (C)
            0xE2 => {
                let addr = 0xFF00u16.wrapping_add(self.regs.c as u16);
                bus.write8(addr, self.regs.a);
            }
            0xF2 => {
                let addr = 0xFF00u16.wrapping_add(self.regs.c as u16);
                self.regs.a = bus.read8(addr);
            }

            // ADD SP, r8 / LD HL, SP+r8 / LD SP, HL
            0xE8 => {
                let imm = self.imm8(bus);
                let sp = self.regs.sp;
                self.regs.sp = self.alu_add16_signed(sp, imm);
            }
            0xF8 => {
                let imm = self.imm8(bus);
                let sp = self.regs.sp;
                let result = self.alu_add16_signed(sp, imm);
                self.regs.set_hl(result);
            }
            0xF9 => self.regs.sp = self.regs.hl(),

            // LD (a16), A / LD A, (a16)
            0xEA => {
                let addr = self.imm16(bus);
                bus.write8(addr, self.regs.a);
            }
            0xFA => {
                let addr = self.imm16(bus);
                self.regs.a = bus.read8(addr);
            }

            // DI / EI
            0xF3 => self.ime = false,
            0xFB => self.ime = true,

            // Opcode holes and the 0xCB prefix never reach the handler
            // table: the step loop filters them against the catalog first.
            _ => {}
        }
    }

    /// ALU family selector shared by the register and immediate forms:
    /// 0=ADD, 1=ADC, 2=SUB, 3=SBC, 4=AND, 5=XOR, 6=OR, 7=CP.
    fn exec_alu_op(&mut self, family: u8, value: u8) {
        match family {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.imm16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = match opcode {
            0x02 => self.regs.bc(),
            0x12 => self.regs.de(),
            _ => self.regs.hl(),
        };
        bus.write8(addr, self.regs.a);
        match opcode {
            0x22 => self.regs.set_hl(addr.wrapping_add(1)),
            0x32 => self.regs.set_hl(addr.wrapping_sub(1)),
            _ => {}
        }
    }

    fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let addr = match opcode {
            0x0A => self.regs.bc(),
            0x1A => self.regs.de(),
            _ => self.regs.hl(),
        };
        self.regs.a = bus.read8(addr);
        match opcode {
            0x2A => self.regs.set_hl(addr.wrapping_add(1)),
            0x3A => self.regs.set_hl(addr.wrapping_sub(1)),
            _ => {}
        }
    }

    fn exec_inc16(&mut self, opcode: u8) {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_add(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_add(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_add(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_add(1),
        }
    }

    fn exec_dec16(&mut self, opcode: u8) {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_sub(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_sub(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_sub(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_sub(1),
        }
    }

    fn exec_inc8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, index, result);
    }

    fn exec_dec8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let index = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, index);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, index, result);
    }

    fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.imm8(bus);
        self.write_reg8(bus, (opcode >> 3) & 0x07, value);
    }

    /// RLCA/RRCA/RLA/RRA. Unlike the CB-prefixed forms these always clear
    /// Z, N and H and only carry the rotated-out bit.
    fn exec_rotate_a(&mut self, opcode: u8) {
        let a = self.regs.a;
        let carry_in = self.get_flag(Flag::C);
        let (result, carry_out) = match opcode {
            // RLCA
            0x07 => (a.rotate_left(1), a & 0x80 != 0),
            // RRCA
            0x0F => (a.rotate_right(1), a & 0x01 != 0),
            // RLA
            0x17 => ((a << 1) | carry_in as u8, a & 0x80 != 0),
            // RRA
            _ => ((a >> 1) | ((carry_in as u8) << 7), a & 0x01 != 0),
        };
        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::C, carry_out);
    }

    fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.imm16(bus);
        let [hi, lo] = self.regs.sp.to_be_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }

    fn exec_add_hl_rr(&mut self, opcode: u8) {
        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        };
        self.alu_add16_hl(value);
    }

    /// Relative jump: the displacement is signed and relative to the
    /// address of the following instruction.
    fn exec_jr<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let disp = self.simm8(bus) as i16;
        if cond {
            let target = self
                .regs
                .pc
                .wrapping_add(2)
                .wrapping_add(disp as u16);
            self.jump(target, 2);
        } else {
            self.branch_taken = false;
        }
    }

    fn exec_jp_a16<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let target = self.imm16(bus);
        if cond {
            self.jump(target, 3);
        } else {
            self.branch_taken = false;
        }
    }

    /// CALL pushes the address of the following instruction, then
    /// transfers to the immediate target.
    fn exec_call_a16<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let target = self.imm16(bus);
        if cond {
            let ret = self.regs.pc.wrapping_add(3);
            self.push_u16(bus, ret);
            self.jump(target, 3);
        } else {
            self.branch_taken = false;
        }
    }

    fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        if cond {
            let target = self.pop_u16(bus);
            self.jump(target, 1);
        } else {
            self.branch_taken = false;
        }
    }

    fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.set_af(value),
        }
    }

    fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        };
        self.push_u16(bus, value);
    }
}
