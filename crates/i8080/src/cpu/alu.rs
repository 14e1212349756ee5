use super::Cpu;
use crate::decode::AluOp;

#[inline]
fn even_parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

impl Cpu {
    /// Shared flag routine for 8-bit arithmetic.
    ///
    /// `result` carries one bit beyond the operand width: bit 8 becomes the
    /// carry (or borrow, for subtraction done in 16-bit wrapping arithmetic).
    /// Auxiliary carry is bit 4 of `lhs ^ rhs ^ result`.
    pub(super) fn update_flags(&mut self, result: u16, lhs: u8, rhs: u8) {
        let low = result as u8;
        let flags = &mut self.regs.flags;
        flags.ac = ((lhs as u16 ^ rhs as u16 ^ result) & 0x10) != 0;
        flags.s = (low & 0x80) != 0;
        flags.z = low == 0;
        flags.p = even_parity(low);
        flags.cy = (result & 0x100) != 0;
    }

    /// Accumulator ALU operation shared by the register, memory and
    /// immediate forms.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.flags.cy as u16;
        match op {
            AluOp::Add => {
                let result = a as u16 + value as u16;
                self.update_flags(result, a, value);
                self.regs.a = result as u8;
            }
            AluOp::Adc => {
                let result = a as u16 + value as u16 + carry;
                self.update_flags(result, a, value);
                self.regs.a = result as u8;
            }
            AluOp::Sub => {
                let result = (a as u16).wrapping_sub(value as u16);
                self.update_flags(result, a, value);
                self.regs.a = result as u8;
            }
            AluOp::Sbb => {
                let result = (a as u16).wrapping_sub(value as u16).wrapping_sub(carry);
                self.update_flags(result, a, value);
                self.regs.a = result as u8;
            }
            AluOp::Ana => self.logical(a & value, a, value),
            AluOp::Xra => self.logical(a ^ value, a, value),
            AluOp::Ora => self.logical(a | value, a, value),
            AluOp::Cmp => {
                let result = (a as u16).wrapping_sub(value as u16);
                self.update_flags(result, a, value);
            }
        }
    }

    fn logical(&mut self, result: u8, a: u8, value: u8) {
        self.update_flags(result as u16, a, value);
        // Logical operations always clear CY and AC.
        self.regs.flags.cy = false;
        self.regs.flags.ac = false;
        self.regs.a = result;
    }

    pub(super) fn inr(&mut self, value: u8) -> u8 {
        let carry = self.regs.flags.cy;
        let result = value as u16 + 1;
        self.update_flags(result, value, 1);
        // Carry flag is not affected by INR.
        self.regs.flags.cy = carry;
        result as u8
    }

    pub(super) fn dcr(&mut self, value: u8) -> u8 {
        let carry = self.regs.flags.cy;
        let result = (value as u16).wrapping_sub(1);
        self.update_flags(result, value, 1);
        // Carry flag is not affected by DCR.
        self.regs.flags.cy = carry;
        result as u8
    }

    /// 16-bit add into H:L. Only CY changes, from bit 16 of the sum.
    pub(super) fn dad(&mut self, value: u16) {
        let result = self.regs.hl() as u32 + value as u32;
        self.regs.flags.cy = result > 0xffff;
        self.regs.set_hl(result as u16);
    }

    /// Decimal adjust the accumulator.
    ///
    /// The low nibble is corrected first. The high nibble is then corrected
    /// against the carry held before the instruction, and AC ends up as the
    /// low-nibble step left it.
    pub(super) fn daa(&mut self) {
        let carry_in = self.regs.flags.cy;

        let a = self.regs.a;
        if (a & 0x0f) > 9 || self.regs.flags.ac {
            let result = (a as u16 + 0x06) & 0xff;
            self.update_flags(result, a, 0x06);
            self.regs.flags.ac = true;
            self.regs.a = result as u8;
        } else {
            self.regs.flags.ac = false;
        }
        let ac = self.regs.flags.ac;

        let a = self.regs.a;
        if (a >> 4) > 9 || carry_in {
            let result = a as u16 + 0x60;
            self.update_flags(result, a, 0x60);
            self.regs.flags.cy = true;
            self.regs.a = result as u8;
        } else {
            self.regs.flags.cy = false;
        }
        self.regs.flags.ac = ac;
    }

    pub(super) fn rlc(&mut self) {
        let bit7 = (self.regs.a & 0x80) != 0;
        self.regs.a = self.regs.a.rotate_left(1);
        self.regs.flags.cy = bit7;
    }

    pub(super) fn rrc(&mut self) {
        let bit0 = (self.regs.a & 0x01) != 0;
        self.regs.a = self.regs.a.rotate_right(1);
        self.regs.flags.cy = bit0;
    }

    pub(super) fn ral(&mut self) {
        let bit7 = (self.regs.a & 0x80) != 0;
        let carry = self.regs.flags.cy as u8;
        self.regs.a = (self.regs.a << 1) | carry;
        self.regs.flags.cy = bit7;
    }

    pub(super) fn rar(&mut self) {
        let bit0 = (self.regs.a & 0x01) != 0;
        let carry = if self.regs.flags.cy { 0x80 } else { 0 };
        self.regs.a = (self.regs.a >> 1) | carry;
        self.regs.flags.cy = bit0;
    }
}

#[cfg(test)]
mod tests {
    use crate::cpu::regs::Flags;
    use crate::decode::AluOp;
    use crate::{Cpu, Memory};

    fn cpu() -> Cpu {
        Cpu::new(Memory::new(0x100))
    }

    fn reference_flags(result: u16, lhs: u8, rhs: u8) -> Flags {
        let low = (result & 0xff) as u8;
        Flags {
            s: low >= 0x80,
            z: low == 0,
            p: low.count_ones() % 2 == 0,
            cy: result > 0xff,
            ac: ((lhs ^ rhs ^ low) & 0x10) != 0,
        }
    }

    #[test]
    fn add_matches_nine_bit_sum_for_all_operands() {
        let mut cpu = cpu();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                cpu.regs.a = a;
                cpu.alu(AluOp::Add, b);
                let sum = a as u16 + b as u16;
                assert_eq!(cpu.regs.a, sum as u8);
                assert_eq!(cpu.regs.flags, reference_flags(sum, a, b), "{a:02x}+{b:02x}");
            }
        }
    }

    #[test]
    fn sub_sets_borrow_and_nibble_borrow() {
        let mut cpu = cpu();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                cpu.regs.a = a;
                cpu.alu(AluOp::Sub, b);
                assert_eq!(cpu.regs.a, a.wrapping_sub(b));
                assert_eq!(cpu.regs.flags.cy, a < b, "{a:02x}-{b:02x}");
                assert_eq!(cpu.regs.flags.ac, (a & 0x0f) < (b & 0x0f), "{a:02x}-{b:02x}");
                assert_eq!(cpu.regs.flags.z, a == b);
            }
        }
    }

    #[test]
    fn adc_and_sbb_use_carry_in() {
        let mut cpu = cpu();
        cpu.regs.a = 0x0f;
        cpu.regs.flags.cy = true;
        cpu.alu(AluOp::Adc, 0x00);
        assert_eq!(cpu.regs.a, 0x10);
        assert!(cpu.regs.flags.ac);
        assert!(!cpu.regs.flags.cy);

        cpu.regs.a = 0x01;
        cpu.regs.flags.cy = true;
        cpu.alu(AluOp::Adc, 0xff);
        assert_eq!(cpu.regs.a, 0x01);
        assert!(cpu.regs.flags.cy);
        assert!(cpu.regs.flags.ac);

        cpu.regs.a = 0x00;
        cpu.regs.flags.cy = true;
        cpu.alu(AluOp::Sbb, 0x00);
        assert_eq!(cpu.regs.a, 0xff);
        assert!(cpu.regs.flags.cy);
        assert!(cpu.regs.flags.s);
    }

    #[test]
    fn cmp_leaves_accumulator() {
        let mut cpu = cpu();
        cpu.regs.a = 0x40;
        cpu.alu(AluOp::Cmp, 0x40);
        assert_eq!(cpu.regs.a, 0x40);
        assert!(cpu.regs.flags.z);
        cpu.alu(AluOp::Cmp, 0x41);
        assert!(cpu.regs.flags.cy);
        assert!(!cpu.regs.flags.z);
    }

    #[test]
    fn logical_ops_clear_carry_and_aux_carry() {
        let mut cpu = cpu();
        for op in [AluOp::Ana, AluOp::Xra, AluOp::Ora] {
            for a in (0..=255u8).step_by(7) {
                for b in (0..=255u8).step_by(5) {
                    cpu.regs.a = a;
                    cpu.regs.flags.cy = true;
                    cpu.regs.flags.ac = true;
                    cpu.alu(op, b);
                    assert!(!cpu.regs.flags.cy, "{op:?} {a:02x},{b:02x}");
                    assert!(!cpu.regs.flags.ac, "{op:?} {a:02x},{b:02x}");
                }
            }
        }
        cpu.regs.a = 0b1010_1010;
        cpu.alu(AluOp::Xra, 0b1010_1010);
        assert_eq!(cpu.regs.a, 0);
        assert!(cpu.regs.flags.z);
        assert!(cpu.regs.flags.p);
    }

    #[test]
    fn inr_dcr_never_touch_carry() {
        let mut cpu = cpu();
        for carry in [false, true] {
            for v in 0..=255u8 {
                cpu.regs.flags.cy = carry;
                assert_eq!(cpu.inr(v), v.wrapping_add(1));
                assert_eq!(cpu.regs.flags.cy, carry);
                assert_eq!(cpu.dcr(v), v.wrapping_sub(1));
                assert_eq!(cpu.regs.flags.cy, carry);
            }
        }
        cpu.regs.flags.cy = false;
        assert_eq!(cpu.inr(0xff), 0x00);
        assert!(cpu.regs.flags.z);
        assert!(!cpu.regs.flags.cy);
        assert_eq!(cpu.dcr(0x00), 0xff);
        assert!(cpu.regs.flags.s);
        assert!(!cpu.regs.flags.cy);
    }

    #[test]
    fn dad_only_changes_carry() {
        let mut cpu = cpu();
        cpu.regs.set_hl(0xffff);
        cpu.regs.flags.z = true;
        cpu.regs.flags.s = true;
        cpu.dad(0x0002);
        assert_eq!(cpu.regs.hl(), 0x0001);
        assert!(cpu.regs.flags.cy);
        assert!(cpu.regs.flags.z);
        assert!(cpu.regs.flags.s);
        cpu.dad(0x1000);
        assert_eq!(cpu.regs.hl(), 0x1001);
        assert!(!cpu.regs.flags.cy);
    }

    #[test]
    fn daa_bcd_overflow() {
        let mut cpu = cpu();
        cpu.regs.a = 0x9a;
        cpu.regs.flags.ac = false;
        cpu.regs.flags.cy = false;
        cpu.daa();
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flags.cy);
        assert!(cpu.regs.flags.ac);
        assert!(cpu.regs.flags.z);
    }

    #[test]
    fn daa_after_bcd_addition() {
        let mut cpu = cpu();
        // 0x38 + 0x45 = 0x7d, adjusted to 83
        cpu.regs.a = 0x38;
        cpu.alu(AluOp::Add, 0x45);
        cpu.daa();
        assert_eq!(cpu.regs.a, 0x83);
        assert!(!cpu.regs.flags.cy);

        // 0x99 + 0x01 = 0x9a, adjusted to 00 with carry
        cpu.regs.a = 0x99;
        cpu.alu(AluOp::Add, 0x01);
        cpu.daa();
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flags.cy);

        // carry held before the instruction forces the high correction
        cpu.regs.a = 0x12;
        cpu.regs.flags.ac = false;
        cpu.regs.flags.cy = true;
        cpu.daa();
        assert_eq!(cpu.regs.a, 0x72);
        assert!(cpu.regs.flags.cy);
        assert!(!cpu.regs.flags.ac);
    }

    #[test]
    fn rotates() {
        let mut cpu = cpu();
        cpu.regs.a = 0x81;
        cpu.regs.flags.cy = false;
        cpu.rlc();
        assert_eq!(cpu.regs.a, 0x03);
        assert!(cpu.regs.flags.cy);

        cpu.regs.a = 0x81;
        cpu.rrc();
        assert_eq!(cpu.regs.a, 0xc0);
        assert!(cpu.regs.flags.cy);

        cpu.regs.a = 0x80;
        cpu.regs.flags.cy = false;
        cpu.ral();
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flags.cy);
        cpu.ral();
        assert_eq!(cpu.regs.a, 0x01);
        assert!(!cpu.regs.flags.cy);

        cpu.regs.a = 0x01;
        cpu.regs.flags.cy = false;
        cpu.rar();
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flags.cy);
        cpu.rar();
        assert_eq!(cpu.regs.a, 0x80);
        assert!(!cpu.regs.flags.cy);
    }
}
