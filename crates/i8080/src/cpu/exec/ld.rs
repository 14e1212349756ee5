use crate::cpu::regs::RegPair;
use crate::cpu::Cpu;
use crate::decode::Operand;

impl Cpu {
    /// MOV dst,src (register, or memory at H:L on either side).
    pub(super) fn exec_mov(&mut self, dst: Operand, src: Operand) {
        let value = self.read_operand(src);
        self.write_operand(dst, value);
    }

    /// MVI dst,d8
    pub(super) fn exec_mvi(&mut self, dst: Operand) {
        let value = self.fetch_byte();
        self.write_operand(dst, value);
    }

    /// LXI rp,d16
    pub(super) fn exec_lxi(&mut self, rp: RegPair) {
        let value = self.fetch_word();
        self.regs.set_pair(rp, value);
    }

    pub(super) fn exec_lda(&mut self) {
        let addr = self.fetch_word();
        self.regs.a = self.memory.read(addr);
    }

    pub(super) fn exec_sta(&mut self) {
        let addr = self.fetch_word();
        self.memory.write(addr, self.regs.a);
    }

    /// LHLD a16: L from a16, H from a16+1.
    pub(super) fn exec_lhld(&mut self) {
        let addr = self.fetch_word();
        self.regs.l = self.memory.read(addr);
        self.regs.h = self.memory.read(addr.wrapping_add(1));
    }

    /// SHLD a16: L to a16, H to a16+1.
    pub(super) fn exec_shld(&mut self) {
        let addr = self.fetch_word();
        self.memory.write(addr, self.regs.l);
        self.memory.write(addr.wrapping_add(1), self.regs.h);
    }

    /// LDAX B / LDAX D
    pub(super) fn exec_ldax(&mut self, rp: RegPair) {
        let addr = self.regs.pair(rp);
        self.regs.a = self.memory.read(addr);
    }

    /// STAX B / STAX D
    pub(super) fn exec_stax(&mut self, rp: RegPair) {
        let addr = self.regs.pair(rp);
        self.memory.write(addr, self.regs.a);
    }

    pub(super) fn exec_xchg(&mut self) {
        let de = self.regs.de();
        let hl = self.regs.hl();
        self.regs.set_de(hl);
        self.regs.set_hl(de);
    }
}
