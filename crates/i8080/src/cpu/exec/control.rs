use crate::cpu::Cpu;
use crate::decode::Cond;

impl Cpu {
    /// JMP a16, or Jcc a16 when `cond` is set. Not taken falls through past
    /// the three-byte encoding.
    pub(super) fn exec_jmp(&mut self, cond: Option<Cond>) {
        let addr = self.fetch_word();
        if cond.map_or(true, |cc| self.condition(cc)) {
            self.regs.pc = addr;
        }
    }

    /// CALL a16 / Ccc a16. The pushed return address is the instruction's
    /// own address + 3.
    pub(super) fn exec_call(&mut self, cond: Option<Cond>) {
        let addr = self.fetch_word();
        if cond.map_or(true, |cc| self.condition(cc)) {
            self.push(self.regs.pc);
            self.regs.pc = addr;
        }
    }

    /// RET / Rcc
    pub(super) fn exec_ret(&mut self, cond: Option<Cond>) {
        if cond.map_or(true, |cc| self.condition(cc)) {
            self.regs.pc = self.pop();
        }
    }

    /// RST n: push the address after the one-byte opcode and jump to 8 * n.
    pub(super) fn exec_rst(&mut self, vector: u8) {
        self.push(self.regs.pc);
        self.regs.pc = u16::from(vector & 0x07) << 3;
    }
}
