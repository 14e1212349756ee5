use crate::cpu::regs::RegPair;
use crate::cpu::Cpu;
use crate::decode::Operand;

impl Cpu {
    /// INR r / INR M (CY preserved).
    pub(super) fn exec_inr(&mut self, dst: Operand) {
        let value = self.read_operand(dst);
        let result = self.inr(value);
        self.write_operand(dst, result);
    }

    /// DCR r / DCR M (CY preserved).
    pub(super) fn exec_dcr(&mut self, dst: Operand) {
        let value = self.read_operand(dst);
        let result = self.dcr(value);
        self.write_operand(dst, result);
    }

    /// INX rp, no flags.
    pub(super) fn exec_inx(&mut self, rp: RegPair) {
        let value = self.regs.pair(rp).wrapping_add(1);
        self.regs.set_pair(rp, value);
    }

    /// DCX rp, no flags.
    pub(super) fn exec_dcx(&mut self, rp: RegPair) {
        let value = self.regs.pair(rp).wrapping_sub(1);
        self.regs.set_pair(rp, value);
    }
}
