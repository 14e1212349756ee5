use crate::cpu::regs::RegPair;
use crate::cpu::Cpu;
use crate::decode::{AluOp, Op, Operand};

impl Cpu {
    /// ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP with a register or memory operand.
    pub(super) fn exec_alu(&mut self, op: AluOp, src: Operand) {
        let value = self.read_operand(src);
        self.alu(op, value);
    }

    /// ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI d8
    pub(super) fn exec_alu_imm(&mut self, op: AluOp) {
        let value = self.fetch_byte();
        self.alu(op, value);
    }

    pub(super) fn exec_dad(&mut self, rp: RegPair) {
        let value = self.regs.pair(rp);
        self.dad(value);
    }

    pub(super) fn exec_rotate(&mut self, op: Op) {
        match op {
            Op::Rlc => self.rlc(),
            Op::Rrc => self.rrc(),
            Op::Ral => self.ral(),
            Op::Rar => self.rar(),
            _ => unreachable!("{} is not a rotate", op),
        }
    }
}
