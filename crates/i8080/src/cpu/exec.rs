mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Cpu, StepStatus};
use crate::decode::{Op, Operand};

impl Cpu {
    /// Execute a decoded instruction. PC already points past the opcode.
    pub(super) fn execute(&mut self, op: Op) -> StepStatus {
        match op {
            Op::Nop => {}
            Op::Hlt => return self.exec_hlt(),

            // Data transfer
            Op::Mov { dst, src } => self.exec_mov(dst, src),
            Op::Mvi(dst) => self.exec_mvi(dst),
            Op::Lxi(rp) => self.exec_lxi(rp),
            Op::Lda => self.exec_lda(),
            Op::Sta => self.exec_sta(),
            Op::Lhld => self.exec_lhld(),
            Op::Shld => self.exec_shld(),
            Op::Ldax(rp) => self.exec_ldax(rp),
            Op::Stax(rp) => self.exec_stax(rp),
            Op::Xchg => self.exec_xchg(),

            // Arithmetic and logic
            Op::Alu(alu_op, src) => self.exec_alu(alu_op, src),
            Op::AluImm(alu_op) => self.exec_alu_imm(alu_op),
            Op::Dad(rp) => self.exec_dad(rp),
            Op::Rlc | Op::Rrc | Op::Ral | Op::Rar => self.exec_rotate(op),
            Op::Daa => self.daa(),
            Op::Cma => self.regs.a = !self.regs.a,
            Op::Stc => self.regs.flags.cy = true,
            Op::Cmc => self.regs.flags.cy = !self.regs.flags.cy,

            // Increment / decrement
            Op::Inr(dst) => self.exec_inr(dst),
            Op::Dcr(dst) => self.exec_dcr(dst),
            Op::Inx(rp) => self.exec_inx(rp),
            Op::Dcx(rp) => self.exec_dcx(rp),

            // Control transfer
            Op::Jmp => self.exec_jmp(None),
            Op::JmpIf(cond) => self.exec_jmp(Some(cond)),
            Op::Call => self.exec_call(None),
            Op::CallIf(cond) => self.exec_call(Some(cond)),
            Op::Ret => self.exec_ret(None),
            Op::RetIf(cond) => self.exec_ret(Some(cond)),
            Op::Rst(vector) => self.exec_rst(vector),
            Op::Pchl => self.regs.pc = self.regs.hl(),

            // Stack
            Op::Push(rp) => self.exec_push(rp),
            Op::Pop(rp) => self.exec_pop(rp),
            Op::Xthl => self.exec_xthl(),
            Op::Sphl => self.regs.sp = self.regs.hl(),

            // Machine control and I/O
            Op::In => self.exec_in(),
            Op::Out => self.exec_out(),
            Op::Ei => self.regs.interrupts_enabled = true,
            Op::Di => self.regs.interrupts_enabled = false,
        }
        StepStatus::Continue
    }

    /// Read an 8-bit operand; `m` reads memory at H:L.
    #[inline]
    fn read_operand(&self, src: Operand) -> u8 {
        match src {
            Operand::Reg(reg) => self.regs.reg(reg),
            Operand::M => self.memory.read(self.regs.hl()),
        }
    }

    #[inline]
    fn write_operand(&mut self, dst: Operand, value: u8) {
        match dst {
            Operand::Reg(reg) => *self.regs.reg_mut(reg) = value,
            Operand::M => {
                let addr = self.regs.hl();
                self.memory.write(addr, value);
            }
        }
    }
}
