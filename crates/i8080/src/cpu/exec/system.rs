use crate::cpu::{Cpu, HaltReason, StepStatus};
use crate::hooks::IoDirection;

/// Data byte handed to the I/O hook on `in`; the hook's return value is what
/// counts.
const INPUT_DATA_FILLER: u8 = 0xee;

impl Cpu {
    /// HLT: PC stays past the opcode so an interrupt resumes after it.
    pub(super) fn exec_hlt(&mut self) -> StepStatus {
        log::debug!("HLT at 0x{:04X}", self.regs.pc.wrapping_sub(1));
        self.halted = true;
        StepStatus::Halted(HaltReason::Hlt)
    }

    /// IN port
    pub(super) fn exec_in(&mut self) {
        let port = self.fetch_byte();
        if let Some(value) = self.io(port, INPUT_DATA_FILLER, IoDirection::In) {
            self.regs.a = value;
        }
    }

    /// OUT port
    pub(super) fn exec_out(&mut self) {
        let port = self.fetch_byte();
        let _ = self.io(port, self.regs.a, IoDirection::Out);
    }
}
