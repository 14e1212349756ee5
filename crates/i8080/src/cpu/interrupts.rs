use super::Cpu;

impl Cpu {
    /// Request a maskable interrupt with restart vector `vector` (0..=7).
    ///
    /// Ignored while INTE is clear. Otherwise behaves like `rst vector`
    /// executed between instructions: the current PC (not PC + 1) is pushed,
    /// INTE is cleared and a pending halt is released. Only the low three
    /// bits of `vector` are used.
    pub fn interrupt(&mut self, vector: u8) {
        if !self.regs.interrupts_enabled {
            log::trace!("interrupt {} ignored, interrupts disabled", vector);
            return;
        }
        let addr = u16::from(vector & 0x07) << 3;
        log::debug!(
            "interrupt {} accepted at PC=0x{:04X}, vector 0x{:04X}",
            vector & 0x07,
            self.regs.pc,
            addr
        );
        self.regs.interrupts_enabled = false;
        self.halted = false;
        self.push(self.regs.pc);
        self.regs.pc = addr;
    }
}
