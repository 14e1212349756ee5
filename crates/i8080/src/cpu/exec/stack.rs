use crate::cpu::regs::StackPair;
use crate::cpu::Cpu;

impl Cpu {
    /// PUSH B/D/H/PSW
    pub(super) fn exec_push(&mut self, rp: StackPair) {
        let value = self.regs.stack_pair(rp);
        self.push(value);
    }

    /// POP B/D/H/PSW
    pub(super) fn exec_pop(&mut self, rp: StackPair) {
        let value = self.pop();
        self.regs.set_stack_pair(rp, value);
    }

    /// XTHL: swap H:L with the word on top of the stack.
    pub(super) fn exec_xthl(&mut self) {
        let sp = self.regs.sp;
        let top = self.memory.read_word(sp);
        self.memory.write_word(sp, self.regs.hl());
        self.regs.set_hl(top);
    }
}
