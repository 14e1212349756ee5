mod alu;
mod exec;
mod interrupts;
pub mod regs;


use crate::config::CpuConfig;
use crate::decode::{decode, Cond};
use crate::error::CpuError;
use crate::hooks::{InstructionHook, IoDirection, IoHook, StepEvent, StepObserver};
use crate::memory::Memory;

pub use regs::{Flags, Reg, RegPair, Registers, StackPair};

/// Why the CPU stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// A `hlt` instruction executed. Only a serviced interrupt or a reset
    /// resumes execution.
    Hlt,
    /// The program counter reached the last byte of the memory image.
    EndOfMemory,
}

/// Outcome of a single [`Cpu::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Continue,
    Halted(HaltReason),
}

/// Result of [`Cpu::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps that returned [`StepStatus::Continue`].
    pub steps: u64,
    /// `None` when the step budget ran out first.
    pub halt: Option<HaltReason>,
}

/// Intel 8080 CPU with its memory image and host hooks.
pub struct Cpu {
    pub regs: Registers,
    pub memory: Memory,
    halted: bool,
    instruction_hook: Option<InstructionHook>,
    io_hook: Option<IoHook>,
    observer: Option<Box<dyn StepObserver>>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(Memory::default())
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("memory", &self.memory)
            .field("halted", &self.halted)
            .field("instruction_hook", &self.instruction_hook.is_some())
            .field("io_hook", &self.io_hook.is_some())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Cpu {
    /// Create a CPU in reset state that owns `memory` for the whole session.
    pub fn new(memory: Memory) -> Self {
        Self {
            regs: Registers::default(),
            memory,
            halted: false,
            instruction_hook: None,
            io_hook: None,
            observer: None,
        }
    }

    /// Create a CPU with a zero-filled memory image sized by `config`.
    pub fn from_config(config: &CpuConfig) -> Self {
        let mut cpu = Self::new(Memory::new(config.memory_size));
        cpu.regs.pc = config.start_pc;
        cpu.regs.sp = config.start_sp;
        cpu.regs.interrupts_enabled = config.interrupts_enabled;
        cpu
    }

    /// Reset all registers to their power-on values.
    ///
    /// Memory contents and installed hooks are kept.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.halted = false;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.regs.interrupts_enabled
    }

    /// Install the hook consulted before every decode, replacing any
    /// previous one.
    pub fn set_instruction_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Registers, &mut Memory) -> bool + 'static,
    {
        self.instruction_hook = Some(Box::new(hook));
    }

    pub fn clear_instruction_hook(&mut self) {
        self.instruction_hook = None;
    }

    /// Install the port handler used by `in` and `out`, replacing any
    /// previous one. Without a handler both instructions only advance PC.
    pub fn set_io_hook<F>(&mut self, hook: F)
    where
        F: FnMut(u8, u8, IoDirection) -> u8 + 'static,
    {
        self.io_hook = Some(Box::new(hook));
    }

    pub fn clear_io_hook(&mut self) {
        self.io_hook = None;
    }

    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: StepObserver + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    #[inline]
    fn fetch_byte(&mut self) -> u8 {
        let b = self.memory.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        b
    }

    #[inline]
    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte();
        let hi = self.fetch_byte();
        u16::from_le_bytes([lo, hi])
    }

    /// Push a word: SP drops by two, then the low byte lands at SP.
    fn push(&mut self, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        self.memory.write_word(self.regs.sp, value);
    }

    fn pop(&mut self) -> u16 {
        let value = self.memory.read_word(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    fn condition(&self, cond: Cond) -> bool {
        let f = self.regs.flags;
        match cond {
            Cond::NotZero => !f.z,
            Cond::Zero => f.z,
            Cond::NoCarry => !f.cy,
            Cond::Carry => f.cy,
            Cond::ParityOdd => !f.p,
            Cond::ParityEven => f.p,
            Cond::Plus => !f.s,
            Cond::Minus => f.s,
        }
    }

    fn io(&mut self, port: u8, data: u8, direction: IoDirection) -> Option<u8> {
        self.io_hook
            .as_mut()
            .map(|hook| hook(port, data, direction))
    }

    /// Execute a single instruction.
    ///
    /// The intercept hook, if any, runs first and may claim the step. An
    /// opcode outside the documented set is an error and leaves PC on the
    /// offending byte.
    pub fn step(&mut self) -> Result<StepStatus, CpuError> {
        if self.halted {
            return Ok(StepStatus::Halted(HaltReason::Hlt));
        }

        let pc = self.regs.pc;
        if pc as usize >= self.memory.len().saturating_sub(1) {
            log::debug!("PC 0x{:04X} reached the end of memory", pc);
            return Ok(StepStatus::Halted(HaltReason::EndOfMemory));
        }

        if let Some(hook) = self.instruction_hook.as_mut() {
            if hook(&mut self.regs, &mut self.memory) {
                return Ok(StepStatus::Continue);
            }
        }

        let opcode = self.memory.read(pc);
        let Some(op) = decode(opcode) else {
            log::error!(
                "8080 decode failure: unknown opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} PSW=0x{psw:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                opcode = opcode,
                pc = pc,
                sp = self.regs.sp,
                psw = self.regs.psw(),
                bc = self.regs.bc(),
                de = self.regs.de(),
                hl = self.regs.hl(),
            );
            return Err(CpuError::UnknownOpcode {
                address: pc,
                opcode,
            });
        };

        let bytes = self.observer.is_some().then(|| {
            [
                opcode,
                self.memory.read(pc.wrapping_add(1)),
                self.memory.read(pc.wrapping_add(2)),
            ]
        });

        self.regs.pc = pc.wrapping_add(1);
        let status = self.execute(op);

        if let (Some(observer), Some(bytes)) = (self.observer.as_mut(), bytes) {
            let event = StepEvent {
                address: pc,
                op,
                bytes,
            };
            observer.on_step(&event, &self.regs);
        }

        Ok(status)
    }

    /// Step until the CPU halts or `max_steps` instructions have run.
    pub fn run(&mut self, max_steps: u64) -> Result<RunSummary, CpuError> {
        let mut steps = 0;
        while steps < max_steps {
            match self.step()? {
                StepStatus::Continue => steps += 1,
                StepStatus::Halted(reason) => {
                    return Ok(RunSummary {
                        steps,
                        halt: Some(reason),
                    })
                }
            }
        }
        Ok(RunSummary { steps, halt: None })
    }
}
