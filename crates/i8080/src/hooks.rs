use std::fmt;

use crate::cpu::regs::Registers;
use crate::decode::Op;
use crate::memory::Memory;

/// Direction of a port transfer passed to the I/O hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoDirection {
    In,
    Out,
}

/// Called before every decode with the register file and memory.
///
/// Returning `true` means the hook handled the step itself (including any
/// program counter change) and the instruction at `pc` is not executed.
pub type InstructionHook = Box<dyn FnMut(&mut Registers, &mut Memory) -> bool>;

/// Called by `in` and `out` with `(port, data, direction)`.
///
/// For `in` the returned byte is loaded into the accumulator; for `out` the
/// data byte is the accumulator and the return value is ignored.
pub type IoHook = Box<dyn FnMut(u8, u8, IoDirection) -> u8>;

/// One executed instruction, as reported to a [`StepObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepEvent {
    /// Address of the opcode byte.
    pub address: u16,
    pub op: Op,
    /// Opcode followed by its operand bytes; only `op.length()` are valid.
    pub bytes: [u8; 3],
}

impl StepEvent {
    pub fn operands(&self) -> &[u8] {
        &self.bytes[1..self.op.length() as usize]
    }

    /// Immediate byte or little-endian word carried by the instruction.
    pub fn immediate(&self) -> Option<u16> {
        match *self.operands() {
            [byte] => Some(byte as u16),
            [lo, hi] => Some(u16::from_le_bytes([lo, hi])),
            _ => None,
        }
    }
}

impl fmt::Display for StepEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}: {}", self.address, self.op)?;
        let sep = match self.op {
            Op::Mvi(_) | Op::Lxi(_) => ",",
            _ => " ",
        };
        match self.operands() {
            [byte] => write!(f, "{}0x{:02x}", sep, byte),
            [_, _] => write!(f, "{}0x{:04x}", sep, self.immediate().unwrap_or_default()),
            _ => Ok(()),
        }
    }
}

/// Receives a structured event after every executed instruction.
pub trait StepObserver {
    fn on_step(&mut self, event: &StepEvent, regs: &Registers);
}

/// Observer that writes one `trace` log line per instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl StepObserver for LogObserver {
    fn on_step(&mut self, event: &StepEvent, regs: &Registers) {
        let f = regs.flags;
        log::trace!(
            "{:<24} a={:02x} bc={:04x} de={:04x} hl={:04x} sp={:04x} s={} z={} p={} cy={} ac={}",
            event.to_string(),
            regs.a,
            regs.bc(),
            regs.de(),
            regs.hl(),
            regs.sp,
            f.s as u8,
            f.z as u8,
            f.p as u8,
            f.cy as u8,
            f.ac as u8,
        );
    }
}

impl<F> StepObserver for F
where
    F: FnMut(&StepEvent, &Registers),
{
    fn on_step(&mut self, event: &StepEvent, regs: &Registers) {
        self(event, regs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn event(address: u16, bytes: [u8; 3]) -> StepEvent {
        StepEvent {
            address,
            op: decode(bytes[0]).unwrap(),
            bytes,
        }
    }

    #[test]
    fn formats_operands_by_length() {
        assert_eq!(event(0x0100, [0x3E, 0x34, 0]).to_string(), "0x0100: mvi a,0x34");
        assert_eq!(event(0x0102, [0xC6, 0x01, 0]).to_string(), "0x0102: adi 0x01");
        assert_eq!(
            event(0x0000, [0xC3, 0x34, 0x12]).to_string(),
            "0x0000: jmp 0x1234"
        );
        assert_eq!(
            event(0x0010, [0x21, 0x00, 0x20]).to_string(),
            "0x0010: lxi h,0x2000"
        );
        assert_eq!(event(0x0020, [0x76, 0xAA, 0xBB]).to_string(), "0x0020: hlt");
    }

    #[test]
    fn log_observer_traces_executed_steps() {
        use crate::{Cpu, Memory, StepStatus};

        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Trace)
            .try_init();
        let mut memory = Memory::new(0x100);
        // mvi a,34h ; adi 01h
        memory.load_bytes(0, &[0x3E, 0x34, 0xC6, 0x01]).unwrap();
        let mut cpu = Cpu::new(memory);
        cpu.set_observer(LogObserver);
        assert!(format!("{:?}", cpu).contains("observer: true"));
        assert_eq!(cpu.step(), Ok(StepStatus::Continue));
        assert_eq!(cpu.step(), Ok(StepStatus::Continue));
        assert_eq!(cpu.regs.a, 0x35);

        cpu.clear_observer();
        assert!(format!("{:?}", cpu).contains("observer: false"));
    }

    #[test]
    fn immediate_is_little_endian() {
        assert_eq!(event(0, [0xCD, 0x05, 0x00]).immediate(), Some(0x0005));
        assert_eq!(event(0, [0xDB, 0x07, 0x00]).immediate(), Some(0x07));
        assert_eq!(event(0, [0xC9, 0x00, 0x00]).immediate(), None);
    }
}
