use std::io;

use thiserror::Error;

/// Fatal conditions reported by [`Cpu::step`](crate::Cpu::step).
///
/// Running off the end of memory and executing `hlt` are not errors; they are
/// reported as [`StepStatus::Halted`](crate::StepStatus::Halted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("unknown opcode 0x{opcode:02X} at 0x{address:04X}")]
    UnknownOpcode { address: u16, opcode: u8 },
}

/// Errors raised while copying a program image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read program image")]
    Io(#[from] io::Error),
    #[error("load offset 0x{offset:04X} is outside the {size}-byte memory image")]
    OffsetOutOfRange { offset: usize, size: usize },
}
