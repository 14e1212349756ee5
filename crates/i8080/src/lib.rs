pub mod config;
pub mod cpu;
pub mod decode;
pub mod error;
pub mod hooks;
pub mod memory;

pub use config::CpuConfig;
pub use cpu::{Cpu, Flags, HaltReason, Registers, RunSummary, StepStatus};
pub use decode::{decode, Op, OPCODE_TABLE};
pub use error::{CpuError, LoadError};
pub use hooks::{IoDirection, LogObserver, StepEvent, StepObserver};
pub use memory::Memory;

/// Size of the full 8080 address space (64 KiB).
pub const ADDRESS_SPACE_SIZE: usize = 0x10000;
