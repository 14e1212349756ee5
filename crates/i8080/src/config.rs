use typed_builder::TypedBuilder;

use crate::ADDRESS_SPACE_SIZE;

/// Session settings for [`Cpu::from_config`](crate::Cpu::from_config).
///
/// ```
/// use i8080::{Cpu, CpuConfig};
///
/// let config = CpuConfig::builder().start_pc(0x0100).start_sp(0xf000).build();
/// let cpu = Cpu::from_config(&config);
/// assert_eq!(cpu.pc(), 0x0100);
/// assert_eq!(cpu.memory.len(), 0x10000);
/// ```
#[derive(Clone, Debug, TypedBuilder)]
pub struct CpuConfig {
    /// Size of the memory image in bytes.
    #[builder(default = ADDRESS_SPACE_SIZE)]
    pub memory_size: usize,
    #[builder(default)]
    pub start_pc: u16,
    #[builder(default)]
    pub start_sp: u16,
    #[builder(default)]
    pub interrupts_enabled: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
