//! Minimal CP/M environment for running 8080 `.COM` programs.
//!
//! Only the two BDOS console calls that CPU diagnostics use are provided:
//! function 2 writes the character in E, function 9 writes the
//! `$`-terminated string at D:E. A jump to 0x0000 (warm boot) ends the run.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use i8080::{Cpu, HaltReason, LogObserver, Memory, Registers, RunSummary, StepStatus};

/// Warm boot vector. A `hlt` planted here stops the program on exit.
pub const WARM_BOOT: u16 = 0x0000;
/// BDOS entry point called by programs with the function number in C.
pub const BDOS_ENTRY: u16 = 0x0005;
/// Transient program area, where CP/M loads `.COM` files.
pub const TPA_START: usize = 0x0100;

const OPCODE_HLT: u8 = 0x76;
const OPCODE_RET: u8 = 0xc9;

const BDOS_CONSOLE_OUTPUT: u8 = 0x02;
const BDOS_PRINT_STRING: u8 = 0x09;

/// Service a BDOS call into `console`. The `ret` planted at the entry point
/// then runs and returns to the caller.
fn bdos(regs: &Registers, memory: &Memory, console: &mut Vec<u8>) {
    match regs.c {
        BDOS_CONSOLE_OUTPUT => console.push(regs.e),
        BDOS_PRINT_STRING => {
            let start = regs.de();
            let mut addr = start;
            loop {
                let byte = memory.read(addr);
                if byte == b'$' {
                    break;
                }
                console.push(byte);
                addr = addr.wrapping_add(1);
                if addr == start {
                    log::warn!("BDOS print string at 0x{:04X} has no terminator", start);
                    break;
                }
            }
        }
        other => log::warn!("unsupported BDOS function 0x{:02X}, ignored", other),
    }
}

/// An 8080 CPU wired to a console-only BDOS.
pub struct CpmMachine {
    cpu: Cpu,
    console: Rc<RefCell<Vec<u8>>>,
}

impl CpmMachine {
    /// Load `image` at `offset` into a fresh 64K machine and point PC at it.
    pub fn new(image: &[u8], offset: usize) -> Result<Self> {
        let start = u16::try_from(offset)
            .with_context(|| format!("load offset 0x{:X} is outside the address space", offset))?;
        let mut memory = Memory::default();
        let loaded = memory
            .load_bytes(offset, image)
            .with_context(|| format!("failed to load image at 0x{:04X}", offset))?;
        if loaded < image.len() {
            log::warn!(
                "image truncated to {} of {} bytes at 0x{:04X}",
                loaded,
                image.len(),
                offset
            );
        }
        memory.write(WARM_BOOT, OPCODE_HLT);
        memory.write(BDOS_ENTRY, OPCODE_RET);

        let mut cpu = Cpu::new(memory);
        cpu.set_pc(start);
        if log::log_enabled!(log::Level::Trace) {
            cpu.set_observer(LogObserver);
        }

        let console = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&console);
        cpu.set_instruction_hook(move |regs, memory| {
            if regs.pc == BDOS_ENTRY {
                bdos(regs, memory, &mut sink.borrow_mut());
            }
            false
        });

        Ok(Self { cpu, console })
    }

    pub fn from_file<P: AsRef<Path>>(path: P, offset: usize) -> Result<Self> {
        let path = path.as_ref();
        let image =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        log::info!("loaded {} ({} bytes)", path.display(), image.len());
        Self::new(&image, offset)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    fn flush_console<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut console = self.console.borrow_mut();
        if !console.is_empty() {
            out.write_all(&console)
                .context("failed to write console output")?;
            console.clear();
        }
        Ok(())
    }

    /// Run until the program halts, copying console output to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunSummary> {
        let mut steps = 0u64;
        loop {
            let status = self.cpu.step();
            self.flush_console(out)?;
            match status.context("8080 program stopped")? {
                StepStatus::Continue => steps += 1,
                StepStatus::Halted(reason) => {
                    out.flush().context("failed to flush console output")?;
                    log::info!(
                        "halted after {} steps ({}) at PC=0x{:04X}",
                        steps,
                        describe(reason),
                        self.cpu.pc()
                    );
                    return Ok(RunSummary {
                        steps,
                        halt: Some(reason),
                    });
                }
            }
        }
    }
}

fn describe(reason: HaltReason) -> &'static str {
    match reason {
        HaltReason::Hlt => "hlt",
        HaltReason::EndOfMemory => "end of memory",
    }
}

/// Parse a load offset given as `0x`-prefixed hex or decimal.
pub fn parse_offset(text: &str) -> Result<usize> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.with_context(|| format!("invalid load offset '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a program at the TPA and run it to completion.
    fn run_program(program: &[u8]) -> (String, RunSummary) {
        let mut machine = CpmMachine::new(program, TPA_START).unwrap();
        let mut out = Vec::new();
        let summary = machine.run(&mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn console_output_then_warm_boot() {
        // mvi c,02h ; mvi e,'A' ; call 0005h ; jmp 0000h
        let program = [0x0e, 0x02, 0x1e, b'A', 0xcd, 0x05, 0x00, 0xc3, 0x00, 0x00];
        let (output, summary) = run_program(&program);
        assert_eq!(output, "A");
        assert_eq!(summary.halt, Some(HaltReason::Hlt));
    }

    #[test]
    fn print_string_stops_at_dollar() {
        // mvi c,09h ; lxi d,msg ; call 0005h ; jmp 0000h ; msg: "OK$NO"
        let mut program = vec![
            0x0e, 0x09, 0x11, 0x0e, 0x01, 0xcd, 0x05, 0x00, 0xc3, 0x00, 0x00,
        ];
        program.resize(0x0e, 0x00);
        program.extend_from_slice(b"OK$NO");
        let (output, _) = run_program(&program);
        assert_eq!(output, "OK");
    }

    #[test]
    fn unknown_bdos_function_is_ignored() {
        // mvi c,0bh ; call 0005h ; hlt
        let (output, summary) = run_program(&[0x0e, 0x0b, 0xcd, 0x05, 0x00, 0x76]);
        assert!(output.is_empty());
        assert_eq!(summary.halt, Some(HaltReason::Hlt));
        assert_eq!(summary.steps, 3);
    }

    #[test]
    fn bdos_call_returns_to_caller() {
        // mvi c,02h ; mvi e,'x' ; call 0005h ; mov a,e ; hlt
        let mut machine =
            CpmMachine::new(&[0x0e, 0x02, 0x1e, b'x', 0xcd, 0x05, 0x00, 0x7b, 0x76], TPA_START)
                .unwrap();
        let mut out = Vec::new();
        machine.run(&mut out).unwrap();
        assert_eq!(machine.cpu().regs.a, b'x');
        assert_eq!(machine.cpu().pc(), 0x0109);
    }

    #[test]
    fn decode_failure_is_reported() {
        let mut machine = CpmMachine::new(&[0x00, 0xed], TPA_START).unwrap();
        let err = machine.run(&mut Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("0xED"), "{:#}", err);
        assert_eq!(machine.cpu().pc(), 0x0101);
    }

    #[test]
    fn offset_past_memory_is_rejected() {
        assert!(CpmMachine::new(&[0x00], 0x10000).is_err());
    }

    #[test]
    fn trace_logging_installs_step_observer() {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Trace)
            .try_init();
        if !log::log_enabled!(log::Level::Trace) {
            // another logger won the race for the global slot
            return;
        }
        // mvi a,07h ; hlt
        let mut machine = CpmMachine::new(&[0x3e, 0x07, 0x76], TPA_START).unwrap();
        assert!(format!("{:?}", machine.cpu()).contains("observer: true"));
        machine.run(&mut Vec::new()).unwrap();
        assert_eq!(machine.cpu().regs.a, 0x07);
    }

    #[test]
    fn host_can_patch_registers_before_running() {
        // mov a,b ; hlt
        let mut machine = CpmMachine::new(&[0x78, 0x76], TPA_START).unwrap();
        machine.cpu_mut().regs.b = 0x42;
        machine.run(&mut Vec::new()).unwrap();
        assert_eq!(machine.cpu().regs.a, 0x42);
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_offset("0x100").unwrap(), 0x100);
        assert_eq!(parse_offset("0X1F").unwrap(), 0x1f);
        assert_eq!(parse_offset("256").unwrap(), 256);
        assert!(parse_offset("0xzz").is_err());
    }
}
