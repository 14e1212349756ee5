//! Opcode decoding.
//!
//! Every opcode byte maps to a tagged [`Op`] descriptor through
//! [`OPCODE_TABLE`], which is built at compile time from the 8080 bit-field
//! layout (`xx yyy zzz`). The register select fields are resolved here, once,
//! so the execution routines never see raw field values.

use std::fmt;

use crate::cpu::regs::{Reg, RegPair, StackPair};

/// 8-bit operand: a register, or memory addressed by H:L (`m`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Reg(Reg),
    M,
}

impl Operand {
    pub const fn from_index(index: u8) -> Operand {
        if index == 6 {
            Operand::M
        } else {
            Operand::Reg(Reg::from_index(index))
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operand::Reg(reg) => reg.name(),
            Operand::M => "m",
        }
    }
}

/// Accumulator ALU operation, selected by bits 5..3 of the opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    pub const fn from_index(index: u8) -> AluOp {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }

    /// Mnemonic of the register/memory form.
    pub const fn name(self) -> &'static str {
        match self {
            AluOp::Add => "add",
            AluOp::Adc => "adc",
            AluOp::Sub => "sub",
            AluOp::Sbb => "sbb",
            AluOp::Ana => "ana",
            AluOp::Xra => "xra",
            AluOp::Ora => "ora",
            AluOp::Cmp => "cmp",
        }
    }

    /// Mnemonic of the immediate form.
    pub const fn immediate_name(self) -> &'static str {
        match self {
            AluOp::Add => "adi",
            AluOp::Adc => "aci",
            AluOp::Sub => "sui",
            AluOp::Sbb => "sbi",
            AluOp::Ana => "ani",
            AluOp::Xra => "xri",
            AluOp::Ora => "ori",
            AluOp::Cmp => "cpi",
        }
    }
}

/// Condition code of conditional jump, call and return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cond {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Cond {
    pub const fn from_index(index: u8) -> Cond {
        match index & 0x07 {
            0 => Cond::NotZero,
            1 => Cond::Zero,
            2 => Cond::NoCarry,
            3 => Cond::Carry,
            4 => Cond::ParityOdd,
            5 => Cond::ParityEven,
            6 => Cond::Plus,
            _ => Cond::Minus,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Cond::NotZero => "nz",
            Cond::Zero => "z",
            Cond::NoCarry => "nc",
            Cond::Carry => "c",
            Cond::ParityOdd => "po",
            Cond::ParityEven => "pe",
            Cond::Plus => "p",
            Cond::Minus => "m",
        }
    }
}

/// Decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Nop,
    Hlt,
    Mov { dst: Operand, src: Operand },
    Mvi(Operand),
    Lxi(RegPair),
    Lda,
    Sta,
    Lhld,
    Shld,
    Ldax(RegPair),
    Stax(RegPair),
    Xchg,
    Xthl,
    Sphl,
    Pchl,
    Alu(AluOp, Operand),
    AluImm(AluOp),
    Inr(Operand),
    Dcr(Operand),
    Inx(RegPair),
    Dcx(RegPair),
    Dad(RegPair),
    Rlc,
    Rrc,
    Ral,
    Rar,
    Daa,
    Cma,
    Stc,
    Cmc,
    Jmp,
    JmpIf(Cond),
    Call,
    CallIf(Cond),
    Ret,
    RetIf(Cond),
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),
    In,
    Out,
    Ei,
    Di,
}

impl Op {
    /// Encoded length in bytes, opcode included.
    pub const fn length(self) -> u16 {
        match self {
            Op::Mvi(_) | Op::AluImm(_) | Op::In | Op::Out => 2,
            Op::Lxi(_)
            | Op::Lda
            | Op::Sta
            | Op::Lhld
            | Op::Shld
            | Op::Jmp
            | Op::JmpIf(_)
            | Op::Call
            | Op::CallIf(_) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Nop => write!(f, "nop"),
            Op::Hlt => write!(f, "hlt"),
            Op::Mov { dst, src } => write!(f, "mov {},{}", dst.name(), src.name()),
            Op::Mvi(dst) => write!(f, "mvi {}", dst.name()),
            Op::Lxi(rp) => write!(f, "lxi {}", rp.name()),
            Op::Lda => write!(f, "lda"),
            Op::Sta => write!(f, "sta"),
            Op::Lhld => write!(f, "lhld"),
            Op::Shld => write!(f, "shld"),
            Op::Ldax(rp) => write!(f, "ldax {}", rp.name()),
            Op::Stax(rp) => write!(f, "stax {}", rp.name()),
            Op::Xchg => write!(f, "xchg"),
            Op::Xthl => write!(f, "xthl"),
            Op::Sphl => write!(f, "sphl"),
            Op::Pchl => write!(f, "pchl"),
            Op::Alu(op, src) => write!(f, "{} {}", op.name(), src.name()),
            Op::AluImm(op) => write!(f, "{}", op.immediate_name()),
            Op::Inr(dst) => write!(f, "inr {}", dst.name()),
            Op::Dcr(dst) => write!(f, "dcr {}", dst.name()),
            Op::Inx(rp) => write!(f, "inx {}", rp.name()),
            Op::Dcx(rp) => write!(f, "dcx {}", rp.name()),
            Op::Dad(rp) => write!(f, "dad {}", rp.name()),
            Op::Rlc => write!(f, "rlc"),
            Op::Rrc => write!(f, "rrc"),
            Op::Ral => write!(f, "ral"),
            Op::Rar => write!(f, "rar"),
            Op::Daa => write!(f, "daa"),
            Op::Cma => write!(f, "cma"),
            Op::Stc => write!(f, "stc"),
            Op::Cmc => write!(f, "cmc"),
            Op::Jmp => write!(f, "jmp"),
            Op::JmpIf(cc) => write!(f, "j{}", cc.suffix()),
            Op::Call => write!(f, "call"),
            Op::CallIf(cc) => write!(f, "c{}", cc.suffix()),
            Op::Ret => write!(f, "ret"),
            Op::RetIf(cc) => write!(f, "r{}", cc.suffix()),
            Op::Rst(n) => write!(f, "rst {}", n),
            Op::Push(rp) => write!(f, "push {}", rp.name()),
            Op::Pop(rp) => write!(f, "pop {}", rp.name()),
            Op::In => write!(f, "in"),
            Op::Out => write!(f, "out"),
            Op::Ei => write!(f, "ei"),
            Op::Di => write!(f, "di"),
        }
    }
}

/// Decode an opcode from its bit fields.
///
/// Returns `None` for the twelve bytes the 8080 leaves undocumented
/// (0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD).
const fn decode_fields(opcode: u8) -> Option<Op> {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;
    let p = y >> 1;
    let q = y & 0x01;

    let op = match x {
        0 => match z {
            0 if y == 0 => Op::Nop,
            0 => return None,
            1 if q == 0 => Op::Lxi(RegPair::from_index(p)),
            1 => Op::Dad(RegPair::from_index(p)),
            2 => match (p, q) {
                (0, 0) => Op::Stax(RegPair::BC),
                (0, _) => Op::Ldax(RegPair::BC),
                (1, 0) => Op::Stax(RegPair::DE),
                (1, _) => Op::Ldax(RegPair::DE),
                (2, 0) => Op::Shld,
                (2, _) => Op::Lhld,
                (_, 0) => Op::Sta,
                _ => Op::Lda,
            },
            3 if q == 0 => Op::Inx(RegPair::from_index(p)),
            3 => Op::Dcx(RegPair::from_index(p)),
            4 => Op::Inr(Operand::from_index(y)),
            5 => Op::Dcr(Operand::from_index(y)),
            6 => Op::Mvi(Operand::from_index(y)),
            _ => match y {
                0 => Op::Rlc,
                1 => Op::Rrc,
                2 => Op::Ral,
                3 => Op::Rar,
                4 => Op::Daa,
                5 => Op::Cma,
                6 => Op::Stc,
                _ => Op::Cmc,
            },
        },
        // mov m,m is where hlt lives
        1 if y == 6 && z == 6 => Op::Hlt,
        1 => Op::Mov {
            dst: Operand::from_index(y),
            src: Operand::from_index(z),
        },
        2 => Op::Alu(AluOp::from_index(y), Operand::from_index(z)),
        _ => match z {
            0 => Op::RetIf(Cond::from_index(y)),
            1 => match (q, p) {
                (0, _) => Op::Pop(StackPair::from_index(p)),
                (_, 0) => Op::Ret,
                (_, 2) => Op::Pchl,
                (_, 3) => Op::Sphl,
                _ => return None,
            },
            2 => Op::JmpIf(Cond::from_index(y)),
            3 => match y {
                0 => Op::Jmp,
                2 => Op::Out,
                3 => Op::In,
                4 => Op::Xthl,
                5 => Op::Xchg,
                6 => Op::Di,
                7 => Op::Ei,
                _ => return None,
            },
            4 => Op::CallIf(Cond::from_index(y)),
            5 if q == 0 => Op::Push(StackPair::from_index(p)),
            5 if p == 0 => Op::Call,
            5 => return None,
            6 => Op::AluImm(AluOp::from_index(y)),
            _ => Op::Rst(y),
        },
    };
    Some(op)
}

const fn build_table() -> [Option<Op>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = decode_fields(i as u8);
        i += 1;
    }
    table
}

/// Dispatch table indexed by opcode byte.
pub static OPCODE_TABLE: [Option<Op>; 256] = build_table();

#[inline]
pub fn decode(opcode: u8) -> Option<Op> {
    OPCODE_TABLE[opcode as usize]
}
