use bitflags::bitflags;

bitflags! {
    /// Bit layout of the flag byte pushed by `push psw`.
    ///
    /// Bit 1 always reads as 1, bits 3 and 5 always read as 0.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PswBits: u8 {
        const CARRY = 0x01;
        const ALWAYS_ONE = 0x02;
        const PARITY = 0x04;
        const AUX_CARRY = 0x10;
        const ZERO = 0x40;
        const SIGN = 0x80;
    }
}

/// CPU flags for Intel 8080.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub s: bool,  // sign
    pub z: bool,  // zero
    pub p: bool,  // parity (even)
    pub cy: bool, // carry
    pub ac: bool, // auxiliary carry
}

impl Flags {
    pub fn to_u8(self) -> u8 {
        let mut bits = PswBits::ALWAYS_ONE;
        bits.set(PswBits::SIGN, self.s);
        bits.set(PswBits::ZERO, self.z);
        bits.set(PswBits::AUX_CARRY, self.ac);
        bits.set(PswBits::PARITY, self.p);
        bits.set(PswBits::CARRY, self.cy);
        bits.bits()
    }

    pub fn from_u8(v: u8) -> Self {
        let bits = PswBits::from_bits_truncate(v);
        Self {
            s: bits.contains(PswBits::SIGN),
            z: bits.contains(PswBits::ZERO),
            p: bits.contains(PswBits::PARITY),
            cy: bits.contains(PswBits::CARRY),
            ac: bits.contains(PswBits::AUX_CARRY),
        }
    }
}

/// An 8-bit register named by a 3-bit select field.
///
/// Encoding 6 selects memory through H:L and has no register of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
}

impl Reg {
    /// Resolve a register select field.
    ///
    /// Panics on 6 (memory) or anything wider than three bits: callers must
    /// route the memory encoding elsewhere, so reaching this arm is a decoder
    /// bug rather than bad input.
    pub const fn from_index(index: u8) -> Reg {
        match index {
            0 => Reg::B,
            1 => Reg::C,
            2 => Reg::D,
            3 => Reg::E,
            4 => Reg::H,
            5 => Reg::L,
            7 => Reg::A,
            _ => unreachable!(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Reg::B => "b",
            Reg::C => "c",
            Reg::D => "d",
            Reg::E => "e",
            Reg::H => "h",
            Reg::L => "l",
            Reg::A => "a",
        }
    }
}

/// 16-bit operand of `lxi`, `inx`, `dcx` and `dad`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
}

impl RegPair {
    pub const fn from_index(index: u8) -> RegPair {
        match index & 0x03 {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::HL,
            _ => RegPair::SP,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            RegPair::BC => "b",
            RegPair::DE => "d",
            RegPair::HL => "h",
            RegPair::SP => "sp",
        }
    }
}

/// 16-bit operand of `push` and `pop`, where slot 3 is A plus the flag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackPair {
    BC,
    DE,
    HL,
    PSW,
}

impl StackPair {
    pub const fn from_index(index: u8) -> StackPair {
        match index & 0x03 {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            _ => StackPair::PSW,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            StackPair::BC => "b",
            StackPair::DE => "d",
            StackPair::HL => "h",
            StackPair::PSW => "psw",
        }
    }
}

/// Processor-visible register file.
///
/// Register pairs are never stored; `bc()`, `de()` and `hl()` assemble them
/// from the 8-bit halves every time they are asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub flags: Flags,
    /// Interrupt-enable latch (INTE).
    pub interrupts_enabled: bool,
}

impl Registers {
    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    /// Accumulator in the high byte, packed flags in the low byte.
    #[inline]
    pub fn psw(&self) -> u16 {
        u16::from_be_bytes([self.a, self.flags.to_u8()])
    }

    #[inline]
    pub fn set_psw(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.flags = Flags::from_u8(f);
    }

    #[inline]
    pub fn reg(&self, reg: Reg) -> u8 {
        match reg {
            Reg::B => self.b,
            Reg::C => self.c,
            Reg::D => self.d,
            Reg::E => self.e,
            Reg::H => self.h,
            Reg::L => self.l,
            Reg::A => self.a,
        }
    }

    #[inline]
    pub fn reg_mut(&mut self, reg: Reg) -> &mut u8 {
        match reg {
            Reg::B => &mut self.b,
            Reg::C => &mut self.c,
            Reg::D => &mut self.d,
            Reg::E => &mut self.e,
            Reg::H => &mut self.h,
            Reg::L => &mut self.l,
            Reg::A => &mut self.a,
        }
    }

    pub fn pair(&self, pair: RegPair) -> u16 {
        match pair {
            RegPair::BC => self.bc(),
            RegPair::DE => self.de(),
            RegPair::HL => self.hl(),
            RegPair::SP => self.sp,
        }
    }

    pub fn set_pair(&mut self, pair: RegPair, value: u16) {
        match pair {
            RegPair::BC => self.set_bc(value),
            RegPair::DE => self.set_de(value),
            RegPair::HL => self.set_hl(value),
            RegPair::SP => self.sp = value,
        }
    }

    pub fn stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::BC => self.bc(),
            StackPair::DE => self.de(),
            StackPair::HL => self.hl(),
            StackPair::PSW => self.psw(),
        }
    }

    pub fn set_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::BC => self.set_bc(value),
            StackPair::DE => self.set_de(value),
            StackPair::HL => self.set_hl(value),
            StackPair::PSW => self.set_psw(value),
        }
    }
}
