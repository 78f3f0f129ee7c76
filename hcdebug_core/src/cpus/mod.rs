pub mod z80;

use crate::memory::MemoryView;

use std::fmt;

/// Longest instruction a decoder may report, in bytes.
pub const MAX_INSTRUCTION_LENGTH: u8 = 4;

/// Cycle cost of an instruction. Conditional and repeating instructions cost
/// differently depending on whether the branch or repetition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycles {
    Fixed(u8),
    Djnz,
    CondJr,
    CondRet,
    CondCall,
    BlockTransfer,
}

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Cycles::*;

        match *self {
            Fixed(cycles) => write!(f, "{} cycles", cycles),
            Djnz => write!(f, "13/8 cycles"),
            CondJr => write!(f, "12/7 cycles"),
            CondRet => write!(f, "11/5 cycles"),
            CondCall => write!(f, "17/10 cycles"),
            BlockTransfer => write!(f, "21/16 cycles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// 1 to `MAX_INSTRUCTION_LENGTH` bytes.
    pub length: u8,
    pub cycles: Cycles,
    /// Effect on the S, Z, Y, H, X, P/V, N and C flags, one character each.
    pub flags: &'static str,
    pub text: String,
}

pub trait Decoder {
    /// Decodes the instruction starting at `address`. Reads past the end of
    /// `memory` must be avoided by the implementation.
    fn decode(&self, memory: &dyn MemoryView, address: u64) -> Instruction;
}

/// Renders a flag-effect string as `S=* Z=* ...`.
pub fn describe_flags(flags: &str) -> String {
    const NAMES: [&str; 8] = ["S", "Z", "Y", "H", "X", "P/V", "N", "C"];

    let mut effects = flags.chars().chain(std::iter::repeat('?'));
    let parts: Vec<String> = NAMES
        .iter()
        .map(|name| format!("{}={}", name, effects.next().unwrap_or('?')))
        .collect();

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_cycle_counts() {
        assert_eq!(Cycles::Fixed(4).to_string(), "4 cycles");
        assert_eq!(Cycles::Djnz.to_string(), "13/8 cycles");
        assert_eq!(Cycles::CondJr.to_string(), "12/7 cycles");
        assert_eq!(Cycles::CondRet.to_string(), "11/5 cycles");
        assert_eq!(Cycles::CondCall.to_string(), "17/10 cycles");
        assert_eq!(Cycles::BlockTransfer.to_string(), "21/16 cycles");
    }

    #[test]
    fn flag_descriptions() {
        assert_eq!(
            describe_flags("*****V0*"),
            "S=* Z=* Y=* H=* X=* P/V=V N=0 C=*"
        );
        assert_eq!(describe_flags("--"), "S=- Z=- Y=? H=? X=? P/V=? N=? C=?");
    }
}
