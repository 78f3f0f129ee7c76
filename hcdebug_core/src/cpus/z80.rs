//! Zilog Z80 instruction decoder.
//!
//! Opcodes are split into the usual `x`/`y`/`z`/`p`/`q` fields:
//!
//! ```text
//!   7 6 5 4 3 2 1 0
//!   x x y y y z z z
//!       p p q
//! ```
//!
//! The DD and FD prefixes replace HL with IX or IY, and `(HL)` with an indexed
//! operand carrying a signed displacement.

use super::{Cycles, Decoder, Instruction};
use crate::memory::MemoryView;

const R: [&str; 8] = ["b", "c", "d", "e", "h", "l", "(hl)", "a"];
const RP: [&str; 4] = ["bc", "de", "hl", "sp"];
const RP2: [&str; 4] = ["bc", "de", "hl", "af"];
const CC: [&str; 8] = ["nz", "z", "nc", "c", "po", "pe", "p", "m"];
const ALU: [&str; 8] = ["add a,", "adc a,", "sub", "sbc a,", "and", "xor", "or", "cp"];
const ROT: [&str; 8] = ["rlc", "rrc", "rl", "rr", "sla", "sra", "sll", "srl"];
const IM: [&str; 8] = ["0", "0/1", "1", "2", "0", "0/1", "1", "2"];
const ROTA: [&str; 8] = ["rlca", "rrca", "rla", "rra", "daa", "cpl", "scf", "ccf"];

const BLOCK: [[&str; 4]; 4] = [
    ["ldi", "cpi", "ini", "outi"],
    ["ldd", "cpd", "ind", "outd"],
    ["ldir", "cpir", "inir", "otir"],
    ["lddr", "cpdr", "indr", "otdr"],
];

// flag effects, in S Z Y H X P/V N C order
const F_NONE: &str = "--------";
const F_ADD: &str = "*****V0*";
const F_SUB: &str = "*****V1*";
const F_AND: &str = "***1*P00";
const F_LOGIC: &str = "***0*P00";
const F_INC: &str = "*****V0-";
const F_DEC: &str = "*****V1-";
const F_ADD16: &str = "--***-0*";
const F_ROTA: &str = "--*0*-0*";
const F_DAA: &str = "*****P-*";
const F_CPL: &str = "--*1*-1-";
const F_SCF: &str = "--*0*-01";
const F_CCF: &str = "--***-0*";
const F_ROT: &str = "***0*P0*";
const F_BIT: &str = "***1**0-";
const F_IN: &str = "***0*P0-";
const F_LD_IR: &str = "***0**0-";
const F_LD_BLOCK: &str = "--*0**0-";
const F_CP_BLOCK: &str = "******1-";
const F_IO_BLOCK: &str = "******1*";

const ALU_FLAGS: [&str; 8] = [F_ADD, F_ADD, F_SUB, F_SUB, F_AND, F_LOGIC, F_LOGIC, F_SUB];
const ROTA_FLAGS: [&str; 8] = [F_ROTA, F_ROTA, F_ROTA, F_ROTA, F_DAA, F_CPL, F_SCF, F_CCF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Index {
    IX,
    IY,
}

impl Index {
    fn name(&self) -> &'static str {
        match *self {
            Index::IX => "ix",
            Index::IY => "iy",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Z80;

impl Z80 {
    pub fn new() -> Z80 {
        Z80
    }
}

impl Decoder for Z80 {
    fn decode(&self, memory: &dyn MemoryView, address: u64) -> Instruction {
        let mut state = State::new(memory, address);
        let op = state.byte();

        match op {
            0xCB => state.decode_cb(),
            0xED => state.decode_ed(),
            0xDD | 0xFD => {
                let index = if op == 0xDD { Index::IX } else { Index::IY };

                match state.peek_byte() {
                    // a prefix followed by another prefix behaves as a lone prefix
                    0xDD | 0xED | 0xFD => {
                        state.finish(format!("db ${:02x}", op), Cycles::Fixed(4), F_NONE)
                    }
                    0xCB => {
                        state.byte();
                        state.decode_index_cb(index)
                    }
                    _ => {
                        state.index = Some(index);
                        let op = state.byte();
                        state.decode_main(op)
                    }
                }
            }
            _ => state.decode_main(op),
        }
    }
}

struct State<'a> {
    memory: &'a dyn MemoryView,
    address: u64,
    offset: u64,

    index: Option<Index>,
    // set once an indexed (HL) operand consumed its displacement
    displaced: bool,
    // LD (IX+d),n has its own timing
    immediate_store: bool,
}

impl<'a> State<'a> {
    fn new(memory: &'a dyn MemoryView, address: u64) -> State<'a> {
        State {
            memory,
            address,
            offset: 0,
            index: None,
            displaced: false,
            immediate_store: false,
        }
    }

    fn peek_byte(&self) -> u8 {
        let address = self.address.wrapping_add(self.offset);

        if address < self.memory.size() {
            self.memory.peek(address)
        } else {
            0
        }
    }

    fn byte(&mut self) -> u8 {
        let byte = self.peek_byte();
        self.offset += 1;
        byte
    }

    fn word(&mut self) -> u16 {
        let low = self.byte() as u16;
        let high = self.byte() as u16;

        (high << 8) | low
    }

    fn imm8(&mut self) -> String {
        format!("${:02x}", self.byte())
    }

    fn imm16(&mut self) -> String {
        format!("${:04x}", self.word())
    }

    fn relative(&mut self) -> String {
        let displacement = self.byte() as i8 as i64;
        let next = self.address.wrapping_add(self.offset) as i64;

        format!("${:04x}", (next + displacement) & 0xFFFF)
    }

    fn hl(&self) -> &'static str {
        match self.index {
            Some(index) => index.name(),
            None => "hl",
        }
    }

    fn indexed_operand(&mut self, index: Index) -> String {
        let displacement = self.byte() as i8;

        if displacement < 0 {
            format!("({}-${:02x})", index.name(), -(displacement as i16))
        } else {
            format!("({}+${:02x})", index.name(), displacement)
        }
    }

    /// 8-bit register operand. `halves` allows IXH/IXL in place of H/L.
    fn r(&mut self, r: u8, halves: bool) -> String {
        match (r, self.index) {
            (6, Some(index)) => {
                self.displaced = true;
                self.indexed_operand(index)
            }
            (4, Some(index)) if halves => format!("{}h", index.name()),
            (5, Some(index)) if halves => format!("{}l", index.name()),
            _ => R[r as usize].to_string(),
        }
    }

    fn rp(&self, p: u8) -> &'static str {
        if p == 2 {
            self.hl()
        } else {
            RP[p as usize]
        }
    }

    fn rp2(&self, p: u8) -> &'static str {
        if p == 2 {
            self.hl()
        } else {
            RP2[p as usize]
        }
    }

    fn finish(self, text: String, cycles: Cycles, flags: &'static str) -> Instruction {
        let cycles = match (self.index, cycles) {
            (Some(_), Cycles::Fixed(_)) if self.displaced && self.immediate_store => {
                Cycles::Fixed(19)
            }
            (Some(_), Cycles::Fixed(base)) if self.displaced => Cycles::Fixed(base + 12),
            (Some(_), Cycles::Fixed(base)) => Cycles::Fixed(base + 4),
            (_, cycles) => cycles,
        };

        Instruction {
            length: self.offset as u8,
            cycles,
            flags,
            text,
        }
    }

    fn decode_main(mut self, op: u8) -> Instruction {
        let x = op >> 6;
        let y = (op >> 3) & 7;
        let z = op & 7;
        let p = y >> 1;
        let q = y & 1;

        match (x, z) {
            (0, 0) => match y {
                0 => self.finish("nop".to_string(), Cycles::Fixed(4), F_NONE),
                1 => self.finish("ex af, af'".to_string(), Cycles::Fixed(4), F_NONE),
                2 => {
                    let target = self.relative();
                    self.finish(format!("djnz {}", target), Cycles::Djnz, F_NONE)
                }
                3 => {
                    let target = self.relative();
                    self.finish(format!("jr {}", target), Cycles::Fixed(12), F_NONE)
                }
                _ => {
                    let target = self.relative();
                    let text = format!("jr {}, {}", CC[(y - 4) as usize], target);
                    self.finish(text, Cycles::CondJr, F_NONE)
                }
            },
            (0, 1) => {
                if q == 0 {
                    let value = self.imm16();
                    let text = format!("ld {}, {}", self.rp(p), value);
                    self.finish(text, Cycles::Fixed(10), F_NONE)
                } else {
                    let text = format!("add {}, {}", self.hl(), self.rp(p));
                    self.finish(text, Cycles::Fixed(11), F_ADD16)
                }
            }
            (0, 2) => {
                let (text, cycles) = match (q, p) {
                    (0, 0) => ("ld (bc), a".to_string(), 7),
                    (0, 1) => ("ld (de), a".to_string(), 7),
                    (0, 2) => {
                        let address = self.imm16();
                        (format!("ld ({}), {}", address, self.hl()), 16)
                    }
                    (0, _) => (format!("ld ({}), a", self.imm16()), 13),
                    (_, 0) => ("ld a, (bc)".to_string(), 7),
                    (_, 1) => ("ld a, (de)".to_string(), 7),
                    (_, 2) => {
                        let address = self.imm16();
                        (format!("ld {}, ({})", self.hl(), address), 16)
                    }
                    (_, _) => (format!("ld a, ({})", self.imm16()), 13),
                };

                self.finish(text, Cycles::Fixed(cycles), F_NONE)
            }
            (0, 3) => {
                let mnemonic = if q == 0 { "inc" } else { "dec" };
                let text = format!("{} {}", mnemonic, self.rp(p));
                self.finish(text, Cycles::Fixed(6), F_NONE)
            }
            (0, 4) | (0, 5) => {
                let (mnemonic, flags) = if z == 4 { ("inc", F_INC) } else { ("dec", F_DEC) };
                let cycles = if y == 6 { 11 } else { 4 };
                let text = format!("{} {}", mnemonic, self.r(y, true));
                self.finish(text, Cycles::Fixed(cycles), flags)
            }
            (0, 6) => {
                let target = self.r(y, true);
                let value = self.imm8();
                let cycles = if y == 6 { 10 } else { 7 };
                self.immediate_store = y == 6;
                self.finish(format!("ld {}, {}", target, value), Cycles::Fixed(cycles), F_NONE)
            }
            (0, _) => self.finish(
                ROTA[y as usize].to_string(),
                Cycles::Fixed(4),
                ROTA_FLAGS[y as usize],
            ),
            (1, _) => {
                if y == 6 && z == 6 {
                    return self.finish("halt".to_string(), Cycles::Fixed(4), F_NONE);
                }

                // with an indexed operand, the other side keeps plain H and L
                let halves = y != 6 && z != 6;
                let target = self.r(y, halves);
                let source = self.r(z, halves);
                let cycles = if y == 6 || z == 6 { 7 } else { 4 };
                self.finish(format!("ld {}, {}", target, source), Cycles::Fixed(cycles), F_NONE)
            }
            (2, _) => {
                let cycles = if z == 6 { 7 } else { 4 };
                let text = format!("{} {}", ALU[y as usize], self.r(z, true));
                self.finish(text, Cycles::Fixed(cycles), ALU_FLAGS[y as usize])
            }
            (_, 0) => self.finish(format!("ret {}", CC[y as usize]), Cycles::CondRet, F_NONE),
            (_, 1) => {
                if q == 0 {
                    let text = format!("pop {}", self.rp2(p));
                    return self.finish(text, Cycles::Fixed(10), F_NONE);
                }

                match p {
                    0 => self.finish("ret".to_string(), Cycles::Fixed(10), F_NONE),
                    1 => self.finish("exx".to_string(), Cycles::Fixed(4), F_NONE),
                    2 => {
                        let text = format!("jp ({})", self.hl());
                        self.finish(text, Cycles::Fixed(4), F_NONE)
                    }
                    _ => {
                        let text = format!("ld sp, {}", self.hl());
                        self.finish(text, Cycles::Fixed(6), F_NONE)
                    }
                }
            }
            (_, 2) => {
                let target = self.imm16();
                let text = format!("jp {}, {}", CC[y as usize], target);
                self.finish(text, Cycles::Fixed(10), F_NONE)
            }
            (_, 3) => match y {
                0 => {
                    let target = self.imm16();
                    self.finish(format!("jp {}", target), Cycles::Fixed(10), F_NONE)
                }
                // 0xCB is routed before getting here
                1 => self.finish("db $cb".to_string(), Cycles::Fixed(4), F_NONE),
                2 => {
                    let port = self.imm8();
                    self.finish(format!("out ({}), a", port), Cycles::Fixed(11), F_NONE)
                }
                3 => {
                    let port = self.imm8();
                    self.finish(format!("in a, ({})", port), Cycles::Fixed(11), F_NONE)
                }
                4 => {
                    let text = format!("ex (sp), {}", self.hl());
                    self.finish(text, Cycles::Fixed(19), F_NONE)
                }
                // EX DE,HL ignores index prefixes
                5 => self.finish("ex de, hl".to_string(), Cycles::Fixed(4), F_NONE),
                6 => self.finish("di".to_string(), Cycles::Fixed(4), F_NONE),
                _ => self.finish("ei".to_string(), Cycles::Fixed(4), F_NONE),
            },
            (_, 4) => {
                let target = self.imm16();
                let text = format!("call {}, {}", CC[y as usize], target);
                self.finish(text, Cycles::CondCall, F_NONE)
            }
            (_, 5) => {
                if q == 0 {
                    let text = format!("push {}", self.rp2(p));
                    return self.finish(text, Cycles::Fixed(11), F_NONE);
                }

                // only p == 0 gets here, the other values are prefixes
                let target = self.imm16();
                self.finish(format!("call {}", target), Cycles::Fixed(17), F_NONE)
            }
            (_, 6) => {
                let value = self.imm8();
                let text = format!("{} {}", ALU[y as usize], value);
                self.finish(text, Cycles::Fixed(7), ALU_FLAGS[y as usize])
            }
            (_, _) => self.finish(format!("rst ${:02x}", y * 8), Cycles::Fixed(11), F_NONE),
        }
    }

    fn decode_cb(mut self) -> Instruction {
        let op = self.byte();
        let x = op >> 6;
        let y = (op >> 3) & 7;
        let z = op & 7;
        let operand = R[z as usize];
        let memory = z == 6;

        let (text, cycles, flags) = match x {
            0 => (format!("{} {}", ROT[y as usize], operand), if memory { 15 } else { 8 }, F_ROT),
            1 => (format!("bit {}, {}", y, operand), if memory { 12 } else { 8 }, F_BIT),
            2 => (format!("res {}, {}", y, operand), if memory { 15 } else { 8 }, F_NONE),
            _ => (format!("set {}, {}", y, operand), if memory { 15 } else { 8 }, F_NONE),
        };

        self.finish(text, Cycles::Fixed(cycles), flags)
    }

    /// DDCB/FDCB: prefix, 0xCB, displacement, opcode.
    fn decode_index_cb(mut self, index: Index) -> Instruction {
        let operand = self.indexed_operand(index);
        let op = self.byte();
        let x = op >> 6;
        let y = (op >> 3) & 7;

        let (text, cycles, flags) = match x {
            0 => (format!("{} {}", ROT[y as usize], operand), 23, F_ROT),
            1 => (format!("bit {}, {}", y, operand), 20, F_BIT),
            2 => (format!("res {}, {}", y, operand), 23, F_NONE),
            _ => (format!("set {}, {}", y, operand), 23, F_NONE),
        };

        Instruction {
            length: self.offset as u8,
            cycles: Cycles::Fixed(cycles),
            flags,
            text,
        }
    }

    fn decode_ed(mut self) -> Instruction {
        let op = self.byte();
        let x = op >> 6;
        let y = (op >> 3) & 7;
        let z = op & 7;
        let p = y >> 1;
        let q = y & 1;

        match (x, z) {
            (1, 0) => {
                let text = if y == 6 {
                    "in (c)".to_string()
                } else {
                    format!("in {}, (c)", R[y as usize])
                };
                self.finish(text, Cycles::Fixed(12), F_IN)
            }
            (1, 1) => {
                let text = if y == 6 {
                    "out (c), 0".to_string()
                } else {
                    format!("out (c), {}", R[y as usize])
                };
                self.finish(text, Cycles::Fixed(12), F_NONE)
            }
            (1, 2) => {
                let (mnemonic, flags) = if q == 0 { ("sbc", F_SUB) } else { ("adc", F_ADD) };
                let text = format!("{} hl, {}", mnemonic, RP[p as usize]);
                self.finish(text, Cycles::Fixed(15), flags)
            }
            (1, 3) => {
                let address = self.imm16();
                let text = if q == 0 {
                    format!("ld ({}), {}", address, RP[p as usize])
                } else {
                    format!("ld {}, ({})", RP[p as usize], address)
                };
                self.finish(text, Cycles::Fixed(20), F_NONE)
            }
            (1, 4) => self.finish("neg".to_string(), Cycles::Fixed(8), F_SUB),
            (1, 5) => {
                let text = if y == 1 { "reti" } else { "retn" };
                self.finish(text.to_string(), Cycles::Fixed(14), F_NONE)
            }
            (1, 6) => self.finish(format!("im {}", IM[y as usize]), Cycles::Fixed(8), F_NONE),
            (1, _) => {
                let (text, cycles, flags) = match y {
                    0 => ("ld i, a", 9, F_NONE),
                    1 => ("ld r, a", 9, F_NONE),
                    2 => ("ld a, i", 9, F_LD_IR),
                    3 => ("ld a, r", 9, F_LD_IR),
                    4 => ("rrd", 18, F_IN),
                    5 => ("rld", 18, F_IN),
                    _ => ("nop", 8, F_NONE),
                };
                self.finish(text.to_string(), Cycles::Fixed(cycles), flags)
            }
            (2, _) if z <= 3 && y >= 4 => {
                let text = BLOCK[(y - 4) as usize][z as usize].to_string();
                let cycles = if y >= 6 { Cycles::BlockTransfer } else { Cycles::Fixed(16) };
                let flags = match z {
                    0 => F_LD_BLOCK,
                    1 => F_CP_BLOCK,
                    _ => F_IO_BLOCK,
                };
                self.finish(text, cycles, flags)
            }
            _ => self.finish(format!("db $ed, ${:02x}", op), Cycles::Fixed(8), F_NONE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Instruction {
        decode_at(bytes, 0)
    }

    fn decode_at(bytes: &[u8], address: u64) -> Instruction {
        Z80.decode(&bytes.to_vec(), address)
    }

    #[test]
    fn unprefixed() {
        let nop = decode(&[0x00]);
        assert_eq!((nop.length, nop.text.as_str()), (1, "nop"));
        assert_eq!(nop.cycles, Cycles::Fixed(4));

        let ld = decode(&[0x21, 0x34, 0x12]);
        assert_eq!((ld.length, ld.text.as_str()), (3, "ld hl, $1234"));
        assert_eq!(ld.cycles, Cycles::Fixed(10));

        let ld = decode(&[0x3E, 0x7F]);
        assert_eq!((ld.length, ld.text.as_str()), (2, "ld a, $7f"));

        let add = decode(&[0x80]);
        assert_eq!(add.text, "add a, b");
        assert_eq!(add.flags, "*****V0*");

        let and = decode(&[0xE6, 0x0F]);
        assert_eq!(and.text, "and $0f");
        assert_eq!(and.flags, "***1*P00");

        let ld = decode(&[0x77]);
        assert_eq!(ld.text, "ld (hl), a");
        assert_eq!(ld.cycles, Cycles::Fixed(7));

        assert_eq!(decode(&[0x76]).text, "halt");
        assert_eq!(decode(&[0xC3, 0x00, 0x80]).text, "jp $8000");
        assert_eq!(decode(&[0xFF]).text, "rst $38");
        assert_eq!(decode(&[0xF5]).text, "push af");
        assert_eq!(decode(&[0x37]).flags, "--*0*-01");
    }

    #[test]
    fn conditional_timing() {
        let djnz = decode(&[0x10, 0xFE]);
        assert_eq!((djnz.length, djnz.cycles), (2, Cycles::Djnz));
        assert_eq!(djnz.text, "djnz $0000");

        let jr = decode_at(&[0x00, 0x00, 0x00, 0x00, 0x20, 0x05], 4);
        assert_eq!(jr.text, "jr nz, $000b");
        assert_eq!(jr.cycles, Cycles::CondJr);

        assert_eq!(decode(&[0xC8]).cycles, Cycles::CondRet);
        assert_eq!(decode(&[0xCC, 0x00, 0x10]).cycles, Cycles::CondCall);
        assert_eq!(decode(&[0xCD, 0x00, 0x10]).cycles, Cycles::Fixed(17));
        assert_eq!(decode(&[0xCA, 0x00, 0x10]).cycles, Cycles::Fixed(10));
    }

    #[test]
    fn cb_prefix() {
        let bit = decode(&[0xCB, 0x7E]);
        assert_eq!((bit.length, bit.text.as_str()), (2, "bit 7, (hl)"));
        assert_eq!(bit.cycles, Cycles::Fixed(12));

        let rl = decode(&[0xCB, 0x11]);
        assert_eq!(rl.text, "rl c");
        assert_eq!(rl.cycles, Cycles::Fixed(8));
        assert_eq!(rl.flags, "***0*P0*");

        assert_eq!(decode(&[0xCB, 0xC7]).text, "set 0, a");
    }

    #[test]
    fn ed_prefix() {
        let ldir = decode(&[0xED, 0xB0]);
        assert_eq!((ldir.length, ldir.text.as_str()), (2, "ldir"));
        assert_eq!(ldir.cycles, Cycles::BlockTransfer);

        assert_eq!(decode(&[0xED, 0xA0]).cycles, Cycles::Fixed(16));

        let ld = decode(&[0xED, 0x73, 0x00, 0xC0]);
        assert_eq!((ld.length, ld.text.as_str()), (4, "ld ($c000), sp"));

        assert_eq!(decode(&[0xED, 0x44]).text, "neg");
        assert_eq!(decode(&[0xED, 0x56]).text, "im 1");
        assert_eq!(decode(&[0xED, 0x4D]).text, "reti");

        let invalid = decode(&[0xED, 0x00]);
        assert_eq!((invalid.length, invalid.text.as_str()), (2, "db $ed, $00"));
    }

    #[test]
    fn index_prefixes() {
        let ld = decode(&[0xDD, 0x21, 0x00, 0x40]);
        assert_eq!((ld.length, ld.text.as_str()), (4, "ld ix, $4000"));
        assert_eq!(ld.cycles, Cycles::Fixed(14));

        let ld = decode(&[0xFD, 0x7E, 0xFE]);
        assert_eq!((ld.length, ld.text.as_str()), (3, "ld a, (iy-$02)"));
        assert_eq!(ld.cycles, Cycles::Fixed(19));

        let ld = decode(&[0xDD, 0x66, 0x03]);
        assert_eq!(ld.text, "ld h, (ix+$03)");

        let ld = decode(&[0xDD, 0x36, 0x05, 0xAA]);
        assert_eq!((ld.length, ld.text.as_str()), (4, "ld (ix+$05), $aa"));
        assert_eq!(ld.cycles, Cycles::Fixed(19));

        let inc = decode(&[0xDD, 0x34, 0x01]);
        assert_eq!(inc.cycles, Cycles::Fixed(23));

        assert_eq!(decode(&[0xDD, 0x7C]).text, "ld a, ixh");
        assert_eq!(decode(&[0xDD, 0xE9]).text, "jp (ix)");
        assert_eq!(decode(&[0xDD, 0xEB]).text, "ex de, hl");

        let bit = decode(&[0xFD, 0xCB, 0x02, 0x46]);
        assert_eq!((bit.length, bit.text.as_str()), (4, "bit 0, (iy+$02)"));
        assert_eq!(bit.cycles, Cycles::Fixed(20));

        let lone = decode(&[0xDD, 0xDD, 0x00]);
        assert_eq!((lone.length, lone.text.as_str()), (1, "db $dd"));
    }

    #[test]
    fn reads_past_the_end_are_zero() {
        let ld = decode(&[0x21]);
        assert_eq!((ld.length, ld.text.as_str()), (3, "ld hl, $0000"));
    }

    #[test]
    fn every_opcode_has_a_bounded_length() {
        for op in 0..=0xFFu8 {
            for prefix in [None, Some(0xCB), Some(0xED), Some(0xDD), Some(0xFD)].iter() {
                let bytes: Vec<u8> = match *prefix {
                    Some(prefix) => vec![prefix, op, 0x00, 0x00],
                    None => vec![op, 0x00, 0x00, 0x00],
                };

                let instruction = decode(&bytes);
                assert!(instruction.length >= 1 && instruction.length <= 4, "{:02x?}", bytes);
                assert_eq!(instruction.flags.len(), 8);
            }
        }
    }
}
