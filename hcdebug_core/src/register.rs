use crate::host::{Context, HostRegister, RegisterFlags, RegisterInfo};
use crate::numeric;
use crate::ui::InputKind;

use std::cell::Cell;

/// A host register bound to its context, plus change tracking for the debugger.
pub struct Register {
    desc: HostRegister,
    ctx: Context,

    previous_value: Cell<u64>,
    // None until the first `changed` call after a reset
    has_changed: Cell<Option<bool>>,
}

impl Register {
    pub fn new(desc: HostRegister, ctx: Context) -> Register {
        let value = desc.read(&ctx);

        Register {
            desc,
            ctx,
            previous_value: Cell::new(value),
            has_changed: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Width in bytes.
    pub fn size(&self) -> u8 {
        self.desc.size()
    }

    pub fn flags(&self) -> RegisterFlags {
        self.desc.flags()
    }

    pub fn is_readonly(&self) -> bool {
        self.desc.is_readonly()
    }

    pub fn bits(&self) -> Option<&[String]> {
        self.desc.bits()
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.desc.read(&self.ctx)
    }

    /// Writes through to the host. Read-only registers ignore the write.
    pub fn set(&self, value: u64) {
        if !self.is_readonly() {
            self.desc.write(&self.ctx, value);
        }
    }

    /// Whether the value moved since the previous snapshot. The host is read at
    /// most once between two calls to `clear_changed`.
    pub fn changed(&self) -> bool {
        if let Some(has_changed) = self.has_changed.get() {
            return has_changed;
        }

        let value = self.get();
        let has_changed = value != self.previous_value.get();

        self.previous_value.set(value);
        self.has_changed.set(Some(has_changed));

        has_changed
    }

    pub fn clear_changed(&self) {
        self.has_changed.set(None);
    }

    pub fn hex_string(&self) -> String {
        format!("0x{:0width$x}", self.get(), width = self.size() as usize * 2)
    }

    pub fn decimal_string(&self) -> String {
        format!("{}", self.get())
    }

    /// Writes the value typed into a field. Malformed input is dropped and the
    /// register keeps its value.
    pub fn apply_input(&self, kind: InputKind, text: &str) -> bool {
        let value = match kind {
            InputKind::Hexadecimal => numeric::parse_hex(text),
            InputKind::Decimal => numeric::parse_decimal(text),
        };

        match value {
            Some(value) if !self.is_readonly() => {
                self.set(value);
                true
            }
            _ => false,
        }
    }

    /// Named bits of a flag register with their masks, most significant first.
    pub fn displayed_bits(&self) -> Vec<(&str, u64)> {
        let names = match self.bits() {
            Some(names) => names,
            None => return vec![],
        };

        let width = (self.size() as u32 * 8).min(64);
        let mut bits = Vec::with_capacity(names.len());

        for (index, name) in names.iter().enumerate().take(width as usize) {
            let mask = 1u64 << (width - 1 - index as u32);
            bits.push((name.as_str(), mask));
        }

        bits
    }
}

/// Collects the checkbox state of a flag register during one draw pass and
/// writes it back in a single `set`.
pub struct BitEdit<'a> {
    register: &'a Register,
    original: u64,
    value: u64,
}

impl<'a> BitEdit<'a> {
    pub fn begin(register: &'a Register) -> Option<BitEdit<'a>> {
        register.bits()?;

        let value = register.get();

        Some(BitEdit {
            register,
            original: value,
            value,
        })
    }

    pub fn is_set(&self, mask: u64) -> bool {
        self.value & mask != 0
    }

    pub fn set_bit(&mut self, mask: u64, checked: bool) {
        if checked {
            self.value |= mask;
        } else {
            self.value &= !mask;
        }
    }

    /// Bits without a name keep the value read when the edit began.
    pub fn commit(self) -> bool {
        if self.value == self.original {
            return false;
        }

        self.register.set(self.value);
        true
    }
}
