use crate::host::{Context, HostMemory, MemoryFlags, MemoryInfo};

/// Byte-addressable, bounded view over some memory.
///
/// Callers must keep every `peek` below `size()`.
pub trait MemoryView {
    fn peek(&self, address: u64) -> u8;
    fn size(&self) -> u64;

    /// Hex digits needed to print any address of the region.
    fn required_digits(&self) -> usize {
        required_digits(self.size())
    }
}

pub fn required_digits(size: u64) -> usize {
    let last = size.saturating_sub(1);
    let bits = 64 - last.leading_zeros() as usize;

    ((bits + 3) / 4).max(1)
}

/// A host memory region bound to the context it was negotiated with.
#[derive(Clone)]
pub struct Memory {
    desc: HostMemory,
    ctx: Context,
}

impl Memory {
    pub fn new(desc: HostMemory, ctx: Context) -> Memory {
        Memory { desc, ctx }
    }

    pub fn description(&self) -> &str {
        self.desc.description()
    }

    pub fn is_cpu_addressable(&self) -> bool {
        self.desc.flags().contains(MemoryFlags::CPU_ADDRESSABLE)
    }
}

impl MemoryView for Memory {
    #[inline]
    fn peek(&self, address: u64) -> u8 {
        self.desc.peek(&self.ctx, address)
    }

    fn size(&self) -> u64 {
        self.desc.size()
    }
}

impl MemoryView for Vec<u8> {
    #[inline]
    fn peek(&self, address: u64) -> u8 {
        self[address as usize]
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ram_region;

    #[test]
    fn digits_follow_region_size() {
        assert_eq!(required_digits(0), 1);
        assert_eq!(required_digits(1), 1);
        assert_eq!(required_digits(0x10), 1);
        assert_eq!(required_digits(0x11), 2);
        assert_eq!(required_digits(0x4000), 4);
        assert_eq!(required_digits(0x10000), 4);
        assert_eq!(required_digits(0x10001), 5);
        assert_eq!(required_digits(u64::MAX), 16);
    }

    #[test]
    fn host_region_reads_through_accessor() {
        let (memory, _ram) = ram_region("RAM", vec![0x10, 0x20, 0x30], true);

        assert_eq!(memory.description(), "RAM");
        assert_eq!(memory.size(), 3);
        assert!(memory.is_cpu_addressable());
        assert_eq!(memory.peek(1), 0x20);
        assert_eq!(memory.required_digits(), 1);
    }
}
