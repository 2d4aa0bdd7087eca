//! Helpers shared by integration tests: an ELF32 image builder and a mock physical memory.
#![allow(dead_code)]

use elf32::{PhysAddr, PhysicalMemory};

pub const EM_ARM: u16 = 40;
pub const EM_X86: u16 = 3;

pub const PT_LOAD: u32 = 1;
pub const PT_NOTE: u32 = 4;

pub const PF_X: u32 = 1;
pub const PF_W: u32 = 2;
pub const PF_R: u32 = 4;

pub const EHDR_SIZE: usize = 52;
pub const PHDR_SIZE: usize = 32;
pub const SHDR_SIZE: usize = 40;

/// Byte used to pre-fill mock memory, so zero-fill is observable.
pub const POISON: u8 = 0x5A;

#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub kind: u32,
    pub flags: u32,
    pub paddr: u32,
    pub data: Vec<u8>,
    pub mem_size: u32,
}

impl SegmentSpec {
    pub fn load(paddr: u32, data: Vec<u8>, mem_size: u32) -> Self {
        Self {
            kind: PT_LOAD,
            flags: PF_R | PF_W | PF_X,
            paddr,
            data,
            mem_size,
        }
    }

    pub fn note(data: Vec<u8>) -> Self {
        let mem_size = data.len() as u32;
        Self {
            kind: PT_NOTE,
            flags: PF_R,
            paddr: 0,
            data,
            mem_size,
        }
    }
}

/// Builds a little-endian ELF32 executable.
///
/// The program header table directly follows the file header, segment data follows the table
/// and a section header table with a single null entry ends the image.
pub fn build_elf(machine: u16, entry: u32, segments: &[SegmentSpec]) -> Vec<u8> {
    let phnum = segments.len() as u16;
    let phoff = EHDR_SIZE;
    let ph_table_end = phoff + usize::from(phnum) * PHDR_SIZE;

    let mut elf = vec![0u8; ph_table_end];

    elf[0..4].copy_from_slice(&[0x7F, b'E', b'L', b'F']);
    elf[4] = 1; // 32-bit
    elf[5] = 1; // little-endian
    elf[6] = 1; // version

    write_u16(&mut elf, 0x10, 2); // ET_EXEC
    write_u16(&mut elf, 0x12, machine);
    write_u32(&mut elf, 0x14, 1);
    write_u32(&mut elf, 0x18, entry);
    write_u32(&mut elf, 0x1C, phoff as u32);
    write_u16(&mut elf, 0x28, EHDR_SIZE as u16);
    write_u16(&mut elf, 0x2A, PHDR_SIZE as u16);
    write_u16(&mut elf, 0x2C, phnum);

    for (idx, seg) in segments.iter().enumerate() {
        let cursor = elf.len().next_multiple_of(4);
        elf.resize(cursor, 0);
        elf.extend_from_slice(&seg.data);

        let base = phoff + idx * PHDR_SIZE;
        write_u32(&mut elf, base, seg.kind);
        write_u32(&mut elf, base + 4, cursor as u32);
        write_u32(&mut elf, base + 8, seg.paddr);
        write_u32(&mut elf, base + 12, seg.paddr);
        write_u32(&mut elf, base + 16, seg.data.len() as u32);
        write_u32(&mut elf, base + 20, seg.mem_size);
        write_u32(&mut elf, base + 24, seg.flags);
        write_u32(&mut elf, base + 28, 4);
    }

    let shoff = elf.len().next_multiple_of(4);
    elf.resize(shoff + SHDR_SIZE, 0);
    write_u32(&mut elf, 0x20, shoff as u32);
    write_u16(&mut elf, 0x2E, SHDR_SIZE as u16);
    write_u16(&mut elf, 0x30, 1);
    write_u16(&mut elf, 0x32, 0);

    elf
}

/// Offset of the `idx`-th program header in an image produced by `build_elf`.
pub const fn phdr_offset(idx: usize) -> usize {
    EHDR_SIZE + idx * PHDR_SIZE
}

pub fn write_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// A window of fake physical memory.
///
/// Every access outside of the window panics, which the tests treat as a write to
/// memory the loader was never allowed to touch.
pub struct MockMemory {
    base: u32,
    bytes: Vec<u8>,
    pub copies: Vec<(PhysAddr, Vec<u8>)>,
    pub zeroed: Vec<(PhysAddr, u32)>,
}

impl MockMemory {
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            bytes: vec![POISON; size],
            copies: Vec::new(),
            zeroed: Vec::new(),
        }
    }

    /// Number of calls made through `PhysicalMemory`.
    pub fn writes(&self) -> usize {
        self.copies.len() + self.zeroed.len()
    }

    pub fn read(&self, addr: u32, len: usize) -> &[u8] {
        let start = self.index(addr, len);
        &self.bytes[start..start + len]
    }

    pub fn read_u32(&self, addr: u32) -> u32 {
        u32::from_le_bytes(self.read(addr, 4).try_into().unwrap())
    }

    fn index(&self, addr: u32, len: usize) -> usize {
        let start = addr
            .checked_sub(self.base)
            .unwrap_or_else(|| panic!("access at {addr:#x} below window {:#x}", self.base))
            as usize;
        assert!(
            start + len <= self.bytes.len(),
            "access at {addr:#x}+{len:#x} past end of window"
        );
        start
    }
}

impl PhysicalMemory for MockMemory {
    fn copy_data(&mut self, dest: PhysAddr, src: &[u8]) {
        let start = self.index(dest.as_u32(), src.len());
        self.bytes[start..start + src.len()].copy_from_slice(src);
        self.copies.push((dest, src.to_vec()));
    }

    fn zero_region(&mut self, dest: PhysAddr, len: u32) {
        let start = self.index(dest.as_u32(), len as usize);
        self.bytes[start..start + len as usize].fill(0);
        self.zeroed.push((dest, len));
    }
}
