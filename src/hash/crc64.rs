//! Table-driven reflected CRC-64
//!
//! The shell names the per-application destination files after this checksum.
//! The generator polynomial is the reflected form of the ECMA-182 polynomial.

use std::sync::LazyLock;

/// Reflected generator polynomial
pub const CRC64_POLYNOMIAL: u64 = 0x92C6_4265_D321_39A4;

/// Initial register value (no final XOR is applied)
pub const CRC64_INITIAL: u64 = 0xFFFF_FFFF_FFFF_FFFF;

/// Byte-at-a-time lookup table, built once per process on first use
static LOOKUP_TABLE: LazyLock<[u64; 256]> = LazyLock::new(build_table);

fn build_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    for (byte, slot) in (0u64..).zip(table.iter_mut()) {
        let mut entry = byte;
        for _ in 0..8 {
            entry = if entry & 1 == 1 {
                (entry >> 1) ^ CRC64_POLYNOMIAL
            } else {
                entry >> 1
            };
        }
        *slot = entry;
    }
    table
}

/// Streaming CRC-64 state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc64 {
    register: u64,
}

impl Default for Crc64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc64 {
    /// Create a hasher with the register set to [`CRC64_INITIAL`]
    pub const fn new() -> Self {
        Self {
            register: CRC64_INITIAL,
        }
    }

    /// Feed more bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        let table = &*LOOKUP_TABLE;
        for &byte in bytes {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "Index is masked to the low byte"
            )]
            let index = ((self.register ^ u64::from(byte)) & 0xFF) as usize;
            self.register = (self.register >> 8) ^ table[index];
        }
    }

    /// Current register value
    pub const fn finish(&self) -> u64 {
        self.register
    }

    /// Reset the register to [`CRC64_INITIAL`]
    pub fn reset(&mut self) {
        self.register = CRC64_INITIAL;
    }
}
