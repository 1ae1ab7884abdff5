//! Bit helpers for the bitmask-sparse record codec.

/// Number of set bits for every byte value.
static BITS_PER_BYTE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = (i & 1) as u8 + table[i >> 1];
        i += 1;
    }
    table
}

/// Population count of a 32-bit occupancy mask, one table lookup per byte.
pub fn popcount(word: u32) -> u32 {
    word.to_le_bytes()
        .iter()
        .map(|&b| u32::from(BITS_PER_BYTE[b as usize]))
        .sum()
}

/// Whether bit `position` of `mask` is set. Positions past 31 are never set.
pub fn is_set(mask: u32, position: usize) -> bool {
    position < 32 && (mask >> position) & 1 == 1
}
