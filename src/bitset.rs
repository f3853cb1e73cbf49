/// A growable bitfield. Bits are stored most-significant first within each word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    const BITMASK_CUR: u64 = 0x80000000_00000000;

    pub fn new() -> Self {
        Bitset { words: Vec::new() }
    }

    /// A zeroed bitset able to hold at least `len` bits without growing.
    pub fn with_len(len: usize) -> Self {
        Bitset {
            words: vec![0u64; (len + 63) >> 6],
        }
    }

    /// Number of addressable bits before the next `set` has to grow.
    pub fn len(&self) -> usize {
        self.words.len() << 6
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, idx: usize) -> bool {
        let bitfield_index = idx >> 6;
        let bitmask = Self::BITMASK_CUR >> (idx & 0x3F);

        self.words
            .get(bitfield_index)
            .map_or(false, |w| (w & bitmask) != 0)
    }

    pub fn set(&mut self, idx: usize) {
        let bitfield_index = idx >> 6;
        if bitfield_index >= self.words.len() {
            self.words.resize(bitfield_index + 1, 0);
        }
        self.words[bitfield_index] |= Self::BITMASK_CUR >> (idx & 0x3F);
    }

    /// Sets a bit and reports whether it was previously clear.
    pub fn insert(&mut self, idx: usize) -> bool {
        let fresh = !self.get(idx);
        self.set(idx);
        fresh
    }

    pub fn clear_bit(&mut self, idx: usize) {
        if let Some(w) = self.words.get_mut(idx >> 6) {
            *w &= !(Self::BITMASK_CUR >> (idx & 0x3F));
        }
    }

    /// Zeroes every bit but keeps the allocation.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
