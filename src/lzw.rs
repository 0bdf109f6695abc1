// lzw.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF image data
use std::cmp::Ordering;

/// Code type
type Code = u16;

/// Width of emitted codes, in bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct CodeWidth(u8);

impl CodeWidth {
    /// Maximum code width allowed for GIF
    const MAX: Self = CodeWidth(12);

    /// Create a code width (clamped to maximum)
    fn new(bits: u8) -> Self {
        CodeWidth(bits.min(Self::MAX.0))
    }

    /// Get the number of codes representable at this width
    fn entries(self) -> usize {
        1 << self.0
    }

    /// Widen by one bit (clamped to maximum)
    fn widen(&mut self) {
        *self = Self::new(self.0 + 1);
    }
}

/// Entry in the string table.
///
/// Each entry extends the string of its parent by one symbol.  Entries
/// sharing a parent form a binary search tree ordered by symbol, so only
/// three links are needed per entry.
#[derive(Clone, Copy, Debug)]
struct Entry {
    /// First child (strings extending this one)
    child: Option<Code>,
    /// Sibling with a smaller symbol
    left: Option<Code>,
    /// Sibling with a larger symbol
    right: Option<Code>,
    /// Final symbol of the string
    symbol: u8,
}

impl Entry {
    fn new(symbol: u8) -> Self {
        Entry {
            child: None,
            left: None,
            right: None,
            symbol,
        }
    }

    /// Get the link to follow for an ordering
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.child,
            Ordering::Greater => self.right,
        }
    }

    /// Set the link for an ordering
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.child = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

/// String table mapping (prefix code, symbol) pairs to codes
#[derive(Debug)]
struct StringTable {
    /// Table of entries, indexed by code
    entries: Vec<Entry>,
    /// Symbol bits (LZW minimum code size)
    symbol_bits: u8,
}

impl StringTable {
    /// Create a string table in its initial state
    fn new(symbol_bits: u8) -> Self {
        let mut table = StringTable {
            entries: Vec::with_capacity(CodeWidth::MAX.entries() + 1),
            symbol_bits,
        };
        table.reset();
        table
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.symbol_bits
    }

    /// Get the end of information code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next free code
    fn next_code(&self) -> usize {
        self.entries.len()
    }

    /// Reset to root entries plus clear and end codes
    fn reset(&mut self) {
        self.entries.clear();
        for symbol in 0..self.clear_code() {
            self.entries.push(Entry::new(symbol as u8));
        }
        self.entries.push(Entry::new(0)); // clear code
        self.entries.push(Entry::new(0)); // end code
    }

    /// Find the code extending `prefix` by `symbol`.
    ///
    /// On a miss, a new entry is added at the next free code and `None` is
    /// returned.
    fn find_or_insert(&mut self, prefix: Code, symbol: u8) -> Option<Code> {
        let next_code = self.next_code() as Code;
        let mut code = prefix;
        let mut ordering = Ordering::Equal;
        while let Some(link) = self.entries[code as usize].link(ordering) {
            code = link;
            ordering = symbol.cmp(&self.entries[code as usize].symbol);
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        self.entries[code as usize].set_link(ordering, next_code);
        self.entries.push(Entry::new(symbol));
        None
    }
}

/// LZW data compressor for GIF image data.
///
/// Codes are packed least-significant bit first into a byte buffer.
pub struct Compressor {
    /// String table
    table: StringTable,
    /// Symbol bits (LZW minimum code size)
    symbol_bits: u8,
    /// Current code width
    width: CodeWidth,
    /// Pending bits not yet written
    bits: u32,
    /// Number of pending bits
    n_bits: u8,
    /// Number of dictionary resets
    resets: usize,
}

impl Compressor {
    /// Create a new compressor.
    ///
    /// * `symbol_bits` Bits per input symbol (8 for 256 color frames).
    pub fn new(symbol_bits: u8) -> Self {
        Compressor {
            table: StringTable::new(symbol_bits),
            symbol_bits,
            width: CodeWidth::new(symbol_bits + 1),
            bits: 0,
            n_bits: 0,
            resets: 0,
        }
    }

    /// Get the number of dictionary resets so far
    pub fn resets(&self) -> usize {
        self.resets
    }

    /// Pack a code at the current width
    fn pack(&mut self, code: Code, buffer: &mut Vec<u8>) {
        self.bits |= u32::from(code) << self.n_bits;
        self.n_bits += self.width.0;
        while self.n_bits >= 8 {
            buffer.push(self.bits as u8);
            self.bits >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Write out any partial byte
    fn flush_bits(&mut self, buffer: &mut Vec<u8>) {
        if self.n_bits > 0 {
            buffer.push(self.bits as u8);
            self.bits = 0;
            self.n_bits = 0;
        }
    }

    /// Return to initial dictionary state
    fn reset(&mut self) {
        self.table.reset();
        self.width = CodeWidth::new(self.symbol_bits + 1);
        self.resets += 1;
    }

    /// Compress a buffer of symbols, appending codes to `buffer`.
    ///
    /// Output starts with a clear code and ends with an end code, padded
    /// to a whole byte.
    pub fn compress(&mut self, symbols: &[u8], buffer: &mut Vec<u8>) {
        self.pack(self.table.clear_code(), buffer);
        let mut prefix: Option<Code> = None;
        for &symbol in symbols {
            prefix = match prefix {
                None => Some(Code::from(symbol)),
                Some(code) => match self.table.find_or_insert(code, symbol) {
                    Some(extended) => Some(extended),
                    None => {
                        self.pack(code, buffer);
                        Some(Code::from(symbol))
                    }
                },
            };
            let next_code = self.table.next_code();
            if next_code > self.width.entries() {
                if next_code > CodeWidth::MAX.entries() {
                    trace!("lzw: string table full, clearing");
                    self.pack(self.table.clear_code(), buffer);
                    self.reset();
                } else {
                    self.width.widen();
                }
            }
        }
        if let Some(code) = prefix {
            self.pack(code, buffer);
        }
        self.pack(self.table.end_code(), buffer);
        self.flush_bits(buffer);
    }
}
