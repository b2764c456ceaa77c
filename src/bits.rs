//! Packed bit buffers.
//!
//! A [`BitBuffer`] stores a bit string as big-endian 32-bit words. The last word may be partial,
//! in which case its valid bits are left-justified and the remaining low bits are zero:
//!
//! ```text
//! bytes:  ab cd ef 01 23
//! words:  [abcdef01, 23000000]   bit_len = 40, partial_bits = 8
//! ```

/// The number of bits in a packed word.
pub const WORD_BITS: usize = 32;

const WORD_BYTES: usize = WORD_BITS / 8;

/// A bit string packed into big-endian 32-bit words.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    words: Vec<u32>,
    bit_len: usize,
}

/// Number of words needed to hold `bits` bits.
fn words_for(bits: usize) -> usize {
    (bits + WORD_BITS - 1) / WORD_BITS
}

impl BitBuffer {
    /// Packs `bytes` four to a word, most significant byte first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let words = bytes.chunks(WORD_BYTES)
            .map(|chunk| {
                let mut word = [0; WORD_BYTES];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_be_bytes(word)
            })
            .collect();

        BitBuffer {
            words,
            bit_len: 8 * bytes.len(),
        }
    }

    /// Builds a buffer holding the first `bit_len` bits of `words`.
    ///
    /// Returns `None` unless `words` has exactly as many words as `bit_len` requires. Any bits
    /// past `bit_len` in the final word are cleared.
    pub fn from_words(mut words: Vec<u32>, bit_len: usize) -> Option<Self> {
        if words.len() != words_for(bit_len) {
            return None;
        }

        let partial = bit_len % WORD_BITS;
        if partial != 0 {
            if let Some(last) = words.last_mut() {
                *last &= !0u32 << (WORD_BITS - partial);
            }
        }

        Some(BitBuffer { words, bit_len })
    }

    /// Unpacks the buffer into bytes.
    ///
    /// Trailing bits which do not fill a whole byte are dropped.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * WORD_BYTES);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }

        bytes.truncate(self.byte_len());
        bytes
    }

    /// The packed words, including a partial final word if there is one.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// The number of valid bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// The number of whole bytes.
    pub fn byte_len(&self) -> usize {
        self.bit_len / 8
    }

    /// The number of valid bits in the final word, or 0 if the buffer ends on a word boundary.
    pub fn partial_bits(&self) -> usize {
        self.bit_len % WORD_BITS
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit_len % 8 == 0
    }
}

impl From<&[u8]> for BitBuffer {
    fn from(bytes: &[u8]) -> Self {
        BitBuffer::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for BitBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        BitBuffer::from_bytes(&bytes)
    }
}

impl core::fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "BitBuffer({} bits: ", self.bit_len)?;
        for word in &self.words {
            write!(f, "{:08x}", word)?;
        }
        write!(f, ")")
    }
}
