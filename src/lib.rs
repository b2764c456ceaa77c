//! CBC mode with PKCS#5 padding over packed bit buffers, and a harness for timing it.
//!
//! The crate is split into three layers:
//!
//! - [`bits`]: a lossless codec between byte strings and [`BitBuffer`]s, arrays of big-endian
//!   32-bit words which may end on a partial word.
//! - [`cbc`]: cipher block chaining over any [`BlockCipher`], with padding applied on encryption
//!   and validated in constant time on decryption.
//! - [`bench`]: a runner which measures the mean duration of an operation over many trials and
//!   reports it to a [`bench::MetricsSink`].
//!
//! The block cipher itself is not implemented here. [`aes::openssl::Schedule`] adapts OpenSSL's
//! AES to the [`BlockCipher`] trait.
//!
//! ```no_run
//! use cbc_bench::{aes, cbc, BitBuffer};
//!
//! let key = [0u8; 32];
//! let schedule = aes::openssl::Schedule::new(aes::Key::from_bytes(&key).unwrap()).unwrap();
//! let iv = BitBuffer::from_bytes(&[0; 16]);
//!
//! let ct = cbc::encrypt(&schedule, &BitBuffer::from_bytes(b"attack at dawn"), &iv).unwrap();
//! let pt = cbc::decrypt(&schedule, &ct, &iv).unwrap();
//! assert_eq!(pt.to_bytes(), b"attack at dawn");
//! ```

#[macro_use] mod util;

pub mod aes;
pub mod bench;
pub mod bits;
pub mod cbc;
pub mod error;

pub use self::aes::{Block, Key, BLOCK_LEN};
pub use self::bits::BitBuffer;
pub use self::error::{ConfigError, Error};

/// An initialized key schedule which can perform block encryption and decryption.
pub trait BlockCipher {
    /// Encrypt the input data, returning the number of bytes encrypted.
    ///
    /// `blocks.len()` must be a multiple of the AES block length (16 bytes).
    fn encrypt_blocks(&self, blocks: &mut [u8]) -> usize;

    /// Decrypt the input data, returning the number of bytes decrypted.
    ///
    /// `blocks.len()` must be a multiple of the AES block length (16 bytes).
    fn decrypt_blocks(&self, blocks: &mut [u8]) -> usize;
}

impl<T: BlockCipher + ?Sized> BlockCipher for &T {
    fn encrypt_blocks(&self, blocks: &mut [u8]) -> usize {
        (**self).encrypt_blocks(blocks)
    }

    fn decrypt_blocks(&self, blocks: &mut [u8]) -> usize {
        (**self).decrypt_blocks(blocks)
    }
}

/// Encrypts every block in `buf`, calling `encrypt_blocks` until the whole slice is consumed.
pub fn encrypt_all<C: BlockCipher + ?Sized>(cipher: &C, buf: &mut [u8]) {
    debug_assert_eq!(buf.len() % BLOCK_LEN, 0);

    let mut cursor = buf;
    while !cursor.is_empty() {
        let adv = cipher.encrypt_blocks(cursor);
        assert!(adv > 0, "block cipher made no progress");
        cursor = &mut cursor[adv..];
    }
}

/// Decrypts every block in `buf`, calling `decrypt_blocks` until the whole slice is consumed.
pub fn decrypt_all<C: BlockCipher + ?Sized>(cipher: &C, buf: &mut [u8]) {
    debug_assert_eq!(buf.len() % BLOCK_LEN, 0);

    let mut cursor = buf;
    while !cursor.is_empty() {
        let adv = cipher.decrypt_blocks(cursor);
        assert!(adv > 0, "block cipher made no progress");
        cursor = &mut cursor[adv..];
    }
}
