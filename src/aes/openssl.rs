//! AES provided by OpenSSL.
//!
//! OpenSSL's ECB mode with padding disabled is used as a raw block transform: every full block
//! passed to `update` comes back encrypted (or decrypted) immediately, so a single `Crypter` can
//! be reused for the lifetime of the key.

use std::cell::RefCell;

use openssl::error::ErrorStack;
use openssl::symm::{Cipher, Crypter, Mode};

use crate::BlockCipher;
use crate::aes::{Key, BLOCK_LEN};

/// A `Crypter` and the scratch buffer OpenSSL writes its output into.
struct Engine {
    crypter: Crypter,
    scratch: Vec<u8>,
}

impl Engine {
    fn new(cipher: Cipher, mode: Mode, key: &[u8]) -> Result<Self, ErrorStack> {
        let mut crypter = Crypter::new(cipher, mode, key, None)?;
        crypter.pad(false);

        Ok(Engine {
            crypter,
            scratch: Vec::new(),
        })
    }

    fn apply(&mut self, blocks: &mut [u8]) -> usize {
        let len = blocks.len() - blocks.len() % BLOCK_LEN;

        // OpenSSL requires room for one more block than it is given.
        self.scratch.resize(len + BLOCK_LEN, 0);

        // `update` only fails on a misconfigured context, which `Engine::new` has already ruled
        // out.
        let written = self.crypter
            .update(&blocks[..len], &mut self.scratch)
            .expect("ECB update over whole blocks");
        debug_assert_eq!(written, len);

        blocks[..written].copy_from_slice(&self.scratch[..written]);
        written
    }
}

/// A scheduled AES key backed by OpenSSL.
///
/// The schedule holds mutable OpenSSL state behind a `RefCell`, so it is not `Sync` and cannot be
/// shared across threads.
pub struct Schedule {
    bits: usize,
    enc: RefCell<Engine>,
    dec: RefCell<Engine>,
}

impl Schedule {
    /// Expands `key` for both encryption and decryption.
    pub fn new(key: Key) -> Result<Self, ErrorStack> {
        let cipher = match key {
            Key::Aes128(_) => Cipher::aes_128_ecb(),
            Key::Aes192(_) => Cipher::aes_192_ecb(),
            Key::Aes256(_) => Cipher::aes_256_ecb(),
        };

        let schedule = Schedule {
            bits: key.bits(),
            enc: RefCell::new(Engine::new(cipher, Mode::Encrypt, key.as_slice())?),
            dec: RefCell::new(Engine::new(cipher, Mode::Decrypt, key.as_slice())?),
        };

        tracing::debug!(bits = schedule.bits, "scheduled AES key");
        Ok(schedule)
    }

    /// The length of the key this schedule was built from.
    pub fn key_bits(&self) -> usize {
        self.bits
    }
}

impl BlockCipher for Schedule {
    fn encrypt_blocks(&self, blocks: &mut [u8]) -> usize {
        self.enc.borrow_mut().apply(blocks)
    }

    fn decrypt_blocks(&self, blocks: &mut [u8]) -> usize {
        self.dec.borrow_mut().apply(blocks)
    }
}
