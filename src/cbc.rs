//! Cipher block chaining with PKCS#5 padding.
//!
//! ```text
//! C[0] = E(P[0] ^ IV)
//! C[i] = E(P[i] ^ C[i-1])
//! ```
//!
//! Encryption always appends between 1 and 16 bytes of padding, each equal to the number of bytes
//! added, so the ciphertext is never empty and is always a whole number of blocks. Decryption
//! checks the padding without branching on its contents and reports every kind of damage as the
//! same [`Error::Corrupt`].

use static_assertions::const_assert_eq;
use timing_shield::{TpEq, TpOrd, TpU8};
use try_from::TryFrom;

use crate::{decrypt_all, encrypt_all, BitBuffer, Block, BlockCipher, BLOCK_LEN};
use crate::bits::WORD_BITS;
use crate::error::{ConfigError, Error};
use crate::util::xor_in_place;

/// The length of an initialization vector in bits.
pub const IV_BITS: usize = 8 * BLOCK_LEN;

const_assert_eq!(IV_BITS, 128);
const_assert_eq!(IV_BITS % WORD_BITS, 0);

/// Encrypts `plaintext` under `cipher`.
///
/// `iv` must be exactly 128 bits and `plaintext` must be a whole number of bytes.
pub fn encrypt<C>(cipher: &C, plaintext: &BitBuffer, iv: &BitBuffer) -> Result<BitBuffer, Error>
    where C: BlockCipher + ?Sized
{
    encrypt_with_adata(cipher, plaintext, iv, &BitBuffer::default())
}

/// Like [`encrypt`], but accepts associated data. Since CBC cannot authenticate it, `adata` must
/// be empty.
pub fn encrypt_with_adata<C>(cipher: &C,
                             plaintext: &BitBuffer,
                             iv: &BitBuffer,
                             adata: &BitBuffer) -> Result<BitBuffer, Error>
    where C: BlockCipher + ?Sized
{
    let iv = check_params(iv, adata)?;
    if !plaintext.is_byte_aligned() {
        return Err(ConfigError::NotByteAligned { bits: plaintext.bit_len() }.into());
    }

    let mut buf = pad(&plaintext.to_bytes());

    let mut prev = iv;
    for block in buf.chunks_exact_mut(BLOCK_LEN) {
        xor_in_place(block, prev.as_ref());
        encrypt_all(cipher, block);
        prev.as_mut().copy_from_slice(block);
    }

    Ok(BitBuffer::from_bytes(&buf))
}

/// Decrypts `ciphertext` under `cipher` and strips its padding.
///
/// Fails with [`Error::Corrupt`] if `ciphertext` is not a positive whole number of blocks or if
/// the padding is invalid.
pub fn decrypt<C>(cipher: &C, ciphertext: &BitBuffer, iv: &BitBuffer) -> Result<BitBuffer, Error>
    where C: BlockCipher + ?Sized
{
    decrypt_with_adata(cipher, ciphertext, iv, &BitBuffer::default())
}

/// Like [`decrypt`], but accepts associated data. Since CBC cannot authenticate it, `adata` must
/// be empty.
pub fn decrypt_with_adata<C>(cipher: &C,
                             ciphertext: &BitBuffer,
                             iv: &BitBuffer,
                             adata: &BitBuffer) -> Result<BitBuffer, Error>
    where C: BlockCipher + ?Sized
{
    let iv = check_params(iv, adata)?;

    let bits = ciphertext.bit_len();
    if bits == 0 || bits % IV_BITS != 0 {
        return Err(Error::Corrupt);
    }

    let ct = ciphertext.to_bytes();
    let mut buf = ct.clone();

    // Every chaining value is already known, so the whole buffer can go to the cipher at once.
    decrypt_all(cipher, &mut buf);
    xor_in_place(&mut buf[..BLOCK_LEN], iv.as_ref());
    xor_in_place(&mut buf[BLOCK_LEN..], &ct[..ct.len() - BLOCK_LEN]);

    let len = unpad(&buf)?.len();
    buf.truncate(len);

    Ok(BitBuffer::from_bytes(&buf))
}

/// Checks the parameters shared by encryption and decryption, returning the IV as a block.
fn check_params(iv: &BitBuffer, adata: &BitBuffer) -> Result<Block, ConfigError> {
    if !adata.is_empty() {
        return Err(ConfigError::AdataUnsupported);
    }

    // A partial final byte would be dropped by `to_bytes`, so check the bit length first.
    let invalid = ConfigError::InvalidIvLength { bits: iv.bit_len() };
    if iv.bit_len() != IV_BITS {
        return Err(invalid);
    }

    Block::try_from(&iv.to_bytes()[..]).map_err(|()| invalid)
}

/// Appends PKCS#5 padding to `data`.
///
/// Between 1 and 16 bytes are always added; block-aligned input gets a whole block of `0x10`.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN - data.len() % BLOCK_LEN;

    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Returns `data` without its PKCS#5 padding.
///
/// `data` must be a positive whole number of blocks. All 16 bytes of the final block are examined
/// on every call and only the overall verdict is revealed, so the running time does not depend on
/// where the padding went wrong.
pub fn unpad(data: &[u8]) -> Result<&[u8], Error> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(Error::Corrupt);
    }

    let tail = &data[data.len() - BLOCK_LEN..];
    let pad = TpU8::protect(tail[BLOCK_LEN - 1]);

    let mut valid = !pad.tp_eq(&TpU8::protect(0))
        & pad.tp_lt(&TpU8::protect(BLOCK_LEN as u8 + 1));

    for (i, &byte) in tail.iter().rev().enumerate() {
        let in_pad = TpU8::protect(i as u8).tp_lt(&pad);
        valid = valid & (!in_pad | TpU8::protect(byte).tp_eq(&pad));
    }

    if !valid.expose() {
        return Err(Error::Corrupt);
    }

    let pad_len = pad.expose() as usize;
    Ok(&data[..data.len() - pad_len])
}
