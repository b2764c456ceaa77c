//! Types for storing AES key material.

use thiserror::Error;

/// Returned by [`Key::from_bytes`] when the key is not 128, 192, or 256 bits long.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("invalid AES key length: {0} bytes")]
pub struct InvalidKeyLength(pub usize);

/// A secret key which has not yet been expanded.
///
/// Must be either 128, 192, or 256 bits long.
#[derive(Clone, Copy)]
pub enum Key<'a> {
    /// A 128-bit key.
    Aes128(&'a [u8; 16]),

    /// A 192-bit key.
    Aes192(&'a [u8; 24]),

    /// A 256-bit key.
    Aes256(&'a [u8; 32]),
}

impl<'a> Key<'a> {
    /// Creates a `Key` from a byte slice.
    ///
    /// The slice must be either 16, 24, or 32 bytes long.
    pub fn from_bytes(key: &'a [u8]) -> Result<Self, InvalidKeyLength> {
        let invalid = InvalidKeyLength(key.len());

        let key = match key.len() {
            16 => Key::Aes128(slice_as_array_ref!(key, 16).map_err(|()| invalid)?),
            24 => Key::Aes192(slice_as_array_ref!(key, 24).map_err(|()| invalid)?),
            32 => Key::Aes256(slice_as_array_ref!(key, 32).map_err(|()| invalid)?),

            _ => return Err(invalid),
        };

        Ok(key)
    }

    /// Returns the length of this key in bits.
    pub fn bits(&self) -> usize {
        8 * self.as_slice().len()
    }

    /// A byte slice containing the key material.
    pub fn as_slice(&self) -> &'a [u8] {
        match *self {
            Key::Aes128(a) => &a[..],
            Key::Aes192(a) => &a[..],
            Key::Aes256(a) => &a[..],
        }
    }
}

// Key material stays out of logs.
impl core::fmt::Debug for Key<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Key::Aes{}(..)", self.bits())
    }
}
