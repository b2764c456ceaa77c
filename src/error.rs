//! Errors returned by the CBC mode.
//!
//! A caller mistake and a damaged ciphertext need different remedies, so they are kept apart.
//! Corruption is deliberately opaque: whether the length, the pad value, or the pad contents
//! were wrong is never reported, since that distinction is exactly what a padding oracle needs.

use thiserror::Error;

/// A parameter the mode does not support. Detected before any block is processed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// CBC cannot authenticate associated data, so only an empty `adata` is accepted.
    #[error("authenticated data not supported")]
    AdataUnsupported,

    /// The IV was not exactly one block long.
    #[error("invalid IV length: {bits} bits")]
    InvalidIvLength { bits: usize },

    /// The plaintext did not end on a byte boundary.
    #[error("not byte-aligned: {bits} bits")]
    NotByteAligned { bits: usize },
}

/// An error from [`cbc::encrypt`](crate::cbc::encrypt) or [`cbc::decrypt`](crate::cbc::decrypt).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The ciphertext is malformed or its padding is invalid.
    #[error("ciphertext corrupt")]
    Corrupt,
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::Corrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::from(ConfigError::AdataUnsupported).to_string(),
            "authenticated data not supported",
        );
        assert_eq!(
            Error::from(ConfigError::InvalidIvLength { bits: 96 }).to_string(),
            "invalid IV length: 96 bits",
        );
        assert_eq!(
            Error::from(ConfigError::NotByteAligned { bits: 12 }).to_string(),
            "not byte-aligned: 12 bits",
        );
        assert_eq!(Error::Corrupt.to_string(), "ciphertext corrupt");
    }

    #[test]
    fn classes() {
        let config = Error::from(ConfigError::AdataUnsupported);
        assert!(config.is_config());
        assert!(!config.is_corrupt());

        assert!(Error::Corrupt.is_corrupt());
        assert!(!Error::Corrupt.is_config());
    }
}
