//! Types shared by block cipher implementations, and the AES implementation used by default.
//!
//! This includes keys and raw AES blocks.

pub mod block;
pub mod key;
pub mod openssl;

pub use self::block::{Block, BLOCK_LEN};
pub use self::key::{InvalidKeyLength, Key};
