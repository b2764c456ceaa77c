//! Operations on the 16-byte AES block.

use core::fmt;

use try_from::TryFrom;

/// The number of bytes in an AES block.
pub const BLOCK_LEN: usize = 16;

type BlockArray = [u8; BLOCK_LEN];

/// A byte array with the same length as an AES block.
///
/// Bytes are stored in the order they appear in the plaintext or ciphertext stream.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Block(pub BlockArray);

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl TryFrom<&[u8]> for Block {
    type Err = ();

    fn try_from(s: &[u8]) -> Result<Self, Self::Err> {
        slice_as_array_ref!(s, BLOCK_LEN)
            .map(|&b| Block(b))
    }
}

impl From<BlockArray> for Block {
    fn from(arr: BlockArray) -> Self {
        Block(arr)
    }
}

impl From<Block> for BlockArray {
    fn from(block: Block) -> Self {
        block.0
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl AsMut<[u8]> for Block {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0[..]
    }
}
