use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray};
use aes::{Aes128, Aes256};
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::xts_lib::error::{Error, Result};

/// A block-cipher primitive with its key and direction fixed at construction.
///
/// This is the only capability the XTS engine consumes: it never sees key material and
/// never chooses a direction. Implementations take `&mut self` because real primitives
/// commonly hold mutable scratch state.
pub trait BlockCipher {
    /// Name of the algorithm, e.g. `"AES-256"`. The engine compares these at
    /// construction to reject mismatched cipher pairs.
    fn algorithm_name(&self) -> &str;

    /// Fixed block size in bytes.
    fn block_size(&self) -> usize;

    /// Transform exactly one block in place, encrypting or decrypting according to the
    /// direction fixed when the primitive was built. `block` must be exactly
    /// [`block_size`](Self::block_size) bytes.
    fn process_block(&mut self, block: &mut [u8]);
}

/// Whether a primitive encrypts or decrypts. Fixed at construction, like the
/// `forEncryption` flag of a classic block-cipher engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

enum AesKernel {
    Aes128(Aes128),
    Aes256(Aes256),
}

/// AES primitive implementing [`BlockCipher`], backed by the `aes` crate.
///
/// Key length selects the variant: 16 bytes gives AES-128, 32 bytes AES-256 (the two
/// variants XTS is defined for in IEEE 1619).
pub struct AesBlockCipher {
    kernel: AesKernel,
    direction: Direction,
}

impl AesBlockCipher {
    pub fn new(key: &[u8], direction: Direction) -> Result<Self> {
        let kernel = match key.len() {
            16 => AesKernel::Aes128(Aes128::new(GenericArray::from_slice(key))),
            32 => AesKernel::Aes256(Aes256::new(GenericArray::from_slice(key))),
            len => return Err(Error::InvalidKeyLength { len }),
        };
        Ok(Self { kernel, direction })
    }

    /// Getter for the direction this primitive was built with.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl BlockCipher for AesBlockCipher {
    fn algorithm_name(&self) -> &str {
        match self.kernel {
            AesKernel::Aes128(_) => "AES-128",
            AesKernel::Aes256(_) => "AES-256",
        }
    }

    fn block_size(&self) -> usize {
        16
    }

    fn process_block(&mut self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match (&self.kernel, self.direction) {
            (AesKernel::Aes128(aes), Direction::Encrypt) => aes.encrypt_block(block),
            (AesKernel::Aes128(aes), Direction::Decrypt) => aes.decrypt_block(block),
            (AesKernel::Aes256(aes), Direction::Encrypt) => aes.encrypt_block(block),
            (AesKernel::Aes256(aes), Direction::Decrypt) => aes.decrypt_block(block),
        }
    }
}

/// Generates a random XTS key: data key and tweak key concatenated, each of
/// `key_len` bytes (16 or 32).
pub fn random_xts_key(key_len: usize) -> Result<Vec<u8>> {
    if key_len != 16 && key_len != 32 {
        return Err(Error::InvalidKeyLength { len: key_len });
    }
    let mut key = vec![0u8; key_len * 2];
    OsRng.try_fill_bytes(&mut key)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_key_lengths() {
        for len in [0, 15, 17, 24, 33] {
            let result = AesBlockCipher::new(&vec![0u8; len], Direction::Encrypt);
            assert!(matches!(result, Err(Error::InvalidKeyLength { len: l }) if l == len));
        }
    }

    #[test]
    fn algorithm_names_follow_key_length() -> Result<()> {
        let aes128 = AesBlockCipher::new(&[0u8; 16], Direction::Encrypt)?;
        let aes256 = AesBlockCipher::new(&[0u8; 32], Direction::Encrypt)?;
        assert_eq!("AES-128", aes128.algorithm_name());
        assert_eq!("AES-256", aes256.algorithm_name());
        assert_eq!(16, aes128.block_size());
        assert_eq!(16, aes256.block_size());
        Ok(())
    }

    #[test]
    fn decrypt_inverts_encrypt() -> Result<()> {
        let key = random_xts_key(32)?;
        let mut enc = AesBlockCipher::new(&key[..32], Direction::Encrypt)?;
        let mut dec = AesBlockCipher::new(&key[..32], Direction::Decrypt)?;

        let original: [u8; 16] = *b"sixteen byte msg";
        let mut block = original;
        enc.process_block(&mut block);
        assert_ne!(original, block);
        dec.process_block(&mut block);
        assert_eq!(original, block);
        Ok(())
    }

    #[test]
    fn random_key_has_requested_length() -> Result<()> {
        assert_eq!(32, random_xts_key(16)?.len());
        assert_eq!(64, random_xts_key(32)?.len());
        assert!(matches!(
            random_xts_key(24),
            Err(Error::InvalidKeyLength { len: 24 })
        ));
        Ok(())
    }
}
