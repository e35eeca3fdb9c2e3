use crate::xts_lib::cipher::BlockCipher;
use crate::xts_lib::error::{Error, Result};

/// Default size of an XTS data unit in bytes: one 512-byte storage sector.
pub const DATA_UNIT_SIZE: usize = 512;

// Size of a 64 bit integer in bytes
const SIZE_OF_U64: usize = 8;

/// Feedback constant of the GF(2^128) reduction, from the primitive polynomial
/// x^128 + x^7 + x^2 + x + 1.
const GF_128_FEEDBACK: u64 = 0x87;

/// XTS mode engine (IEEE 1619): encrypts or decrypts whole data units so that identical
/// plaintext blocks in different sectors produce different ciphertext, without storing
/// any extra metadata.
///
/// The engine composes two externally keyed [`BlockCipher`] primitives: a *data cipher*
/// whose direction decides whether [`process_data_unit`](Xts::process_data_unit)
/// encrypts or decrypts, and a *tweak cipher* that is fixed for the engine's lifetime.
/// The tweak cipher always runs in its encrypt direction: the tweak is a deterministic
/// pseudorandom function of the sector index, independent of payload direction, so
/// callers must build it for encryption even when decrypting payload.
///
/// XTS is defined for 128-bit block ciphers; the tweak arithmetic operates on one
/// 16-byte block.
///
/// Not safe for concurrent use of a single instance: the data cipher is replaceable via
/// [`reset_cipher`](Xts::reset_cipher) and primitives may hold mutable scratch state,
/// which is why both operations take `&mut self`.
pub struct Xts<C: BlockCipher> {
    cipher: C,
    tweak_cipher: C,
    block_size: usize,
    data_unit_size: usize,
}

impl<C: BlockCipher> Xts<C> {
    /// Creates an engine over a 512-byte data unit.
    ///
    /// Fails with [`Error::AlgorithmMismatch`] if the two primitives report different
    /// algorithm names. This is the engine's only construction check; it exists to catch
    /// mismatched block sizes that would desynchronize tweak generation from payload
    /// processing. On success the engine's block size is taken from the data cipher.
    pub fn new(cipher: C, tweak_cipher: C) -> Result<Self> {
        Self::with_data_unit_size(cipher, tweak_cipher, DATA_UNIT_SIZE)
    }

    /// Creates an engine over a custom data-unit size, which must be a nonzero multiple
    /// of the cipher's block size.
    pub fn with_data_unit_size(cipher: C, tweak_cipher: C, data_unit_size: usize) -> Result<Self> {
        if cipher.algorithm_name() != tweak_cipher.algorithm_name() {
            return Err(Error::AlgorithmMismatch {
                data: cipher.algorithm_name().to_string(),
                tweak: tweak_cipher.algorithm_name().to_string(),
            });
        }

        let block_size = cipher.block_size();
        if data_unit_size == 0 || data_unit_size % block_size != 0 {
            return Err(Error::InvalidLength {
                len: data_unit_size,
                context: "data-unit size must be a nonzero multiple of the cipher block size",
            });
        }

        Ok(Self {
            cipher,
            tweak_cipher,
            block_size,
            data_unit_size,
        })
    }

    /// Name of the underlying cipher.
    pub fn algorithm_name(&self) -> &str {
        self.cipher.algorithm_name()
    }

    /// Block size of the underlying cipher, which is equal to the XTS block size.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Size of one data unit in bytes.
    pub fn data_unit_size(&self) -> usize {
        self.data_unit_size
    }

    /// Replaces the data cipher, e.g. to flip between encryption and decryption,
    /// without touching the tweak cipher or reconstructing the engine.
    ///
    /// The replacement must report the same algorithm name and block size as the
    /// original; the engine does not re-validate this, so a mismatched swap is a latent
    /// caller error.
    pub fn reset_cipher(&mut self, cipher: C) {
        self.cipher = cipher;
    }

    /// Encrypts or decrypts one data unit, according to the direction the data cipher
    /// was built with.
    ///
    /// `data_unit_number` is the 64-bit sector index of this data unit on the storage
    /// device. Exactly [`data_unit_size`](Xts::data_unit_size) bytes are read from
    /// `input` and written to `output`; longer buffers are allowed and left untouched
    /// past that point. The input buffer is never mutated.
    ///
    /// All length preconditions are checked before any output byte is written, so a
    /// failed call leaves `output` exactly as it was:
    /// - `input.len()` must be a multiple of the block size,
    /// - `input` and `output` must each hold at least one data unit.
    ///
    /// Returns the number of bytes processed, always one data unit on success.
    pub fn process_data_unit(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        data_unit_number: u64,
    ) -> Result<usize> {
        if input.len() % self.block_size != 0 {
            return Err(Error::InvalidLength {
                len: input.len(),
                context: "input is not a multiple of the cipher block size",
            });
        }
        if input.len() < self.data_unit_size {
            return Err(Error::InvalidLength {
                len: input.len(),
                context: "input is shorter than one data unit",
            });
        }
        if output.len() < self.data_unit_size {
            return Err(Error::InvalidLength {
                len: output.len(),
                context: "output is shorter than one data unit",
            });
        }

        let mut tweak = self.derive_tweak(data_unit_number);
        for (input_block, output_block) in input[..self.data_unit_size]
            .chunks_exact(self.block_size)
            .zip(output[..self.data_unit_size].chunks_exact_mut(self.block_size))
        {
            self.process_block(input_block, output_block, &tweak);
            multiply_tweak_by_alpha(&mut tweak);
        }

        Ok(self.data_unit_size)
    }

    /// Produces the initial tweak for a data unit: the sector index stored little-endian
    /// into the first 8 bytes of a zeroed block, passed once through the tweak cipher.
    fn derive_tweak(&mut self, data_unit_number: u64) -> Vec<u8> {
        let mut tweak = vec![0u8; self.block_size];
        tweak[..SIZE_OF_U64].copy_from_slice(&data_unit_number.to_le_bytes());
        self.tweak_cipher.process_block(&mut tweak);
        tweak
    }

    /// XEX transform of a single block. Copy-first contract: the XOR with the tweak
    /// happens while merging the input into the output slice, so the input is never
    /// mutated.
    fn process_block(&mut self, input: &[u8], output: &mut [u8], tweak: &[u8]) {
        // PP <- P ^ T
        for ((out, &plain), &t) in output.iter_mut().zip(input).zip(tweak) {
            *out = plain ^ t;
        }

        // CC <- enc(Key1, PP), or PP <- dec(Key1, CC) when the data cipher decrypts
        self.cipher.process_block(output);

        // C <- CC ^ T
        for (out, &t) in output.iter_mut().zip(tweak) {
            *out ^= t;
        }
    }
}

/// Advances the tweak for the next block: tweak <- tweak * alpha in GF(2^128), modulo
/// x^128 + x^7 + x^2 + x + 1.
///
/// The tweak is viewed as two little-endian 64-bit half-words. The combined 128-bit
/// value is shifted left one bit, and a carry out of the high word folds the feedback
/// constant back into the low word.
fn multiply_tweak_by_alpha(tweak: &mut [u8]) {
    // The tweak is always one 128-bit block, so these conversions cannot fail.
    let mut lo = u64::from_le_bytes(tweak[..SIZE_OF_U64].try_into().unwrap());
    let mut hi = u64::from_le_bytes(tweak[SIZE_OF_U64..2 * SIZE_OF_U64].try_into().unwrap());

    let carry = hi >> 63;
    hi = (hi << 1) | (lo >> 63);
    lo <<= 1;
    if carry != 0 {
        lo ^= GF_128_FEEDBACK;
    }

    tweak[..SIZE_OF_U64].copy_from_slice(&lo.to_le_bytes());
    tweak[SIZE_OF_U64..2 * SIZE_OF_U64].copy_from_slice(&hi.to_le_bytes());
}
