use rand::rand_core;
use thiserror::Error;

/// XTS Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// XTS Error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Data cipher and tweak cipher report different algorithms. The engine refuses to
    /// construct, because mismatched primitives would desynchronize tweak generation
    /// from payload processing.
    #[error("cipher algorithm mismatch: data cipher is {data}, tweak cipher is {tweak}")]
    AlgorithmMismatch { data: String, tweak: String },

    /// A buffer handed to the engine failed a length precondition. Raised before any
    /// output byte is written.
    #[error("invalid length: {len} bytes ({context})")]
    InvalidLength { len: usize, context: &'static str },

    /// Attempted to build an AES primitive with a key that is not 128 or 256 bits.
    #[error("invalid key length: {len} bytes (expected 16 or 32)")]
    InvalidKeyLength { len: usize },

    /// Provided a hex string that could not be decoded.
    #[error("invalid hex string ({context})")]
    InvalidHex { context: &'static str },

    /// OS RNG failed during random key generation.
    #[error("OS RNG failed in random key generation")]
    Rng(#[from] rand_core::OsError),
}
