mod cipher;
mod error;
mod mode;
mod util;

pub use cipher::{AesBlockCipher, BlockCipher, Direction, random_xts_key};
pub use error::{Error, Result};
pub use mode::{DATA_UNIT_SIZE, Xts};
pub use util::{decode_hex, encode_hex};
