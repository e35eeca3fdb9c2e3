mod xts_lib;

pub use xts_lib::{
    AesBlockCipher, BlockCipher, DATA_UNIT_SIZE, Direction, Error, Result, Xts, decode_hex,
    encode_hex, random_xts_key,
};
