use crate::xts_lib::error::{Error, Result};

/// Lowercase hex encoding of a byte buffer.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Decodes a hex string into bytes. Whitespace is ignored; the digit count must be even.
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let hex: String = s.chars().filter(|c| !c.is_whitespace()).collect();

    if hex.len() % 2 == 1 {
        return Err(Error::InvalidHex {
            context: "odd number of hex digits",
        });
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidHex {
                context: "non-hexadecimal character",
            })
        })
        .collect()
}
