mod args;

use args::{Cli, Commands};
use clap::Parser;

use std::fs;
use std::time::Instant;

use thiserror::Error;

use xtsmode::{
    AesBlockCipher, DATA_UNIT_SIZE, Direction, Xts, decode_hex, encode_hex, random_xts_key,
};

// IEEE 1619 test vector 10 (XTS-AES-256, data unit 0xff).
const VECTOR_10_DATA_KEY: &str =
    "2718281828459045235360287471352662497757247093699959574966967627";
const VECTOR_10_TWEAK_KEY: &str =
    "3141592653589793238462643383279502884197169399375105820974944592";
const VECTOR_10_DATA_UNIT: &str = "00000000000000ff";
const VECTOR_10_PLAINTEXT: &str = "\
    000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
    202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f\
    404142434445464748494a4b4c4d4e4f505152535455565758595a5b5c5d5e5f\
    606162636465666768696a6b6c6d6e6f707172737475767778797a7b7c7d7e7f\
    808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f\
    a0a1a2a3a4a5a6a7a8a9aaabacadaeafb0b1b2b3b4b5b6b7b8b9babbbcbdbebf\
    c0c1c2c3c4c5c6c7c8c9cacbcccdcecfd0d1d2d3d4d5d6d7d8d9dadbdcdddedf\
    e0e1e2e3e4e5e6e7e8e9eaebecedeeeff0f1f2f3f4f5f6f7f8f9fafbfcfdfeff\
    000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\
    202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f\
    404142434445464748494a4b4c4d4e4f505152535455565758595a5b5c5d5e5f\
    606162636465666768696a6b6c6d6e6f707172737475767778797a7b7c7d7e7f\
    808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f\
    a0a1a2a3a4a5a6a7a8a9aaabacadaeafb0b1b2b3b4b5b6b7b8b9babbbcbdbebf\
    c0c1c2c3c4c5c6c7c8c9cacbcccdcecfd0d1d2d3d4d5d6d7d8d9dadbdcdddedf\
    e0e1e2e3e4e5e6e7e8e9eaebecedeeeff0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
const VECTOR_10_CIPHERTEXT: &str = "\
    1c3b3a102f770386e4836c99e370cf9bea00803f5e482357a4ae12d414a3e63b\
    5d31e276f8fe4a8d66b317f9ac683f44680a86ac35adfc3345befecb4bb188fd\
    5776926c49a3095eb108fd1098baec70aaa66999a72a82f27d848b21d4a741b0\
    c5cd4d5fff9dac89aeba122961d03a757123e9870f8acf1000020887891429ca\
    2a3e7a7d7df7b10355165c8b9a6d0a7de8b062c4500dc4cd120c0f7418dae3d0\
    b5781c34803fa75421c790dfe1de1834f280d7667b327f6c8cd7557e12ac3a0f\
    93ec05c52e0493ef31a12d3d9260f79a289d6a379bc70c50841473d1a8cc81ec\
    583e9645e07b8d9670655ba5bbcfecc6dc3966380ad8fecb17b6ba02469a020a\
    84e18e8f84252070c13e9f1f289be54fbc481457778f616015e1327a02b140f1\
    505eb309326d68378f8374595c849d84f4c333ec4423885143cb47bd71c5edae\
    9be69a2ffeceb1bec9de244fbe15992b11b77c040f12bd8f6a975a44a0f90c29\
    a9abc3d4d893927284c58754cce294529f8614dcd2aba991925fedc4ae74ffac\
    6e333b93eb4aff0479da9a410e4450e0dd7ae4c6e2910900575da401fc07059f\
    645e8b7e9bfdef33943054ff84011493c27b3429eaedb4ed5376441a77ed4385\
    1ad77f16f541dfd269d50d6a5f14fb0aab1cbb4c1550be97f7ab4066193c4caa\
    773dad38014bd2092fa755c824bb5e54c4f36ffda9fcea70b9c6e693e148c151";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("input length {0} is not a multiple of the 512-byte data unit (no ciphertext stealing)")]
    UnalignedInput(usize),

    #[error("key file must hold data key then tweak key (32 or 64 bytes), got {0} bytes")]
    BadKeyFile(usize),

    #[error("IEEE 1619 self-test failed")]
    SelftestFailed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Xts(#[from] xtsmode::Error),
}

fn main() {
    if let Err(e) = xts_cli() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn xts_cli() -> Result<(), CliError> {
    let args = Cli::parse();

    match args.command {
        Commands::Encrypt(enc) => {
            let input_path = enc.common.input; // move ownership
            let output_path = enc.common.output;
            let key_path = enc.common.key;

            // read plaintext from input_path
            let plaintext = fs::read(input_path)?;

            // read or generate key
            let key = if enc.gen_key {
                let rand_key = match enc.key_size {
                    args::KeySize::Bits128 => random_xts_key(16)?,
                    args::KeySize::Bits256 => random_xts_key(32)?,
                };
                fs::write(key_path, &rand_key)?;
                rand_key
            } else {
                // read key from key_path
                fs::read(key_path)?
            };

            let start = Instant::now();
            let ciphertext =
                process_sectors(&plaintext, &key, Direction::Encrypt, enc.common.sector)?;
            let duration = start.elapsed();

            fs::write(output_path, &ciphertext)?;
            println!(
                "Encrypted {} bytes in {} ms",
                plaintext.len(),
                duration.as_millis()
            );
            Ok(())
        }
        Commands::Decrypt(common) => {
            let ciphertext = fs::read(common.input)?;
            let key = fs::read(common.key)?;

            let start = Instant::now();
            let plaintext = process_sectors(&ciphertext, &key, Direction::Decrypt, common.sector)?;
            let duration = start.elapsed();

            fs::write(common.output, &plaintext)?;
            println!(
                "Decrypted {} bytes in {} ms",
                plaintext.len(),
                duration.as_millis()
            );
            Ok(())
        }
        Commands::Selftest => selftest(),
    }
}

/// Runs every full data unit of `data` through one XTS engine, with data-unit numbers
/// counting up from `start_sector`.
fn process_sectors(
    data: &[u8],
    key: &[u8],
    direction: Direction,
    start_sector: u64,
) -> Result<Vec<u8>, CliError> {
    if data.len() % DATA_UNIT_SIZE != 0 {
        return Err(CliError::UnalignedInput(data.len()));
    }
    if key.len() != 32 && key.len() != 64 {
        return Err(CliError::BadKeyFile(key.len()));
    }

    let (data_key, tweak_key) = key.split_at(key.len() / 2);
    let cipher = AesBlockCipher::new(data_key, direction)?;
    // The tweak cipher always encrypts, regardless of payload direction.
    let tweak_cipher = AesBlockCipher::new(tweak_key, Direction::Encrypt)?;
    let mut xts = Xts::new(cipher, tweak_cipher)?;

    let mut out = vec![0u8; data.len()];
    for (i, (sector_in, sector_out)) in data
        .chunks_exact(DATA_UNIT_SIZE)
        .zip(out.chunks_exact_mut(DATA_UNIT_SIZE))
        .enumerate()
    {
        xts.process_data_unit(sector_in, sector_out, start_sector + i as u64)?;
    }

    Ok(out)
}

/// Feeds IEEE 1619 test vector 10 through the engine: one encrypt, a cipher swap, one
/// decrypt, and a textual pass/fail for each direction.
fn selftest() -> Result<(), CliError> {
    let data_key = decode_hex(VECTOR_10_DATA_KEY)?;
    let tweak_key = decode_hex(VECTOR_10_TWEAK_KEY)?;
    let plaintext = decode_hex(VECTOR_10_PLAINTEXT)?;
    let ciphertext = decode_hex(VECTOR_10_CIPHERTEXT)?;

    let data_unit_bytes = decode_hex(VECTOR_10_DATA_UNIT)?;
    let data_unit_number = u64::from_be_bytes(
        data_unit_bytes
            .as_slice()
            .try_into()
            .expect("data-unit constant is 8 bytes"),
    );

    println!("====================================================");
    println!("IEEE 1619 test vector 10");
    println!("Key:              {VECTOR_10_DATA_KEY}");
    println!("Tweak key:        {VECTOR_10_TWEAK_KEY}");
    println!("Data unit number: {data_unit_number}");
    println!("====================================================");

    let cipher = AesBlockCipher::new(&data_key, Direction::Encrypt)?;
    let tweak_cipher = AesBlockCipher::new(&tweak_key, Direction::Encrypt)?;
    let mut xts = Xts::new(cipher, tweak_cipher)?;

    // Encrypt
    let mut created_ciphertext = vec![0u8; xts.data_unit_size()];
    xts.process_data_unit(&plaintext, &mut created_ciphertext, data_unit_number)?;

    println!("Ciphertext:       {}", encode_hex(&created_ciphertext));
    let encrypt_ok = created_ciphertext == ciphertext;
    if encrypt_ok {
        println!("Ciphertext matches IEEE 1619 test vector 10");
    } else {
        println!("Ciphertext does not match IEEE 1619 test vector 10");
    }

    // Decrypt
    xts.reset_cipher(AesBlockCipher::new(&data_key, Direction::Decrypt)?);
    let mut decrypted_plaintext = vec![0u8; xts.data_unit_size()];
    xts.process_data_unit(&ciphertext, &mut decrypted_plaintext, data_unit_number)?;

    println!("Plaintext:        {}", encode_hex(&decrypted_plaintext));
    let decrypt_ok = decrypted_plaintext == plaintext;
    if decrypt_ok {
        println!("Plaintext matches IEEE 1619 test vector 10");
    } else {
        println!("Plaintext does not match IEEE 1619 test vector 10");
    }

    if encrypt_ok && decrypt_ok {
        Ok(())
    } else {
        Err(CliError::SelftestFailed)
    }
}
