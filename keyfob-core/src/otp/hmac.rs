//! HMAC-SHA1 following RFC 2104
//!
//! HOTP (RFC 4226) is defined over the raw 20-byte HMAC-SHA1 digest, so
//! this module returns the full digest rather than a detached tag type.
//!
//! Reference: https://www.ietf.org/rfc/rfc2104.txt
//! Block size: 64 bytes for SHA-1
//! Inner pad (ipad): 0x36
//! Outer pad (opad): 0x5C

use sha1::{Digest, Sha1};

const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Compute HMAC-SHA1 over `message` with `key`
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; 20] {
    let block = key_block(key);

    let mut ipad_key = [0u8; BLOCK_SIZE];
    let mut opad_key = [0u8; BLOCK_SIZE];
    for i in 0..BLOCK_SIZE {
        ipad_key[i] = block[i] ^ IPAD;
        opad_key[i] = block[i] ^ OPAD;
    }

    let inner = Sha1::new()
        .chain_update(ipad_key)
        .chain_update(message)
        .finalize();

    let outer = Sha1::new()
        .chain_update(opad_key)
        .chain_update(inner)
        .finalize();

    outer.into()
}

/// Prepare the key at exactly one block width
///
/// Keys longer than the block size are replaced by their SHA-1 digest;
/// shorter keys are zero-padded on the right.
fn key_block(key: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];

    if key.len() > BLOCK_SIZE {
        let digest = Sha1::digest(key);
        block[..digest.len()].copy_from_slice(&digest);
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    block
}
