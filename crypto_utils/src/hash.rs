use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Two rounds of SHA-256, as used by Base58Check checksums and message digests.
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn sha512(input: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(input);
    hasher.finalize().into()
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// RIPEMD160(SHA256(input)): key identifiers and address payloads.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}
