//! Deterministic nonces (RFC 6979, section 3.2) with HMAC-SHA256.

use crate::field::Scalar;
use crate::keys::PrivateKey;
use crypto_utils::hmac::{hmac_sha256, hmac_sha256_parts};
use num_bigint::BigUint;

/// Derives the signing nonce `k` for `digest` under `key`.
///
/// The result is always in `[1, N-1]`.
pub fn generate_k(key: &PrivateKey, digest: &[u8; 32]) -> Scalar {
    let x = key.to_bytes();
    // bits2octets: the digest reduced mod N, as 32 bytes.
    let h1 = Scalar::from_be_bytes(digest).to_be_bytes();

    let mut v = [0x01u8; 32];
    let mut k = [0x00u8; 32];

    k = hmac_sha256_parts(&k, &[&v, &[0x00], &x, &h1]);
    v = hmac_sha256(&k, &v);
    k = hmac_sha256_parts(&k, &[&v, &[0x01], &x, &h1]);
    v = hmac_sha256(&k, &v);

    loop {
        v = hmac_sha256(&k, &v);
        // Out-of-range candidates are discarded, never reduced.
        if let Some(nonce) = Scalar::from_canonical(BigUint::from_bytes_be(&v)) {
            if !nonce.is_zero() {
                return nonce;
            }
        }
        k = hmac_sha256_parts(&k, &[&v, &[0x00]]);
        v = hmac_sha256(&k, &v);
    }
}
