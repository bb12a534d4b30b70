use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha512 = Hmac<Sha512>;
type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA512, the BIP32 key/chain-code generator.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// HMAC-SHA256, used by the RFC 6979 nonce generator.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// HMAC-SHA256 over several slices without concatenating them first.
pub fn hmac_sha256_parts(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    /// RFC 4231 test case 2
    #[test]
    fn hmac_sha512_rfc4231_jefe() {
        let expected = hex!(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
        assert_eq!(hmac_sha512(b"Jefe", b"what do ya want for nothing?"), expected);
    }

    /// RFC 4231 test case 1
    #[test]
    fn hmac_sha256_rfc4231_hi_there() {
        let key = [0x0b; 20];
        let expected = hex!("b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7");
        assert_eq!(hmac_sha256(&key, b"Hi There"), expected);
    }

    #[test]
    fn parts_match_concatenation() {
        let key = b"chain code";
        let joined = hmac_sha256(key, b"\x00abc\x01");
        let parts = hmac_sha256_parts(key, &[b"\x00", b"abc", b"\x01"]);
        assert_eq!(joined, parts);
    }
}
