//! Mainnet address encodings of a compressed public key.

use crate::WalletError;
use crypto_utils::base58::base58_check_encode_with_prefix;
use crypto_utils::hash::hash160;
use crypto_utils::segwit::segwit_encode;
use ecc::PublicKey;

pub const P2PKH_PREFIX: u8 = 0x00;
pub const P2SH_PREFIX: u8 = 0x05;
pub const SEGWIT_HRP: &str = "bc";

/// Legacy `1...` address: Base58Check(`0x00 ‖ HASH160(pub)`).
pub fn p2pkh_address(public_key: &PublicKey) -> String {
    base58_check_encode_with_prefix(P2PKH_PREFIX, &public_key.hash160())
}

/// BIP-49 `3...` address: P2SH of the witness script `0x00 0x14 ‖ HASH160(pub)`.
pub fn p2sh_p2wpkh_address(public_key: &PublicKey) -> String {
    let mut redeem_script = Vec::with_capacity(22);
    redeem_script.extend_from_slice(&[0x00, 0x14]);
    redeem_script.extend_from_slice(&public_key.hash160());
    base58_check_encode_with_prefix(P2SH_PREFIX, &hash160(&redeem_script))
}

/// BIP-84 `bc1q...` address: witness v0 program `HASH160(pub)`.
pub fn p2wpkh_address(public_key: &PublicKey) -> Result<String, WalletError> {
    Ok(segwit_encode(SEGWIT_HRP, 0, &public_key.hash160())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn generator_key() -> PublicKey {
        PublicKey::from_bytes(&hex!(
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        ))
        .unwrap()
    }

    #[test]
    fn encodings_of_generator_point() {
        let key = generator_key();
        assert_eq!(p2pkh_address(&key), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(
            p2wpkh_address(&key).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
        assert!(p2sh_p2wpkh_address(&key).starts_with('3'));
    }
}
