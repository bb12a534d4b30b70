use crate::curve::{Curve, Point};
use crate::error::EccError;
use crate::field::{Fe, Scalar};
use crypto_utils::base58::{base58_check_decode, base58_check_encode_with_prefix};
use crypto_utils::hash::hash160;
use num_bigint::BigUint;
use std::fmt;

/// Mainnet WIF version byte.
pub const WIF_PREFIX: u8 = 0x80;
/// Trailing WIF byte marking a compressed public key.
pub const WIF_COMPRESSED_SUFFIX: u8 = 0x01;
const WIF_PAYLOAD_LEN: usize = 34;

pub const PUBLIC_KEY_LEN: usize = 33;
const EVEN_HEADER: u8 = 0x02;
const ODD_HEADER: u8 = 0x03;

/// A secp256k1 secret scalar in `[1, N-1]`.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    scalar: Scalar,
}

impl PrivateKey {
    pub fn from_scalar(scalar: Scalar) -> Result<Self, EccError> {
        if scalar.is_zero() {
            return Err(EccError::InvalidPrivateKey);
        }
        Ok(PrivateKey { scalar })
    }

    /// Parses a 32-byte big-endian scalar without reducing it.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, EccError> {
        if bytes.len() != 32 {
            return Err(EccError::InvalidPrivateKey);
        }
        let scalar = Scalar::from_canonical(BigUint::from_bytes_be(bytes))
            .ok_or(EccError::InvalidPrivateKey)?;
        Self::from_scalar(scalar)
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.scalar.to_be_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        let curve = Curve::secp256k1();
        PublicKey::from_point(curve.generator_scalar_mult(self.scalar.value()))
    }

    /// Wallet Import Format for a compressed key: Base58Check(`0x80 ‖ key ‖ 0x01`).
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(33);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(WIF_COMPRESSED_SUFFIX);
        base58_check_encode_with_prefix(WIF_PREFIX, &payload)
    }

    pub fn from_wif(wif: &str) -> Result<Self, EccError> {
        let payload = base58_check_decode(wif)?;
        if payload.len() != WIF_PAYLOAD_LEN {
            return Err(EccError::InvalidWifLength(payload.len()));
        }
        if payload[0] != WIF_PREFIX {
            return Err(EccError::InvalidWifHeader(payload[0]));
        }
        let suffix = payload[WIF_PAYLOAD_LEN - 1];
        if suffix != WIF_COMPRESSED_SUFFIX {
            return Err(EccError::InvalidWifFormat(suffix));
        }
        Self::from_be_bytes(&payload[1..33])
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A secp256k1 public point.
///
/// `from_point` does not validate; `Ecdsa::verify_digest` reports an
/// off-curve or infinite key as a verification failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    pub fn from_point(point: Point) -> Self {
        PublicKey { point }
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn is_infinity(&self) -> bool {
        self.point.is_infinity()
    }

    /// SEC1 compressed encoding. The point at infinity has no encoding and
    /// comes out as 33 zero bytes.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let mut out = [0u8; PUBLIC_KEY_LEN];
        if let Point::Affine { x, y } = &self.point {
            out[0] = if y.is_even() { EVEN_HEADER } else { ODD_HEADER };
            out[1..].copy_from_slice(&x.to_be_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EccError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(EccError::InvalidPublicKeyLength(bytes.len()));
        }
        let want_even = match bytes[0] {
            EVEN_HEADER => true,
            ODD_HEADER => false,
            other => return Err(EccError::InvalidPublicKeyHeader(other)),
        };
        let x = Fe::from_canonical(BigUint::from_bytes_be(&bytes[1..]))
            .ok_or(EccError::PointNotOnCurve)?;
        let curve = Curve::secp256k1();
        let y = curve.calculate_y_from_x(&x, want_even)?;
        Ok(PublicKey::from_point(curve.point(x, y)?))
    }

    /// `RIPEMD160(SHA256(compressed))`, the payload of P2PKH and P2WPKH.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::N;
    use hex_literal::hex;

    #[test]
    fn keypair_vector() {
        let key = PrivateKey::from_be_bytes(&hex!(
            "0c34cf6a7d24367baa81ef8331c8cb7ffafc0978ff6cf9e5d873de96142bdb86"
        ))
        .unwrap();
        assert_eq!(
            key.public_key().to_string(),
            "023068765c2ab75bcfcbd5ae3ccefbdd25b94f414ab0a58c67a780fd437e35c81e"
        );
    }

    #[test]
    fn public_keys_agree_with_libsecp256k1() {
        let secp = secp256k1::Secp256k1::new();
        for seed in [1u8, 2, 0x7f, 0xfe] {
            let bytes = [seed; 32];
            let ours = PrivateKey::from_be_bytes(&bytes).unwrap().public_key();
            let sk = secp256k1::SecretKey::from_slice(&bytes).unwrap();
            let theirs = secp256k1::PublicKey::from_secret_key(&secp, &sk);
            assert_eq!(ours.to_bytes(), theirs.serialize(), "secret {seed:#04x} x 32");
        }
    }

    #[test]
    fn private_key_range() {
        assert_eq!(
            PrivateKey::from_be_bytes(&[0u8; 32]),
            Err(EccError::InvalidPrivateKey)
        );
        let n = N.to_bytes_be();
        assert_eq!(PrivateKey::from_be_bytes(&n), Err(EccError::InvalidPrivateKey));
        assert_eq!(
            PrivateKey::from_be_bytes(&[1u8; 31]),
            Err(EccError::InvalidPrivateKey)
        );
        let n_minus_one = (&*N - 1u32).to_bytes_be();
        assert!(PrivateKey::from_be_bytes(&n_minus_one).is_ok());
    }

    #[test]
    fn debug_hides_secret() {
        let key = PrivateKey::from_be_bytes(&[0x11; 32]).unwrap();
        let shown = format!("{key:?}");
        assert!(!shown.contains("1111"), "{shown}");
    }

    #[test]
    fn wif_of_key_one() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = PrivateKey::from_be_bytes(&one).unwrap();
        let wif = key.to_wif();
        assert_eq!(wif, "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn");
        assert_eq!(PrivateKey::from_wif(&wif).unwrap(), key);
    }

    #[test]
    fn wif_rejections() {
        let key = [0x22u8; 32];

        // Uncompressed form: 33-byte payload.
        let short = base58_check_encode_with_prefix(WIF_PREFIX, &key);
        assert_eq!(PrivateKey::from_wif(&short), Err(EccError::InvalidWifLength(33)));

        let mut body = key.to_vec();
        body.push(WIF_COMPRESSED_SUFFIX);
        let testnet = base58_check_encode_with_prefix(0xef, &body);
        assert_eq!(PrivateKey::from_wif(&testnet), Err(EccError::InvalidWifHeader(0xef)));

        body[32] = 0x02;
        let bad_suffix = base58_check_encode_with_prefix(WIF_PREFIX, &body);
        assert_eq!(PrivateKey::from_wif(&bad_suffix), Err(EccError::InvalidWifFormat(0x02)));

        assert!(matches!(
            PrivateKey::from_wif("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo"),
            Err(EccError::Base58(_))
        ));
    }

    #[test]
    fn compressed_encoding_round_trips() {
        let key = PrivateKey::from_be_bytes(&[0x33; 32]).unwrap().public_key();
        let bytes = key.to_bytes();
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), key);

        let mut flipped = bytes;
        flipped[0] ^= 0x01;
        let other = PublicKey::from_bytes(&flipped).unwrap();
        assert_eq!(other.point(), &Curve::secp256k1().negate_point(key.point()));
    }

    #[test]
    fn public_key_parse_errors() {
        assert_eq!(
            PublicKey::from_bytes(&[0x02; 32]),
            Err(EccError::InvalidPublicKeyLength(32))
        );
        let mut bytes = [0u8; 33];
        bytes[0] = 0x04;
        assert_eq!(
            PublicKey::from_bytes(&bytes),
            Err(EccError::InvalidPublicKeyHeader(0x04))
        );
        // x = 7 is not on the curve.
        bytes[0] = 0x02;
        bytes[32] = 7;
        assert_eq!(PublicKey::from_bytes(&bytes), Err(EccError::PointNotOnCurve));
        // x >= P.
        let mut big = [0xffu8; 33];
        big[0] = 0x03;
        assert_eq!(PublicKey::from_bytes(&big), Err(EccError::PointNotOnCurve));
    }

    #[test]
    fn infinity_encodes_as_zeros() {
        let key = PublicKey::from_point(Point::Infinity);
        assert!(key.is_infinity());
        assert_eq!(key.to_bytes(), [0u8; 33]);
    }
}
