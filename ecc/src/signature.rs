//! ECDSA signature value with DER and compact `r ‖ s` encodings.

use crate::error::EccError;
use num_bigint::BigUint;
use std::fmt;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
/// Two 33-byte integers with their headers plus the sequence header.
const MAX_DER_LEN: usize = 72;
pub const COMPACT_LEN: usize = 64;

/// A pair `(r, s)` of integers below `2^256`. Range checks against `N`
/// happen in verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Result<Self, EccError> {
        if r.bits() > 256 || s.bits() > 256 {
            return Err(EccError::SignatureComponentTooLarge);
        }
        Ok(Signature { r, s })
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// `0x30 len 0x02 len(r) r 0x02 len(s) s`, minimal big-endian integers.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(SEQUENCE_TAG);
        out.push((4 + r.len() + s.len()) as u8);
        out.push(INTEGER_TAG);
        out.push(r.len() as u8);
        out.extend_from_slice(&r);
        out.push(INTEGER_TAG);
        out.push(s.len() as u8);
        out.extend_from_slice(&s);
        out
    }

    pub fn from_der(der: &[u8]) -> Result<Self, EccError> {
        if der.len() < 8 || der.len() > MAX_DER_LEN {
            return Err(EccError::InvalidSignatureDer("bad total length"));
        }
        if der[0] != SEQUENCE_TAG {
            return Err(EccError::InvalidSignatureDer("missing sequence tag"));
        }
        if der[1] as usize != der.len() - 2 {
            return Err(EccError::InvalidSignatureDer("sequence length mismatch"));
        }
        let (r, rest) = read_integer(&der[2..])?;
        let (s, rest) = read_integer(rest)?;
        if !rest.is_empty() {
            return Err(EccError::InvalidSignatureDer("trailing bytes"));
        }
        Ok(Signature { r, s })
    }

    /// 64 bytes: `r` and `s` each left-padded to 32 bytes.
    pub fn to_compact(&self) -> [u8; COMPACT_LEN] {
        let mut out = [0u8; COMPACT_LEN];
        write_be32(&self.r, &mut out[..32]);
        write_be32(&self.s, &mut out[32..]);
        out
    }

    pub fn from_compact(bytes: &[u8]) -> Result<Self, EccError> {
        if bytes.len() != COMPACT_LEN {
            return Err(EccError::InvalidSignatureLength(bytes.len()));
        }
        Ok(Signature {
            r: BigUint::from_bytes_be(&bytes[..32]),
            s: BigUint::from_bytes_be(&bytes[32..]),
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_der()))
    }
}

fn der_integer(value: &BigUint) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        let mut padded = Vec::with_capacity(bytes.len() + 1);
        padded.push(0x00);
        padded.extend_from_slice(&bytes);
        padded
    } else {
        bytes
    }
}

fn read_integer(input: &[u8]) -> Result<(BigUint, &[u8]), EccError> {
    if input.len() < 2 || input[0] != INTEGER_TAG {
        return Err(EccError::InvalidSignatureDer("missing integer tag"));
    }
    let len = input[1] as usize;
    if len == 0 || len > 33 || input.len() < 2 + len {
        return Err(EccError::InvalidSignatureDer("bad integer length"));
    }
    let body = &input[2..2 + len];
    if body[0] & 0x80 != 0 {
        return Err(EccError::InvalidSignatureDer("negative integer"));
    }
    if len > 1 && body[0] == 0x00 && body[1] & 0x80 == 0 {
        return Err(EccError::InvalidSignatureDer("integer not minimally encoded"));
    }
    if len == 33 && body[0] != 0x00 {
        return Err(EccError::InvalidSignatureDer("integer exceeds 256 bits"));
    }
    Ok((BigUint::from_bytes_be(body), &input[2 + len..]))
}

/// Writes `value` (below `2^256`), big-endian, into the 32-byte `out`.
fn write_be32(value: &BigUint, out: &mut [u8]) {
    let bytes = value.to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn sig(r: u64, s: u64) -> Signature {
        Signature::new(BigUint::from(r), BigUint::from(s)).unwrap()
    }

    #[test]
    fn components_above_256_bits_are_rejected() {
        let max = (BigUint::from(1u32) << 256usize) - 1u32;
        let sig = Signature::new(max.clone(), max.clone()).unwrap();
        assert_eq!(sig.to_der().len(), 72);
        assert_eq!(sig.to_compact(), [0xff; COMPACT_LEN]);

        let too_big = BigUint::from(1u32) << 256usize;
        assert_eq!(
            Signature::new(too_big.clone(), BigUint::from(1u32)),
            Err(EccError::SignatureComponentTooLarge)
        );
        assert_eq!(
            Signature::new(BigUint::from(1u32), too_big),
            Err(EccError::SignatureComponentTooLarge)
        );
    }

    #[test]
    fn der_pads_high_bit() {
        assert_eq!(sig(1, 2).to_der(), hex!("3006020101020102"));
        assert_eq!(sig(0x80, 0x7f).to_der(), hex!("30070202008002017f"));
        assert_eq!(Signature::from_der(&hex!("30070202008002017f")).unwrap(), sig(0x80, 0x7f));
    }

    #[test]
    fn der_agrees_with_libsecp256k1() {
        let compact = hex!("934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d82442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5");
        let ours = Signature::from_compact(&compact).unwrap();
        let theirs = secp256k1::ecdsa::Signature::from_compact(&compact).unwrap();
        assert_eq!(ours.to_der(), theirs.serialize_der().to_vec());
        assert_eq!(Signature::from_der(&ours.to_der()).unwrap(), ours);
        assert_eq!(ours.to_compact(), compact);
    }

    #[test]
    fn der_rejects_malformed_input() {
        let cases: [(&[u8], &str); 8] = [
            (&hex!("3006020101020102ff"), "sequence length mismatch"),
            (&hex!("3106020101020102"), "missing sequence tag"),
            (&hex!("3006030101020102"), "missing integer tag"),
            (&hex!("3006020181020102"), "negative integer"),
            (&hex!("300702020001020102"), "integer not minimally encoded"),
            (&hex!("3006020501020102"), "bad integer length"),
            (&hex!("300602010102"), "bad total length"),
            (
                &hex!("30260221010000000000000000000000000000000000000000000000000000000000000000020101"),
                "integer exceeds 256 bits",
            ),
        ];
        for (der, reason) in cases {
            assert_eq!(
                Signature::from_der(der),
                Err(EccError::InvalidSignatureDer(reason)),
                "{}",
                hex::encode(der)
            );
        }
    }

    #[test]
    fn der_rejects_trailing_bytes() {
        assert_eq!(
            Signature::from_der(&hex!("30080201010201020000")),
            Err(EccError::InvalidSignatureDer("trailing bytes"))
        );
    }

    #[test]
    fn compact_length_is_checked() {
        assert_eq!(
            Signature::from_compact(&[0u8; 63]),
            Err(EccError::InvalidSignatureLength(63))
        );
        let compact = sig(5, 6).to_compact();
        assert_eq!(compact[31], 5);
        assert_eq!(compact[63], 6);
    }
}
