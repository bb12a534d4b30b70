use crate::hash::sha256d;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),
    #[error("base58 string is too short")]
    InvalidLength,
    #[error("invalid base58 checksum (some characters are incorrect or misplaced)")]
    InvalidChecksum,
}

pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const CHECKSUM_LEN: usize = 4;

fn digit_value(c: u8) -> Option<u8> {
    BASE58_ALPHABET
        .iter()
        .position(|&a| a == c)
        .map(|idx| idx as u8)
}

pub fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits of the big-endian input.
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat_n('1', zeros));
    out.extend(
        digits
            .iter()
            .rev()
            .map(|&d| BASE58_ALPHABET[d as usize] as char),
    );
    out
}

pub fn base58_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    if s.is_empty() {
        return Err(Base58Error::InvalidLength);
    }
    let zeros = s.bytes().take_while(|&b| b == b'1').count();

    // Little-endian base-256 bytes of the base-58 number.
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len());
    for c in s.chars().skip(zeros) {
        let value = u8::try_from(c)
            .ok()
            .and_then(digit_value)
            .ok_or(Base58Error::InvalidCharacter(c))?;
        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

/// Base58 of `payload ‖ sha256d(payload)[..4]`.
pub fn base58_check_encode(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut extended = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    extended.extend_from_slice(payload);
    extended.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    base58_encode(&extended)
}

/// Base58Check with a one-byte version prefix (addresses, WIF keys).
pub fn base58_check_encode_with_prefix(prefix: u8, payload: &[u8]) -> String {
    let mut prefixed = Vec::with_capacity(payload.len() + 1);
    prefixed.push(prefix);
    prefixed.extend_from_slice(payload);
    base58_check_encode(&prefixed)
}

pub fn base58_check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let raw = base58_decode(s)?;
    if raw.len() < CHECKSUM_LEN {
        return Err(Base58Error::InvalidLength);
    }
    let (payload, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if sha256d(payload)[..CHECKSUM_LEN] != *checksum {
        return Err(Base58Error::InvalidChecksum);
    }
    Ok(payload.to_vec())
}
