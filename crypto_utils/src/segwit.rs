//! Segwit address payloads (BIP173 / BIP350) on top of the `bech32` crate.

use bech32::{FromBase32, ToBase32, Variant, u5};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegwitError {
    #[error("bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),
    #[error("invalid witness program length {0}")]
    InvalidProgramLength(usize),
    #[error("witness version {version} must use {expected:?} checksum")]
    WrongVariant { version: u8, expected: Variant },
    #[error("empty data section")]
    MissingVersion,
}

fn variant_for(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

fn check_program(version: u8, program: &[u8]) -> Result<(), SegwitError> {
    if version > 16 {
        return Err(SegwitError::InvalidWitnessVersion(version));
    }
    let len = program.len();
    if !(2..=40).contains(&len) || (version == 0 && len != 20 && len != 32) {
        return Err(SegwitError::InvalidProgramLength(len));
    }
    Ok(())
}

/// Encode a witness program as a segwit address, e.g. `bc1q...` for version 0.
pub fn segwit_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, SegwitError> {
    check_program(version, program)?;
    let mut data = Vec::with_capacity(1 + (program.len() * 8).div_ceil(5));
    data.push(u5::try_from_u8(version)?);
    data.extend(program.to_base32());
    Ok(bech32::encode(hrp, data, variant_for(version))?)
}

/// Decode a segwit address into `(hrp, witness version, program)`.
pub fn segwit_decode(address: &str) -> Result<(String, u8, Vec<u8>), SegwitError> {
    let (hrp, data, variant) = bech32::decode(address)?;
    let (version, payload) = data.split_first().ok_or(SegwitError::MissingVersion)?;
    let version = version.to_u8();
    let expected = variant_for(version);
    if variant != expected {
        return Err(SegwitError::WrongVariant { version, expected });
    }
    let program = Vec::<u8>::from_base32(payload)?;
    check_program(version, &program)?;
    Ok((hrp, version, program))
}
