use crypto_utils::Base58Error;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EccError {
    #[error("inverse of zero is undefined")]
    InverseOfZero,
    #[error("point is not on the curve")]
    PointNotOnCurve,
    #[error("invalid public key length {0}: must be 33 bytes")]
    InvalidPublicKeyLength(usize),
    #[error("invalid public key header {0:#04x}: must be 0x02 or 0x03")]
    InvalidPublicKeyHeader(u8),
    #[error("private key must be a 32-byte scalar in [1, N-1]")]
    InvalidPrivateKey,
    #[error("invalid WIF private key length {0}: must be 34 bytes")]
    InvalidWifLength(usize),
    #[error("invalid WIF private key header {0:#04x}: must be 0x80")]
    InvalidWifHeader(u8),
    #[error("invalid WIF private key format: last byte is {0:#04x}, must be 0x01")]
    InvalidWifFormat(u8),
    #[error("invalid DER signature: {0}")]
    InvalidSignatureDer(&'static str),
    #[error("invalid compact signature length {0}: must be 64 bytes")]
    InvalidSignatureLength(usize),
    #[error("signature component does not fit in 256 bits")]
    SignatureComponentTooLarge,
    #[error("signing nonce reduced to zero")]
    ZeroNonce,
    #[error("signature component reduced to zero")]
    DegenerateSignature,
    #[error(transparent)]
    Base58(#[from] Base58Error),
}
