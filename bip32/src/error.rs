use crypto_utils::Base58Error;
use ecc::EccError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bip32Error {
    #[error("seed must be 16 to 64 bytes, got {0}")]
    InvalidSeedLength(usize),
    #[error("master key derived from seed is not a valid private key")]
    InvalidMasterKey,
    #[error("child key {0:#010x} is invalid, use the next index")]
    InvalidChildKey(u32),
    #[error("cannot derive hardened child {0:#010x} from a public key")]
    ImpossiblePublicDerivation(u32),
    #[error("invalid derivation path {path:?}: {reason}")]
    InvalidDerivationPath { path: String, reason: &'static str },
    #[error("extended key must be 78 bytes, got {0}")]
    InvalidExtendedKeyLength(usize),
    #[error("unknown extended key version {0:#010x}")]
    InvalidExtendedKeyHeader(u32),
    #[error("depth 0 key with non-zero parent fingerprint or child number")]
    InvalidRootNode,
    #[error("invalid key data in extended key")]
    InvalidKeyData,
    #[error("maximum derivation depth exceeded")]
    DepthOverflow,
    #[error("wallet was imported from an extended key and has no master key")]
    MasterKeyUnavailable,
    #[error("wallet is watch-only, private keys are unavailable")]
    PrivateKeyUnavailable,
    #[error("account key must have depth 3 and child number 0', got depth {depth} and {child_number:#010x}")]
    InvalidAccountKey { depth: u8, child_number: u32 },
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error(transparent)]
    Ecc(#[from] EccError),
}
