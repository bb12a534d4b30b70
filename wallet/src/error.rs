use bip32::Bip32Error;
use crypto_utils::SegwitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("mnemonic must have 12, 15, 18, 21 or 24 words, got {0}")]
    InvalidWordCount(usize),
    #[error("invalid mnemonic: {0}")]
    Mnemonic(#[from] bip39::Error),
    #[error(transparent)]
    Bip32(#[from] Bip32Error),
    #[error(transparent)]
    Segwit(#[from] SegwitError),
}
