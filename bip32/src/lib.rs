pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod hd_wallet;
pub mod wallet_type;

pub use derivation::{ChildNumber, DerivationPath, HARDENED_OFFSET};
pub use error::Bip32Error;
pub use extended_key::{ExtendedKey, ExtendedPrivKey, ExtendedPubKey};
pub use hd_wallet::HdWallet;
pub use wallet_type::WalletType;
