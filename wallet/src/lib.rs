//! Purpose 44/49/84 wallet over the BIP-32 key tree.

pub mod address;
pub mod error;

pub use address::{p2pkh_address, p2sh_p2wpkh_address, p2wpkh_address};
pub use error::WalletError;

use bip32::{DerivationPath, HdWallet, WalletType};
use bip39::Mnemonic;
use crypto_utils::random::secure_random_bytes;
use ecc::PublicKey;
use log::debug;

const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

#[derive(Debug)]
pub struct BitcoinWallet {
    hd: HdWallet,
}

impl BitcoinWallet {
    pub fn from_seed(seed: &[u8], wallet_type: WalletType) -> Result<Self, WalletError> {
        Ok(BitcoinWallet {
            hd: HdWallet::from_seed(seed, wallet_type)?,
        })
    }

    /// Derives the BIP-39 seed of `phrase` and opens a wallet on it.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        wallet_type: WalletType,
    ) -> Result<Self, WalletError> {
        let mnemonic = Mnemonic::parse(phrase)?;
        debug!("opening {wallet_type} wallet from {}-word mnemonic", mnemonic.word_count());
        Self::from_seed(&mnemonic.to_seed(passphrase), wallet_type)
    }

    /// Creates a wallet from fresh entropy and returns it with its phrase.
    pub fn generate(
        word_count: usize,
        passphrase: &str,
        wallet_type: WalletType,
    ) -> Result<(Self, String), WalletError> {
        if !WORD_COUNTS.contains(&word_count) {
            return Err(WalletError::InvalidWordCount(word_count));
        }
        // 11 bits per word, 1 checksum bit per 32 entropy bits.
        let entropy = secure_random_bytes(word_count / 3 * 4);
        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        let wallet = Self::from_seed(&mnemonic.to_seed(passphrase), wallet_type)?;
        Ok((wallet, mnemonic.to_string()))
    }

    /// Opens a wallet from an account-level `xprv`/`xpub` style string.
    pub fn from_extended_key(encoded: &str) -> Result<Self, WalletError> {
        Ok(BitcoinWallet {
            hd: HdWallet::from_extended_key(encoded)?,
        })
    }

    pub fn wallet_type(&self) -> WalletType {
        self.hd.wallet_type()
    }

    pub fn is_watch_only(&self) -> bool {
        self.hd.is_watch_only()
    }

    pub fn hd_wallet(&self) -> &HdWallet {
        &self.hd
    }

    pub fn master_key(&self) -> Result<String, WalletError> {
        Ok(self.hd.master_key()?.to_base58())
    }

    pub fn account_extended_private_key(&self) -> Result<String, WalletError> {
        let path = self.wallet_type().account_path();
        Ok(self.hd.extended_private_key(&path)?.to_base58())
    }

    pub fn account_extended_public_key(&self) -> Result<String, WalletError> {
        let path = self.wallet_type().account_path();
        Ok(self.hd.extended_public_key(&path)?.to_base58())
    }

    pub fn public_key(&self, index: u32, change: bool, hardened: bool) -> Result<PublicKey, WalletError> {
        let path = self.key_path(index, change, hardened)?;
        Ok(self.hd.public_key(&path)?)
    }

    /// Address of `account/(0|1)/index[']` in the wallet type's encoding.
    pub fn address(&self, index: u32, change: bool, hardened: bool) -> Result<String, WalletError> {
        let public_key = self.public_key(index, change, hardened)?;
        match self.wallet_type() {
            WalletType::Legacy => Ok(p2pkh_address(&public_key)),
            WalletType::WrappedSegwit => Ok(p2sh_p2wpkh_address(&public_key)),
            WalletType::NativeSegwit => p2wpkh_address(&public_key),
        }
    }

    pub fn private_key_wif(&self, index: u32, change: bool, hardened: bool) -> Result<String, WalletError> {
        let path = self.key_path(index, change, hardened)?;
        Ok(self.hd.private_key(&path)?.to_wif())
    }

    fn key_path(&self, index: u32, change: bool, hardened: bool) -> Result<DerivationPath, WalletError> {
        let path = format!(
            "{}/{}/{}{}",
            self.wallet_type().account_path(),
            u8::from(change),
            index,
            if hardened { "'" } else { "" }
        );
        Ok(path.parse()?)
    }
}
