//! Path-addressed key tree with memoized derivation.

use crate::Bip32Error;
use crate::derivation::{DerivationPath, HARDENED_OFFSET};
use crate::extended_key::{ExtendedKey, ExtendedPrivKey, ExtendedPubKey};
use crate::wallet_type::WalletType;
use ecc::{PrivateKey, PublicKey};
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

const ACCOUNT_DEPTH: u8 = 3;

/// A BIP-32 wallet rooted either at a seed or at an imported account key.
///
/// Keys are resolved right to left: a path's parent is resolved (and
/// cached) first, then one CKD step is applied. Private and public nodes
/// live in separate caches keyed by the canonical path string.
#[derive(Debug)]
pub struct HdWallet {
    wallet_type: WalletType,
    has_master: bool,
    watch_only: bool,
    private_cache: RwLock<HashMap<String, ExtendedPrivKey>>,
    public_cache: RwLock<HashMap<String, ExtendedPubKey>>,
}

impl HdWallet {
    pub fn from_seed(seed: &[u8], wallet_type: WalletType) -> Result<Self, Bip32Error> {
        let master = ExtendedPrivKey::new_master(seed, wallet_type)?;
        let mut private_cache = HashMap::new();
        private_cache.insert(DerivationPath::master().to_string(), master);
        debug!("opened {wallet_type} wallet from seed");
        Ok(HdWallet {
            wallet_type,
            has_master: true,
            watch_only: false,
            private_cache: RwLock::new(private_cache),
            public_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Opens a wallet from an account-level key (depth 3, child `0'`).
    ///
    /// The key is filed under its wallet type's account path. A public key
    /// yields a watch-only wallet; neither kind has a master key.
    pub fn from_extended_key(encoded: &str) -> Result<Self, Bip32Error> {
        let key: ExtendedKey = encoded.parse()?;
        if key.depth() != ACCOUNT_DEPTH || key.child_number() != HARDENED_OFFSET {
            return Err(Bip32Error::InvalidAccountKey {
                depth: key.depth(),
                child_number: key.child_number(),
            });
        }
        let wallet_type = key.wallet_type();
        let account_path = wallet_type.account_path().to_string();
        let watch_only = !key.is_private();
        debug!("imported {wallet_type} account key at {account_path}, watch-only: {watch_only}");

        let mut private_cache = HashMap::new();
        let mut public_cache = HashMap::new();
        match key {
            ExtendedKey::Private(k) => {
                private_cache.insert(account_path, k);
            }
            ExtendedKey::Public(k) => {
                public_cache.insert(account_path, k);
            }
        }
        Ok(HdWallet {
            wallet_type,
            has_master: false,
            watch_only,
            private_cache: RwLock::new(private_cache),
            public_cache: RwLock::new(public_cache),
        })
    }

    pub fn wallet_type(&self) -> WalletType {
        self.wallet_type
    }

    pub fn is_watch_only(&self) -> bool {
        self.watch_only
    }

    pub fn master_key(&self) -> Result<ExtendedPrivKey, Bip32Error> {
        if !self.has_master {
            return Err(Bip32Error::MasterKeyUnavailable);
        }
        self.resolve_private(&DerivationPath::master())
    }

    pub fn extended_private_key(&self, path: &DerivationPath) -> Result<ExtendedPrivKey, Bip32Error> {
        if self.watch_only {
            return Err(Bip32Error::PrivateKeyUnavailable);
        }
        self.resolve_private(path)
    }

    pub fn extended_public_key(&self, path: &DerivationPath) -> Result<ExtendedPubKey, Bip32Error> {
        self.resolve_public(path)
    }

    pub fn private_key(&self, path: &DerivationPath) -> Result<PrivateKey, Bip32Error> {
        Ok(self.extended_private_key(path)?.private_key)
    }

    pub fn public_key(&self, path: &DerivationPath) -> Result<PublicKey, Bip32Error> {
        Ok(self.extended_public_key(path)?.public_key)
    }

    fn resolve_private(&self, path: &DerivationPath) -> Result<ExtendedPrivKey, Bip32Error> {
        let cache_key = path.to_string();
        if let Some(hit) = self
            .private_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key)
        {
            trace!("private cache hit for {cache_key}");
            return Ok(hit.clone());
        }

        // Reaching the root uncached means the wallet was imported below it.
        let (parent, child) = path.parent().ok_or(Bip32Error::MasterKeyUnavailable)?;
        let derived = self.resolve_private(&parent)?.derive_child(child)?;
        debug!(
            "derived private {cache_key} (depth {}, child {:#010x}, {})",
            derived.depth, derived.child_number, self.wallet_type
        );

        let mut cache = self
            .private_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(cache_key).or_insert(derived).clone())
    }

    fn resolve_public(&self, path: &DerivationPath) -> Result<ExtendedPubKey, Bip32Error> {
        let cache_key = path.to_string();
        if let Some(hit) = self
            .public_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cache_key)
        {
            trace!("public cache hit for {cache_key}");
            return Ok(hit.clone());
        }

        let derived = if self.watch_only {
            let (parent, child) = path.parent().ok_or(Bip32Error::MasterKeyUnavailable)?;
            let key = self.resolve_public(&parent)?.derive_child(child)?;
            debug!(
                "derived public {cache_key} (depth {}, child {:#010x}, {})",
                key.depth, key.child_number, self.wallet_type
            );
            key
        } else {
            self.resolve_private(path)?.to_public()
        };

        let mut cache = self
            .public_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(cache_key).or_insert(derived).clone())
    }
}
