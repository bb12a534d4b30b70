use crate::Bip32Error;
use crate::derivation::{ChildNumber, DerivationPath};
use crate::wallet_type::WalletType;
use crypto_utils::{
    base58::{base58_check_decode, base58_check_encode},
    hash::hash160,
    hmac::hmac_sha512,
};
use ecc::field::ScalarField;
use ecc::{Curve, FiniteField, PrivateKey, PublicKey, Scalar};
use log::{debug, warn};
use std::fmt;
use std::str::FromStr;

/// Serialized extended key size, before the Base58Check checksum.
pub const EXTENDED_KEY_LEN: usize = 78;
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Extended private key (xprv / yprv / zprv)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivKey {
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_number: u32,
    pub chain_code: [u8; 32],
    pub private_key: PrivateKey,
    pub wallet_type: WalletType,
}

/// Extended public key (xpub / ypub / zpub)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPubKey {
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_number: u32,
    pub chain_code: [u8; 32],
    pub public_key: PublicKey,
    pub wallet_type: WalletType,
}

/// Either half of a BIP-32 node, as found in a serialized key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedKey {
    Private(ExtendedPrivKey),
    Public(ExtendedPubKey),
}

/// HASH160 of the compressed public key.
fn identifier(public_key: &PublicKey) -> [u8; 20] {
    hash160(&public_key.to_bytes())
}

/// First 4 bytes of the identifier, big-endian.
fn fingerprint(public_key: &PublicKey) -> u32 {
    let id = identifier(public_key);
    u32::from_be_bytes([id[0], id[1], id[2], id[3]])
}

fn ckd_data(prefix: &[u8], index: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(prefix.len() + 4);
    data.extend_from_slice(prefix);
    data.extend_from_slice(&index.to_be_bytes());
    data
}

/// Splits `I = HMAC-SHA512(chain_code, data)` into `(parse256(IL), IR)`.
/// `IL >= N` makes the child invalid.
fn ckd_hmac(chain_code: &[u8; 32], data: &[u8], index: u32) -> Result<(Scalar, [u8; 32]), Bip32Error> {
    let i = hmac_sha512(chain_code, data);
    let (il, ir) = i.split_at(32);
    let tweak = Scalar::from_be_bytes_canonical(il).ok_or_else(|| invalid_child(index))?;
    let mut child_chain_code = [0u8; 32];
    child_chain_code.copy_from_slice(ir);
    Ok((tweak, child_chain_code))
}

fn invalid_child(index: u32) -> Bip32Error {
    warn!("child key {index:#010x} is invalid, the next index should be used");
    Bip32Error::InvalidChildKey(index)
}

fn child_depth(depth: u8) -> Result<u8, Bip32Error> {
    depth.checked_add(1).ok_or(Bip32Error::DepthOverflow)
}

fn serialize(
    version: u32,
    depth: u8,
    parent_fingerprint: u32,
    child_number: u32,
    chain_code: &[u8; 32],
    key_data: &[u8; 33],
) -> [u8; EXTENDED_KEY_LEN] {
    let mut out = [0u8; EXTENDED_KEY_LEN];
    out[0..4].copy_from_slice(&version.to_be_bytes());
    out[4] = depth;
    out[5..9].copy_from_slice(&parent_fingerprint.to_be_bytes());
    out[9..13].copy_from_slice(&child_number.to_be_bytes());
    out[13..45].copy_from_slice(chain_code);
    out[45..78].copy_from_slice(key_data);
    out
}

impl ExtendedPrivKey {
    /// Master extended private key from a seed
    pub fn new_master(seed: &[u8], wallet_type: WalletType) -> Result<Self, Bip32Error> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Bip32Error::InvalidSeedLength(seed.len()));
        }
        let i = hmac_sha512(MASTER_HMAC_KEY, seed);
        let (il, ir) = i.split_at(32);
        let private_key = PrivateKey::from_be_bytes(il).map_err(|_| Bip32Error::InvalidMasterKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);
        debug!("created {wallet_type} master key");
        Ok(ExtendedPrivKey {
            depth: 0,
            parent_fingerprint: 0,
            child_number: 0,
            chain_code,
            private_key,
            wallet_type,
        })
    }

    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    pub fn identifier(&self) -> [u8; 20] {
        identifier(&self.public_key())
    }

    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key())
    }

    /// Neuters the key, keeping depth, parentage and chain code.
    pub fn to_public(&self) -> ExtendedPubKey {
        ExtendedPubKey {
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            public_key: self.public_key(),
            wallet_type: self.wallet_type,
        }
    }

    /// CKDpriv
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, Bip32Error> {
        let index = child.to_u32();
        let parent_public = self.public_key();
        let data = if child.is_hardened() {
            // 0x00 ‖ ser256(k) ‖ ser32(i)
            let mut prefix = [0u8; 33];
            prefix[1..].copy_from_slice(&self.private_key.to_bytes());
            ckd_data(&prefix, index)
        } else {
            ckd_data(&parent_public.to_bytes(), index)
        };

        let (tweak, chain_code) = ckd_hmac(&self.chain_code, &data, index)?;
        let scalars = FiniteField::<ScalarField>::new();
        let child_scalar = scalars.add(&tweak, self.private_key.scalar());
        let private_key = PrivateKey::from_scalar(child_scalar).map_err(|_| invalid_child(index))?;

        Ok(ExtendedPrivKey {
            depth: child_depth(self.depth)?,
            parent_fingerprint: fingerprint(&parent_public),
            child_number: index,
            chain_code,
            private_key,
            wallet_type: self.wallet_type,
        })
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, Bip32Error> {
        let mut key = self.clone();
        for &child in path.iter() {
            key = key.derive_child(child)?;
        }
        Ok(key)
    }

    pub fn to_raw_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(&self.private_key.to_bytes());
        serialize(
            self.wallet_type.version(true),
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
            &key_data,
        )
    }

    /// Serialize this key into a Base58Check string
    pub fn to_base58(&self) -> String {
        base58_check_encode(&self.to_raw_bytes())
    }

    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, Bip32Error> {
        match ExtendedKey::from_raw_bytes(data)? {
            ExtendedKey::Private(key) => Ok(key),
            ExtendedKey::Public(key) => Err(Bip32Error::InvalidExtendedKeyHeader(
                key.wallet_type.version(false),
            )),
        }
    }

    pub fn from_base58(s: &str) -> Result<Self, Bip32Error> {
        Self::from_raw_bytes(&base58_check_decode(s)?)
    }
}

impl ExtendedPubKey {
    pub fn identifier(&self) -> [u8; 20] {
        identifier(&self.public_key)
    }

    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key)
    }

    /// CKDpub, normal children only
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, Bip32Error> {
        let index = child.to_u32();
        if child.is_hardened() {
            return Err(Bip32Error::ImpossiblePublicDerivation(index));
        }

        let data = ckd_data(&self.public_key.to_bytes(), index);
        let (tweak, chain_code) = ckd_hmac(&self.chain_code, &data, index)?;

        // K_i = IL·G + K_par
        let curve = Curve::secp256k1();
        let point = curve.point_add(
            &curve.generator_scalar_mult(tweak.value()),
            self.public_key.point(),
        );
        if point.is_infinity() {
            return Err(invalid_child(index));
        }

        Ok(ExtendedPubKey {
            depth: child_depth(self.depth)?,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
            chain_code,
            public_key: PublicKey::from_point(point),
            wallet_type: self.wallet_type,
        })
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, Bip32Error> {
        let mut key = self.clone();
        for &child in path.iter() {
            key = key.derive_child(child)?;
        }
        Ok(key)
    }

    pub fn to_raw_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        serialize(
            self.wallet_type.version(false),
            self.depth,
            self.parent_fingerprint,
            self.child_number,
            &self.chain_code,
            &self.public_key.to_bytes(),
        )
    }

    /// Serialize to Base58Check
    pub fn to_base58(&self) -> String {
        base58_check_encode(&self.to_raw_bytes())
    }

    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, Bip32Error> {
        match ExtendedKey::from_raw_bytes(data)? {
            ExtendedKey::Public(key) => Ok(key),
            ExtendedKey::Private(key) => Err(Bip32Error::InvalidExtendedKeyHeader(
                key.wallet_type.version(true),
            )),
        }
    }

    pub fn from_base58(s: &str) -> Result<Self, Bip32Error> {
        Self::from_raw_bytes(&base58_check_decode(s)?)
    }
}

impl ExtendedKey {
    pub fn is_private(&self) -> bool {
        matches!(self, ExtendedKey::Private(_))
    }

    pub fn wallet_type(&self) -> WalletType {
        match self {
            ExtendedKey::Private(k) => k.wallet_type,
            ExtendedKey::Public(k) => k.wallet_type,
        }
    }

    pub fn depth(&self) -> u8 {
        match self {
            ExtendedKey::Private(k) => k.depth,
            ExtendedKey::Public(k) => k.depth,
        }
    }

    pub fn child_number(&self) -> u32 {
        match self {
            ExtendedKey::Private(k) => k.child_number,
            ExtendedKey::Public(k) => k.child_number,
        }
    }

    pub fn parent_fingerprint(&self) -> u32 {
        match self {
            ExtendedKey::Private(k) => k.parent_fingerprint,
            ExtendedKey::Public(k) => k.parent_fingerprint,
        }
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        match self {
            ExtendedKey::Private(k) => &k.chain_code,
            ExtendedKey::Public(k) => &k.chain_code,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            ExtendedKey::Private(k) => k.public_key(),
            ExtendedKey::Public(k) => k.public_key.clone(),
        }
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        match self {
            ExtendedKey::Private(k) => Some(&k.private_key),
            ExtendedKey::Public(_) => None,
        }
    }

    pub fn fingerprint(&self) -> u32 {
        fingerprint(&self.public_key())
    }

    pub fn to_public(&self) -> ExtendedPubKey {
        match self {
            ExtendedKey::Private(k) => k.to_public(),
            ExtendedKey::Public(k) => k.clone(),
        }
    }

    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, Bip32Error> {
        Ok(match self {
            ExtendedKey::Private(k) => ExtendedKey::Private(k.derive_child(child)?),
            ExtendedKey::Public(k) => ExtendedKey::Public(k.derive_child(child)?),
        })
    }

    pub fn to_raw_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        match self {
            ExtendedKey::Private(k) => k.to_raw_bytes(),
            ExtendedKey::Public(k) => k.to_raw_bytes(),
        }
    }

    pub fn to_base58(&self) -> String {
        base58_check_encode(&self.to_raw_bytes())
    }

    /// Parses 78 serialized bytes. The version decides both the wallet type
    /// and whether the key data is private.
    pub fn from_raw_bytes(data: &[u8]) -> Result<Self, Bip32Error> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(Bip32Error::InvalidExtendedKeyLength(data.len()));
        }
        let word = |at: usize| u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

        let version = word(0);
        let (wallet_type, private) =
            WalletType::from_version(version).ok_or(Bip32Error::InvalidExtendedKeyHeader(version))?;
        let depth = data[4];
        let parent_fingerprint = word(5);
        let child_number = word(9);
        if depth == 0 && (parent_fingerprint != 0 || child_number != 0) {
            return Err(Bip32Error::InvalidRootNode);
        }
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);
        let key_data = &data[45..78];

        if private {
            // Key data: 0x00 followed by the 32-byte scalar
            if key_data[0] != 0 {
                return Err(Bip32Error::InvalidKeyData);
            }
            let private_key =
                PrivateKey::from_be_bytes(&key_data[1..]).map_err(|_| Bip32Error::InvalidKeyData)?;
            Ok(ExtendedKey::Private(ExtendedPrivKey {
                depth,
                parent_fingerprint,
                child_number,
                chain_code,
                private_key,
                wallet_type,
            }))
        } else {
            let public_key = PublicKey::from_bytes(key_data).map_err(|_| Bip32Error::InvalidKeyData)?;
            Ok(ExtendedKey::Public(ExtendedPubKey {
                depth,
                parent_fingerprint,
                child_number,
                chain_code,
                public_key,
                wallet_type,
            }))
        }
    }

    pub fn from_base58(s: &str) -> Result<Self, Bip32Error> {
        Self::from_raw_bytes(&base58_check_decode(s)?)
    }
}

impl From<ExtendedPrivKey> for ExtendedKey {
    fn from(key: ExtendedPrivKey) -> Self {
        ExtendedKey::Private(key)
    }
}

impl From<ExtendedPubKey> for ExtendedKey {
    fn from(key: ExtendedPubKey) -> Self {
        ExtendedKey::Public(key)
    }
}

impl fmt::Display for ExtendedPrivKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Display for ExtendedPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ExtendedPrivKey {
    type Err = Bip32Error;

    fn from_str(s: &str) -> Result<Self, Bip32Error> {
        Self::from_base58(s)
    }
}

impl FromStr for ExtendedPubKey {
    type Err = Bip32Error;

    fn from_str(s: &str) -> Result<Self, Bip32Error> {
        Self::from_base58(s)
    }
}

impl FromStr for ExtendedKey {
    type Err = Bip32Error;

    fn from_str(s: &str) -> Result<Self, Bip32Error> {
        Self::from_base58(s)
    }
}
