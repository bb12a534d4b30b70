use crate::derivation::{ChildNumber, DerivationPath};
use std::fmt;

// Version bytes for serialization
const VERSION_XPRV: u32 = 0x0488_ADE4;
const VERSION_XPUB: u32 = 0x0488_B21E;
const VERSION_YPRV: u32 = 0x049D_7878;
const VERSION_YPUB: u32 = 0x049D_7CB2;
const VERSION_ZPRV: u32 = 0x04B2_430C;
const VERSION_ZPUB: u32 = 0x04B2_4746;

/// Address family of a wallet. Fixes the BIP-43 purpose and the version
/// bytes of serialized extended keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WalletType {
    /// BIP-44, P2PKH, `xprv`/`xpub`.
    #[default]
    Legacy,
    /// BIP-49, P2SH-P2WPKH, `yprv`/`ypub`.
    WrappedSegwit,
    /// BIP-84, P2WPKH, `zprv`/`zpub`.
    NativeSegwit,
}

impl WalletType {
    pub const ALL: [WalletType; 3] = [
        WalletType::Legacy,
        WalletType::WrappedSegwit,
        WalletType::NativeSegwit,
    ];

    pub fn purpose(&self) -> u32 {
        match self {
            WalletType::Legacy => 44,
            WalletType::WrappedSegwit => 49,
            WalletType::NativeSegwit => 84,
        }
    }

    /// `m/<purpose>'/0'/0'`: first account on Bitcoin mainnet.
    pub fn account_path(&self) -> DerivationPath {
        DerivationPath::from(vec![
            ChildNumber::Hardened(self.purpose()),
            ChildNumber::Hardened(0),
            ChildNumber::Hardened(0),
        ])
    }

    pub fn version(&self, private: bool) -> u32 {
        match (self, private) {
            (WalletType::Legacy, true) => VERSION_XPRV,
            (WalletType::Legacy, false) => VERSION_XPUB,
            (WalletType::WrappedSegwit, true) => VERSION_YPRV,
            (WalletType::WrappedSegwit, false) => VERSION_YPUB,
            (WalletType::NativeSegwit, true) => VERSION_ZPRV,
            (WalletType::NativeSegwit, false) => VERSION_ZPUB,
        }
    }

    /// Inverse of [`WalletType::version`]: the wallet type and whether the
    /// key is private.
    pub fn from_version(version: u32) -> Option<(WalletType, bool)> {
        Self::ALL.into_iter().find_map(|wallet_type| {
            if wallet_type.version(true) == version {
                Some((wallet_type, true))
            } else if wallet_type.version(false) == version {
                Some((wallet_type, false))
            } else {
                None
            }
        })
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalletType::Legacy => "legacy-bip44",
            WalletType::WrappedSegwit => "segwit-bip49",
            WalletType::NativeSegwit => "native-segwit-bip84",
        };
        f.write_str(name)
    }
}
