use crate::Bip32Error;
use std::fmt;
use std::str::FromStr;

/// Index offset for hardened children: `2^31`.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One step of a derivation path. The wrapped index is below `2^31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildNumber {
    Normal(u32),
    Hardened(u32),
}

impl ChildNumber {
    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildNumber::Hardened(_))
    }

    /// Index without the hardened offset.
    pub fn index(&self) -> u32 {
        match *self {
            ChildNumber::Normal(i) | ChildNumber::Hardened(i) => i,
        }
    }

    /// The `ser32(i)` value fed to CKD.
    pub fn to_u32(&self) -> u32 {
        match *self {
            ChildNumber::Normal(i) => i,
            ChildNumber::Hardened(i) => i | HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildNumber {
    fn from(raw: u32) -> Self {
        if raw & HARDENED_OFFSET != 0 {
            ChildNumber::Hardened(raw & !HARDENED_OFFSET)
        } else {
            ChildNumber::Normal(raw)
        }
    }
}

impl From<ChildNumber> for u32 {
    fn from(child: ChildNumber) -> Self {
        child.to_u32()
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildNumber::Normal(i) => write!(f, "{i}"),
            ChildNumber::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

/// A BIP-32 derivation path (e.g. "m/44'/0'/0'/0/1").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The path `m`.
    pub fn master() -> Self {
        DerivationPath(Vec::new())
    }

    pub fn is_master(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildNumber> {
        self.0.iter()
    }

    /// Splits off the last step: `m/a/b` gives `(m/a, b)`. `None` for `m`.
    pub fn parent(&self) -> Option<(DerivationPath, ChildNumber)> {
        let (last, rest) = self.0.split_last()?;
        Some((DerivationPath(rest.to_vec()), *last))
    }

    pub fn child(&self, child: ChildNumber) -> DerivationPath {
        let mut steps = self.0.clone();
        steps.push(child);
        DerivationPath(steps)
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(steps: Vec<ChildNumber>) -> Self {
        DerivationPath(steps)
    }
}

impl FromStr for DerivationPath {
    type Err = Bip32Error;

    /// Parses `m(/index['|H|h])*`.
    fn from_str(s: &str) -> Result<Self, Bip32Error> {
        let invalid = |reason| Bip32Error::InvalidDerivationPath {
            path: s.to_string(),
            reason,
        };

        if s == "m" {
            return Ok(DerivationPath::master());
        }
        let rest = s
            .strip_prefix("m/")
            .ok_or_else(|| invalid("must start with \"m/\""))?;

        let mut steps = Vec::new();
        for part in rest.split('/') {
            let (digits, hardened) = match part.strip_suffix(['\'', 'H', 'h']) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            if digits.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("segment is not a decimal index"));
            }
            let index: u32 = digits
                .parse()
                .map_err(|_| invalid("index must be below 2^31"))?;
            if index >= HARDENED_OFFSET {
                return Err(invalid("index must be below 2^31"));
            }
            steps.push(if hardened {
                ChildNumber::Hardened(index)
            } else {
                ChildNumber::Normal(index)
            });
        }
        Ok(DerivationPath(steps))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_and_display() {
        let dp: DerivationPath = "m/0'/1/2'/2/1000000000".parse().unwrap();
        let raw: Vec<u32> = dp.iter().map(|c| c.to_u32()).collect();
        assert_eq!(
            raw,
            vec![HARDENED_OFFSET, 1, HARDENED_OFFSET + 2, 2, 1000000000]
        );
        assert_eq!(dp.to_string(), "m/0'/1/2'/2/1000000000");
        assert_eq!(dp.depth(), 5);
    }

    #[test]
    fn hardened_markers_normalize() {
        let a: DerivationPath = "m/44H/0h/0'".parse().unwrap();
        assert_eq!(a.to_string(), "m/44'/0'/0'");
        assert!(a.iter().all(ChildNumber::is_hardened));
    }

    #[test]
    fn master_path() {
        let m: DerivationPath = "m".parse().unwrap();
        assert!(m.is_master());
        assert_eq!(m.to_string(), "m");
        assert_eq!(m.parent(), None);
    }

    #[test]
    fn rejects_malformed_paths() {
        for (path, reason) in [
            ("", "must start with \"m/\""),
            ("44/0", "must start with \"m/\""),
            ("M/0", "must start with \"m/\""),
            ("m/", "empty path segment"),
            ("m//1", "empty path segment"),
            ("m/'", "empty path segment"),
            ("m/abc", "segment is not a decimal index"),
            ("m/-1", "segment is not a decimal index"),
            ("m/1''", "segment is not a decimal index"),
            ("m/2147483648", "index must be below 2^31"),
            ("m/99999999999", "index must be below 2^31"),
        ] {
            assert_eq!(
                path.parse::<DerivationPath>(),
                Err(Bip32Error::InvalidDerivationPath {
                    path: path.to_string(),
                    reason,
                }),
                "{path:?}"
            );
        }
        assert!("m/2147483647'".parse::<DerivationPath>().is_ok());
    }

    #[test]
    fn parent_and_child_walk_the_path() {
        let path: DerivationPath = "m/84'/0'/0'/0/7".parse().unwrap();
        let (parent, last) = path.parent().unwrap();
        assert_eq!(parent.to_string(), "m/84'/0'/0'/0");
        assert_eq!(last, ChildNumber::Normal(7));
        assert_eq!(parent.child(last), path);
    }

    #[test]
    fn raw_index_conversion() {
        assert_eq!(ChildNumber::from(5u32), ChildNumber::Normal(5));
        assert_eq!(
            ChildNumber::from(HARDENED_OFFSET + 5),
            ChildNumber::Hardened(5)
        );
        assert_eq!(u32::from(ChildNumber::Hardened(0)), HARDENED_OFFSET);
        assert_eq!(ChildNumber::Hardened(5).index(), 5);
    }

    proptest! {
        #[test]
        fn display_parse_round_trip(raw in proptest::collection::vec(any::<u32>(), 0..8)) {
            let path = DerivationPath::from(raw.into_iter().map(ChildNumber::from).collect::<Vec<_>>());
            let reparsed: DerivationPath = path.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, path);
        }
    }
}
