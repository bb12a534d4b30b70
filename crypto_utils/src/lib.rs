//! Primitives the curve and wallet layers consume but do not design:
//! hashes, HMAC, Base58Check, segwit Bech32 and the secure random source.

pub mod base58;
pub mod hash;
pub mod hmac;
pub mod random;
pub mod segwit;

pub use base58::Base58Error;
pub use segwit::SegwitError;
