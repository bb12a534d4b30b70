//! secp256k1 from first principles: prime field arithmetic, the curve group
//! law, and ECDSA with RFC 6979 nonces, DER signatures and WIF keys.

pub mod curve;
pub mod ecdsa;
pub mod error;
pub mod field;
pub mod keys;
pub mod rfc6979;
pub mod signature;

pub use curve::{Curve, Point};
pub use ecdsa::{Ecdsa, SignatureCheck, SigningMode, VerifyFailure};
pub use error::EccError;
pub use field::{Fe, FieldElement, FiniteField, Scalar};
pub use keys::{PrivateKey, PublicKey};
pub use signature::Signature;
