//! ECDSA over secp256k1: key generation, signing and verification.

use crate::curve::{Curve, Point};
use crate::error::EccError;
use crate::field::{FiniteField, Scalar, ScalarField};
use crate::keys::{PrivateKey, PublicKey};
use crate::rfc6979;
use crate::signature::Signature;
use crypto_utils::hash::sha256d;
use crypto_utils::random::secure_random_array;
use log::trace;
use num_bigint::BigUint;
use std::fmt;

/// How the per-signature nonce is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMode {
    /// Fresh secure random nonce.
    Random,
    /// RFC 6979 nonce derived from the key and digest.
    #[default]
    Deterministic,
}

/// Why a signature failed to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    PublicKeyAtInfinity,
    PublicKeyNotOnCurve,
    ROutOfRange,
    SOutOfRange,
    ResultAtInfinity,
    Mismatch,
}

impl fmt::Display for VerifyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            VerifyFailure::PublicKeyAtInfinity => "public key is the point at infinity",
            VerifyFailure::PublicKeyNotOnCurve => "public key is not on the curve",
            VerifyFailure::ROutOfRange => "r is not in [1, N-1]",
            VerifyFailure::SOutOfRange => "s is not in [1, N-1]",
            VerifyFailure::ResultAtInfinity => "u1*G + u2*Q is the point at infinity",
            VerifyFailure::Mismatch => "signature does not match",
        };
        f.write_str(reason)
    }
}

/// Outcome of a verification. Failures are values, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Invalid(VerifyFailure),
}

impl SignatureCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureCheck::Valid)
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            SignatureCheck::Valid => None,
            SignatureCheck::Invalid(failure) => Some(failure.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ecdsa {
    curve: Curve,
    scalars: FiniteField<ScalarField>,
}

impl Ecdsa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Draws a secret from the OS random source, redrawing on zero.
    pub fn new_private_key(&self) -> PrivateKey {
        loop {
            let bytes: [u8; 32] = secure_random_array();
            if let Ok(key) = PrivateKey::from_scalar(Scalar::from_be_bytes(&bytes)) {
                return key;
            }
        }
    }

    pub fn public_key_from_private_key(&self, key: &PrivateKey) -> PublicKey {
        PublicKey::from_point(self.curve.generator_scalar_mult(key.scalar().value()))
    }

    pub fn public_key_from_buffer(&self, bytes: &[u8]) -> Result<PublicKey, EccError> {
        PublicKey::from_bytes(bytes)
    }

    /// Signs a 32-byte digest. The returned `s` is always the low one.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        key: &PrivateKey,
        mode: SigningMode,
    ) -> Result<Signature, EccError> {
        let f = &self.scalars;
        let h = Scalar::from_be_bytes(digest);

        trace!("signing digest with {mode:?} nonce");
        let k = match mode {
            SigningMode::Random => Scalar::from_be_bytes(&secure_random_array::<32>()),
            SigningMode::Deterministic => rfc6979::generate_k(key, digest),
        };
        if k.is_zero() {
            return Err(EccError::ZeroNonce);
        }

        let big_r = self.curve.generator_scalar_mult(k.value());
        let Point::Affine { x, .. } = big_r else {
            return Err(EccError::DegenerateSignature);
        };
        let r = Scalar::new(x.into_value());
        if r.is_zero() {
            return Err(EccError::DegenerateSignature);
        }

        let k_inv = f.inverse(&k)?;
        let s = f.mul(&k_inv, &f.add(&h, &f.mul(&r, key.scalar())));
        if s.is_zero() {
            return Err(EccError::DegenerateSignature);
        }

        let high_s = f.negate(&s);
        let s = if high_s.value() < s.value() { high_s } else { s };
        Signature::new(r.into_value(), s.into_value())
    }

    pub fn verify_digest(
        &self,
        digest: &[u8; 32],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> SignatureCheck {
        use SignatureCheck::Invalid;

        if public_key.is_infinity() {
            return Invalid(VerifyFailure::PublicKeyAtInfinity);
        }
        if !self.curve.point_on_curve(public_key.point()) {
            return Invalid(VerifyFailure::PublicKeyNotOnCurve);
        }
        let Some(r) = nonzero_scalar(signature.r()) else {
            return Invalid(VerifyFailure::ROutOfRange);
        };
        let Some(s) = nonzero_scalar(signature.s()) else {
            return Invalid(VerifyFailure::SOutOfRange);
        };

        let f = &self.scalars;
        let h = Scalar::from_be_bytes(digest);
        let Ok(s_inv) = f.inverse(&s) else {
            return Invalid(VerifyFailure::SOutOfRange);
        };
        let u1 = f.mul(&h, &s_inv);
        let u2 = f.mul(&r, &s_inv);

        let p = self.curve.point_add(
            &self.curve.generator_scalar_mult(u1.value()),
            &self.curve.scalar_mult(public_key.point(), u2.value()),
        );
        let Point::Affine { x, .. } = p else {
            return Invalid(VerifyFailure::ResultAtInfinity);
        };
        if Scalar::new(x.into_value()) != r {
            return Invalid(VerifyFailure::Mismatch);
        }
        SignatureCheck::Valid
    }

    /// Signs `sha256d(message)`.
    pub fn sign_message(
        &self,
        message: &[u8],
        key: &PrivateKey,
        mode: SigningMode,
    ) -> Result<Signature, EccError> {
        self.sign_digest(&message_digest(message), key, mode)
    }

    /// Verifies against `sha256d(message)`, the digest `sign_message` signs.
    pub fn verify_message(
        &self,
        message: &[u8],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> SignatureCheck {
        self.verify_digest(&message_digest(message), signature, public_key)
    }
}

fn message_digest(message: &[u8]) -> [u8; 32] {
    sha256d(message)
}

/// `value` as a scalar if it lies in `[1, N-1]`.
fn nonzero_scalar(value: &BigUint) -> Option<Scalar> {
    Scalar::from_canonical(value.clone()).filter(|s| !s.is_zero())
}
