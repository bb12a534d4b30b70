//! Modular arithmetic over a fixed prime modulus.
//!
//! Two moduli coexist: the secp256k1 base field `P` (point coordinates) and
//! the group order `N` (scalars and private keys). The modulus is a type
//! parameter, so an element of one field cannot be handed to the other.

use crate::error::EccError;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;
use std::marker::PhantomData;
use std::sync::LazyLock;

/// secp256k1 base field prime `P = 2^256 - 2^32 - 977`.
pub static P: LazyLock<BigUint> = LazyLock::new(|| {
    hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F")
});

/// secp256k1 group order `N`.
pub static N: LazyLock<BigUint> = LazyLock::new(|| {
    hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
});

/// `(P + 1) / 4`, the square-root exponent (valid because `P ≡ 3 mod 4`).
static SQRT_EXPONENT: LazyLock<BigUint> = LazyLock::new(|| (&*P + 1u32) >> 2usize);

pub(crate) fn hex_constant(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("hard-coded hex constant")
}

/// A prime modulus known at compile time.
pub trait Modulus: 'static {
    /// Short label used in `Debug` output.
    const NAME: &'static str;

    fn modulus() -> &'static BigUint;
}

/// Marker for the base field over `P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveField;

/// Marker for the scalar field over the group order `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarField;

impl Modulus for CurveField {
    const NAME: &'static str = "Fp";

    fn modulus() -> &'static BigUint {
        &P
    }
}

impl Modulus for ScalarField {
    const NAME: &'static str = "Fn";

    fn modulus() -> &'static BigUint {
        &N
    }
}

/// An integer canonically reduced into `[0, m)`.
pub struct FieldElement<M: Modulus> {
    value: BigUint,
    _modulus: PhantomData<M>,
}

/// Point coordinate.
pub type Fe = FieldElement<CurveField>;
/// Scalar modulo the group order.
pub type Scalar = FieldElement<ScalarField>;

impl<M: Modulus> FieldElement<M> {
    /// Reduces `value` modulo `m`.
    pub fn new(value: BigUint) -> Self {
        let modulus = M::modulus();
        let value = if &value >= modulus { value % modulus } else { value };
        Self::reduced(value)
    }

    fn reduced(value: BigUint) -> Self {
        debug_assert!(&value < M::modulus());
        FieldElement {
            value,
            _modulus: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self::reduced(BigUint::zero())
    }

    pub fn one() -> Self {
        Self::reduced(BigUint::one())
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(BigUint::from(value))
    }

    /// Interprets `bytes` as a big-endian integer and reduces it.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Builds an element only if `value` is already below the modulus.
    pub fn from_canonical(value: BigUint) -> Option<Self> {
        (&value < M::modulus()).then(|| Self::reduced(value))
    }

    /// Big-endian bytes without reduction; `None` at or above the modulus.
    pub fn from_be_bytes_canonical(bytes: &[u8]) -> Option<Self> {
        Self::from_canonical(BigUint::from_bytes_be(bytes))
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn into_value(self) -> BigUint {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_even(&self) -> bool {
        !self.value.bit(0)
    }

    /// 32-byte big-endian encoding, left-padded with zeros.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.value.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }
}

impl<M: Modulus> Clone for FieldElement<M> {
    fn clone(&self) -> Self {
        Self::reduced(self.value.clone())
    }
}

impl<M: Modulus> PartialEq for FieldElement<M> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<M: Modulus> Eq for FieldElement<M> {}

impl<M: Modulus> fmt::Debug for FieldElement<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:064x})", M::NAME, self.value)
    }
}

impl<M: Modulus> fmt::LowerHex for FieldElement<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl<M: Modulus> fmt::UpperHex for FieldElement<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

/// Arithmetic over the modulus named by `M`.
pub struct FiniteField<M: Modulus> {
    _modulus: PhantomData<M>,
}

impl<M: Modulus> Clone for FiniteField<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Modulus> Copy for FiniteField<M> {}

impl<M: Modulus> Default for FiniteField<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Modulus> fmt::Debug for FiniteField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FiniteField<{}>", M::NAME)
    }
}

impl<M: Modulus> FiniteField<M> {
    pub fn new() -> Self {
        FiniteField {
            _modulus: PhantomData,
        }
    }

    pub fn modulus(&self) -> &'static BigUint {
        M::modulus()
    }

    pub fn element(&self, value: BigUint) -> FieldElement<M> {
        FieldElement::new(value)
    }

    pub fn add(&self, x: &FieldElement<M>, y: &FieldElement<M>) -> FieldElement<M> {
        let sum = &x.value + &y.value;
        let modulus = M::modulus();
        if &sum >= modulus {
            FieldElement::reduced(sum - modulus)
        } else {
            FieldElement::reduced(sum)
        }
    }

    pub fn sub(&self, x: &FieldElement<M>, y: &FieldElement<M>) -> FieldElement<M> {
        if x.value >= y.value {
            FieldElement::reduced(&x.value - &y.value)
        } else {
            FieldElement::reduced(M::modulus() - (&y.value - &x.value))
        }
    }

    pub fn mul(&self, x: &FieldElement<M>, y: &FieldElement<M>) -> FieldElement<M> {
        FieldElement::reduced((&x.value * &y.value) % M::modulus())
    }

    pub fn square(&self, x: &FieldElement<M>) -> FieldElement<M> {
        self.mul(x, x)
    }

    pub fn cube(&self, x: &FieldElement<M>) -> FieldElement<M> {
        self.mul(&self.square(x), x)
    }

    pub fn negate(&self, x: &FieldElement<M>) -> FieldElement<M> {
        if x.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement::reduced(M::modulus() - &x.value)
        }
    }

    /// Square-and-multiply, scanning the exponent from its least significant bit.
    pub fn pow(&self, x: &FieldElement<M>, exponent: &BigUint) -> FieldElement<M> {
        let mut acc = FieldElement::one();
        let mut power = x.clone();
        let mut e = exponent.clone();
        while !e.is_zero() {
            if e.bit(0) {
                acc = self.mul(&acc, &power);
            }
            power = self.square(&power);
            e >>= 1usize;
        }
        acc
    }

    /// Multiplicative inverse by Fermat's little theorem: `x^(m-2)`.
    pub fn inverse(&self, x: &FieldElement<M>) -> Result<FieldElement<M>, EccError> {
        if x.is_zero() {
            return Err(EccError::InverseOfZero);
        }
        let exponent = M::modulus() - 2u32;
        Ok(self.pow(x, &exponent))
    }

    /// `x / y`, failing when `y` is zero.
    pub fn div(&self, x: &FieldElement<M>, y: &FieldElement<M>) -> Result<FieldElement<M>, EccError> {
        Ok(self.mul(x, &self.inverse(y)?))
    }
}

impl FiniteField<CurveField> {
    /// One square root of `x`, or `None` if `x` is not a quadratic residue.
    ///
    /// The other root is `negate(r)`; callers choose by parity.
    pub fn sqrt(&self, x: &Fe) -> Option<Fe> {
        let root = self.pow(x, &SQRT_EXPONENT);
        (self.square(&root) == *x).then_some(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// A small prime to exercise wrap-around paths by hand.
    #[derive(Debug)]
    struct Small;

    static SMALL: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(97u32));

    impl Modulus for Small {
        const NAME: &'static str = "F97";

        fn modulus() -> &'static BigUint {
            &SMALL
        }
    }

    fn small(v: u64) -> FieldElement<Small> {
        FieldElement::from_u64(v)
    }

    #[test]
    fn secp256k1_moduli() {
        let two = BigUint::from(2u32);
        let expected_p = two.pow(256u32) - two.pow(32u32) - 977u32;
        assert_eq!(*P, expected_p);
        assert_eq!(P.bits(), 256);
        assert_eq!(N.bits(), 256);
        assert!(*N < *P);
        assert_eq!(&*P % 4u32, BigUint::from(3u32), "sqrt exponent needs P = 3 mod 4");
    }

    #[test]
    fn hex_formatting_is_zero_padded() {
        let x = Scalar::from_u64(0xabc);
        assert_eq!(format!("{x:08x}"), "00000abc");
        assert_eq!(format!("{x:08X}"), "00000ABC");
    }

    #[test]
    fn small_field_wraps() {
        let f = FiniteField::<Small>::new();
        assert_eq!(f.add(&small(90), &small(10)), small(3));
        assert_eq!(f.sub(&small(3), &small(10)), small(90));
        assert_eq!(f.mul(&small(50), &small(2)), small(3));
        assert_eq!(f.negate(&small(0)), small(0));
        assert_eq!(f.negate(&small(1)), small(96));
        assert_eq!(f.cube(&small(5)), small(125 % 97));
        assert_eq!(small(200), small(6));
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let f = FiniteField::<Small>::new();
        let mut expected = small(1);
        for e in 0u32..20 {
            assert_eq!(f.pow(&small(7), &BigUint::from(e)), expected, "7^{e}");
            expected = f.mul(&expected, &small(7));
        }
    }

    #[test]
    fn inverse_of_zero_is_rejected() {
        let f = FiniteField::<ScalarField>::new();
        assert_eq!(f.inverse(&Scalar::zero()), Err(EccError::InverseOfZero));
        assert_eq!(
            f.div(&Scalar::one(), &Scalar::zero()),
            Err(EccError::InverseOfZero)
        );
    }

    #[test]
    fn every_small_element_has_an_inverse() {
        let f = FiniteField::<Small>::new();
        for v in 1..97 {
            let x = small(v);
            assert_eq!(f.mul(&f.inverse(&x).unwrap(), &x), small(1), "x = {v}");
        }
    }

    #[test]
    fn sqrt_of_generator_rhs() {
        let f = FiniteField::<CurveField>::new();
        let gx = Fe::new(hex_constant(
            "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
        ));
        let gy = Fe::new(hex_constant(
            "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
        ));
        let rhs = f.add(&f.cube(&gx), &Fe::from_u64(7));
        let root = f.sqrt(&rhs).expect("G.x is on the curve");
        assert!(root == gy || f.negate(&root) == gy);
    }

    #[test]
    fn sqrt_rejects_non_residue() {
        // x = 7 gives x^3 + 7 = 350, which has no root mod P (BIP32 vector 5).
        let f = FiniteField::<CurveField>::new();
        assert_eq!(f.sqrt(&Fe::from_u64(350)), None);
    }

    #[test]
    fn canonical_constructor_rejects_modulus() {
        assert!(Scalar::from_canonical(N.clone()).is_none());
        assert!(Scalar::from_canonical(&*N - 1u32).is_some());
        assert!(Scalar::new(N.clone()).is_zero());
    }

    #[test]
    fn to_be_bytes_pads_small_values() {
        let bytes = Fe::from_u64(0x0102).to_be_bytes();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(&bytes[30..], &[0x01, 0x02]);
    }

    fn scalar_strategy() -> impl Strategy<Value = Scalar> {
        proptest::array::uniform32(any::<u8>()).prop_map(|b| Scalar::from_be_bytes(&b))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn results_stay_reduced(x in scalar_strategy(), y in scalar_strategy()) {
            let f = FiniteField::<ScalarField>::new();
            for r in [f.add(&x, &y), f.sub(&x, &y), f.mul(&x, &y), f.negate(&x), f.cube(&x)] {
                prop_assert!(r.value() < f.modulus());
            }
            prop_assert_eq!(f.add(&f.sub(&x, &y), &y), x.clone());
            prop_assert_eq!(f.add(&x, &f.negate(&x)), Scalar::zero());
        }

        #[test]
        fn inverse_law(x in scalar_strategy()) {
            prop_assume!(!x.is_zero());
            let f = FiniteField::<ScalarField>::new();
            prop_assert_eq!(f.mul(&f.inverse(&x).unwrap(), &x), Scalar::one());
        }
    }
}
