//! secp256k1 group law in affine coordinates: `y² = x³ + 7` over `F_P`.

use crate::error::EccError;
use crate::field::{CurveField, Fe, FiniteField, N, hex_constant};
use num_bigint::BigUint;
use std::sync::LazyLock;

static GENERATOR: LazyLock<Point> = LazyLock::new(|| Point::Affine {
    x: Fe::new(hex_constant(
        "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    )),
    y: Fe::new(hex_constant(
        "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
    )),
});

/// A curve point, or the group identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point {
    Infinity,
    Affine { x: Fe, y: Fe },
}

impl Point {
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    pub fn x(&self) -> Option<&Fe> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&Fe> {
        match self {
            Point::Infinity => None,
            Point::Affine { y, .. } => Some(y),
        }
    }
}

/// secp256k1: `a = 0`, `b = 7`, prime `P`, order `N`, generator `G`.
#[derive(Clone, Debug)]
pub struct Curve {
    field: FiniteField<CurveField>,
    b: Fe,
}

impl Default for Curve {
    fn default() -> Self {
        Self::secp256k1()
    }
}

impl Curve {
    pub fn secp256k1() -> Self {
        Curve {
            field: FiniteField::new(),
            b: Fe::from_u64(7),
        }
    }

    pub fn field(&self) -> &FiniteField<CurveField> {
        &self.field
    }

    pub fn order(&self) -> &'static BigUint {
        &N
    }

    pub fn generator(&self) -> &'static Point {
        &GENERATOR
    }

    /// Builds an affine point, rejecting coordinates off the curve.
    pub fn point(&self, x: Fe, y: Fe) -> Result<Point, EccError> {
        let point = Point::Affine { x, y };
        if self.point_on_curve(&point) {
            Ok(point)
        } else {
            Err(EccError::PointNotOnCurve)
        }
    }

    pub fn point_on_curve(&self, pt: &Point) -> bool {
        match pt {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let f = &self.field;
                f.square(y) == f.add(&f.cube(x), &self.b)
            }
        }
    }

    fn checked(&self, pt: Point) -> Point {
        assert!(self.point_on_curve(&pt), "curve operation left the curve");
        pt
    }

    pub fn negate_point(&self, pt: &Point) -> Point {
        match pt {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: self.field.negate(y),
            },
        }
    }

    /// Third point of the line with slope `lambda` through `(x_a, y_a)` and
    /// `x_b`, reflected: `x_R = λ² − x_A − x_B`, `y_R = λ(x_A − x_R) − y_A`.
    fn chord(&self, lambda: &Fe, x_a: &Fe, y_a: &Fe, x_b: &Fe) -> Point {
        let f = &self.field;
        let x_r = f.sub(&f.sub(&f.square(lambda), x_a), x_b);
        let y_r = f.sub(&f.mul(lambda, &f.sub(x_a, &x_r)), y_a);
        self.checked(Point::Affine { x: x_r, y: y_r })
    }

    pub fn point_double(&self, a: &Point) -> Point {
        let Point::Affine { x, y } = a else {
            return Point::Infinity;
        };
        let f = &self.field;
        // Vertical tangent; secp256k1 has no such point but the law still holds.
        let Ok(inv) = f.inverse(&f.add(y, y)) else {
            return Point::Infinity;
        };
        let three_x2 = f.mul(&Fe::from_u64(3), &f.square(x));
        let lambda = f.mul(&three_x2, &inv);
        self.chord(&lambda, x, y, x)
    }

    pub fn point_add(&self, a: &Point, b: &Point) -> Point {
        match (a, b) {
            (Point::Infinity, _) => b.clone(),
            (_, Point::Infinity) => a.clone(),
            (Point::Affine { x: x_a, y: y_a }, Point::Affine { x: x_b, y: y_b }) => {
                if x_a == x_b {
                    return if y_a == y_b {
                        self.point_double(a)
                    } else {
                        Point::Infinity
                    };
                }
                let f = &self.field;
                let Ok(inv) = f.inverse(&f.sub(x_b, x_a)) else {
                    return Point::Infinity;
                };
                let lambda = f.mul(&f.sub(y_b, y_a), &inv);
                self.chord(&lambda, x_a, y_a, x_b)
            }
        }
    }

    /// Double-and-add over the bits of `k`, least significant first.
    pub fn scalar_mult(&self, point: &Point, k: &BigUint) -> Point {
        let bits = k.bits();
        let mut result = Point::Infinity;
        let mut power = point.clone();
        for i in 0..bits {
            if k.bit(i) {
                result = self.point_add(&result, &power);
            }
            if i + 1 < bits {
                power = self.point_double(&power);
            }
        }
        result
    }

    pub fn generator_scalar_mult(&self, k: &BigUint) -> Point {
        self.scalar_mult(&GENERATOR, k)
    }

    /// Recovers the `y` of parity `want_even` for an `x` on the curve.
    pub fn calculate_y_from_x(&self, x: &Fe, want_even: bool) -> Result<Fe, EccError> {
        let f = &self.field;
        let rhs = f.add(&f.cube(x), &self.b);
        let y1 = f.sqrt(&rhs).ok_or(EccError::PointNotOnCurve)?;
        if y1.is_even() == want_even {
            Ok(y1)
        } else {
            Ok(f.negate(&y1))
        }
    }
}
