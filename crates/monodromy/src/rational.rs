//! Exact rational coordinates and continued-fraction approximation.
//!
//! - `simple_rational`: the first continued-fraction convergent within a tolerance.
//! - `QComplex`: complex number with `BigRational` parts; all decomposition
//!   vertices live here so that deduplication is exact equality.
//!
//! Floats are converted with `BigRational::from_float`, which is exact. The
//! expansion of an exact rational is finite, so the approximation loop always
//! terminates once the tolerance is positive.

use std::ops::{Add, Mul, Sub};

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Complex number with exact rational real and imaginary parts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QComplex {
    pub re: BigRational,
    pub im: BigRational,
}

impl QComplex {
    #[inline]
    pub fn new(re: BigRational, im: BigRational) -> Self {
        Self { re, im }
    }

    /// Convenience constructor for integer coordinates.
    pub fn from_integers(re: i64, im: i64) -> Self {
        Self {
            re: BigRational::from_integer(BigInt::from(re)),
            im: BigRational::from_integer(BigInt::from(im)),
        }
    }

    /// Exact conversion of a finite float pair.
    pub fn from_complex(z: Complex64) -> Result<Self> {
        Ok(Self {
            re: exact(z.re)?,
            im: exact(z.im)?,
        })
    }

    pub fn zero() -> Self {
        Self {
            re: BigRational::zero(),
            im: BigRational::zero(),
        }
    }

    /// Nearest `f64` pair (used for oracle inputs, angles and diagnostics).
    pub fn to_complex(&self) -> Complex64 {
        Complex64::new(to_f64(&self.re), to_f64(&self.im))
    }

    /// Squared modulus, exact.
    pub fn norm_sqr(&self) -> BigRational {
        &self.re * &self.re + &self.im * &self.im
    }

    /// Modulus as a float.
    pub fn abs(&self) -> f64 {
        self.to_complex().norm()
    }

    /// Argument in `(-π, π]`.
    pub fn arg(&self) -> f64 {
        to_f64(&self.im).atan2(to_f64(&self.re))
    }

    /// Replace both parts by their `simple_rational` approximations.
    pub fn simplify(&self, tolerance: &BigRational) -> Result<Self> {
        Ok(Self {
            re: simple_rational(&self.re, tolerance)?,
            im: simple_rational(&self.im, tolerance)?,
        })
    }

    /// Scale both parts by a rational.
    pub fn scale(&self, s: &BigRational) -> Self {
        Self {
            re: &self.re * s,
            im: &self.im * s,
        }
    }
}

impl<'a> Sub<&'a QComplex> for &'a QComplex {
    type Output = QComplex;
    fn sub(self, rhs: &'a QComplex) -> QComplex {
        QComplex {
            re: &self.re - &rhs.re,
            im: &self.im - &rhs.im,
        }
    }
}

impl<'a> Add<&'a QComplex> for &'a QComplex {
    type Output = QComplex;
    fn add(self, rhs: &'a QComplex) -> QComplex {
        QComplex {
            re: &self.re + &rhs.re,
            im: &self.im + &rhs.im,
        }
    }
}

impl<'a> Mul<&'a QComplex> for &'a QComplex {
    type Output = QComplex;
    fn mul(self, rhs: &'a QComplex) -> QComplex {
        QComplex {
            re: &self.re * &rhs.re - &self.im * &rhs.im,
            im: &self.re * &rhs.im + &self.im * &rhs.re,
        }
    }
}

/// Nearest float of a rational; NaN only if the conversion is impossible.
#[inline]
pub fn to_f64(q: &BigRational) -> f64 {
    q.to_f64().unwrap_or(f64::NAN)
}

/// Exact rational value of a finite float.
pub fn exact(value: f64) -> Result<BigRational> {
    BigRational::from_float(value)
        .ok_or_else(|| Error::PrecisionInvalid(format!("cannot rationalize non-finite value {value}")))
}

/// Rational `q` with `|value - q| <= tolerance`: the first continued-fraction
/// convergent of `value` that is close enough.
///
/// Fails with `PrecisionInvalid` when `tolerance <= 0`.
pub fn simple_rational(value: &BigRational, tolerance: &BigRational) -> Result<BigRational> {
    if !tolerance.is_positive() {
        return Err(Error::PrecisionInvalid(format!(
            "rational approximation needs a positive tolerance, got {tolerance}"
        )));
    }
    let a0 = value.floor();
    let mut frac = value - &a0;
    // Convergent recurrence h_n = a_n h_{n-1} + h_{n-2}, same for k.
    let (mut h_prev, mut h) = (BigInt::one(), a0.to_integer());
    let (mut k_prev, mut k) = (BigInt::zero(), BigInt::one());
    let mut terms = vec![a0.to_integer()];
    loop {
        let q = BigRational::new(h.clone(), k.clone());
        if (value - &q).abs() <= *tolerance || frac.is_zero() {
            debug_assert_eq!(evaluate_continued_fraction(&terms).as_ref(), Some(&q));
            return Ok(q);
        }
        let x = frac.recip();
        let a = x.floor();
        frac = &x - &a;
        let a = a.to_integer();
        terms.push(a.clone());
        let h_next = &a * &h + &h_prev;
        let k_next = &a * &k + &k_prev;
        h_prev = std::mem::replace(&mut h, h_next);
        k_prev = std::mem::replace(&mut k, k_next);
    }
}

/// `simple_rational` for a float input.
pub fn simple_rational_f64(value: f64, tolerance: &BigRational) -> Result<BigRational> {
    simple_rational(&exact(value)?, tolerance)
}

/// Evaluate `[a0; a1, a2, ...] = a0 + 1/(a1 + 1/(a2 + ...))`.
///
/// `None` for an empty expansion or a zero partial quotient in the tail.
pub fn evaluate_continued_fraction(terms: &[BigInt]) -> Option<BigRational> {
    let (last, rest) = terms.split_last()?;
    let mut acc = BigRational::from_integer(last.clone());
    for a in rest.iter().rev() {
        if acc.is_zero() {
            return None;
        }
        acc = BigRational::from_integer(a.clone()) + acc.recip();
    }
    Some(acc)
}

/// Rationalize a complex float part by part.
pub fn rationalize(z: Complex64, tolerance: &BigRational) -> Result<QComplex> {
    Ok(QComplex {
        re: simple_rational_f64(z.re, tolerance)?,
        im: simple_rational_f64(z.im, tolerance)?,
    })
}
