//! Basic exact 2D types and tolerances.
//!
//! - `GeomCfg`: numeric thresholds for the (float) diagnostics.
//! - `Hs2`: closed half-plane `n·x <= c` with rational data.
//!
//! Points are `QComplex` values read as `(re, im) = (x, y)`.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::rational::QComplex;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Below this magnitude an orientation determinant is reported as near-degenerate.
    pub eps_orientation: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_orientation: 1e-6,
        }
    }
}

/// Closed half-plane `n · x <= c` (no normalization; exact).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hs2 {
    pub n: QComplex,
    pub c: BigRational,
}

impl Hs2 {
    #[inline]
    pub fn new(n: QComplex, c: BigRational) -> Self {
        Self { n, c }
    }

    /// Points at least as close to `own` as to `other`.
    ///
    /// `None` when the two seeds coincide (no bisector).
    pub fn bisector(own: &QComplex, other: &QComplex) -> Option<Self> {
        let n = other - own;
        if n.re.is_zero() && n.im.is_zero() {
            return None;
        }
        let two = BigRational::from_integer(2.into());
        let c = (other.norm_sqr() - own.norm_sqr()) / two;
        Some(Self { n, c })
    }

    /// Signed slack `n·p - c`; non-positive inside.
    #[inline]
    pub fn eval(&self, p: &QComplex) -> BigRational {
        &self.n.re * &p.re + &self.n.im * &p.im - &self.c
    }

    #[inline]
    pub fn satisfies(&self, p: &QComplex) -> bool {
        !self.eval(p).is_positive()
    }
}
