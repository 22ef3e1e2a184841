//! Basepoint selection left of the critical values.
//!
//! The default basepoint sits on the real axis at `xmin - (xmax - xmin) * shift`,
//! snapped to a simple rational. `choose_basepoint` additionally checks that it
//! keeps half the minimum critical separation from every critical point and
//! otherwise retries with a seeded random imaginary offset.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::rational::{exact, simple_rational_f64, to_f64};

/// Basepoint search parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasepointCfg {
    /// Distance left of the critical values, in units of their real extent.
    pub shift: f64,
    /// Seed of the offset draws.
    pub seed: u64,
    /// Offset draws tried after the default candidate.
    pub max_tries: u32,
}

impl Default for BasepointCfg {
    fn default() -> Self {
        Self {
            shift: 1.0,
            seed: 0x5eed,
            max_tries: 16,
        }
    }
}

fn real_extent(critical: &[Complex64]) -> Result<(f64, f64)> {
    if critical.is_empty() {
        return Err(Error::PrecisionInvalid("no critical points".into()));
    }
    if critical.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(Error::PrecisionInvalid("critical points must be finite".into()));
    }
    let xmin = critical.iter().map(|z| z.re).fold(f64::INFINITY, f64::min);
    let xmax = critical.iter().map(|z| z.re).fold(f64::NEG_INFINITY, f64::max);
    let extent = if xmax > xmin { xmax - xmin } else { 1.0 };
    Ok((xmin, extent))
}

/// `simple_rational(xmin - extent * shift, extent / 10)` on the real axis.
///
/// A zero real extent counts as 1.
pub fn default_basepoint(critical: &[Complex64], shift: f64) -> Result<Complex64> {
    if !(shift.is_finite() && shift > 0.0) {
        return Err(Error::PrecisionInvalid(format!(
            "basepoint shift must be positive, got {shift}"
        )));
    }
    let (xmin, extent) = real_extent(critical)?;
    let re = simple_rational_f64(xmin - extent * shift, &exact(extent / 10.0)?)?;
    Ok(Complex64::new(to_f64(&re), 0.0))
}

/// Default basepoint, moved off the real axis if it comes too close to a critical point.
///
/// "Too close" is under half the minimum pairwise critical separation (or half the
/// real extent for a single point). Offsets are drawn from a `StdRng` seeded with
/// `cfg.seed`, so the choice is reproducible.
pub fn choose_basepoint(critical: &[Complex64], cfg: &BasepointCfg) -> Result<Complex64> {
    let base = default_basepoint(critical, cfg.shift)?;
    let (_, extent) = real_extent(critical)?;
    let mut sep = f64::INFINITY;
    for (i, a) in critical.iter().enumerate() {
        for b in &critical[..i] {
            sep = sep.min((a - b).norm());
        }
    }
    if !sep.is_finite() {
        sep = extent;
    }
    let clear = |z: Complex64| critical.iter().all(|c| (z - c).norm() >= sep / 2.0);
    if clear(base) {
        return Ok(base);
    }

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let tol = exact(extent / 100.0)?;
    for attempt in 0..cfg.max_tries {
        let offset = simple_rational_f64(rng.gen_range(-1.0..1.0) * extent, &tol)?;
        let candidate = Complex64::new(base.re, to_f64(&offset));
        if clear(candidate) {
            tracing::info!(attempt, im = candidate.im, "basepoint moved off the real axis");
            return Ok(candidate);
        }
    }
    Err(Error::PrecisionInvalid(format!(
        "no basepoint clear of the critical points after {} draws",
        cfg.max_tries
    )))
}
