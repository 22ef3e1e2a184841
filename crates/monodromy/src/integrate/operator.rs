//! The differential-operator capability and a closed-form reference operator.

use nalgebra::DMatrix;
use num_complex::Complex64;
use thiserror::Error;

use crate::rational::QComplex;

/// Square complex matrix of dimension `order()`.
pub type TransitionMatrix = DMatrix<Complex64>;

/// Non-convergence reported by a continuation oracle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("analytic continuation did not converge: {reason}")]
pub struct ContinuationFailure {
    pub reason: String,
}

impl ContinuationFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Precision knobs handed to the oracle; both are doubled on every retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Precision {
    /// Requested output precision in bits.
    pub nbits: u32,
    /// Oracle-internal working precision control.
    pub bounds_prec: u32,
}

impl Precision {
    pub fn escalated(self) -> Self {
        Self {
            nbits: self.nbits.saturating_mul(2),
            bounds_prec: self.bounds_prec.saturating_mul(2),
        }
    }
}

/// Linear differential operator that can numerically continue its solutions
/// along a straight segment.
///
/// Implementations are shared read-only between integration workers, so they
/// must be `Sync`; any internal state (counters, caches) needs interior
/// synchronization.
pub trait DifferentialOperator: Sync {
    /// Dimension of the solution space (size of every transition matrix).
    fn order(&self) -> usize;

    /// Transition matrix for continuation from `start` to `end` at `prec`.
    fn numerical_transition_matrix(
        &self,
        start: &QComplex,
        end: &QComplex,
        prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure>;
}

impl<T: DifferentialOperator + ?Sized> DifferentialOperator for &T {
    fn order(&self) -> usize {
        (**self).order()
    }

    fn numerical_transition_matrix(
        &self,
        start: &QComplex,
        end: &QComplex,
        prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        (**self).numerical_transition_matrix(start, end, prec)
    }
}

/// Diagonal Fuchsian system `Y' = diag(Σ_i r_ij / (z - p_i)) Y`.
///
/// Solutions are `Π_i (z - p_i)^{r_ij}`, so continuation along a segment that
/// avoids every pole is `exp(Σ_i r_ij log((end - p_i) / (start - p_i)))` with the
/// principal logarithm, and a loop winding once counter-clockwise around `p_k`
/// has monodromy `diag(exp(2πi r_kj))`. Useful as a reference oracle with known
/// answers.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagonalFuchsian {
    poles: Vec<Complex64>,
    residues: Vec<Vec<Complex64>>,
    order: usize,
}

impl DiagonalFuchsian {
    /// `residues[i]` holds the `order` diagonal residues at `poles[i]`.
    ///
    /// Returns `None` if the residue rows disagree in length or the counts differ.
    pub fn new(poles: Vec<Complex64>, residues: Vec<Vec<Complex64>>) -> Option<Self> {
        let order = residues.first().map_or(1, Vec::len);
        if poles.len() != residues.len() || residues.iter().any(|r| r.len() != order) {
            return None;
        }
        Some(Self {
            poles,
            residues,
            order,
        })
    }

    /// Scalar (order 1) system with one residue per pole.
    pub fn scalar(poles: Vec<Complex64>, residues: Vec<Complex64>) -> Option<Self> {
        Self::new(poles, residues.into_iter().map(|r| vec![r]).collect())
    }

    pub fn poles(&self) -> &[Complex64] {
        &self.poles
    }
}

impl DifferentialOperator for DiagonalFuchsian {
    fn order(&self) -> usize {
        self.order
    }

    fn numerical_transition_matrix(
        &self,
        start: &QComplex,
        end: &QComplex,
        prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        let (a, b) = (start.to_complex(), end.to_complex());
        let seg = b - a;
        let eps = 2f64.powi(-(prec.nbits.min(52) as i32));
        let mut exponents = vec![Complex64::new(0.0, 0.0); self.order];
        for (p, r) in self.poles.iter().zip(&self.residues) {
            // Distance from the pole to the segment.
            let t = if seg.norm_sqr() > 0.0 {
                (((p - a) * seg.conj()).re / seg.norm_sqr()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            if (a + seg * t - p).norm() <= eps * (1.0 + p.norm()) {
                return Err(ContinuationFailure::new(format!(
                    "segment passes through the singularity {p}"
                )));
            }
            let log = ((b - p) / (a - p)).ln();
            for (e, rj) in exponents.iter_mut().zip(r) {
                *e += rj * log;
            }
        }
        Ok(TransitionMatrix::from_diagonal(&nalgebra::DVector::from_iterator(
            self.order,
            exponents.into_iter().map(|e| e.exp()),
        )))
    }
}
