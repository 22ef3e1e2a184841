//! Per-edge integration with precision escalation, run on a fixed-size pool.

use std::time::Instant;

use rayon::prelude::*;

use super::operator::{ContinuationFailure, DifferentialOperator, Precision, TransitionMatrix};
use crate::error::{Error, Result};
use crate::rational::QComplex;

/// Integration tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegrationCfg {
    /// Initial requested precision in bits.
    pub nbits: u32,
    /// Initial oracle working-precision control.
    pub bounds_prec: u32,
    /// Total oracle attempts per edge.
    pub max_tries: u32,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for IntegrationCfg {
    fn default() -> Self {
        Self {
            nbits: 300,
            bounds_prec: 256,
            max_tries: 5,
            threads: None,
        }
    }
}

impl IntegrationCfg {
    pub fn validate(&self) -> Result<()> {
        if self.nbits == 0 || self.bounds_prec == 0 {
            return Err(Error::PrecisionInvalid(format!(
                "precision must be positive (nbits {}, bounds_prec {})",
                self.nbits, self.bounds_prec
            )));
        }
        if self.max_tries == 0 {
            return Err(Error::PrecisionInvalid("retry budget must allow one attempt".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::PrecisionInvalid("worker pool needs at least one thread".into()));
        }
        Ok(())
    }

    pub fn precision(&self) -> Precision {
        Precision {
            nbits: self.nbits,
            bounds_prec: self.bounds_prec,
        }
    }
}

/// Transition matrix of one decomposition edge in its stored orientation, with
/// its inverse for traversals against that orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratedEdge {
    pub forward: TransitionMatrix,
    pub inverse: TransitionMatrix,
    /// Oracle calls spent (0 for a degenerate edge).
    pub attempts: u32,
}

enum Attempt {
    Failed(ContinuationFailure),
    Singular,
}

fn is_finite(m: &TransitionMatrix) -> bool {
    m.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

/// Integrate edge `index = [a, b]` from `vertices[a]` to `vertices[b]`.
///
/// Identical endpoints give the identity without calling the oracle. Otherwise
/// the oracle gets up to `cfg.max_tries` attempts; after each failed attempt
/// (non-convergence, wrong shape, non-finite or non-invertible matrix) both
/// precision knobs are doubled.
pub fn integrate_edge<L: DifferentialOperator + ?Sized>(
    op: &L,
    vertices: &[QComplex],
    index: usize,
    edge: [usize; 2],
    cfg: &IntegrationCfg,
) -> Result<IntegratedEdge> {
    cfg.validate()?;
    let [a, b] = edge;
    let (Some(start), Some(end)) = (vertices.get(a), vertices.get(b)) else {
        return Err(Error::GeometryDegenerate(format!(
            "edge {index} references a missing vertex"
        )));
    };
    let n = op.order();
    if start == end {
        return Ok(IntegratedEdge {
            forward: TransitionMatrix::identity(n, n),
            inverse: TransitionMatrix::identity(n, n),
            attempts: 0,
        });
    }

    let clock = Instant::now();
    let mut prec = cfg.precision();
    let mut last = Attempt::Singular;
    for attempt in 1..=cfg.max_tries {
        match op.numerical_transition_matrix(start, end, prec) {
            Ok(m) if m.nrows() == n && m.ncols() == n && is_finite(&m) => {
                match m.clone().try_inverse().filter(is_finite) {
                    Some(inverse) => {
                        tracing::info!(
                            edge = index,
                            attempts = attempt,
                            nbits = prec.nbits,
                            elapsed_ms = clock.elapsed().as_millis() as u64,
                            "edge integrated"
                        );
                        return Ok(IntegratedEdge {
                            forward: m,
                            inverse,
                            attempts: attempt,
                        });
                    }
                    None => last = Attempt::Singular,
                }
            }
            Ok(_) => last = Attempt::Singular,
            Err(failure) => last = Attempt::Failed(failure),
        }
        if attempt < cfg.max_tries {
            prec = prec.escalated();
            tracing::info!(
                edge = index,
                attempt,
                nbits = prec.nbits,
                bounds_prec = prec.bounds_prec,
                "increasing precision"
            );
        }
    }

    tracing::error!(edge = index, attempts = cfg.max_tries, "edge integration exhausted its retry budget");
    Err(match last {
        Attempt::Failed(source) => Error::ContinuationFailure {
            edge: index,
            attempts: cfg.max_tries,
            source,
        },
        Attempt::Singular => Error::SingularTransition {
            edge: index,
            attempts: cfg.max_tries,
        },
    })
}

/// Integrate every edge in parallel; the result is indexed like `edges`.
///
/// Runs on a dedicated pool of `cfg.threads` workers. The caller's tracing
/// dispatcher is re-entered in each task. Any failed edge fails the batch; with
/// several failures the lowest edge index is reported.
pub fn integrate_edges<L: DifferentialOperator + ?Sized>(
    op: &L,
    vertices: &[QComplex],
    edges: &[[usize; 2]],
    cfg: &IntegrationCfg,
) -> Result<Vec<IntegratedEdge>> {
    cfg.validate()?;
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = cfg.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    let dispatch = tracing::dispatcher::get_default(|d| d.clone());

    let clock = Instant::now();
    tracing::info!(edges = edges.len(), threads = pool.current_num_threads(), "integrating edges");
    let results: Vec<Result<IntegratedEdge>> = pool.install(|| {
        edges
            .par_iter()
            .enumerate()
            .map(|(index, &edge)| {
                tracing::dispatcher::with_default(&dispatch, || {
                    integrate_edge(op, vertices, index, edge, cfg)
                })
            })
            .collect()
    });
    let integrated = results.into_iter().collect::<Result<Vec<_>>>()?;
    tracing::info!(
        edges = integrated.len(),
        elapsed_ms = clock.elapsed().as_millis() as u64,
        "edge integration finished"
    );
    Ok(integrated)
}
