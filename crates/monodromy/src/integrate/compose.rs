//! Loop walks → products of edge transition matrices.

use std::collections::HashMap;

use super::edges::IntegratedEdge;
use super::operator::TransitionMatrix;
use crate::error::{Error, Result};
use crate::geom2::simplify_path;

/// Lookup from a walk step to the decomposition edge it traverses.
#[derive(Clone, Debug, Default)]
pub struct EdgeLookup {
    stored: HashMap<(usize, usize), usize>,
}

impl EdgeLookup {
    pub fn new(edges: &[[usize; 2]]) -> Self {
        let stored = edges
            .iter()
            .enumerate()
            .map(|(k, &[a, b])| ((a, b), k))
            .collect();
        Self { stored }
    }

    /// `(edge index, forward)` for the step `a → b`; `forward` is false when the
    /// step runs against the stored orientation.
    pub fn find(&self, a: usize, b: usize) -> Option<(usize, bool)> {
        if let Some(&k) = self.stored.get(&(a, b)) {
            return Some((k, true));
        }
        self.stored.get(&(b, a)).map(|&k| (k, false))
    }
}

/// Transition matrix along `walk`.
///
/// The walk is first freed of backtracks (`simplify_path`). Each step then
/// premultiplies the running product by the edge matrix, or by its inverse when
/// traversed backwards, so the first step acts first.
pub fn compose_transition(
    walk: &[usize],
    lookup: &EdgeLookup,
    integrated: &[IntegratedEdge],
    order: usize,
) -> Result<TransitionMatrix> {
    let walk = simplify_path(walk);
    let mut product = TransitionMatrix::identity(order, order);
    for step in walk.windows(2) {
        let (a, b) = (step[0], step[1]);
        if a == b {
            continue;
        }
        let (k, forward) = lookup.find(a, b).ok_or_else(|| {
            Error::GeometryDegenerate(format!("walk step {a} -> {b} is not a decomposition edge"))
        })?;
        let edge = integrated.get(k).ok_or_else(|| {
            Error::GeometryDegenerate(format!("no transition matrix for edge {k}"))
        })?;
        let m = if forward { &edge.forward } else { &edge.inverse };
        if m.nrows() != order || m.ncols() != order {
            return Err(Error::GeometryDegenerate(format!(
                "edge {k} matrix is {}x{}, expected {order}x{order}",
                m.nrows(),
                m.ncols()
            )));
        }
        product = m * product;
    }
    Ok(product)
}
