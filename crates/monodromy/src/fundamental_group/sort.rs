//! Canonical loop order: depth-first over the tree, neighbours by angle.

use super::types::WeightedGraph;
use crate::error::{Error, Result};
use crate::geom2::invert_permutation;
use crate::rational::QComplex;

/// DFS runner carrying the shared context.
struct LoopSorter<'a> {
    vertices: &'a [QComplex],
    graph: &'a WeightedGraph,
    minimal: &'a [Vec<usize>],
    /// Per vertex: `(loop index, first step)` of loops rooted there.
    attached: Vec<Vec<(usize, usize)>>,
    order: Vec<usize>,
}

impl<'a> LoopSorter<'a> {
    /// Graph neighbours of `v` sorted by the argument of the direction vector.
    fn neighbours(&self, v: usize) -> Vec<usize> {
        let mut keyed: Vec<(f64, usize)> = self.graph.adj[v]
            .iter()
            .map(|&w| ((&self.vertices[w] - &self.vertices[v]).arg(), w))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        keyed.into_iter().map(|(_, w)| w).collect()
    }

    fn recur(&mut self, v: usize, parent: Option<usize>) {
        let mut neighbours = self.neighbours(v);
        if let Some(p) = parent {
            if let Some(index) = neighbours.iter().position(|&w| w == p) {
                neighbours.rotate_left(index);
            }
        }
        for child in neighbours {
            if Some(child) != parent && self.minimal[v].contains(&child) {
                self.recur(child, Some(v));
            }
            for k in 0..self.attached[v].len() {
                let (i, step) = self.attached[v][k];
                if step == child {
                    self.order.push(i);
                }
            }
        }
    }
}

/// Canonical permutation of the loops: `order[k]` is the index of the loop placed
/// at position `k`.
///
/// Rooted at vertex 0, the walk visits graph neighbours counter-clockwise by
/// argument (starting from the parent), descends along minimal-tree edges and
/// emits each loop rooted at the current vertex right after the neighbour its
/// walk steps to first.
pub fn sort_loops(
    vertices: &[QComplex],
    graph: &WeightedGraph,
    minimal: &[Vec<usize>],
    loops: &[Vec<usize>],
) -> Result<Vec<usize>> {
    let mut attached = vec![Vec::new(); vertices.len()];
    for (i, walk) in loops.iter().enumerate() {
        if walk.len() < 2 {
            return Err(Error::GeometryDegenerate(format!("loop {i} is empty")));
        }
        attached[walk[0]].push((i, walk[1]));
    }
    let mut sorter = LoopSorter {
        vertices,
        graph,
        minimal,
        attached,
        order: Vec::with_capacity(loops.len()),
    };
    sorter.recur(0, None);
    let order = sorter.order;
    if order.len() != loops.len() || invert_permutation(&order).is_none() {
        return Err(Error::GeometryDegenerate(format!(
            "loop ordering reached {} of {} loops",
            order.len(),
            loops.len()
        )));
    }
    tracing::debug!(?order, "canonical loop order");
    Ok(order)
}
