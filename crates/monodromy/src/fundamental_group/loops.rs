//! Region boundaries → oriented, rooted closed walks → pointed loops.

use std::collections::HashSet;

use super::types::SpanningTree;
use crate::error::{Error, Result};
use crate::geom2::{orientation, GeomCfg};
use crate::rational::QComplex;

/// Chain an unordered boundary edge list into one closed walk `[v0, ..., v0]`.
///
/// Starts from the last edge and repeatedly appends the first remaining edge that
/// touches the current tail. Anything other than a single simple cycle (dangling
/// chain, several cycles, pinched vertex) is `GeometryDegenerate`.
pub fn polygon_to_loop(edges: &[[usize; 2]]) -> Result<Vec<usize>> {
    let not_a_loop = || {
        Error::GeometryDegenerate(
            "polygon is not a single bounded loop, the Voronoi region may be unbounded".into(),
        )
    };
    let mut pool: Vec<[usize; 2]> = edges.to_vec();
    let [a, b] = pool.pop().ok_or_else(not_a_loop)?;
    let mut walk = vec![a, b];
    while !pool.is_empty() {
        let tail = walk[walk.len() - 1];
        let hit = pool
            .iter()
            .position(|e| e[0] == tail || e[1] == tail)
            .ok_or_else(not_a_loop)?;
        let e = pool.remove(hit);
        walk.push(if e[0] == tail { e[1] } else { e[0] });
    }
    if walk.len() < 4 || walk.first() != walk.last() {
        return Err(not_a_loop());
    }
    let distinct: HashSet<usize> = walk[..walk.len() - 1].iter().copied().collect();
    if distinct.len() != walk.len() - 1 {
        return Err(not_a_loop());
    }
    Ok(walk)
}

/// A closed walk `[v0, ..., v0]` over at least three distinct vertices.
fn check_closed(walk: &[usize]) -> Result<()> {
    if walk.len() < 4 || walk.first() != walk.last() {
        return Err(Error::GeometryDegenerate(format!(
            "expected a closed walk over at least three vertices, got {walk:?}"
        )));
    }
    Ok(())
}

/// Reverse a closed walk if it runs clockwise.
///
/// Returns the oriented walk and whether the orientation determinant fell below
/// `cfg.eps_orientation` (kept, but reported). A walk that is not closed or
/// references a missing vertex is `GeometryDegenerate`.
pub fn orient_loop(
    walk: Vec<usize>,
    vertices: &[QComplex],
    cfg: &GeomCfg,
) -> Result<(Vec<usize>, bool)> {
    check_closed(&walk)?;
    let coords = walk[..walk.len() - 1]
        .iter()
        .map(|&v| {
            vertices.get(v).cloned().ok_or_else(|| {
                Error::GeometryDegenerate(format!("loop references missing vertex {v}"))
            })
        })
        .collect::<Result<Vec<QComplex>>>()?;
    let Some(o) = orientation(&coords) else {
        return Ok((walk, true));
    };
    let near_degenerate = o.det.abs() < cfg.eps_orientation;
    if near_degenerate {
        tracing::warn!(det = o.det, "orientation determinant is very small, loop orientation uncertain");
    }
    let walk = if o.clockwise {
        walk.into_iter().rev().collect()
    } else {
        walk
    };
    Ok((walk, near_degenerate))
}

/// Rotate a closed walk so it starts at its vertex closest (in tree hops) to the root.
///
/// Returns the rotated walk and that vertex. Ties keep the first candidate along
/// the walk, scanning from its second entry.
pub fn root_loop(walk: &[usize], tree: &SpanningTree) -> Result<(Vec<usize>, usize)> {
    check_closed(walk)?;
    if let Some(&v) = walk.iter().find(|&&v| v >= tree.num_vertices()) {
        return Err(Error::GeometryDegenerate(format!(
            "loop vertex {v} is not in the spanning tree"
        )));
    }
    let point = walk[1..]
        .iter()
        .copied()
        .min_by_key(|&v| tree.distance_to_root(v))
        .ok_or_else(|| Error::GeometryDegenerate("empty loop".into()))?;
    if tree.distance_to_root(point) == usize::MAX {
        return Err(Error::GeometryDegenerate(format!(
            "loop vertex {point} is not connected to the basepoint"
        )));
    }
    let index = walk.iter().position(|&v| v == point).unwrap_or(0);
    if index == 0 {
        return Ok((walk.to_vec(), point));
    }
    let mut rotated = Vec::with_capacity(walk.len());
    rotated.extend_from_slice(&walk[index..walk.len() - 1]);
    rotated.extend_from_slice(&walk[..index]);
    rotated.push(walk[index]);
    Ok((rotated, point))
}

/// `path[..-1] + loop + reverse(path[..-1])`: a loop based at the basepoint.
pub fn pointed_loop(path: &[usize], walk: &[usize]) -> Vec<usize> {
    let stem = &path[..path.len().saturating_sub(1)];
    let mut out = Vec::with_capacity(2 * stem.len() + walk.len());
    out.extend_from_slice(stem);
    out.extend_from_slice(walk);
    out.extend(stem.iter().rev());
    out
}

/// Union of the root paths, as an adjacency list (subgraph of the spanning tree).
pub fn minimal_tree(num_vertices: usize, paths: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut adj = vec![Vec::new(); num_vertices];
    for path in paths {
        for w in path.windows(2) {
            let (a, b) = (w[0], w[1]);
            if seen.insert((a.min(b), a.max(b))) {
                adj[a].push(b);
                adj[b].push(a);
            }
        }
    }
    adj
}
