//! Weighted decomposition graph and Borůvka minimum spanning tree.

use num_rational::BigRational;

use super::types::{SpanningTree, WeightedEdge, WeightedGraph};
use crate::error::{Error, Result};
use crate::rational::{simple_rational_f64, QComplex};

impl WeightedGraph {
    /// Graph over `vertices` with one weighted edge per entry of `edges`.
    ///
    /// Weights are Euclidean lengths rationalized to `prec`.
    pub fn build(vertices: &[QComplex], edges: &[[usize; 2]], prec: &BigRational) -> Result<Self> {
        let mut adj = vec![Vec::new(); vertices.len()];
        let mut out = Vec::with_capacity(edges.len());
        for &[u, v] in edges {
            if u >= vertices.len() || v >= vertices.len() {
                return Err(Error::GeometryDegenerate(format!(
                    "edge [{u}, {v}] references a missing vertex"
                )));
            }
            let weight = simple_rational_f64((&vertices[u] - &vertices[v]).abs(), prec)?;
            adj[u].push(v);
            adj[v].push(u);
            out.push(WeightedEdge { u, v, weight });
        }
        Ok(Self {
            num_vertices: vertices.len(),
            edges: out,
            adj,
        })
    }
}

/// Disjoint-set forest with path halving and union by size.
struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }
}

/// Minimum spanning tree by Borůvka rounds.
///
/// Each round every component picks its cheapest outgoing edge under
/// `WeightedEdge::key` (weight, then lowest vertex pair), so ties resolve the same
/// way on every run. A graph that stops merging before one component remains is
/// `GeometryDegenerate`.
pub fn boruvka(g: &WeightedGraph) -> Result<SpanningTree> {
    let n = g.num_vertices;
    let mut uf = UnionFind::new(n);
    let mut chosen: Vec<[usize; 2]> = Vec::with_capacity(n.saturating_sub(1));
    let mut components = n;
    let mut round = 0usize;
    while components > 1 {
        let mut cheapest: Vec<Option<usize>> = vec![None; n];
        for (k, e) in g.edges.iter().enumerate() {
            let (ru, rv) = (uf.find(e.u), uf.find(e.v));
            if ru == rv {
                continue;
            }
            for r in [ru, rv] {
                let better = match cheapest[r] {
                    None => true,
                    Some(b) => e.key() < g.edges[b].key(),
                };
                if better {
                    cheapest[r] = Some(k);
                }
            }
        }
        let mut merged = false;
        for k in cheapest.into_iter().flatten() {
            let e = &g.edges[k];
            if uf.union(e.u, e.v) {
                chosen.push([e.u, e.v]);
                components -= 1;
                merged = true;
            }
        }
        if !merged {
            return Err(Error::GeometryDegenerate(format!(
                "decomposition graph is not connected ({components} components)"
            )));
        }
        round += 1;
        tracing::debug!(round, components, "boruvka round");
    }
    Ok(SpanningTree::from_edges(n, chosen))
}
