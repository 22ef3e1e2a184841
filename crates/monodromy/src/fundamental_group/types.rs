//! Data types for the decomposition graph, its spanning tree and loops.

use std::collections::VecDeque;

use num_rational::BigRational;

/// Undirected edge with its rationalized Euclidean length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedEdge {
    pub u: usize,
    pub v: usize,
    pub weight: BigRational,
}

impl WeightedEdge {
    /// Total order used by the spanning tree: weight, then lowest index pair.
    pub fn key(&self) -> (&BigRational, usize, usize) {
        (&self.weight, self.u.min(self.v), self.u.max(self.v))
    }
}

/// Weighted graph over the decomposition vertices.
#[derive(Clone, Debug)]
pub struct WeightedGraph {
    pub num_vertices: usize,
    pub edges: Vec<WeightedEdge>,
    /// Neighbour vertex ids of vertex k, in edge insertion order.
    pub adj: Vec<Vec<usize>>,
}

/// Spanning tree rooted at vertex 0.
#[derive(Clone, Debug)]
pub struct SpanningTree {
    pub edges: Vec<[usize; 2]>,
    pub adj: Vec<Vec<usize>>,
    /// BFS parent towards the root; `None` for the root and unreachable vertices.
    pub parent: Vec<Option<usize>>,
    /// Hop distance to the root; `usize::MAX` if unreachable.
    pub depth: Vec<usize>,
}

impl SpanningTree {
    /// Root the edge set at vertex 0.
    pub fn from_edges(num_vertices: usize, edges: Vec<[usize; 2]>) -> Self {
        let mut adj = vec![Vec::new(); num_vertices];
        for &[a, b] in &edges {
            adj[a].push(b);
            adj[b].push(a);
        }
        let mut parent = vec![None; num_vertices];
        let mut depth = vec![usize::MAX; num_vertices];
        if num_vertices > 0 {
            depth[0] = 0;
            let mut queue = VecDeque::from([0usize]);
            while let Some(v) = queue.pop_front() {
                for &w in &adj[v] {
                    if depth[w] == usize::MAX {
                        depth[w] = depth[v] + 1;
                        parent[w] = Some(v);
                        queue.push_back(w);
                    }
                }
            }
        }
        Self {
            edges,
            adj,
            parent,
            depth,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    /// Every vertex reachable from the root.
    pub fn is_connected(&self) -> bool {
        self.depth.iter().all(|&d| d != usize::MAX)
    }

    /// Hop distance from `v` to the root.
    #[inline]
    pub fn distance_to_root(&self, v: usize) -> usize {
        self.depth[v]
    }

    /// Unique tree path `0 → v`; `None` if `v` is unreachable.
    pub fn path_from_root(&self, v: usize) -> Option<Vec<usize>> {
        if self.depth.get(v).copied()? == usize::MAX {
            return None;
        }
        let mut path = vec![v];
        let mut cur = v;
        while let Some(p) = self.parent[cur] {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }
}
