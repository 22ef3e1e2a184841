//! Fundamental group generators of the punctured plane.
//!
//! Purpose
//! - Turn the bounded Voronoi decomposition into one closed walk per critical
//!   point, based at the basepoint, in a canonical order suitable for composing
//!   monodromy matrices.
//!
//! Model
//! - Graph: decomposition vertices and edges, weighted by rationalized length.
//! - Tree: Borůvka minimum spanning tree rooted at vertex 0 (the basepoint).
//! - Loops: each region boundary is chained into a closed walk, reoriented
//!   counter-clockwise and rotated to start at its vertex with the fewest tree
//!   hops to the root. The pointed loop is `path[..-1] + loop + rev(path[..-1])`.
//! - Order: DFS from the root over the minimal tree (union of the root paths),
//!   neighbours visited by increasing argument starting after the parent; loops
//!   are emitted right after the neighbour they first step to.
//!
//! Why this design
//! - Ties in the spanning tree are broken by `(weight, min index, max index)`, and
//!   angle ties by vertex index, so the same input always yields the same order.
//!
//! Code cross-refs: `voronoi::decompose`, `geom2::{orientation, invert_permutation}`.

mod graph;
mod group;
mod loops;
mod sort;
mod types;

pub use graph::boruvka;
pub use group::FundamentalGroup;
pub use loops::{minimal_tree, orient_loop, pointed_loop, polygon_to_loop, root_loop};
pub use sort::sort_loops;
pub use types::{SpanningTree, WeightedEdge, WeightedGraph};
