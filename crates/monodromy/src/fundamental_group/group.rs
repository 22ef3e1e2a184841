//! `FundamentalGroup`: decomposition, tree, loops and canonical order, built once.

use num_complex::Complex64;
use num_rational::BigRational;

use super::graph::boruvka;
use super::loops::{minimal_tree, orient_loop, pointed_loop, polygon_to_loop, root_loop};
use super::sort::sort_loops;
use super::types::{SpanningTree, WeightedGraph};
use crate::error::{Error, Result};
use crate::geom2::GeomCfg;
use crate::rational::QComplex;
use crate::voronoi::{decompose, Polygon, VoronoiCfg};

/// Generators of the fundamental group of the plane minus the critical points,
/// based at the basepoint, in canonical order.
///
/// Everything is computed eagerly by `new` from immutable input; the accessors
/// only read. Per-loop data (`points`, `qpoints`, `loops`, `paths`,
/// `pointed_loops`) is stored in the canonical order; `order()` maps a canonical
/// position back to the input index.
#[derive(Clone, Debug)]
pub struct FundamentalGroup {
    basepoint: Complex64,
    points: Vec<Complex64>,
    qpoints: Vec<QComplex>,
    prec: BigRational,
    vertices: Vec<QComplex>,
    edges: Vec<[usize; 2]>,
    polygons: Vec<Polygon>,
    graph: WeightedGraph,
    tree: SpanningTree,
    minimal_tree: Vec<Vec<usize>>,
    loops: Vec<Vec<usize>>,
    paths: Vec<Vec<usize>>,
    pointed_loops: Vec<Vec<usize>>,
    order: Vec<usize>,
    uncertain_orientation: Vec<usize>,
}

impl FundamentalGroup {
    /// Decompose, build the spanning tree, extract and sort one loop per critical point.
    pub fn new(
        critical: &[Complex64],
        basepoint: Complex64,
        vcfg: &VoronoiCfg,
        gcfg: &GeomCfg,
    ) -> Result<Self> {
        let span = tracing::info_span!("fundamental_group", points = critical.len());
        let _guard = span.enter();

        let dec = decompose(critical, basepoint, vcfg)?;
        let graph = WeightedGraph::build(&dec.vertices, &dec.edges, &dec.prec)?;
        let tree = boruvka(&graph)?;
        if tree.edges.len() + 1 != graph.num_vertices || !tree.is_connected() {
            return Err(Error::GeometryDegenerate(
                "spanning tree does not reach every vertex".into(),
            ));
        }
        tracing::info!(
            vertices = graph.num_vertices,
            tree_edges = tree.edges.len(),
            "spanning tree"
        );

        let mut loops = Vec::with_capacity(dec.polygons.len());
        let mut paths = Vec::with_capacity(dec.polygons.len());
        let mut uncertain = Vec::new();
        for (i, polygon) in dec.polygons.iter().enumerate() {
            let walk = polygon_to_loop(&polygon.edges)?;
            let (walk, near_degenerate) = orient_loop(walk, &dec.vertices, gcfg)?;
            if near_degenerate {
                uncertain.push(i);
            }
            let (walk, point) = root_loop(&walk, &tree)?;
            let path = tree.path_from_root(point).ok_or_else(|| {
                Error::GeometryDegenerate(format!("no tree path to loop vertex {point}"))
            })?;
            loops.push(walk);
            paths.push(path);
        }
        let minimal = minimal_tree(graph.num_vertices, &paths);
        let order = sort_loops(&dec.vertices, &graph, &minimal, &loops)?;

        let points = order.iter().map(|&i| critical[i]).collect();
        let qpoints = order.iter().map(|&i| dec.qpoints[i + 1].clone()).collect();
        let loops: Vec<Vec<usize>> = order.iter().map(|&i| loops[i].clone()).collect();
        let paths: Vec<Vec<usize>> = order.iter().map(|&i| paths[i].clone()).collect();
        let pointed_loops = paths
            .iter()
            .zip(&loops)
            .map(|(p, l)| pointed_loop(p, l))
            .collect();
        tracing::info!(?order, "loops sorted");

        Ok(Self {
            basepoint,
            points,
            qpoints,
            prec: dec.prec,
            vertices: dec.vertices,
            edges: dec.edges,
            polygons: dec.polygons,
            graph,
            tree,
            minimal_tree: minimal,
            loops,
            paths,
            pointed_loops,
            order,
            uncertain_orientation: uncertain,
        })
    }

    pub fn basepoint(&self) -> Complex64 {
        self.basepoint
    }

    /// Critical points in canonical order.
    pub fn points(&self) -> &[Complex64] {
        &self.points
    }

    /// Rationalized critical points in canonical order.
    pub fn qpoints(&self) -> &[QComplex] {
        &self.qpoints
    }

    /// Rationalization tolerance.
    pub fn prec(&self) -> &BigRational {
        &self.prec
    }

    pub fn vertices(&self) -> &[QComplex] {
        &self.vertices
    }

    /// Decomposition edges; the last one connects the basepoint.
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Region boundaries, in input order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    pub fn tree(&self) -> &SpanningTree {
        &self.tree
    }

    /// Union of the basepoint paths, as adjacency lists.
    pub fn minimal_tree(&self) -> &[Vec<usize>] {
        &self.minimal_tree
    }

    /// Counter-clockwise closed walks, each starting at its vertex nearest the root.
    pub fn loops(&self) -> &[Vec<usize>] {
        &self.loops
    }

    /// Tree paths from the basepoint to each loop's first vertex.
    pub fn paths(&self) -> &[Vec<usize>] {
        &self.paths
    }

    pub fn pointed_loops(&self) -> &[Vec<usize>] {
        &self.pointed_loops
    }

    /// `order()[k]` is the input index of the critical point at canonical position `k`.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Input indices of loops whose orientation test was near-degenerate.
    pub fn uncertain_orientation(&self) -> &[usize] {
        &self.uncertain_orientation
    }

    /// Pointed loops as vertex coordinates.
    pub fn coordinate_paths(&self) -> Vec<Vec<QComplex>> {
        self.pointed_loops
            .iter()
            .map(|l| l.iter().map(|&v| self.vertices[v].clone()).collect())
            .collect()
    }
}
