//! Data types for the decomposition. Kept small so `build` reads top to bottom.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::rational::QComplex;

/// Decomposition parameters.
#[derive(Clone, Debug)]
pub struct VoronoiCfg {
    /// Bounding rectangle grows by `shift` times its extent on every side.
    pub shift: BigRational,
    /// Synthetic seeds per rectangle side.
    pub border: usize,
}

impl Default for VoronoiCfg {
    fn default() -> Self {
        Self {
            shift: BigRational::from_integer(BigInt::from(1)),
            border: 5,
        }
    }
}

/// Boundary of one critical region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    /// Index of the region's seed in the seed list (basepoint = 0, critical points 1..).
    pub seed: usize,
    /// Rationalized seed coordinate.
    pub center: QComplex,
    /// Undirected boundary edges as vertex index pairs, in no guaranteed order.
    pub edges: Vec<[usize; 2]>,
}

/// Output of `decompose`.
#[derive(Clone, Debug)]
pub struct Decomposition {
    /// Rationalized `[basepoint, critical...]`.
    pub qpoints: Vec<QComplex>,
    /// Rationalization tolerance.
    pub prec: BigRational,
    /// Vertex 0 is the basepoint; the rest are snapped region corners.
    pub vertices: Vec<QComplex>,
    /// One polygon per critical point, in input order.
    pub polygons: Vec<Polygon>,
    /// Region edges without duplicates in either orientation; the last entry is
    /// `[0, nearest]`, the basepoint connection.
    pub edges: Vec<[usize; 2]>,
}

impl Decomposition {
    /// Index of the basepoint connection edge.
    pub fn basepoint_edge(&self) -> usize {
        self.edges.len() - 1
    }
}
