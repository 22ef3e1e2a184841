//! Decomposition construction (tolerance, seeds, regions, vertex/edge lists).

use std::collections::{HashMap, HashSet};

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::types::{Decomposition, Polygon, VoronoiCfg};
use crate::error::{Error, Result};
use crate::geom2::{select_closest, select_closest_index, Closest, ConvexCell, Hs2, Rect};
use crate::rational::{exact, rationalize, simple_rational, QComplex};

/// Tolerance used to rationalize points and region corners.
///
/// With `d` the minimum pairwise distance, returns `simple_rational(d, d/100) / 100`,
/// which stays well below `d/2` so nearest-seed matching survives rationalization.
pub fn rationalization_tolerance(points: &[Complex64]) -> Result<BigRational> {
    if points.len() < 2 {
        return Err(Error::PrecisionInvalid(
            "need a basepoint and at least one critical point".into(),
        ));
    }
    let mut d = f64::INFINITY;
    for i in 0..points.len() {
        for j in 0..i {
            d = d.min((points[i] - points[j]).norm());
        }
    }
    if !d.is_finite() || d <= 0.0 {
        return Err(Error::PrecisionInvalid(format!(
            "input points must be finite and mutually distinct (minimum separation {d})"
        )));
    }
    let hundred = BigRational::from_integer(BigInt::from(100));
    let d = exact(d)?;
    Ok(simple_rational(&d, &(&d / &hundred))? / hundred)
}

/// Rectangle around `critical`, enlarged by `shift` times its extent on each side.
///
/// A zero extent (all points on a horizontal or vertical line) borrows the other
/// extent, or 1 for a single point, centered on the points.
pub fn bounding_box(critical: &[QComplex], shift: &BigRational) -> Result<Rect> {
    let first = critical
        .first()
        .ok_or_else(|| Error::PrecisionInvalid("no critical points".into()))?;
    let mut r = Rect {
        xmin: first.re.clone(),
        xmax: first.re.clone(),
        ymin: first.im.clone(),
        ymax: first.im.clone(),
    };
    for p in &critical[1..] {
        if p.re < r.xmin {
            r.xmin = p.re.clone();
        }
        if p.re > r.xmax {
            r.xmax = p.re.clone();
        }
        if p.im < r.ymin {
            r.ymin = p.im.clone();
        }
        if p.im > r.ymax {
            r.ymax = p.im.clone();
        }
    }
    let (w, h) = (r.width(), r.height());
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let (w, h) = match (w.is_zero(), h.is_zero()) {
        (true, true) => (BigRational::one(), BigRational::one()),
        (true, false) => (h.clone(), h),
        (false, true) => (w.clone(), w),
        (false, false) => (w, h),
    };
    if r.width().is_zero() {
        let half_w = &w * &half;
        r.xmin = &r.xmin - &half_w;
        r.xmax = &r.xmax + &half_w;
    }
    if r.height().is_zero() {
        let half_h = &h * &half;
        r.ymin = &r.ymin - &half_h;
        r.ymax = &r.ymax + &half_h;
    }
    Ok(Rect {
        xmin: &r.xmin - &(shift * &w),
        xmax: &r.xmax + &(shift * &w),
        ymin: &r.ymin - &(shift * &h),
        ymax: &r.ymax + &(shift * &h),
    })
}

/// `4 * border` evenly spaced seeds on the sides of `rect`, corners included.
pub fn boundary_points(rect: &Rect, border: usize) -> Vec<QComplex> {
    let mut out = Vec::with_capacity(4 * border);
    let (w, h) = (rect.width(), rect.height());
    for i in 0..border {
        let step = BigRational::new(BigInt::from(i), BigInt::from(border));
        let dx = &step * &w;
        let dy = &step * &h;
        out.push(QComplex::new(&rect.xmin + &dx, rect.ymax.clone()));
        out.push(QComplex::new(&rect.xmax - &dx, rect.ymin.clone()));
        out.push(QComplex::new(rect.xmin.clone(), &rect.ymin + &dy));
        out.push(QComplex::new(rect.xmax.clone(), &rect.ymax - &dy));
    }
    out
}

/// Seed index owning each center; a tie between seeds is `AssignmentAmbiguous`.
pub fn assign_regions(seeds: &[QComplex], centers: &[QComplex]) -> Result<Vec<usize>> {
    centers
        .iter()
        .enumerate()
        .map(|(k, c)| match select_closest_index(seeds, c) {
            Some(Closest::Unique(i)) => Ok(i),
            Some(Closest::Tie(first, second)) => Err(Error::AssignmentAmbiguous {
                point: k,
                first,
                second,
            }),
            None => Err(Error::GeometryDegenerate("no Voronoi seeds".into())),
        })
        .collect()
}

/// Exact Voronoi region of `seeds[own]`, clipped to `frame`.
///
/// A region reaching the frame belongs to the unbounded part of the diagram and is
/// reported as `GeometryDegenerate`, as is a cell without positive area.
pub fn voronoi_cell(seeds: &[QComplex], own: usize, frame: &Rect) -> Result<ConvexCell> {
    let center = &seeds[own];
    let mut cell = ConvexCell::from_rect(frame);
    for (j, other) in seeds.iter().enumerate() {
        if j == own {
            continue;
        }
        let h = Hs2::bisector(center, other).ok_or_else(|| {
            Error::GeometryDegenerate(format!("seeds {own} and {j} coincide"))
        })?;
        cell.clip(&h);
        if cell.is_empty() {
            break;
        }
    }
    if cell.is_empty()
        || !cell.doubled_area().is_positive()
        || cell.vertices.iter().any(|v| frame.on_boundary(v))
    {
        return Err(Error::GeometryDegenerate(format!(
            "Voronoi region of seed {own} is not a bounded polygon"
        )));
    }
    Ok(cell)
}

/// Running vertex list with exact-equality deduplication.
struct VertexPool {
    vertices: Vec<QComplex>,
    index: HashMap<QComplex, usize>,
}

impl VertexPool {
    fn new(first: QComplex) -> Self {
        let mut index = HashMap::new();
        index.insert(first.clone(), 0);
        Self {
            vertices: vec![first],
            index,
        }
    }

    fn insert(&mut self, v: QComplex) -> usize {
        if let Some(&i) = self.index.get(&v) {
            return i;
        }
        let i = self.vertices.len();
        self.index.insert(v.clone(), i);
        self.vertices.push(v);
        i
    }
}

/// Build the bounded Voronoi decomposition of `critical` with `basepoint` as vertex 0.
pub fn decompose(
    critical: &[Complex64],
    basepoint: Complex64,
    cfg: &VoronoiCfg,
) -> Result<Decomposition> {
    if cfg.border == 0 {
        return Err(Error::PrecisionInvalid("border subdivision must be positive".into()));
    }
    if !cfg.shift.is_positive() {
        return Err(Error::PrecisionInvalid(format!(
            "expansion shift must be positive, got {}",
            cfg.shift
        )));
    }
    let mut all = Vec::with_capacity(critical.len() + 1);
    all.push(basepoint);
    all.extend_from_slice(critical);
    let prec = rationalization_tolerance(&all)?;
    let qpoints = all
        .iter()
        .map(|&z| rationalize(z, &prec))
        .collect::<Result<Vec<_>>>()?;

    let rect = bounding_box(&qpoints[1..], &cfg.shift)?;
    let mut seeds = qpoints.clone();
    seeds.extend(boundary_points(&rect, cfg.border));
    let margin = std::cmp::max(rect.width(), rect.height());
    let frame = rect.grown(&margin);

    let owners = assign_regions(&seeds, &qpoints[1..])?;

    let mut pool = VertexPool::new(QComplex::from_complex(basepoint)?);
    let mut polygons = Vec::with_capacity(critical.len());
    for &own in &owners {
        let cell = voronoi_cell(&seeds, own, &frame)?;
        let mut edges = Vec::with_capacity(cell.vertices.len());
        for (p, q) in cell.edges() {
            let e0 = pool.insert(p.simplify(&prec)?);
            let e1 = pool.insert(q.simplify(&prec)?);
            if e0 != e1 {
                edges.push([e0, e1]);
            }
        }
        tracing::debug!(seed = own, corners = cell.vertices.len(), edges = edges.len(), "voronoi region");
        polygons.push(Polygon {
            seed: own,
            center: seeds[own].clone(),
            edges,
        });
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut edges: Vec<[usize; 2]> = Vec::new();
    for polygon in &polygons {
        for &[a, b] in &polygon.edges {
            if seen.insert((a.min(b), a.max(b))) {
                edges.push([a, b]);
            }
        }
    }
    let vertices = pool.vertices;
    let nearest = select_closest(&vertices[1..], &vertices[0])
        .map(|i| i + 1)
        .ok_or_else(|| Error::GeometryDegenerate("decomposition produced no region corners".into()))?;
    edges.push([0, nearest]);

    tracing::info!(
        points = critical.len(),
        vertices = vertices.len(),
        edges = edges.len(),
        basepoint_neighbour = nearest,
        "voronoi decomposition"
    );
    Ok(Decomposition {
        qpoints,
        prec,
        vertices,
        polygons,
        edges,
    })
}
