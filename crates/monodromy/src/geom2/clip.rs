//! Exact convex polygon clipped by half-planes (one Voronoi cell at a time).
//!
//! A cell starts as an axis-aligned rectangle and is cut by the bisector of its
//! seed with every other seed (Sutherland–Hodgman on a convex polygon). All
//! arithmetic is rational, so a corner shared by two cells comes out bit-equal
//! from both computations.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::types::Hs2;
use crate::rational::QComplex;

/// Axis-aligned rectangle `[xmin, xmax] × [ymin, ymax]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub xmin: BigRational,
    pub xmax: BigRational,
    pub ymin: BigRational,
    pub ymax: BigRational,
}

impl Rect {
    /// True if `p` lies on one of the four sides.
    pub fn on_boundary(&self, p: &QComplex) -> bool {
        p.re == self.xmin || p.re == self.xmax || p.im == self.ymin || p.im == self.ymax
    }

    /// Grow by `margin` on every side.
    pub fn grown(&self, margin: &BigRational) -> Rect {
        Rect {
            xmin: &self.xmin - margin,
            xmax: &self.xmax + margin,
            ymin: &self.ymin - margin,
            ymax: &self.ymax + margin,
        }
    }

    pub fn width(&self) -> BigRational {
        &self.xmax - &self.xmin
    }

    pub fn height(&self) -> BigRational {
        &self.ymax - &self.ymin
    }
}

/// Convex polygon, counter-clockwise, without repeated consecutive vertices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvexCell {
    pub vertices: Vec<QComplex>,
}

impl ConvexCell {
    pub fn from_rect(r: &Rect) -> Self {
        Self {
            vertices: vec![
                QComplex::new(r.xmin.clone(), r.ymin.clone()),
                QComplex::new(r.xmax.clone(), r.ymin.clone()),
                QComplex::new(r.xmax.clone(), r.ymax.clone()),
                QComplex::new(r.xmin.clone(), r.ymax.clone()),
            ],
        }
    }

    /// Fewer than three distinct corners left.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Intersect with `h` in place.
    pub fn clip(&mut self, h: &Hs2) {
        let n = self.vertices.len();
        if n == 0 {
            return;
        }
        let slack: Vec<BigRational> = self.vertices.iter().map(|p| h.eval(p)).collect();
        if slack.iter().all(|s| !s.is_positive()) {
            return;
        }
        let mut out: Vec<QComplex> = Vec::with_capacity(n + 1);
        for k in 0..n {
            let (p, q) = (&self.vertices[k], &self.vertices[(k + 1) % n]);
            let (sp, sq) = (&slack[k], &slack[(k + 1) % n]);
            if !sp.is_positive() {
                push_distinct(&mut out, p.clone());
            }
            let crosses = (sp.is_negative() && sq.is_positive()) || (sp.is_positive() && sq.is_negative());
            if crosses {
                let t = sp / (sp - sq);
                let dir = q - p;
                push_distinct(&mut out, p + &dir.scale(&t));
            }
        }
        if out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        self.vertices = out;
    }

    /// Boundary edges `(v_k, v_{k+1})`, cyclically.
    pub fn edges(&self) -> impl Iterator<Item = (&QComplex, &QComplex)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (&self.vertices[k], &self.vertices[(k + 1) % n]))
    }

    /// Twice the signed area (positive for counter-clockwise order).
    pub fn doubled_area(&self) -> BigRational {
        let mut acc = BigRational::zero();
        for (p, q) in self.edges() {
            acc += &p.re * &q.im - &q.re * &p.im;
        }
        acc
    }
}

fn push_distinct(out: &mut Vec<QComplex>, p: QComplex) {
    if out.last() != Some(&p) {
        out.push(p);
    }
}
