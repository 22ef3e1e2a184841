use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};
use crate::rational::{simple_rational_f64, to_f64, QComplex};

/// Outcome of a nearest-element query under exact distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closest {
    Unique(usize),
    /// First two indices attaining the minimum.
    Tie(usize, usize),
}

/// Nearest element of `l` to `e` by exact squared modulus; `None` if `l` is empty.
pub fn select_closest_index(l: &[QComplex], e: &QComplex) -> Option<Closest> {
    let mut best: Option<(usize, BigRational)> = None;
    let mut tie: Option<usize> = None;
    for (i, p) in l.iter().enumerate() {
        let d = (p - e).norm_sqr();
        match &best {
            None => best = Some((i, d)),
            Some((_, bd)) => match d.cmp(bd) {
                Ordering::Less => {
                    best = Some((i, d));
                    tie = None;
                }
                Ordering::Equal if tie.is_none() => tie = Some(i),
                _ => {}
            },
        }
    }
    best.map(|(i, _)| match tie {
        Some(j) => Closest::Tie(i, j),
        None => Closest::Unique(i),
    })
}

/// First nearest element of `l` to `e` (ties resolve to the lowest index).
pub fn select_closest(l: &[QComplex], e: &QComplex) -> Option<usize> {
    select_closest_index(l, e).map(|c| match c {
        Closest::Unique(i) | Closest::Tie(i, _) => i,
    })
}

/// Orientation of a cyclic vertex sequence, read at its lowest vertex.
#[derive(Clone, Debug)]
pub struct Orientation {
    pub clockwise: bool,
    /// `det [[1,x_p,y_p],[1,x_s,y_s],[1,x_n,y_n]]` at the lowest vertex `s`.
    pub det: f64,
}

/// Orientation test at the vertex with the smallest `(im, re)`.
///
/// `None` for fewer than three vertices.
pub fn orientation(l: &[QComplex]) -> Option<Orientation> {
    if l.len() < 3 {
        return None;
    }
    let mut i = 0;
    for (k, v) in l.iter().enumerate().skip(1) {
        if (&v.im, &v.re) < (&l[i].im, &l[i].re) {
            i = k;
        }
    }
    let s = &l[i];
    let n = &l[(i + 1) % l.len()];
    let p = &l[(i + l.len() - 1) % l.len()];
    let det = (&s.re - &p.re) * (&n.im - &p.im) - (&n.re - &p.re) * (&s.im - &p.im);
    Some(Orientation {
        clockwise: det.is_negative(),
        det: to_f64(&det),
    })
}

/// True if the cyclic vertex sequence runs clockwise.
pub fn is_clockwise(l: &[QComplex]) -> bool {
    orientation(l).is_some_and(|o| o.clockwise)
}

/// Collapse immediate backtracks (`A, B, A → A`) and repeated vertices until none remain.
///
/// This is free reduction of the walk, so the result is unique and idempotent.
pub fn simplify_path<T: PartialEq + Copy>(path: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(path.len());
    for &v in path {
        if out.last() == Some(&v) {
            continue;
        }
        if out.len() >= 2 && out[out.len() - 2] == v {
            out.pop();
            continue;
        }
        out.push(v);
    }
    out
}

/// Inverse of a permutation of `0..l.len()` given as `l[i] = j`; `None` if `l` is not one.
pub fn invert_permutation(l: &[usize]) -> Option<Vec<usize>> {
    let mut inv = vec![usize::MAX; l.len()];
    for (i, &j) in l.iter().enumerate() {
        if j >= l.len() || inv[j] != usize::MAX {
            return None;
        }
        inv[j] = i;
    }
    Some(inv)
}

/// Point at fraction `x ∈ [0, 1]` of the arc length of a polyline.
///
/// The position inside the hit segment is rationalized to `1e-10`.
pub fn point_along_path(path: &[QComplex], x: f64) -> Result<QComplex> {
    if !(0.0..=1.0).contains(&x) {
        return Err(Error::PrecisionInvalid(format!(
            "path parameter must lie in [0, 1], got {x}"
        )));
    }
    let (first, rest) = path
        .split_first()
        .ok_or_else(|| Error::GeometryDegenerate("cannot parametrize an empty path".into()))?;
    if rest.is_empty() {
        return Ok(first.clone());
    }
    let lengths: Vec<f64> = path.windows(2).map(|w| (&w[1] - &w[0]).abs()).collect();
    let total: f64 = lengths.iter().sum();
    let target = x * total;
    let mut start = 0.0;
    let mut seg = lengths.len() - 1;
    for (k, len) in lengths.iter().enumerate() {
        if target <= start + len {
            seg = k;
            break;
        }
        start += len;
    }
    let len = lengths[seg];
    if len <= 0.0 {
        return Ok(path[seg].clone());
    }
    let tol = BigRational::new(BigInt::one(), BigInt::from(10_000_000_000u64));
    let t = simple_rational_f64(((target - start) / len).clamp(0.0, 1.0), &tol)?;
    let one_minus_t = BigRational::one() - &t;
    let a = path[seg].scale(&one_minus_t);
    let b = path[seg + 1].scale(&t);
    Ok(if t.is_zero() { path[seg].clone() } else { &a + &b })
}
