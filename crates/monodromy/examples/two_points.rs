//! Monodromy of a scalar Fuchsian equation around two critical points.
//!
//! Purpose
//! - Show the whole pipeline on a case with a closed-form answer: the loop around
//!   a pole with residue `r` has monodromy `exp(2πi r)`.
//!
//! The fmt subscriber prints the pipeline's info events.

use std::f64::consts::PI;

use monodromy::api::{compute_monodromy, DiagonalFuchsian, FundamentalGroup, MonodromyCfg};
use num_complex::Complex64;

fn main() -> monodromy::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let points = vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.5)];
    let residues = vec![Complex64::new(0.5, 0.0), Complex64::new(1.0 / 3.0, 0.0)];
    let basepoint = Complex64::new(-5.0, 0.0);
    let cfg = MonodromyCfg::default();

    let group = FundamentalGroup::new(&points, basepoint, &cfg.voronoi, &cfg.geom)?;
    println!(
        "vertices={} edges={} order={:?}",
        group.vertices().len(),
        group.edges().len(),
        group.order()
    );
    for (k, path) in group.pointed_loops().iter().enumerate() {
        println!("loop {k} around {}: {:?}", group.points()[k], path);
    }

    let op = DiagonalFuchsian::scalar(points.clone(), residues.clone())
        .ok_or_else(|| monodromy::Error::PrecisionInvalid("residue shape".into()))?;
    let matrices = compute_monodromy(&points, Some(basepoint), &op, &cfg)?;
    for ((p, r), m) in points.iter().zip(&residues).zip(&matrices) {
        let expected = (Complex64::i() * 2.0 * PI * r).exp();
        println!("point {p}: monodromy {} (expected {expected})", m[(0, 0)]);
    }
    Ok(())
}
