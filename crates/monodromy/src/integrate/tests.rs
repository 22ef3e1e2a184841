use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use super::*;
use crate::error::Error;
use crate::fundamental_group::FundamentalGroup;
use crate::geom2::GeomCfg;
use crate::rational::QComplex;
use crate::voronoi::VoronoiCfg;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn q(re: i64, im: i64) -> QComplex {
    QComplex::from_integers(re, im)
}

fn group(points: &[Complex64], basepoint: Complex64) -> FundamentalGroup {
    FundamentalGroup::new(points, basepoint, &VoronoiCfg::default(), &GeomCfg::default()).unwrap()
}

fn scalar(m: &TransitionMatrix) -> Complex64 {
    assert_eq!(m.shape(), (1, 1));
    m[(0, 0)]
}

/// Trivial order-1 operator: every continuation is the identity.
#[derive(Default)]
struct Identity {
    calls: AtomicUsize,
}

impl DifferentialOperator for Identity {
    fn order(&self) -> usize {
        1
    }

    fn numerical_transition_matrix(
        &self,
        _start: &QComplex,
        _end: &QComplex,
        _prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TransitionMatrix::identity(1, 1))
    }
}

/// Fails the very first call, then behaves like `Identity`.
#[derive(Default)]
struct FailOnce {
    calls: AtomicUsize,
    seen: Mutex<Vec<Precision>>,
}

impl DifferentialOperator for FailOnce {
    fn order(&self) -> usize {
        1
    }

    fn numerical_transition_matrix(
        &self,
        _start: &QComplex,
        _end: &QComplex,
        prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        self.seen.lock().unwrap().push(prec);
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ContinuationFailure::new("first call"));
        }
        Ok(TransitionMatrix::identity(1, 1))
    }
}

#[derive(Default)]
struct AlwaysFail {
    calls: AtomicUsize,
}

impl DifferentialOperator for AlwaysFail {
    fn order(&self) -> usize {
        1
    }

    fn numerical_transition_matrix(
        &self,
        _start: &QComplex,
        _end: &QComplex,
        _prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ContinuationFailure::new("diverged"))
    }
}

/// Converges, but to a non-invertible matrix.
struct Singular;

impl DifferentialOperator for Singular {
    fn order(&self) -> usize {
        2
    }

    fn numerical_transition_matrix(
        &self,
        _start: &QComplex,
        _end: &QComplex,
        _prec: Precision,
    ) -> Result<TransitionMatrix, ContinuationFailure> {
        Ok(TransitionMatrix::from_element(2, 2, c(1.0, 0.0)))
    }
}

#[test]
fn degenerate_edge_is_identity_without_oracle_call() {
    let op = Identity::default();
    let e = integrate_edge(&op, &[q(0, 0), q(1, 1)], 3, [1, 1], &IntegrationCfg::default()).unwrap();
    assert_eq!(e.attempts, 0);
    assert_eq!(e.forward, TransitionMatrix::identity(1, 1));
    assert_eq!(op.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn one_failure_costs_exactly_one_retry() {
    let op = FailOnce::default();
    let e = integrate_edge(&op, &[q(0, 0), q(1, 0)], 0, [0, 1], &IntegrationCfg::default()).unwrap();
    assert_eq!(e.attempts, 2);
    assert_eq!(op.calls.load(Ordering::SeqCst), 2);
    let seen = op.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Precision {
                nbits: 300,
                bounds_prec: 256
            },
            Precision {
                nbits: 600,
                bounds_prec: 512
            },
        ]
    );
}

#[test]
fn exhaustion_after_exactly_max_tries() {
    let op = AlwaysFail::default();
    let err = integrate_edge(&op, &[q(0, 0), q(1, 0)], 4, [0, 1], &IntegrationCfg::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ContinuationFailure {
            edge: 4,
            attempts: 5,
            ..
        }
    ));
    assert_eq!(op.calls.load(Ordering::SeqCst), 5);
}

#[test]
fn failed_batch_reports_lowest_edge_and_no_matrices() {
    let op = AlwaysFail::default();
    let cfg = IntegrationCfg {
        max_tries: 3,
        threads: Some(2),
        ..IntegrationCfg::default()
    };
    let vertices = [q(0, 0), q(1, 0), q(1, 1)];
    let result = integrate_edges(&op, &vertices, &[[0, 1], [1, 2], [2, 0]], &cfg);
    assert!(matches!(
        result,
        Err(Error::ContinuationFailure {
            edge: 0,
            attempts: 3,
            ..
        })
    ));
    assert_eq!(op.calls.load(Ordering::SeqCst), 9);
}

#[test]
fn singular_matrices_are_retried_then_fatal() {
    let err = integrate_edge(&Singular, &[q(0, 0), q(1, 0)], 1, [0, 1], &IntegrationCfg::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::SingularTransition {
            edge: 1,
            attempts: 5
        }
    ));
}

#[test]
fn invalid_configuration_is_rejected() {
    let vertices = [q(0, 0), q(1, 0)];
    for cfg in [
        IntegrationCfg {
            max_tries: 0,
            ..IntegrationCfg::default()
        },
        IntegrationCfg {
            nbits: 0,
            ..IntegrationCfg::default()
        },
        IntegrationCfg {
            threads: Some(0),
            ..IntegrationCfg::default()
        },
    ] {
        assert!(matches!(
            integrate_edges(&Identity::default(), &vertices, &[[0, 1]], &cfg),
            Err(Error::PrecisionInvalid(_))
        ));
    }
}

#[test]
fn backwards_steps_use_the_inverse() {
    let lookup = EdgeLookup::new(&[[0, 1]]);
    let edge = IntegratedEdge {
        forward: TransitionMatrix::from_element(1, 1, c(2.0, 0.0)),
        inverse: TransitionMatrix::from_element(1, 1, c(0.5, 0.0)),
        attempts: 1,
    };
    let integrated = [edge];
    assert_eq!(scalar(&compose_transition(&[0, 1], &lookup, &integrated, 1).unwrap()), c(2.0, 0.0));
    assert_eq!(scalar(&compose_transition(&[1, 0], &lookup, &integrated, 1).unwrap()), c(0.5, 0.0));
    // Backtracks cancel before any matrix is looked up.
    assert_eq!(scalar(&compose_transition(&[0, 1, 0], &lookup, &integrated, 1).unwrap()), c(1.0, 0.0));
    assert!(matches!(
        compose_transition(&[0, 2], &lookup, &integrated, 1),
        Err(Error::GeometryDegenerate(_))
    ));
}

#[test]
fn later_steps_premultiply() {
    let one = c(1.0, 0.0);
    let zero = c(0.0, 0.0);
    let a = DMatrix::from_row_slice(2, 2, &[one, one, zero, one]);
    let b = DMatrix::from_row_slice(2, 2, &[one, zero, one, one]);
    let integrated = [
        IntegratedEdge {
            forward: a.clone(),
            inverse: a.clone().try_inverse().unwrap(),
            attempts: 1,
        },
        IntegratedEdge {
            forward: b.clone(),
            inverse: b.clone().try_inverse().unwrap(),
            attempts: 1,
        },
    ];
    let lookup = EdgeLookup::new(&[[0, 1], [1, 2]]);
    let m = compose_transition(&[0, 1, 2], &lookup, &integrated, 2).unwrap();
    assert_eq!(m, &b * &a);
    assert_ne!(m, &a * &b);
}

#[test]
fn two_points_trivial_operator_gives_identities() {
    let g = group(&[c(1.0, 0.0), c(-1.0, 0.0)], c(-5.0, 0.0));
    let mut integrator = Integrator::new(&g, Identity::default(), IntegrationCfg::default()).unwrap();
    let ms = integrator.transition_matrices_in_input_order().unwrap();
    assert_eq!(ms.len(), 2);
    for m in &ms {
        assert_eq!(*m, TransitionMatrix::identity(1, 1));
    }
}

#[test]
fn fuchsian_monodromy_matches_residues() {
    let points = [c(1.0, 0.0), c(-1.0, 0.0), c(0.2, 1.3)];
    let residues = [c(0.25, 0.0), c(0.1, 0.2), c(-1.0 / 3.0, 0.0)];
    let op = DiagonalFuchsian::scalar(points.to_vec(), residues.to_vec()).unwrap();
    let g = group(&points, c(-4.0, 0.1));
    let mut integrator = Integrator::new(&g, op, IntegrationCfg::default()).unwrap();
    let ms = integrator.transition_matrices_in_input_order().unwrap();
    for (m, r) in ms.iter().zip(residues) {
        let want = (Complex64::i() * 2.0 * PI * r).exp();
        assert!((scalar(m) - want).norm() < 1e-9, "{} vs {want}", scalar(m));
    }
    // Canonical order is the input order permuted by `order()`.
    let sorted = integrator.transition_matrices().unwrap().to_vec();
    for (k, &i) in g.order().iter().enumerate() {
        assert_eq!(sorted[k], ms[i]);
    }
}

#[test]
fn diagonal_system_of_order_two() {
    let points = [c(0.0, 0.0), c(1.5, 0.5)];
    let op = DiagonalFuchsian::new(
        points.to_vec(),
        vec![vec![c(0.5, 0.0), c(0.25, 0.0)], vec![c(0.0, 0.0), c(0.75, 0.0)]],
    )
    .unwrap();
    let g = group(&points, c(-3.0, -0.3));
    let mut integrator = Integrator::new(&g, &op, IntegrationCfg::default()).unwrap();
    let ms = integrator.transition_matrices_in_input_order().unwrap();
    let i = Complex64::i();
    let expect = [[c(-1.0, 0.0), i], [c(1.0, 0.0), -i]];
    for (m, want) in ms.iter().zip(expect) {
        assert_eq!(m.shape(), (2, 2));
        assert!((m[(0, 0)] - want[0]).norm() < 1e-9);
        assert!((m[(1, 1)] - want[1]).norm() < 1e-9);
        assert!(m[(0, 1)].norm() < 1e-12 && m[(1, 0)].norm() < 1e-12);
    }
    assert!(DiagonalFuchsian::new(points.to_vec(), vec![vec![c(1.0, 0.0)]]).is_none());
}

#[test]
fn cache_is_reused_until_invalidated() {
    let g = group(&[c(1.0, 0.0), c(-1.0, 0.0)], c(-5.0, 0.0));
    let edges = g.edges().len();
    let mut integrator = Integrator::new(&g, Identity::default(), IntegrationCfg::default()).unwrap();
    fn calls(it: &Integrator<'_, Identity>) -> usize {
        it.operator().calls.load(Ordering::SeqCst)
    }

    integrator.transition_matrices().unwrap();
    assert_eq!(calls(&integrator), edges);
    integrator.transition_matrices().unwrap();
    assert_eq!(calls(&integrator), edges);

    integrator.invalidate(Staleness::Transitions);
    assert!(integrator.has_edges());
    integrator.transition_matrices().unwrap();
    assert_eq!(calls(&integrator), edges);

    integrator.invalidate(Staleness::Edges);
    assert!(!integrator.has_edges());
    integrator.transition_matrices().unwrap();
    assert_eq!(calls(&integrator), 2 * edges);

    integrator.set_precision(64, 64).unwrap();
    integrator.transition_matrices().unwrap();
    assert_eq!(calls(&integrator), 3 * edges);
    assert!(integrator.set_precision(0, 64).is_err());

    let old = integrator.set_operator(Identity::default());
    assert_eq!(old.calls.load(Ordering::SeqCst), 3 * edges);
    assert!(!integrator.has_edges());
}

#[test]
fn failed_integration_leaves_cache_empty() {
    let g = group(&[c(1.0, 0.0), c(-1.0, 0.0)], c(-5.0, 0.0));
    let cfg = IntegrationCfg {
        max_tries: 2,
        ..IntegrationCfg::default()
    };
    let mut integrator = Integrator::new(&g, AlwaysFail::default(), cfg).unwrap();
    assert!(matches!(
        integrator.transition_matrices(),
        Err(Error::ContinuationFailure { edge: 0, attempts: 2, .. })
    ));
    assert!(!integrator.has_edges());
}

#[test]
fn parallel_runs_are_bit_identical() {
    let points = [c(0.3, -0.2), c(-0.7, 0.4), c(0.9, 0.8), c(0.1, 1.1)];
    let residues = [c(0.1, 0.0), c(0.2, 0.1), c(-0.3, 0.0), c(0.05, -0.2)];
    let op = DiagonalFuchsian::scalar(points.to_vec(), residues.to_vec()).unwrap();
    let cfg = IntegrationCfg {
        threads: Some(4),
        ..IntegrationCfg::default()
    };
    let run = || {
        let g = group(&points, c(-3.0, 0.05));
        let mut it = Integrator::new(&g, &op, cfg).unwrap();
        (g.order().to_vec(), it.transition_matrices_in_input_order().unwrap())
    };
    assert_eq!(run(), run());
}

/// Counts events emitted away from the thread that installed the subscriber.
struct OffThreadEvents {
    caller: ThreadId,
    count: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> Layer<S> for OffThreadEvents {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if std::thread::current().id() != self.caller {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn worker_events_reach_the_callers_subscriber() {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(OffThreadEvents {
        caller: std::thread::current().id(),
        count: Arc::clone(&count),
    });
    let cfg = IntegrationCfg {
        threads: Some(2),
        ..IntegrationCfg::default()
    };
    let vertices = [q(0, 0), q(1, 0), q(1, 1), q(0, 1)];
    let edges = [[0, 1], [1, 2], [2, 3], [3, 0]];
    tracing::subscriber::with_default(subscriber, || {
        integrate_edges(&Identity::default(), &vertices, &edges, &cfg).unwrap();
    });
    assert!(count.load(Ordering::SeqCst) >= edges.len());
}
