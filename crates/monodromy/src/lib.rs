//! Fundamental-group generators of a punctured plane and the monodromy of a
//! linear differential operator along them.
//!
//! Pipeline
//! - `voronoi`: bounded Voronoi decomposition of the critical points, exact rationals.
//! - `fundamental_group`: spanning tree, one pointed loop per critical point,
//!   canonical loop order.
//! - `integrate`: parallel per-edge continuation with precision escalation,
//!   composition into one transition matrix per loop, cached.
//!
//! API Policy
//! - Modules are public for experiments; `api` is the curated surface.
//! - No global logger: events go to the caller's `tracing` subscriber.

pub mod api;
pub mod basepoint;
pub mod error;
pub mod fundamental_group;
pub mod geom2;
pub mod integrate;
pub mod rational;
pub mod voronoi;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use num_complex::Complex64;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::api::{compute_monodromy, MonodromyCfg};
    pub use crate::fundamental_group::FundamentalGroup;
    pub use crate::integrate::{
        DifferentialOperator, IntegrationCfg, Integrator, Precision, TransitionMatrix,
    };
    pub use crate::rational::QComplex;
    pub use crate::voronoi::VoronoiCfg;
    pub use crate::{Error, Result};
    pub use num_complex::Complex64;
}
