//! Exact 2D geometry helpers.
//!
//! Purpose
//! - Nearest-seed selection, orientation tests and walk simplification used by
//!   the Voronoi decomposition, loop extraction and transition composition.
//! - Exact half-plane clipping (`ConvexCell`) that produces Voronoi cells with
//!   rational corners directly, with no float round trip.
//!
//! Conventions
//! - A `QComplex` is read as the point `(re, im)`.
//! - Distances are compared exactly through squared moduli; floats only appear
//!   in diagnostics (orientation determinant magnitude, angles).

mod clip;
mod types;
mod util;

pub use clip::{ConvexCell, Rect};
pub use types::{GeomCfg, Hs2};
pub use util::{
    invert_permutation, is_clockwise, orientation, point_along_path, select_closest,
    select_closest_index, simplify_path, Closest, Orientation,
};
