//! Bounded Voronoi decomposition around the critical points.
//!
//! Purpose
//! - Cut the plane into one bounded region per critical point and expose the
//!   region boundaries as a deduplicated vertex list plus undirected edges, with
//!   one extra edge tying the basepoint (vertex 0) into the graph.
//!
//! Model
//! - Seeds are the rationalized basepoint and critical points plus evenly spaced
//!   synthetic points on an enlarged bounding rectangle. The synthetic ring keeps
//!   every critical region bounded; the basepoint's own region and the ring's
//!   regions are discarded.
//! - Regions are computed by exact half-plane clipping (`geom2::ConvexCell`), then
//!   every corner is snapped with `simple_rational` to the rationalization
//!   tolerance and deduplicated by exact equality.
//!
//! Code cross-refs: `geom2::{ConvexCell, Hs2, Rect, select_closest_index}`,
//! `rational::{rationalize, simple_rational}`.

mod build;
mod types;

pub use build::{
    assign_regions, bounding_box, boundary_points, decompose, rationalization_tolerance,
    voronoi_cell,
};
pub use types::{Decomposition, Polygon, VoronoiCfg};
