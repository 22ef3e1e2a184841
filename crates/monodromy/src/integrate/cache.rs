//! `Integrator`: lazily cached edge matrices and loop transitions.

use super::compose::{compose_transition, EdgeLookup};
use super::edges::{integrate_edges, IntegratedEdge, IntegrationCfg};
use super::operator::{DifferentialOperator, TransitionMatrix};
use crate::error::{Error, Result};
use crate::fundamental_group::FundamentalGroup;
use crate::geom2::invert_permutation;

/// What became stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Staleness {
    /// Composed loop matrices only; edge matrices are kept.
    Transitions,
    /// Edge matrices and everything composed from them.
    Edges,
}

/// Monodromy of `operator` along the generators of `group`.
///
/// Edge matrices are integrated on first use and kept until invalidated;
/// changing the operator or the precision invalidates them.
pub struct Integrator<'g, L> {
    group: &'g FundamentalGroup,
    operator: L,
    cfg: IntegrationCfg,
    lookup: EdgeLookup,
    edges: Option<Vec<IntegratedEdge>>,
    transitions: Option<Vec<TransitionMatrix>>,
}

impl<'g, L: DifferentialOperator> Integrator<'g, L> {
    pub fn new(group: &'g FundamentalGroup, operator: L, cfg: IntegrationCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            group,
            operator,
            cfg,
            lookup: EdgeLookup::new(group.edges()),
            edges: None,
            transitions: None,
        })
    }

    pub fn group(&self) -> &FundamentalGroup {
        self.group
    }

    pub fn operator(&self) -> &L {
        &self.operator
    }

    pub fn cfg(&self) -> &IntegrationCfg {
        &self.cfg
    }

    /// Whether edge matrices are currently cached.
    pub fn has_edges(&self) -> bool {
        self.edges.is_some()
    }

    /// Edge matrices, indexed like `group.edges()`.
    pub fn integrated_edges(&mut self) -> Result<&[IntegratedEdge]> {
        let edges = match self.edges.take() {
            Some(edges) => edges,
            None => integrate_edges(
                &self.operator,
                self.group.vertices(),
                self.group.edges(),
                &self.cfg,
            )?,
        };
        Ok(self.edges.insert(edges).as_slice())
    }

    /// One matrix per pointed loop, in canonical order.
    pub fn transition_matrices(&mut self) -> Result<&[TransitionMatrix]> {
        let transitions = match self.transitions.take() {
            Some(t) => t,
            None => {
                self.integrated_edges()?;
                let integrated = self.edges.as_deref().unwrap_or_default();
                let order = self.operator.order();
                let composed = self
                    .group
                    .pointed_loops()
                    .iter()
                    .map(|walk| compose_transition(walk, &self.lookup, integrated, order))
                    .collect::<Result<Vec<_>>>()?;
                tracing::info!(loops = composed.len(), order, "transition matrices composed");
                composed
            }
        };
        Ok(self.transitions.insert(transitions).as_slice())
    }

    /// One matrix per critical point, in the order the points were given.
    pub fn transition_matrices_in_input_order(&mut self) -> Result<Vec<TransitionMatrix>> {
        let inverse = invert_permutation(self.group.order()).ok_or_else(|| {
            Error::GeometryDegenerate("loop order is not a permutation".into())
        })?;
        let sorted = self.transition_matrices()?;
        Ok(inverse.iter().map(|&k| sorted[k].clone()).collect())
    }

    pub fn invalidate(&mut self, what: Staleness) {
        tracing::debug!(?what, "transition cache invalidated");
        self.transitions = None;
        if what == Staleness::Edges {
            self.edges = None;
        }
    }

    /// Swap the operator, returning the previous one.
    pub fn set_operator(&mut self, operator: L) -> L {
        self.invalidate(Staleness::Edges);
        std::mem::replace(&mut self.operator, operator)
    }

    pub fn set_precision(&mut self, nbits: u32, bounds_prec: u32) -> Result<()> {
        let cfg = IntegrationCfg {
            nbits,
            bounds_prec,
            ..self.cfg
        };
        cfg.validate()?;
        self.cfg = cfg;
        self.invalidate(Staleness::Edges);
        Ok(())
    }
}
