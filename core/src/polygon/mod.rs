//! Constraint-maintaining polygon model.
//!
//! A [`Polygon`] owns an arena of vertices addressed by [`VertexId`] and a list
//! of [`Constraint`]s over them. Every mutation re-validates the constraints
//! touching the moved vertex and repairs them by moving a neighbouring vertex,
//! rolling the edit back when no repair is possible.

pub mod types;
pub mod constraint;
pub mod editing;
pub mod snapshot;

pub use constraint::{Constraint, ConstraintKind};
pub use snapshot::{ConstraintView, PolygonSnapshot, VertexView};
pub use types::{Polygon, PolygonEvent, Vertex, VertexId};


#[cfg(test)]
mod tests_queries;

#[cfg(test)]
mod tests_properties;
