//! Read-only views handed to renderers.

use super::constraint::{Constraint, ConstraintKind};
use super::types::{Polygon, VertexId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexView {
    pub id: VertexId,
    pub x: i32,
    pub y: i32,
    /// Interior angle in degrees, absent at open endpoints
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintView {
    pub kind: ConstraintKind,
    pub vertices: Vec<VertexId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonSnapshot {
    pub vertices: Vec<VertexView>,
    pub edges: Vec<[VertexId; 2]>,
    pub constraints: Vec<ConstraintView>,
    pub is_closed: bool,
    pub is_moveable: bool,
    pub auto_constraints: bool,
}

impl Polygon {
    pub fn snapshot(&self) -> PolygonSnapshot {
        PolygonSnapshot {
            vertices: self
                .vertices()
                .map(|(id, v)| VertexView { id, x: v.x, y: v.y, angle: self.angle_at(id) })
                .collect(),
            edges: self.edges().map(|(a, b)| [a, b]).collect(),
            constraints: self
                .constraints
                .iter()
                .map(|c| ConstraintView {
                    kind: c.kind(),
                    vertices: c.vertices().to_vec(),
                    target: match c {
                        Constraint::Angle { target, .. } => Some(*target),
                        _ => None,
                    },
                    valid: c.is_valid(self),
                })
                .collect(),
            is_closed: self.is_closed,
            is_moveable: self.is_moveable,
            auto_constraints: self.auto_constraints,
        }
    }
}
