use super::types::{Polygon, VertexId};
use crate::geometry;
use serde::{Deserialize, Serialize};

/// Base tolerance for angle constraints, in degrees
pub const ANGLE_TOLERANCE_DEGREES: f64 = 0.5;

/// Largest pixel error introduced by rounding a rotated vertex
const ROUNDING_ERROR_PX: f64 = 0.71;

/// Constraint variant without its data, for collision tests and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    VerticalEdge,
    HorizontalEdge,
    Angle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constraint {
    /// Equal X, distinct Y
    VerticalEdge { vertices: [VertexId; 2] },
    /// Equal Y, distinct X
    HorizontalEdge { vertices: [VertexId; 2] },
    /// Angle at `vertices[1]` swept from `vertices[0]` to `vertices[2]`
    Angle {
        vertices: [VertexId; 3],
        target: f64, // degrees, [0, 360)
    },
}

impl Constraint {
    pub fn vertical(v1: VertexId, v2: VertexId) -> Self {
        Constraint::VerticalEdge { vertices: [v1, v2] }
    }

    pub fn horizontal(v1: VertexId, v2: VertexId) -> Self {
        Constraint::HorizontalEdge { vertices: [v1, v2] }
    }

    /// Fix the angle at `middle` to its current value in `polygon`.
    /// `None` if a vertex is missing or an arm has zero length.
    pub fn angle(polygon: &Polygon, v1: VertexId, middle: VertexId, v2: VertexId) -> Option<Self> {
        let target = geometry::angle_between(
            Some(polygon.vertex(v1)?.position()),
            polygon.vertex(middle)?.position(),
            Some(polygon.vertex(v2)?.position()),
        )?;
        Some(Constraint::Angle { vertices: [v1, middle, v2], target })
    }

    pub fn angle_with_target(v1: VertexId, middle: VertexId, v2: VertexId, target: f64) -> Self {
        Constraint::Angle {
            vertices: [v1, middle, v2],
            target: geometry::normalize_degrees(target),
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::VerticalEdge { .. } => ConstraintKind::VerticalEdge,
            Constraint::HorizontalEdge { .. } => ConstraintKind::HorizontalEdge,
            Constraint::Angle { .. } => ConstraintKind::Angle,
        }
    }

    pub fn vertices(&self) -> &[VertexId] {
        match self {
            Constraint::VerticalEdge { vertices } | Constraint::HorizontalEdge { vertices } => vertices.as_slice(),
            Constraint::Angle { vertices, .. } => vertices.as_slice(),
        }
    }

    pub fn involves(&self, vertex: VertexId) -> bool {
        self.vertices().contains(&vertex)
    }

    /// True if every vertex of this constraint is in `group`.
    pub fn is_subset_of(&self, group: &[VertexId]) -> bool {
        self.vertices().iter().all(|v| group.contains(v))
    }

    /// True if a constraint of the same kind already shares a vertex with
    /// this one. Constraints of different kinds may share vertices freely.
    pub fn collides_with(&self, others: &[Constraint]) -> bool {
        others
            .iter()
            .filter(|other| other.kind() == self.kind())
            .any(|other| self.vertices().iter().any(|v| other.involves(*v)))
    }

    /// Whether the current vertex positions satisfy the relation. A constraint
    /// naming a vertex that is no longer in the polygon is never valid.
    pub fn is_valid(&self, polygon: &Polygon) -> bool {
        match self {
            Constraint::VerticalEdge { vertices: [v1, v2] } => match (polygon.vertex(*v1), polygon.vertex(*v2)) {
                (Some(a), Some(b)) => a.x == b.x && a.y != b.y,
                _ => false,
            },
            Constraint::HorizontalEdge { vertices: [v1, v2] } => match (polygon.vertex(*v1), polygon.vertex(*v2)) {
                (Some(a), Some(b)) => a.y == b.y && a.x != b.x,
                _ => false,
            },
            Constraint::Angle { vertices: [v1, middle, v2], target } => {
                let (Some(a), Some(m), Some(b)) = (polygon.vertex(*v1), polygon.vertex(*middle), polygon.vertex(*v2)) else {
                    return false;
                };
                let Some(current) = geometry::angle_between(Some(a.position()), m.position(), Some(b.position())) else {
                    return false;
                };
                let shorter_arm = geometry::distance(a.position(), m.position())
                    .min(geometry::distance(b.position(), m.position()));
                geometry::angular_distance(current, *target) <= angle_tolerance(shorter_arm)
            }
        }
    }

    /// Restore validity by moving one unlocked vertex through
    /// [`Polygon::set_vertex_position`], which in turn repairs the
    /// constraints of the moved vertex. Returns the validity afterwards.
    pub fn try_repair(&self, polygon: &mut Polygon) -> bool {
        if self.is_valid(polygon) {
            return true;
        }

        match *self {
            Constraint::VerticalEdge { vertices: [v1, v2] } => {
                let (Some(a), Some(b)) = (polygon.vertex(v1).copied(), polygon.vertex(v2).copied()) else {
                    return false;
                };
                if a.locked && b.locked {
                    return false;
                }
                if !a.locked {
                    polygon.set_vertex_position(v1, b.x, a.y);
                } else {
                    polygon.set_vertex_position(v2, a.x, b.y);
                }
            }
            Constraint::HorizontalEdge { vertices: [v1, v2] } => {
                let (Some(a), Some(b)) = (polygon.vertex(v1).copied(), polygon.vertex(v2).copied()) else {
                    return false;
                };
                if a.locked && b.locked {
                    return false;
                }
                if !a.locked {
                    polygon.set_vertex_position(v1, a.x, b.y);
                } else {
                    polygon.set_vertex_position(v2, b.x, a.y);
                }
            }
            Constraint::Angle { vertices: [v1, middle, v2], target } => {
                let (Some(a), Some(m), Some(b)) = (
                    polygon.vertex(v1).copied(),
                    polygon.vertex(middle).copied(),
                    polygon.vertex(v2).copied(),
                ) else {
                    return false;
                };
                if a.locked && b.locked {
                    return false;
                }
                let Some(current) = geometry::angle_between(Some(a.position()), m.position(), Some(b.position())) else {
                    return false;
                };

                // Signed shortest rotation from current to target, (-180, 180]
                let mut delta = geometry::normalize_degrees(target - current);
                if delta > 180.0 {
                    delta -= 360.0;
                }

                // Turning the first arm counter-clockwise closes the angle,
                // turning the second arm opens it.
                if !a.locked {
                    let [x, y] = geometry::rotate_about(a.position(), m.position(), -delta);
                    polygon.set_vertex_position(v1, x, y);
                } else {
                    let [x, y] = geometry::rotate_about(b.position(), m.position(), delta);
                    polygon.set_vertex_position(v2, x, y);
                }
            }
        }

        self.is_valid(polygon)
    }
}

fn angle_tolerance(shorter_arm: f64) -> f64 {
    ANGLE_TOLERANCE_DEGREES + (ROUNDING_ERROR_PX / shorter_arm).atan().to_degrees()
}
