use super::constraint::Constraint;
use crate::config::EditorConfig;
use crate::geometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a vertex inside one [`Polygon`].
///
/// Ids are arena indices and are never reused, so two ids are equal only if
/// they name the same vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
    /// Set while a position update on this vertex is in progress, so nested
    /// repairs treat it as the anchor
    pub locked: bool,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, locked: false }
    }

    pub fn position(&self) -> [i32; 2] {
        [self.x, self.y]
    }

    /// Interior angle at `middle` between its neighbours, in degrees `[0, 360)`.
    /// `None` at open polyline endpoints or for zero-length edges.
    pub fn angle_between(prev: Option<&Vertex>, middle: &Vertex, next: Option<&Vertex>) -> Option<f64> {
        geometry::angle_between(prev.map(Vertex::position), middle.position(), next.map(Vertex::position))
    }
}

/// Change notifications for renderers, queued in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PolygonEvent {
    VertexAdded { vertex: VertexId },
    VertexMoved { vertex: VertexId },
    VertexRemoved { vertex: VertexId },
    /// Effective translation after clamping back into the canvas
    PolygonMoved { dx: i32, dy: i32 },
    Closed,
}

#[derive(Debug, Clone)]
pub struct Polygon {
    pub(crate) slots: Vec<Option<Vertex>>,
    pub(crate) order: Vec<VertexId>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) events: Vec<PolygonEvent>,
    pub(crate) config: EditorConfig,
    pub(crate) is_closed: bool,
    pub(crate) is_moveable: bool,
    pub(crate) auto_constraints: bool,
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Polygon {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            constraints: Vec::new(),
            events: Vec::new(),
            config,
            is_closed: false,
            is_moveable: true,
            auto_constraints: false,
        }
    }

    /// A polygon that ignores [`Polygon::move_polygon`].
    pub fn fixed(config: EditorConfig) -> Self {
        Self { is_moveable: false, ..Self::new(config) }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_moveable(&self) -> bool {
        self.is_moveable
    }

    pub fn auto_constraints(&self) -> bool {
        self.auto_constraints
    }

    pub fn set_auto_constraints(&mut self, enabled: bool) {
        self.auto_constraints = enabled;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.vertex(id).is_some()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Vertex ids in boundary order.
    pub fn vertex_ids(&self) -> &[VertexId] {
        &self.order
    }

    /// Vertices in boundary order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.order.iter().filter_map(move |id| self.vertex(*id).map(|v| (*id, v)))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraints_of(&self, id: VertexId) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter().filter(move |c| c.involves(id))
    }

    /// Pending change notifications, oldest first.
    pub fn events(&self) -> &[PolygonEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<PolygonEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Adjacent vertex pairs in boundary order. The closing edge from the last
    /// vertex back to the first is included only once the polygon is closed.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.order.len();
        let count = if self.is_closed { n } else { n.saturating_sub(1) };
        (0..count).map(move |i| (self.order[i], self.order[(i + 1) % n]))
    }

    /// Predecessor and successor of a vertex. Wraps around on a closed
    /// polygon; an open polyline has no predecessor at its first vertex and
    /// no successor at its last.
    pub fn neighbours(&self, id: VertexId) -> (Option<VertexId>, Option<VertexId>) {
        let Some(index) = self.order.iter().position(|v| *v == id) else {
            return (None, None);
        };
        let n = self.order.len();

        let prev = if index > 0 {
            Some(self.order[index - 1])
        } else if self.is_closed {
            Some(self.order[n - 1])
        } else {
            None
        };
        let next = if index + 1 < n {
            Some(self.order[index + 1])
        } else if self.is_closed {
            Some(self.order[0])
        } else {
            None
        };
        (prev, next)
    }

    /// Interior angle at a vertex formed with its neighbours.
    pub fn angle_at(&self, id: VertexId) -> Option<f64> {
        let middle = self.vertex(id)?;
        let (prev, next) = self.neighbours(id);
        Vertex::angle_between(prev.and_then(|p| self.vertex(p)), middle, next.and_then(|n| self.vertex(n)))
    }

    /// Nearest vertex within the configured hit radius of the point.
    pub fn vertex_at(&self, x: i32, y: i32) -> Option<VertexId> {
        let point = [x, y];
        self.vertices()
            .filter(|(_, v)| geometry::is_near(point, v.position(), self.config.vertex_hit_radius))
            .min_by_key(|(_, v)| geometry::distance_squared(point, v.position()))
            .map(|(id, _)| id)
    }

    /// First edge whose segment passes near the point.
    pub fn edge_at(&self, x: i32, y: i32) -> Option<(VertexId, VertexId)> {
        self.edges().find(|(a, b)| {
            match (self.vertex(*a), self.vertex(*b)) {
                (Some(va), Some(vb)) => geometry::is_near_segment(
                    va.position(),
                    vb.position(),
                    [x, y],
                    self.config.edge_hit_distance,
                    self.config.edge_bbox_slack,
                ),
                _ => false,
            }
        })
    }
}
