//! Mutation API. Every operation here keeps the constraint list consistent
//! and queues the matching [`PolygonEvent`]s.

use super::constraint::Constraint;
use super::types::{Polygon, PolygonEvent, Vertex, VertexId};
use tracing::debug;

impl Polygon {
    fn alloc_vertex(&mut self, x: i32, y: i32) -> VertexId {
        let id = VertexId(self.slots.len());
        self.slots.push(Some(Vertex::new(x.max(0), y.max(0))));
        id
    }

    /// Append a vertex at the end of the boundary.
    ///
    /// With auto constraints enabled, the new vertex is checked against its
    /// predecessor and, once the polygon is closed, against its successor
    /// (the first vertex): a pair closer than the configured threshold in X
    /// gets a vertical edge constraint, in Y a horizontal one. The new vertex
    /// is the one moved to satisfy them.
    pub fn add_vertex(&mut self, x: i32, y: i32) -> VertexId {
        let id = self.alloc_vertex(x, y);
        self.order.push(id);

        if self.auto_constraints {
            let (prev, next) = self.neighbours(id);
            let next = next.filter(|n| Some(*n) != prev);
            for neighbour in [prev, next].into_iter().flatten() {
                if neighbour != id {
                    self.add_auto_constraints(id, neighbour);
                }
            }
        }

        self.events.push(PolygonEvent::VertexAdded { vertex: id });
        id
    }

    fn add_auto_constraints(&mut self, vertex: VertexId, neighbour: VertexId) {
        let threshold = self.config.auto_constraint_threshold;

        let (Some(a), Some(b)) = (self.vertex(vertex).copied(), self.vertex(neighbour).copied()) else {
            return;
        };
        if (a.x - b.x).abs() < threshold {
            let constraint = Constraint::vertical(vertex, neighbour);
            debug!(%vertex, %neighbour, "Auto vertical edge constraint");
            self.constraints.push(constraint.clone());
            constraint.try_repair(self);
        }

        let (Some(a), Some(b)) = (self.vertex(vertex).copied(), self.vertex(neighbour).copied()) else {
            return;
        };
        if (a.y - b.y).abs() < threshold {
            let constraint = Constraint::horizontal(vertex, neighbour);
            debug!(%vertex, %neighbour, "Auto horizontal edge constraint");
            self.constraints.push(constraint.clone());
            constraint.try_repair(self);
        }
    }

    /// Insert a vertex on the edge between `v1` and `v2`.
    ///
    /// The pair must be adjacent in either order (the closing edge counts once
    /// the polygon is closed); otherwise nothing changes and `None` is
    /// returned. Constraints spanning exactly `{v1, v2}` no longer describe an
    /// edge and are dropped.
    pub fn insert_vertex(&mut self, x: i32, y: i32, v1: VertexId, v2: VertexId) -> Option<VertexId> {
        let index = self
            .edges()
            .position(|(a, b)| (a == v1 && b == v2) || (a == v2 && b == v1))?;

        self.constraints
            .retain(|c| !(c.is_subset_of(&[v1, v2]) && c.involves(v1) && c.involves(v2)));

        let id = self.alloc_vertex(x, y);
        self.order.insert(index + 1, id);
        self.events.push(PolygonEvent::VertexAdded { vertex: id });
        Some(id)
    }

    /// Add a constraint unless it collides with an existing one of the same
    /// kind. It is stored only if it already holds or one repair makes it
    /// hold. Returns whether it was stored.
    pub fn add_constraint(&mut self, constraint: Constraint) -> bool {
        if !constraint.vertices().iter().all(|v| self.contains(*v)) {
            debug!(kind = ?constraint.kind(), "Rejected constraint on unknown vertex");
            return false;
        }

        if constraint.collides_with(&self.constraints) {
            debug!(kind = ?constraint.kind(), "Rejected colliding constraint");
            return false;
        }

        if constraint.is_valid(self) || constraint.try_repair(self) {
            self.constraints.push(constraint);
            true
        } else {
            debug!(kind = ?constraint.kind(), "Discarded unrepairable constraint");
            false
        }
    }

    /// Remove every constraint whose vertices all belong to `group`.
    /// Returns the number removed.
    pub fn remove_constraint(&mut self, group: &[VertexId]) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|c| !c.is_subset_of(group));
        before - self.constraints.len()
    }

    /// Move a vertex and repair the constraints it takes part in.
    ///
    /// Coordinates are clamped to be non-negative. While the update runs the
    /// vertex is locked, so repairs move the other vertex of each constraint.
    /// If any repair fails the vertex returns to its previous position; other
    /// vertices already moved by successful repairs keep their new positions.
    ///
    /// Returns whether the vertex ended up somewhere new.
    pub fn set_vertex_position(&mut self, id: VertexId, x: i32, y: i32) -> bool {
        let Some(vertex) = self.vertex_mut(id) else {
            return false;
        };
        let backup = vertex.position();
        let was_locked = std::mem::replace(&mut vertex.locked, true);
        vertex.x = x.max(0);
        vertex.y = y.max(0);

        // Clone so repairs can borrow the polygon mutably
        let involved: Vec<Constraint> = self.constraints_of(id).cloned().collect();
        for constraint in &involved {
            if constraint.is_valid(self) {
                continue;
            }
            if !constraint.try_repair(self) {
                debug!(vertex = %id, kind = ?constraint.kind(), "Repair failed, rolling back");
                if let Some(vertex) = self.vertex_mut(id) {
                    vertex.x = backup[0];
                    vertex.y = backup[1];
                }
            }
        }

        let Some(vertex) = self.vertex_mut(id) else {
            return false;
        };
        vertex.locked = was_locked;
        let moved = vertex.position() != backup;
        if moved {
            self.events.push(PolygonEvent::VertexMoved { vertex: id });
        }
        moved
    }

    /// Translate the whole polygon, then shift it back so no coordinate is
    /// negative. Returns the translation actually applied, or `None` for a
    /// fixed polygon.
    pub fn move_polygon(&mut self, dx: i32, dy: i32) -> Option<(i32, i32)> {
        if !self.is_moveable {
            return None;
        }

        let mut min_x = 0;
        let mut min_y = 0;
        for id in &self.order {
            if let Some(vertex) = self.slots[id.0].as_mut() {
                vertex.x = vertex.x.saturating_add(dx);
                vertex.y = vertex.y.saturating_add(dy);
                min_x = min_x.min(vertex.x);
                min_y = min_y.min(vertex.y);
            }
        }

        for id in &self.order {
            if let Some(vertex) = self.slots[id.0].as_mut() {
                vertex.x -= min_x;
                vertex.y -= min_y;
            }
        }

        let applied = (dx.saturating_sub(min_x), dy.saturating_sub(min_y));
        self.events.push(PolygonEvent::PolygonMoved { dx: applied.0, dy: applied.1 });
        Some(applied)
    }

    /// Remove the vertex under the point along with its constraints.
    pub fn remove_vertex(&mut self, x: i32, y: i32) -> bool {
        match self.vertex_at(x, y) {
            Some(id) => self.remove_vertex_by_id(id),
            None => false,
        }
    }

    pub fn remove_vertex_by_id(&mut self, id: VertexId) -> bool {
        let Some(index) = self.order.iter().position(|v| *v == id) else {
            return false;
        };
        self.order.remove(index);
        self.slots[id.0] = None;
        self.constraints.retain(|c| !c.involves(id));
        self.events.push(PolygonEvent::VertexRemoved { vertex: id });
        true
    }

    /// Close the polyline. A polygon never reopens.
    pub fn set_closed(&mut self) {
        if !self.is_closed {
            self.is_closed = true;
            self.events.push(PolygonEvent::Closed);
        }
    }
}
