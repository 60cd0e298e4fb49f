use crate::polygon::{Constraint, ConstraintKind, Polygon, VertexId};

fn triangle() -> (Polygon, VertexId, VertexId, VertexId) {
    let mut polygon = Polygon::default();
    let a = polygon.add_vertex(0, 0);
    let b = polygon.add_vertex(100, 0);
    let c = polygon.add_vertex(100, 100);
    polygon.drain_events();
    (polygon, a, b, c)
}

#[test]
fn test_edges_open_and_closed() {
    let (mut polygon, a, b, c) = triangle();

    let open: Vec<_> = polygon.edges().collect();
    assert_eq!(open, vec![(a, b), (b, c)]);

    polygon.set_closed();
    let closed: Vec<_> = polygon.edges().collect();
    assert_eq!(closed, vec![(a, b), (b, c), (c, a)]);
}

#[test]
fn test_edges_of_empty_and_single_vertex() {
    let mut polygon = Polygon::default();
    assert_eq!(polygon.edges().count(), 0);

    polygon.add_vertex(5, 5);
    assert_eq!(polygon.edges().count(), 0);
}

#[test]
fn test_neighbours() {
    let (mut polygon, a, b, c) = triangle();

    assert_eq!(polygon.neighbours(b), (Some(a), Some(c)));
    assert_eq!(polygon.neighbours(a), (None, Some(b)));
    assert_eq!(polygon.neighbours(c), (Some(b), None));
    assert_eq!(polygon.neighbours(VertexId(42)), (None, None));

    polygon.set_closed();
    assert_eq!(polygon.neighbours(a), (Some(c), Some(b)));
    assert_eq!(polygon.neighbours(c), (Some(b), Some(a)));
}

#[test]
fn test_angle_at() {
    let (mut polygon, a, b, _) = triangle();

    assert!(polygon.angle_at(a).is_none(), "open endpoint has no angle");
    let at_b = polygon.angle_at(b).unwrap();
    // Arms towards (0,0) and (100,100) from (100,0)
    assert!((at_b - 270.0).abs() < 1e-9);

    polygon.set_closed();
    assert!(polygon.angle_at(a).is_some());
}

#[test]
fn test_vertex_at_picks_nearest_within_radius() {
    let mut polygon = Polygon::default();
    let a = polygon.add_vertex(100, 100);
    let b = polygon.add_vertex(106, 100);

    assert_eq!(polygon.vertex_at(102, 100), Some(a));
    assert_eq!(polygon.vertex_at(104, 100), Some(b));
    assert_eq!(polygon.vertex_at(100, 120), None);
}

#[test]
fn test_edge_at() {
    let (mut polygon, a, b, c) = triangle();

    assert_eq!(polygon.edge_at(50, 4), Some((a, b)));
    assert_eq!(polygon.edge_at(96, 60), Some((b, c)));
    assert_eq!(polygon.edge_at(50, 30), None);
    // On the diagonal, which only exists once the polygon is closed
    assert_eq!(polygon.edge_at(50, 52), None);

    polygon.set_closed();
    assert_eq!(polygon.edge_at(50, 52), Some((c, a)));
}

#[test]
fn test_constraints_of() {
    let (mut polygon, a, b, c) = triangle();
    assert!(polygon.add_constraint(Constraint::horizontal(a, b)));
    assert!(polygon.add_constraint(Constraint::vertical(b, c)));

    assert_eq!(polygon.constraints_of(a).count(), 1);
    assert_eq!(polygon.constraints_of(b).count(), 2);
}

#[test]
fn test_snapshot() {
    let (mut polygon, a, b, c) = triangle();
    polygon.set_closed();
    assert!(polygon.add_constraint(Constraint::vertical(b, c)));
    let angle = Constraint::angle(&polygon, a, b, c).unwrap();
    assert!(polygon.add_constraint(angle));

    let snapshot = polygon.snapshot();
    assert_eq!(snapshot.vertices.len(), 3);
    assert_eq!(snapshot.vertices[1].id, b);
    assert_eq!((snapshot.vertices[1].x, snapshot.vertices[1].y), (100, 0));
    assert_eq!(snapshot.edges, vec![[a, b], [b, c], [c, a]]);
    assert_eq!(snapshot.constraints.len(), 2);
    assert_eq!(snapshot.constraints[0].kind, ConstraintKind::VerticalEdge);
    assert!(snapshot.constraints[0].target.is_none());
    assert!(snapshot.constraints[1].target.is_some());
    assert!(snapshot.constraints.iter().all(|c| c.valid));
    assert!(snapshot.is_closed);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["constraints"][0]["kind"], "VerticalEdge");
    assert!(json["constraints"][0].get("target").is_none());
}

#[test]
fn test_snapshot_vertices_hide_lock_state() {
    let (polygon, a, _, _) = triangle();
    let json = serde_json::to_value(polygon.snapshot()).unwrap();
    let vertex = json["vertices"][0].as_object().unwrap();

    assert_eq!(json["vertices"][0]["id"], a.0);
    assert!(!vertex.contains_key("locked"));
    assert!(!polygon.vertex(a).unwrap().locked);
}
