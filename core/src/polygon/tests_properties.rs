use crate::polygon::{Constraint, Polygon};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = i32> {
    0..2000i32
}

proptest! {
    #[test]
    fn vertical_repair_equalizes_x(x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()) {
        prop_assume!(y1 != y2);
        let mut polygon = Polygon::default();
        let a = polygon.add_vertex(x1, y1);
        let b = polygon.add_vertex(x2, y2);
        let constraint = Constraint::vertical(a, b);

        prop_assert!(constraint.try_repair(&mut polygon));
        prop_assert!(constraint.is_valid(&polygon));
        prop_assert_eq!(polygon.vertex(a).unwrap().x, polygon.vertex(b).unwrap().x);
        prop_assert_eq!(polygon.vertex(a).unwrap().y, y1);
        prop_assert_eq!(polygon.vertex(b).unwrap().y, y2);
    }

    #[test]
    fn horizontal_repair_equalizes_y(x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()) {
        prop_assume!(x1 != x2);
        let mut polygon = Polygon::default();
        let a = polygon.add_vertex(x1, y1);
        let b = polygon.add_vertex(x2, y2);
        let constraint = Constraint::horizontal(a, b);

        prop_assert!(constraint.try_repair(&mut polygon));
        prop_assert_eq!(polygon.vertex(a).unwrap().y, polygon.vertex(b).unwrap().y);
    }

    #[test]
    fn repair_is_idempotent(x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord()) {
        prop_assume!(y1 != y2);
        let mut polygon = Polygon::default();
        let a = polygon.add_vertex(x1, y1);
        let b = polygon.add_vertex(x2, y2);
        let constraint = Constraint::vertical(a, b);
        constraint.try_repair(&mut polygon);

        let before = (*polygon.vertex(a).unwrap(), *polygon.vertex(b).unwrap());
        prop_assert!(constraint.try_repair(&mut polygon));
        prop_assert_eq!(before, (*polygon.vertex(a).unwrap(), *polygon.vertex(b).unwrap()));
    }

    #[test]
    fn move_polygon_preserves_shape_in_bounds(
        points in prop::collection::vec((coord(), coord()), 1..8),
        dx in -3000..3000i32,
        dy in -3000..3000i32,
    ) {
        let mut polygon = Polygon::default();
        for (x, y) in &points {
            polygon.add_vertex(*x, *y);
        }
        let before: Vec<[i32; 2]> = polygon.vertices().map(|(_, v)| v.position()).collect();

        let (ax, ay) = polygon.move_polygon(dx, dy).unwrap();

        for ((_, v), old) in polygon.vertices().zip(&before) {
            prop_assert!(v.x >= 0 && v.y >= 0);
            prop_assert_eq!(v.position(), [old[0] + ax, old[1] + ay]);
        }
    }
}
