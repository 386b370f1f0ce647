// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground reconstruction scenarios on small plans

use approx::assert_relative_eq;
use home3d_core::{Furniture, Level, Plan, Room};
use home3d_geometry::polygon::compute_signed_area;
use home3d_geometry::{
    build_ground, flatten_with_holes, triangulate_polygon, FragmentKind, GroundConfig, Point2,
    Primitive, Rect,
};

fn square(x: f64, y: f64, size: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + size, y),
        Point2::new(x + size, y + size),
        Point2::new(x, y + size),
    ]
}

fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Edges cross at a single interior point of both
fn properly_cross(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    let d1 = orientation(a, b, c);
    let d2 = orientation(a, b, d);
    let d3 = orientation(c, d, a);
    let d4 = orientation(c, d, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

#[test]
fn room_at_ground_level_opens_ground() {
    let level = Level::new(0, "Ground floor", 0.0);
    let plan = Plan::new()
        .with_room(Room::new(
            vec![[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]],
            Some(level.id),
        ))
        .with_level(level);

    let geometry = build_ground(&plan, &GroundConfig::default()).unwrap();
    assert!(geometry.bands.is_empty());
    assert_eq!(geometry.fragments.len(), 1);
    assert_eq!(
        geometry.ground_bounds,
        Rect::new(Point2::new(-5000.0, -5000.0), Point2::new(5400.0, 5300.0))
    );

    let ground = &geometry.fragments[0];
    assert_eq!(ground.kind, FragmentKind::Ground);
    assert_eq!(ground.mesh.primitive, Primitive::Polygons);
    // Outer rectangle and room hole merged in one loop through a bridge
    assert_eq!(ground.mesh.strip_counts, vec![10]);
    assert!(ground.mesh.coords.iter().all(|p| p.y == 0.0));

    let mesh = ground.mesh.triangulate().unwrap();
    let plan_area = 10400.0 * 10300.0 - 400.0 * 300.0;
    assert_relative_eq!(triangles_area(&mesh), plan_area, max_relative = 1e-6);
}

#[test]
fn basement_furniture_digs_band() {
    let basement = Level::new(1, "Basement", -250.0);
    let plan = Plan::new()
        .with_furniture(Furniture::new(250.0, 250.0, 500.0, 500.0, Some(basement.id)))
        .with_level(basement);

    let geometry = build_ground(&plan, &GroundConfig::default()).unwrap();
    assert_eq!(geometry.bands.len(), 1);

    let floors: Vec<_> = geometry.fragments_of(FragmentKind::Floor).collect();
    assert_eq!(floors.len(), 1);
    assert_relative_eq!(floors[0].elevation, -250.0);
    assert_relative_eq!(geometry.bands[0].floor.area(), 250000.0, epsilon = 1e-3);

    let skirts: Vec<_> = geometry.fragments_of(FragmentKind::Skirt).collect();
    assert_eq!(skirts.len(), 1);
    let skirt = &skirts[0].mesh;
    assert_eq!(skirt.primitive, Primitive::Quads);
    assert_eq!(skirt.vertex_count(), 16);
    assert_eq!(skirt.strip_counts, vec![16]);
    for quad in skirt.coords.chunks_exact(4) {
        assert_eq!(quad[0].y, -250.0);
        assert_eq!(quad[1].y, 0.0);
        assert_eq!(quad[2].y, 0.0);
        assert_eq!(quad[3].y, -250.0);
    }

    // The furniture opens the ground
    let ground = geometry.fragments_of(FragmentKind::Ground).next().unwrap();
    assert_eq!(ground.mesh.strip_counts, vec![10]);
    assert!(geometry.removed_from_ground.contains(250.0, 250.0));
    assert_eq!(geometry.fragments_of(FragmentKind::Lid).count(), 0);
}

#[test]
fn two_holes_merge_into_simple_loop() {
    let outer = square(0.0, 0.0, 1000.0);
    let holes = vec![square(100.0, 100.0, 100.0), square(700.0, 700.0, 100.0)];

    let merged = flatten_with_holes(&outer, &holes).unwrap();
    assert_eq!(merged.len(), 16);

    let n = merged.len();
    for i in 0..n {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let crossing = properly_cross(
                merged[i],
                merged[(i + 1) % n],
                merged[j],
                merged[(j + 1) % n],
            );
            assert!(!crossing, "edges {} and {} cross", i, j);
        }
    }

    assert_relative_eq!(compute_signed_area(&merged), 980000.0, max_relative = 1e-9);
    let indices = triangulate_polygon(&merged).unwrap();
    let area: f64 = indices
        .chunks_exact(3)
        .map(|t| orientation(merged[t[0]], merged[t[1]], merged[t[2]]).abs() / 2.0)
        .sum();
    assert_relative_eq!(area, 980000.0, max_relative = 1e-6);
}

#[test]
fn band_floors_never_overlap() {
    let levels = [
        Level::new(1, "Cellar", -200.0),
        Level::new(2, "Garage", -350.0),
        Level::new(3, "Pit", -600.0),
    ];
    let mut plan = Plan::new()
        .with_furniture(Furniture::new(500.0, 500.0, 1000.0, 1000.0, Some(levels[0].id)))
        .with_furniture(Furniture::new(700.0, 700.0, 400.0, 400.0, Some(levels[1].id)))
        .with_furniture(Furniture::new(1000.0, 500.0, 300.0, 300.0, Some(levels[1].id)))
        .with_furniture(Furniture::new(800.0, 800.0, 100.0, 100.0, Some(levels[2].id)));
    for level in levels {
        plan = plan.with_level(level);
    }

    let geometry = build_ground(&plan, &GroundConfig::default()).unwrap();
    let elevations: Vec<f32> = geometry.bands.iter().map(|b| b.elevation).collect();
    assert_eq!(elevations, vec![-200.0, -350.0, -600.0]);

    for (i, upper) in geometry.bands.iter().enumerate() {
        for lower in &geometry.bands[i + 1..] {
            let overlap = upper.floor.intersect(&lower.floor);
            assert!(overlap.area() < 1e-6);
        }
    }

    // Skirt heights follow the drops between consecutive bands
    let heights: Vec<f32> = geometry
        .fragments_of(FragmentKind::Skirt)
        .map(|f| f.height)
        .collect();
    assert_eq!(heights, vec![200.0, 150.0, 250.0]);

    for fragment in &geometry.fragments {
        let mesh = fragment.mesh.triangulate().unwrap();
        assert!(!mesh.is_empty());
    }
}

#[test]
fn empty_plan_fills_padding() {
    let geometry = build_ground(&Plan::new(), &GroundConfig::default()).unwrap();
    assert_eq!(geometry.fragments.len(), 1);
    assert_eq!(geometry.fragments[0].mesh.strip_counts, vec![4]);
    assert_relative_eq!(geometry.ground_bounds.width(), 10000.0);
}

#[test]
fn extent_covering_removed_bounds_has_no_outside_ground() {
    let room = Room::new(
        vec![[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]],
        None,
    );
    let plan = Plan::new().with_room(room);

    let exact = GroundConfig {
        extent: Some(Rect::from_origin(0.0, 0.0, 400.0, 300.0)),
        ..GroundConfig::default()
    };
    let geometry = build_ground(&plan, &exact).unwrap();
    assert_eq!(geometry.fragments_of(FragmentKind::OutsideGround).count(), 0);
    // The room covers the whole extent
    assert!(geometry.fragments.is_empty());

    let wide = GroundConfig {
        extent: Some(Rect::from_origin(-20000.0, -20000.0, 40000.0, 40000.0)),
        ..GroundConfig::default()
    };
    let geometry = build_ground(&plan, &wide).unwrap();
    let kinds: Vec<_> = geometry.fragments.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FragmentKind::OutsideGround, FragmentKind::Ground]);
}

fn triangles_area(mesh: &home3d_geometry::Mesh) -> f64 {
    let vertex = |i: u32| {
        let i = i as usize * 3;
        Point2::new(mesh.positions[i] as f64, mesh.positions[i + 2] as f64)
    };
    mesh.indices
        .chunks_exact(3)
        .map(|t| orientation(vertex(t[0]), vertex(t[1]), vertex(t[2])).abs() / 2.0)
        .sum()
}
