// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end rebuild tests

use approx::assert_relative_eq;
use home3d_core::{Furniture, Level, LevelId, Plan, Room};
use home3d_geometry::TextureMapping;
use home3d_processing::{
    rebuild_ground, rebuild_ground_json, Config, Error, FragmentKindData, GroundData,
    GroundRebuilder,
};

fn config() -> Config {
    Config {
        ground_padding: 5000.0,
        flatness: 1.0,
        ground_extent: None,
        ground_texture: None,
    }
}

fn basement_plan() -> Plan {
    let basement = Level::new(1, "Basement", -250.0);
    Plan::new()
        .with_furniture(Furniture::new(250.0, 250.0, 500.0, 500.0, Some(basement.id)))
        .with_level(basement)
}

#[test]
fn test_rebuild_basement() {
    let data = rebuild_ground(&basement_plan(), &config()).unwrap();

    assert_eq!(data.band_elevations, vec![-250.0]);
    assert_eq!(data.stats.band_count, 1);
    assert_eq!(data.stats.fragment_count, data.fragments.len());

    let kinds: Vec<FragmentKindData> = data.fragments.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FragmentKindData::Ground,
            FragmentKindData::Floor,
            FragmentKindData::Skirt
        ]
    );

    let skirt = data.fragments_of(FragmentKindData::Skirt).next().unwrap();
    assert_relative_eq!(skirt.height, 250.0);
    assert_eq!(skirt.levels, vec![1]);
    // 4 quads, 2 triangles each
    assert_eq!(skirt.triangle_count(), 8);

    // Floor triangles face up
    let floor = data.fragments_of(FragmentKindData::Floor).next().unwrap();
    assert!(!floor.is_empty());
    for normal in floor.normals.chunks_exact(3) {
        assert_relative_eq!(normal[1], 1.0);
    }
    for y in floor.positions.iter().skip(1).step_by(3) {
        assert_relative_eq!(*y, -250.0);
    }
}

#[test]
fn test_rebuild_with_texture_and_extent() {
    let config = Config {
        ground_extent: Some([-10000.0, -10000.0, 20000.0, 20000.0]),
        ground_texture: Some(TextureMapping::new(200.0, 200.0)),
        ..config()
    };
    let data = rebuild_ground(&basement_plan(), &config).unwrap();

    assert_eq!(data.fragments_of(FragmentKindData::OutsideGround).count(), 1);
    assert_eq!(data.ground_bounds, [-5000.0, -5000.0, 5500.0, 5500.0]);
    for fragment in &data.fragments {
        assert_eq!(fragment.uvs.len() / 2, fragment.vertex_count());
    }
}

#[test]
fn test_invalid_plan_is_an_error() {
    let plan = Plan::new().with_room(Room::new(
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        Some(LevelId(3)),
    ));
    let error = rebuild_ground(&plan, &config()).unwrap_err();
    assert!(matches!(error, Error::Core(_)));

    let config = Config {
        flatness: -1.0,
        ..config()
    };
    let error = rebuild_ground(&Plan::new(), &config).unwrap_err();
    assert!(matches!(error, Error::Geometry(_)));
}

#[test]
fn test_generations() {
    let rebuilder = GroundRebuilder::new(config());
    assert_eq!(rebuilder.generation(), 0);

    let first = rebuilder.rebuild(&basement_plan()).unwrap();
    assert!(rebuilder.is_current(&first));

    let second = rebuilder.rebuild(&Plan::new()).unwrap();
    assert_eq!(second.generation, 2);
    assert!(!rebuilder.is_current(&first));
    assert!(rebuilder.is_current(&second));
}

#[test]
fn test_json_round_trip() {
    let plan_json = r#"{
        "levels": [
            { "id": 1, "name": "Basement", "elevation": -300.0, "viewable": true, "visible": true }
        ],
        "furniture": [
            { "x": 100.0, "y": 100.0, "width": 200.0, "depth": 200.0, "angle": 0.0,
              "elevation": 0.0, "model_mirrored": false, "level": 1 }
        ]
    }"#;
    let json = rebuild_ground_json(plan_json, &config()).unwrap();
    let data: GroundData = serde_json::from_str(&json).unwrap();
    assert_eq!(data.band_elevations, vec![-300.0]);
    assert!(json.contains("\"kind\":\"skirt\""));

    assert!(matches!(
        rebuild_ground_json("{ not json", &config()),
        Err(Error::Json(_))
    ));
}
