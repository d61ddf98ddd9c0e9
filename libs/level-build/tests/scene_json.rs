use config::constants::{LEVEL_COLLECTION, SHAPES_COLLECTION};
use level_build::{build, BuildError, BuildOptions, Scene, ShapeId, ShapeKind};

const LEVEL: &str = r#"{
    "settings": { "precision": 3, "remove_material": "mask", "flip_normals": true },
    "materials": [
        { "name": "stone" },
        { "name": "unused" }
    ],
    "shapes": [
        {
            "id": 1,
            "name": "hall",
            "kind": "SECTOR2D",
            "floor_height": 0.0,
            "ceiling_height": 3.0,
            "group_materials": { "floor": "stone" },
            "mesh": {
                "vertices": [[-2, -2, 0], [2, -2, 0], [2, 2, 0], [-2, 2, 0]],
                "faces": [{ "vertices": [0, 1, 2, 3] }]
            }
        },
        {
            "id": 2,
            "name": "lamp",
            "mesh": { "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "faces": [{ "vertices": [0, 1, 2] }] }
        }
    ],
    "collections": [
        { "name": "BLE_LEVEL", "shapes": [1] }
    ]
}"#;

#[test]
fn loads_and_builds_level() {
    let mut scene = Scene::from_json(LEVEL).unwrap();
    let hall = ShapeId(1);

    assert_eq!(scene.shape(hall).unwrap().kind, Some(ShapeKind::Sector2D));
    assert!(scene.shape(ShapeId(2)).unwrap().kind.is_none());

    let report = build(&mut scene, BuildOptions::default()).unwrap();

    assert_eq!(report.rooms_built, 1);
    assert!(report.sentinel_created);
    assert_eq!(scene.shape_collections(hall), vec![SHAPES_COLLECTION]);
    assert_eq!(
        scene.room_of(hall).unwrap().material_slots,
        vec![None, Some("stone".to_string()), None]
    );
    // Referenced by nothing, reclaimed at build start
    assert!(!scene.materials.contains("unused"));
    assert!(scene.materials.contains("mask"));
    assert_eq!(report.reclaimed.materials, 1);
}

#[test]
fn built_scene_survives_round_trip() {
    let mut scene = Scene::from_json(LEVEL).unwrap();
    build(&mut scene, BuildOptions::default()).unwrap();

    let json = scene.to_json().unwrap();
    let mut reloaded = Scene::from_json(&json).unwrap();

    assert_eq!(reloaded.rooms().len(), 1);
    assert_eq!(
        reloaded.collection(LEVEL_COLLECTION).unwrap().rooms,
        scene.collection(LEVEL_COLLECTION).unwrap().rooms
    );

    let report = build(&mut reloaded, BuildOptions::default()).unwrap();
    assert!(!report.sentinel_created);
    assert_eq!(reloaded.rooms().len(), 1);
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        Scene::from_json("{ not json"),
        Err(BuildError::Serialization(_))
    ));
}

#[test]
fn rejects_dangling_collection_link() {
    let json = r#"{ "collections": [{ "name": "BLE_LEVEL", "shapes": [9] }] }"#;
    assert!(matches!(
        Scene::from_json(json),
        Err(BuildError::UnknownShape { id: ShapeId(9) })
    ));
}
