//! End-to-end frames: load an OBJ from disk, populate a scene through a
//! resource context and drive it against a recording render target.

use std::path::PathBuf;

use approx::assert_relative_eq;
use scene_engine::config::{AsteroidFieldConfig, ConfigFormat, DebugConfig, RobotConfig};
use scene_engine::prelude::*;
use scene_engine::scene::{AsteroidMotion, RobotMeshes};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_config() -> SceneConfig {
    let cube = fixture("cube.obj").display().to_string();
    let mut config = SceneConfig::default();
    config.assets.asteroid_meshes = vec![cube.clone()];
    config.assets.robot_body = cube.clone();
    config.assets.robot_head = cube.clone();
    config.assets.robot_arm = cube.clone();
    config.assets.robot_leg = cube.clone();
    config.assets.robot_eye = cube.clone();
    config.assets.robot_antenna = cube;
    config.asteroids = AsteroidFieldConfig {
        count: 8,
        seed: Some(1234),
        ..Default::default()
    };
    config
}

#[test]
fn cube_fixture_loads_with_unit_normals() {
    let mesh = ObjLoader::load(fixture("cube.obj")).unwrap();

    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.center_offset(), Vec3::new(2.0, 0.0, 0.0));
    for normal in mesh.normals() {
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-6);
    }
    assert!(mesh.degenerate_triangles().is_empty());
}

#[test]
fn quad_face_is_rejected() {
    let result = ObjLoader::load(fixture("quad_face.obj"));
    assert!(matches!(result, Err(MeshError::MalformedFace { line: 7, .. })));
}

#[test]
fn populated_scene_runs_frames() {
    let config = fixture_config();
    let mut target = RecordingTarget::new();
    let mut resources = ResourceContext::new();
    let mut scene = Scene::populate(&config, &mut resources, &mut target).unwrap();

    // skybox cube + one shared file for every asteroid and robot part
    assert_eq!(resources.len(), 2);
    assert_eq!(target.uploads().len(), 2);
    assert_eq!(scene.len(), 1 + 8 + 1);

    let mut frame = FrameContext::new(1.0 / 60.0, 1.0 / 60.0);
    for _ in 0..10 {
        scene.advance(&frame, &mut target).unwrap();
        frame = frame.advance(1.0 / 60.0);
    }

    assert_eq!(scene.frame_phase(), FramePhase::Rendered);
    assert_eq!(target.frames_completed(), 10);
    // skybox + asteroids + ten robot parts
    assert_eq!(target.draws().len(), 1 + 8 + 10);
    for (id, _) in scene.objects() {
        assert!(scene.current_world_extents(id).is_some());
    }
    for pair in scene.collisions() {
        assert!(scene.objects_overlap(pair.first, pair.second).unwrap());
    }

    resources.teardown(&mut target);
    assert!(target.uploads().is_empty());
}

#[test]
fn recentred_bounds_follow_rendered_matrix() {
    let mut target = RecordingTarget::new();
    let mut resources = ResourceContext::new();
    let cube = resources.load_mesh(fixture("cube.obj"), &mut target).unwrap();
    let debug = DebugConfig {
        draw_bounds: true,
        recenter_meshes: true,
    };
    let mut scene = Scene::new(&debug);
    let id = scene
        .add_asteroid(
            &cube,
            AsteroidMotion {
                position: Vec3::new(0.0, 5.0, 0.0),
                ..Default::default()
            },
        )
        .unwrap();

    scene.advance(&FrameContext::default(), &mut target).unwrap();

    // the file's cube sits at x = 2; recentring pulls it onto the object origin
    let extents = scene.current_world_extents(id).unwrap();
    assert_relative_eq!(extents.center(), Vec3::new(0.0, 5.0, 0.0), epsilon = 1e-6);
    assert_relative_eq!(extents.extents(), Vec3::repeat(1.0), epsilon = 1e-6);

    let drawn = target.draws_of(cube.geometry).next().unwrap();
    let corner = drawn.world.transform_point(&Vec3::new(3.0, 1.0, 1.0).into());
    assert_relative_eq!(corner.coords, extents.highest, epsilon = 1e-6);
    assert_eq!(target.debug_lines().len(), 24);
}

#[test]
fn robot_limbs_move_between_frames() {
    let mut target = RecordingTarget::new();
    let mut resources = ResourceContext::new();
    let cube = resources.load_mesh(fixture("cube.obj"), &mut target).unwrap();
    let meshes = RobotMeshes {
        body: cube.clone(),
        head: cube.clone(),
        arm: cube.clone(),
        leg: cube.clone(),
        eye: cube.clone(),
        antenna: cube,
    };
    let mut scene = Scene::new(&DebugConfig::default());
    let id = scene.add_robot(&meshes, &RobotConfig::default()).unwrap();

    scene.advance(&FrameContext::new(0.0, 0.0), &mut target).unwrap();
    let at_rest: Vec<Mat4> = target.draws().iter().map(|d| d.world).collect();
    scene.advance(&FrameContext::new(0.5, 0.5), &mut target).unwrap();
    let swung: Vec<Mat4> = target.draws().iter().map(|d| d.world).collect();

    // depth first: body, head, eyes and antennas, then arms and legs
    assert_eq!(at_rest.len(), 10);
    assert_eq!(at_rest[..6], swung[..6]);
    for limb in 6..10 {
        assert_ne!(at_rest[limb], swung[limb]);
    }

    let whole = scene.current_world_extents(id).unwrap();
    let robot = scene.object(id).unwrap();
    assert!(matches!(robot, SceneObject::Robot(_)));
    for part in robot.body().parts() {
        let part_box = part.volume().extents().unwrap();
        assert!(whole.contains_point(&part_box.lowest));
        assert!(whole.contains_point(&part_box.highest));
    }
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let mut config = fixture_config();
    config.skybox.scale = -1.0;
    let mut target = RecordingTarget::new();
    let mut resources = ResourceContext::new();

    let result = Scene::populate(&config, &mut resources, &mut target);

    assert!(matches!(result, Err(SceneError::Config(_))));
    assert!(resources.is_empty());
}

#[test]
fn non_finite_field_limits_fail_instead_of_panicking() {
    for limits in ["spawn_radius = inf", "max_spin = nan", "max_speed = nan"] {
        let mut config = fixture_config();
        let parsed = SceneConfig::from_str_as(&format!("[asteroids]\n{limits}"), ConfigFormat::Toml).unwrap();
        config.asteroids.spawn_radius = parsed.asteroids.spawn_radius;
        config.asteroids.max_spin = parsed.asteroids.max_spin;
        config.asteroids.max_speed = parsed.asteroids.max_speed;
        let mut target = RecordingTarget::new();
        let mut resources = ResourceContext::new();

        let result = Scene::populate(&config, &mut resources, &mut target);

        assert!(matches!(result, Err(SceneError::Config(_))), "accepted {limits}");
    }
}
