//! Chessboard demo
//!
//! Builds a chess scene, renders one frame into a recording backend and logs
//! how the frame was partitioned.
//!
//! ```text
//! chess_demo [config.toml|config.ron]
//! ```

mod board;

use board::Board;
use scene_engine::foundation::logging;
use scene_engine::foundation::math::{Point3, Quat, Transform, Vec3};
use scene_engine::prelude::*;

fn load_config(path: Option<&str>) -> (ApplicationConfig, Option<String>) {
    match path {
        Some(path) => match ApplicationConfig::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (ApplicationConfig::default(), Some(format!("{}: {}", path, e))),
        },
        None => (ApplicationConfig::default(), None),
    }
}

/// Camera placement at `eye`, looking at `target`
fn look_at(eye: Point3, target: Point3) -> Mat4 {
    // Cameras look down their local -Z axis
    let rotation = Quat::face_towards(&(eye - target), &Vec3::y());
    Transform::from_position_rotation(eye.coords, rotation).to_matrix()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let (config, load_error) = load_config(path.as_deref());

    logging::init_with_level(&config.engine.log_level);
    if let Some(error) = load_error {
        log::warn!("Falling back to default configuration ({})", error);
    }
    log::info!("Starting chess demo");

    let mut engine = Engine::new(config)?;
    let scene = engine.scene_mut();

    let world = scene.create_group("world", Mat4::identity());
    let board = Board::build(scene)?;
    scene.add_child(world, board.root)?;

    let pieces = board.setup(scene)?;
    board.move_piece(scene, (1, 4), (3, 4))?;
    board.select(scene, 3, 4)?;
    log::info!("Placed {} pieces, {} squares occupied", pieces, board.grid.occupied(scene).len());

    let sun = scene.create_light(
        "sun",
        Mat4::identity(),
        Light::directional(Vec3::new(-0.3, -1.0, -0.4).normalize())
            .with_colors(Vec3::new(0.2, 0.2, 0.2), Vec3::new(0.9, 0.9, 0.8), Vec3::new(1.0, 1.0, 1.0)),
    )?;
    let lamp = scene.create_light("lamp", Mat4::translation(0.0, 6.0, 0.0), Light::omnidirectional())?;
    if let Some(attenuation) = scene.node_mut(lamp).and_then(|node| node.as_light_mut()).and_then(|light| light.attenuation_mut()) {
        attenuation.set_linear(0.05)?;
        attenuation.set_quadratic(0.01)?;
    }
    scene.add_child(world, sun)?;
    scene.add_child(world, lamp)?;

    let camera = scene.create_camera(
        "camera",
        look_at(Point3::new(0.0, 9.0, 9.0), Point3::origin()),
        Camera::perspective(800, 600, 0.1, 100.0, 45.0),
    );
    scene.add_child(world, camera)?;

    engine.set_root(world)?;
    engine.set_camera(camera)?;
    engine.reshape(1280, 720)?;

    let mut recorder = CommandRecorder::new();
    let stats = engine.render_frame(&mut recorder)?;

    log::info!(
        "Frame {}: {} entries -> {} lights, {} opaque, {} transparent",
        stats.frame,
        stats.entries,
        stats.lights,
        stats.opaque,
        stats.transparent
    );
    log::info!(
        "Submitted {} commands ({} draws, {} lights skipped)",
        recorder.len(),
        recorder.draw_count(),
        stats.submitted.lights_skipped
    );

    Ok(())
}
