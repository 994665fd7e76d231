//! Full lifecycle against the headless host: initialize, populate, animate,
//! clean up, tear down.

use std::f64::consts::TAU;

use orrery_render::{HeadlessHost, Object3D, RenderContext, Renderer};
use orrery_space::{SceneState, SolarSystem, SolarSystemOptions};

fn context(width: u32, height: u32) -> RenderContext<HeadlessHost> {
    let mut ctx = RenderContext::default();
    ctx.initialize(HeadlessHost::new(width, height))
        .expect("headless init");
    ctx
}

fn system(seed: u64) -> SolarSystem {
    SolarSystem::new(SolarSystemOptions {
        seed: Some(seed),
        ..Default::default()
    })
}

#[test]
fn setup_places_planets_on_their_orbits() {
    let mut ctx = context(800, 600);
    let mut system = system(1);
    system.setup_solar_system(&mut ctx).unwrap();

    assert_eq!(system.planets().len(), 8);
    let scene = ctx.scene().unwrap();
    for planet in system.planets() {
        assert!(
            (0.0..TAU).contains(&planet.angle()),
            "{} starts at angle {}",
            planet.name,
            planet.angle()
        );
        let position = scene.get(planet.mesh).unwrap().transform.position;
        assert!(
            (position.length() - planet.orbit()).abs() < 1e-3,
            "{} at distance {} from the sun, orbit {}",
            planet.name,
            position.length(),
            planet.orbit()
        );
        assert_eq!(position, planet.position());
    }
}

#[test]
fn setup_populates_scene() {
    let mut ctx = context(800, 600);
    let mut system = system(2);
    system.setup_solar_system(&mut ctx).unwrap();

    // Sun, ambient light, starfield, and a mesh plus ring per planet.
    let scene = ctx.scene().unwrap();
    assert_eq!(scene.len(), 3 + 8 * 2);
    assert_eq!(scene.node_count(), scene.len() + 1);

    let starfield = system.starfield().unwrap();
    let Object3D::Points { geometry, .. } = scene.get(starfield.node).unwrap().object else {
        panic!("starfield is not a point cloud");
    };
    assert_eq!(ctx.renderer().unwrap().geometry_vertices(geometry), Some(5000));
}

#[test]
fn animation_follows_closed_form() {
    let mut ctx = context(800, 600);
    let mut system = system(3);
    system.setup_solar_system(&mut ctx).unwrap();

    let before: Vec<f64> = system.planets().iter().map(|p| p.angle()).collect();
    let delta = 0.75;
    system.animate_solar_system(ctx.scene_mut().unwrap(), delta);

    let scene = ctx.scene().unwrap();
    for (planet, angle_before) in system.planets().iter().zip(before) {
        let expected = angle_before + planet.speed * delta;
        assert!((planet.angle() - expected).abs() < 1e-12);

        let node = scene.get(planet.mesh).unwrap();
        let orbit = f64::from(planet.orbit());
        assert!((f64::from(node.transform.position.x) - expected.cos() * orbit).abs() < 1e-4);
        assert!((f64::from(node.transform.position.z) - expected.sin() * orbit).abs() < 1e-4);
        assert_eq!(node.transform.position.y, 0.0);
        assert!((node.transform.rotation.y - delta as f32).abs() < 1e-6);
    }
}

#[test]
fn frame_loop_runs_until_teardown() {
    let mut ctx = context(640, 480);
    let mut system = system(4);
    system.setup_solar_system(&mut ctx).unwrap();
    ctx.request_animation_frame().unwrap();

    let mut ticks = 0;
    while ticks < 10 && ctx.host_mut().unwrap().take_redraw() {
        if ctx.begin_frame() {
            ctx.clock_mut().unwrap().advance(1.0 / 60.0);
            system.animate(&mut ctx).unwrap();
            ticks += 1;
        }
    }
    assert_eq!(ticks, 10);
    assert_eq!(ctx.frame_count(), 10);
    assert_eq!(ctx.renderer().unwrap().render_count(), 10);
    assert_eq!(ctx.renderer().unwrap().last_draw_calls(), 1 + 1 + 8 * 2);
    assert_eq!(system.state(), SceneState::Animating);

    // A frame is still pending; teardown must cancel it.
    assert!(ctx.pending_frame().is_some());
    system.cleanup_solar_system(&mut ctx);
    let host = ctx.teardown().unwrap();
    assert!(!ctx.begin_frame());
    assert!(system.animate(&mut ctx).is_err());
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn cleanup_leaves_scene_empty_and_releases_resources() {
    let mut ctx = context(800, 600);
    let mut system = system(5);
    system.setup_solar_system(&mut ctx).unwrap();
    assert!(ctx.renderer().unwrap().live_geometries() > 0);

    system.cleanup_solar_system(&mut ctx);
    assert_eq!(system.body_count(), 0);
    assert!(system.sun().is_none());
    assert!(system.planets().is_empty());

    let scene = ctx.scene().unwrap();
    assert!(scene.is_empty());
    assert_eq!(scene.node_count(), 0);
    let renderer = ctx.renderer().unwrap();
    assert_eq!(renderer.live_geometries(), 0);
    assert_eq!(renderer.live_materials(), 0);
}

#[test]
fn cleanup_is_idempotent() {
    let mut ctx = context(800, 600);
    let mut system = system(6);

    system.cleanup_solar_system(&mut ctx);
    assert_eq!(system.state(), SceneState::Uninitialized);
    assert!(ctx.scene().unwrap().is_empty());

    system.setup_solar_system(&mut ctx).unwrap();
    system.cleanup_solar_system(&mut ctx);
    let nodes_once = ctx.scene().unwrap().node_count();
    system.cleanup_solar_system(&mut ctx);
    assert_eq!(ctx.scene().unwrap().node_count(), nodes_once);
    assert_eq!(system.state(), SceneState::Disposed);
}

#[test]
fn resize_during_animation() {
    let mut ctx = context(800, 600);
    let mut system = system(7);
    system.setup_solar_system(&mut ctx).unwrap();
    assert!((ctx.camera().unwrap().aspect_ratio - 800.0 / 600.0).abs() < 1e-6);

    if ctx.host_mut().unwrap().set_client_size(400, 300) {
        ctx.resize();
    }
    assert!((ctx.camera().unwrap().aspect_ratio - 400.0 / 300.0).abs() < 1e-6);
    assert_eq!(ctx.renderer().unwrap().size(), (400, 300));

    system.animate(&mut ctx).unwrap();
    assert_eq!(ctx.renderer().unwrap().render_count(), 1);
}

#[test]
fn full_teardown_releases_everything() {
    let mut ctx = context(800, 600);
    let mut system = system(8);
    system.setup_solar_system(&mut ctx).unwrap();
    system.cleanup_solar_system(&mut ctx);
    let host = ctx.teardown().unwrap();
    assert!(!host.is_attached());
    assert!(ctx.teardown().is_none());
    assert!(ctx.scene().is_err());
}
