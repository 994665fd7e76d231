//! Composes the sun, starfield and planets into a render context and animates them.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use orrery_render::{
    Color, ContextError, Host, NodeId, RenderContext, RenderError, Scene, Stage, palette,
};

use crate::body::CelestialBody;
use crate::catalog::default_planets;
use crate::planet::{PlanetOptions, build_planet};
use crate::starfield::{Starfield, StarfieldOptions, build_starfield};
use crate::sun::{SUN_SPIN_RATE, Sun, SunOptions, build_sun};

/// Errors raised while composing the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The render context has not been initialized.
    #[error("render context is not ready")]
    ContextNotReady,

    /// The system is already in the scene; clean it up first.
    #[error("solar system is already populated")]
    AlreadyPopulated,

    /// The starfield spread must be a finite number.
    #[error("star spread {0} is not finite")]
    InvalidStarSpread(f32),
}

impl From<ContextError> for SceneError {
    fn from(_: ContextError) -> Self {
        SceneError::ContextNotReady
    }
}

/// Where the system is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Nothing built yet.
    Uninitialized,
    /// Bodies are in the scene, no frame has run.
    Populated,
    /// At least one frame has advanced the bodies.
    Animating,
    /// Cleaned up. A new setup may follow.
    Disposed,
}

impl SceneState {
    fn is_live(self) -> bool {
        matches!(self, Self::Populated | Self::Animating)
    }
}

/// Settings merged with defaults when the system is set up.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystemOptions {
    pub stars_count: u32,
    pub star_spread: f32,
    pub sun_size: f32,
    pub sun_color: Color,
    /// Fixes star placement and initial planet angles.
    pub seed: Option<u64>,
    pub planets: Vec<PlanetOptions>,
}

impl Default for SolarSystemOptions {
    fn default() -> Self {
        let stars = StarfieldOptions::default();
        let sun = SunOptions::default();
        Self {
            stars_count: stars.count,
            star_spread: stars.spread,
            sun_size: sun.size,
            sun_color: sun.color,
            seed: None,
            planets: default_planets(),
        }
    }
}

/// The animated system: owns the records of every body it put in the scene.
///
/// The render context is borrowed per call; the system never stores it.
pub struct SolarSystem {
    options: SolarSystemOptions,
    seed: u64,
    rng: ChaCha8Rng,
    state: SceneState,
    sun: Option<Sun>,
    starfield: Option<Starfield>,
    planets: Vec<CelestialBody>,
}

impl SolarSystem {
    pub fn new(options: SolarSystemOptions) -> Self {
        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        Self {
            options,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: SceneState::Uninitialized,
            sun: None,
            starfield: None,
            planets: Vec::new(),
        }
    }

    pub fn options(&self) -> &SolarSystemOptions {
        &self.options
    }

    /// Seed in use, whether configured or drawn at startup.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn sun(&self) -> Option<&Sun> {
        self.sun.as_ref()
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.starfield.as_ref()
    }

    pub fn planets(&self) -> &[CelestialBody] {
        &self.planets
    }

    pub fn planet(&self, name: &str) -> Option<&CelestialBody> {
        self.planets.iter().find(|p| p.name == name)
    }

    /// Number of bodies (sun and planets) currently tracked.
    pub fn body_count(&self) -> usize {
        self.planets.len() + usize::from(self.sun.is_some())
    }

    fn mark_populated(&mut self) {
        if !self.state.is_live() {
            self.state = SceneState::Populated;
        }
    }

    /// Scatter `count` stars through a cube of edge `spread` as one point cloud.
    ///
    /// Replaces any starfield this system added earlier.
    pub fn setup_starfield<H: Host>(
        &mut self,
        ctx: &mut RenderContext<H>,
        count: u32,
        spread: f32,
    ) -> Result<NodeId, SceneError> {
        if !spread.is_finite() {
            return Err(SceneError::InvalidStarSpread(spread));
        }
        let mut stage = ctx.stage()?;
        if let Some(old) = self.starfield.take() {
            log::warn!("Replacing existing starfield");
            stage.dispose_object(old.node);
        }
        let starfield =
            build_starfield(&mut stage, &mut self.rng, StarfieldOptions { count, spread });
        self.starfield = Some(starfield);
        self.mark_populated();
        Ok(starfield.node)
    }

    /// Add the sun with its point light, and the ambient light.
    ///
    /// Replaces any sun this system added earlier.
    pub fn setup_sun<H: Host>(
        &mut self,
        ctx: &mut RenderContext<H>,
        size: f32,
        color: Color,
    ) -> Result<&Sun, SceneError> {
        let mut stage = ctx.stage()?;
        if let Some(old) = self.sun.take() {
            log::warn!("Replacing existing sun");
            dispose_sun(&mut stage, &old);
        }
        let sun = build_sun(&mut stage, SunOptions { size, color });
        self.mark_populated();
        Ok(self.sun.insert(sun))
    }

    /// Add one planet at a random point on its orbit, with its orbit ring.
    pub fn create_planet<H: Host>(
        &mut self,
        ctx: &mut RenderContext<H>,
        options: &PlanetOptions,
    ) -> Result<&CelestialBody, SceneError> {
        let mut stage = ctx.stage()?;
        let angle = self.rng.random_range(0.0..TAU);
        let planet = build_planet(&mut stage, options, angle);
        self.planets.push(planet);
        self.mark_populated();
        Ok(&self.planets[self.planets.len() - 1])
    }

    /// Build the whole system: sun, starfield, then every configured planet.
    pub fn setup_solar_system<H: Host>(
        &mut self,
        ctx: &mut RenderContext<H>,
    ) -> Result<(), SceneError> {
        if self.state.is_live() {
            return Err(SceneError::AlreadyPopulated);
        }
        if !ctx.is_initialized() {
            return Err(SceneError::ContextNotReady);
        }
        if !self.options.star_spread.is_finite() {
            return Err(SceneError::InvalidStarSpread(self.options.star_spread));
        }

        let SolarSystemOptions {
            stars_count,
            star_spread,
            sun_size,
            sun_color,
            ..
        } = self.options;
        self.setup_sun(ctx, sun_size, sun_color)?;
        self.setup_starfield(ctx, stars_count, star_spread)?;
        let planets = self.options.planets.clone();
        for options in &planets {
            self.create_planet(ctx, options)?;
        }

        log::info!(
            "Solar system ready: {} planets, {} stars (seed {})",
            self.planets.len(),
            stars_count,
            self.seed
        );
        Ok(())
    }

    /// Advance every body by `delta` seconds.
    ///
    /// Does nothing until a sun exists.
    pub fn animate_solar_system(&mut self, scene: &mut Scene, delta: f64) {
        let Some(sun) = &self.sun else {
            return;
        };

        if let Some(transform) = scene.transform_mut(sun.body.mesh) {
            transform.rotation.y += SUN_SPIN_RATE * delta as f32;
        }

        for planet in &mut self.planets {
            let position = planet.advance(delta);
            if let Some(transform) = scene.transform_mut(planet.mesh) {
                transform.position = position;
                transform.rotation.y += delta as f32;
            }
        }

        if self.state == SceneState::Populated {
            self.state = SceneState::Animating;
        }
    }

    /// Run one frame: advance by the clock delta, render, and request the next frame.
    ///
    /// Render failures are logged and do not stop the loop.
    pub fn animate<H: Host>(&mut self, ctx: &mut RenderContext<H>) -> Result<(), SceneError> {
        let delta = ctx.tick_delta()?;
        self.animate_solar_system(ctx.scene_mut()?, delta);

        match ctx.render() {
            Ok(()) => {}
            Err(ContextError::Renderer(RenderError::Timeout)) => {
                log::debug!("Surface timeout, frame skipped");
            }
            Err(e) => log::warn!("Render failed: {e}"),
        }

        ctx.request_animation_frame()?;
        Ok(())
    }

    /// Dispose every object this system added and forget the records.
    ///
    /// Safe before setup and safe to repeat.
    pub fn cleanup_solar_system<H: Host>(&mut self, ctx: &mut RenderContext<H>) {
        let had_bodies = self.sun.is_some() || self.starfield.is_some() || !self.planets.is_empty();
        if !had_bodies {
            if self.state.is_live() {
                self.state = SceneState::Disposed;
            }
            return;
        }

        match ctx.stage() {
            Ok(mut stage) => {
                for planet in &self.planets {
                    stage.dispose_object(planet.mesh);
                    if let Some(ring) = planet.ring {
                        stage.dispose_object(ring);
                    }
                }
                if let Some(sun) = &self.sun {
                    dispose_sun(&mut stage, sun);
                }
                if let Some(starfield) = &self.starfield {
                    stage.dispose_object(starfield.node);
                }
            }
            Err(_) => {
                log::warn!("Render context already torn down; dropping solar system records");
            }
        }

        let planets = self.planets.len();
        self.planets.clear();
        self.sun = None;
        self.starfield = None;
        self.state = SceneState::Disposed;
        log::info!("Solar system cleaned up ({} planets removed)", planets);
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new(SolarSystemOptions::default())
    }
}

fn dispose_sun<R: orrery_render::Renderer + ?Sized>(stage: &mut Stage<'_, R>, sun: &Sun) {
    stage.dispose_object(sun.body.mesh);
    stage.dispose_object(sun.ambient);
}

/// Sun color for a configured `0xRRGGBB` value. Out-of-range values fall back
/// to the default orange.
pub fn sun_color_from_hex(hex: u32) -> Color {
    if hex > 0xFF_FFFF {
        log::warn!("Sun color #{hex:X} out of range, using default");
        return palette::SUN_ORANGE;
    }
    Color::from_hex(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_render::{HeadlessHost, ManualClock};

    fn seeded() -> SolarSystem {
        SolarSystem::new(SolarSystemOptions {
            seed: Some(11),
            stars_count: 100,
            ..Default::default()
        })
    }

    fn context() -> RenderContext<HeadlessHost> {
        let mut ctx = RenderContext::default();
        ctx.initialize(HeadlessHost::new(800, 600)).unwrap();
        ctx
    }

    #[test]
    fn test_state_transitions() {
        let mut ctx = context();
        let mut system = seeded();
        assert_eq!(system.state(), SceneState::Uninitialized);
        system.setup_solar_system(&mut ctx).unwrap();
        assert_eq!(system.state(), SceneState::Populated);
        system.animate(&mut ctx).unwrap();
        assert_eq!(system.state(), SceneState::Animating);
        system.cleanup_solar_system(&mut ctx);
        assert_eq!(system.state(), SceneState::Disposed);
        system.setup_solar_system(&mut ctx).unwrap();
        assert_eq!(system.state(), SceneState::Populated);
    }

    #[test]
    fn test_setup_twice_rejected() {
        let mut ctx = context();
        let mut system = seeded();
        system.setup_solar_system(&mut ctx).unwrap();
        assert!(matches!(
            system.setup_solar_system(&mut ctx),
            Err(SceneError::AlreadyPopulated)
        ));
        assert_eq!(system.planets().len(), 8);
    }

    #[test]
    fn test_setup_needs_context() {
        let mut ctx: RenderContext<HeadlessHost> = RenderContext::default();
        let mut system = seeded();
        assert!(matches!(
            system.setup_solar_system(&mut ctx),
            Err(SceneError::ContextNotReady)
        ));
        assert_eq!(system.state(), SceneState::Uninitialized);
    }

    #[test]
    fn test_animate_without_sun_is_noop() {
        let mut scene = Scene::default();
        let mut system = seeded();
        system.animate_solar_system(&mut scene, 1.0);
        assert_eq!(system.state(), SceneState::Uninitialized);
    }

    #[test]
    fn test_sun_spins_half_radian_per_second() {
        let mut ctx = context();
        let mut system = seeded();
        system.setup_solar_system(&mut ctx).unwrap();
        let sun = system.sun().unwrap().body.mesh;
        system.animate_solar_system(ctx.scene_mut().unwrap(), 2.0);
        let rotation = ctx.scene().unwrap().get(sun).unwrap().transform.rotation;
        assert!((rotation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_animate_uses_clock_delta() {
        let mut ctx = context();
        let mut system = seeded();
        system.setup_solar_system(&mut ctx).unwrap();
        let before = system.planet("Mercury").unwrap().angle();

        let clock: &mut ManualClock = ctx.clock_mut().unwrap();
        clock.advance(2.0);
        system.animate(&mut ctx).unwrap();

        let after = system.planet("Mercury").unwrap().angle();
        assert!((after - before - 1.0).abs() < 1e-9);
        assert!(ctx.pending_frame().is_some());
        assert_eq!(ctx.renderer().unwrap().render_count(), 1);
    }

    #[test]
    fn test_same_seed_same_angles() {
        let mut a_ctx = context();
        let mut b_ctx = context();
        let mut a = seeded();
        let mut b = seeded();
        a.setup_solar_system(&mut a_ctx).unwrap();
        b.setup_solar_system(&mut b_ctx).unwrap();
        let angles = |s: &SolarSystem| s.planets().iter().map(|p| p.angle()).collect::<Vec<_>>();
        assert_eq!(angles(&a), angles(&b));
    }

    #[test]
    fn test_non_finite_star_spread_rejected_before_building() {
        for spread in [f32::NAN, f32::INFINITY] {
            let mut ctx = context();
            let mut system = SolarSystem::new(SolarSystemOptions {
                seed: Some(1),
                star_spread: spread,
                ..Default::default()
            });
            assert!(matches!(
                system.setup_solar_system(&mut ctx),
                Err(SceneError::InvalidStarSpread(_))
            ));
            assert_eq!(system.state(), SceneState::Uninitialized);
            assert!(ctx.scene().unwrap().is_empty());

            assert!(matches!(
                system.setup_starfield(&mut ctx, 10, spread),
                Err(SceneError::InvalidStarSpread(_))
            ));
            assert!(system.starfield().is_none());
        }
    }

    #[test]
    fn test_replacing_sun_releases_old_one() {
        let mut ctx = context();
        let mut system = seeded();
        system.setup_sun(&mut ctx, 5.0, palette::SUN_ORANGE).unwrap();
        let geometries = ctx.renderer().unwrap().live_geometries();
        system.setup_sun(&mut ctx, 7.0, palette::PURE_WHITE).unwrap();
        assert_eq!(ctx.renderer().unwrap().live_geometries(), geometries);
        assert_eq!(ctx.scene().unwrap().len(), 2);
    }

    #[test]
    fn test_cleanup_after_teardown_drops_records() {
        let mut ctx = context();
        let mut system = seeded();
        system.setup_solar_system(&mut ctx).unwrap();
        ctx.teardown();
        system.cleanup_solar_system(&mut ctx);
        assert_eq!(system.body_count(), 0);
        assert_eq!(system.state(), SceneState::Disposed);
    }

    #[test]
    fn test_sun_color_from_hex() {
        assert_eq!(sun_color_from_hex(0xFFAA00), palette::SUN_ORANGE);
        assert_eq!(sun_color_from_hex(0x1_000_000), palette::SUN_ORANGE);
        assert_eq!(sun_color_from_hex(0xFFFFFF), palette::PURE_WHITE);
    }
}
