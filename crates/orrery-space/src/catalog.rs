//! The eight planets of the default system.

use orrery_render::{Color, palette};

use crate::planet::PlanetOptions;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub size: f32,
    pub orbit: f32,
    pub color: Color,
    /// Radians per second.
    pub speed: f64,
}

impl CatalogEntry {
    pub fn options(&self) -> PlanetOptions {
        PlanetOptions {
            name: self.name.to_string(),
            size: self.size,
            orbit: self.orbit,
            color: self.color,
            speed: self.speed,
        }
    }
}

const fn entry(name: &'static str, size: f32, orbit: f32, color: Color, speed: f64) -> CatalogEntry {
    CatalogEntry {
        name,
        size,
        orbit,
        color,
        speed,
    }
}

/// Innermost first.
pub const PLANETS: [CatalogEntry; 8] = [
    entry("Mercury", 1.2, 12.0, palette::MERCURY_BLUE, 0.5),
    entry("Venus", 1.5, 19.0, palette::VENUS_ORANGE, 0.25),
    entry("Earth", 1.8, 26.0, palette::EARTH_GREEN, 0.167),
    entry("Mars", 2.1, 33.0, palette::MARS_RED, 0.125),
    entry("Jupiter", 2.0, 40.0, palette::JUPITER_YELLOW, 0.1),
    entry("Saturn", 2.4, 47.0, palette::SATURN_PURPLE, 0.083),
    entry("Uranus", 2.8, 54.0, palette::URANUS_TEAL, 0.071),
    entry("Neptune", 3.2, 61.0, palette::NEPTUNE_BLUE, 0.063),
];

pub fn default_planets() -> Vec<PlanetOptions> {
    PLANETS.iter().map(CatalogEntry::options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_names_unique() {
        let names: FxHashSet<_> = PLANETS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_orbits_strictly_increase() {
        let orbits: Vec<f32> = PLANETS.iter().map(|p| p.orbit).collect();
        assert_eq!(orbits, vec![12.0, 19.0, 26.0, 33.0, 40.0, 47.0, 54.0, 61.0]);
        assert!(orbits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_options_copy_entry() {
        let earth = &default_planets()[2];
        assert_eq!(earth.name, "Earth");
        assert_eq!(earth.color, palette::EARTH_GREEN);
        assert!((earth.speed - 0.167).abs() < 1e-12);
    }
}
