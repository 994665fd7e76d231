//! Linear RGB colors and the named palette used by the scene.

/// An RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Pack back into `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Scale every channel by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
        }
    }

    /// RGBA array with the given alpha, for GPU upload.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Named colors for the solar system scene.
pub mod palette {
    use super::Color;

    pub const PURE_WHITE: Color = Color::from_hex(0xFFFFFF);
    pub const PURE_BLACK: Color = Color::from_hex(0x000000);
    pub const STAR_WHITE: Color = Color::from_hex(0xFFFFFF);
    pub const SUN_ORANGE: Color = Color::from_hex(0xFFAA00);
    pub const GRAPHITE_GREY: Color = Color::from_hex(0x404040);
    pub const MERCURY_BLUE: Color = Color::from_hex(0x3498DB);
    pub const VENUS_ORANGE: Color = Color::from_hex(0xE67E22);
    pub const EARTH_GREEN: Color = Color::from_hex(0x2ECC71);
    pub const MARS_RED: Color = Color::from_hex(0xE74C3C);
    pub const JUPITER_YELLOW: Color = Color::from_hex(0xF1C40F);
    pub const SATURN_PURPLE: Color = Color::from_hex(0x9B59B6);
    pub const URANUS_TEAL: Color = Color::from_hex(0x1ABC9C);
    pub const NEPTUNE_BLUE: Color = Color::from_hex(0x34495E);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_channels() {
        let c = Color::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_hex_survives_packing() {
        for hex in [0x3498DB, 0xE67E22, 0x404040, 0x000000, 0xFFFFFF] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn test_scaled_multiplies_channels() {
        let c = palette::GRAPHITE_GREY.scaled(0.5);
        assert!((c.r - 0x40 as f32 / 255.0 * 0.5).abs() < 1e-6);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }
}
