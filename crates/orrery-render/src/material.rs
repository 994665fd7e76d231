//! Surface descriptions for meshes, lines and point clouds.

use crate::color::{Color, palette};

/// How a visual is shaded.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Flat color, ignores lights. Used for self-illuminating bodies.
    Basic { color: Color },
    /// Diffuse (N·L) shading from scene lights plus an emissive term.
    Lambert { color: Color, emissive: Color },
    /// Colored points. `size` is in world units when `size_attenuation` is set.
    Points {
        color: Color,
        size: f32,
        size_attenuation: bool,
    },
    /// Unlit polyline, optionally blended.
    Line {
        color: Color,
        opacity: f32,
        transparent: bool,
    },
}

impl Material {
    /// Lambert material without emissive contribution.
    pub fn lambert(color: Color) -> Self {
        Self::Lambert {
            color,
            emissive: palette::PURE_BLACK,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Basic { color }
            | Self::Lambert { color, .. }
            | Self::Points { color, .. }
            | Self::Line { color, .. } => *color,
        }
    }

    /// Effective alpha. Opaque unless a transparent line says otherwise.
    pub fn opacity(&self) -> f32 {
        match self {
            Self::Line {
                opacity,
                transparent: true,
                ..
            } => opacity.clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    /// Whether the material responds to scene lights.
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Lambert { .. })
    }
}
