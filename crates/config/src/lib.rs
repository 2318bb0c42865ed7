//! Shared configuration for Polyedit
//!
//! This crate provides the single source of truth for the settings the mesh
//! kernel reads when it renders a mesh: the shading policy used by the render
//! buffer generator and its triangulation switches.

use serde::{Deserialize, Serialize};

/// Default smoothing-group threshold in degrees
pub const DEFAULT_SMOOTHING_ANGLE_DEGREES: f32 = 60.0;

/// Default tolerance below which a polygon corner counts as collinear
pub const DEFAULT_COLLINEAR_EPSILON: f32 = 1e-6;

/// How the render buffer generator shares vertices between faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Every face gets private copies of its vertices
    #[default]
    Flat,
    /// One buffer slot per logical vertex
    Smooth,
    /// Vertices split per smoothing group, decided by the smoothing angle
    Auto,
}

impl ShadingMode {
    /// Lowercase name, as the editor shell spells it on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Smooth => "smooth",
            Self::Auto => "auto",
        }
    }
}

/// Render buffer generation settings, selected per object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertex sharing policy
    pub shading: ShadingMode,
    /// Maximum angle between two face normals that still shade smoothly
    /// (only used by [`ShadingMode::Auto`])
    pub smoothing_angle_degrees: f32,
    /// Ear-clip polygons; when false a naive triangle fan is emitted
    pub triangulate: bool,
    /// Cross-product magnitude below which a corner is dropped before
    /// triangulation
    pub collinear_epsilon: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shading: ShadingMode::default(),
            smoothing_angle_degrees: DEFAULT_SMOOTHING_ANGLE_DEGREES,
            triangulate: true,
            collinear_epsilon: DEFAULT_COLLINEAR_EPSILON,
        }
    }
}

impl RenderConfig {
    /// Create a render config with the given shading mode
    pub fn new(shading: ShadingMode) -> Self {
        Self {
            shading,
            ..Self::default()
        }
    }

    /// Set the smoothing angle, clamped to [0, 180] degrees
    pub fn with_smoothing_angle(mut self, degrees: f32) -> Self {
        self.smoothing_angle_degrees = degrees.clamp(0.0, 180.0);
        self
    }

    /// Cosine of the smoothing angle, the threshold compared against the dot
    /// product of two unit face normals
    pub fn smoothing_cos(&self) -> f32 {
        self.smoothing_angle_degrees
            .clamp(0.0, 180.0)
            .to_radians()
            .cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.shading, ShadingMode::Flat);
        assert_eq!(config.smoothing_angle_degrees, DEFAULT_SMOOTHING_ANGLE_DEGREES);
        assert!(config.triangulate);
        assert_eq!(config.collinear_epsilon, DEFAULT_COLLINEAR_EPSILON);
    }

    #[test]
    fn test_smoothing_cos() {
        let config = RenderConfig::new(ShadingMode::Auto).with_smoothing_angle(60.0);
        assert!((config.smoothing_cos() - 0.5).abs() < 1e-6);

        let clamped = RenderConfig::default().with_smoothing_angle(400.0);
        assert_eq!(clamped.smoothing_angle_degrees, 180.0);
    }

    #[test]
    fn test_shading_mode_names() {
        for mode in [ShadingMode::Flat, ShadingMode::Smooth, ShadingMode::Auto] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.name()));
        }
        assert!(serde_json::from_str::<ShadingMode>(r#""gouraud""#).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"shading":"auto"}"#).unwrap();
        assert_eq!(config.shading, ShadingMode::Auto);
        assert_eq!(config.smoothing_angle_degrees, DEFAULT_SMOOTHING_ANGLE_DEGREES);
        assert!(config.triangulate);
    }
}
