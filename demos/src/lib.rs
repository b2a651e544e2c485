//! # Prism Demos
//!
//! Shared helpers for the demo binaries.
//!
//! ## Available Demos
//!
//! - `color_blit_demo` - Runs the color blit round trip over a solid target
//!   and writes the result as PNG

use std::path::Path;

use prism_features::ConfigError;
use prism_graphics::{CameraType, Color, GraphicsError, InjectionPoint, Material, Texture};
use thiserror::Error;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors a demo can end with.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Rendering failed.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    /// A feature could not be configured.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Writing the output image failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Camera type selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliCamera {
    /// Main game camera.
    #[default]
    Game,
    /// Editor scene view (not affected by full-frame features).
    SceneView,
    /// Asset preview (not affected by full-frame features).
    Preview,
    /// Reflection capture (not affected by full-frame features).
    Reflection,
    /// VR camera.
    Vr,
}

impl From<CliCamera> for CameraType {
    fn from(cli: CliCamera) -> Self {
        match cli {
            CliCamera::Game => CameraType::Game,
            CliCamera::SceneView => CameraType::SceneView,
            CliCamera::Preview => CameraType::Preview,
            CliCamera::Reflection => CameraType::Reflection,
            CliCamera::Vr => CameraType::Vr,
        }
    }
}

/// Material selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliMaterial {
    /// Identity copy.
    Blit,
    /// Invert RGB.
    Invert,
    /// Replace RGB with luminance.
    Grayscale,
    /// Unset; the feature declares nothing.
    None,
}

impl CliMaterial {
    /// Build the material, `None` for [`CliMaterial::None`].
    pub fn build(self) -> Option<Material> {
        match self {
            Self::Blit => Some(Material::blit()),
            Self::Invert => Some(Material::invert()),
            Self::Grayscale => Some(Material::grayscale()),
            Self::None => None,
        }
    }
}

/// Parse `RRGGBB` or `RRGGBBAA` hex, with or without a leading `#`.
pub fn parse_hex_color(value: &str) -> Result<Color, String> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(format!("expected RRGGBB or RRGGBBAA, got '{value}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("invalid color '{value}': {e}"))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::from_rgba8([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Parse an injection point name such as `AfterRenderingOpaques`, ignoring case.
pub fn parse_injection_point(value: &str) -> Result<InjectionPoint, String> {
    InjectionPoint::from_name(value).ok_or_else(|| {
        let names: Vec<String> = InjectionPoint::ALL.iter().map(|p| format!("{p:?}")).collect();
        format!("unknown injection point '{value}', expected one of: {}", names.join(", "))
    })
}

/// Write `texture` as an 8-bit RGBA PNG.
pub fn save_png(texture: &Texture, path: &Path) -> Result<(), DemoError> {
    image::save_buffer(
        path,
        &texture.to_rgba8(),
        texture.width(),
        texture.height(),
        image::ColorType::Rgba8,
    )?;
    log::info!(
        "wrote {}x{} image to {}",
        texture.width(),
        texture.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ff0000", [255, 0, 0, 255])]
    #[case("#00ff7f", [0, 255, 127, 255])]
    #[case("10203040", [16, 32, 48, 64])]
    fn test_parse_hex_color(#[case] value: &str, #[case] expected: [u8; 4]) {
        assert_eq!(parse_hex_color(value).unwrap().to_rgba8(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("fff")]
    #[case("gg0000")]
    #[case("ff00é")]
    fn test_parse_hex_color_rejects(#[case] value: &str) {
        assert!(parse_hex_color(value).is_err());
    }

    #[rstest]
    #[case("BeforeRenderingPostProcessing", InjectionPoint::BeforeRenderingPostProcessing)]
    #[case("afterrendering", InjectionPoint::AfterRendering)]
    fn test_parse_injection_point(#[case] value: &str, #[case] expected: InjectionPoint) {
        assert_eq!(parse_injection_point(value), Ok(expected));
    }

    #[test]
    fn test_parse_injection_point_lists_names() {
        let err = parse_injection_point("whenever").unwrap_err();
        assert!(err.contains("whenever"));
        assert!(err.contains("AfterRenderingOpaques"));
    }

    #[test]
    fn test_config_error_converts() {
        let err = DemoError::from(ConfigError::MissingResource {
            resource: "first_material",
        });
        assert!(matches!(err, DemoError::Config(_)));
        assert!(err.to_string().contains("first_material"));
    }

    #[test]
    fn test_cli_material() {
        assert!(CliMaterial::None.build().is_none());
        assert_eq!(CliMaterial::Invert.build().unwrap().label(), "Invert");
    }
}
