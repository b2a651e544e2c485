//! Material definition.
//!
//! A [`Material`] is the per-fragment transform applied by a full-screen draw.
//! It is immutable once created and shared as `Arc<Material>`, so recording
//! functions can capture it without touching the state of whoever configured it.

use std::sync::Arc;

use crate::resources::Texture;
use crate::types::Color;

/// Inputs available to a material's fragment shader.
#[derive(Debug, Clone, Copy)]
pub struct FragmentInput<'a> {
    /// Interpolated texture coordinate, origin at the top-left.
    pub uv: [f32; 2],
    /// Pixel coordinate of the fragment in the attachment.
    pub position: [u32; 2],
    /// Texture bound as the draw's source, if any.
    pub source: Option<&'a Texture>,
}

impl FragmentInput<'_> {
    /// Sample the source texture with nearest filtering and clamp-to-edge
    /// addressing. Returns transparent black when no source is bound.
    pub fn sample(&self, uv: [f32; 2]) -> Color {
        let Some(texture) = self.source else {
            return Color::TRANSPARENT;
        };
        let x = texel_coord(uv[0], texture.width());
        let y = texel_coord(uv[1], texture.height());
        texture.pixel(x, y).unwrap_or(Color::TRANSPARENT)
    }

    /// Sample the source at this fragment's own texture coordinate.
    pub fn sample_source(&self) -> Color {
        self.sample(self.uv)
    }
}

fn texel_coord(u: f32, size: u32) -> u32 {
    let max = size.saturating_sub(1);
    let t = (u * size as f32).floor();
    if t <= 0.0 { 0 } else { (t as u32).min(max) }
}

/// Fragment shader signature.
pub type FragmentShader = dyn Fn(&FragmentInput<'_>) -> Color + Send + Sync;

/// A full-screen transform material.
///
/// # Example
///
/// ```ignore
/// let sepia = Material::new("sepia", |input| {
///     let c = input.sample_source();
///     let l = c.luminance();
///     Color::new(l * 1.07, l * 0.74, l * 0.43, c.a)
/// });
/// ```
#[derive(Clone)]
pub struct Material {
    label: String,
    shader: Arc<FragmentShader>,
}

impl Material {
    /// Create a material from a fragment shader closure.
    pub fn new(
        label: impl Into<String>,
        shader: impl Fn(&FragmentInput<'_>) -> Color + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            shader: Arc::new(shader),
        }
    }

    /// Identity copy of the source.
    pub fn blit() -> Self {
        Self::new("Blit", |input| input.sample_source())
    }

    /// Inverts the RGB channels of the source and keeps alpha.
    pub fn invert() -> Self {
        Self::new("Invert", |input| {
            let c = input.sample_source();
            Color::new(1.0 - c.r, 1.0 - c.g, 1.0 - c.b, c.a)
        })
    }

    /// Multiplies the source by a constant color.
    pub fn tint(color: Color) -> Self {
        Self::new("Tint", move |input| input.sample_source().modulate(color))
    }

    /// Replaces RGB with the source luminance.
    pub fn grayscale() -> Self {
        Self::new("Grayscale", |input| {
            let c = input.sample_source();
            let l = c.luminance();
            Color::new(l, l, l, c.a)
        })
    }

    /// Material label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the fragment shader for one fragment.
    pub fn shade(&self, input: &FragmentInput<'_>) -> Color {
        (self.shader)(input)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TextureDescriptor, TextureFormat, TextureUsage};

    fn source() -> Texture {
        let mut texture = Texture::filled(
            TextureDescriptor::new_2d(2, 2, TextureFormat::Rgba8Unorm, TextureUsage::empty()),
            Color::from_rgb8(255, 0, 0),
        )
        .unwrap();
        texture.set_pixel(1, 1, Color::from_rgb8(0, 0, 255));
        texture
    }

    #[test]
    fn test_invert() {
        let texture = source();
        let input = FragmentInput {
            uv: [0.25, 0.25],
            position: [0, 0],
            source: Some(&texture),
        };
        let out = Material::invert().shade(&input);
        assert_eq!(out.to_rgba8(), [0, 255, 255, 255]);
    }

    #[test]
    fn test_blit_samples_nearest_with_clamp() {
        let texture = source();
        let mut input = FragmentInput {
            uv: [0.75, 0.75],
            position: [1, 1],
            source: Some(&texture),
        };
        assert_eq!(Material::blit().shade(&input).to_rgba8(), [0, 0, 255, 255]);

        input.uv = [1.5, -0.5];
        assert_eq!(Material::blit().shade(&input).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_no_source_samples_transparent() {
        let input = FragmentInput {
            uv: [0.5, 0.5],
            position: [0, 0],
            source: None,
        };
        assert_eq!(Material::blit().shade(&input), Color::TRANSPARENT);
    }

    #[test]
    fn test_grayscale_and_tint() {
        let texture = source();
        let input = FragmentInput {
            uv: [0.0, 0.0],
            position: [0, 0],
            source: Some(&texture),
        };
        let gray = Material::grayscale().shade(&input);
        assert!((gray.r - 0.2126).abs() < 1e-6);
        assert_eq!(gray.r, gray.b);

        let tinted = Material::tint(Color::new(0.5, 1.0, 1.0, 1.0)).shade(&input);
        assert!((tinted.r - 0.5).abs() < 1e-6);
    }
}
