//! CPU texture resource.

use crate::error::GraphicsError;
use crate::types::{Color, Extent3d, TextureDescriptor, TextureFormat};

/// A 2D color texture stored in system memory.
///
/// Every texel is kept as a linear [`Color`] regardless of the declared
/// [`TextureFormat`]; the format only matters when the texture is exported.
/// Multisampled descriptors store one resolved color per pixel.
///
/// # Example
///
/// ```ignore
/// let texture = Texture::new(TextureDescriptor::new_2d(
///     1920, 1080,
///     TextureFormat::Rgba8Unorm,
///     TextureUsage::RENDER_ATTACHMENT,
/// ))?;
/// println!("Texture size: {}x{}", texture.width(), texture.height());
/// ```
#[derive(Clone, PartialEq)]
pub struct Texture {
    descriptor: TextureDescriptor,
    pixels: Vec<Color>,
}

impl Texture {
    /// Create a texture cleared to transparent black.
    pub fn new(descriptor: TextureDescriptor) -> Result<Self, GraphicsError> {
        Self::filled(descriptor, Color::TRANSPARENT)
    }

    /// Create a texture with every pixel set to `color`.
    pub fn filled(descriptor: TextureDescriptor, color: Color) -> Result<Self, GraphicsError> {
        Self::validate(&descriptor)?;
        let pixels = vec![color; descriptor.size.texel_count()];
        Ok(Self { descriptor, pixels })
    }

    /// Create a texture from tightly packed 8-bit RGBA data.
    pub fn from_rgba8(descriptor: TextureDescriptor, data: &[u8]) -> Result<Self, GraphicsError> {
        Self::validate(&descriptor)?;
        let expected = descriptor.size.texel_count() * 4;
        if data.len() != expected {
            return Err(GraphicsError::InvalidParameter(format!(
                "expected {expected} bytes of RGBA8 data, got {}",
                data.len()
            )));
        }
        let pixels = bytemuck::cast_slice::<u8, [u8; 4]>(data)
            .iter()
            .map(|&px| Color::from_rgba8(px))
            .collect();
        Ok(Self { descriptor, pixels })
    }

    fn validate(descriptor: &TextureDescriptor) -> Result<(), GraphicsError> {
        if descriptor.size.is_empty() {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture {:?} has an empty extent {:?}",
                descriptor.label, descriptor.size
            )));
        }
        if descriptor.size.depth != 1 {
            return Err(GraphicsError::FeatureNotSupported(
                "only 2D textures are supported".into(),
            ));
        }
        if descriptor.format.is_depth_stencil() {
            return Err(GraphicsError::FeatureNotSupported(format!(
                "depth/stencil format {:?} cannot back a color texture",
                descriptor.format
            )));
        }
        Ok(())
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the texture size.
    pub fn size(&self) -> Extent3d {
        self.descriptor.size
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.size.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.size.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.descriptor.label = label;
    }

    /// Read one pixel. Coordinates outside the texture return `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Coordinates outside the texture are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable access to all pixels in row-major order.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Export as tightly packed 8-bit RGBA.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Mean color over all pixels.
    pub fn average(&self) -> Color {
        let n = self.pixels.len() as f64;
        let (r, g, b, a) = self.pixels.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, c| {
            (
                acc.0 + f64::from(c.r),
                acc.1 + f64::from(c.g),
                acc.2 + f64::from(c.b),
                acc.3 + f64::from(c.a),
            )
        });
        Color::new(
            (r / n) as f32,
            (g / n) as f32,
            (b / n) as f32,
            (a / n) as f32,
        )
    }

    /// Compare pixel contents within `tolerance` per channel.
    ///
    /// Textures of different extents never compare equal.
    pub fn approx_eq(&self, other: &Texture, tolerance: f32) -> bool {
        self.size() == other.size()
            && self
                .pixels
                .iter()
                .zip(&other.pixels)
                .all(|(a, b)| a.max_difference(*b) <= tolerance)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width() && y < self.height() {
            Some(y as usize * self.width() as usize + x as usize)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.descriptor.label)
            .field("size", &self.descriptor.size)
            .field("format", &self.descriptor.format)
            .finish_non_exhaustive()
    }
}
