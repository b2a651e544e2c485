//! Common utilities for render graph integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use prism_graphics::{
    Camera, CameraType, Color, FrameResources, GraphicsError, Material, RasterPass, RenderGraph,
    RenderPass, ResourceHandle, Texture, TextureDescriptor, TextureFormat, TextureUsage,
};

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Descriptor of a camera color target.
pub fn target_descriptor(width: u32, height: u32) -> TextureDescriptor {
    TextureDescriptor::new_2d(
        width,
        height,
        TextureFormat::Rgba8Unorm,
        TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
    )
    .with_label("camera_target")
}

/// A camera of the given type rendering into a `width` x `height` target.
pub fn camera(camera_type: CameraType, width: u32, height: u32) -> Camera {
    Camera::new(format!("{camera_type:?}"), camera_type, target_descriptor(width, height))
}

/// Texture where every pixel encodes its own coordinates.
pub fn generate_test_pattern(width: u32, height: u32) -> Texture {
    let mut texture = Texture::new(target_descriptor(width, height)).expect("valid descriptor");
    for y in 0..height {
        for x in 0..width {
            let color = Color::from_rgba8([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
            texture.set_pixel(x, y, color);
        }
    }
    texture
}

/// Read one pixel as RGBA8.
pub fn get_pixel(texture: &Texture, x: u32, y: u32) -> [u8; 4] {
    texture.pixel(x, y).expect("pixel in bounds").to_rgba8()
}

/// Assert every pixel equals `expected`.
pub fn assert_solid(texture: &Texture, expected: [u8; 4]) {
    for y in 0..texture.height() {
        for x in 0..texture.width() {
            assert_eq!(get_pixel(texture, x, y), expected, "pixel ({x}, {y})");
        }
    }
}

/// Two-pass round trip through a transient: `first` into the scratch
/// texture, `second` back into the active color.
pub struct RoundTrip {
    pub first: Arc<Material>,
    pub second: Arc<Material>,
}

impl RoundTrip {
    pub fn new(first: Material, second: Material) -> Arc<Self> {
        Arc::new(Self {
            first: Arc::new(first),
            second: Arc::new(second),
        })
    }
}

impl RenderPass for RoundTrip {
    fn name(&self) -> &str {
        "RoundTrip"
    }

    fn record_render_graph(
        &self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> Result<(), GraphicsError> {
        let scratch = graph.create_transient_texture(frame.camera_target.color_only(), "_Scratch")?;
        add_draw(graph, "RoundTrip/Apply", &self.first, frame.active_color, scratch);
        add_draw(graph, "RoundTrip/CopyBack", &self.second, scratch, frame.active_color);
        Ok(())
    }
}

/// Add a pass drawing `material` from `source` into `target`.
pub fn add_draw(
    graph: &mut RenderGraph,
    name: &str,
    material: &Arc<Material>,
    source: ResourceHandle,
    target: ResourceHandle,
) {
    let material = Arc::clone(material);
    let mut pass = RasterPass::new(name);
    pass.read_texture(source).set_color_attachment(target, 0);
    pass.set_render_func(move |ctx| ctx.draw_fullscreen_triangle(&material, source));
    graph.add_raster_pass(pass);
}
