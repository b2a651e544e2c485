//! The color blit round trip.

use std::sync::Arc;

use prism_graphics::{
    FrameResources, GraphicsError, Material, RasterPass, RenderGraph, RenderPass, ResourceHandle,
};

/// Name of the scratch texture.
pub const TEMP_TEXTURE: &str = "_ColorBlitTemp";
/// Name of the pass writing the scratch texture.
pub const APPLY_PASS: &str = "ColorBlit/Apply";
/// Name of the pass writing back into the camera color.
pub const COPY_BACK_PASS: &str = "ColorBlit/CopyBack";

/// Applies a material to the camera color in place.
///
/// A pass cannot sample the attachment it renders into, so the transform
/// bounces through a transient copy:
///
/// ```text
/// active color --first--> _ColorBlitTemp --second--> active color
/// ```
#[derive(Debug, Clone)]
pub struct ColorBlitPass {
    first: Arc<Material>,
    second: Arc<Material>,
}

impl ColorBlitPass {
    /// Create the pass from its two materials.
    pub fn new(first: Arc<Material>, second: Arc<Material>) -> Self {
        Self { first, second }
    }

    /// Material of the first copy.
    pub fn first_material(&self) -> &Arc<Material> {
        &self.first
    }

    /// Material of the copy back.
    pub fn second_material(&self) -> &Arc<Material> {
        &self.second
    }
}

/// Declare one full-screen draw of `material` from `source` into `target`.
fn add_blit(
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

impl RenderPass for ColorBlitPass {
    fn name(&self) -> &str {
        "ColorBlit"
    }

    fn record_render_graph(
        &self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> Result<(), GraphicsError> {
        let active = frame.active_color;
        let temp = graph.create_transient_texture(frame.camera_target.color_only(), TEMP_TEXTURE)?;

        add_blit(graph, APPLY_PASS, &self.first, active, temp);
        add_blit(graph, COPY_BACK_PASS, &self.second, temp, active);
        Ok(())
    }
}
