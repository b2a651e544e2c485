//! Debug texture inspection.
//!
//! Copies the camera color into a transient texture and logs its average
//! color. Nothing reads the copy, so the pass must opt out of culling to run
//! at all; with culling allowed the compiler removes it.

use std::sync::Arc;

use prism_graphics::{
    FrameResources, GraphicsError, InjectionPoint, Material, RasterPass, RenderGraph, RenderPass,
};

use crate::error::ConfigError;
use crate::registrar::{Feature, Registrar};

/// Name of the inspection copy.
pub const DEBUG_TEXTURE: &str = "_DebugTexture";
/// Name of the declared raster pass.
pub const DEBUG_PASS: &str = "DebugTexture/Copy";

/// Settings of the debug texture feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugTextureSettings {
    /// Where the copy records.
    pub injection_point: InjectionPoint,
    /// Let the compiler drop the copy. Off by default, since nothing
    /// consumes the copy.
    pub allow_culling: bool,
}

impl Default for DebugTextureSettings {
    fn default() -> Self {
        Self {
            injection_point: InjectionPoint::AfterRendering,
            allow_culling: false,
        }
    }
}

/// Inspection copy of the camera color.
#[derive(Debug, Clone)]
pub struct DebugTexturePass {
    material: Arc<Material>,
    allow_culling: bool,
}

impl DebugTexturePass {
    /// Create the pass.
    pub fn new(allow_culling: bool) -> Self {
        Self {
            material: Arc::new(Material::blit()),
            allow_culling,
        }
    }
}

impl RenderPass for DebugTexturePass {
    fn name(&self) -> &str {
        "DebugTexture"
    }

    fn record_render_graph(
        &self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> Result<(), GraphicsError> {
        let source = frame.active_color;
        let debug = graph.create_transient_texture(frame.camera_target.color_only(), DEBUG_TEXTURE)?;
        let material = Arc::clone(&self.material);

        let mut pass = RasterPass::new(DEBUG_PASS);
        pass.read_texture(source)
            .set_color_attachment(debug, 0)
            .set_allow_culling(self.allow_culling);
        pass.set_render_func(move |ctx| {
            ctx.draw_fullscreen_triangle(&material, source)?;
            if let Some(copy) = ctx.attachment(0) {
                let average = copy.average().to_rgba8();
                log::info!(
                    "{}: {}x{} average rgba {average:?}",
                    ctx.pass_name(),
                    copy.width(),
                    copy.height()
                );
            }
            Ok(())
        });
        graph.add_raster_pass(pass);
        Ok(())
    }
}

/// [`Feature`] building a [`DebugTexturePass`].
#[derive(Debug, Clone, Default)]
pub struct DebugTextureFeature {
    /// Current settings.
    pub settings: DebugTextureSettings,
}

impl DebugTextureFeature {
    /// Create the feature.
    pub fn new(settings: DebugTextureSettings) -> Self {
        Self { settings }
    }
}

impl Feature for DebugTextureFeature {
    type Pass = DebugTexturePass;

    fn name(&self) -> &str {
        "DebugTexture"
    }

    fn injection_point(&self) -> InjectionPoint {
        self.settings.injection_point
    }

    fn create_pass(&self) -> Result<Arc<DebugTexturePass>, ConfigError> {
        Ok(Arc::new(DebugTexturePass::new(self.settings.allow_culling)))
    }
}

static_assertions::assert_impl_all!(Registrar<DebugTextureFeature>: Send, Sync);

#[cfg(test)]
mod tests {
    use prism_graphics::{TextureDescriptor, TextureFormat, TextureUsage};

    use super::*;

    #[test]
    fn test_declared_pass_opts_out_of_culling() {
        let mut graph = RenderGraph::new();
        let descriptor = TextureDescriptor::new_2d(
            4,
            4,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
        .with_depth_bits(32);
        let frame = FrameResources {
            active_color: graph.import_texture(descriptor.clone(), "_CameraColorTarget"),
            camera_target: descriptor,
        };

        let feature = DebugTextureFeature::default();
        let pass = feature.create_pass().unwrap();
        pass.record_render_graph(&mut graph, &frame).unwrap();

        assert_eq!(graph.pass_count(), 1);
        assert!(!graph.passes()[0].allows_culling());
        let copy = graph.resources().iter().find(|r| r.name == DEBUG_TEXTURE).unwrap();
        assert_eq!(copy.descriptor.depth_bits, 0);
    }
}
