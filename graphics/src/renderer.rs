//! Per-camera frame driver.
//!
//! [`Renderer::render_camera`] runs one camera's frame:
//!
//! 1. Notify [`CameraEvents`] listeners so they can enqueue passes
//! 2. Import the camera target into a fresh [`RenderGraph`]
//! 3. Optionally declare a clear pass
//! 4. Let every enqueued [`RenderPass`](crate::frame::RenderPass) declare its
//!    work, in timeline order
//! 5. Compile and execute the graph on the [`SoftwareBackend`]

use crate::backend::{ExecutionStats, SoftwareBackend};
use crate::error::GraphicsError;
use crate::frame::FrameResources;
use crate::graph::{RasterPass, RenderGraph};
use crate::resources::Texture;
use crate::scene::{Camera, CameraEvents, CameraFrame};

/// Name of the imported camera color target in every frame graph.
pub const CAMERA_COLOR_TARGET: &str = "_CameraColorTarget";

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Frames an unused pooled transient texture survives.
    pub max_idle_frames: u32,
    /// Abort the frame when a pass fails to declare its work instead of
    /// skipping that pass.
    pub strict_declarations: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_idle_frames: SoftwareBackend::DEFAULT_MAX_IDLE_FRAMES,
            strict_declarations: false,
        }
    }
}

impl RendererConfig {
    /// Set how many frames an unused pooled texture survives.
    pub fn with_max_idle_frames(mut self, frames: u32) -> Self {
        self.max_idle_frames = frames;
        self
    }

    /// Abort frames on declaration failures.
    pub fn with_strict_declarations(mut self, strict: bool) -> Self {
        self.strict_declarations = strict;
        self
    }
}

/// Outcome of one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Name of the camera.
    pub camera: String,
    /// Number of raster passes declared into the graph.
    pub declared_passes: usize,
    /// Names of executed passes, in execution order.
    pub executed_passes: Vec<String>,
    /// Names of passes removed by culling.
    pub culled_passes: Vec<String>,
    /// Render passes whose declaration failed and were rolled back.
    pub skipped_passes: Vec<String>,
    /// Backend counters.
    pub stats: ExecutionStats,
}

/// Drives camera frames through the render graph.
#[derive(Debug)]
pub struct Renderer {
    backend: SoftwareBackend,
    events: CameraEvents,
    config: RendererConfig,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl Renderer {
    /// Create a renderer with its own notification hub.
    pub fn new(config: RendererConfig) -> Self {
        Self {
            backend: SoftwareBackend::new().with_max_idle_frames(config.max_idle_frames),
            events: CameraEvents::new(),
            config,
        }
    }

    /// The hub notified at the start of each camera frame.
    pub fn events(&self) -> &CameraEvents {
        &self.events
    }

    /// Renderer configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The execution backend.
    pub fn backend(&self) -> &SoftwareBackend {
        &self.backend
    }

    /// Render one frame of `camera` into `target`.
    pub fn render_camera(
        &mut self,
        camera: &Camera,
        target: &mut Texture,
    ) -> Result<FrameReport, GraphicsError> {
        if target.size() != camera.target.size || target.format() != camera.target.format {
            return Err(GraphicsError::InvalidParameter(format!(
                "camera '{}' expects a {:?} {:?} target, got {:?} {:?}",
                camera.name,
                camera.target.size,
                camera.target.format,
                target.size(),
                target.format()
            )));
        }

        let mut frame = CameraFrame::new(camera);
        self.events.notify(&mut frame);

        let mut graph = RenderGraph::new();
        let active_color = graph.import_texture(camera.target.clone(), CAMERA_COLOR_TARGET);
        if let Some(color) = camera.clear_color.as_color() {
            let mut clear = RasterPass::new("Clear");
            clear.set_color_attachment(active_color, 0);
            clear.set_render_func(move |ctx| ctx.clear(color));
            graph.add_raster_pass(clear);
        }

        let resources = FrameResources {
            active_color,
            camera_target: camera.target.clone(),
        };
        let mut report = FrameReport {
            camera: camera.name.clone(),
            ..FrameReport::default()
        };
        for queued in frame.queue.into_ordered() {
            let checkpoint = graph.checkpoint();
            if let Err(e) = queued.pass.record_render_graph(&mut graph, &resources) {
                if self.config.strict_declarations {
                    return Err(e);
                }
                log::error!(
                    "camera '{}': pass '{}' failed to declare: {e}",
                    camera.name,
                    queued.pass.name()
                );
                graph.rollback(checkpoint);
                report.skipped_passes.push(queued.pass.name().to_string());
            }
        }

        report.declared_passes = graph.pass_count();
        let compiled = graph.compile()?;
        report.stats = self
            .backend
            .execute_graph(&graph, &compiled, [(active_color, target)])?;

        let pass_name = |handle| {
            graph
                .pass(handle)
                .map(|p| p.name().to_string())
                .unwrap_or_default()
        };
        report.executed_passes = compiled.pass_order().iter().copied().map(pass_name).collect();
        report.culled_passes = compiled.culled_passes().iter().copied().map(pass_name).collect();

        log::debug!(
            "camera '{}': {} declared, {} executed, {} culled",
            camera.name,
            report.declared_passes,
            report.executed_passes.len(),
            report.culled_passes.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::frame::{InjectionPoint, RenderPass};
    use crate::materials::Material;
    use crate::scene::CameraType;
    use crate::types::{Color, TextureDescriptor, TextureFormat, TextureUsage};

    fn camera(camera_type: CameraType) -> Camera {
        Camera::new(
            "main",
            camera_type,
            TextureDescriptor::new_2d(
                4,
                4,
                TextureFormat::Rgba8Unorm,
                TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
            ),
        )
    }

    struct Broken;

    impl RenderPass for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn record_render_graph(
            &self,
            graph: &mut RenderGraph,
            frame: &FrameResources,
        ) -> Result<(), GraphicsError> {
            // Declares half its work, then fails.
            let mut pass = RasterPass::new("Broken/Half");
            pass.set_color_attachment(frame.active_color, 0);
            pass.set_render_func(|ctx| ctx.clear(Color::BLACK));
            graph.add_raster_pass(pass);
            Err(GraphicsError::Internal("broken".into()))
        }
    }

    struct Invert;

    impl RenderPass for Invert {
        fn name(&self) -> &str {
            "Invert"
        }

        fn record_render_graph(
            &self,
            graph: &mut RenderGraph,
            frame: &FrameResources,
        ) -> Result<(), GraphicsError> {
            let temp = graph.create_transient_texture(frame.camera_target.color_only(), "_Temp")?;
            let source = frame.active_color;
            let invert = Arc::new(Material::invert());
            let blit = Arc::new(Material::blit());

            let mut apply = RasterPass::new("Invert/Apply");
            apply.read_texture(source).set_color_attachment(temp, 0);
            apply.set_render_func(move |ctx| ctx.draw_fullscreen_triangle(&invert, source));
            graph.add_raster_pass(apply);

            let mut back = RasterPass::new("Invert/CopyBack");
            back.read_texture(temp).set_color_attachment(source, 0);
            back.set_render_func(move |ctx| ctx.draw_fullscreen_triangle(&blit, temp));
            graph.add_raster_pass(back);
            Ok(())
        }
    }

    #[test]
    fn test_clear_only_frame() {
        let mut renderer = Renderer::default();
        let camera = camera(CameraType::Game).with_clear_color(Color::WHITE);
        let mut target = Texture::new(camera.target.clone()).unwrap();

        let report = renderer.render_camera(&camera, &mut target).unwrap();
        assert_eq!(report.executed_passes, vec!["Clear"]);
        assert!(target.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_enqueued_pass_runs_after_clear() {
        let mut renderer = Renderer::default();
        let _subscription = renderer.events().subscribe(|frame| {
            frame
                .queue
                .enqueue(Arc::new(Invert), InjectionPoint::BeforeRenderingPostProcessing);
        });
        let camera = camera(CameraType::Game).with_clear_color(Color::WHITE);
        let mut target = Texture::new(camera.target.clone()).unwrap();

        let report = renderer.render_camera(&camera, &mut target).unwrap();
        assert_eq!(
            report.executed_passes,
            vec!["Clear", "Invert/Apply", "Invert/CopyBack"]
        );
        assert!(target.pixels().iter().all(|c| c.to_rgba8() == [0, 0, 0, 255]));
    }

    #[test]
    fn test_failed_declaration_is_rolled_back() {
        let mut renderer = Renderer::default();
        let _subscription = renderer.events().subscribe(|frame| {
            frame.queue.enqueue(Arc::new(Broken), InjectionPoint::AfterRendering);
        });
        let camera = camera(CameraType::Game).with_clear_color(Color::WHITE);
        let mut target = Texture::new(camera.target.clone()).unwrap();

        let report = renderer.render_camera(&camera, &mut target).unwrap();
        assert_eq!(report.declared_passes, 1);
        assert_eq!(report.skipped_passes, vec!["Broken"]);
        assert!(target.pixels().iter().all(|&c| c == Color::WHITE));
    }

    #[test]
    fn test_strict_declarations_abort_frame() {
        let mut renderer = Renderer::new(RendererConfig::default().with_strict_declarations(true));
        let _subscription = renderer.events().subscribe(|frame| {
            frame.queue.enqueue(Arc::new(Broken), InjectionPoint::AfterRendering);
        });
        let camera = camera(CameraType::Game);
        let mut target = Texture::new(camera.target.clone()).unwrap();

        let result = renderer.render_camera(&camera, &mut target);
        assert_eq!(result, Err(GraphicsError::Internal("broken".into())));
    }

    #[test]
    fn test_target_mismatch_rejected() {
        let mut renderer = Renderer::default();
        let camera = camera(CameraType::Game);
        let mut target = Texture::new(TextureDescriptor::new_2d(
            8,
            8,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT,
        ))
        .unwrap();

        assert!(matches!(
            renderer.render_camera(&camera, &mut target),
            Err(GraphicsError::InvalidParameter(_))
        ));
    }
}
