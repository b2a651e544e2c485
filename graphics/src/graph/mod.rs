//! Render graph infrastructure.
//!
//! The render graph is a per-frame declarative description of raster passes
//! and the textures they touch. Passes never reference each other directly;
//! the [`compiler`](crate::compiler) derives ordering from the declared
//! accesses and then:
//!
//! - Orders passes via topological sort (declaration order breaks ties)
//! - Culls passes whose writes nobody observes
//! - Computes transient texture lifetimes
//!
//! # Example
//!
//! ```ignore
//! use prism_graphics::{RasterPass, RenderGraph};
//!
//! let mut graph = RenderGraph::new();
//! let color = graph.import_texture(target.descriptor().clone(), "_CameraColor");
//! let scratch = graph.create_transient_texture(target.descriptor().color_only(), "_Scratch")?;
//!
//! let mut pass = RasterPass::new("copy");
//! pass.read_texture(color);
//! pass.set_color_attachment(scratch, 0);
//! pass.set_render_func(move |ctx| ctx.draw_fullscreen_triangle(&blit, color));
//! graph.add_raster_pass(pass);
//! ```

mod pass;
mod resource;

use std::sync::atomic::{AtomicU32, Ordering};

pub use pass::{ColorAttachment, MAX_COLOR_ATTACHMENTS, RasterPass, RenderFunc};
pub use resource::{ResourceAccess, ResourceHandle, ResourceKind, TextureResource};

pub use crate::compiler::{CompiledGraph, GraphError, ResourceLifetime};
use crate::types::TextureDescriptor;

/// Handle to a pass in the render graph.
///
/// `PassHandle` is `Copy` and cheap to pass around. It is only valid within
/// the `RenderGraph` that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassHandle(u32);

impl PassHandle {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the pass in declaration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declaration state captured by [`RenderGraph::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphCheckpoint {
    passes: usize,
    resources: usize,
    edges: usize,
}

/// The render graph describes one frame's rendering operations for one camera.
#[derive(Debug)]
pub struct RenderGraph {
    id: u32,
    resources: Vec<TextureResource>,
    passes: Vec<RasterPass>,
    /// Explicit dependency edges stored as (dependent, dependency) pairs.
    edges: Vec<(PassHandle, PassHandle)>,
}

impl Default for RenderGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderGraph {
    /// Create a new empty render graph.
    pub fn new() -> Self {
        static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(0);
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            resources: Vec::new(),
            passes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Unique id of this graph; stamped into every handle it creates.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Register an externally owned texture, such as the camera target.
    pub fn import_texture(
        &mut self,
        descriptor: TextureDescriptor,
        name: impl Into<String>,
    ) -> ResourceHandle {
        self.push_resource(descriptor, name.into(), ResourceKind::Imported)
    }

    /// Declare a texture that lives only for this frame.
    ///
    /// The backend allocates it just before the first pass that uses it and
    /// releases it after the last one. A transient nobody uses is never
    /// allocated.
    pub fn create_transient_texture(
        &mut self,
        descriptor: TextureDescriptor,
        name: impl Into<String>,
    ) -> Result<ResourceHandle, GraphError> {
        let name = name.into();
        if descriptor.size.is_empty() || descriptor.size.depth != 1 {
            return Err(GraphError::InvalidTransient {
                name,
                reason: format!("unsupported extent {:?}", descriptor.size),
            });
        }
        if descriptor.format.is_depth_stencil() {
            return Err(GraphError::InvalidTransient {
                name,
                reason: format!("depth/stencil format {:?}", descriptor.format),
            });
        }
        let descriptor = TextureDescriptor {
            label: Some(name.clone()),
            ..descriptor
        };
        Ok(self.push_resource(descriptor, name, ResourceKind::Transient))
    }

    fn push_resource(
        &mut self,
        descriptor: TextureDescriptor,
        name: String,
        kind: ResourceKind,
    ) -> ResourceHandle {
        let index = self.resources.len() as u32;
        log::trace!("RenderGraph {}: {kind:?} texture '{name}' -> #{index}", self.id);
        self.resources.push(TextureResource {
            name,
            descriptor,
            kind,
        });
        ResourceHandle::new(index, self.id, kind)
    }

    /// Look up a resource by handle. Handles from other graphs return `None`.
    pub fn resource(&self, handle: ResourceHandle) -> Option<&TextureResource> {
        if handle.graph_id() != self.id {
            return None;
        }
        self.resources.get(handle.index() as usize)
    }

    /// All registered resources, indexed by [`ResourceHandle::index`].
    pub fn resources(&self) -> &[TextureResource] {
        &self.resources
    }

    /// Add a raster pass to the graph.
    ///
    /// The pass should be fully configured before adding.
    /// Returns a `PassHandle` for referencing this pass.
    pub fn add_raster_pass(&mut self, pass: RasterPass) -> PassHandle {
        let index = self.passes.len() as u32;
        log::trace!("RenderGraph {}: pass '{}' -> #{index}", self.id, pass.name());
        self.passes.push(pass);
        PassHandle::new(index)
    }

    /// Add an explicit dependency between passes.
    ///
    /// The `dependent` pass will execute after the `dependency` pass, and the
    /// dependency is kept alive whenever the dependent is.
    pub fn add_dependency(&mut self, dependent: PassHandle, dependency: PassHandle) {
        assert!(
            dependent.index() < self.passes.len(),
            "Invalid dependent handle"
        );
        assert!(
            dependency.index() < self.passes.len(),
            "Invalid dependency handle"
        );
        assert!(dependent != dependency, "Pass cannot depend on itself");

        let exists = self
            .edges
            .iter()
            .any(|&(d, dep)| d == dependent && dep == dependency);
        if !exists {
            self.edges.push((dependent, dependency));
        }
    }

    /// Get explicit dependencies of a pass.
    pub fn dependencies(&self, handle: PassHandle) -> impl Iterator<Item = PassHandle> + '_ {
        self.edges
            .iter()
            .filter(move |&&(dependent, _)| dependent == handle)
            .map(|&(_, dependency)| dependency)
    }

    pub(crate) fn edges(&self) -> &[(PassHandle, PassHandle)] {
        &self.edges
    }

    /// Get all passes in declaration order.
    pub fn passes(&self) -> &[RasterPass] {
        &self.passes
    }

    /// Get a pass by handle.
    pub fn pass(&self, handle: PassHandle) -> Option<&RasterPass> {
        self.passes.get(handle.index())
    }

    /// Get the number of passes in the graph.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Capture the current declaration state.
    pub fn checkpoint(&self) -> GraphCheckpoint {
        GraphCheckpoint {
            passes: self.passes.len(),
            resources: self.resources.len(),
            edges: self.edges.len(),
        }
    }

    /// Discard every pass, resource and edge declared after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: GraphCheckpoint) {
        self.passes.truncate(checkpoint.passes);
        self.resources.truncate(checkpoint.resources);
        self.edges.truncate(checkpoint.edges);
        let pass_count = self.passes.len();
        self.edges
            .retain(|&(a, b)| a.index() < pass_count && b.index() < pass_count);
    }

    /// Compile the graph for execution.
    pub fn compile(&self) -> Result<CompiledGraph, GraphError> {
        crate::compiler::compile(self)
    }

    /// Clear all passes and resources from the graph.
    pub fn clear(&mut self) {
        self.passes.clear();
        self.resources.clear();
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TextureFormat, TextureUsage};

    fn color_desc() -> TextureDescriptor {
        TextureDescriptor::new_2d(
            64,
            32,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
    }

    #[test]
    fn test_add_raster_pass() {
        let mut graph = RenderGraph::new();
        let handle = graph.add_raster_pass(RasterPass::new("test_pass"));
        assert_eq!(graph.pass_count(), 1);
        assert_eq!(graph.pass(handle).unwrap().name(), "test_pass");
    }

    #[test]
    fn test_import_and_transient() {
        let mut graph = RenderGraph::new();
        let color = graph.import_texture(color_desc(), "_CameraColor");
        let temp = graph
            .create_transient_texture(color_desc(), "_Temp")
            .unwrap();

        assert!(color.is_imported());
        assert!(temp.is_transient());
        assert_eq!(graph.resource(temp).unwrap().name, "_Temp");
        assert_eq!(
            graph.resource(temp).unwrap().descriptor.label.as_deref(),
            Some("_Temp")
        );
        assert_eq!(graph.resources().len(), 2);
    }

    #[test]
    fn test_transient_validation() {
        let mut graph = RenderGraph::new();
        let empty = TextureDescriptor::new_2d(0, 4, TextureFormat::Rgba8Unorm, TextureUsage::empty());
        assert!(matches!(
            graph.create_transient_texture(empty, "empty"),
            Err(GraphError::InvalidTransient { .. })
        ));

        let depth = TextureDescriptor::new_2d(4, 4, TextureFormat::Depth32Float, TextureUsage::empty());
        assert!(graph.create_transient_texture(depth, "depth").is_err());
        assert!(graph.resources().is_empty());
    }

    #[test]
    fn test_foreign_handle_lookup() {
        let mut first = RenderGraph::new();
        let handle = first.import_texture(color_desc(), "color");
        let mut second = RenderGraph::new();
        second.import_texture(color_desc(), "color");

        assert_ne!(first.id(), second.id());
        assert!(second.resource(handle).is_none());
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = RenderGraph::new();
        let pass1 = graph.add_raster_pass(RasterPass::new("geometry"));
        let pass2 = graph.add_raster_pass(RasterPass::new("lighting"));

        graph.add_dependency(pass2, pass1);
        graph.add_dependency(pass2, pass1);

        assert_eq!(graph.dependencies(pass2).collect::<Vec<_>>(), vec![pass1]);
    }

    #[test]
    #[should_panic(expected = "Pass cannot depend on itself")]
    fn test_self_dependency_panics() {
        let mut graph = RenderGraph::new();
        let pass = graph.add_raster_pass(RasterPass::new("a"));
        graph.add_dependency(pass, pass);
    }

    #[test]
    fn test_checkpoint_rollback() {
        let mut graph = RenderGraph::new();
        let a = graph.add_raster_pass(RasterPass::new("a"));
        graph.import_texture(color_desc(), "color");
        let checkpoint = graph.checkpoint();

        graph.create_transient_texture(color_desc(), "temp").unwrap();
        let b = graph.add_raster_pass(RasterPass::new("b"));
        graph.add_dependency(b, a);

        graph.rollback(checkpoint);
        assert_eq!(graph.pass_count(), 1);
        assert_eq!(graph.resources().len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut graph = RenderGraph::new();
        graph.add_raster_pass(RasterPass::new("test_pass"));
        graph.import_texture(color_desc(), "color");

        graph.clear();

        assert_eq!(graph.pass_count(), 0);
        assert!(graph.resources().is_empty());
    }
}
