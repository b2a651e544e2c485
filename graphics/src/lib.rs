//! # Prism Graphics
//!
//! CPU render graph for full-frame passes.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderGraph`] - Declarative description of raster passes and the textures they touch
//! - [`compiler`] - Validation, culling, ordering and transient lifetimes
//! - [`SoftwareBackend`] - Executes compiled graphs with a software rasterizer
//! - [`frame`] - Injection points and the per-camera pass queue
//! - [`scene`] - Cameras and the per-frame camera notification hub
//! - [`Renderer`] - Runs one camera frame end to end
//!
//! ## Example
//!
//! ```ignore
//! use prism_graphics::{Camera, CameraType, Renderer, Texture};
//!
//! let mut renderer = Renderer::default();
//! let _subscription = renderer.events().subscribe(|frame| {
//!     frame.queue.enqueue(my_pass.clone(), InjectionPoint::AfterRenderingOpaques);
//! });
//! let report = renderer.render_camera(&camera, &mut target)?;
//! ```

pub mod backend;
pub mod compiler;
pub mod error;
pub mod frame;
pub mod graph;
pub mod materials;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod types;

// Re-export main types for convenience
pub use backend::{ExecutionStats, RasterContext, SoftwareBackend, TransientPool};
pub use error::GraphicsError;
pub use frame::{FrameResources, InjectionPoint, PassQueue, RenderPass};
pub use graph::{
    CompiledGraph, GraphError, PassHandle, RasterPass, RenderGraph, ResourceAccess,
    ResourceHandle, ResourceKind,
};
pub use materials::{FragmentInput, Material};
pub use renderer::{CAMERA_COLOR_TARGET, FrameReport, Renderer, RendererConfig};
pub use resources::Texture;
pub use scene::{Camera, CameraEvents, CameraFrame, CameraType, Subscription};
pub use types::{ClearValue, Color, Extent3d, TextureDescriptor, TextureFormat, TextureUsage};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// Only logs the version; there is no global state to set up.
pub fn init() {
    log::info!("Prism Graphics v{} initialized", VERSION);
}
