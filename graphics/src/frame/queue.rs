//! Per-camera pass queue.

use std::sync::Arc;

use crate::error::GraphicsError;
use crate::graph::{RenderGraph, ResourceHandle};
use crate::types::TextureDescriptor;

use super::InjectionPoint;

/// Per-frame resources a pass can build on.
#[derive(Debug, Clone)]
pub struct FrameResources {
    /// The camera's color target, imported into the graph.
    pub active_color: ResourceHandle,
    /// Descriptor of the camera target (size, format, depth bits, samples).
    pub camera_target: TextureDescriptor,
}

/// A pass contributed to a camera's frame.
///
/// `record_render_graph` only declares work: it adds passes and transient
/// textures to `graph` and hands each pass a recording function. Nothing is
/// drawn until the graph executes.
pub trait RenderPass: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Declare this pass's work into the frame's graph.
    fn record_render_graph(
        &self,
        graph: &mut RenderGraph,
        frame: &FrameResources,
    ) -> Result<(), GraphicsError>;
}

/// A pass waiting in a [`PassQueue`].
#[derive(Clone)]
pub struct QueuedPass {
    /// The pass.
    pub pass: Arc<dyn RenderPass>,
    /// Where on the timeline it records.
    pub injection_point: InjectionPoint,
}

impl std::fmt::Debug for QueuedPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedPass")
            .field("pass", &self.pass.name())
            .field("injection_point", &self.injection_point)
            .finish()
    }
}

/// Passes enqueued for one camera's frame.
#[derive(Debug, Default)]
pub struct PassQueue {
    entries: Vec<QueuedPass>,
}

impl PassQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `pass` at `injection_point`.
    pub fn enqueue(&mut self, pass: Arc<dyn RenderPass>, injection_point: InjectionPoint) {
        log::debug!("enqueue '{}' at {injection_point}", pass.name());
        self.entries.push(QueuedPass {
            pass,
            injection_point,
        });
    }

    /// Number of enqueued passes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was enqueued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Passes in enqueue order.
    pub fn entries(&self) -> &[QueuedPass] {
        &self.entries
    }

    /// Consume the queue, yielding passes in timeline order.
    pub fn into_ordered(mut self) -> Vec<QueuedPass> {
        // Stable: equal points keep enqueue order.
        self.entries.sort_by_key(|entry| entry.injection_point);
        self.entries
    }
}
