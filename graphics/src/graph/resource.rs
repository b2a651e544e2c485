//! Resource handles for the render graph.

use crate::types::TextureDescriptor;

/// Where a graph resource lives and who owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Owned outside the graph (e.g. the camera color target). Its contents
    /// survive the frame, so writes to it are always observable.
    Imported,
    /// Allocated by the backend for this frame only.
    Transient,
}

/// Handle to a texture resource in a [`RenderGraph`](super::RenderGraph).
///
/// Handles carry the id of the graph that created them so a handle kept from
/// a previous frame is rejected instead of aliasing a new resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    /// Index into the graph's resource table.
    index: u32,
    /// Id of the owning graph.
    graph_id: u32,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub(crate) fn new(index: u32, graph_id: u32, kind: ResourceKind) -> Self {
        Self {
            index,
            graph_id,
            kind,
        }
    }

    /// Get the index of this resource.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the id of the graph this handle belongs to.
    pub fn graph_id(&self) -> u32 {
        self.graph_id
    }

    /// Get the resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Check if this handle refers to a transient resource.
    pub fn is_transient(&self) -> bool {
        self.kind == ResourceKind::Transient
    }

    /// Check if this handle refers to an imported (persistent) resource.
    pub fn is_imported(&self) -> bool {
        self.kind == ResourceKind::Imported
    }
}

/// Resource access type for dependency tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAccess {
    /// Read-only access (sampled).
    Read,
    /// Write access (bound as an attachment).
    Write,
}

impl ResourceAccess {
    /// Check if this access includes reading.
    pub fn reads(&self) -> bool {
        matches!(self, Self::Read)
    }

    /// Check if this access includes writing.
    pub fn writes(&self) -> bool {
        matches!(self, Self::Write)
    }
}

/// A texture registered with the graph.
#[derive(Debug, Clone)]
pub struct TextureResource {
    /// Debug name.
    pub name: String,
    /// Descriptor the resource is allocated with.
    pub descriptor: TextureDescriptor,
    /// Ownership of the resource.
    pub kind: ResourceKind,
}
