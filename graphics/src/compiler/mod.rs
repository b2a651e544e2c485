//! Render graph compilation.
//!
//! This module handles the compilation of a [`RenderGraph`]
//! into an execution plan ([`CompiledGraph`]).
//!
//! Compilation runs in five steps:
//!
//! 1. **Validation** - render functions present, handles belong to the graph,
//!    usage flags allow each access, no pass samples a texture it also
//!    renders into
//! 2. **Dependency derivation** - read-after-write, write-after-read and
//!    write-after-write edges in declaration order, plus explicit edges
//! 3. **Culling** - passes are kept when they write an imported texture, opt
//!    out of culling, or feed a kept pass; everything else is dropped
//! 4. **Topological sort** - Kahn's algorithm, ties broken by declaration order
//! 5. **Lifetime analysis** - first and last use of each transient texture
//!
//! # Example
//!
//! ```ignore
//! let compiled = graph.compile()?;
//! for &pass in compiled.pass_order() {
//!     // execute pass
//! }
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::graph::{MAX_COLOR_ATTACHMENTS, PassHandle, RasterPass, RenderGraph, ResourceHandle};
use crate::types::TextureUsage;

/// Range of compiled positions during which a transient texture is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLifetime {
    /// Position in [`CompiledGraph::pass_order`] of the first use.
    pub first: usize,
    /// Position in [`CompiledGraph::pass_order`] of the last use.
    pub last: usize,
}

/// A compiled render graph ready for execution.
///
/// Contains a topologically sorted order of the surviving passes, the passes
/// that were culled, and the lifetime of every transient texture in use.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CompiledGraph {
    pass_order: Vec<PassHandle>,
    culled: Vec<PassHandle>,
    /// Indexed by resource index; `None` for imported or unused textures.
    lifetimes: Vec<Option<ResourceLifetime>>,
}

impl CompiledGraph {
    /// Pass execution order as handles.
    pub fn pass_order(&self) -> &[PassHandle] {
        &self.pass_order
    }

    /// Passes removed because nothing observes their writes, in declaration order.
    pub fn culled_passes(&self) -> &[PassHandle] {
        &self.culled
    }

    /// Check whether a pass survived culling.
    pub fn is_culled(&self, handle: PassHandle) -> bool {
        self.culled.contains(&handle)
    }

    /// Lifetime of a transient texture, if any surviving pass uses it.
    pub fn lifetime(&self, handle: ResourceHandle) -> Option<ResourceLifetime> {
        self.lifetimes
            .get(handle.index() as usize)
            .copied()
            .flatten()
    }

    /// Lifetimes indexed by resource index.
    pub fn lifetimes(&self) -> &[Option<ResourceLifetime>] {
        &self.lifetimes
    }

    /// Get the number of passes that will execute.
    pub fn pass_count(&self) -> usize {
        self.pass_order.len()
    }

    /// Check if no pass will execute.
    pub fn is_empty(&self) -> bool {
        self.pass_order.is_empty()
    }
}

/// Errors that can occur during graph validation or compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The graph contains a cyclic dependency.
    #[error("render graph contains cyclic dependency")]
    CyclicDependency,

    /// An invalid pass handle was encountered.
    #[error("invalid pass handle: {0:?}")]
    InvalidPassHandle(PassHandle),

    /// A pass used a handle created by another graph (e.g. a previous frame).
    #[error("pass '{pass}' uses a resource from another graph: {resource:?}")]
    ForeignResource {
        /// Name of the pass.
        pass: String,
        /// The stale handle.
        resource: ResourceHandle,
    },

    /// A pass was added without a render function.
    #[error("pass '{0}' has no render function")]
    MissingRenderFunc(String),

    /// A texture is accessed in a way its usage flags do not allow.
    #[error("pass '{pass}' needs {usage:?} on '{resource}'")]
    MissingUsage {
        /// Name of the pass.
        pass: String,
        /// Name of the texture.
        resource: String,
        /// The usage the access requires.
        usage: TextureUsage,
    },

    /// A pass samples a texture it is also rendering into.
    #[error("pass '{pass}' reads and writes '{resource}' in the same pass")]
    ReadWriteAliasing {
        /// Name of the pass.
        pass: String,
        /// Name of the aliased texture.
        resource: String,
    },

    /// A pass reads a transient texture no earlier pass has written.
    #[error("pass '{pass}' reads transient '{resource}' before anything wrote it")]
    UninitializedRead {
        /// Name of the pass.
        pass: String,
        /// Name of the texture.
        resource: String,
    },

    /// Attachment slot outside `0..MAX_COLOR_ATTACHMENTS`.
    #[error("pass '{pass}' binds color attachment slot {slot}")]
    InvalidAttachmentSlot {
        /// Name of the pass.
        pass: String,
        /// The slot.
        slot: u32,
    },

    /// Color attachments of one pass differ in size.
    #[error("pass '{0}' binds color attachments of different sizes")]
    AttachmentSizeMismatch(String),

    /// A transient texture was declared with an unusable descriptor.
    #[error("transient texture '{name}' is invalid: {reason}")]
    InvalidTransient {
        /// Name of the texture.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Compile a render graph into an execution plan.
pub fn compile(graph: &RenderGraph) -> Result<CompiledGraph, GraphError> {
    let passes = graph.passes();
    for pass in passes {
        validate_pass(graph, pass)?;
    }
    for &(a, b) in graph.edges() {
        for handle in [a, b] {
            if handle.index() >= passes.len() {
                return Err(GraphError::InvalidPassHandle(handle));
            }
        }
    }

    let edges = derive_edges(graph)?;
    let live = find_live_passes(passes, graph, &edges.data);
    let pass_order = sort_live_passes(passes.len(), &live, &edges)?;

    let culled: Vec<PassHandle> = (0..passes.len())
        .filter(|&i| !live[i])
        .map(|i| PassHandle::new(i as u32))
        .collect();
    for &handle in &culled {
        log::debug!("culled pass '{}'", passes[handle.index()].name());
    }

    let mut lifetimes = vec![None; graph.resources().len()];
    for (position, handle) in pass_order.iter().enumerate() {
        for &(resource, _) in passes[handle.index()].accesses() {
            if !resource.is_transient() {
                continue;
            }
            lifetimes[resource.index() as usize]
                .get_or_insert(ResourceLifetime {
                    first: position,
                    last: position,
                })
                .last = position;
        }
    }

    Ok(CompiledGraph {
        pass_order,
        culled,
        lifetimes,
    })
}

fn validate_pass(graph: &RenderGraph, pass: &RasterPass) -> Result<(), GraphError> {
    if !pass.has_render_func() {
        return Err(GraphError::MissingRenderFunc(pass.name().to_string()));
    }

    for &(resource, access) in pass.accesses() {
        let Some(texture) = graph.resource(resource) else {
            return Err(GraphError::ForeignResource {
                pass: pass.name().to_string(),
                resource,
            });
        };
        let usage = if access.writes() {
            TextureUsage::RENDER_ATTACHMENT
        } else {
            TextureUsage::TEXTURE_BINDING
        };
        if !texture.descriptor.usage.contains(usage) {
            return Err(GraphError::MissingUsage {
                pass: pass.name().to_string(),
                resource: texture.name.clone(),
                usage,
            });
        }
    }

    let mut extent = None;
    for attachment in pass.color_attachments() {
        if attachment.slot >= MAX_COLOR_ATTACHMENTS {
            return Err(GraphError::InvalidAttachmentSlot {
                pass: pass.name().to_string(),
                slot: attachment.slot,
            });
        }
        // Checked above: every access resolves.
        let Some(texture) = graph.resource(attachment.texture) else {
            continue;
        };
        if pass.reads().any(|r| r == attachment.texture) {
            return Err(GraphError::ReadWriteAliasing {
                pass: pass.name().to_string(),
                resource: texture.name.clone(),
            });
        }
        let size = (texture.descriptor.width(), texture.descriptor.height());
        match extent {
            None => extent = Some(size),
            Some(existing) if existing != size => {
                return Err(GraphError::AttachmentSizeMismatch(pass.name().to_string()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Edges as (dependent, dependency) index pairs.
struct DerivedEdges {
    /// Edges along which data flows; they keep dependencies alive.
    data: Vec<(usize, usize)>,
    /// Write-after-read edges; they only constrain order.
    order: Vec<(usize, usize)>,
}

fn derive_edges(graph: &RenderGraph) -> Result<DerivedEdges, GraphError> {
    let resource_count = graph.resources().len();
    let mut last_writer: Vec<Option<usize>> = vec![None; resource_count];
    let mut readers: Vec<Vec<usize>> = vec![Vec::new(); resource_count];
    let mut edges = DerivedEdges {
        data: graph
            .edges()
            .iter()
            .map(|&(dependent, dependency)| (dependent.index(), dependency.index()))
            .collect(),
        order: Vec::new(),
    };

    for (i, pass) in graph.passes().iter().enumerate() {
        for resource in pass.reads() {
            let r = resource.index() as usize;
            match last_writer[r] {
                Some(writer) => edges.data.push((i, writer)),
                None if resource.is_transient() => {
                    return Err(GraphError::UninitializedRead {
                        pass: pass.name().to_string(),
                        resource: graph.resources()[r].name.clone(),
                    });
                }
                None => {}
            }
            readers[r].push(i);
        }
        for resource in pass.writes() {
            let r = resource.index() as usize;
            // Attachments load their previous contents.
            if let Some(writer) = last_writer[r] {
                edges.data.push((i, writer));
            }
            for reader in readers[r].drain(..) {
                if reader != i {
                    edges.order.push((i, reader));
                }
            }
            last_writer[r] = Some(i);
        }
    }
    Ok(edges)
}

fn find_live_passes(passes: &[RasterPass], graph: &RenderGraph, data: &[(usize, usize)]) -> Vec<bool> {
    let mut live = vec![false; passes.len()];
    let mut stack: Vec<usize> = passes
        .iter()
        .enumerate()
        .filter(|(_, pass)| !pass.allows_culling() || pass.writes().any(|h| h.is_imported()))
        .map(|(i, _)| i)
        .collect();

    while let Some(i) = stack.pop() {
        if live[i] {
            continue;
        }
        live[i] = true;
        stack.extend(
            data.iter()
                .filter(|&&(dependent, _)| dependent == i)
                .map(|&(_, dependency)| dependency),
        );
    }

    log::trace!(
        "RenderGraph {}: {} of {} passes live",
        graph.id(),
        live.iter().filter(|&&l| l).count(),
        passes.len()
    );
    live
}

fn sort_live_passes(
    pass_count: usize,
    live: &[bool],
    edges: &DerivedEdges,
) -> Result<Vec<PassHandle>, GraphError> {
    let all_edges: Vec<(usize, usize)> = edges
        .data
        .iter()
        .chain(&edges.order)
        .copied()
        .filter(|&(a, b)| live[a] && live[b])
        .collect();

    let mut in_degree = vec![0u32; pass_count];
    for &(dependent, _) in &all_edges {
        in_degree[dependent] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..pass_count)
        .filter(|&i| live[i] && in_degree[i] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(pass_count);
    while let Some(Reverse(i)) = ready.pop() {
        order.push(PassHandle::new(i as u32));
        for &(dependent, dependency) in &all_edges {
            if dependency == i {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    if order.len() != live.iter().filter(|&&l| l).count() {
        return Err(GraphError::CyclicDependency);
    }
    Ok(order)
}
