//! CPU software backend.
//!
//! Executes a compiled render graph against textures in system memory.
//! Transient textures come from a [`TransientPool`] at their first use and go
//! back to it after their last use.

use crate::error::GraphicsError;
use crate::graph::{CompiledGraph, GraphError, RenderGraph, ResourceHandle};
use crate::resources::Texture;

use super::pool::TransientPool;
use super::raster::{RasterContext, Slot};

/// Counters collected while executing one graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Passes whose render function ran.
    pub executed_passes: usize,
    /// Full-screen draws recorded across all passes.
    pub draw_calls: u32,
    /// Transient textures freshly allocated.
    pub transient_allocations: usize,
    /// Transient textures served from the pool's free list.
    pub transient_reuses: usize,
}

/// Software rasterizer backend.
#[derive(Debug)]
pub struct SoftwareBackend {
    pool: TransientPool,
    max_idle_frames: u32,
    frame_index: u64,
}

impl SoftwareBackend {
    /// Free textures idle for longer than this many frames are dropped.
    pub const DEFAULT_MAX_IDLE_FRAMES: u32 = 3;

    /// Create a new software backend.
    pub fn new() -> Self {
        Self {
            pool: TransientPool::new(),
            max_idle_frames: Self::DEFAULT_MAX_IDLE_FRAMES,
            frame_index: 0,
        }
    }

    /// Set how many frames an unused pooled texture survives.
    pub fn with_max_idle_frames(mut self, frames: u32) -> Self {
        self.max_idle_frames = frames;
        self
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Software"
    }

    /// Number of graphs executed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The transient texture pool.
    pub fn pool(&self) -> &TransientPool {
        &self.pool
    }

    /// Execute a compiled render graph.
    ///
    /// `imports` binds a caller-owned texture to every imported resource the
    /// surviving passes touch.
    pub fn execute_graph<'a>(
        &mut self,
        graph: &RenderGraph,
        compiled: &CompiledGraph,
        imports: impl IntoIterator<Item = (ResourceHandle, &'a mut Texture)>,
    ) -> Result<ExecutionStats, GraphicsError> {
        log::trace!(
            "SoftwareBackend: executing graph {} with {} passes",
            graph.id(),
            compiled.pass_count()
        );

        let mut slots: Vec<Slot<'a>> = graph.resources().iter().map(|_| Slot::Vacant).collect();
        for (handle, texture) in imports {
            let resource = graph
                .resource(handle)
                .filter(|r| handle.is_imported() && r.kind == handle.kind())
                .ok_or_else(|| {
                    GraphicsError::InvalidParameter(format!(
                        "{handle:?} is not an imported texture of graph {}",
                        graph.id()
                    ))
                })?;
            if resource.descriptor.size != texture.size() {
                return Err(GraphicsError::InvalidParameter(format!(
                    "texture for '{}' is {:?}, declared {:?}",
                    resource.name,
                    texture.size(),
                    resource.descriptor.size
                )));
            }
            slots[handle.index() as usize] = Slot::Imported(texture);
        }

        let mut stats = ExecutionStats::default();
        let result = self.execute_passes(graph, compiled, &mut slots, &mut stats);

        // Return whatever is still resident, including after a failed pass.
        for slot in slots {
            if let Slot::Transient(texture) = slot {
                self.pool.release(texture);
            }
        }
        self.pool.trim(self.max_idle_frames);
        self.frame_index += 1;

        result.map(|()| stats)
    }

    fn execute_passes<'a>(
        &mut self,
        graph: &RenderGraph,
        compiled: &CompiledGraph,
        slots: &mut [Slot<'a>],
        stats: &mut ExecutionStats,
    ) -> Result<(), GraphicsError> {
        for (position, &handle) in compiled.pass_order().iter().enumerate() {
            let pass = graph
                .pass(handle)
                .ok_or(GraphicsError::Graph(GraphError::InvalidPassHandle(handle)))?;
            let render_func = pass
                .render_func()
                .ok_or_else(|| GraphError::MissingRenderFunc(pass.name().to_string()))?;

            for &(resource, _) in pass.accesses() {
                let index = resource.index() as usize;
                let starts_here = compiled
                    .lifetime(resource)
                    .is_some_and(|lifetime| lifetime.first == position);
                if resource.is_transient() && starts_here && slots[index].is_vacant() {
                    let (texture, reused) = self.pool.acquire(&graph.resources()[index].descriptor)?;
                    if reused {
                        stats.transient_reuses += 1;
                    } else {
                        stats.transient_allocations += 1;
                    }
                    slots[index] = Slot::Transient(texture);
                }
                if slots[index].is_vacant() {
                    return Err(GraphicsError::InvalidParameter(format!(
                        "no texture bound for '{}' used by pass '{}'",
                        graph.resources()[index].name,
                        pass.name()
                    )));
                }
            }

            // Attachments leave their slots for the duration of the pass so
            // the remaining slots can be sampled.
            let mut taken: Vec<(ResourceHandle, Slot<'a>)> = pass
                .color_attachments()
                .iter()
                .map(|a| {
                    let slot = std::mem::replace(&mut slots[a.texture.index() as usize], Slot::Vacant);
                    (a.texture, slot)
                })
                .collect();

            log::trace!("SoftwareBackend: executing pass '{}'", pass.name());
            let result = {
                let attachments = taken
                    .iter_mut()
                    .filter_map(|(h, slot)| slot.texture_mut().map(|t| (*h, t)))
                    .collect();
                let mut ctx = RasterContext::new(pass, graph, slots, attachments);
                let result = render_func(&mut ctx);
                stats.draw_calls += ctx.draw_calls();
                result
            };

            for (h, slot) in taken {
                slots[h.index() as usize] = slot;
            }
            result?;
            stats.executed_passes += 1;

            for &(resource, _) in pass.accesses() {
                let ends_here = compiled
                    .lifetime(resource)
                    .is_some_and(|lifetime| lifetime.last == position);
                if ends_here {
                    let slot = std::mem::replace(&mut slots[resource.index() as usize], Slot::Vacant);
                    if let Slot::Transient(texture) = slot {
                        self.pool.release(texture);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}
