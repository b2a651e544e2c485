//! Render pass declarations.

use crate::backend::RasterContext;
use crate::error::GraphicsError;

use super::resource::{ResourceAccess, ResourceHandle};

/// Maximum number of color attachments a raster pass can bind.
pub const MAX_COLOR_ATTACHMENTS: u32 = 8;

/// Recording function of a raster pass.
///
/// The `'static` bound means the function can only capture owned data, so it
/// cannot hold on to or mutate the state of whoever declared the pass. Capture
/// an immutable snapshot (typically `Arc`s) instead.
pub type RenderFunc = dyn Fn(&mut RasterContext<'_>) -> Result<(), GraphicsError> + Send + Sync;

/// A color attachment binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorAttachment {
    /// Attachment slot (`0..MAX_COLOR_ATTACHMENTS`).
    pub slot: u32,
    /// Texture written through this slot.
    pub texture: ResourceHandle,
}

/// A raster pass declaration.
///
/// Describes one logical rendering step: the textures it samples, the color
/// attachments it writes, whether the compiler may drop it, and the function
/// that records its draws once the graph executes.
///
/// # Example
///
/// ```ignore
/// let mut pass = RasterPass::new("Invert");
/// pass.read_texture(color);
/// pass.set_color_attachment(scratch, 0);
/// pass.set_render_func(move |ctx| ctx.draw_fullscreen_triangle(&material, color));
/// graph.add_raster_pass(pass);
/// ```
pub struct RasterPass {
    name: String,
    accesses: Vec<(ResourceHandle, ResourceAccess)>,
    color_attachments: Vec<ColorAttachment>,
    allow_culling: bool,
    render_func: Option<Box<RenderFunc>>,
}

impl RasterPass {
    /// Create a new raster pass. Culling is allowed by default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accesses: Vec::new(),
            color_attachments: Vec::new(),
            allow_culling: true,
            render_func: None,
        }
    }

    /// Get the pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare that this pass samples `texture`.
    pub fn read_texture(&mut self, texture: ResourceHandle) -> &mut Self {
        self.push_access(texture, ResourceAccess::Read);
        self
    }

    /// Bind `texture` as the color attachment at `slot`.
    ///
    /// Binding a slot twice replaces the earlier binding.
    pub fn set_color_attachment(&mut self, texture: ResourceHandle, slot: u32) -> &mut Self {
        if let Some(existing) = self.color_attachments.iter_mut().find(|a| a.slot == slot) {
            let previous = std::mem::replace(&mut existing.texture, texture);
            if !self.color_attachments.iter().any(|a| a.texture == previous) {
                self.accesses
                    .retain(|&(h, access)| !(h == previous && access == ResourceAccess::Write));
            }
        } else {
            self.color_attachments.push(ColorAttachment { slot, texture });
            self.color_attachments.sort_by_key(|a| a.slot);
        }
        self.push_access(texture, ResourceAccess::Write);
        self
    }

    /// Allow or forbid the compiler to cull this pass when nothing observes
    /// its writes. Inspection passes must forbid it.
    pub fn set_allow_culling(&mut self, allow: bool) -> &mut Self {
        self.allow_culling = allow;
        self
    }

    /// Set the function that records this pass's commands.
    pub fn set_render_func<F>(&mut self, func: F) -> &mut Self
    where
        F: Fn(&mut RasterContext<'_>) -> Result<(), GraphicsError> + Send + Sync + 'static,
    {
        self.render_func = Some(Box::new(func));
        self
    }

    /// Ordered list of declared accesses.
    pub fn accesses(&self) -> &[(ResourceHandle, ResourceAccess)] {
        &self.accesses
    }

    /// Textures read by this pass.
    pub fn reads(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.accesses
            .iter()
            .filter(|(_, access)| access.reads())
            .map(|&(h, _)| h)
    }

    /// Textures written by this pass.
    pub fn writes(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.accesses
            .iter()
            .filter(|(_, access)| access.writes())
            .map(|&(h, _)| h)
    }

    /// Bound color attachments, sorted by slot.
    pub fn color_attachments(&self) -> &[ColorAttachment] {
        &self.color_attachments
    }

    /// Check whether the compiler may cull this pass.
    pub fn allows_culling(&self) -> bool {
        self.allow_culling
    }

    /// Check if a render function has been set.
    pub fn has_render_func(&self) -> bool {
        self.render_func.is_some()
    }

    pub(crate) fn render_func(&self) -> Option<&RenderFunc> {
        self.render_func.as_deref()
    }

    fn push_access(&mut self, texture: ResourceHandle, access: ResourceAccess) {
        if !self.accesses.contains(&(texture, access)) {
            self.accesses.push((texture, access));
        }
    }
}

impl std::fmt::Debug for RasterPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterPass")
            .field("name", &self.name)
            .field("accesses", &self.accesses)
            .field("color_attachments", &self.color_attachments)
            .field("allow_culling", &self.allow_culling)
            .field("has_render_func", &self.render_func.is_some())
            .finish()
    }
}
