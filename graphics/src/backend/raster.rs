//! Recording context handed to raster pass functions.

use crate::error::GraphicsError;
use crate::graph::{RasterPass, RenderGraph, ResourceHandle};
use crate::materials::{FragmentInput, Material};
use crate::resources::Texture;
use crate::types::{Color, Extent3d};

/// Storage of one graph resource during execution.
pub(crate) enum Slot<'a> {
    /// Not allocated yet, already released, or bound as an attachment.
    Vacant,
    /// Texture owned by the caller.
    Imported(&'a mut Texture),
    /// Texture borrowed from the transient pool.
    Transient(Texture),
}

impl Slot<'_> {
    pub(crate) fn texture(&self) -> Option<&Texture> {
        match self {
            Self::Vacant => None,
            Self::Imported(texture) => Some(texture),
            Self::Transient(texture) => Some(texture),
        }
    }

    pub(crate) fn texture_mut(&mut self) -> Option<&mut Texture> {
        match self {
            Self::Vacant => None,
            Self::Imported(texture) => Some(texture),
            Self::Transient(texture) => Some(texture),
        }
    }

    pub(crate) fn is_vacant(&self) -> bool {
        matches!(self, Self::Vacant)
    }
}

/// Context for recording one raster pass.
///
/// Sampled textures are reachable through [`texture`](Self::texture) only if
/// the pass declared them; color attachments are written by
/// [`clear`](Self::clear) and
/// [`draw_fullscreen_triangle`](Self::draw_fullscreen_triangle).
pub struct RasterContext<'a> {
    pass: &'a RasterPass,
    graph: &'a RenderGraph,
    sources: &'a [Slot<'a>],
    attachments: Vec<(ResourceHandle, &'a mut Texture)>,
    draw_calls: u32,
}

impl<'a> RasterContext<'a> {
    pub(crate) fn new(
        pass: &'a RasterPass,
        graph: &'a RenderGraph,
        sources: &'a [Slot<'a>],
        attachments: Vec<(ResourceHandle, &'a mut Texture)>,
    ) -> Self {
        Self {
            pass,
            graph,
            sources,
            attachments,
            draw_calls: 0,
        }
    }

    /// Name of the pass being recorded.
    pub fn pass_name(&self) -> &str {
        self.pass.name()
    }

    /// Number of draws recorded so far.
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    /// Access a texture the pass declared as read.
    pub fn texture(&self, handle: ResourceHandle) -> Result<&'a Texture, GraphicsError> {
        Self::lookup(self.pass, self.graph, self.sources, handle)
    }

    fn lookup(
        pass: &RasterPass,
        graph: &RenderGraph,
        sources: &'a [Slot<'a>],
        handle: ResourceHandle,
    ) -> Result<&'a Texture, GraphicsError> {
        if graph.resource(handle).is_none() || !pass.reads().any(|h| h == handle) {
            return Err(GraphicsError::UndeclaredResource {
                pass: pass.name().to_string(),
                resource: handle,
            });
        }
        sources
            .get(handle.index() as usize)
            .and_then(Slot::texture)
            .ok_or_else(|| {
                GraphicsError::Internal(format!(
                    "texture #{} is not resident during pass '{}'",
                    handle.index(),
                    pass.name()
                ))
            })
    }

    /// Current contents of the `index`-th bound color attachment, in slot order.
    pub fn attachment(&self, index: usize) -> Option<&Texture> {
        self.attachments.get(index).map(|(_, texture)| &**texture)
    }

    /// Extent shared by the bound color attachments.
    pub fn attachment_extent(&self) -> Option<Extent3d> {
        self.attachments.first().map(|(_, texture)| texture.size())
    }

    /// Fill every bound color attachment with `color`.
    pub fn clear(&mut self, color: Color) -> Result<(), GraphicsError> {
        if self.attachments.is_empty() {
            return Err(GraphicsError::NoColorAttachment(self.pass.name().to_string()));
        }
        for (_, texture) in &mut self.attachments {
            texture.fill(color);
        }
        Ok(())
    }

    /// Draw a triangle covering the whole viewport, shading every covered
    /// fragment with `material` while sampling `source`.
    ///
    /// The triangle uses the clip-space vertices (-1,-1), (3,-1) and (-1,3).
    /// Coverage is tested at pixel centers, so every pixel of the attachments
    /// is written exactly once.
    pub fn draw_fullscreen_triangle(
        &mut self,
        material: &Material,
        source: ResourceHandle,
    ) -> Result<(), GraphicsError> {
        let source = Self::lookup(self.pass, self.graph, self.sources, source)?;
        let Some(extent) = self.attachment_extent() else {
            return Err(GraphicsError::NoColorAttachment(self.pass.name().to_string()));
        };

        log::trace!(
            "RasterContext: '{}' draws '{}' into {}x{}",
            self.pass.name(),
            material.label(),
            extent.width,
            extent.height
        );

        let triangle = FullscreenTriangle::new(extent.width as f32, extent.height as f32);
        for y in 0..extent.height {
            for x in 0..extent.width {
                let Some(uv) = triangle.cover(x as f32 + 0.5, y as f32 + 0.5) else {
                    continue;
                };
                let color = material.shade(&FragmentInput {
                    uv,
                    position: [x, y],
                    source: Some(source),
                });
                let index = (y * extent.width + x) as usize;
                for (_, texture) in &mut self.attachments {
                    texture.pixels_mut()[index] = color;
                }
            }
        }

        self.draw_calls += 1;
        Ok(())
    }
}

/// The full-screen triangle in pixel space with per-vertex texture coordinates.
struct FullscreenTriangle {
    positions: [[f32; 2]; 3],
    uvs: [[f32; 2]; 3],
    area: f32,
}

impl FullscreenTriangle {
    const CLIP: [[f32; 2]; 3] = [[-1.0, -1.0], [3.0, -1.0], [-1.0, 3.0]];

    fn new(width: f32, height: f32) -> Self {
        // Clip y points up, pixel and uv y point down.
        let uvs = Self::CLIP.map(|[x, y]| [(x + 1.0) * 0.5, (1.0 - y) * 0.5]);
        let positions = uvs.map(|[u, v]| [u * width, v * height]);
        let area = edge(positions[0], positions[1], positions[2]);
        Self {
            positions,
            uvs,
            area,
        }
    }

    /// Interpolated texture coordinate at `(x, y)`, or `None` when the point
    /// lies outside the triangle.
    fn cover(&self, x: f32, y: f32) -> Option<[f32; 2]> {
        if self.area == 0.0 {
            return None;
        }
        let [p0, p1, p2] = self.positions;
        let p = [x, y];
        let w0 = edge(p1, p2, p) / self.area;
        let w1 = edge(p2, p0, p) / self.area;
        let w2 = edge(p0, p1, p) / self.area;
        if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
            return None;
        }
        let [t0, t1, t2] = self.uvs;
        Some([
            w0 * t0[0] + w1 * t1[0] + w2 * t2[0],
            w0 * t0[1] + w1 * t1[1] + w2 * t2[1],
        ])
    }
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}
