//! Transient texture pool.
//!
//! Transient textures are acquired right before their first use and released
//! right after their last one. Released textures go back to a free list keyed
//! by descriptor (label excluded), so a later transient with the same shape
//! reuses the allocation within the frame or on a following frame.

use std::collections::HashMap;

use crate::error::GraphicsError;
use crate::resources::Texture;
use crate::types::{Color, TextureDescriptor};

/// Descriptor with the label stripped; two transients that differ only by
/// name share storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey(TextureDescriptor);

impl PoolKey {
    fn from_descriptor(descriptor: &TextureDescriptor) -> Self {
        Self(TextureDescriptor {
            label: None,
            ..descriptor.clone()
        })
    }
}

struct PooledTexture {
    texture: Texture,
    /// Frames spent in the free list without being reused.
    idle_frames: u32,
}

/// Pool of CPU textures for transient per-frame allocations.
#[derive(Default)]
pub struct TransientPool {
    free: HashMap<PoolKey, Vec<PooledTexture>>,
}

impl TransientPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a texture for `descriptor`.
    ///
    /// Returns the texture and whether it came from the free list. Every
    /// acquired texture starts out transparent black, reused or not, so no
    /// contents leak from an earlier transient or frame.
    pub fn acquire(
        &mut self,
        descriptor: &TextureDescriptor,
    ) -> Result<(Texture, bool), GraphicsError> {
        let key = PoolKey::from_descriptor(descriptor);
        if let Some(pooled) = self.free.get_mut(&key).and_then(Vec::pop) {
            let mut texture = pooled.texture;
            texture.set_label(descriptor.label.clone());
            texture.fill(Color::TRANSPARENT);
            log::trace!("TransientPool: reusing {:?}", descriptor.label);
            return Ok((texture, true));
        }

        log::trace!(
            "TransientPool: allocating {:?} ({}x{})",
            descriptor.label,
            descriptor.width(),
            descriptor.height()
        );
        let texture = Texture::new(descriptor.clone()).map_err(|e| {
            GraphicsError::ResourceCreationFailed(format!(
                "transient {:?}: {e}",
                descriptor.label
            ))
        })?;
        Ok((texture, false))
    }

    /// Return a texture to the free list.
    pub fn release(&mut self, texture: Texture) {
        let key = PoolKey::from_descriptor(texture.descriptor());
        self.free.entry(key).or_default().push(PooledTexture {
            texture,
            idle_frames: 0,
        });
    }

    /// Age every free texture by one frame and drop those idle for more than
    /// `max_idle_frames`.
    pub fn trim(&mut self, max_idle_frames: u32) {
        for bucket in self.free.values_mut() {
            for pooled in bucket.iter_mut() {
                pooled.idle_frames += 1;
            }
            bucket.retain(|pooled| pooled.idle_frames <= max_idle_frames);
        }
        self.free.retain(|_, bucket| !bucket.is_empty());
    }

    /// Number of textures waiting in the free list.
    pub fn free_count(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for TransientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransientPool")
            .field("free_count", &self.free_count())
            .finish()
    }
}
