//! Texture resources.
//!
//! [`Texture`] is the CPU-resident image the software backend renders into.
//! Camera targets are owned by the caller and imported into a render graph
//! for one frame; transient textures are owned by the backend's
//! [`TransientPool`](crate::backend::TransientPool).

mod texture;

pub use texture::Texture;
