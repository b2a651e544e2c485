//! Common types and descriptors for graphics resources.
//!
//! This module contains format enums, usage flags, and descriptor structs
//! used throughout the graphics system.

mod common;
mod texture;

pub use common::{ClearValue, Color, Extent3d};
pub use texture::{TextureDescriptor, TextureFormat, TextureUsage};
