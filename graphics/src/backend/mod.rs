//! Execution backend.
//!
//! The [`SoftwareBackend`] runs a [`CompiledGraph`](crate::graph::CompiledGraph)
//! on the CPU:
//!
//! - Binds caller-owned textures to imported resources
//! - Allocates transient textures from a [`TransientPool`] at first use and
//!   releases them after last use
//! - Hands each pass a [`RasterContext`] exposing its declared reads and its
//!   color attachments

mod pool;
mod raster;
mod software;

pub use pool::TransientPool;
pub use raster::RasterContext;
pub use software::{ExecutionStats, SoftwareBackend};

static_assertions::assert_impl_all!(SoftwareBackend: Send, Sync);
