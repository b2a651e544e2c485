//! Frame timeline and pass contribution.
//!
//! Each frame, every camera collects [`RenderPass`]es into a [`PassQueue`]
//! at an [`InjectionPoint`]. The renderer then lets each pass declare its
//! work into the camera's render graph in timeline order.

mod injection;
mod queue;

pub use injection::InjectionPoint;
pub use queue::{FrameResources, PassQueue, QueuedPass, RenderPass};
