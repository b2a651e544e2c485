//! Materials for full-screen passes.

mod material;

pub use material::{FragmentInput, FragmentShader, Material};

static_assertions::assert_impl_all!(Material: Send, Sync, Clone);
