//! Graphics error types.

use thiserror::Error;

use crate::compiler::GraphError;
use crate::graph::ResourceHandle;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// Failed to create a resource.
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),
    /// A requested feature is not supported.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A recording function touched a resource its pass did not declare.
    #[error("pass '{pass}' accessed undeclared resource {resource:?}")]
    UndeclaredResource {
        /// Name of the pass.
        pass: String,
        /// The offending handle.
        resource: ResourceHandle,
    },
    /// A draw was issued in a pass without color attachments.
    #[error("pass '{0}' has no color attachment to draw into")]
    NoColorAttachment(String),
    /// The render graph failed validation or compilation.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
