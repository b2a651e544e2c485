//! Feature configuration errors.

use thiserror::Error;

/// Errors raised while turning feature settings into a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required material or transform reference is unset.
    #[error("required resource '{resource}' is not set")]
    MissingResource {
        /// Name of the missing setting.
        resource: &'static str,
    },
}
