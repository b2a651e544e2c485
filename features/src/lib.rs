//! # Prism Features
//!
//! Full-frame render features built on `prism-graphics`.
//!
//! - [`Registrar`] - Owns a [`Feature`]'s pass and enqueues it for eligible cameras
//! - [`color_blit`] - Two-pass material round trip over the camera color
//! - [`debug_texture`] - Inspection copy of the camera color
//!
//! ## Example
//!
//! ```ignore
//! use prism_features::{ColorBlitFeature, ColorBlitSettings, Registrar};
//!
//! let settings = ColorBlitSettings::default()
//!     .with_first_material(Material::invert())
//!     .with_second_material(Material::blit());
//! let mut registrar = Registrar::new(ColorBlitFeature::new(settings));
//! registrar.activate(renderer.events());
//! renderer.render_camera(&camera, &mut target)?;
//! ```

pub mod color_blit;
pub mod debug_texture;
mod error;
pub mod registrar;

pub use color_blit::{ColorBlitFeature, ColorBlitPass, ColorBlitSettings};
pub use debug_texture::{DebugTextureFeature, DebugTexturePass, DebugTextureSettings};
pub use error::ConfigError;
pub use registrar::{Feature, Registrar};
