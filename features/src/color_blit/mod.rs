//! Color blit feature.
//!
//! Transforms the camera color in place with two materials, bouncing through
//! a transient scratch texture. See [`ColorBlitPass`].

mod pass;
mod settings;

use std::sync::Arc;

use prism_graphics::InjectionPoint;

pub use pass::{APPLY_PASS, COPY_BACK_PASS, ColorBlitPass, TEMP_TEXTURE};
pub use settings::ColorBlitSettings;

use crate::error::ConfigError;
use crate::registrar::{Feature, Registrar};

/// [`Feature`] building a [`ColorBlitPass`] from [`ColorBlitSettings`].
#[derive(Debug, Clone, Default)]
pub struct ColorBlitFeature {
    /// Current settings.
    pub settings: ColorBlitSettings,
}

impl ColorBlitFeature {
    /// Create the feature.
    pub fn new(settings: ColorBlitSettings) -> Self {
        Self { settings }
    }
}

impl Feature for ColorBlitFeature {
    type Pass = ColorBlitPass;

    fn name(&self) -> &str {
        "ColorBlit"
    }

    fn injection_point(&self) -> InjectionPoint {
        self.settings.injection_point
    }

    fn create_pass(&self) -> Result<Arc<ColorBlitPass>, ConfigError> {
        let first = self
            .settings
            .first_material
            .clone()
            .ok_or(ConfigError::MissingResource {
                resource: "first_material",
            })?;
        let second = self
            .settings
            .second_material
            .clone()
            .ok_or(ConfigError::MissingResource {
                resource: "second_material",
            })?;
        Ok(Arc::new(ColorBlitPass::new(first, second)))
    }
}

static_assertions::assert_impl_all!(Registrar<ColorBlitFeature>: Send, Sync);

#[cfg(test)]
mod tests {
    use prism_graphics::Material;

    use super::*;

    #[test]
    fn test_default_injection_point() {
        let feature = ColorBlitFeature::default();
        assert_eq!(
            feature.injection_point(),
            InjectionPoint::BeforeRenderingPostProcessing
        );
    }

    #[test]
    fn test_missing_materials() {
        let feature = ColorBlitFeature::new(
            ColorBlitSettings::default().with_second_material(Material::blit()),
        );
        assert_eq!(
            feature.create_pass().err(),
            Some(ConfigError::MissingResource {
                resource: "first_material"
            })
        );

        let feature = ColorBlitFeature::new(
            ColorBlitSettings::default().with_first_material(Material::blit()),
        );
        assert_eq!(
            feature.create_pass().err(),
            Some(ConfigError::MissingResource {
                resource: "second_material"
            })
        );
    }

    #[test]
    fn test_pass_shares_materials() {
        let settings = ColorBlitSettings::default()
            .with_first_material(Material::invert())
            .with_second_material(Material::blit());
        let first = settings.first_material.clone().unwrap();
        let pass = ColorBlitFeature::new(settings).create_pass().unwrap();
        assert!(Arc::ptr_eq(pass.first_material(), &first));
        assert_eq!(pass.second_material().label(), "Blit");
    }
}
