//! Color blit configuration.

use std::sync::Arc;

use prism_graphics::{InjectionPoint, Material};

/// Settings of the color blit round trip.
///
/// Both materials are required; a feature with either unset declares
/// nothing.
#[derive(Debug, Clone)]
pub struct ColorBlitSettings {
    /// Applied while copying the camera color into the scratch texture.
    pub first_material: Option<Arc<Material>>,
    /// Applied while copying the scratch texture back.
    pub second_material: Option<Arc<Material>>,
    /// Where the round trip records.
    pub injection_point: InjectionPoint,
}

impl Default for ColorBlitSettings {
    fn default() -> Self {
        Self {
            first_material: None,
            second_material: None,
            injection_point: InjectionPoint::BeforeRenderingPostProcessing,
        }
    }
}

impl ColorBlitSettings {
    /// Set the material of the first copy.
    pub fn with_first_material(mut self, material: Material) -> Self {
        self.first_material = Some(Arc::new(material));
        self
    }

    /// Set the material of the copy back.
    pub fn with_second_material(mut self, material: Material) -> Self {
        self.second_material = Some(Arc::new(material));
        self
    }

    /// Set the injection point.
    pub fn with_injection_point(mut self, injection_point: InjectionPoint) -> Self {
        self.injection_point = injection_point;
        self
    }
}
