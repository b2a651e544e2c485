//! Cameras and their categories.

use crate::types::{ClearValue, TextureDescriptor};

/// What a camera renders for.
///
/// Only [`Game`](Self::Game) and [`Vr`](Self::Vr) cameras show the final
/// frame to a player; the rest are auxiliary views that full-frame effects
/// must leave untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraType {
    /// Main in-game camera.
    #[default]
    Game,
    /// Editor scene view.
    SceneView,
    /// Asset or material preview.
    Preview,
    /// Reflection probe capture.
    Reflection,
    /// Stereo VR camera.
    Vr,
}

impl CameraType {
    /// Every camera type.
    pub const ALL: [Self; 5] = [
        Self::Game,
        Self::SceneView,
        Self::Preview,
        Self::Reflection,
        Self::Vr,
    ];

    /// Whether full-frame passes apply to this camera.
    pub fn is_primary(self) -> bool {
        matches!(self, Self::Game | Self::Vr)
    }
}

/// A camera rendering into one color target.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Debug name.
    pub name: String,
    /// Camera category.
    pub camera_type: CameraType,
    /// Descriptor of the color target, including depth bits and sample count.
    pub target: TextureDescriptor,
    /// Clear applied to the target before any pass runs;
    /// [`ClearValue::None`] keeps the previous contents.
    pub clear_color: ClearValue,
}

impl Camera {
    /// Create a camera that keeps its target's contents.
    pub fn new(name: impl Into<String>, camera_type: CameraType, target: TextureDescriptor) -> Self {
        Self {
            name: name.into(),
            camera_type,
            target,
            clear_color: ClearValue::None,
        }
    }

    /// Clear the target at the start of each frame.
    pub fn with_clear_color(mut self, clear: impl Into<ClearValue>) -> Self {
        self.clear_color = clear.into();
        self
    }

    /// Check whether full-frame passes apply to this camera.
    pub fn is_primary(&self) -> bool {
        self.camera_type.is_primary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_categories() {
        let primary: Vec<_> = CameraType::ALL
            .into_iter()
            .filter(|t| t.is_primary())
            .collect();
        assert_eq!(primary, vec![CameraType::Game, CameraType::Vr]);
    }
}
