//! Frame timeline positions.

use std::cmp::Ordering;

/// A named position in the fixed per-frame rendering timeline.
///
/// Passes enqueued at a lower [`order`](Self::order) are recorded first;
/// passes at the same point keep their enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionPoint {
    /// Before anything else in the frame.
    BeforeRendering,
    /// Before shadow maps render.
    BeforeRenderingShadows,
    /// After shadow maps render.
    AfterRenderingShadows,
    /// Before depth and normal prepasses.
    BeforeRenderingPrePasses,
    /// After depth and normal prepasses.
    AfterRenderingPrePasses,
    /// Before opaque geometry.
    BeforeRenderingOpaques,
    /// After opaque geometry.
    AfterRenderingOpaques,
    /// Before the skybox.
    BeforeRenderingSkybox,
    /// After the skybox.
    AfterRenderingSkybox,
    /// Before transparent geometry.
    BeforeRenderingTransparents,
    /// After transparent geometry.
    AfterRenderingTransparents,
    /// Before post-processing effects.
    BeforeRenderingPostProcessing,
    /// After post-processing effects.
    AfterRenderingPostProcessing,
    /// After everything, right before the target is presented.
    AfterRendering,
}

impl InjectionPoint {
    /// Every injection point in timeline order.
    pub const ALL: [Self; 14] = [
        Self::BeforeRendering,
        Self::BeforeRenderingShadows,
        Self::AfterRenderingShadows,
        Self::BeforeRenderingPrePasses,
        Self::AfterRenderingPrePasses,
        Self::BeforeRenderingOpaques,
        Self::AfterRenderingOpaques,
        Self::BeforeRenderingSkybox,
        Self::AfterRenderingSkybox,
        Self::BeforeRenderingTransparents,
        Self::AfterRenderingTransparents,
        Self::BeforeRenderingPostProcessing,
        Self::AfterRenderingPostProcessing,
        Self::AfterRendering,
    ];

    /// Ordinal position on the timeline.
    pub fn order(self) -> u32 {
        match self {
            Self::BeforeRendering => 0,
            Self::BeforeRenderingShadows => 50,
            Self::AfterRenderingShadows => 100,
            Self::BeforeRenderingPrePasses => 150,
            Self::AfterRenderingPrePasses => 200,
            Self::BeforeRenderingOpaques => 250,
            Self::AfterRenderingOpaques => 300,
            Self::BeforeRenderingSkybox => 350,
            Self::AfterRenderingSkybox => 400,
            Self::BeforeRenderingTransparents => 450,
            Self::AfterRenderingTransparents => 500,
            Self::BeforeRenderingPostProcessing => 550,
            Self::AfterRenderingPostProcessing => 600,
            Self::AfterRendering => 1000,
        }
    }

    /// Parse a point from its name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|point| format!("{point:?}").eq_ignore_ascii_case(name))
    }
}

impl PartialOrd for InjectionPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InjectionPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order().cmp(&other.order())
    }
}

impl std::fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}({})", self.order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_sorted() {
        assert!(InjectionPoint::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(InjectionPoint::AfterRendering.order(), 1000);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            InjectionPoint::from_name("afterrenderingopaques"),
            Some(InjectionPoint::AfterRenderingOpaques)
        );
        assert_eq!(InjectionPoint::from_name("sometime"), None);
    }
}
