//! Per-channel opacity and intensity controls

use serde::{Deserialize, Serialize};

/// How slice texels are turned into color and opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Single-channel data: gray output, opacity from mean intensity
    Grayscale,
    /// Two-channel data in red and blue, each with its own scale
    #[default]
    DualChannel,
}

impl ShadingMode {
    /// Value passed to the fragment shader
    pub fn shader_id(self) -> u32 {
        match self {
            ShadingMode::Grayscale => 1,
            ShadingMode::DualChannel => 0,
        }
    }
}

/// The factor that channel adjustments currently act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    Red,
    Blue,
    #[default]
    Alpha,
}

/// Shading factors sent to the fragment shader each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingParams {
    pub mode: ShadingMode,
    pub alpha_factor: f32,
    pub red_scale: f32,
    pub blue_scale: f32,
    pub active: Channel,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self::new(ShadingMode::default())
    }
}

impl ShadingParams {
    /// Full-strength factors with alpha selected
    pub fn new(mode: ShadingMode) -> Self {
        Self {
            mode,
            alpha_factor: 1.0,
            red_scale: 1.0,
            blue_scale: 1.0,
            active: Channel::Alpha,
        }
    }

    /// Return a copy with the active channel changed
    pub fn with_active(self, active: Channel) -> Self {
        Self { active, ..self }
    }

    /// Return a copy with the active factor moved by `delta`, clamped to [0, 1]
    pub fn adjusted(self, delta: f32) -> Self {
        let mut next = self;
        let factor = match self.active {
            Channel::Red => &mut next.red_scale,
            Channel::Blue => &mut next.blue_scale,
            Channel::Alpha => &mut next.alpha_factor,
        };
        *factor = (*factor + delta).clamp(0.0, 1.0);
        next
    }

    /// Current value of the active factor
    pub fn active_value(&self) -> f32 {
        match self.active {
            Channel::Red => self.red_scale,
            Channel::Blue => self.blue_scale,
            Channel::Alpha => self.alpha_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_only_touches_active_channel() {
        let params = ShadingParams::default().with_active(Channel::Red).adjusted(-0.25);
        assert_eq!(params.red_scale, 0.75);
        assert_eq!(params.blue_scale, 1.0);
        assert_eq!(params.alpha_factor, 1.0);
    }

    #[test]
    fn test_adjust_clamps() {
        let params = ShadingParams::default().adjusted(0.05);
        assert_eq!(params.alpha_factor, 1.0);

        let mut params = ShadingParams::default().with_active(Channel::Blue);
        for _ in 0..30 {
            params = params.adjusted(-0.05);
        }
        assert_eq!(params.blue_scale, 0.0);
        assert_eq!(params.active_value(), 0.0);
    }

    #[test]
    fn test_shader_ids_distinct() {
        assert_ne!(
            ShadingMode::Grayscale.shader_id(),
            ShadingMode::DualChannel.shader_id()
        );
    }
}
