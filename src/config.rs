//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`VV_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use volview_core::{CameraState, DragMargins, InputTuning, ShadingMode, ShadingParams, SliceNaming};
use volview_render::CompositeMode;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Slice source configuration
    #[serde(default)]
    pub slices: SlicesConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`VV_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // VV_SLICES__COUNT=22 -> slices.count = 22
        figment = figment.merge(Env::prefixed("VV_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Viewer state at startup
    pub fn initial_camera(&self) -> CameraState {
        CameraState::new(self.camera.radius, self.rendering.divisor)
            .with_angles(self.camera.azimuth.to_radians(), self.camera.elevation.to_radians())
    }

    /// Shading factors at startup
    pub fn initial_shading(&self) -> ShadingParams {
        ShadingParams {
            alpha_factor: self.rendering.alpha_factor.clamp(0.0, 1.0),
            red_scale: self.rendering.red_scale.clamp(0.0, 1.0),
            blue_scale: self.rendering.blue_scale.clamp(0.0, 1.0),
            ..ShadingParams::new(self.rendering.shading)
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Allow the user to resize the window
    pub resizable: bool,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Volview - Slice Stack Viewer".to_string(),
            width: 1600,
            height: 1600,
            resizable: false,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Starting distance from the stack centre
    pub radius: f32,
    /// Starting azimuth in degrees
    pub azimuth: f32,
    /// Starting elevation in degrees
    pub elevation: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            radius: 1.0,
            azimuth: 0.0,
            elevation: 0.0,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Window fraction added on each side when normalizing horizontal drags
    pub horizontal_margin: f32,
    /// Window fraction added on each side when normalizing vertical drags
    pub vertical_margin: f32,
    /// Divisor change for a full-height right drag
    pub divisor_sensitivity: f32,
    /// Radius change per scroll line
    pub zoom_step: f32,
    /// Channel factor change per key press
    pub shading_step: f32,
    /// Closest zoom
    pub min_radius: f32,
    /// Farthest zoom
    pub max_radius: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        let tuning = InputTuning::default();
        Self {
            horizontal_margin: tuning.drag_margins.horizontal,
            vertical_margin: tuning.drag_margins.vertical,
            divisor_sensitivity: tuning.divisor_sensitivity,
            zoom_step: tuning.zoom_step,
            shading_step: tuning.shading_step,
            min_radius: tuning.min_radius,
            max_radius: tuning.max_radius,
        }
    }
}

impl InputConfig {
    /// Convert to the reducer's tuning constants
    ///
    /// Every value must be finite and the drag margins non-negative.
    pub fn to_tuning(&self) -> Result<InputTuning, ConfigError> {
        let values = [
            ("input.horizontal_margin", self.horizontal_margin),
            ("input.vertical_margin", self.vertical_margin),
            ("input.divisor_sensitivity", self.divisor_sensitivity),
            ("input.zoom_step", self.zoom_step),
            ("input.shading_step", self.shading_step),
            ("input.min_radius", self.min_radius),
            ("input.max_radius", self.max_radius),
        ];
        if let Some((key, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::invalid(format!("{} must be finite, got {}", key, value)));
        }
        if self.horizontal_margin < 0.0 || self.vertical_margin < 0.0 {
            return Err(ConfigError::invalid("input drag margins must not be negative"));
        }

        Ok(InputTuning {
            drag_margins: DragMargins {
                horizontal: self.horizontal_margin,
                vertical: self.vertical_margin,
            },
            divisor_sensitivity: self.divisor_sensitivity,
            zoom_step: self.zoom_step,
            shading_step: self.shading_step,
            min_radius: self.min_radius,
            max_radius: self.max_radius.max(self.min_radius),
        })
    }
}

/// Where the slice images come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicesConfig {
    /// Directory holding the image sequence
    pub directory: PathBuf,
    /// File name before the index
    pub prefix: String,
    /// Index of the first file
    pub first_index: usize,
    /// Zero-pad indices to this many digits (0 = none)
    pub index_width: usize,
    /// File extension without the dot
    pub extension: String,
    /// Number of slices to load
    pub count: usize,
}

impl Default for SlicesConfig {
    fn default() -> Self {
        let naming = SliceNaming::combined();
        Self {
            directory: PathBuf::from("data"),
            prefix: naming.prefix,
            first_index: naming.first_index,
            index_width: naming.index_width,
            extension: naming.extension,
            count: 64,
        }
    }
}

impl SlicesConfig {
    /// File naming scheme for the loader
    pub fn naming(&self) -> SliceNaming {
        SliceNaming {
            prefix: self.prefix.clone(),
            first_index: self.first_index,
            index_width: self.index_width,
            extension: self.extension.clone(),
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Composite mode at startup
    pub composite: CompositeMode,
    /// Texel shading
    pub shading: ShadingMode,
    /// Starting slice spacing divisor
    pub divisor: f32,
    /// Planes drawn in volume mode
    pub volume_planes: usize,
    /// Starting opacity factor
    pub alpha_factor: f32,
    /// Starting red scale
    pub red_scale: f32,
    /// Starting blue scale
    pub blue_scale: f32,
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            composite: CompositeMode::Slices,
            shading: ShadingMode::DualChannel,
            divisor: 2.0,
            volume_planes: 128,
            alpha_factor: 1.0,
            red_scale: 1.0,
            blue_scale: 1.0,
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level used when RUST_LOG is unset (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// A value that deserialized but is out of range
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1600);
        assert_eq!(config.slices.count, 64);
        assert_eq!(config.rendering.divisor, 2.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("composite = \"slices\""));
        assert!(toml.contains("shading = \"dual_channel\""));
    }

    #[test]
    fn test_naming_from_config() {
        let slices = SlicesConfig {
            prefix: "IM-0001-".to_string(),
            index_width: 4,
            ..SlicesConfig::default()
        };
        assert_eq!(slices.naming().file_name(0), "IM-0001-0001.jpg");
    }

    #[test]
    fn test_initial_camera_uses_degrees() {
        let mut config = AppConfig::default();
        config.camera.elevation = 180.0;
        config.rendering.divisor = 50.0;
        let camera = config.initial_camera();
        assert!((camera.elevation - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(camera.divisor, 10.0);
    }

    #[test]
    fn test_initial_shading_clamped() {
        let mut config = AppConfig::default();
        config.rendering.alpha_factor = 3.0;
        config.rendering.shading = ShadingMode::Grayscale;
        let shading = config.initial_shading();
        assert_eq!(shading.alpha_factor, 1.0);
        assert_eq!(shading.mode, ShadingMode::Grayscale);
    }

    #[test]
    fn test_tuning_radius_bounds_ordered() {
        let input = InputConfig {
            min_radius: 2.0,
            max_radius: 1.0,
            ..InputConfig::default()
        };
        let tuning = input.to_tuning().unwrap();
        assert_eq!(tuning.max_radius, 2.0);
    }

    #[test]
    fn test_tuning_rejects_non_finite() {
        let input = InputConfig {
            min_radius: f32::NAN,
            ..InputConfig::default()
        };
        let err = input.to_tuning().unwrap_err();
        assert!(err.to_string().contains("input.min_radius"));

        let input = InputConfig {
            zoom_step: f32::INFINITY,
            ..InputConfig::default()
        };
        assert!(input.to_tuning().is_err());
    }

    #[test]
    fn test_tuning_rejects_negative_margin() {
        let input = InputConfig {
            vertical_margin: -0.5,
            ..InputConfig::default()
        };
        assert!(input.to_tuning().is_err());
    }

    #[test]
    fn test_default_margins_match_reducer() {
        let tuning = InputConfig::default().to_tuning().unwrap();
        assert_eq!(tuning, InputTuning::default());
    }
}
