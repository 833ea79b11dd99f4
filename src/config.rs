use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const REFRESH_HZ: f32 = 60.0;
pub const REFRESH_HZ_MIN: f32 = 1.0;
pub const REFRESH_HZ_MAX: f32 = 240.0;

pub const SPHERE_RADIUS: f32 = 300.0;
pub const PERSPECTIVE: f32 = 800.0;

pub const AUTO_ROTATE_SPEED: f32 = 0.002;
pub const AUTO_SPEED_MIN_FACTOR: f32 = 0.35;
pub const AUTO_SPEED_MAX_FACTOR: f32 = 1.6;

pub const FIRST_SHUFFLE_MS: f64 = 2500.0;
pub const SHUFFLE_MS: f64 = 4000.0;
pub const SHUFFLE_JITTER_MS: f64 = 4000.0;

pub const HOVER_RADIUS_FACTOR: f32 = 1.2;
pub const BLEND_EASE: f32 = 0.08;
pub const MANUAL_EASE: f32 = 0.05;
pub const POINTER_ROTATE_LIMIT: f32 = 0.3;

pub const DEPTH_SCALE_MIN: f32 = 0.4;
pub const DEPTH_SCALE_MAX: f32 = 1.3;
pub const BRIGHTNESS_MIN: f32 = 0.6;
pub const BRIGHTNESS_MAX: f32 = 1.4;
pub const OPACITY_MIN: f32 = 0.35;
pub const FREQUENCY_BOOST_STEP: f32 = 0.04;
pub const FREQUENCY_BOOST_MAX: f32 = 0.35;

pub const FONT_SIZE_MIN: u32 = 12;
pub const FONT_SIZE_MAX: u32 = 40;
pub const FONT_SIZE_STEP: u32 = 3;

pub const SATURATION: f32 = 70.0;
pub const LIGHTNESS_BASE: f32 = 50.0;
pub const LIGHTNESS_DEPTH: f32 = 15.0;

pub const Z_ORDER_BIAS: f32 = 1000.0;

pub const HUE_PALETTE: [u16; 4] = [190, 200, 210, 160];

pub const INPUT_MAX_CHARS: usize = 32;

pub const DUMP_VIEWPORT_WIDTH: f32 = 1280.0;
pub const DUMP_VIEWPORT_HEIGHT: f32 = 800.0;

/// Pointer behaviour over the sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Auto-rotation eases to a stop while the pointer is over the sphere.
    #[default]
    HoverPause,
    /// Pointer offset from the center tilts the sphere; never pauses.
    PointerRotate,
}

/// Runtime settings, read from an optional TOML file and then overridden by CLI flags.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub radius: f32,
    pub perspective: f32,
    pub auto_rotate_speed: f32,
    pub interaction_mode: InteractionMode,
    pub seed_samples: bool,
    pub rng_seed: Option<u64>,
    pub refresh_hz: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            radius: SPHERE_RADIUS,
            perspective: PERSPECTIVE,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            interaction_mode: InteractionMode::default(),
            seed_samples: true,
            rng_seed: None,
            refresh_hz: REFRESH_HZ,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(raw)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Time between frames at `refresh_hz`, falling back to the default rate if unrepresentable.
    pub fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f32(1.0 / self.refresh_hz)
            .unwrap_or_else(|_| Duration::from_secs_f32(1.0 / REFRESH_HZ))
    }

    /// Non-positive geometry would break the projection; fall back to defaults.
    fn sanitize(&mut self) {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            self.radius = SPHERE_RADIUS;
        }
        if !(self.perspective.is_finite() && self.perspective > self.radius) {
            self.perspective = PERSPECTIVE.max(self.radius * 2.0);
        }
        if !(self.auto_rotate_speed.is_finite() && self.auto_rotate_speed > 0.0) {
            self.auto_rotate_speed = AUTO_ROTATE_SPEED;
        }
        if self.refresh_hz.is_finite() {
            self.refresh_hz = self.refresh_hz.clamp(REFRESH_HZ_MIN, REFRESH_HZ_MAX);
        } else {
            self.refresh_hz = REFRESH_HZ;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    mod load {
        use super::*;

        #[test]
        fn no_path_gives_defaults() {
            let settings = Settings::load(None).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.radius, 300.0);
            assert_eq!(settings.perspective, 800.0);
            assert_eq!(settings.interaction_mode, InteractionMode::HoverPause);
        }

        #[test]
        fn reads_partial_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "interaction_mode = \"pointer-rotate\"").unwrap();
            writeln!(file, "rng_seed = 7").unwrap();
            let settings = Settings::load(Some(file.path())).unwrap();
            assert_eq!(settings.interaction_mode, InteractionMode::PointerRotate);
            assert_eq!(settings.rng_seed, Some(7));
            assert_eq!(settings.radius, SPHERE_RADIUS);
            assert!(settings.seed_samples);
        }

        #[test]
        fn missing_file_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("absent.toml");
            let err = Settings::load(Some(&path)).unwrap_err();
            assert!(err.to_string().contains("failed to read config file"));
        }

        #[test]
        fn malformed_file_is_error() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "radius = \"wide\"").unwrap();
            assert!(Settings::load(Some(file.path())).is_err());
        }
    }

    mod sanitize {
        use super::*;

        #[test]
        fn rejects_non_positive_radius() {
            let settings = Settings::from_toml("radius = -5.0").unwrap();
            assert_eq!(settings.radius, SPHERE_RADIUS);
        }

        #[test]
        fn perspective_must_exceed_radius() {
            let settings = Settings::from_toml("radius = 500.0\nperspective = 100.0").unwrap();
            assert!(settings.perspective > settings.radius);
        }

        #[test]
        fn refresh_rate_clamped_into_range() {
            let settings = Settings::from_toml("refresh_hz = 0.0").unwrap();
            assert_eq!(settings.refresh_hz, REFRESH_HZ_MIN);
            let settings = Settings::from_toml("refresh_hz = 1e-30").unwrap();
            assert_eq!(settings.refresh_hz, REFRESH_HZ_MIN);
            let settings = Settings::from_toml("refresh_hz = 10000.0").unwrap();
            assert_eq!(settings.refresh_hz, REFRESH_HZ_MAX);
            let settings = Settings::from_toml("refresh_hz = nan").unwrap();
            assert_eq!(settings.refresh_hz, REFRESH_HZ);
        }

        #[test]
        fn tiny_refresh_rate_gives_usable_frame_interval() {
            let settings = Settings::from_toml("refresh_hz = 1e-30").unwrap();
            let interval = settings.frame_interval();
            assert_eq!(interval, std::time::Duration::from_secs(1));
        }

        #[test]
        fn unrepresentable_interval_falls_back_to_default_rate() {
            let settings = Settings {
                refresh_hz: 1e-30,
                ..Settings::default()
            };
            assert_eq!(
                settings.frame_interval(),
                std::time::Duration::from_secs_f32(1.0 / REFRESH_HZ)
            );
        }

        #[test]
        fn non_positive_auto_speed_restored() {
            let settings = Settings::from_toml("auto_rotate_speed = -0.01").unwrap();
            assert_eq!(settings.auto_rotate_speed, AUTO_ROTATE_SPEED);
            let settings = Settings::from_toml("auto_rotate_speed = 0.0").unwrap();
            assert_eq!(settings.auto_rotate_speed, AUTO_ROTATE_SPEED);
            let settings = Settings::from_toml("auto_rotate_speed = 0.004").unwrap();
            assert_eq!(settings.auto_rotate_speed, 0.004);
        }
    }
}
