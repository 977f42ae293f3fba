//! Operator settings loaded from JSON.
//!
//! Every section except `offsets` falls back to the documented defaults, so
//! a minimal file only carries the offsets of the current game build:
//!
//! ```
//! use sightline::settings::Settings;
//! let json = r#"{
//!     "aim": { "fov_degrees": 6.0 },
//!     "offsets": {
//!         "local_player": 1, "entity_list": 2, "view_matrix": 3,
//!         "client_state": 4, "client_state_view_angles": 5, "team_num": 6,
//!         "life_state": 7, "health": 8, "origin": 9, "bone_matrix": 10,
//!         "view_offset": 11, "aim_punch_angle": 12, "fov_start": 13,
//!         "active_weapon": 14, "item_definition_index": 15
//!     }
//! }"#;
//! let settings = Settings::from_json_str(json).unwrap();
//! assert_eq!(settings.aim.bone_id, 8);
//! assert!((settings.acquisition().fov_radians - 6.0_f32.to_radians()).abs() < 1e-6);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::acquisition::AcquisitionConfig;
use crate::constants::{
    DEFAULT_AIM_FOV_DEGREES, DEFAULT_ANGLE_PER_PIXEL, DEFAULT_BONE_INDEX,
    DEFAULT_CALIBRATION_SETTLE, DEFAULT_ENTITY_SLOTS, DEFAULT_INPUT_SETTLE, DEFAULT_POLL_SLEEP,
    DEFAULT_SMOOTHING, DEFAULT_STEERING_SLEEP, MAX_STUDIO_BONES,
};
use crate::input::Key;
use crate::offsets::Offsets;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The settings JSON is malformed or incomplete.
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// The targeted bone does not exist in the skeleton table.
    #[error("bone index {index} is outside the skeleton (0..{max})")]
    BoneIndex {
        /// Requested bone.
        index: usize,
        /// Number of bones available.
        max: usize,
    },
    /// The targeting cone is not a finite positive angle.
    #[error("targeting field of view must be finite and positive, got {0} rad")]
    FieldOfView(f32),
    /// The smoothing divisor is not finite.
    #[error("smoothing must be finite, got {0}")]
    Smoothing(f32),
    /// The pointer ratio is not a finite positive value.
    #[error("angle per pixel must be finite and positive, got {0}")]
    AnglePerPixel(f64),
    /// The calibration chord has no keys.
    #[error("calibration hotkey chord is empty")]
    EmptyChord,
}

/// Targeting parameters as written by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimSettings {
    /// Targeting cone half-angle in degrees.
    pub fov_degrees: f32,
    /// Skeletal landmark to aim for.
    pub bone_id: usize,
    /// Damping divisor; 1 disables smoothing.
    pub smoothness: f32,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_AIM_FOV_DEGREES,
            bone_id: DEFAULT_BONE_INDEX,
            smoothness: DEFAULT_SMOOTHING,
        }
    }
}

/// Loop pacing and settle delays in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Sleep between poll cycles.
    pub poll_sleep_ms: u64,
    /// Sleep between steering cycles.
    pub steering_sleep_ms: u64,
    /// Wait after synthetic input.
    pub input_settle_ms: u64,
    /// Wait before each calibration sample.
    pub calibration_settle_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_sleep_ms: millis(DEFAULT_POLL_SLEEP),
            steering_sleep_ms: millis(DEFAULT_STEERING_SLEEP),
            input_settle_ms: millis(DEFAULT_INPUT_SETTLE),
            calibration_settle_ms: millis(DEFAULT_CALIBRATION_SETTLE),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl TimingSettings {
    /// Sleep between poll cycles.
    #[must_use]
    pub const fn poll_sleep(&self) -> Duration {
        Duration::from_millis(self.poll_sleep_ms)
    }

    /// Sleep between steering cycles.
    #[must_use]
    pub const fn steering_sleep(&self) -> Duration {
        Duration::from_millis(self.steering_sleep_ms)
    }

    /// Wait after synthetic input.
    #[must_use]
    pub const fn input_settle(&self) -> Duration {
        Duration::from_millis(self.input_settle_ms)
    }

    /// Wait before each calibration sample.
    #[must_use]
    pub const fn calibration_settle(&self) -> Duration {
        Duration::from_millis(self.calibration_settle_ms)
    }
}

/// Starting pointer ratio, replaced by calibration at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Radians of rotation per pixel at the reference field of view.
    pub angle_per_pixel: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            angle_per_pixel: DEFAULT_ANGLE_PER_PIXEL,
        }
    }
}

/// Keys polled by the steering loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    /// Keys that must all be held to start calibration.
    pub calibrate: Vec<Key>,
    /// Key engaging the competing trigger feature; steering stays out of
    /// the way while it is held.
    pub competing_feature: Key,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            calibrate: vec![Key::F11, Key::F12],
            competing_feature: Key::Alt,
        }
    }
}

/// Complete settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Targeting parameters.
    #[serde(default)]
    pub aim: AimSettings,
    /// Loop pacing.
    #[serde(default)]
    pub timing: TimingSettings,
    /// Initial pointer ratio.
    #[serde(default)]
    pub calibration: CalibrationSettings,
    /// Polled hotkeys.
    #[serde(default)]
    pub hotkeys: Hotkeys,
    /// Remote layout of the current game build.
    pub offsets: Offsets,
    /// Entity-list slots scanned each poll.
    #[serde(default = "default_entity_slots")]
    pub entity_slots: usize,
}

const fn default_entity_slots() -> usize {
    DEFAULT_ENTITY_SLOTS
}

impl Settings {
    /// Default settings around the supplied offsets.
    #[must_use]
    pub fn with_offsets(offsets: Offsets) -> Self {
        Self {
            aim: AimSettings::default(),
            timing: TimingSettings::default(),
            calibration: CalibrationSettings::default(),
            hotkeys: Hotkeys::default(),
            offsets,
            entity_slots: DEFAULT_ENTITY_SLOTS,
        }
    }

    /// Parses and validates a settings document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// errors of [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a settings file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn load(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every value the loops depend on. Rejections are logged.
    ///
    /// # Errors
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check()
            .inspect_err(|err| warn!("rejected settings: {err}"))
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.acquisition().validate()?;
        let ratio = self.calibration.angle_per_pixel;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::AnglePerPixel(ratio));
        }
        if self.hotkeys.calibrate.is_empty() {
            return Err(ConfigError::EmptyChord);
        }
        Ok(())
    }

    /// Targeting configuration derived from [`Self::aim`].
    #[must_use]
    pub fn acquisition(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            fov_radians: self.aim.fov_degrees.to_radians(),
            bone_index: self.aim.bone_id,
            smoothing: self.aim.smoothness,
        }
    }
}

impl AcquisitionConfig {
    /// Rejects cones, bones and smoothing the engine cannot use.
    ///
    /// # Errors
    /// Returns [`ConfigError::FieldOfView`], [`ConfigError::BoneIndex`] or
    /// [`ConfigError::Smoothing`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fov_radians.is_finite() || self.fov_radians <= 0.0 {
            return Err(ConfigError::FieldOfView(self.fov_radians));
        }
        if self.bone_index >= MAX_STUDIO_BONES {
            return Err(ConfigError::BoneIndex {
                index: self.bone_index,
                max: MAX_STUDIO_BONES,
            });
        }
        if !self.smoothing.is_finite() {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn offsets() -> Offsets {
        Offsets::sample()
    }

    #[rstest]
    fn defaults_validate(offsets: Offsets) {
        let settings = Settings::with_offsets(offsets);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.timing.calibration_settle(), DEFAULT_CALIBRATION_SETTLE);
        assert_eq!(settings.hotkeys.calibrate, vec![Key::F11, Key::F12]);
    }

    #[rstest]
    #[case::bone_out_of_range(AimSettings { bone_id: MAX_STUDIO_BONES, ..AimSettings::default() })]
    #[case::zero_fov(AimSettings { fov_degrees: 0.0, ..AimSettings::default() })]
    #[case::nan_fov(AimSettings { fov_degrees: f32::NAN, ..AimSettings::default() })]
    #[case::infinite_smoothing(AimSettings { smoothness: f32::INFINITY, ..AimSettings::default() })]
    fn invalid_aim_is_rejected(offsets: Offsets, #[case] aim: AimSettings) {
        let settings = Settings {
            aim,
            ..Settings::with_offsets(offsets)
        };
        assert!(settings.validate().is_err());
    }

    #[rstest]
    fn bone_error_names_the_bone(offsets: Offsets) {
        let settings = Settings {
            aim: AimSettings {
                bone_id: 200,
                ..AimSettings::default()
            },
            ..Settings::with_offsets(offsets)
        };
        let err = settings.validate().expect_err("bone 200 must be rejected");
        assert!(matches!(err, ConfigError::BoneIndex { index: 200, .. }));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    fn invalid_ratio_is_rejected(offsets: Offsets, #[case] ratio: f64) {
        let settings = Settings {
            calibration: CalibrationSettings {
                angle_per_pixel: ratio,
            },
            ..Settings::with_offsets(offsets)
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::AnglePerPixel(_))
        ));
    }

    #[rstest]
    fn missing_offsets_fail_to_parse() {
        let err = Settings::from_json_str(r#"{ "aim": {} }"#).expect_err("offsets are required");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[rstest]
    fn round_trips_through_json(offsets: Offsets) {
        let settings = Settings::with_offsets(offsets);
        let json = serde_json::to_string(&settings).expect("serialise settings");
        let parsed = Settings::from_json_str(&json).expect("parse settings");
        assert_eq!(parsed, settings);
    }
}
