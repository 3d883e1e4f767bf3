//! # Effects Configuration
//!
//! Tuning for every effect lives in one TOML document. Omitted keys fall back
//! to the values the site ships with.
//!
//! ```toml
//! [ambient]
//! initial_population = 40
//! ceiling = 60
//!
//! [emitter]
//! shape_mode = "mixed"
//! intensify_on_hover = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EffectsError, EffectsResult};
use crate::particle::ShapeMode;

/// Full-viewport drifting background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    /// Particles seeded on mount.
    pub initial_population: usize,
    /// Edge spawning stops at this population.
    pub ceiling: usize,
    /// Edge spawn period.
    pub spawn_interval_ms: u64,
    /// Smallest particle size (px).
    pub size_min: f32,
    /// Largest particle size (px).
    pub size_max: f32,
    /// Lowest particle opacity.
    pub opacity_min: f32,
    /// Highest particle opacity.
    pub opacity_max: f32,
    /// Resting velocity per axis is uniform in ±this (px/frame).
    pub drift_speed: f32,
    /// Rotation speed is uniform in ±this (deg/frame).
    pub rotation_speed: f32,
    /// Pointer repulsion radius (px).
    pub repulsion_radius: f32,
    /// Impulse at zero distance (px/frame).
    pub repulsion_strength: f32,
    /// Fraction of the gap to resting velocity closed per frame.
    pub relaxation: f32,
    /// Velocity multiplier applied every frame.
    pub damping: f32,
    /// Distance past a viewport edge before a particle wraps.
    pub wrap_margin: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            initial_population: 80,
            ceiling: 100,
            spawn_interval_ms: 500,
            size_min: 6.0,
            size_max: 16.0,
            opacity_min: 0.3,
            opacity_max: 0.7,
            drift_speed: 0.75,
            rotation_speed: 1.5,
            repulsion_radius: 150.0,
            repulsion_strength: 3.0,
            relaxation: 0.02,
            damping: 0.98,
            wrap_margin: 20.0,
        }
    }
}

impl AmbientConfig {
    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EffectsResult<()> {
        require(self.ceiling > 0, "ambient.ceiling must be positive")?;
        require(
            self.initial_population <= self.ceiling,
            "ambient.initial_population must not exceed ambient.ceiling",
        )?;
        require(self.spawn_interval_ms > 0, "ambient.spawn_interval_ms must be positive")?;
        require_range(self.size_min, self.size_max, "ambient.size")?;
        require_range(self.opacity_min, self.opacity_max, "ambient.opacity")?;
        require(
            self.opacity_min > 0.0 && self.opacity_max <= 1.0,
            "ambient.opacity must lie in (0, 1]",
        )?;
        require(self.repulsion_radius > 0.0, "ambient.repulsion_radius must be positive")?;
        require(
            (0.0..=1.0).contains(&self.relaxation),
            "ambient.relaxation must lie in [0, 1]",
        )?;
        require(
            self.damping > 0.0 && self.damping <= 1.0,
            "ambient.damping must lie in (0, 1]",
        )?;
        require(self.wrap_margin >= 0.0, "ambient.wrap_margin must not be negative")
    }
}

/// Hover-triggered emitter wrapped around page content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoverEmitterConfig {
    /// Particles per emission tick at baseline intensity.
    pub particles_per_tick: u32,
    /// Smallest sampled size (px).
    pub size_min: f32,
    /// Largest sampled size (px).
    pub size_max: f32,
    /// Live population cap; the oldest particles go first.
    pub ceiling: usize,
    /// Which shapes to emit.
    pub shape_mode: ShapeMode,
    /// Ramp emission up the longer the hover lasts.
    pub intensify_on_hover: bool,
    /// Emission period.
    pub tick_ms: u64,
    /// Intensity added per ramp tick.
    pub intensity_step: f32,
    /// Ramp period.
    pub intensity_tick_ms: u64,
    /// Intensity ceiling.
    pub max_intensity: f32,
    /// Spawn opacity.
    pub opacity: f32,
    /// Velocity per axis is uniform in ±speed·intensity (px/frame).
    pub speed: f32,
    /// Opacity lost per frame.
    pub opacity_decay: f32,
    /// Size multiplier per frame.
    pub size_decay: f32,
}

impl Default for HoverEmitterConfig {
    fn default() -> Self {
        Self {
            particles_per_tick: 4,
            size_min: 3.0,
            size_max: 8.0,
            ceiling: 30,
            shape_mode: ShapeMode::Dots,
            intensify_on_hover: false,
            tick_ms: 60,
            intensity_step: 0.25,
            intensity_tick_ms: 200,
            max_intensity: 4.0,
            opacity: 0.9,
            speed: 2.0,
            opacity_decay: 0.025,
            size_decay: 0.98,
        }
    }
}

impl HoverEmitterConfig {
    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EffectsResult<()> {
        require(self.ceiling > 0, "emitter.ceiling must be positive")?;
        require(self.tick_ms > 0, "emitter.tick_ms must be positive")?;
        require(self.intensity_tick_ms > 0, "emitter.intensity_tick_ms must be positive")?;
        require_range(self.size_min, self.size_max, "emitter.size")?;
        require(self.max_intensity >= 1.0, "emitter.max_intensity must be at least 1")?;
        require(self.intensity_step >= 0.0, "emitter.intensity_step must not be negative")?;
        require(
            self.opacity > 0.0 && self.opacity <= 1.0,
            "emitter.opacity must lie in (0, 1]",
        )?;
        validate_decay(self.opacity_decay, self.size_decay, "emitter")
    }
}

/// Per-character spring text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwingTextConfig {
    /// Pointer influence radius around each glyph center (px).
    pub radius: f32,
    /// Yaw impulse per px of horizontal offset at full force.
    pub yaw_gain: f32,
    /// Pitch impulse per px of vertical offset at full force.
    pub pitch_gain: f32,
    /// Lift (upward translation) at full force (px).
    pub lift: f32,
    /// Depth (toward the viewer) at full force (px).
    pub depth: f32,
    /// Extra scale at full force.
    pub scale_gain: f32,
    /// Restoring acceleration per degree of deflection.
    pub spring_strength: f32,
    /// Velocity multiplier per frame.
    pub damping: f32,
    /// Pitch clamp (deg).
    pub max_pitch: f32,
    /// Yaw clamp (deg).
    pub max_yaw: f32,
    /// Angle and velocity both below this snap to rest.
    pub rest_threshold: f32,
    /// Lift, depth and scale keep this fraction of their offset per frame.
    pub settle_factor: f32,
    /// Scale offsets below this snap to 1.
    pub scale_threshold: f32,
    /// Block particles per emission tick.
    pub particles_per_tick: u32,
    /// Block emission period.
    pub tick_ms: u64,
    /// Block particle cap.
    pub ceiling: usize,
    /// Smallest block particle (px).
    pub size_min: f32,
    /// Largest block particle (px).
    pub size_max: f32,
    /// Block particle spawn opacity.
    pub opacity: f32,
    /// Block particle velocity per axis is uniform in ±this.
    pub speed: f32,
    /// Upward bias added to block particle velocity.
    pub rise: f32,
    /// Opacity lost per frame.
    pub opacity_decay: f32,
    /// Size multiplier per frame.
    pub size_decay: f32,
}

impl Default for SwingTextConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            yaw_gain: 0.3,
            pitch_gain: 0.2,
            lift: 10.0,
            depth: 30.0,
            scale_gain: 0.2,
            spring_strength: 0.1,
            damping: 0.9,
            max_pitch: 30.0,
            max_yaw: 45.0,
            rest_threshold: 0.1,
            settle_factor: 0.92,
            scale_threshold: 0.01,
            particles_per_tick: 4,
            tick_ms: 80,
            ceiling: 40,
            size_min: 3.0,
            size_max: 9.0,
            opacity: 0.8,
            speed: 1.5,
            rise: 1.0,
            opacity_decay: 0.03,
            size_decay: 0.97,
        }
    }
}

impl SwingTextConfig {
    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EffectsResult<()> {
        require(self.radius > 0.0, "text.radius must be positive")?;
        require(
            self.damping > 0.0 && self.damping < 1.0,
            "text.damping must lie in (0, 1)",
        )?;
        require(
            self.spring_strength > 0.0 && self.spring_strength < 1.0,
            "text.spring_strength must lie in (0, 1)",
        )?;
        require(
            self.max_pitch > 0.0 && self.max_yaw > 0.0,
            "text.max_pitch and text.max_yaw must be positive",
        )?;
        require(self.rest_threshold > 0.0, "text.rest_threshold must be positive")?;
        require(self.scale_threshold > 0.0, "text.scale_threshold must be positive")?;
        require(
            self.settle_factor >= 0.0 && self.settle_factor < 1.0,
            "text.settle_factor must lie in [0, 1)",
        )?;
        require(self.ceiling > 0, "text.ceiling must be positive")?;
        require(self.tick_ms > 0, "text.tick_ms must be positive")?;
        require_range(self.size_min, self.size_max, "text.size")?;
        require(
            self.opacity > 0.0 && self.opacity <= 1.0,
            "text.opacity must lie in (0, 1]",
        )?;
        validate_decay(self.opacity_decay, self.size_decay, "text")
    }
}

/// Every effect's tuning.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Background swarm.
    pub ambient: AmbientConfig,
    /// Hover emitter.
    pub emitter: HoverEmitterConfig,
    /// Spring text.
    pub text: SwingTextConfig,
}

impl EffectsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::Parse`] for malformed TOML and
    /// [`EffectsError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> EffectsResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::Io`] if the file cannot be read, otherwise as
    /// [`EffectsConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> EffectsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EffectsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "effects configuration loaded");
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EffectsResult<()> {
        self.ambient.validate()?;
        self.emitter.validate()?;
        self.text.validate()
    }
}

fn require(condition: bool, message: &str) -> EffectsResult<()> {
    if condition {
        Ok(())
    } else {
        Err(EffectsError::InvalidConfig(message.to_owned()))
    }
}

fn require_range(min: f32, max: f32, name: &str) -> EffectsResult<()> {
    require(
        min > 0.0 && min <= max,
        &format!("{name}_min must be positive and not exceed {name}_max"),
    )
}

fn validate_decay(opacity_decay: f32, size_decay: f32, section: &str) -> EffectsResult<()> {
    require(
        opacity_decay > 0.0,
        &format!("{section}.opacity_decay must be positive"),
    )?;
    require(
        size_decay > 0.0 && size_decay <= 1.0,
        &format!("{section}.size_decay must lie in (0, 1]"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        EffectsConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = EffectsConfig::from_toml_str(
            r#"
            [ambient]
            ceiling = 120

            [emitter]
            shape_mode = "mixed"
            intensify_on_hover = true
            "#,
        )
        .unwrap();

        assert_eq!(config.ambient.ceiling, 120);
        assert_eq!(config.ambient.initial_population, 80);
        assert_eq!(config.emitter.shape_mode, ShapeMode::Mixed);
        assert!(config.emitter.intensify_on_hover);
        assert_eq!(config.text, SwingTextConfig::default());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let err = EffectsConfig::from_toml_str("[emitter]\nceiling = 0\n").unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(msg) if msg.contains("emitter.ceiling")));
    }

    #[test]
    fn test_inverted_size_range_rejected() {
        let err = EffectsConfig::from_toml_str("[text]\nsize_min = 9.0\nsize_max = 3.0\n").unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(msg) if msg.contains("text.size")));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = EffectsConfig::from_toml_str("[ambient]\nceilng = 5\n").unwrap_err();
        assert!(matches!(err, EffectsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EffectsConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EffectsError::Io { .. }));
    }
}
