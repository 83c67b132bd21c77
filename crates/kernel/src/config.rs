use serde::{Deserialize, Serialize};
use std::path::Path;
use tilescape_render::SpaceGeometry;

/// Errors from loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine construction parameters. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World-space width and depth of one cell.
    pub square_size: f32,
    /// Y of floor quads.
    pub floor_height: f32,
    /// Y of ceiling quads.
    pub ceiling_height: f32,
    /// Number of map slots.
    pub max_maps: usize,
    /// Walking pace; `0` selects [`Self::DEFAULT_SECONDS_PER_SQUARE`].
    pub seconds_per_square: f32,
    /// Degrees per `advance`; `0` selects [`Self::DEFAULT_TURN_SPEED`].
    pub turn_speed: f32,
    /// Frame delta used until the host supplies one, in seconds.
    pub frame_delta: f32,
    /// Default draw distance in cells.
    pub view_distance: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            square_size: 0.125,
            floor_height: -0.04,
            ceiling_height: 0.04,
            max_maps: Self::DEFAULT_MAX_MAPS,
            seconds_per_square: Self::DEFAULT_SECONDS_PER_SQUARE,
            turn_speed: Self::DEFAULT_TURN_SPEED,
            frame_delta: 1.0 / 60.0,
            view_distance: 10,
        }
    }
}

impl EngineConfig {
    pub const DEFAULT_MAX_MAPS: usize = 10;
    /// Upper bound on `max_maps`; every slot is allocated up front.
    pub const MAX_MAPS: usize = 1024;
    /// Fifteen frames per square at 60 Hz.
    pub const DEFAULT_SECONDS_PER_SQUARE: f32 = 0.25;
    pub const DEFAULT_TURN_SPEED: f32 = 5.0;
    pub const MAX_TURN_SPEED: f32 = 90.0;

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&data),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&data),
            other => Err(ConfigError::Invalid(format!(
                "unsupported config extension {other:?} for {}",
                path.display()
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.square_size.is_finite() && self.square_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "square_size must be positive, got {}",
                self.square_size
            )));
        }
        if !(self.floor_height.is_finite() && self.ceiling_height.is_finite()) {
            return Err(ConfigError::Invalid("heights must be finite".into()));
        }
        if !(1..=Self::MAX_MAPS).contains(&self.max_maps) {
            return Err(ConfigError::Invalid(format!(
                "max_maps must be within 1..={}, got {}",
                Self::MAX_MAPS,
                self.max_maps
            )));
        }
        if !(self.seconds_per_square.is_finite() && self.seconds_per_square >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "seconds_per_square must be >= 0, got {}",
                self.seconds_per_square
            )));
        }
        if !(0.0..=Self::MAX_TURN_SPEED).contains(&self.turn_speed) {
            return Err(ConfigError::Invalid(format!(
                "turn_speed must be within 0..=90, got {}",
                self.turn_speed
            )));
        }
        if !(self.frame_delta.is_finite() && self.frame_delta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "frame_delta must be positive, got {}",
                self.frame_delta
            )));
        }
        Ok(())
    }

    pub fn geometry(&self) -> SpaceGeometry {
        SpaceGeometry {
            square_size: self.square_size,
            floor_height: self.floor_height,
            ceiling_height: self.ceiling_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_maps, 10);
        assert_eq!(config.geometry(), SpaceGeometry::default());
    }

    #[test]
    fn yaml_fills_missing_fields() {
        let config = EngineConfig::from_yaml_str("square_size: 1.0\nmax_maps: 3\n").unwrap();
        assert_eq!(config.square_size, 1.0);
        assert_eq!(config.max_maps, 3);
        assert_eq!(config.turn_speed, EngineConfig::DEFAULT_TURN_SPEED);
    }

    #[test]
    fn json_round_trip() {
        let config = EngineConfig {
            view_distance: 4,
            ..EngineConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(EngineConfig::from_yaml_str("square_size: 0.0").is_err());
        assert!(EngineConfig::from_yaml_str("max_maps: 0").is_err());
        assert!(EngineConfig::from_yaml_str("turn_speed: 91.0").is_err());
        assert!(EngineConfig::from_yaml_str("seconds_per_square: -1.0").is_err());
        assert!(EngineConfig::from_yaml_str("frame_delta: 0.0").is_err());
    }

    #[test]
    fn max_maps_is_bounded() {
        let at_limit = format!("max_maps: {}", EngineConfig::MAX_MAPS);
        assert_eq!(EngineConfig::from_yaml_str(&at_limit).unwrap().max_maps, 1024);
        assert!(matches!(
            EngineConfig::from_yaml_str("max_maps: 10000000000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"max_maps": 1025}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn load_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "view_distance: 6").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.view_distance, 6);

        let other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            EngineConfig::load(other.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
