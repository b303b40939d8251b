use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::proximity::INTERACTION_RADIUS;
use super::types::StationKind;

pub(crate) const KITCHEN_CONFIG_FILE: &str = "kitchen.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read kitchen config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse kitchen config at {path}: {message}")]
    Parse { path: String, message: String },
    #[error("invalid kitchen config at {field}: {message}")]
    Invalid { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigVec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl ConfigVec2 {
    pub(crate) const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StationConfig {
    pub(crate) kind: StationKind,
    pub(crate) position: ConfigVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct KitchenConfig {
    pub(crate) interaction_radius: f32,
    pub(crate) player_speed: f32,
    pub(crate) chop_seconds: f32,
    pub(crate) cook_seconds: f32,
    pub(crate) toast_seconds: f32,
    pub(crate) player_spawn: ConfigVec2,
    pub(crate) bounds_half_extents: ConfigVec2,
    pub(crate) stations: Vec<StationConfig>,
    pub(crate) counters: Vec<ConfigVec2>,
    pub(crate) chopping_counter: ConfigVec2,
    pub(crate) cooking_counter: ConfigVec2,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let station = |kind, x, y| StationConfig {
            kind,
            position: ConfigVec2::new(x, y),
        };
        Self {
            interaction_radius: INTERACTION_RADIUS,
            player_speed: 6.0,
            chop_seconds: 3.0,
            cook_seconds: 5.0,
            toast_seconds: 2.0,
            player_spawn: ConfigVec2::new(0.0, 0.0),
            bounds_half_extents: ConfigVec2::new(7.5, 5.5),
            stations: vec![
                station(StationKind::Pantry, -6.0, 4.0),
                station(StationKind::PlateDispenser, 6.0, 4.0),
                station(StationKind::Chopping, -4.0, 1.5),
                station(StationKind::Cooking, 4.0, -2.5),
                station(StationKind::Serving, 0.0, -4.5),
            ],
            counters: vec![
                ConfigVec2::new(-4.0, 0.0),
                ConfigVec2::new(4.0, -4.0),
                ConfigVec2::new(-2.0, -2.0),
                ConfigVec2::new(0.0, 2.0),
                ConfigVec2::new(2.0, -2.0),
            ],
            chopping_counter: ConfigVec2::new(-4.0, 0.0),
            cooking_counter: ConfigVec2::new(4.0, -4.0),
        }
    }
}

impl KitchenConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("interaction_radius", self.interaction_radius),
            ("player_speed", self.player_speed),
            ("chop_seconds", self.chop_seconds),
            ("cook_seconds", self.cook_seconds),
            ("toast_seconds", self.toast_seconds),
            ("bounds_half_extents.x", self.bounds_half_extents.x),
            ("bounds_half_extents.y", self.bounds_half_extents.y),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(expected_actual(field, "finite positive number", value));
            }
        }

        if !self.player_spawn.is_finite() {
            return Err(invalid("player_spawn", "expected finite coordinates"));
        }
        if self.player_spawn.x.abs() > self.bounds_half_extents.x
            || self.player_spawn.y.abs() > self.bounds_half_extents.y
        {
            return Err(invalid("player_spawn", "spawn lies outside kitchen bounds"));
        }

        for (index, station) in self.stations.iter().enumerate() {
            if !station.position.is_finite() {
                return Err(invalid(
                    &format!("stations[{index}].position"),
                    "expected finite coordinates",
                ));
            }
        }
        for kind in StationKind::ALL {
            let count = self
                .stations
                .iter()
                .filter(|station| station.kind == kind)
                .count();
            if count != 1 {
                return Err(expected_actual(
                    "stations",
                    format!("exactly one {} station", kind.as_token()),
                    count,
                ));
            }
        }

        if self.counters.is_empty() {
            return Err(invalid("counters", "at least one counter is required"));
        }
        for (index, counter) in self.counters.iter().enumerate() {
            if !counter.is_finite() {
                return Err(invalid(
                    &format!("counters[{index}]"),
                    "expected finite coordinates",
                ));
            }
        }
        for (field, designated) in [
            ("chopping_counter", self.chopping_counter),
            ("cooking_counter", self.cooking_counter),
        ] {
            if !self.counters.contains(&designated) {
                return Err(invalid(
                    field,
                    format!(
                        "no counter at ({}, {}) in counters list",
                        designated.x, designated.y
                    ),
                ));
            }
        }
        if self.chopping_counter == self.cooking_counter {
            return Err(invalid(
                "cooking_counter",
                "must differ from chopping_counter",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

fn expected_actual(
    field: &str,
    expected: impl std::fmt::Display,
    actual: impl std::fmt::Display,
) -> ConfigError {
    invalid(field, format!("expected {expected}, got {actual}"))
}

pub(crate) fn parse_kitchen_config_json(raw: &str) -> Result<KitchenConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, KitchenConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        ConfigError::Parse {
            path,
            message: source.to_string(),
        }
    })
}

pub(crate) fn load_kitchen_config(assets_dir: &Path) -> Result<KitchenConfig, ConfigError> {
    let path = assets_dir.join(KITCHEN_CONFIG_FILE);
    if !path.is_file() {
        info!(path = %path.display(), "kitchen_config_default");
        let config = KitchenConfig::default();
        config.validate()?;
        return Ok(config);
    }

    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse_kitchen_config_json(&raw)?;
    config.validate()?;
    info!(
        path = %path.display(),
        counters = config.counters.len(),
        interaction_radius = config.interaction_radius,
        "kitchen_config_loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_is_valid() {
        KitchenConfig::default().validate().expect("default layout");
    }

    #[test]
    fn shipped_kitchen_json_matches_builtin_layout() {
        let raw = include_str!("../../../../../assets/kitchen.json");
        let config = parse_kitchen_config_json(raw).expect("shipped config");
        config.validate().expect("shipped config valid");
        assert_eq!(config, KitchenConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config = parse_kitchen_config_json(r#"{ "chop_seconds": 1.5 }"#).expect("parse");
        assert_eq!(config.chop_seconds, 1.5);
        assert_eq!(config.cook_seconds, KitchenConfig::default().cook_seconds);
        assert_eq!(config.counters.len(), 5);
    }

    #[test]
    fn parse_reports_unknown_station_kind_path() {
        let mut value = serde_json::to_value(KitchenConfig::default()).expect("to_value");
        value["stations"][1]["kind"] = json!("dishwasher");
        let raw = serde_json::to_string(&value).expect("json");

        let error = parse_kitchen_config_json(&raw).expect_err("unknown variant should fail");
        let text = error.to_string();
        assert!(text.contains("parse kitchen config"));
        assert!(text.contains("stations[1].kind"));
        assert!(text.contains("unknown variant"));
    }

    #[test]
    fn parse_reports_type_mismatch_path() {
        let raw = r#"{ "counters": [ { "x": 1.0, "y": "left" } ] }"#;
        let error = parse_kitchen_config_json(raw).expect_err("type mismatch should fail");
        assert!(error.to_string().contains("counters[0].y"));
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let error = parse_kitchen_config_json(r#"{ "score_multiplier": 2 }"#)
            .expect_err("unknown field should fail");
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn validation_rejects_non_positive_durations() {
        let config = KitchenConfig {
            cook_seconds: 0.0,
            ..KitchenConfig::default()
        };
        let error = config.validate().expect_err("zero duration");
        assert!(error.to_string().contains("cook_seconds"));
    }

    #[test]
    fn validation_requires_each_station_once() {
        let mut config = KitchenConfig::default();
        config
            .stations
            .retain(|station| station.kind != StationKind::Serving);
        let error = config.validate().expect_err("missing serving station");
        assert!(error.to_string().contains("serving"));

        let mut config = KitchenConfig::default();
        let duplicate = config.stations[0];
        config.stations.push(duplicate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_requires_designated_counters_to_exist() {
        let config = KitchenConfig {
            chopping_counter: ConfigVec2::new(-4.0, 0.5),
            ..KitchenConfig::default()
        };
        let error = config.validate().expect_err("dangling chopping counter");
        assert!(error.to_string().contains("chopping_counter"));
    }

    #[test]
    fn load_falls_back_to_default_when_file_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_kitchen_config(dir.path()).expect("default");
        assert_eq!(config, KitchenConfig::default());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(KITCHEN_CONFIG_FILE);
        fs::write(&path, r#"{ "interaction_radius": 1.25 }"#).expect("write");
        let config = load_kitchen_config(dir.path()).expect("load");
        assert_eq!(config.interaction_radius, 1.25);

        fs::write(&path, r#"{ "interaction_radius": -1.0 }"#).expect("write");
        let error = load_kitchen_config(dir.path()).expect_err("negative radius");
        assert!(matches!(error, ConfigError::Invalid { .. }));
    }
}
