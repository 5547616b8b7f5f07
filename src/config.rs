//! Game configuration.
//!
//! Every top-level field has a default, so a config file only needs the
//! values it changes. Nested stat blocks are replaced whole:
//!
//! ```json
//! {
//!   "map_width": 40,
//!   "enemies": 3,
//!   "player": { "attack_cooldown": 20, "move_cooldown": 15, "hp": 5, "attack_power": 1 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Side;

/// Largest HP a unit can show: its centre glyph is one base-36 digit.
pub const MAX_DISPLAY_HP: i32 = 35;

/// Smallest map edge that still leaves room to spawn a 3×3 unit.
pub const MIN_MAP_EDGE: i32 = 5;

/// Largest map edge. The bordered map plus the hint rows, at two character
/// columns per cell, stays well inside terminal `u16` coordinates.
pub const MAX_MAP_EDGE: i32 = 4096;

/// Starting stats for one side's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideStats {
    /// Ticks between two shots.
    pub attack_cooldown: u32,
    /// Ticks between two steps.
    pub move_cooldown: u32,
    /// Starting hit points.
    pub hp: i32,
    /// Damage dealt per projectile.
    pub attack_power: i32,
}

/// Clamps that buffs may not push a side's stats past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideLimits {
    /// Floor for the attack cooldown.
    pub min_attack_cooldown: u32,
    /// Floor for the move cooldown.
    pub min_move_cooldown: u32,
    /// Ceiling for hit points.
    pub max_hp: i32,
    /// Ceiling for attack power.
    pub max_attack_power: i32,
}

/// Complete game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Simulation ticks per second.
    pub fps: u32,
    /// Playable columns.
    pub map_width: i32,
    /// Playable rows.
    pub map_height: i32,
    /// Unbreakable 3×3 obstacle clusters per level.
    pub solid_clusters: u32,
    /// Breakable 3×3 obstacle clusters per level.
    pub dirt_clusters: u32,
    /// Enemy units at level 1.
    pub enemies: u32,
    /// Most enemy units the roster may grow to.
    pub enemy_limit: u32,
    /// Starting player stats.
    pub player: SideStats,
    /// Starting enemy stats.
    pub enemy: SideStats,
    /// Player buff clamps.
    pub player_limits: SideLimits,
    /// Enemy buff clamps.
    pub enemy_limits: SideLimits,
    /// Positions sampled before a spawn is declared impossible.
    pub spawn_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            map_width: 56,
            map_height: 24,
            solid_clusters: 5,
            dirt_clusters: 6,
            enemies: 2,
            enemy_limit: 15,
            player: SideStats {
                attack_cooldown: 25,
                move_cooldown: 20,
                hp: 2,
                attack_power: 1,
            },
            enemy: SideStats {
                attack_cooldown: 25,
                move_cooldown: 20,
                hp: 1,
                attack_power: 1,
            },
            player_limits: SideLimits {
                min_attack_cooldown: 2,
                min_move_cooldown: 1,
                max_hp: MAX_DISPLAY_HP,
                max_attack_power: 15,
            },
            enemy_limits: SideLimits {
                min_attack_cooldown: 2,
                min_move_cooldown: 2,
                max_hp: 20,
                max_attack_power: 15,
            },
            spawn_attempts: 10_000,
        }
    }
}

impl Config {
    /// Load and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Starting stats for `side`.
    #[must_use]
    pub const fn stats(&self, side: Side) -> SideStats {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }

    /// Buff clamps for `side`.
    #[must_use]
    pub const fn limits(&self, side: Side) -> SideLimits {
        match side {
            Side::Player => self.player_limits,
            Side::Enemy => self.enemy_limits,
        }
    }

    /// Check that the game can run with these values.
    ///
    /// # Errors
    ///
    /// Returns the first rejected field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(invalid("fps", "must be positive"));
        }
        if !(MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&self.map_width) {
            return Err(invalid(
                "map_width",
                format!("must be within {MIN_MAP_EDGE}..={MAX_MAP_EDGE}"),
            ));
        }
        if !(MIN_MAP_EDGE..=MAX_MAP_EDGE).contains(&self.map_height) {
            return Err(invalid(
                "map_height",
                format!("must be within {MIN_MAP_EDGE}..={MAX_MAP_EDGE}"),
            ));
        }
        if self.enemies > self.enemy_limit {
            return Err(invalid(
                "enemies",
                format!("{} exceeds enemy_limit {}", self.enemies, self.enemy_limit),
            ));
        }
        if self.spawn_attempts == 0 {
            return Err(invalid("spawn_attempts", "must be positive"));
        }
        validate_side(&PLAYER_FIELDS, &self.player, &self.player_limits)?;
        validate_side(&ENEMY_FIELDS, &self.enemy, &self.enemy_limits)
    }
}

/// Dotted field names for one side, used in validation errors.
struct SideFields {
    hp: &'static str,
    attack_power: &'static str,
    attack_cooldown: &'static str,
    move_cooldown: &'static str,
    max_hp: &'static str,
}

const PLAYER_FIELDS: SideFields = SideFields {
    hp: "player.hp",
    attack_power: "player.attack_power",
    attack_cooldown: "player.attack_cooldown",
    move_cooldown: "player.move_cooldown",
    max_hp: "player_limits.max_hp",
};

const ENEMY_FIELDS: SideFields = SideFields {
    hp: "enemy.hp",
    attack_power: "enemy.attack_power",
    attack_cooldown: "enemy.attack_cooldown",
    move_cooldown: "enemy.move_cooldown",
    max_hp: "enemy_limits.max_hp",
};

fn validate_side(field: &SideFields, stats: &SideStats, limits: &SideLimits) -> Result<(), ConfigError> {
    if limits.max_hp > MAX_DISPLAY_HP {
        return Err(invalid(field.max_hp, format!("must not exceed {MAX_DISPLAY_HP}")));
    }
    if stats.hp < 1 || stats.hp > limits.max_hp {
        return Err(invalid(field.hp, format!("must be within 1..={}", limits.max_hp)));
    }
    if stats.attack_power < 0 || stats.attack_power > limits.max_attack_power {
        return Err(invalid(
            field.attack_power,
            format!("must be within 0..={}", limits.max_attack_power),
        ));
    }
    if stats.attack_cooldown < limits.min_attack_cooldown {
        return Err(invalid(
            field.attack_cooldown,
            format!("must be at least {}", limits.min_attack_cooldown),
        ));
    }
    if stats.move_cooldown < limits.min_move_cooldown {
        return Err(invalid(
            field.move_cooldown,
            format!("must be at least {}", limits.min_move_cooldown),
        ));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "map_width": 40, "enemies": 3 }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.map_width, 40);
        assert_eq!(config.enemies, 3);
        assert_eq!(config.map_height, Config::default().map_height);
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "mapwidth": 40 }}"#).unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/tankgrid.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_rejects_tiny_map() {
        let config = Config {
            map_height: 4,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "map_height", .. }));
    }

    #[test]
    fn test_rejects_oversized_map() {
        let wide = Config {
            map_width: 40_000,
            map_height: 5,
            ..Config::default()
        };
        let err = wide.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "map_width", .. }));

        let huge = Config {
            map_width: i32::MAX,
            ..Config::default()
        };
        assert!(huge.validate().is_err());

        let tall = Config {
            map_height: MAX_MAP_EDGE + 1,
            ..Config::default()
        };
        let err = tall.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "map_height", .. }));

        let edge = Config {
            map_width: MAX_MAP_EDGE,
            map_height: MAX_MAP_EDGE,
            ..Config::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_rejects_hp_beyond_glyph_range() {
        let mut config = Config::default();
        config.player_limits.max_hp = 36;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "player_limits.max_hp", .. }));
    }

    #[test]
    fn test_rejects_start_below_floor() {
        let mut config = Config::default();
        config.enemy.move_cooldown = 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "enemy.move_cooldown", .. }));
    }

    #[test]
    fn test_rejects_more_enemies_than_limit() {
        let config = Config {
            enemies: 16,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
