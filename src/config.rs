//! Run configuration read from the environment (and `.env`, loaded in `main`).
use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::planners::{PolicyKind, QLearningConfig};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("unknown agent {0:?} (expected zealot-rush, probe-economy, random or learning)")]
    UnknownAgent(String),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} must be within [0, 1], got {value}")]
    OutOfRange { key: &'static str, value: f64 },
}

/// How to launch the bridge process.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Game parameters forwarded to the bridge when an episode starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub map: String,
    pub difficulty: String,
    pub step_mul: u32,
    pub screen_size: u32,
    pub minimap_size: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            map: "Simple64".to_string(),
            difficulty: "very_easy".to_string(),
            step_mul: 8,
            screen_size: 84,
            minimap_size: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub agent: PolicyKind,
    pub bridge: BridgeCommand,
    pub game: GameSettings,
    /// Episodes to play; 0 plays until the bridge stops.
    pub episodes: u32,
    pub seed: Option<u64>,
    pub replays_folder: Option<String>,
    pub qlearning: QLearningConfig,
}

impl Config {
    /// Environment variables:
    /// - `PROBEBOT_AGENT` - zealot-rush (default), probe-economy, random or learning
    /// - `PROBEBOT_BRIDGE_CMD` - bridge executable (required)
    /// - `PROBEBOT_BRIDGE_ARGS` - whitespace-separated bridge arguments
    /// - `PROBEBOT_MAP`, `PROBEBOT_DIFFICULTY`, `PROBEBOT_STEP_MUL`,
    ///   `PROBEBOT_SCREEN`, `PROBEBOT_MINIMAP` - game settings
    /// - `PROBEBOT_EPISODES` - episode count (default 10, 0 = unlimited)
    /// - `PROBEBOT_SEED` - seed for the agent's random source
    /// - `PROBEBOT_REPLAYS_FOLDER` - write replays here when set
    /// - `PROBEBOT_ALPHA`, `PROBEBOT_GAMMA`, `PROBEBOT_EPSILON` - learning parameters
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let agent = match var("PROBEBOT_AGENT") {
            Some(name) => name.parse()?,
            None => PolicyKind::ZealotRush,
        };

        let program = var("PROBEBOT_BRIDGE_CMD").ok_or(ConfigError::Missing("PROBEBOT_BRIDGE_CMD"))?;
        let args = var("PROBEBOT_BRIDGE_ARGS")
            .map(|a| a.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let defaults = GameSettings::default();
        let game = GameSettings {
            map: var("PROBEBOT_MAP").unwrap_or(defaults.map),
            difficulty: var("PROBEBOT_DIFFICULTY").unwrap_or(defaults.difficulty),
            step_mul: parse_or(&var, "PROBEBOT_STEP_MUL", defaults.step_mul)?,
            screen_size: parse_or(&var, "PROBEBOT_SCREEN", defaults.screen_size)?,
            minimap_size: parse_or(&var, "PROBEBOT_MINIMAP", defaults.minimap_size)?,
        };

        let learning = QLearningConfig::default();
        let qlearning = QLearningConfig {
            alpha: unit_interval(&var, "PROBEBOT_ALPHA", learning.alpha)?,
            gamma: unit_interval(&var, "PROBEBOT_GAMMA", learning.gamma)?,
            epsilon: unit_interval(&var, "PROBEBOT_EPSILON", learning.epsilon)?,
        };

        Ok(Self {
            agent,
            bridge: BridgeCommand { program, args },
            game,
            episodes: parse_or(&var, "PROBEBOT_EPISODES", 10)?,
            seed: parse_opt(&var, "PROBEBOT_SEED")?,
            replays_folder: var("PROBEBOT_REPLAYS_FOLDER"),
            qlearning,
        })
    }
}

fn parse_opt<T, F>(var: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                key,
                value: value.clone(),
            })
        })
        .transpose()
}

fn parse_or<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(var, key)?.unwrap_or(default))
}

fn unit_interval<F>(var: &F, key: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(var, key, default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange { key, value });
    }
    Ok(value)
}
