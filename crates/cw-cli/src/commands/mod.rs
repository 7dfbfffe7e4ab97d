//! Subcommand implementations.

pub mod play;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use cw_core::{WorldDef, WorldRegistry};
use cw_engine::{DialogueGraph, InterpreterConfig};

/// World data for the built-in demo ship.
const DEMO_WORLD: &str = include_str!("../../data/world.json");
/// Dialogue data for the built-in demo ship.
const DEMO_DIALOGUE: &str = include_str!("../../data/dialogue.json");
/// Interpreter configuration for the built-in demo ship.
const DEMO_CONFIG: &str = include_str!("../../data/config.json");

/// Everything a game needs, loaded and validated.
pub struct GameData {
    /// The built world registry.
    pub world: WorldRegistry,
    /// The dialogue graph.
    pub graph: DialogueGraph,
    /// The interpreter configuration.
    pub config: InterpreterConfig,
}

/// Load a data directory, or the built-in demo when none is given.
pub fn load_data(data: Option<&Path>) -> Result<GameData, String> {
    let (world_json, dialogue_json, config_json) = match data {
        Some(dir) => (
            read(dir.join("world.json"))?,
            read(dir.join("dialogue.json"))?,
            read(dir.join("config.json"))?,
        ),
        None => (
            DEMO_WORLD.to_string(),
            DEMO_DIALOGUE.to_string(),
            DEMO_CONFIG.to_string(),
        ),
    };

    let world = WorldDef::from_json(&world_json)
        .and_then(WorldDef::build)
        .map_err(|e| format!("world data: {e}"))?;
    let graph =
        DialogueGraph::from_json(&dialogue_json).map_err(|e| format!("dialogue data: {e}"))?;
    let config =
        InterpreterConfig::from_json(&config_json).map_err(|e| format!("config data: {e}"))?;

    Ok(GameData {
        world,
        graph,
        config,
    })
}

fn read(path: PathBuf) -> Result<String, String> {
    fs::read_to_string(&path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}
