//! Wire protocol and world entity types shared by anything that speaks to
//! the game server.
//!
//! Messages travel as newline-delimited JSON, tagged by an `action` field.
//! The server is authoritative for all state; the types here only mirror
//! what it broadcasts.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

pub const MAP_WIDTH: i32 = 5000;
pub const MAP_HEIGHT: i32 = 5000;

/// Distance a single movement key press covers, in world units.
pub const MOVE_STEP: i32 = 10;

/// An asteroid is mineable when strictly closer than this.
pub const MINING_RANGE: f64 = 100.0;

/// An NPC is attackable when strictly closer than this.
pub const ATTACK_RANGE: f64 = 100.0;

/// Fixed minimap width; height follows the world aspect ratio.
pub const MINIMAP_WIDTH: f64 = 200.0;

/// Delay between reconnection attempts. Fixed interval, no backoff.
pub const RECONNECT_INTERVAL_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The server spawns every new player at the map center.
    pub fn base() -> Self {
        Self::new(MAP_WIDTH / 2, MAP_HEIGHT / 2)
    }

    pub fn in_bounds(&self) -> bool {
        (0..=MAP_WIDTH).contains(&self.x) && (0..=MAP_HEIGHT).contains(&self.y)
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_player_health")]
    pub health: u32,
}

impl Player {
    pub fn new(position: Position, color: &str) -> Self {
        Self {
            position,
            color: color.to_string(),
            health: default_player_health(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub position: Position,
    #[serde(default = "default_npc_health")]
    pub health: u32,
    #[serde(default = "default_npc_level")]
    pub level: u32,
}

impl Npc {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            health: default_npc_health(),
            level: default_npc_level(),
        }
    }
}

/// A mineable resource. Identity is positional: two objects are the same
/// entity iff both coordinates match. There is no stable id on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub x: i32,
    pub y: i32,
}

impl MapObject {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

fn default_player_health() -> u32 {
    100
}

fn default_npc_health() -> u32 {
    50
}

fn default_npc_level() -> u32 {
    1
}

/// Decodes a collection field leniently: absent, null, or wrong-typed JSON
/// becomes the empty collection instead of failing the whole message.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Messages the server pushes to the client.
///
/// `update_players` and `update_npcs` carry the complete set of currently
/// visible entities of that kind, not a diff; the receiver replaces its map
/// wholesale. `initialize` and `update_world` replace everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    Initialize {
        player_id: String,
        #[serde(default, deserialize_with = "lenient")]
        players: HashMap<String, Player>,
        #[serde(default, deserialize_with = "lenient")]
        npcs: HashMap<String, Npc>,
        #[serde(default, deserialize_with = "lenient")]
        map_objects: Vec<MapObject>,
    },
    UpdatePlayers {
        #[serde(default, deserialize_with = "lenient")]
        players: HashMap<String, Player>,
    },
    UpdateNpcs {
        #[serde(default, deserialize_with = "lenient")]
        npcs: HashMap<String, Npc>,
    },
    UpdateWorld {
        #[serde(default, deserialize_with = "lenient")]
        players: HashMap<String, Player>,
        #[serde(default, deserialize_with = "lenient")]
        npcs: HashMap<String, Npc>,
        #[serde(default, deserialize_with = "lenient")]
        map_objects: Vec<MapObject>,
    },
    AsteroidRemoved {
        asteroid: MapObject,
    },
    AsteroidRespawn {
        asteroid: MapObject,
    },
    /// Any action tag this client version does not know. Logged and ignored.
    #[serde(other)]
    Unknown,
}

/// Messages the client sends to the server. The server validates everything;
/// the client only requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    Move { x: i32, y: i32 },
    Mine,
    Shoot,
}
