//! Local mirror of the server-authoritative world state.
//!
//! All mutation flows through the protocol reconciler, plus the single
//! optimistic-removal entry point used by the mine action. Everything else
//! reads.

use shared::{MapObject, Npc, Player};
use std::collections::HashMap;

/// Entities that vanished from the model during a wholesale replacement,
/// so the presentation layer can drop them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovedEntities {
    pub players: Vec<String>,
    pub npcs: Vec<String>,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Default)]
pub struct WorldModel {
    players: HashMap<String, Player>,
    npcs: HashMap<String, Npc>,
    map_objects: Vec<MapObject>,
    local_player_id: Option<String>,
    /// Objects removed locally before the server confirmed the mine action.
    /// Cleared when the matching `asteroid_removed` arrives or a full
    /// snapshot supersedes them.
    pending_removals: Vec<MapObject>,
}

impl WorldModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &HashMap<String, Player> {
        &self.players
    }

    pub fn npcs(&self) -> &HashMap<String, Npc> {
        &self.npcs
    }

    pub fn map_objects(&self) -> &[MapObject] {
        &self.map_objects
    }

    pub fn local_player_id(&self) -> Option<&str> {
        self.local_player_id.as_deref()
    }

    /// The player entry `local_player_id` points at, if both exist. A full
    /// snapshot may legitimately drop our own entry; callers must tolerate
    /// `None`.
    pub fn local_player(&self) -> Option<&Player> {
        self.players.get(self.local_player_id.as_ref()?)
    }

    /// Records which entry is "self". Set once per session; later calls are
    /// ignored so `update_world` can never steal the identity.
    pub fn set_local_player(&mut self, id: &str) {
        if self.local_player_id.is_none() {
            self.local_player_id = Some(id.to_string());
        }
    }

    /// Replaces the player map wholesale (the payload is a complete
    /// enumeration, not a diff). Returns the ids that disappeared.
    pub fn replace_players(&mut self, players: HashMap<String, Player>) -> Vec<String> {
        let removed = self
            .players
            .keys()
            .filter(|id| !players.contains_key(*id))
            .cloned()
            .collect();
        self.players = players;
        removed
    }

    /// Replaces the NPC map wholesale. Returns the ids that disappeared.
    pub fn replace_npcs(&mut self, npcs: HashMap<String, Npc>) -> Vec<String> {
        let removed = self
            .npcs
            .keys()
            .filter(|id| !npcs.contains_key(*id))
            .cloned()
            .collect();
        self.npcs = npcs;
        removed
    }

    /// Replaces all three collections atomically (full snapshot). Pending
    /// optimistic removals are superseded by the snapshot and dropped.
    pub fn replace_world(
        &mut self,
        players: HashMap<String, Player>,
        npcs: HashMap<String, Npc>,
        map_objects: Vec<MapObject>,
    ) -> RemovedEntities {
        let removed_objects = self
            .map_objects
            .iter()
            .filter(|obj| !map_objects.contains(obj))
            .copied()
            .collect();
        let removed = RemovedEntities {
            players: self.replace_players(players),
            npcs: self.replace_npcs(npcs),
            objects: removed_objects,
        };
        self.map_objects = map_objects;
        self.pending_removals.clear();
        removed
    }

    /// Authoritative removal. Also reconciles a matching pending optimistic
    /// removal. Returns whether the set actually changed.
    pub fn remove_object(&mut self, target: MapObject) -> bool {
        self.pending_removals.retain(|obj| *obj != target);
        let before = self.map_objects.len();
        self.map_objects.retain(|obj| *obj != target);
        self.map_objects.len() != before
    }

    pub fn add_object(&mut self, object: MapObject) {
        self.map_objects.push(object);
    }

    /// Removes an object locally before the server confirms, recording a
    /// pending marker so the later authoritative event reconciles cleanly.
    /// Returns whether anything was removed.
    pub fn remove_object_optimistic(&mut self, target: MapObject) -> bool {
        let before = self.map_objects.len();
        self.map_objects.retain(|obj| *obj != target);
        if self.map_objects.len() != before {
            self.pending_removals.push(target);
            true
        } else {
            false
        }
    }

    pub fn pending_removals(&self) -> &[MapObject] {
        &self.pending_removals
    }
}
