//! Applies inbound server messages to the world model and reports which
//! derived outputs have to be refreshed.

use crate::world::{RemovedEntities, WorldModel};
use log::{debug, warn};
use shared::ServerMessage;

/// What a message invalidated. The session turns these into sink intents
/// and affordance recomputation; nothing here is polled.
#[derive(Debug, Default)]
pub struct Effects {
    pub players_changed: bool,
    pub npcs_changed: bool,
    pub objects_changed: bool,
    pub camera: bool,
    pub minimap: bool,
    pub mining: bool,
    pub attack: bool,
    pub removed: RemovedEntities,
}

impl Effects {
    /// A full snapshot invalidates everything.
    fn full(removed: RemovedEntities) -> Self {
        Self {
            players_changed: true,
            npcs_changed: true,
            objects_changed: true,
            camera: true,
            minimap: true,
            mining: true,
            attack: true,
            removed,
        }
    }

    /// An incremental object-set change. The minimap and the mining
    /// affordance depend on the set; player/NPC-derived state does not.
    fn object_set_changed(removed: Vec<shared::MapObject>) -> Self {
        Self {
            objects_changed: true,
            minimap: true,
            mining: true,
            removed: RemovedEntities {
                objects: removed,
                ..RemovedEntities::default()
            },
            ..Self::default()
        }
    }
}

pub fn apply(world: &mut WorldModel, message: ServerMessage) -> Effects {
    match message {
        ServerMessage::Initialize {
            player_id,
            players,
            npcs,
            map_objects,
        } => {
            world.set_local_player(&player_id);
            debug!("initialized as {}", player_id);
            Effects::full(world.replace_world(players, npcs, map_objects))
        }

        // Same replacement as initialize but never reassigns the local id.
        ServerMessage::UpdateWorld {
            players,
            npcs,
            map_objects,
        } => Effects::full(world.replace_world(players, npcs, map_objects)),

        ServerMessage::UpdatePlayers { players } => {
            let removed = world.replace_players(players);
            Effects {
                players_changed: true,
                camera: true,
                minimap: true,
                mining: true,
                attack: true,
                removed: RemovedEntities {
                    players: removed,
                    ..RemovedEntities::default()
                },
                ..Effects::default()
            }
        }

        ServerMessage::UpdateNpcs { npcs } => {
            let removed = world.replace_npcs(npcs);
            Effects {
                npcs_changed: true,
                minimap: true,
                attack: true,
                removed: RemovedEntities {
                    npcs: removed,
                    ..RemovedEntities::default()
                },
                ..Effects::default()
            }
        }

        ServerMessage::AsteroidRemoved { asteroid } => {
            if world.remove_object(asteroid) {
                Effects::object_set_changed(vec![asteroid])
            } else {
                // Already gone, usually because we removed it optimistically
                // when the mine action was sent.
                debug!("asteroid at ({}, {}) already absent", asteroid.x, asteroid.y);
                Effects::object_set_changed(Vec::new())
            }
        }

        ServerMessage::AsteroidRespawn { asteroid } => {
            world.add_object(asteroid);
            Effects::object_set_changed(Vec::new())
        }

        ServerMessage::Unknown => {
            warn!("unhandled server action, ignoring");
            Effects::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MapObject, Npc, Player, Position};
    use std::collections::HashMap;

    fn players_payload(entries: &[(&str, i32, i32)]) -> HashMap<String, Player> {
        entries
            .iter()
            .map(|(id, x, y)| {
                (
                    id.to_string(),
                    Player::new(Position::new(*x, *y), "blue"),
                )
            })
            .collect()
    }

    #[test]
    fn test_update_players_last_writer_wins() {
        let mut world = WorldModel::new();

        let payloads = [
            players_payload(&[("p1", 1, 1), ("p2", 2, 2)]),
            players_payload(&[("p3", 3, 3)]),
            players_payload(&[("p2", 9, 9), ("p4", 4, 4)]),
        ];
        for payload in payloads.iter().cloned() {
            apply(&mut world, ServerMessage::UpdatePlayers { players: payload });
        }

        assert_eq!(world.players(), payloads.last().unwrap());
    }

    #[test]
    fn test_update_players_effects() {
        let mut world = WorldModel::new();
        let effects = apply(
            &mut world,
            ServerMessage::UpdatePlayers {
                players: players_payload(&[("p1", 1, 1)]),
            },
        );
        assert!(effects.players_changed);
        assert!(effects.camera);
        assert!(effects.minimap);
        assert!(effects.mining);
        assert!(effects.attack);
        assert!(!effects.npcs_changed);
        assert!(!effects.objects_changed);
    }

    #[test]
    fn test_update_npcs_refreshes_attack_only() {
        let mut world = WorldModel::new();
        let mut npcs = HashMap::new();
        npcs.insert("npc_0".to_string(), Npc::new(Position::new(7, 7)));

        let effects = apply(&mut world, ServerMessage::UpdateNpcs { npcs });
        assert!(effects.npcs_changed);
        assert!(effects.minimap);
        assert!(effects.attack);
        assert!(!effects.mining);
        assert!(!effects.camera);
        assert_eq!(world.npcs().len(), 1);
    }

    #[test]
    fn test_initialize_sets_local_id_once() {
        let mut world = WorldModel::new();
        apply(
            &mut world,
            ServerMessage::Initialize {
                player_id: "p1".to_string(),
                players: HashMap::new(),
                npcs: HashMap::new(),
                map_objects: Vec::new(),
            },
        );
        apply(
            &mut world,
            ServerMessage::Initialize {
                player_id: "p2".to_string(),
                players: HashMap::new(),
                npcs: HashMap::new(),
                map_objects: Vec::new(),
            },
        );
        assert_eq!(world.local_player_id(), Some("p1"));
    }

    #[test]
    fn test_update_world_never_assigns_local_id() {
        let mut world = WorldModel::new();
        apply(
            &mut world,
            ServerMessage::UpdateWorld {
                players: players_payload(&[("p1", 1, 1)]),
                npcs: HashMap::new(),
                map_objects: Vec::new(),
            },
        );
        assert_eq!(world.local_player_id(), None);
    }

    #[test]
    fn test_update_world_with_empty_players_clears_local_entry() {
        let mut world = WorldModel::new();
        apply(
            &mut world,
            ServerMessage::Initialize {
                player_id: "p1".to_string(),
                players: players_payload(&[("p1", 100, 100)]),
                npcs: HashMap::new(),
                map_objects: Vec::new(),
            },
        );
        assert!(world.local_player().is_some());

        let effects = apply(
            &mut world,
            ServerMessage::UpdateWorld {
                players: HashMap::new(),
                npcs: HashMap::new(),
                map_objects: Vec::new(),
            },
        );
        assert!(world.players().is_empty());
        assert!(world.local_player().is_none());
        assert_eq!(effects.removed.players, vec!["p1".to_string()]);
    }

    #[test]
    fn test_asteroid_removed_then_respawn_restores_exactly_one() {
        let mut world = WorldModel::new();
        world.add_object(MapObject::new(10, 10));
        world.add_object(MapObject::new(30, 30));

        apply(
            &mut world,
            ServerMessage::AsteroidRemoved {
                asteroid: MapObject::new(10, 10),
            },
        );
        apply(
            &mut world,
            ServerMessage::AsteroidRespawn {
                asteroid: MapObject::new(10, 10),
            },
        );

        let at_target = world
            .map_objects()
            .iter()
            .filter(|obj| **obj == MapObject::new(10, 10))
            .count();
        assert_eq!(at_target, 1);
        assert_eq!(world.map_objects().len(), 2);
    }

    #[test]
    fn test_asteroid_events_touch_object_state_only() {
        let mut world = WorldModel::new();
        world.add_object(MapObject::new(10, 10));

        let effects = apply(
            &mut world,
            ServerMessage::AsteroidRemoved {
                asteroid: MapObject::new(10, 10),
            },
        );
        assert!(effects.objects_changed);
        assert!(effects.minimap);
        assert!(effects.mining);
        assert!(!effects.attack);
        assert!(!effects.camera);
        assert!(!effects.players_changed);
        assert_eq!(effects.removed.objects, vec![MapObject::new(10, 10)]);
    }

    #[test]
    fn test_unknown_action_has_no_effects() {
        let mut world = WorldModel::new();
        world.add_object(MapObject::new(1, 1));

        let effects = apply(&mut world, ServerMessage::Unknown);
        assert!(!effects.players_changed);
        assert!(!effects.minimap);
        assert!(!effects.mining);
        assert_eq!(world.map_objects().len(), 1);
    }
}
