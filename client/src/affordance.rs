//! Derives what the local player can currently interact with.
//!
//! Everything here is a pure read of the world model; the session calls
//! these after any event that changes player position, the player set, the
//! NPC set, or the object set.

use crate::world::WorldModel;
use shared::{MapObject, ATTACK_RANGE, MINING_RANGE};

/// The closest map object strictly within mining range, used as the target
/// for optimistic removal when the mine action fires.
pub fn closest_mineable(world: &WorldModel) -> Option<MapObject> {
    let position = world.local_player()?.position;
    world
        .map_objects()
        .iter()
        .map(|obj| (*obj, position.distance_to(obj.position())))
        .filter(|(_, distance)| *distance < MINING_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(obj, _)| obj)
}

pub fn mine_available(world: &WorldModel) -> bool {
    closest_mineable(world).is_some()
}

pub fn attack_available(world: &WorldModel) -> bool {
    let Some(player) = world.local_player() else {
        return false;
    };
    world
        .npcs()
        .values()
        .any(|npc| player.position.distance_to(npc.position) < ATTACK_RANGE)
}

/// The mine control lights up only when something is in range and the
/// channel can actually carry the request.
pub fn mine_control_enabled(world: &WorldModel, channel_open: bool) -> bool {
    channel_open && mine_available(world)
}

pub fn attack_control_enabled(world: &WorldModel, channel_open: bool) -> bool {
    channel_open && attack_available(world)
}
