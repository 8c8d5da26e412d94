//! Translates discrete input events into outbound action messages.
//!
//! The dispatcher only reads the world model. Movement computes the target
//! position locally and sends it as a `move` request; the position the
//! client displays changes when the server echoes it back.

use crate::affordance;
use crate::world::WorldModel;
use shared::{ClientMessage, MapObject, Position, MOVE_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Mine,
    Attack,
}

impl InputEvent {
    /// Keyboard mapping used by the headless binary: WASD to move, space or
    /// `m` to mine, `f` to shoot.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Self::MoveUp),
            's' => Some(Self::MoveDown),
            'a' => Some(Self::MoveLeft),
            'd' => Some(Self::MoveRight),
            'm' | ' ' => Some(Self::Mine),
            'f' => Some(Self::Attack),
            _ => None,
        }
    }
}

/// Builds the `move` request for a movement event. Returns `None` when the
/// event is not a movement, the local player is unresolved, or the target
/// would leave the map; out-of-bounds attempts are dropped, not clamped.
pub fn movement_message(world: &WorldModel, event: InputEvent) -> Option<ClientMessage> {
    let Position { x, y } = world.local_player()?.position;
    let target = match event {
        InputEvent::MoveUp => Position::new(x, y - MOVE_STEP),
        InputEvent::MoveDown => Position::new(x, y + MOVE_STEP),
        InputEvent::MoveLeft => Position::new(x - MOVE_STEP, y),
        InputEvent::MoveRight => Position::new(x + MOVE_STEP, y),
        InputEvent::Mine | InputEvent::Attack => return None,
    };
    if !target.in_bounds() {
        return None;
    }
    Some(ClientMessage::Move {
        x: target.x,
        y: target.y,
    })
}

/// The mine request is always sent (the server does its own range check);
/// the optional target is the object to remove optimistically.
pub fn mine_message(world: &WorldModel) -> (ClientMessage, Option<MapObject>) {
    (ClientMessage::Mine, affordance::closest_mineable(world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Player, MAP_HEIGHT, MAP_WIDTH};
    use std::collections::HashMap;

    fn world_with_player_at(x: i32, y: i32) -> WorldModel {
        let mut world = WorldModel::new();
        world.set_local_player("p1");
        let mut players = HashMap::new();
        players.insert("p1".to_string(), Player::new(Position::new(x, y), "blue"));
        world.replace_players(players);
        world
    }

    #[test]
    fn test_movement_sends_stepped_target() {
        let world = world_with_player_at(100, 100);
        assert_eq!(
            movement_message(&world, InputEvent::MoveUp),
            Some(ClientMessage::Move { x: 100, y: 90 })
        );
        assert_eq!(
            movement_message(&world, InputEvent::MoveRight),
            Some(ClientMessage::Move { x: 110, y: 100 })
        );
    }

    #[test]
    fn test_out_of_bounds_movement_is_dropped() {
        let world = world_with_player_at(0, 0);
        assert_eq!(movement_message(&world, InputEvent::MoveUp), None);
        assert_eq!(movement_message(&world, InputEvent::MoveLeft), None);
        // In-bounds directions still work from the corner.
        assert!(movement_message(&world, InputEvent::MoveDown).is_some());

        let world = world_with_player_at(MAP_WIDTH, MAP_HEIGHT);
        assert_eq!(movement_message(&world, InputEvent::MoveDown), None);
        assert_eq!(movement_message(&world, InputEvent::MoveRight), None);
    }

    #[test]
    fn test_movement_requires_resolved_local_player() {
        let world = WorldModel::new();
        assert_eq!(movement_message(&world, InputEvent::MoveDown), None);
    }

    #[test]
    fn test_mine_sends_even_without_target() {
        let world = world_with_player_at(100, 100);
        let (message, target) = mine_message(&world);
        assert_eq!(message, ClientMessage::Mine);
        assert_eq!(target, None);
    }

    #[test]
    fn test_mine_targets_closest_in_range_object() {
        let mut world = world_with_player_at(100, 100);
        world.add_object(MapObject::new(150, 100));
        world.add_object(MapObject::new(120, 100));
        world.add_object(MapObject::new(900, 900));

        let (_, target) = mine_message(&world);
        assert_eq!(target, Some(MapObject::new(120, 100)));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(InputEvent::from_key('w'), Some(InputEvent::MoveUp));
        assert_eq!(InputEvent::from_key('D'), Some(InputEvent::MoveRight));
        assert_eq!(InputEvent::from_key(' '), Some(InputEvent::Mine));
        assert_eq!(InputEvent::from_key('f'), Some(InputEvent::Attack));
        assert_eq!(InputEvent::from_key('q'), None);
    }
}
