//! Camera and minimap projection.

use crate::world::WorldModel;
use shared::{MAP_HEIGHT, MAP_WIDTH, MINIMAP_WIDTH};

/// World-to-screen offset that centers the local player in the viewport.
/// `None` until the local id resolves to a live player entry; the camera
/// simply stops updating when our entry is missing.
pub fn camera_offset(
    world: &WorldModel,
    viewport_width: i32,
    viewport_height: i32,
) -> Option<(f64, f64)> {
    let position = world.local_player()?.position;
    Some((
        -(position.x as f64) + viewport_width as f64 / 2.0,
        -(position.y as f64) + viewport_height as f64 / 2.0,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimapPixel {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color_class: String,
}

/// One minimap repaint, pixels in draw order: map objects, then players,
/// then NPCs, then the local-player highlight. Later entries paint on top.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapFrame {
    pub width: f64,
    pub height: f64,
    pub pixels: Vec<MinimapPixel>,
}

pub fn minimap_frame(world: &WorldModel) -> MinimapFrame {
    let width = MINIMAP_WIDTH;
    let height = width / (MAP_WIDTH as f64 / MAP_HEIGHT as f64);
    // Scale factors are independent per axis.
    let scale_x = width / MAP_WIDTH as f64;
    let scale_y = height / MAP_HEIGHT as f64;

    let mut pixels = Vec::new();
    for obj in world.map_objects() {
        pixels.push(MinimapPixel {
            x: obj.x as f64 * scale_x,
            y: obj.y as f64 * scale_y,
            size: 3.0,
            color_class: "asteroid".to_string(),
        });
    }
    for player in world.players().values() {
        pixels.push(MinimapPixel {
            x: player.position.x as f64 * scale_x,
            y: player.position.y as f64 * scale_y,
            size: 5.0,
            color_class: player.color.clone(),
        });
    }
    for npc in world.npcs().values() {
        pixels.push(MinimapPixel {
            x: npc.position.x as f64 * scale_x,
            y: npc.position.y as f64 * scale_y,
            size: 4.0,
            color_class: "npc".to_string(),
        });
    }
    if let Some(player) = world.local_player() {
        pixels.push(MinimapPixel {
            x: player.position.x as f64 * scale_x,
            y: player.position.y as f64 * scale_y,
            size: 7.0,
            color_class: "local".to_string(),
        });
    }

    MinimapFrame {
        width,
        height,
        pixels,
    }
}
