//! Presentation boundary. The runtime never paints anything itself; it
//! emits these intents and a renderer (DOM, canvas, terminal) realizes
//! them, keeping its own presentation identity per entity key.

use log::{debug, info};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Npc,
    Asteroid,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Npc => write!(f, "npc"),
            EntityKind::Asteroid => write!(f, "asteroid"),
        }
    }
}

/// Stable presentation key for a positionally-identified object.
pub fn object_key(x: i32, y: i32) -> String {
    format!("{}:{}", x, y)
}

pub trait DrawSink {
    fn upsert_entity(&mut self, kind: EntityKind, key: &str, x: i32, y: i32, color: Option<&str>);
    fn remove_entity(&mut self, kind: EntityKind, key: &str);
    fn set_camera_offset(&mut self, dx: f64, dy: f64);
    fn fill_minimap_background(&mut self, width: f64, height: f64);
    fn set_minimap_pixel(&mut self, x: f64, y: f64, size: f64, color_class: &str);
    fn set_mine_control_enabled(&mut self, enabled: bool);
    fn set_attack_control_enabled(&mut self, enabled: bool);
}

/// Headless sink used by the binary: entity and minimap traffic at debug,
/// control flips at info so a bare `RUST_LOG=info` run shows what matters.
pub struct LogSink;

impl DrawSink for LogSink {
    fn upsert_entity(&mut self, kind: EntityKind, key: &str, x: i32, y: i32, color: Option<&str>) {
        debug!(
            "draw {} {} at ({}, {}) color={}",
            kind,
            key,
            x,
            y,
            color.unwrap_or("-")
        );
    }

    fn remove_entity(&mut self, kind: EntityKind, key: &str) {
        debug!("erase {} {}", kind, key);
    }

    fn set_camera_offset(&mut self, dx: f64, dy: f64) {
        debug!("camera offset ({:.1}, {:.1})", dx, dy);
    }

    fn fill_minimap_background(&mut self, width: f64, height: f64) {
        debug!("minimap clear {}x{}", width, height);
    }

    fn set_minimap_pixel(&mut self, x: f64, y: f64, size: f64, color_class: &str) {
        debug!("minimap pixel ({:.1}, {:.1}) size {} {}", x, y, size, color_class);
    }

    fn set_mine_control_enabled(&mut self, enabled: bool) {
        info!("mine control {}", if enabled { "enabled" } else { "disabled" });
    }

    fn set_attack_control_enabled(&mut self, enabled: bool) {
        info!("attack control {}", if enabled { "enabled" } else { "disabled" });
    }
}

/// Every intent a [`RecordingSink`] captured, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Upsert {
        kind: EntityKind,
        key: String,
        x: i32,
        y: i32,
        color: Option<String>,
    },
    Remove {
        kind: EntityKind,
        key: String,
    },
    Camera {
        dx: f64,
        dy: f64,
    },
    MinimapBackground {
        width: f64,
        height: f64,
    },
    MinimapPixel {
        x: f64,
        y: f64,
        size: f64,
        color_class: String,
    },
    MineControl(bool),
    AttackControl(bool),
}

/// Captures draw intents for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_mine_control(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            SinkCall::MineControl(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn last_attack_control(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            SinkCall::AttackControl(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn last_camera(&self) -> Option<(f64, f64)> {
        self.calls.iter().rev().find_map(|call| match call {
            SinkCall::Camera { dx, dy } => Some((*dx, *dy)),
            _ => None,
        })
    }
}

impl DrawSink for RecordingSink {
    fn upsert_entity(&mut self, kind: EntityKind, key: &str, x: i32, y: i32, color: Option<&str>) {
        self.calls.push(SinkCall::Upsert {
            kind,
            key: key.to_string(),
            x,
            y,
            color: color.map(str::to_string),
        });
    }

    fn remove_entity(&mut self, kind: EntityKind, key: &str) {
        self.calls.push(SinkCall::Remove {
            kind,
            key: key.to_string(),
        });
    }

    fn set_camera_offset(&mut self, dx: f64, dy: f64) {
        self.calls.push(SinkCall::Camera { dx, dy });
    }

    fn fill_minimap_background(&mut self, width: f64, height: f64) {
        self.calls.push(SinkCall::MinimapBackground { width, height });
    }

    fn set_minimap_pixel(&mut self, x: f64, y: f64, size: f64, color_class: &str) {
        self.calls.push(SinkCall::MinimapPixel {
            x,
            y,
            size,
            color_class: color_class.to_string(),
        });
    }

    fn set_mine_control_enabled(&mut self, enabled: bool) {
        self.calls.push(SinkCall::MineControl(enabled));
    }

    fn set_attack_control_enabled(&mut self, enabled: bool) {
        self.calls.push(SinkCall::AttackControl(enabled));
    }
}
