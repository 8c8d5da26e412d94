//! The session owns everything a single connection to the game server
//! needs: the world model, the connection supervisor, the draw sink, and
//! the input-event receiver. One session, one event loop, no shared state.
//!
//! All work is reaction to three event sources serialized onto this task by
//! `tokio::select!`: inbound server messages, user input events, and the
//! reconnection timer.

use crate::affordance;
use crate::input::{self, InputEvent};
use crate::reconcile::{self, Effects};
use crate::sink::{object_key, DrawSink, EntityKind};
use crate::transport::{ConnectionState, ConnectionSupervisor};
use crate::viewport;
use crate::world::WorldModel;
use log::{debug, error, info, warn};
use shared::{ClientMessage, ServerMessage, RECONNECT_INTERVAL_MS};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Why the inner connection loop ended.
enum Disconnect {
    /// The peer closed or the socket failed; reconnect.
    Peer,
    /// The input channel closed; the session shuts down.
    InputClosed,
}

pub struct Session<S: DrawSink> {
    endpoint: String,
    viewport_width: i32,
    viewport_height: i32,
    world: WorldModel,
    supervisor: ConnectionSupervisor,
    sink: S,
    input_rx: mpsc::UnboundedReceiver<InputEvent>,
}

impl<S: DrawSink> Session<S> {
    /// Builds a session and the sender input sources push events through.
    pub fn new(
        endpoint: &str,
        viewport: (i32, i32),
        sink: S,
    ) -> (Self, mpsc::UnboundedSender<InputEvent>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let session = Session {
            endpoint: endpoint.to_string(),
            viewport_width: viewport.0,
            viewport_height: viewport.1,
            world: WorldModel::new(),
            supervisor: ConnectionSupervisor::new(),
            sink,
            input_rx,
        };
        (session, input_tx)
    }

    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.supervisor.state()
    }

    /// Marks the channel open and re-derives the control state.
    pub fn mark_open(&mut self) {
        self.supervisor.handle_open();
        self.refresh_controls();
    }

    /// Marks the channel closed. Both controls go dark; returns whether a
    /// reconnect timer should start.
    pub fn mark_closed(&mut self) -> bool {
        let schedule = self.supervisor.handle_close();
        self.refresh_controls();
        schedule
    }

    /// Reconciles one inbound message into the world model and flushes the
    /// resulting draw/control intents.
    pub fn apply_message(&mut self, message: ServerMessage) {
        let effects = reconcile::apply(&mut self.world, message);
        self.apply_effects(effects);
    }

    /// Handles one input event, returning the outbound message to send, if
    /// any. No-op while the channel is not open or the local player does
    /// not resolve; precondition failures are silent.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<ClientMessage> {
        if !self.supervisor.is_open() || self.world.local_player().is_none() {
            return None;
        }
        match event {
            InputEvent::Mine => {
                let (message, target) = input::mine_message(&self.world);
                if let Some(target) = target {
                    if self.world.remove_object_optimistic(target) {
                        self.sink
                            .remove_entity(EntityKind::Asteroid, &object_key(target.x, target.y));
                        self.refresh_minimap();
                        self.refresh_mine_control();
                    }
                }
                Some(message)
            }
            InputEvent::Attack => Some(ClientMessage::Shoot),
            movement => input::movement_message(&self.world, movement),
        }
    }

    fn apply_effects(&mut self, effects: Effects) {
        for id in &effects.removed.players {
            self.sink.remove_entity(EntityKind::Player, id);
        }
        for id in &effects.removed.npcs {
            self.sink.remove_entity(EntityKind::Npc, id);
        }
        for obj in &effects.removed.objects {
            self.sink
                .remove_entity(EntityKind::Asteroid, &object_key(obj.x, obj.y));
        }

        if effects.players_changed {
            for (id, player) in self.world.players() {
                self.sink.upsert_entity(
                    EntityKind::Player,
                    id,
                    player.position.x,
                    player.position.y,
                    Some(&player.color),
                );
            }
        }
        if effects.npcs_changed {
            for (id, npc) in self.world.npcs() {
                self.sink
                    .upsert_entity(EntityKind::Npc, id, npc.position.x, npc.position.y, None);
            }
        }
        if effects.objects_changed {
            for obj in self.world.map_objects() {
                self.sink.upsert_entity(
                    EntityKind::Asteroid,
                    &object_key(obj.x, obj.y),
                    obj.x,
                    obj.y,
                    None,
                );
            }
        }

        if effects.camera {
            self.refresh_camera();
        }
        if effects.minimap {
            self.refresh_minimap();
        }
        if effects.mining {
            self.refresh_mine_control();
        }
        if effects.attack {
            self.refresh_attack_control();
        }
    }

    fn refresh_camera(&mut self) {
        // No-op until the local id resolves to a live player.
        if let Some((dx, dy)) =
            viewport::camera_offset(&self.world, self.viewport_width, self.viewport_height)
        {
            self.sink.set_camera_offset(dx, dy);
        }
    }

    fn refresh_minimap(&mut self) {
        let frame = viewport::minimap_frame(&self.world);
        self.sink.fill_minimap_background(frame.width, frame.height);
        for pixel in &frame.pixels {
            self.sink
                .set_minimap_pixel(pixel.x, pixel.y, pixel.size, &pixel.color_class);
        }
    }

    fn refresh_mine_control(&mut self) {
        let enabled = affordance::mine_control_enabled(&self.world, self.supervisor.is_open());
        self.sink.set_mine_control_enabled(enabled);
    }

    fn refresh_attack_control(&mut self) {
        let enabled = affordance::attack_control_enabled(&self.world, self.supervisor.is_open());
        self.sink.set_attack_control_enabled(enabled);
    }

    fn refresh_controls(&mut self) {
        self.refresh_mine_control();
        self.refresh_attack_control();
    }

    fn handle_line(&mut self, line: &str) {
        match serde_json::from_str::<ServerMessage>(line) {
            Ok(message) => self.apply_message(message),
            Err(e) => warn!("discarding malformed message: {}", e),
        }
    }

    /// Runs the connection loop until the input source goes away. Transport
    /// faults are never fatal: every drop schedules a reconnect attempt on
    /// the fixed interval, indefinitely.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.supervisor.request_connect();
            info!("connecting to {}", self.endpoint);

            let disconnect = match TcpStream::connect(&self.endpoint).await {
                Ok(stream) => {
                    info!("connected to {}", self.endpoint);
                    self.mark_open();
                    self.drive(stream).await
                }
                Err(e) => {
                    warn!("connect to {} failed: {}", self.endpoint, e);
                    Disconnect::Peer
                }
            };

            if self.mark_closed() {
                debug!("reconnecting in {} ms", RECONNECT_INTERVAL_MS);
            }
            if matches!(disconnect, Disconnect::InputClosed) {
                info!("input channel closed, shutting down");
                return Ok(());
            }
            if !self.wait_for_reconnect().await {
                info!("input channel closed, shutting down");
                return Ok(());
            }
            self.supervisor.timer_fired();
        }
    }

    /// Pumps one live connection: inbound lines are reconciled, input
    /// events are dispatched outbound.
    async fn drive(&mut self, stream: TcpStream) -> Disconnect {
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(&line),
                    Ok(None) => {
                        info!("server closed the connection");
                        return Disconnect::Peer;
                    }
                    Err(e) => {
                        error!("read error: {}", e);
                        return Disconnect::Peer;
                    }
                },
                event = self.input_rx.recv() => match event {
                    Some(event) => {
                        if let Some(message) = self.handle_input(event) {
                            if let Err(e) = send_message(&mut writer, &message).await {
                                error!("send error: {}", e);
                                return Disconnect::Peer;
                            }
                        }
                    }
                    None => return Disconnect::InputClosed,
                },
            }
        }
    }

    /// Waits out the reconnect interval. Input arriving while disconnected
    /// is drained and dropped. Returns false when the input source closed.
    async fn wait_for_reconnect(&mut self) -> bool {
        let delay = sleep(Duration::from_millis(RECONNECT_INTERVAL_MS));
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => return true,
                event = self.input_rx.recv() => match event {
                    Some(_) => debug!("input ignored while disconnected"),
                    None => return false,
                },
            }
        }
    }
}

async fn send_message(writer: &mut OwnedWriteHalf, message: &ClientMessage) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await
}
