//! The game service: single logical stream of control.
//!
//! All mutable state (world, session registry, router) is owned by one task
//! that drains a command channel. Each command runs to completion before the
//! next starts, so every read-modify-write is atomic relative to other
//! events and no locking is needed. Respawn is the one deferred operation:
//! its timer re-enters the same channel, so it interleaves with -- but never
//! runs concurrent to -- other handlers.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;
use voxfray_engine::world::position::BlockPos;
use voxfray_engine::world::World;

use crate::combat::{self, AttackOutcome, DEFAULT_DAMAGE, DEFAULT_HEAL, RESPAWN_DELAY};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::registry::SessionRegistry;
use crate::router::Router;

/// Chunk radius of the one-shot snapshot sent at connect. Deliberately
/// smaller than [`STREAM_RADIUS`]: faster time-to-interactive over complete
/// first paint.
pub const SNAPSHOT_RADIUS: i32 = 1;

/// Chunk radius of the incremental stream sent back to a mover.
pub const STREAM_RADIUS: i32 = 2;

/// Inbound events, funneled from every connection into the game task.
#[derive(Debug)]
pub enum Command {
    /// A client connected; `outbound` is its private send half.
    Connect {
        id: Uuid,
        outbound: UnboundedSender<ServerMessage>,
    },
    /// A decoded client message.
    Message { id: Uuid, message: ClientMessage },
    /// The connection dropped (or its frames stopped decoding).
    Disconnect { id: Uuid },
    /// A respawn timer fired. Safe no-op if the player is gone.
    Respawn { id: Uuid },
}

/// Owns the authoritative state and applies commands one at a time.
pub struct GameService {
    world: World,
    registry: SessionRegistry,
    router: Router,
    /// Re-entry handle for deferred respawns.
    commands: UnboundedSender<Command>,
}

impl GameService {
    pub fn new() -> (Self, UnboundedReceiver<Command>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                world: World::new(),
                registry: SessionRegistry::new(),
                router: Router::new(),
                commands: tx,
            },
            rx,
        )
    }

    /// Handle for producers (the listener and respawn timers).
    pub fn command_sender(&self) -> UnboundedSender<Command> {
        self.commands.clone()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Drain the command channel until every sender is gone.
    pub async fn run(mut self, mut commands: UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        tracing::info!("Game service stopped");
    }

    /// Apply one command to completion.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { id, outbound } => self.on_connect(id, outbound),
            Command::Message { id, message } => self.on_message(id, message),
            Command::Disconnect { id } => self.on_disconnect(id),
            Command::Respawn { id } => self.on_respawn(id),
        }
    }

    fn on_connect(&mut self, id: Uuid, outbound: UnboundedSender<ServerMessage>) {
        self.router.register(id, outbound);
        let player = self.registry.connect(id).clone();
        tracing::info!("{} connected as {}", id, player.username);

        // Snapshot to the new client first, then announce it to the rest.
        self.router.route(
            id,
            ServerMessage::GameState {
                player_id: id,
                players: self.registry.players().clone(),
                blocks: self.world.blocks_in_range(0.0, 0.0, SNAPSHOT_RADIUS),
            },
        );
        self.router.route(id, ServerMessage::PlayerJoined(player));
    }

    fn on_message(&mut self, id: Uuid, message: ClientMessage) {
        match message {
            ClientMessage::PlayerMove { x, y, z, rot_x, rot_y } => {
                // Boundary validation: reject, don't clamp. Nothing past
                // this point re-checks numeric sanity.
                if ![x, y, z, rot_x, rot_y].iter().all(|v| v.is_finite()) {
                    tracing::warn!("{} sent a non-finite move, dropping", id);
                    return;
                }
                let Some(player) = self.registry.apply_move(id, x, y, z, rot_x, rot_y) else {
                    return;
                };
                let player = player.clone();
                self.router.route(id, ServerMessage::PlayerMoved(player));

                // Stream the world around the new position back to the
                // mover; this is how newly-approached chunks reach a client.
                let nearby = self.world.blocks_in_range(x, z, STREAM_RADIUS);
                self.router.route(id, ServerMessage::ChunkUpdate(nearby));
            }

            ClientMessage::PlaceBlock { x, y, z, kind } => {
                self.world.place_block(BlockPos::new(x, y, z), kind);
                self.router
                    .route(id, ServerMessage::BlockPlaced { x, y, z, kind });
            }

            ClientMessage::DestroyBlock { x, y, z } => {
                // Absent block: idempotent no-op, nothing to broadcast.
                if self.world.destroy_block(BlockPos::new(x, y, z)) {
                    self.router
                        .route(id, ServerMessage::BlockDestroyed { x, y, z });
                }
            }

            ClientMessage::ChatMessage(message) => {
                let Some(player) = self.registry.get(id) else {
                    return;
                };
                self.router.route(
                    id,
                    ServerMessage::ChatMessage {
                        username: player.username.clone(),
                        message,
                        timestamp: epoch_millis(),
                    },
                );
            }

            ClientMessage::PlayerAttack { target_id, damage } => {
                let damage = damage.unwrap_or(DEFAULT_DAMAGE);
                match combat::attack(&mut self.registry, id, target_id, damage, epoch_millis()) {
                    Some(AttackOutcome::Damaged {
                        damage,
                        new_health,
                        attacker_name,
                    }) => {
                        tracing::debug!(
                            "{} hit {} for {} ({} HP left)",
                            attacker_name,
                            target_id,
                            damage,
                            new_health
                        );
                        self.router.route(
                            id,
                            ServerMessage::PlayerDamaged {
                                player_id: target_id,
                                damage,
                                new_health,
                                attacker_id: id,
                                attacker_name,
                            },
                        );
                    }
                    Some(AttackOutcome::Killed {
                        target_name,
                        attacker_name,
                    }) => {
                        tracing::info!("{} killed {}", attacker_name, target_name);
                        self.router.route(
                            id,
                            ServerMessage::PlayerDied {
                                dead_player_id: target_id,
                                killer_player_id: id,
                                dead_player_name: target_name,
                                killer_name: attacker_name,
                            },
                        );
                        self.schedule_respawn(target_id);
                    }
                    None => {}
                }
            }

            ClientMessage::PlayerHeal { amount } => {
                let amount = amount.unwrap_or(DEFAULT_HEAL);
                if let Some((applied, new_health)) = combat::heal(&mut self.registry, id, amount) {
                    self.router.route(
                        id,
                        ServerMessage::PlayerHealed {
                            player_id: id,
                            amount: applied,
                            new_health,
                        },
                    );
                }
            }
        }
    }

    fn on_disconnect(&mut self, id: Uuid) {
        if let Some(player) = self.registry.disconnect(id) {
            tracing::info!("{} ({}) disconnected", player.username, id);
            self.router.route(id, ServerMessage::PlayerLeft(id));
        }
        self.router.unregister(id);
    }

    fn on_respawn(&mut self, id: Uuid) {
        // The timer always fires; the target may have disconnected (or the
        // record may already be alive). Both are safe no-ops.
        let Some(player) = combat::respawn(&mut self.registry, id) else {
            return;
        };
        let player = player.clone();
        tracing::info!("{} respawned", player.username);
        self.router.route(
            id,
            ServerMessage::PlayerRespawned { player_id: id, player },
        );
    }

    fn schedule_respawn(&self, id: Uuid) {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(RESPAWN_DELAY).await;
            // If the service is gone the whole process is shutting down.
            let _ = commands.send(Command::Respawn { id });
        });
    }
}

/// Current wall-clock time in epoch milliseconds.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
