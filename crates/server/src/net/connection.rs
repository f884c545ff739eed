//! Per-client connection handler.
//!
//! Each connection gets a fresh player id, a writer task draining its
//! outbound channel, and a reader loop that forwards decoded messages to the
//! game service. The connection never touches game state directly -- it only
//! produces [`Command`]s and consumes [`ServerMessage`]s.

use anyhow::anyhow;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedSender};
use uuid::Uuid;

use crate::game::Command;
use crate::protocol::ClientMessage;

use super::codec;

/// Drive one client connection until it closes or faults.
pub async fn handle(stream: TcpStream, commands: UnboundedSender<Command>) -> anyhow::Result<()> {
    let id = Uuid::new_v4();
    let (mut read, mut write) = stream.into_split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel();

    commands
        .send(Command::Connect { id, outbound })
        .map_err(|_| anyhow!("game service unavailable"))?;

    // Writer: drain the outbound channel onto the socket. Ends when the
    // router drops our sender (disconnect) or the socket dies.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if let Err(e) = codec::write_frame(&mut write, &message).await {
                tracing::debug!("Write to {} failed: {:#}", id, e);
                break;
            }
        }
    });

    // Reader: decode frames into commands until EOF or a protocol fault.
    let result = loop {
        match codec::read_frame::<_, ClientMessage>(&mut read).await {
            Ok(Some(message)) => {
                if commands.send(Command::Message { id, message }).is_err() {
                    break Ok(());
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    // Always run the disconnect path, even after a fault; cleanup must be
    // safe to race with a pending respawn timer for this player.
    let _ = commands.send(Command::Disconnect { id });
    writer.abort();
    result
}
