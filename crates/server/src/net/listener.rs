//! TCP listener: accepts clients and hands each to a connection task.

use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;

use crate::game::Command;

/// Bind and accept connections until the task is dropped.
pub async fn run(commands: UnboundedSender<Command>, bind_addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);

    loop {
        let (stream, addr) = listener.accept().await?;
        tracing::info!("Connection from {}", addr);

        let commands = commands.clone();
        tokio::spawn(async move {
            if let Err(e) = super::connection::handle(stream, commands).await {
                tracing::warn!("Connection from {} closed: {:#}", addr, e);
            }
        });
    }
}
