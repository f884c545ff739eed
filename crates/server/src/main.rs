use voxfray_server::game::GameService;
use voxfray_server::net::listener;

#[tokio::main]
async fn main() {
    let bind_addr = std::env::args()
        .skip_while(|a| a != "--bind")
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:3000".into());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    tracing::info!("Voxfray -- authoritative voxel session host");

    // World state is transient by design: nothing is persisted, a restart
    // starts from flat terrain and zero sessions.
    let (service, commands_rx) = GameService::new();
    let commands = service.command_sender();

    let game = tokio::spawn(service.run(commands_rx));

    tokio::select! {
        result = listener::run(commands, &bind_addr) => {
            if let Err(e) = result {
                tracing::error!("Listener error: {:#}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received, shutting down...");
        }
    }

    game.abort();
}
